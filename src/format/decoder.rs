//! JSON deal record codec.
//!
//! Input is an array of deal records:
//!
//! ```json
//! [
//!   { "name": "Alice", "close_date": "01-15-2024", "referred_by": null },
//!   { "name": "Bob",   "close_date": "01-20-2024", "referred_by": "Alice" }
//! ]
//! ```
//!
//! `referred_by` may be omitted. Dates are `MM-DD-YYYY` and are parsed once,
//! here. Decoding is all-or-nothing.
//!
//! [`encode_pretty`] writes the same layout back out, which the CLI uses
//! for generated networks.

use crate::core::deal::{Deal, DealError, DealSet};
use crate::core::name::Name;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Date layout of the `close_date` field.
pub const CLOSE_DATE_FORMAT: &str = "%m-%d-%Y";

/// Errors arising while reading or decoding deal records.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed deal records: {0}")]
    Json(#[from] serde_json::Error),
    #[error("deal '{name}': close_date '{value}' is not MM-DD-YYYY: {source}")]
    InvalidDate {
        name: String,
        value: String,
        source: chrono::ParseError,
    },
    #[error("record {index}: name must not be empty")]
    EmptyName { index: usize },
    #[error("deal '{name}': referred_by must not be empty")]
    EmptyReferrer { name: String },
    #[error(transparent)]
    Deal(#[from] DealError),
}

/// JSON schema for a single input record.
#[derive(Debug, Serialize, Deserialize)]
struct DealRecord {
    name: String,
    close_date: String,
    #[serde(default)]
    referred_by: Option<String>,
}

impl From<&Deal> for DealRecord {
    fn from(deal: &Deal) -> Self {
        Self {
            name: deal.name().to_string(),
            close_date: deal.close_date().format(CLOSE_DATE_FORMAT).to_string(),
            referred_by: deal.referred_by().map(Name::to_string),
        }
    }
}

impl DealRecord {
    fn into_deal(self, index: usize) -> Result<Deal, DecodeError> {
        let name = Name::new(self.name);
        if name.is_blank() {
            return Err(DecodeError::EmptyName { index });
        }
        let close_date = NaiveDate::parse_from_str(self.close_date.trim(), CLOSE_DATE_FORMAT)
            .map_err(|source| DecodeError::InvalidDate {
                name: name.to_string(),
                value: self.close_date.clone(),
                source,
            })?;

        let deal = Deal::new(name, close_date);
        match self.referred_by.map(Name::new) {
            Some(referrer) if referrer.is_blank() => Err(DecodeError::EmptyReferrer {
                name: deal.name().to_string(),
            }),
            Some(referrer) => Ok(deal.with_referrer(referrer)),
            None => Ok(deal),
        }
    }
}

/// Decode deal records from a JSON string.
pub fn decode_str(content: &str) -> Result<DealSet, DecodeError> {
    let records: Vec<DealRecord> = serde_json::from_str(content)?;
    into_deal_set(records)
}

/// Decode deal records from any reader.
pub fn decode_reader(reader: impl Read) -> Result<DealSet, DecodeError> {
    let records: Vec<DealRecord> = serde_json::from_reader(reader)?;
    into_deal_set(records)
}

/// Read and decode the deal file at `path`.
pub fn decode_file(path: impl AsRef<Path>) -> Result<DealSet, DecodeError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let deals = decode_str(&content)?;
    debug!("decoded {} deals from {}", deals.len(), path.display());
    Ok(deals)
}

/// Render deals as a pretty-printed JSON record array.
pub fn encode_pretty(deals: &DealSet) -> serde_json::Result<String> {
    let records: Vec<DealRecord> = deals.deals().iter().map(DealRecord::from).collect();
    serde_json::to_string_pretty(&records)
}

fn into_deal_set(records: Vec<DealRecord>) -> Result<DealSet, DecodeError> {
    let mut set = DealSet::new();
    for (index, record) in records.into_iter().enumerate() {
        set.add(record.into_deal(index)?)?;
    }
    Ok(set)
}
