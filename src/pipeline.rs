use crate::aggregation::breakdown::Breakdown;
use crate::aggregation::engine::AttributionEngine;
use crate::format::decoder::{decode_file, DecodeError};
use crate::format::emitter::{emit, OutputFormat};
use crate::graph::referral_map::ResolveError;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Any failure of a report run. All are fatal to the run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("unable to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Decode the deal file at `path`, aggregate it and write the report.
///
/// Nothing is written to `out` unless decoding and aggregation both
/// succeed. Returns the breakdown that was emitted.
pub fn run(
    path: impl AsRef<Path>,
    format: OutputFormat,
    out: impl Write,
) -> Result<Breakdown, RunError> {
    let deals = decode_file(path)?;
    let breakdown = AttributionEngine::monthly_breakdown(&deals)?;
    emit(&breakdown, format, out)?;
    Ok(breakdown)
}
