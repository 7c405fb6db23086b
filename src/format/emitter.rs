use crate::aggregation::breakdown::Breakdown;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// How a breakdown is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `YYYY-MM: ` headers with tab-indented `referrer: count` lines.
    #[default]
    Text,
    /// Pretty-printed `{"YYYY-MM": {"referrer": count}}`.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{}', expected 'text' or 'json'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Write `breakdown` to `out` in the requested format.
pub fn emit(breakdown: &Breakdown, format: OutputFormat, mut out: impl Write) -> io::Result<()> {
    match format {
        OutputFormat::Text => write!(out, "{}", breakdown)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, breakdown)?;
            writeln!(out)?;
        }
    }
    out.flush()
}
