use crate::core::month::Month;
use crate::core::name::Name;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Closed-deal counts per month and initial referrer.
///
/// Only positive counts are stored: a (month, referrer) pair is present iff
/// at least one deal was credited to it. Months iterate in chronological
/// order and referrers in name order, so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Breakdown {
    /// month -> (initial referrer -> count)
    months: BTreeMap<Month, BTreeMap<Name, u64>>,
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit one deal closed in `month` to `referrer`.
    pub fn credit(&mut self, month: Month, referrer: Name) {
        *self
            .months
            .entry(month)
            .or_default()
            .entry(referrer)
            .or_insert(0) += 1;
    }

    /// Deals credited to `referrer` in `month` (zero if none).
    pub fn count(&self, month: &Month, referrer: &Name) -> u64 {
        self.months
            .get(month)
            .and_then(|referrers| referrers.get(referrer))
            .copied()
            .unwrap_or(0)
    }

    /// The per-referrer counts of a single month.
    pub fn month(&self, month: &Month) -> Option<&BTreeMap<Name, u64>> {
        self.months.get(month)
    }

    /// All months with at least one credited deal, ascending.
    pub fn months(&self) -> impl Iterator<Item = &Month> {
        self.months.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Month, &BTreeMap<Name, u64>)> {
        self.months.iter()
    }

    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Sum of all counts, i.e. the number of credited deals.
    pub fn total(&self) -> u64 {
        self.months
            .values()
            .flat_map(|referrers| referrers.values())
            .sum()
    }
}

/// Plain-text report: one `YYYY-MM: ` header per month, one tab-indented
/// `referrer: count` line per initial referrer, and a blank line after
/// each month.
impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (month, referrers) in &self.months {
            writeln!(f, "{}: ", month)?;
            for (referrer, count) in referrers {
                writeln!(f, "\t{}: {}", referrer, count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
