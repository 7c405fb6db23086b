use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Calendar month a deal closed in, the row key of the breakdown.
///
/// Displays and serializes as `YYYY-MM`. Ordering is chronological, which
/// for four-digit years matches the ordering of the formatted strings.
///
/// # Examples
///
/// ```
/// use referral_breakdown::core::month::Month;
///
/// let jan = Month::new(2024, 1).unwrap();
/// assert_eq!(jan.to_string(), "2024-01");
/// assert!(jan < Month::new(2024, 2).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

/// Errors arising from month construction or parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthError {
    #[error("month must be in 1..=12, got {0}")]
    OutOfRange(u32),
    #[error("expected YYYY-MM, got '{0}'")]
    Malformed(String),
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        if !(1..=12).contains(&month) {
            return Err(MonthError::OutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// The month a calendar date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month `n` months after this one, or `None` if the year
    /// overflows.
    pub fn checked_plus(&self, n: u32) -> Option<Self> {
        let zero_based = (self.month - 1).checked_add(n)?;
        let years = i32::try_from(zero_based / 12).ok()?;
        Some(Self {
            year: self.year.checked_add(years)?,
            month: zero_based % 12 + 1,
        })
    }

    /// A date within this month, if chrono can represent it.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| MonthError::Malformed(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| MonthError::Malformed(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthError::Malformed(s.to_string()))?;
        Month::new(year, month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
