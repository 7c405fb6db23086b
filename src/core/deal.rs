use crate::core::month::Month;
use crate::core::name::Name;
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

/// A closed deal.
///
/// Each deal is identified by its `name`, which doubles as a node in the
/// referral graph. `referred_by` names the person who brought the deal in,
/// or is `None` when the deal originated without a referrer.
///
/// Deals are immutable once created.
///
/// # Examples
///
/// ```
/// use referral_breakdown::core::deal::Deal;
/// use referral_breakdown::core::month::Month;
/// use referral_breakdown::core::name::Name;
/// use chrono::NaiveDate;
///
/// let deal = Deal::new(Name::new("Bob"), NaiveDate::from_ymd_opt(2024, 1, 20).unwrap())
///     .with_referrer(Name::new("Alice"));
///
/// assert_eq!(deal.referred_by(), Some(&Name::new("Alice")));
/// assert_eq!(deal.month(), Month::new(2024, 1).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    name: Name,
    close_date: NaiveDate,
    referred_by: Option<Name>,
}

impl Deal {
    /// Create a deal without a referrer.
    ///
    /// # Panics
    ///
    /// Panics if `name` is blank.
    pub fn new(name: Name, close_date: NaiveDate) -> Self {
        assert!(!name.is_blank(), "Deal name must not be blank");
        Self {
            name,
            close_date,
            referred_by: None,
        }
    }

    /// Set the referrer.
    ///
    /// # Panics
    ///
    /// Panics if `referrer` is blank.
    pub fn with_referrer(mut self, referrer: Name) -> Self {
        assert!(!referrer.is_blank(), "Referrer name must not be blank");
        self.referred_by = Some(referrer);
        self
    }

    // --- Accessors ---

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn close_date(&self) -> NaiveDate {
        self.close_date
    }

    pub fn referred_by(&self) -> Option<&Name> {
        self.referred_by.as_ref()
    }

    /// The month this deal closed in.
    pub fn month(&self) -> Month {
        Month::of(self.close_date)
    }

    pub fn is_referred(&self) -> bool {
        self.referred_by.is_some()
    }
}

/// Errors raised while assembling a deal set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DealError {
    #[error("duplicate deal name '{0}'")]
    DuplicateName(Name),
}

/// An ordered collection of deals with unique names.
#[derive(Debug, Clone, Default)]
pub struct DealSet {
    deals: Vec<Deal>,
    names: HashSet<Name>,
}

impl DealSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from deals in order, rejecting the first repeated name.
    pub fn from_deals(deals: impl IntoIterator<Item = Deal>) -> Result<Self, DealError> {
        let mut set = Self::new();
        for deal in deals {
            set.add(deal)?;
        }
        Ok(set)
    }

    pub fn add(&mut self, deal: Deal) -> Result<(), DealError> {
        if !self.names.insert(deal.name().clone()) {
            return Err(DealError::DuplicateName(deal.name().clone()));
        }
        self.deals.push(deal);
        Ok(())
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.names.contains(name)
    }

    /// Deals that carry a referrer, in input order.
    pub fn referred(&self) -> impl Iterator<Item = &Deal> {
        self.deals.iter().filter(|d| d.is_referred())
    }

    /// Number of deals that carry a referrer.
    pub fn referred_count(&self) -> usize {
        self.referred().count()
    }

    /// All distinct months deals closed in, ascending.
    pub fn months(&self) -> Vec<Month> {
        let mut months: Vec<Month> = self.deals.iter().map(|d| d.month()).collect();
        months.sort();
        months.dedup();
        months
    }
}
