//! Random referral networks for exercising the resolver.
//!
//! Generated deals only ever refer to earlier deals (or to outside
//! referrers), so the resulting referral graph is always acyclic.

use crate::core::deal::{Deal, DealError, DealSet};
use crate::core::month::Month;
use crate::core::name::Name;
use chrono::NaiveDate;
use log::debug;
use rand::Rng;
use thiserror::Error;

/// Errors from an unusable [`NetworkConfig`].
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("month span must be at least 1")]
    ZeroMonthSpan,
    #[error("{span} months from {first} runs past the supported calendar")]
    MonthOutOfRange { first: Month, span: u32 },
    #[error(transparent)]
    Deal(#[from] DealError),
}

/// Configuration for generating a random deal network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of deals to generate.
    pub deal_count: usize,
    /// Number of outside referrers who never close a deal themselves.
    pub outside_referrers: usize,
    /// Probability that a deal has no referrer.
    pub unreferred_ratio: f64,
    /// Probability that a referred deal names an outside referrer.
    pub outside_ratio: f64,
    /// Probability that a referral comes from the most recent deal,
    /// which produces long chains.
    pub chain_ratio: f64,
    /// First month deals can close in.
    pub first_month: Month,
    /// Number of consecutive months deals are spread over.
    pub month_span: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            deal_count: 100,
            outside_referrers: 3,
            unreferred_ratio: 0.2,
            outside_ratio: 0.05,
            chain_ratio: 0.3,
            first_month: Month::of(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN)),
            month_span: 12,
        }
    }
}

/// Generate a random deal network using the thread-local RNG.
pub fn generate_random_network(config: &NetworkConfig) -> Result<DealSet, NetworkError> {
    generate_network_with(config, &mut rand::thread_rng())
}

/// Generate a random deal network from the given RNG.
///
/// # Errors
///
/// [`NetworkError::ZeroMonthSpan`] for an empty span, and
/// [`NetworkError::MonthOutOfRange`] when the span reaches a year chrono
/// cannot represent. Nothing is generated in either case.
pub fn generate_network_with(
    config: &NetworkConfig,
    rng: &mut impl Rng,
) -> Result<DealSet, NetworkError> {
    if config.month_span == 0 {
        return Err(NetworkError::ZeroMonthSpan);
    }
    let out_of_range = || NetworkError::MonthOutOfRange {
        first: config.first_month,
        span: config.month_span,
    };
    let last_month = config
        .first_month
        .checked_plus(config.month_span - 1)
        .ok_or_else(out_of_range)?;
    // Every month between two representable ones is representable too.
    if config.first_month.date(28).is_none() || last_month.date(28).is_none() {
        return Err(out_of_range());
    }

    let names: Vec<Name> = (0..config.deal_count)
        .map(|i| Name::new(format!("DEAL-{:05}", i)))
        .collect();
    let outsiders: Vec<Name> = (0..config.outside_referrers)
        .map(|i| Name::new(format!("REFERRER-{:02}", i)))
        .collect();

    let mut set = DealSet::new();
    for (i, name) in names.iter().enumerate() {
        let month = config
            .first_month
            .checked_plus(rng.gen_range(0..config.month_span))
            .ok_or_else(out_of_range)?;
        let close_date = month.date(rng.gen_range(1..=28)).ok_or_else(out_of_range)?;
        let mut deal = Deal::new(name.clone(), close_date);

        if !rng.gen_bool(config.unreferred_ratio.clamp(0.0, 1.0)) {
            let from_outside = !outsiders.is_empty()
                && rng.gen_bool(config.outside_ratio.clamp(0.0, 1.0));
            let referrer = if i == 0 || from_outside {
                outsiders.get(rng.gen_range(0..outsiders.len().max(1))).cloned()
            } else if rng.gen_bool(config.chain_ratio.clamp(0.0, 1.0)) {
                Some(names[i - 1].clone())
            } else {
                Some(names[rng.gen_range(0..i)].clone())
            };
            if let Some(referrer) = referrer {
                deal = deal.with_referrer(referrer);
            }
        }

        set.add(deal)?;
    }

    debug!(
        "generated {} deals over {}..={}",
        set.len(),
        config.first_month,
        last_month
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::engine::AttributionEngine;
    use crate::graph::cycle_detection::find_cycles;
    use crate::graph::referral_map::ReferralMap;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_network_generation() {
        let config = NetworkConfig {
            deal_count: 50,
            ..Default::default()
        };
        let set = generate_random_network(&config).unwrap();
        assert_eq!(set.len(), 50);
        for deal in set.deals() {
            let first = config.first_month;
            let last = first.checked_plus(config.month_span - 1).unwrap();
            assert!(deal.month() >= first && deal.month() <= last);
        }
    }

    #[test]
    fn test_random_network_is_acyclic() {
        let mut rng = StdRng::seed_from_u64(7);
        let set = generate_network_with(
            &NetworkConfig {
                deal_count: 500,
                chain_ratio: 0.9,
                ..Default::default()
            },
            &mut rng,
        )
        .unwrap();
        assert!(find_cycles(&ReferralMap::from_deals(&set)).is_empty());

        let breakdown = AttributionEngine::monthly_breakdown(&set).unwrap();
        assert_eq!(breakdown.total() as usize, set.referred_count());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = NetworkConfig::default();
        let a = generate_network_with(&config, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_network_with(&config, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.deals(), b.deals());
    }

    #[test]
    fn test_no_outsiders_still_generates() {
        let config = NetworkConfig {
            deal_count: 20,
            outside_referrers: 0,
            unreferred_ratio: 0.0,
            ..Default::default()
        };
        let set = generate_random_network(&config).unwrap();
        assert_eq!(set.len(), 20);
        // The first deal has nobody to refer it.
        assert!(set.deals()[0].referred_by().is_none());
        assert_eq!(set.referred_count(), 19);
    }

    #[test]
    fn test_zero_month_span_rejected() {
        let config = NetworkConfig {
            month_span: 0,
            ..Default::default()
        };
        let err = generate_random_network(&config).unwrap_err();
        assert!(matches!(err, NetworkError::ZeroMonthSpan));
    }

    #[test]
    fn test_span_past_calendar_rejected() {
        let config = NetworkConfig {
            deal_count: 1_000,
            month_span: 10_000_000,
            ..Default::default()
        };
        let err = generate_network_with(&config, &mut StdRng::seed_from_u64(3)).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::MonthOutOfRange { span: 10_000_000, .. }
        ));
        assert_eq!(
            err.to_string(),
            "10000000 months from 2024-01 runs past the supported calendar"
        );
    }

    #[test]
    fn test_span_overflowing_year_rejected() {
        let config = NetworkConfig {
            first_month: Month::new(i32::MAX, 6).unwrap(),
            month_span: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            generate_random_network(&config),
            Err(NetworkError::MonthOutOfRange { .. })
        ));
    }

    #[test]
    fn test_span_reaching_last_supported_year() {
        // chrono's last full year is 262142; a span ending there still works.
        let config = NetworkConfig {
            deal_count: 10,
            first_month: Month::new(262_142, 1).unwrap(),
            month_span: 12,
            ..Default::default()
        };
        let set = generate_network_with(&config, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(set.len(), 10);
    }
}
