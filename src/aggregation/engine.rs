use crate::aggregation::breakdown::Breakdown;
use crate::core::deal::DealSet;
use crate::graph::referral_map::{ReferralMap, ResolveError};
use log::{debug, info};

/// Credits referred deals to the initial referrer of their chain.
pub struct AttributionEngine;

impl AttributionEngine {
    /// Compute the month x initial-referrer breakdown of a deal set.
    ///
    /// Builds a fresh [`ReferralMap`] from the deals and resolves against it.
    /// Use [`monthly_breakdown_with`](Self::monthly_breakdown_with) to keep
    /// the compressed map afterwards.
    pub fn monthly_breakdown(deals: &DealSet) -> Result<Breakdown, ResolveError> {
        let mut referrals = ReferralMap::from_deals(deals);
        Self::monthly_breakdown_with(deals, &mut referrals)
    }

    /// Compute the breakdown, resolving roots through `referrals`.
    ///
    /// # Algorithm
    ///
    /// 1. Skip deals without a referrer; they are never counted, though
    ///    their names may be roots of other chains.
    /// 2. For each referred deal, find the root of its referrer, then point
    ///    the deal's own name straight at that root.
    /// 3. Credit the deal's closing month to that root.
    ///
    /// `referrals` need not hold the deals' own links. The first cycle
    /// encountered, including a deal that names itself, aborts the
    /// computation; no partial breakdown is returned.
    pub fn monthly_breakdown_with(
        deals: &DealSet,
        referrals: &mut ReferralMap,
    ) -> Result<Breakdown, ResolveError> {
        let mut breakdown = Breakdown::new();
        let mut credited = 0usize;

        for deal in deals.referred() {
            let Some(referrer) = deal.referred_by() else {
                continue;
            };
            if referrer == deal.name() {
                return Err(ResolveError::Cycle {
                    start: deal.name().clone(),
                    cycle: vec![deal.name().clone()],
                });
            }
            let root = referrals.find_root(referrer)?;
            referrals.insert(deal.name().clone(), root.clone());
            debug!("{} -> {} ({})", deal.name(), root, deal.month());
            breakdown.credit(deal.month(), root);
            credited += 1;
        }

        info!(
            "credited {} of {} deals across {} months",
            credited,
            deals.len(),
            breakdown.month_count()
        );
        Ok(breakdown)
    }
}
