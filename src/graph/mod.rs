pub mod cycle_detection;
pub mod referral_map;
