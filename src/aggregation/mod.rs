pub mod breakdown;
pub mod engine;
