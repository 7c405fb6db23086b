pub mod deal;
pub mod month;
pub mod name;
