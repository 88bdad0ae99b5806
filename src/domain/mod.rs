pub mod account;
pub mod eth;
pub mod wrap;
