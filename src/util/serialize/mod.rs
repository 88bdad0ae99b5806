mod hex;
mod u256;

pub use self::{hex::Hex, u256::U256};
