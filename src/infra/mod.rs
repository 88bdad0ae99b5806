pub mod blockchain;
pub mod config;
pub mod metrics;
pub mod relay;

pub use blockchain::{Connection, ConnectionManager};
