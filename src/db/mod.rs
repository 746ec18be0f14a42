//! Database access layer.
//!
//! - Connection pool setup
//! - The `SqlGateway` seam and its MySQL implementation
//! - Statement text for catalog operations
//! - Row to JSON type mappings

pub mod gateway;
pub mod params;
pub mod pool;
pub mod statements;
pub mod types;

pub use gateway::{MySqlGateway, SqlGateway};
pub use pool::connect;
