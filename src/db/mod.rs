pub mod connection;

pub use connection::{create_pool, DbClient, DbPool};
