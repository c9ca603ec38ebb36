pub mod connection;
pub mod matches;
pub mod models;
pub mod players;
pub mod sessions;
pub mod setup;

pub use connection::{create_memory_pool, create_pool, get_connection, open_pool, DbConn, DbPool};
pub use models::*;
