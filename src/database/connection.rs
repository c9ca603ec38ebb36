use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;

use super::setup::init_database;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

pub fn create_pool(database_path: &str) -> Result<DbPool> {
    let manager = build_manager(database_path);
    build_pool(manager, None)
}

/// Opens the pool and makes sure the schema exists.
pub fn open_pool(database_path: &str) -> Result<DbPool> {
    let pool = create_pool(database_path)?;
    initialize(&pool)?;
    Ok(pool)
}

/// Single-connection in-memory pool; every connection to `:memory:` would
/// otherwise see its own empty database.
pub fn create_memory_pool() -> Result<DbPool> {
    let pool = build_pool(SqliteConnectionManager::memory(), Some(1))?;
    initialize(&pool)?;
    Ok(pool)
}

fn build_manager(path: &str) -> SqliteConnectionManager {
    SqliteConnectionManager::file(path)
}

fn build_pool(manager: SqliteConnectionManager, max_size: Option<u32>) -> Result<DbPool> {
    let mut builder = r2d2::Pool::builder();
    if let Some(max_size) = max_size {
        builder = builder.max_size(max_size);
    }
    builder
        .build(manager)
        .context("Failed to create database connection pool")
}

fn initialize(pool: &DbPool) -> Result<()> {
    let conn = get_connection(pool)?;
    init_database(&conn)
}

pub fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get()
        .context("Failed to get database connection from pool")
}
