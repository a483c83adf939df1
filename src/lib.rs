//! # Car Store
//!
//! Persists cars to a relational database through a repository bound to a
//! unit of work.
//!
//! ## Architecture
//!
//! - **domain**: the Car entity, engine types and the repository contract
//! - **application**: CSV bulk loading
//! - **infrastructure**: SeaORM entities, migrations, repository and unit of work
//! - **shared**: error types
//! - **config** / **bootstrap**: environment configuration, logging, connection pool

pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::AppConfig;

// Re-export database types for easy access
pub use infrastructure::{
    init_database, shared_connection, CarUnitOfWork, DatabaseConfig, SeaOrmCarRepository,
};
