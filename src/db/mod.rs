//! SQLite persistence: pool setup, schema, and the repository layer.
//!
//! `migrations` owns connection configuration and schema application;
//! `repo` exposes the typed ledger operations built on the resulting pool.

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::{Repository, SaleOutcome, UserRecord};
