//! Inventory and sales ledger for a retail egg business.
//!
//! Purchases and sales are normalized onto a common eggs/amount basis
//! (`domain`), pure aggregation derives stock, cost basis, and period
//! reports (`engine`), and the HTTP layer (`api`) serves them per tenant
//! over SQLite persistence (`db`).

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{Money, PaymentMethod, PurchaseEntry, ReportPeriod, SaleEntry};
pub use error::AppError;
