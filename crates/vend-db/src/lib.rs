//! # vend-db: Database Layer for Vend POS
//!
//! This crate provides database access for the Vend POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vend POS Data Flow                              │
//! │                                                                         │
//! │  Sale session (scan / commit / history / analytics)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     vend-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ product       │    │  (embedded)  │  │   │
//! │  │   │   SqlitePool  │    │ invoice       │    │ 001_init.sql │  │   │
//! │  │   │   WAL mode    │    │ analytics ... │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (single local writer)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vend_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/vend.db")).await?;
//! let product = db.products().find_by_barcode("4870001000013").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::analytics::{AnalyticsRepository, ProfitSummary, SalesSummary, TopProduct};
pub use repository::category::CategoryRepository;
pub use repository::invoice::{InvoiceFilter, InvoiceRepository};
pub use repository::product::ProductRepository;
pub use repository::settings::SettingsRepository;
