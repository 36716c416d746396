//! # Repository Module
//!
//! Database repository implementations for Vend POS.
//!
//! ## Repository Pattern
//! ```text
//! Session / app layer
//!      │   db.products().find_by_barcode("...")
//!      ▼
//! Repository (one per aggregate, SQL isolated here)
//!      │
//!      ▼
//! SQLite
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Inventory CRUD, lookup and search
//! - [`invoice::InvoiceRepository`] - Transactional commit, editing, history
//! - [`analytics::AnalyticsRepository`] - Sales/profit/top-product reports
//! - [`settings::SettingsRepository`] - Key/value settings
//! - [`category::CategoryRepository`] - Categories and product links

pub mod analytics;
pub mod category;
pub mod invoice;
pub mod product;
pub mod settings;
