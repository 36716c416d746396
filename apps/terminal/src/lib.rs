//! # Vend Terminal Library
//!
//! The application layer of Vend POS: configuration, the app-boundary
//! error, and the sale session that the binary's prompt loop drives.
//!
//! ## Module Organization
//! ```text
//! vend_terminal/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── session.rs      ◄─── Terminal + SaleSession + scan resolution chain
//! ├── config.rs       ◄─── TOML config, env overrides, data paths
//! └── error.rs        ◄─── AppError for the prompt boundary
//! ```
//!
//! The binary (`main.rs`) only parses flags, wires the pieces together and
//! translates prompt lines into session calls; everything testable lives
//! here or further down the stack.

pub mod config;
pub mod error;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use session::{AnalyticsReport, ScanOutcome, Terminal};
