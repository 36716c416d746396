//! # vend-cloud: Cloud Catalog and Authentication for Vend POS
//!
//! All network I/O lives in this crate.
//!
//! ## Components
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           vend-cloud                                    │
//! │                                                                         │
//! │  ┌───────────────┐   ┌───────────────┐   ┌────────────────────────┐   │
//! │  │ CatalogClient │   │  AuthClient   │   │  CredentialStore       │   │
//! │  │               │   │               │   │                        │   │
//! │  │ GET /products │   │ POST /auth/   │   │ auth_data.json         │   │
//! │  │ /by-barcode/  │   │ token         │   │ load / save / clear    │   │
//! │  │ X-API-Key     │   │ manual POST   │   │ silent re-login        │   │
//! │  │ 5 s timeout   │   │ redirects     │   │                        │   │
//! │  └───────────────┘   └───────────────┘   └────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests block the operator and are bounded by short fixed timeouts;
//! there is no retry, no backoff and no background traffic.

pub mod auth;
pub mod catalog;
pub mod credentials;
pub mod error;

pub use auth::{AuthClient, AuthSession, UserProfile};
pub use catalog::{CatalogClient, CloudProduct};
pub use credentials::{CredentialStore, StoredCredentials};
pub use error::{CloudError, CloudResult};
