//! # Catalog Client
//!
//! Lookup of unknown barcodes against the cloud product catalog.
//!
//! ## Place in the Resolution Chain
//! ```text
//! scan "4870001000013"
//!      │
//!      ▼
//! local products table ── hit ──► done
//!      │ miss
//!      ▼
//! GET {base}/products/by-barcode/4870001000013   ◄── THIS CLIENT
//!      │ 200: { "barcode": ..., "sku_name": ... }
//!      │ 404: not in the catalog either
//!      ▼
//! placeholder insert / create prompt (session layer)
//! ```
//!
//! One request per scan, 5 second timeout, no retry and no caching of
//! negative lookups; a rescan triggers the chain again.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{CloudError, CloudResult};

/// Catalog request timeout. A scan blocks the operator, so keep it short.
const CATALOG_TIMEOUT_SECS: u64 = 5;

/// Header carrying the opaque bearer token.
pub(crate) const API_KEY_HEADER: &str = "X-API-Key";

/// A product as known to the cloud catalog.
///
/// The catalog is a naming service: it never supplies prices, so resolved
/// products land locally as zero-priced placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudProduct {
    pub barcode: Option<String>,
    #[serde(rename = "sku_name")]
    pub name: String,
}

/// HTTP client for the cloud product catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl CatalogClient {
    /// Creates a catalog client for the given base URL.
    ///
    /// The URL is validated up front so a typo in configuration fails at
    /// startup, not on the first scan.
    pub fn new(base_url: &str) -> CloudResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(CATALOG_TIMEOUT_SECS))
            .build()?;

        Ok(CatalogClient {
            client,
            base_url,
            token: None,
        })
    }

    /// Sets or clears the auth token sent with each request.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Looks a barcode up in the cloud catalog.
    ///
    /// ## Returns
    /// * `Ok(Some(CloudProduct))` - the catalog knows this barcode
    /// * `Ok(None)` - HTTP 404, the catalog does not know it
    /// * `Err(CloudError::Unauthorized)` - HTTP 401/403, token invalid
    /// * `Err(_)` - transport, status or decode failure
    pub async fn lookup(&self, barcode: &str) -> CloudResult<Option<CloudProduct>> {
        let endpoint = format!("{}/products/by-barcode/{}", self.base_url, barcode);
        debug!(barcode = %barcode, "Cloud catalog lookup");

        let mut request = self.client.get(&endpoint);
        if let Some(token) = &self.token {
            request = request.header(API_KEY_HEADER, token);
        }

        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let product: CloudProduct = serde_json::from_str(&body)?;
                debug!(barcode = %barcode, name = %product.name, "Catalog hit");
                Ok(Some(product))
            }
            StatusCode::NOT_FOUND => {
                debug!(barcode = %barcode, "Catalog miss");
                Ok(None)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(barcode = %barcode, "Catalog rejected token");
                Err(CloudError::Unauthorized)
            }
            other => Err(CloudError::Status(other.as_u16())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_parses() {
        let body = r#"{"barcode": "4870001000013", "sku_name": "Mineral water 0.5l"}"#;
        let product: CloudProduct = serde_json::from_str(body).unwrap();

        assert_eq!(product.barcode.as_deref(), Some("4870001000013"));
        assert_eq!(product.name, "Mineral water 0.5l");
    }

    #[test]
    fn test_wire_format_tolerates_extra_fields() {
        let body = r#"{"barcode": "123", "sku_name": "X", "brand": "Acme", "weight_g": 500}"#;
        let product: CloudProduct = serde_json::from_str(body).unwrap();
        assert_eq!(product.name, "X");
    }

    #[test]
    fn test_wire_format_requires_name() {
        let body = r#"{"barcode": "123"}"#;
        assert!(serde_json::from_str::<CloudProduct>(body).is_err());
    }

    #[test]
    fn test_base_url_validation() {
        assert!(CatalogClient::new("https://catalog.example").is_ok());
        // Trailing slash is normalized away
        let client = CatalogClient::new("https://catalog.example/").unwrap();
        assert_eq!(client.base_url, "https://catalog.example");

        assert!(CatalogClient::new("not a url").is_err());
    }
}
