//! # Domain Types
//!
//! Core domain types used throughout Vend POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Invoice      │   │  InvoiceItem    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  barcode        │   │  number         │   │  invoice_id     │       │
//! │  │  name           │   │  date           │   │  product_id     │       │
//! │  │  price_cents    │   │  total_cents    │   │  quantity       │       │
//! │  │  quantity       │   │  paid           │   │  price_cents    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Entities carry a UUID v4 `id` for database relations; the invoice
//! additionally carries a human-readable `number` for receipts and search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the local inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode (EAN-8, UPC-A, EAN-13, or free-form). Unique when present.
    /// Only transiently absent, e.g. for hand-created items awaiting a label.
    pub barcode: Option<String>,

    /// Display name shown to the operator and on receipts.
    pub name: String,

    /// Unit sale price in cents. Zero means "price not set yet" and blocks
    /// the product from entering a cart.
    pub price_cents: i64,

    /// Purchase cost in cents (for profit analytics).
    pub cost_cents: i64,

    /// On-hand stock. Never persisted negative.
    pub quantity: i64,

    /// Unit-of-measure label ("pcs", "kg", ...).
    pub unit: String,

    /// Optional group tag for inventory organisation.
    pub group_name: Option<String>,

    /// Optional subgroup tag.
    pub subgroup: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the purchase cost as a Money type.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// True when the product still needs an operator-supplied price.
    ///
    /// Cloud-resolved placeholders land with price 0; the cart refuses them
    /// until this returns false.
    #[inline]
    pub fn needs_price(&self) -> bool {
        self.price_cents == 0
    }
}

/// Sort key for inventory listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Name,
    Price,
    Quantity,
}

// =============================================================================
// Invoice
// =============================================================================

/// A persisted sale invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: String,

    /// Human-readable invoice number (`YYYYMMDD-HHMM-NNNN`).
    pub number: String,

    /// Sale date.
    pub date: DateTime<Utc>,

    /// Sum of line totals in cents.
    pub total_cents: i64,

    /// Payment status: true = paid, false = unpaid (on credit).
    pub paid: bool,

    /// Optional free-text note.
    pub note: Option<String>,

    /// Operator who created the invoice, when known.
    pub user_id: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Returns the invoice total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line item in a persisted invoice.
///
/// Price is frozen at time of sale; later product edits never rewrite
/// invoice history. Lines are immutable except through an explicit invoice
/// edit, which deletes and recreates all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub price_cents: i64,
    /// Line total: quantity × unit price.
    pub total_cents: i64,
}

impl InvoiceItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// An invoice line joined with its product's current name and barcode,
/// as returned by the invoice-items query for display and editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceItemDetail {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub total_cents: i64,
    /// Current product name (joined, not frozen).
    pub name: String,
    /// Current product barcode (joined).
    pub barcode: Option<String>,
}

/// An invoice summary row for the history listing: the invoice plus how many
/// lines it contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceSummary {
    pub id: String,
    pub number: String,
    pub date: DateTime<Utc>,
    pub total_cents: i64,
    pub paid: bool,
    pub item_count: i64,
}

// =============================================================================
// Category
// =============================================================================

/// An inventory category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price_cents: i64) -> Product {
        Product {
            id: "p1".to_string(),
            barcode: Some("4870001000011".to_string()),
            name: "Test product".to_string(),
            price_cents,
            cost_cents: 0,
            quantity: 0,
            unit: "pcs".to_string(),
            group_name: None,
            subgroup: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_needs_price() {
        assert!(product(0).needs_price());
        assert!(!product(500).needs_price());
    }

    #[test]
    fn test_money_accessors() {
        let p = product(1099);
        assert_eq!(p.price(), Money::from_cents(1099));
    }

    #[test]
    fn test_product_sort_default() {
        assert_eq!(ProductSort::default(), ProductSort::Name);
    }
}
