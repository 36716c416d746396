//! # Cart Module
//!
//! The in-memory cart for the sale currently being assembled.
//!
//! ## Ownership
//! The cart is a plain owned value held by the active sale session. It is
//! not global state and it is not persisted; it materialises into an invoice
//! plus invoice items on commit, and is cleared on save, cancel and logout.
//!
//! ## Invariants
//! - At most one line per product id: a repeat scan increments the existing
//!   line instead of duplicating it
//! - A zero-priced product never enters the cart (the caller is told to
//!   supply a price first)
//! - Line quantity is at least 1, line price at least 0; edits below those
//!   bounds are rejected without mutating the line
//! - Bounded size: at most [`MAX_CART_LINES`](crate::MAX_CART_LINES) lines,
//!   [`MAX_LINE_QUANTITY`](crate::MAX_LINE_QUANTITY) units per line

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{InvoiceItemDetail, Product};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One pending line in the cart.
///
/// The price is captured when the product is added. If the product record is
/// edited afterwards, the line keeps the price the operator saw at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID).
    pub product_id: String,

    /// Barcode at time of adding.
    pub barcode: Option<String>,

    /// Product name at time of adding.
    pub name: String,

    /// Unit price in cents at time of adding (frozen).
    pub price_cents: i64,

    /// Quantity in the cart.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a cart line for one unit of a product.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id.clone(),
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            price_cents: product.price_cents,
            quantity: 1,
        }
    }

    /// Line total in cents (unit price × quantity).
    #[inline]
    pub fn total_cents(&self) -> i64 {
        self.price_cents * self.quantity
    }

    /// Line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents())
    }
}

impl From<InvoiceItemDetail> for CartLine {
    /// Rebuilds a cart line from a stored invoice line, for invoice editing.
    fn from(item: InvoiceItemDetail) -> Self {
        CartLine {
            product_id: item.product_id,
            barcode: item.barcode,
            name: item.name,
            price_cents: item.price_cents,
            quantity: item.quantity,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart of the sale in progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Rebuilds a cart from stored invoice lines (invoice editing).
    ///
    /// Lines are taken as-is: history is loaded with whatever prices were
    /// committed, the zero-price guard only applies to new scans.
    pub fn load(lines: Vec<CartLine>) -> Self {
        Cart { lines }
    }

    /// Adds one unit of a product, merging with an existing line.
    ///
    /// ## Behavior
    /// - Product already in the cart: quantity += 1 on that line
    /// - Otherwise: a new line with quantity 1 is appended
    ///
    /// ## Errors
    /// - [`CoreError::PriceRequired`] when the product's price is zero; the
    ///   caller must route the operator to the price form first
    /// - [`CoreError::QuantityTooLarge`] / [`CoreError::CartTooLarge`] at the
    ///   bounds
    ///
    /// ## Returns
    /// The index of the affected line.
    pub fn add_product(&mut self, product: &Product) -> CoreResult<usize> {
        if product.needs_price() {
            return Err(CoreError::PriceRequired {
                name: product.name.clone(),
            });
        }

        if let Some(pos) = self.lines.iter().position(|l| l.product_id == product.id) {
            let new_qty = self.lines[pos].quantity + 1;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            self.lines[pos].quantity = new_qty;
            return Ok(pos);
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_product(product));
        Ok(self.lines.len() - 1)
    }

    /// Sets the quantity of the line at `index`.
    ///
    /// Quantities below 1 are rejected; removing a line is an explicit
    /// [`remove`](Cart::remove), never a side effect of an edit.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        if index >= self.lines.len() {
            return Err(CoreError::LineOutOfRange { index });
        }
        if quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        self.lines[index].quantity = quantity;
        Ok(())
    }

    /// Sets the unit price of the line at `index`.
    ///
    /// Negative prices are rejected; zero stays allowed here so an edited
    /// invoice can be corrected down before re-pricing.
    pub fn set_price(&mut self, index: usize, price: Money) -> CoreResult<()> {
        if index >= self.lines.len() {
            return Err(CoreError::LineOutOfRange { index });
        }
        if price.is_negative() {
            return Err(ValidationError::Negative {
                field: "price".to_string(),
            }
            .into());
        }

        self.lines[index].price_cents = price.cents();
        Ok(())
    }

    /// Removes and returns the line at `index`.
    pub fn remove(&mut self, index: usize) -> CoreResult<CartLine> {
        if index >= self.lines.len() {
            return Err(CoreError::LineOutOfRange { index });
        }
        Ok(self.lines.remove(index))
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines, in scan order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Cart total in cents.
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.total_cents()).sum()
    }

    /// Cart total as Money.
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents())
    }

    /// Default payment status for this cart: paid when the total is non-zero,
    /// unpaid (on credit) when it sums to zero. An explicit operator toggle
    /// overrides this at commit time.
    pub fn default_paid(&self) -> bool {
        !self.total().is_zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            barcode: Some(format!("48700010000{}", id)),
            name: format!("Product {}", id),
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
    fn test_add_product() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        let idx = cart.add_product(&product).unwrap();

        assert_eq!(idx, 0);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.total_cents(), 999);
    }

    #[test]
    fn test_repeat_scan_merges_into_one_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_product(&product).unwrap();
        cart.add_product(&product).unwrap();
        cart.add_product(&product).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.lines()[0].total_cents(), 2997);
    }

    #[test]
    fn test_zero_price_product_is_rejected() {
        let mut cart = Cart::new();
        let placeholder = test_product("1", 0);

        let err = cart.add_product(&placeholder).unwrap_err();
        assert!(matches!(err, CoreError::PriceRequired { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_and_default_paid() {
        let mut cart = Cart::new();
        cart.add_product(&test_product("a", 1000)).unwrap();
        cart.add_product(&test_product("a", 1000)).unwrap();
        cart.add_product(&test_product("b", 500)).unwrap();

        // (a, qty 2, 10.00) + (b, qty 1, 5.00) = 25.00, paid
        assert_eq!(cart.total_cents(), 2500);
        assert!(cart.default_paid());
    }

    #[test]
    fn test_empty_cart_is_unpaid_by_default() {
        let cart = Cart::new();
        assert!(!cart.default_paid());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add_product(&test_product("1", 250)).unwrap();

        cart.set_quantity(0, 4).unwrap();
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.total_cents(), 1000);
    }

    #[test]
    fn test_invalid_edits_do_not_mutate() {
        let mut cart = Cart::new();
        cart.add_product(&test_product("1", 250)).unwrap();

        assert!(cart.set_quantity(0, 0).is_err());
        assert!(cart.set_quantity(5, 1).is_err());
        assert!(cart.set_price(0, Money::from_cents(-1)).is_err());

        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.lines()[0].price_cents, 250);
    }

    #[test]
    fn test_set_price_recomputes_total() {
        let mut cart = Cart::new();
        cart.add_product(&test_product("1", 250)).unwrap();
        cart.set_quantity(0, 3).unwrap();

        cart.set_price(0, Money::from_cents(300)).unwrap();
        assert_eq!(cart.total_cents(), 900);
    }

    #[test]
    fn test_remove_by_index() {
        let mut cart = Cart::new();
        cart.add_product(&test_product("1", 100)).unwrap();
        cart.add_product(&test_product("2", 200)).unwrap();

        let removed = cart.remove(0).unwrap();
        assert_eq!(removed.product_id, "1");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_cents(), 200);

        assert!(cart.remove(7).is_err());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_product(&test_product("1", 100)).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_cents(), 0);
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        cart.add_product(&test_product("1", 100)).unwrap();

        let err = cart.set_quantity(0, MAX_LINE_QUANTITY + 1).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_load_keeps_stored_lines_verbatim() {
        let lines = vec![CartLine {
            product_id: "p1".to_string(),
            barcode: None,
            name: "Old line".to_string(),
            price_cents: 150,
            quantity: 2,
        }];

        let cart = Cart::load(lines);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_cents(), 300);
    }
}
