//! # Invoice Repository
//!
//! Database operations for invoices and their line items.
//!
//! ## Commit Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Invoice Commit (one transaction)                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT invoice row (total = Σ line totals, paid flag)               │
//! │    for each cart line:                                                  │
//! │      INSERT invoice_items row (price frozen at scan time)              │
//! │      UPDATE products SET quantity = MAX(quantity - sold, 0)           │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure rolls the whole sale back: stock and invoice lines        │
//! │  can never disagree. Oversell is allowed but stock stops at zero.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Editing a saved invoice replaces all of its lines and rewrites the total
//! and paid flag, also in one transaction, WITHOUT touching stock: an edit
//! is a correction of the record, not a second sale.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use vend_core::{CartLine, Invoice, InvoiceItemDetail, InvoiceSummary};

/// Filter for the invoice history listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InvoiceFilter {
    /// Every invoice in the date range.
    #[default]
    All,
    /// Only paid (true) or unpaid (false) invoices.
    Paid(bool),
    /// Invoice-number substring search.
    NumberLike(String),
}

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Commits a cart as a new invoice.
    ///
    /// Inserts the invoice, inserts every line, and decrements each
    /// product's stock by the sold quantity clamped at zero, all in one
    /// transaction. On any failure the transaction rolls back and the cart
    /// is untouched in the database.
    ///
    /// ## Arguments
    /// * `lines` - Cart lines to persist (must not be empty; the session
    ///   layer guards this)
    /// * `paid` - Payment status after any operator override
    /// * `note` - Optional free-text note
    /// * `user_id` - Operator reference, when authenticated
    pub async fn create(
        &self,
        lines: &[CartLine],
        paid: bool,
        note: Option<&str>,
        user_id: Option<&str>,
    ) -> DbResult<Invoice> {
        let now = Utc::now();
        let total_cents: i64 = lines.iter().map(|l| l.total_cents()).sum();

        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            number: generate_invoice_number(now),
            date: now,
            total_cents,
            paid,
            note: note.map(String::from),
            user_id: user_id.map(String::from),
            created_at: now,
        };

        debug!(id = %invoice.id, number = %invoice.number, total = total_cents, "Committing invoice");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO invoices (id, number, date, total_cents, paid, note, user_id, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&invoice.id)
        .bind(&invoice.number)
        .bind(invoice.date)
        .bind(invoice.total_cents)
        .bind(invoice.paid)
        .bind(&invoice.note)
        .bind(&invoice.user_id)
        .bind(invoice.created_at)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO invoice_items (id, invoice_id, product_id, quantity, price_cents, total_cents) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&invoice.id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.price_cents)
            .bind(line.total_cents())
            .execute(&mut *tx)
            .await?;

            // Clamp at zero: overselling is permitted, negative stock is not.
            let result = sqlx::query(
                "UPDATE products SET \
                    quantity = MAX(quantity - ?2, 0), \
                    updated_at = ?3 \
                 WHERE id = ?1",
            )
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Dropping the transaction rolls everything back.
                return Err(DbError::not_found("Product", line.product_id.as_str()));
            }
        }

        tx.commit().await?;

        Ok(invoice)
    }

    /// Replaces all line items of an existing invoice (invoice editing).
    ///
    /// Rewrites the total and paid flag and recreates the lines from the
    /// session cart in one transaction. Stock is NOT adjusted.
    pub async fn replace_items(
        &self,
        invoice_id: &str,
        lines: &[CartLine],
        paid: bool,
    ) -> DbResult<()> {
        let total_cents: i64 = lines.iter().map(|l| l.total_cents()).sum();

        debug!(id = %invoice_id, total = total_cents, lines = lines.len(), "Rewriting invoice");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE invoices SET total_cents = ?2, paid = ?3 WHERE id = ?1")
            .bind(invoice_id)
            .bind(total_cents)
            .bind(paid)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", invoice_id));
        }

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
            .bind(invoice_id)
            .execute(&mut *tx)
            .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO invoice_items (id, invoice_id, product_id, quantity, price_cents, total_cents) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(invoice_id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.price_cents)
            .bind(line.total_cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets an invoice by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT id, number, date, total_cents, paid, note, user_id, created_at \
             FROM invoices WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets the line items of an invoice, joined with current product name
    /// and barcode for display and for rebuilding the edit cart.
    pub async fn items(&self, invoice_id: &str) -> DbResult<Vec<InvoiceItemDetail>> {
        let items = sqlx::query_as::<_, InvoiceItemDetail>(
            "SELECT ii.id, ii.invoice_id, ii.product_id, ii.quantity, ii.price_cents, \
                    ii.total_cents, p.name, p.barcode \
             FROM invoice_items ii \
             JOIN products p ON ii.product_id = p.id \
             WHERE ii.invoice_id = ?1",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists invoices in an inclusive date range, newest first, with item
    /// counts, optionally narrowed by payment status or number substring.
    pub async fn list_by_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &InvoiceFilter,
    ) -> DbResult<Vec<InvoiceSummary>> {
        const BASE: &str = "SELECT i.id, i.number, i.date, i.total_cents, i.paid, \
                                   COUNT(ii.id) AS item_count \
                            FROM invoices i \
                            LEFT JOIN invoice_items ii ON i.id = ii.invoice_id \
                            WHERE i.date BETWEEN ?1 AND ?2";
        const TAIL: &str = " GROUP BY i.id ORDER BY i.date DESC";

        let summaries = match filter {
            InvoiceFilter::All => {
                let sql = format!("{BASE}{TAIL}");
                sqlx::query_as::<_, InvoiceSummary>(&sql)
                    .bind(start)
                    .bind(end)
                    .fetch_all(&self.pool)
                    .await?
            }
            InvoiceFilter::Paid(paid) => {
                let sql = format!("{BASE} AND i.paid = ?3{TAIL}");
                sqlx::query_as::<_, InvoiceSummary>(&sql)
                    .bind(start)
                    .bind(end)
                    .bind(paid)
                    .fetch_all(&self.pool)
                    .await?
            }
            InvoiceFilter::NumberLike(term) => {
                let sql = format!("{BASE} AND i.number LIKE ?3{TAIL}");
                sqlx::query_as::<_, InvoiceSummary>(&sql)
                    .bind(start)
                    .bind(end)
                    .bind(format!("%{}%", term))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(summaries)
    }

    /// Toggles the paid flag of an invoice.
    pub async fn set_paid(&self, id: &str, paid: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE invoices SET paid = ?2 WHERE id = ?1")
            .bind(id)
            .bind(paid)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }

    /// Deletes an invoice; its line items go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting invoice");

        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }
}

/// Generates an invoice number in format: `YYYYMMDD-HHMM-NNNN`.
///
/// The suffix disambiguates invoices created within the same minute.
fn generate_invoice_number(now: DateTime<Utc>) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!("{}-{:04}", now.format("%Y%m%d-%H%M"), nanos % 10000)
}

// =============================================================================
// Unit Tests
// =============================================================================
