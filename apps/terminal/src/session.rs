//! # Sale Session
//!
//! The workflow layer: one [`Terminal`] owns the database handle, the cloud
//! clients and the active [`SaleSession`], and every operator action goes
//! through it.
//!
//! ## Scan Resolution Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      scan(barcode)                                      │
//! │                                                                         │
//! │  1. local products table ──── hit ───► cart (or PriceRequired)         │
//! │         │ miss                                                          │
//! │  2. cloud catalog lookup ──── hit ───► zero-priced placeholder saved   │
//! │         │ miss / offline / error       locally ──► PriceRequired        │
//! │  3. Unknown ─────────────────────────► caller prompts product creation │
//! │                                                                         │
//! │  Precedence is strict: local beats cloud beats the create prompt.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Session Ownership
//! The cart belongs to the session, the session to the terminal. Reopening
//! a saved invoice swaps the session into editing mode; save, cancel and
//! logout all reset it. No global state anywhere.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use vend_cloud::{AuthClient, CatalogClient, CredentialStore, StoredCredentials, UserProfile};
use vend_core::validation::{validate_barcode, validate_product_name, validate_stock_quantity};
use vend_core::{Cart, CartLine, CoreError, Invoice, InvoiceItemDetail, InvoiceSummary, Money, Product, ProductSort};
use vend_db::{Database, InvoiceFilter, ProfitSummary, SalesSummary, TopProduct};

// =============================================================================
// Scan Outcome
// =============================================================================

/// What a scan did, for the caller to present.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// The product went into the cart (new line or merged).
    Added {
        name: String,
        /// Quantity on the line after this scan.
        quantity: i64,
    },

    /// The product exists (locally or freshly pulled from the cloud) but has
    /// no price yet; the operator must supply one before it can be sold.
    PriceRequired { product: Product },

    /// Neither the local store nor the catalog knows this barcode; the
    /// caller should offer to create a product seeded with it.
    Unknown { barcode: String },
}

// =============================================================================
// Sale Session
// =============================================================================

/// The in-progress sale: the cart plus edit state.
#[derive(Debug, Default)]
pub struct SaleSession {
    cart: Cart,
    /// When set, saving rewrites this invoice instead of creating one.
    editing_invoice: Option<String>,
    /// Operator's explicit paid/unpaid choice; `None` means derive from
    /// the total at save time.
    paid_override: Option<bool>,
    note: Option<String>,
}

impl SaleSession {
    fn reset(&mut self) {
        self.cart.clear();
        self.editing_invoice = None;
        self.paid_override = None;
        self.note = None;
    }
}

// =============================================================================
// Analytics Report
// =============================================================================

/// Everything the analytics view shows for one date range.
#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    pub sales: SalesSummary,
    pub profit: ProfitSummary,
    pub top_products: Vec<TopProduct>,
}

// =============================================================================
// Terminal
// =============================================================================

/// The running terminal: storage, cloud access and the active session.
pub struct Terminal {
    db: Database,
    catalog: Option<CatalogClient>,
    auth: Option<AuthClient>,
    credentials: CredentialStore,
    user: Option<UserProfile>,
    session: SaleSession,
}

impl Terminal {
    /// Creates a terminal with optional cloud access.
    pub fn new(
        db: Database,
        catalog: Option<CatalogClient>,
        auth: Option<AuthClient>,
        credentials: CredentialStore,
    ) -> Self {
        Terminal {
            db,
            catalog,
            auth,
            credentials,
            user: None,
            session: SaleSession::default(),
        }
    }

    /// Creates an offline terminal (no cloud clients). The scan chain then
    /// goes straight from local miss to the create prompt.
    pub fn offline(db: Database, credentials: CredentialStore) -> Self {
        Terminal::new(db, None, None, credentials)
    }

    /// Direct database access, for listings the session does not mediate.
    pub fn db(&self) -> &Database {
        &self.db
    }

    // -------------------------------------------------------------------------
    // Authentication
    // -------------------------------------------------------------------------

    /// Restores a stored login from the credential file, if present.
    /// Returns true when a token was restored.
    pub fn restore_login(&mut self) -> bool {
        let Some(stored) = self.credentials.load() else {
            return false;
        };

        if let Some(catalog) = &mut self.catalog {
            catalog.set_token(Some(stored.token.clone()));
        }
        self.user = stored.user;
        info!("Restored stored login");
        true
    }

    /// Logs in against the cloud account service and persists the session.
    pub async fn login(&mut self, username: &str, password: &str) -> AppResult<()> {
        let auth = self.auth.as_ref().ok_or(AppError::CloudNotConfigured)?;

        let session = auth.login(username, password).await?;

        self.credentials.save(&StoredCredentials {
            token: session.access_token.clone(),
            user: session.user.clone(),
        })?;

        if let Some(catalog) = &mut self.catalog {
            catalog.set_token(Some(session.access_token.clone()));
        }
        self.user = session.user;
        info!(username = %username, "Logged in");
        Ok(())
    }

    /// Logs out: deletes the credential file, drops the token and resets
    /// the session (the cart does not survive a logout).
    pub fn logout(&mut self) -> AppResult<()> {
        self.credentials.clear()?;
        if let Some(catalog) = &mut self.catalog {
            catalog.set_token(None);
        }
        self.user = None;
        self.session.reset();
        info!("Logged out");
        Ok(())
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    // -------------------------------------------------------------------------
    // Scanning
    // -------------------------------------------------------------------------

    /// Resolves a scanned or typed barcode and, when possible, adds one
    /// unit to the cart. See the module docs for the chain.
    pub async fn scan(&mut self, barcode: &str) -> AppResult<ScanOutcome> {
        let barcode = barcode.trim();
        validate_barcode(barcode)?;

        // Step 1: local store always wins.
        if let Some(product) = self.db.products().find_by_barcode(barcode).await? {
            return self.add_to_cart(product);
        }

        // Step 2: cloud catalog, when configured. A lookup failure degrades
        // to the create prompt; the operator is mid-sale and a stuck scan
        // helps nobody.
        if let Some(catalog) = &self.catalog {
            match catalog.lookup(barcode).await {
                Ok(Some(cloud)) => {
                    let code = cloud.barcode.as_deref().unwrap_or(barcode);
                    let product = self
                        .db
                        .products()
                        .insert_placeholder(code, &cloud.name)
                        .await?;
                    info!(barcode = %code, name = %product.name, "Saved placeholder from catalog");
                    return Ok(ScanOutcome::PriceRequired { product });
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(barcode = %barcode, %err, "Catalog lookup failed, treating as unknown");
                }
            }
        }

        // Step 3: nobody knows this barcode.
        Ok(ScanOutcome::Unknown {
            barcode: barcode.to_string(),
        })
    }

    /// Adds one unit of a known product to the cart.
    ///
    /// A zero-priced product comes back as [`ScanOutcome::PriceRequired`]
    /// instead of an error: it is a normal fork in the scan flow.
    pub fn add_to_cart(&mut self, product: Product) -> AppResult<ScanOutcome> {
        match self.session.cart.add_product(&product) {
            Ok(index) => {
                let line = &self.session.cart.lines()[index];
                debug!(name = %line.name, quantity = line.quantity, "Added to cart");
                Ok(ScanOutcome::Added {
                    name: line.name.clone(),
                    quantity: line.quantity,
                })
            }
            Err(CoreError::PriceRequired { .. }) => Ok(ScanOutcome::PriceRequired { product }),
            Err(err) => Err(err.into()),
        }
    }

    // -------------------------------------------------------------------------
    // Cart Edits
    // -------------------------------------------------------------------------

    /// The current cart, read-only.
    pub fn cart(&self) -> &Cart {
        &self.session.cart
    }

    /// Sets the quantity of a cart line (index into the cart).
    pub fn set_line_quantity(&mut self, index: usize, quantity: i64) -> AppResult<()> {
        self.session.cart.set_quantity(index, quantity)?;
        Ok(())
    }

    /// Sets the unit price of a cart line.
    pub fn set_line_price(&mut self, index: usize, price: Money) -> AppResult<()> {
        self.session.cart.set_price(index, price)?;
        Ok(())
    }

    /// Removes a cart line.
    pub fn remove_line(&mut self, index: usize) -> AppResult<CartLine> {
        Ok(self.session.cart.remove(index)?)
    }

    /// Sets or clears the explicit paid/unpaid choice for this sale.
    pub fn set_paid_override(&mut self, paid: Option<bool>) {
        self.session.paid_override = paid;
    }

    /// Sets or clears the invoice note.
    pub fn set_note(&mut self, note: Option<String>) {
        self.session.note = note;
    }

    /// The invoice currently being edited, if any.
    pub fn editing_invoice(&self) -> Option<&str> {
        self.session.editing_invoice.as_deref()
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Saves the session.
    ///
    /// A fresh sale commits a new invoice (decrementing stock, clamped at
    /// zero). An edit session rewrites the opened invoice's lines without
    /// touching stock. Either way the session resets afterwards.
    pub async fn save(&mut self) -> AppResult<Invoice> {
        if self.session.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let paid = self
            .session
            .paid_override
            .unwrap_or_else(|| self.session.cart.default_paid());

        let invoice = match self.session.editing_invoice.clone() {
            Some(invoice_id) => {
                self.db
                    .invoices()
                    .replace_items(&invoice_id, self.session.cart.lines(), paid)
                    .await?;
                self.db
                    .invoices()
                    .get_by_id(&invoice_id)
                    .await?
                    .ok_or_else(|| vend_db::DbError::not_found("Invoice", invoice_id.as_str()))?
            }
            None => {
                let user_id = self
                    .user
                    .as_ref()
                    .and_then(|u| u.id.clone().or_else(|| u.username.clone()));
                self.db
                    .invoices()
                    .create(
                        self.session.cart.lines(),
                        paid,
                        self.session.note.as_deref(),
                        user_id.as_deref(),
                    )
                    .await?
            }
        };

        info!(number = %invoice.number, total = %invoice.total(), paid = invoice.paid, "Invoice saved");
        self.session.reset();
        Ok(invoice)
    }

    /// Reopens a saved invoice for editing: its lines become the cart, its
    /// paid flag becomes the override, and the next save rewrites it.
    pub async fn open_invoice(&mut self, invoice_id: &str) -> AppResult<Invoice> {
        let invoice = self
            .db
            .invoices()
            .get_by_id(invoice_id)
            .await?
            .ok_or_else(|| vend_db::DbError::not_found("Invoice", invoice_id))?;

        let items = self.db.invoices().items(invoice_id).await?;

        self.session.cart = Cart::load(items.into_iter().map(CartLine::from).collect());
        self.session.editing_invoice = Some(invoice.id.clone());
        self.session.paid_override = Some(invoice.paid);
        self.session.note = invoice.note.clone();

        info!(number = %invoice.number, "Opened invoice for editing");
        Ok(invoice)
    }

    /// Abandons the current sale or edit without saving.
    pub fn cancel(&mut self) {
        debug!("Session cancelled");
        self.session.reset();
    }

    // -------------------------------------------------------------------------
    // Inventory
    // -------------------------------------------------------------------------

    /// Creates a product from validated input and returns it.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_product(
        &self,
        barcode: &str,
        name: &str,
        price: Money,
        cost: Money,
        quantity: i64,
        unit: &str,
    ) -> AppResult<Product> {
        let barcode = barcode.trim();
        let name = name.trim();

        validate_barcode(barcode)?;
        validate_product_name(name)?;
        validate_stock_quantity(quantity)?;
        if price.is_negative() || cost.is_negative() {
            return Err(vend_core::ValidationError::Negative {
                field: "price".to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let unit = if unit.trim().is_empty() { "pcs" } else { unit.trim() };
        let product = Product {
            id: uuid::Uuid::new_v4().to_string(),
            barcode: Some(barcode.to_string()),
            name: name.to_string(),
            price_cents: price.cents(),
            cost_cents: cost.cents(),
            quantity,
            unit: unit.to_string(),
            group_name: None,
            subgroup: None,
            created_at: now,
            updated_at: now,
        };

        self.db.products().insert(&product).await?;
        info!(name = %product.name, barcode = %barcode, "Product created");
        Ok(product)
    }

    /// Gives a price to a (typically placeholder) product, by barcode.
    pub async fn price_product(&self, barcode: &str, price: Money) -> AppResult<Product> {
        if price.is_negative() {
            return Err(vend_core::ValidationError::Negative {
                field: "price".to_string(),
            }
            .into());
        }

        let mut product = self
            .db
            .products()
            .find_by_barcode(barcode.trim())
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(barcode.to_string()))?;

        product.price_cents = price.cents();
        self.db.products().update(&product).await?;
        info!(name = %product.name, price = %price, "Product priced");
        Ok(product)
    }

    /// Sets a product's purchase cost (for profit analytics), by barcode.
    pub async fn cost_product(&self, barcode: &str, cost: Money) -> AppResult<Product> {
        if cost.is_negative() {
            return Err(vend_core::ValidationError::Negative {
                field: "cost".to_string(),
            }
            .into());
        }

        let mut product = self
            .db
            .products()
            .find_by_barcode(barcode.trim())
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(barcode.to_string()))?;

        product.cost_cents = cost.cents();
        self.db.products().update(&product).await?;
        Ok(product)
    }

    /// Sets a product's on-hand stock to an absolute value, by barcode.
    pub async fn restock(&self, barcode: &str, quantity: i64) -> AppResult<Product> {
        validate_stock_quantity(quantity)?;

        let product = self
            .db
            .products()
            .find_by_barcode(barcode.trim())
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(barcode.to_string()))?;

        self.db.products().set_quantity(&product.id, quantity).await?;
        Ok(Product { quantity, ..product })
    }

    /// Inventory listing with a sort key.
    pub async fn inventory(&self, sort: ProductSort, limit: u32) -> AppResult<Vec<Product>> {
        Ok(self.db.products().list(sort, limit).await?)
    }

    /// Inventory search over name and barcode.
    pub async fn search_products(&self, term: &str, limit: u32) -> AppResult<Vec<Product>> {
        Ok(self.db.products().search(term, limit).await?)
    }

    // -------------------------------------------------------------------------
    // History & Analytics
    // -------------------------------------------------------------------------

    /// Invoice history for an inclusive date range.
    pub async fn invoice_history(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &InvoiceFilter,
    ) -> AppResult<Vec<InvoiceSummary>> {
        Ok(self.db.invoices().list_by_period(start, end, filter).await?)
    }

    /// Lines of a saved invoice.
    pub async fn invoice_items(&self, invoice_id: &str) -> AppResult<Vec<InvoiceItemDetail>> {
        Ok(self.db.invoices().items(invoice_id).await?)
    }

    /// Deletes a saved invoice and its lines.
    pub async fn delete_invoice(&self, invoice_id: &str) -> AppResult<()> {
        Ok(self.db.invoices().delete(invoice_id).await?)
    }

    /// Flips the paid flag on a saved invoice.
    pub async fn set_invoice_paid(&self, invoice_id: &str, paid: bool) -> AppResult<()> {
        Ok(self.db.invoices().set_paid(invoice_id, paid).await?)
    }

    /// The full analytics view for a date range.
    pub async fn analytics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        top_n: u32,
    ) -> AppResult<AnalyticsReport> {
        let analytics = self.db.analytics();
        Ok(AnalyticsReport {
            sales: analytics.sales_summary(start, end).await?,
            profit: analytics.profit_summary(start, end).await?,
            top_products: analytics.top_products(start, end, top_n).await?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use vend_db::DbConfig;

    async fn offline_terminal() -> Terminal {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let creds = CredentialStore::new(
            std::env::temp_dir().join(format!("vend-term-test-{}.json", uuid::Uuid::new_v4())),
        );
        Terminal::offline(db, creds)
    }

    #[tokio::test]
    async fn test_scan_unknown_barcode_prompts_creation() {
        let mut terminal = offline_terminal().await;

        let outcome = terminal.scan("4870001000013").await.unwrap();
        assert!(matches!(outcome, ScanOutcome::Unknown { ref barcode } if barcode == "4870001000013"));
        assert!(terminal.cart().is_empty());
    }

    #[tokio::test]
    async fn test_scan_invalid_barcode_is_rejected() {
        let mut terminal = offline_terminal().await;
        assert!(terminal.scan("12a").await.is_err());
    }

    #[tokio::test]
    async fn test_scan_local_product_merges_lines() {
        let mut terminal = offline_terminal().await;
        terminal
            .create_product("4870001000013", "Tea", Money::from_cents(300), Money::zero(), 10, "pcs")
            .await
            .unwrap();

        let first = terminal.scan("4870001000013").await.unwrap();
        assert!(matches!(first, ScanOutcome::Added { quantity: 1, .. }));

        let second = terminal.scan("4870001000013").await.unwrap();
        assert!(matches!(second, ScanOutcome::Added { quantity: 2, .. }));

        assert_eq!(terminal.cart().len(), 1);
        assert_eq!(terminal.cart().total_cents(), 600);
    }

    #[tokio::test]
    async fn test_zero_priced_product_needs_price_then_sells() {
        let mut terminal = offline_terminal().await;
        terminal
            .db()
            .products()
            .insert_placeholder("4870001000099", "Cloud thing")
            .await
            .unwrap();

        let outcome = terminal.scan("4870001000099").await.unwrap();
        assert!(matches!(outcome, ScanOutcome::PriceRequired { .. }));
        assert!(terminal.cart().is_empty());

        terminal
            .price_product("4870001000099", Money::from_cents(450))
            .await
            .unwrap();

        let outcome = terminal.scan("4870001000099").await.unwrap();
        assert!(matches!(outcome, ScanOutcome::Added { .. }));
        assert_eq!(terminal.cart().total_cents(), 450);
    }

    #[tokio::test]
    async fn test_save_commits_and_resets_session() {
        let mut terminal = offline_terminal().await;
        let product = terminal
            .create_product("11111111", "Tea", Money::from_cents(1000), Money::zero(), 5, "pcs")
            .await
            .unwrap();

        terminal.scan("11111111").await.unwrap();
        terminal.scan("11111111").await.unwrap();
        terminal.set_note(Some("counter sale".to_string()));

        let invoice = terminal.save().await.unwrap();
        assert_eq!(invoice.total_cents, 2000);
        assert!(invoice.paid);
        assert_eq!(invoice.note.as_deref(), Some("counter sale"));

        // Session reset, stock decremented
        assert!(terminal.cart().is_empty());
        assert!(terminal.editing_invoice().is_none());
        let after = terminal.db().products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 3);
    }

    #[tokio::test]
    async fn test_save_empty_cart_is_an_error() {
        let mut terminal = offline_terminal().await;
        let err = terminal.save().await.unwrap_err();
        assert!(matches!(err, AppError::Core(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_paid_override_beats_computed_status() {
        let mut terminal = offline_terminal().await;
        terminal
            .create_product("11111111", "Tea", Money::from_cents(1000), Money::zero(), 5, "pcs")
            .await
            .unwrap();

        terminal.scan("11111111").await.unwrap();
        terminal.set_paid_override(Some(false));

        let invoice = terminal.save().await.unwrap();
        assert_eq!(invoice.total_cents, 1000);
        assert!(!invoice.paid, "explicit unpaid wins over non-zero total");
    }

    #[tokio::test]
    async fn test_edit_flow_rewrites_invoice() {
        let mut terminal = offline_terminal().await;
        terminal
            .create_product("11111111", "Tea", Money::from_cents(1000), Money::zero(), 50, "pcs")
            .await
            .unwrap();
        terminal
            .create_product("22222222", "Coffee", Money::from_cents(500), Money::zero(), 50, "pcs")
            .await
            .unwrap();

        terminal.scan("11111111").await.unwrap();
        let original = terminal.save().await.unwrap();

        // Reopen, adjust the line and add another product
        terminal.open_invoice(&original.id).await.unwrap();
        assert_eq!(terminal.editing_invoice(), Some(original.id.as_str()));
        assert_eq!(terminal.cart().len(), 1);

        terminal.set_line_quantity(0, 3).unwrap();
        terminal.scan("22222222").await.unwrap();

        let updated = terminal.save().await.unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.total_cents, 3500);

        let items = terminal.invoice_items(&original.id).await.unwrap();
        assert_eq!(items.len(), 2);

        // Editing is not a second sale: Tea stock only reflects the original commit.
        let tea = terminal
            .db()
            .products()
            .find_by_barcode("11111111")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tea.quantity, 49);
    }

    #[tokio::test]
    async fn test_cancel_abandons_edit() {
        let mut terminal = offline_terminal().await;
        terminal
            .create_product("11111111", "Tea", Money::from_cents(1000), Money::zero(), 50, "pcs")
            .await
            .unwrap();
        terminal.scan("11111111").await.unwrap();
        let invoice = terminal.save().await.unwrap();

        terminal.open_invoice(&invoice.id).await.unwrap();
        terminal.set_line_quantity(0, 9).unwrap();
        terminal.cancel();

        assert!(terminal.cart().is_empty());
        assert!(terminal.editing_invoice().is_none());

        let stored = terminal.db().invoices().get_by_id(&invoice.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 1000);
    }

    #[tokio::test]
    async fn test_logout_clears_cart() {
        let mut terminal = offline_terminal().await;
        terminal
            .create_product("11111111", "Tea", Money::from_cents(1000), Money::zero(), 50, "pcs")
            .await
            .unwrap();
        terminal.scan("11111111").await.unwrap();
        assert!(!terminal.cart().is_empty());

        terminal.logout().unwrap();
        assert!(terminal.cart().is_empty());
        assert!(terminal.current_user().is_none());
    }

    #[tokio::test]
    async fn test_login_without_cloud_is_configured_error() {
        let mut terminal = offline_terminal().await;
        let err = terminal.login("user", "pass").await.unwrap_err();
        assert!(matches!(err, AppError::CloudNotConfigured));
    }

    #[tokio::test]
    async fn test_restock_and_inventory() {
        let terminal = offline_terminal().await;
        terminal
            .create_product("11111111", "Tea", Money::from_cents(1000), Money::zero(), 2, "pcs")
            .await
            .unwrap();

        let restocked = terminal.restock("11111111", 40).await.unwrap();
        assert_eq!(restocked.quantity, 40);

        let listed = terminal.inventory(ProductSort::Quantity, 10).await.unwrap();
        assert_eq!(listed[0].quantity, 40);

        assert!(terminal.restock("99999999", 1).await.is_err());
    }

    #[tokio::test]
    async fn test_cost_product_feeds_profit() {
        let terminal = offline_terminal().await;
        terminal
            .create_product("11111111", "Tea", Money::from_cents(1000), Money::zero(), 5, "pcs")
            .await
            .unwrap();

        let updated = terminal
            .cost_product("11111111", Money::from_cents(600))
            .await
            .unwrap();
        assert_eq!(updated.cost_cents, 600);

        assert!(terminal
            .cost_product("11111111", Money::from_cents(-5))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_analytics_report_covers_sales() {
        let mut terminal = offline_terminal().await;
        terminal
            .create_product("11111111", "Tea", Money::from_cents(1000), Money::from_cents(600), 50, "pcs")
            .await
            .unwrap();
        terminal.scan("11111111").await.unwrap();
        terminal.save().await.unwrap();

        let start = Utc::now() - chrono::Duration::days(1);
        let end = Utc::now() + chrono::Duration::minutes(1);
        let report = terminal.analytics(start, end, 5).await.unwrap();

        assert_eq!(report.sales.invoice_count, 1);
        assert_eq!(report.sales.total_cents, 1000);
        assert_eq!(report.profit.profit_cents, 400);
        assert_eq!(report.top_products.len(), 1);
        assert_eq!(report.top_products[0].name, "Tea");
    }
}
