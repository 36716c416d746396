//! # Vend Terminal Entry Point
//!
//! A line-oriented front end over the sale session. A production build
//! would put a touch GUI here; the workflows underneath are identical.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (flags > env > TOML file > defaults)
//! 3. Open the database & run migrations
//! 4. Build cloud clients when an API URL is configured
//! 5. Restore a stored login, if any
//! 6. Read commands until `quit`

use chrono::{DateTime, Duration, NaiveTime, Utc};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vend_cloud::{AuthClient, CatalogClient, CredentialStore};
use vend_core::{Money, ProductSort};
use vend_db::{Database, DbConfig, InvoiceFilter};
use vend_terminal::{AppConfig, AppError, ScanOutcome, Terminal};

/// Vend POS terminal.
#[derive(Debug, Parser)]
#[command(name = "vend-terminal", version, about = "Vend POS terminal")]
struct Args {
    /// Database file path (overrides config and VEND_DB_PATH).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Cloud API base URL (overrides config and VEND_API_URL).
    #[arg(long)]
    api_url: Option<String>,

    /// Explicit config file instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run(Args::parse()).await {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    // Flags beat env beats file beats defaults.
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };
    if let Some(db) = args.db {
        config.database.path = Some(db);
    }
    if let Some(url) = args.api_url {
        config.cloud.base_url = Some(url);
    }

    let db_path = config.database_path()?;
    info!(path = %db_path.display(), "Opening database");
    let db = Database::new(DbConfig::new(db_path)).await?;

    // The settings table can carry an instance-local URL override for
    // terminals whose config files are centrally managed.
    let base_url = match config.cloud.base_url.clone() {
        Some(url) => Some(url),
        None => db.settings().get("catalog_base_url").await?,
    };

    let (catalog, auth) = match &base_url {
        Some(url) => {
            info!(url = %url, "Cloud API configured");
            (Some(CatalogClient::new(url)?), Some(AuthClient::new(url)?))
        }
        None => {
            info!("No cloud API configured, running offline");
            (None, None)
        }
    };

    let credentials = CredentialStore::new(config.credentials_path()?);
    let mut terminal = Terminal::new(db, catalog, auth, credentials);

    if terminal.restore_login() {
        let who = terminal
            .current_user()
            .and_then(|u| u.username.clone())
            .unwrap_or_else(|| "operator".to_string());
        println!("Welcome back, {who}.");
    }

    println!("Vend POS terminal. Type 'help' for commands.");
    repl(&mut terminal).await;

    terminal.db().close().await;
    Ok(())
}

/// Reads prompt lines until quit/EOF, dispatching each to the session.
async fn repl(terminal: &mut Terminal) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        if stdout.write_all(b"vend> ").await.is_err() || stdout.flush().await.is_err() {
            return;
        }

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => return, // EOF
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            return;
        }

        if let Err(err) = dispatch(terminal, line).await {
            println!("error: {err}");
        }
    }
}

/// Parses one command line and runs it.
async fn dispatch(terminal: &mut Terminal, line: &str) -> Result<(), AppError> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match command {
        "help" => print_help(),

        // --- sale -----------------------------------------------------------
        "scan" => {
            let outcome = terminal.scan(rest).await?;
            print_outcome(&outcome);
            print_cart(terminal);
        }
        "cart" => print_cart(terminal),
        "qty" => {
            let (index, quantity) = parse_index_and(rest)?;
            terminal.set_line_quantity(index, quantity)?;
            print_cart(terminal);
        }
        "price" => {
            let (index, amount) = parse_index_and_money(rest)?;
            terminal.set_line_price(index, amount)?;
            print_cart(terminal);
        }
        "remove" => {
            let index = parse_index(rest)?;
            let line = terminal.remove_line(index)?;
            println!("removed: {}", line.name);
            print_cart(terminal);
        }
        "note" => {
            if rest.is_empty() {
                terminal.set_note(None);
                println!("note cleared");
            } else {
                terminal.set_note(Some(rest.to_string()));
            }
        }
        "paid" => match rest {
            "on" => terminal.set_paid_override(Some(true)),
            "off" => terminal.set_paid_override(Some(false)),
            "auto" => terminal.set_paid_override(None),
            _ => println!("usage: paid on|off|auto"),
        },
        "save" => {
            let invoice = terminal.save().await?;
            let status = if invoice.paid { "paid" } else { "unpaid" };
            println!(
                "invoice {} saved: total {} ({status})",
                invoice.number,
                invoice.total()
            );
        }
        "cancel" => {
            terminal.cancel();
            println!("session cleared");
        }

        // --- inventory ------------------------------------------------------
        "new" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            let (barcode, price, name) = match (parts.next(), parts.next(), parts.next()) {
                (Some(b), Some(p), Some(n)) => (b, p, n),
                _ => {
                    println!("usage: new <barcode> <price> <name>");
                    return Ok(());
                }
            };
            let price = Money::parse(price)?;
            let product = terminal
                .create_product(barcode, name, price, Money::zero(), 0, "pcs")
                .await?;
            println!("created: {} @ {}", product.name, product.price());
            // Straight into the current sale, same as scanning it would be.
            if !product.needs_price() {
                let outcome = terminal.add_to_cart(product)?;
                print_outcome(&outcome);
            }
        }
        "setprice" => {
            let (barcode, amount) = parse_word_and_money(rest)?;
            let product = terminal.price_product(&barcode, amount).await?;
            println!("{} now costs {}", product.name, product.price());
        }
        "setcost" => {
            let (barcode, amount) = parse_word_and_money(rest)?;
            let product = terminal.cost_product(&barcode, amount).await?;
            println!("{} cost price set to {}", product.name, product.cost());
        }
        "restock" => {
            let (barcode, quantity) = parse_word_and(rest)?;
            let product = terminal.restock(&barcode, quantity).await?;
            println!("{}: {} {} on hand", product.name, product.quantity, product.unit);
        }
        "products" => {
            let sort = match rest {
                "price" => ProductSort::Price,
                "stock" | "quantity" => ProductSort::Quantity,
                _ => ProductSort::Name,
            };
            print_products(&terminal.inventory(sort, 100).await?);
        }
        "find" => {
            print_products(&terminal.search_products(rest, 50).await?);
        }

        // --- history --------------------------------------------------------
        "invoices" => {
            let mut days = 30i64;
            let mut filter = InvoiceFilter::All;
            for word in rest.split_whitespace() {
                match word {
                    "paid" => filter = InvoiceFilter::Paid(true),
                    "unpaid" => filter = InvoiceFilter::Paid(false),
                    w => match w.parse::<i64>() {
                        Ok(n) => days = n,
                        Err(_) => filter = InvoiceFilter::NumberLike(w.to_string()),
                    },
                }
            }
            let (start, end) = day_range(days);
            let summaries = terminal.invoice_history(start, end, &filter).await?;
            if summaries.is_empty() {
                println!("no invoices found");
            }
            for s in summaries {
                let status = if s.paid { "paid" } else { "unpaid" };
                println!(
                    "{}  {}  {:>10}  {:>2} items  {status}  [{}]",
                    s.number,
                    s.date.format("%d.%m.%Y %H:%M"),
                    Money::from_cents(s.total_cents).to_string(),
                    s.item_count,
                    s.id
                );
            }
        }
        "open" => {
            let invoice = terminal.open_invoice(rest).await?;
            println!("editing invoice {} (save rewrites it)", invoice.number);
            print_cart(terminal);
        }
        "items" => {
            for item in terminal.invoice_items(rest).await? {
                println!(
                    "{}  {} x {} = {}",
                    item.name,
                    item.quantity,
                    Money::from_cents(item.price_cents),
                    Money::from_cents(item.total_cents)
                );
            }
        }
        "markpaid" => {
            let (id, flag) = match rest.rsplit_once(char::is_whitespace) {
                Some((id, flag)) => (id.trim(), flag),
                None => {
                    println!("usage: markpaid <invoice-id> on|off");
                    return Ok(());
                }
            };
            terminal.set_invoice_paid(id, flag == "on").await?;
            println!("ok");
        }
        "delinv" => {
            terminal.delete_invoice(rest).await?;
            println!("invoice deleted");
        }

        // --- analytics ------------------------------------------------------
        "report" => {
            let days = rest.parse::<i64>().unwrap_or(30);
            let (start, end) = day_range(days);
            let report = terminal.analytics(start, end, 5).await?;
            print_report(&report, days);
        }

        // --- account --------------------------------------------------------
        "login" => {
            let (username, password) = match rest.split_once(char::is_whitespace) {
                Some((u, p)) => (u, p.trim()),
                None => {
                    println!("usage: login <username> <password>");
                    return Ok(());
                }
            };
            terminal.login(username, password).await?;
            println!("logged in");
        }
        "logout" => {
            terminal.logout()?;
            println!("logged out");
        }
        "whoami" => match terminal.current_user() {
            Some(user) => println!(
                "{}",
                user.username.as_deref().or(user.id.as_deref()).unwrap_or("operator")
            ),
            None => println!("not logged in"),
        },

        other => println!("unknown command '{other}', try 'help'"),
    }

    Ok(())
}

// =============================================================================
// Output helpers
// =============================================================================

fn print_help() {
    println!("sale:      scan <barcode> | cart | qty <n> <q> | price <n> <amount> | remove <n>");
    println!("           note [text] | paid on|off|auto | save | cancel");
    println!("inventory: new <barcode> <price> <name> | setprice <barcode> <amount>");
    println!("           setcost <barcode> <amount> | restock <barcode> <qty>");
    println!("           products [price|stock] | find <term>");
    println!("history:   invoices [days] [paid|unpaid|number] | open <id> | items <id>");
    println!("           markpaid <id> on|off | delinv <id>");
    println!("analytics: report [days]");
    println!("account:   login <user> <pass> | logout | whoami");
    println!("quit");
}

fn print_outcome(outcome: &ScanOutcome) {
    match outcome {
        ScanOutcome::Added { name, quantity } => {
            if *quantity > 1 {
                println!("added: {name} (x{quantity})");
            } else {
                println!("added: {name}");
            }
        }
        ScanOutcome::PriceRequired { product } => {
            let code = product.barcode.as_deref().unwrap_or("?");
            println!(
                "'{}' has no price yet; run: setprice {} <amount>, then scan again",
                product.name, code
            );
        }
        ScanOutcome::Unknown { barcode } => {
            println!("barcode {barcode} not found; create it with: new {barcode} <price> <name>");
        }
    }
}

fn print_cart(terminal: &Terminal) {
    let cart = terminal.cart();
    if cart.is_empty() {
        println!("(cart is empty)");
        return;
    }
    for (i, line) in cart.lines().iter().enumerate() {
        println!(
            "{:>2}. {}  {} x {} = {}",
            i + 1,
            line.name,
            line.quantity,
            Money::from_cents(line.price_cents),
            line.total()
        );
    }
    println!("TOTAL: {}", cart.total());
    if let Some(id) = terminal.editing_invoice() {
        println!("(editing invoice {id})");
    }
}

fn print_products(products: &[vend_core::Product]) {
    if products.is_empty() {
        println!("no products");
        return;
    }
    for p in products {
        let price = if p.needs_price() {
            "no price".to_string()
        } else {
            p.price().to_string()
        };
        println!(
            "{}  {}  {}  stock {} {}",
            p.barcode.as_deref().unwrap_or("-"),
            p.name,
            price,
            p.quantity,
            p.unit
        );
    }
}

fn print_report(report: &vend_terminal::AnalyticsReport, days: i64) {
    println!("--- last {days} days ---");
    if report.sales.is_empty() {
        println!("no sales in this period");
        return;
    }
    println!("total sales:     {}", report.sales.total());
    println!("invoices:        {}", report.sales.invoice_count);
    println!("average invoice: {}", Money::from_cents(report.sales.average_cents));
    println!("paid:            {}", Money::from_cents(report.sales.paid_cents));
    println!("unpaid:          {}", Money::from_cents(report.sales.unpaid_cents));
    println!("revenue:         {}", Money::from_cents(report.profit.revenue_cents));
    println!("cost of goods:   {}", Money::from_cents(report.profit.cost_cents));
    println!("profit:          {}", Money::from_cents(report.profit.profit_cents));
    if let Some(margin) = report.profit.margin_percent() {
        println!("margin:          {margin:.1}%");
    }
    if !report.top_products.is_empty() {
        println!("top products:");
        for (i, p) in report.top_products.iter().enumerate() {
            println!(
                "  {}. {} - {} sold for {}",
                i + 1,
                p.name,
                p.total_quantity,
                Money::from_cents(p.total_cents)
            );
        }
    }
}

// =============================================================================
// Parsing helpers
// =============================================================================

/// Inclusive day range: from midnight `days_back` days ago through today.
fn day_range(days_back: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = Utc::now().date_naive();
    let start = (today - Duration::days(days_back))
        .and_time(NaiveTime::MIN)
        .and_utc();
    let end = (today + Duration::days(1)).and_time(NaiveTime::MIN).and_utc();
    (start, end)
}

fn bad_input(msg: &str) -> AppError {
    AppError::BadInput(msg.to_string())
}

/// Parses a 1-based cart line number into a 0-based index.
fn parse_index(input: &str) -> Result<usize, AppError> {
    let n: usize = input
        .trim()
        .parse()
        .map_err(|_| bad_input("expected a line number"))?;
    if n == 0 {
        return Err(bad_input("line numbers start at 1"));
    }
    Ok(n - 1)
}

fn parse_index_and(input: &str) -> Result<(usize, i64), AppError> {
    let (first, second) = input
        .split_once(char::is_whitespace)
        .ok_or_else(|| bad_input("expected: <line> <value>"))?;
    let value = second
        .trim()
        .parse()
        .map_err(|_| bad_input("expected a whole number"))?;
    Ok((parse_index(first)?, value))
}

fn parse_index_and_money(input: &str) -> Result<(usize, Money), AppError> {
    let (first, second) = input
        .split_once(char::is_whitespace)
        .ok_or_else(|| bad_input("expected: <line> <amount>"))?;
    Ok((parse_index(first)?, Money::parse(second)?))
}

fn parse_word_and(input: &str) -> Result<(String, i64), AppError> {
    let (first, second) = input
        .split_once(char::is_whitespace)
        .ok_or_else(|| bad_input("expected: <barcode> <value>"))?;
    let value = second
        .trim()
        .parse()
        .map_err(|_| bad_input("expected a whole number"))?;
    Ok((first.to_string(), value))
}

fn parse_word_and_money(input: &str) -> Result<(String, Money), AppError> {
    let (first, second) = input
        .split_once(char::is_whitespace)
        .ok_or_else(|| bad_input("expected: <barcode> <amount>"))?;
    Ok((first.to_string(), Money::parse(second)?))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - show debug messages
/// - `RUST_LOG=vend=trace` - trace for vend crates only
/// - Default: warn (the prompt is the primary output channel)
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
