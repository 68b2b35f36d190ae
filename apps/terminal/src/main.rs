//! # Kasir Terminal
//!
//! A line-oriented shell over [`kasir_engine::SaleSession`] for running
//! sales against the remote POS API from a terminal.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  $ export KASIR_API_URL=http://localhost:8000                           │
//! │  $ export KASIR_API_TOKEN=<bearer token from login>                     │
//! │  $ kasir-terminal                                                       │
//! │                                                                         │
//! │  kasir> list              show the catalog                              │
//! │  kasir> add 3             put one unit of product 3 in the cart        │
//! │  kasir> cash 30000        record the customer's cash                    │
//! │  kasir> pay               submit the sale, print the receipt            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This binary is deliberately thin: every rule it appears to enforce
//! (stock bounds, cash validation, the in-flight guard) actually lives in
//! the library crates and is merely reported here.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kasir_api::{HttpApiClient, Session};
use kasir_core::{Money, ProductId, Receipt};
use kasir_engine::SaleSession;

/// One SaleSession over one HTTP client for both collaborator roles.
type TerminalSession = SaleSession<HttpApiClient, HttpApiClient>;

// =============================================================================
// Configuration
// =============================================================================

/// Process configuration, from environment variables only.
#[derive(Debug)]
struct Config {
    api_url: String,
    api_token: String,
    http_timeout: Duration,
}

impl Config {
    /// Reads `KASIR_API_URL`, `KASIR_API_TOKEN`, and the optional
    /// `KASIR_HTTP_TIMEOUT_SECS` (default 10).
    fn from_env() -> Result<Self, String> {
        let api_url = std::env::var("KASIR_API_URL")
            .map_err(|_| "KASIR_API_URL is not set (e.g. http://localhost:8000)".to_string())?;
        let api_token = std::env::var("KASIR_API_TOKEN")
            .map_err(|_| "KASIR_API_TOKEN is not set (bearer token from login)".to_string())?;
        let http_timeout = match std::env::var("KASIR_HTTP_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .map_err(|_| format!("KASIR_HTTP_TIMEOUT_SECS is not a number: {raw:?}"))?,
            ),
            Err(_) => Duration::from_secs(10),
        };
        Ok(Config {
            api_url,
            api_token,
            http_timeout,
        })
    }
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(message) = run().await {
        error!(%message, "terminal exited with error");
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kasir=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), String> {
    let config = Config::from_env()?;
    info!(api_url = %config.api_url, "starting kasir terminal");

    let client = HttpApiClient::with_timeout(
        config.api_url,
        Session::new(config.api_token),
        config.http_timeout,
    )
    .map_err(|e| e.to_string())?;

    let session: TerminalSession = SaleSession::new(client.clone(), client);
    let count = session.load_catalog().await.map_err(|e| e.to_string())?;
    println!("catalog loaded: {count} products. Type `help` for commands.");

    let stdin = io::stdin();
    loop {
        print!("kasir> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(|e| e.to_string())? == 0 {
            break; // EOF
        }
        if !dispatch(&session, line.trim()).await {
            break;
        }
    }

    Ok(())
}

// =============================================================================
// Command Dispatch
// =============================================================================

/// Handles one command line; returns false to quit.
async fn dispatch(session: &TerminalSession, line: &str) -> bool {
    let (command, rest) = match line.split_once(' ') {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    let outcome = match command {
        "" => Ok(()),
        "help" => {
            print_help();
            Ok(())
        }
        "list" => {
            print_products(session.products());
            Ok(())
        }
        "find" => {
            print_products(session.search_products(rest));
            Ok(())
        }
        "reload" => match session.load_catalog().await {
            Ok(count) => {
                println!("catalog reloaded: {count} products");
                Ok(())
            }
            Err(e) => Err(e.to_string()),
        },
        "add" => with_product_id(rest, |id| session.add_to_cart(id).map(|_| ())),
        "inc" => with_product_id(rest, |id| session.increment(id).map(|_| ())),
        "dec" => with_product_id(rest, |id| session.decrement(id).map(|_| ())),
        "rm" => with_product_id(rest, |id| session.remove(id).map(|_| ())),
        "cash" => match rest.parse::<i64>() {
            Ok(amount) => session
                .tender_cash(Money::from_rupiah(amount))
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Err(_) => Err(format!("not an amount: {rest:?}")),
        },
        "cart" => {
            print_cart(session);
            Ok(())
        }
        "pay" => match session.checkout().await {
            Ok(receipt) => {
                print_receipt(&receipt);
                // Refresh stock hints for the next sale, as the sales
                // screen does after a completed transaction.
                if let Err(e) = session.load_catalog().await {
                    println!("(catalog refresh failed: {e})");
                }
                Ok(())
            }
            Err(e) => Err(e.to_string()),
        },
        "cancel" => session.reset().map(|_| ()).map_err(|e| e.to_string()),
        "quit" | "exit" => return false,
        other => Err(format!("unknown command: {other:?} (try `help`)")),
    };

    if let Err(message) = outcome {
        println!("!! {message}");
    } else if matches!(command, "add" | "inc" | "dec" | "rm" | "cash" | "cancel") {
        print_cart(session);
    }
    true
}

fn with_product_id<F>(raw: &str, f: F) -> Result<(), String>
where
    F: FnOnce(ProductId) -> Result<(), kasir_engine::EngineError>,
{
    let id = raw
        .parse::<i64>()
        .map_err(|_| format!("not a product id: {raw:?}"))?;
    f(ProductId::new(id)).map_err(|e| e.to_string())
}

// =============================================================================
// Output
// =============================================================================

fn print_help() {
    println!("  list              show the catalog");
    println!("  find <term>       filter products by name");
    println!("  reload            refetch the catalog");
    println!("  add <id>          add one unit to the cart");
    println!("  inc <id>          one more of a cart line");
    println!("  dec <id>          one less (minimum 1; use rm to delete)");
    println!("  rm <id>           remove a cart line");
    println!("  cash <amount>     record cash received, whole Rupiah");
    println!("  cart              show the cart");
    println!("  pay               submit the sale and print the receipt");
    println!("  cancel            clear cart and cash");
    println!("  quit              leave");
}

fn print_products(products: Vec<kasir_core::Product>) {
    if products.is_empty() {
        println!("  (no products)");
        return;
    }
    println!("  {:>4}  {:<30} {:>12} {:>6}", "id", "name", "price", "stock");
    for p in products {
        println!(
            "  {:>4}  {:<30} {:>12} {:>6}",
            p.id.value(),
            p.name,
            p.unit_price.to_string(),
            p.stock
        );
    }
}

fn print_cart(session: &TerminalSession) {
    let view = session.cart_view();
    if view.lines.is_empty() {
        println!("  cart is empty");
    }
    for line in &view.lines {
        println!(
            "  {:<30} {:>3} x {:>10} = {:>12}",
            line.name,
            line.quantity,
            line.unit_price.to_string(),
            line.line_total().to_string()
        );
    }
    println!("  total: {}", view.totals.grand_total);
    if let Some(cash) = view.cash_tendered {
        let label = if view.change.is_negative() {
            "short"
        } else {
            "change"
        };
        println!("  cash:  {cash}   {label}: {}", view.change.abs());
    }
}

fn print_receipt(receipt: &Receipt) {
    println!("  ==========================================");
    println!("  {}", receipt.invoice_code);
    println!("  {}", receipt.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  ------------------------------------------");
    for line in &receipt.lines {
        println!(
            "  {:<24} {:>3} x {:>9} {:>12}",
            line.name,
            line.quantity,
            line.unit_price.to_string(),
            line.line_total.to_string()
        );
    }
    println!("  ------------------------------------------");
    println!("  {:<32} {:>12}", "TOTAL", receipt.total.to_string());
    println!("  {:<32} {:>12}", "CASH", receipt.cash_tendered.to_string());
    println!("  {:<32} {:>12}", "CHANGE", receipt.change.to_string());
    println!("  ==========================================");
}
