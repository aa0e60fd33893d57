//! # Mikra - Hebrew Bible Verse Server
//!
//! The main binary for the Mikra verse transform.
//!
//! This application provides:
//! - CLI interface for importing and looking up verses
//! - HTTP REST API server (axum-based)
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │             apps/mikra (THE BINARY)            │
//! │                                                │
//! │   ┌─────────────┐          ┌─────────────┐     │
//! │   │    CLI      │          │  HTTP API   │     │
//! │   │   (clap)    │          │   (axum)    │     │
//! │   └──────┬──────┘          └──────┬──────┘     │
//! │          └───────────┬────────────┘            │
//! │                      ▼                         │
//! │              ┌───────────────┐                 │
//! │              │  mikra-core   │                 │
//! │              │ (THE LOGIC)   │                 │
//! │              └───────────────┘                 │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Import an OSIS book
//! mikra import -f Gen.xml -e wlc
//!
//! # CLI lookups
//! mikra verse "Gen 1:1"
//! mikra strongs H7225
//!
//! # Start the HTTP server
//! mikra server --host 0.0.0.0 --port 8080
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // MIKRA_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("MIKRA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mikra=info,mikra_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    // JSON output stays machine-readable.
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  mikra v{}
  Hebrew Bible verse transform
"#,
        env!("CARGO_PKG_VERSION")
    );
}
