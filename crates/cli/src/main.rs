//! BANKetTISCH CLI - Static catalog rendering and data checks.
//!
//! # Usage
//!
//! ```bash
//! # Render the catalog page to a file
//! bt-cli render --out dist/produkte.html
//!
//! # Render one category, or a search
//! bt-cli render --out dist/moebel.html --category "Mietmöbel"
//! bt-cli render --out dist/suche.html --query zelt
//!
//! # Check a products file and list its buckets
//! bt-cli check crates/storefront/static/products.json
//! ```
//!
//! # Commands
//!
//! - `render` - Load the catalog once and write the rendered page
//! - `check` - Parse a products file and print the organized buckets
//!
//! Catalog sources and category order come from the same environment
//! variables as the storefront (`CATALOG_*`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bt-cli")]
#[command(author, version, about = "BANKetTISCH catalog tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the catalog page to a file
    Render {
        /// Output HTML file
        #[arg(short, long)]
        out: PathBuf,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Search text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Parse a products file and print its category buckets
    Check {
        /// Products JSON file (array or `{ "products": [...] }`)
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Render {
            out,
            category,
            query,
        } => commands::render::page(&out, category.as_deref(), query.as_deref()).await?,
        Commands::Check { file } => commands::check::products_file(&file).await?,
    }
    Ok(())
}
