//! Vitrine CLI - Browse the catalog from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Second page of laptops, 5 per page
//! vitrine products --category laptops --page 2 --page-size 5
//!
//! # Search, cheapest first
//! vitrine products --search phone --sort-by price --order asc
//!
//! # One product
//! vitrine product 42
//!
//! # Categories with product counts
//! vitrine categories --counts
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_BASE_URL` - Catalog API base URL (default: <https://dummyjson.com>)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};
use vitrine_core::SortOrder;

mod commands;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine catalog browser")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of products
    Products {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Products per page
        #[arg(long, default_value_t = vitrine_core::pagination::DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Category slug to filter by
        #[arg(short, long)]
        category: Option<String>,

        /// Search text (takes precedence over --category)
        #[arg(short, long)]
        search: Option<String>,

        /// Product field to sort by, e.g. `price` or `title`
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort direction
        #[arg(long, value_enum, default_value_t = Order::Asc)]
        order: Order,
    },
    /// Show a single product
    Product {
        /// Product ID
        id: i64,
    },
    /// List categories
    Categories {
        /// Include product counts and hide empty categories
        #[arg(long)]
        counts: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Asc,
    Desc,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => Self::Asc,
            Order::Desc => Self::Desc,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let browser = commands::catalog::connect()?;
    let format = if cli.json {
        commands::catalog::Format::Json
    } else {
        commands::catalog::Format::Text
    };

    match cli.command {
        Commands::Products {
            page,
            page_size,
            category,
            search,
            sort_by,
            order,
        } => {
            let sort = sort_by.map(|field| vitrine_core::Sort {
                field,
                order: order.into(),
            });
            let request = vitrine_core::PageRequest::new(page, page_size)
                .with_category(category)
                .with_search(search)
                .with_sort(sort);
            commands::catalog::products(&browser, &request, format).await?;
        }
        Commands::Product { id } => {
            commands::catalog::product(&browser, vitrine_core::ProductId::new(id), format).await?;
        }
        Commands::Categories { counts } => {
            commands::catalog::categories(&browser, counts, format).await?;
        }
    }

    Ok(())
}
