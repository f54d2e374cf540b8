//! Delizio CLI - menu browsing, price quotes and order history.
//!
//! # Usage
//!
//! ```bash
//! # List vegan main courses
//! delizio menu --category mains --vegan
//!
//! # Quote two large carbonaras for delivery with an 18% tip
//! delizio quote 5x2:size=Large --order-type delivery --tip 18%
//!
//! # Show the saved user's orders and walk one forward
//! delizio orders list
//! delizio orders advance 1718000000000
//! ```
//!
//! # Commands
//!
//! - `menu` - List menu items
//! - `coupons` - List coupon codes
//! - `quote` - Price a cart without placing an order
//! - `orders` - Inspect and advance saved orders
//! - `stats` - Dashboard totals for saved orders
//!
//! Saved data is read from `DELIZIO_DATA_DIR` (or `--data-dir`), the same
//! directory the storefront server writes to.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use delizio_core::OrderType;

mod commands;

use commands::quote::{LineSpec, TipArg};

#[derive(Parser)]
#[command(name = "delizio")]
#[command(author, version, about = "Delizio CLI tools")]
struct Cli {
    /// Data directory (overrides `DELIZIO_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List menu items
    Menu {
        /// Category slug (starters, mains, desserts, beverages, vegan)
        #[arg(short, long)]
        category: Option<String>,

        /// Search names and descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Only vegan items
        #[arg(long)]
        vegan: bool,
    },
    /// List coupon codes
    Coupons,
    /// Price a cart without placing an order
    Quote {
        /// Lines as `ID[xQTY][:group=choice,...]`, e.g. `5x2:size=Large`
        #[arg(required = true)]
        lines: Vec<LineSpec>,

        /// `delivery` or `pickup`
        #[arg(short, long, default_value = "delivery")]
        order_type: OrderType,

        /// Coupon code to apply
        #[arg(short, long)]
        coupon: Option<String>,

        /// Tip as a preset percentage (`18%`) or an amount (`3.50`)
        #[arg(short, long, default_value = "0")]
        tip: TipArg,
    },
    /// Inspect saved orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Dashboard totals for saved orders
    Stats,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List the saved user's orders
    List,
    /// Move an order to its next status
    Advance {
        /// Order ID
        id: i64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = delizio_storefront::config::StorefrontConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    match cli.command {
        Commands::Menu {
            category,
            search,
            vegan,
        } => commands::menu::list(category, search, vegan),
        Commands::Coupons => commands::menu::coupons(),
        Commands::Quote {
            lines,
            order_type,
            coupon,
            tip,
        } => commands::quote::run(&lines, order_type, coupon.as_deref(), tip, &config)?,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&config)?,
            OrdersAction::Advance { id } => commands::orders::advance(&config, id)?,
        },
        Commands::Stats => commands::orders::stats(&config)?,
    }
    Ok(())
}
