//! storecart CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (repeat to increase its quantity)
//! storecart add --id gpu-1 --name "Graphics Card" --price 12999 --image img/gpu.png
//!
//! # Change a quantity (clamped to 1..=10)
//! storecart set-quantity gpu-1 3
//!
//! # Remove a product, or empty the cart
//! storecart remove gpu-1
//! storecart clear
//!
//! # Show the cart with a chosen shipping method, optionally as page markup
//! storecart show --shipping store --html
//! ```
//!
//! # Commands
//!
//! - `add` - Add one unit of a product
//! - `remove` - Remove a product's line
//! - `set-quantity` - Set a line's quantity
//! - `clear` - Empty the cart
//! - `show` - Print the cart and its totals

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use storecart_storefront::StorecartConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "storecart_storefront=info,storecart=info";

#[derive(Parser)]
#[command(name = "storecart")]
#[command(author, version, about = "Storefront cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product to the cart
    Add {
        /// Product identifier
        #[arg(long)]
        id: String,

        /// Product display name
        #[arg(short, long)]
        name: String,

        /// Unit price
        #[arg(short, long)]
        price: String,

        /// Product image reference
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// Remove a product's line from the cart
    Remove {
        /// Product identifier
        id: String,
    },
    /// Set the quantity of a product's line
    SetQuantity {
        /// Product identifier
        id: String,

        /// New quantity (clamped to 1..=10)
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Empty the cart
    Clear,
    /// Print the cart and its totals
    Show {
        /// Shipping method code to price shipping with
        #[arg(short, long)]
        shipping: Option<String>,

        /// Print the rendered page regions instead of a summary
        #[arg(long)]
        html: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorecartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorecartConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so they never mix with command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli, &config) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &StorecartConfig) -> storecart_storefront::Result<()> {
    let mut session = commands::cart::CartSession::open(config);

    match cli.command {
        Commands::Add {
            id,
            name,
            price,
            image,
        } => session.add(&id, &name, &price, &image)?,
        Commands::Remove { id } => session.remove(&id)?,
        Commands::SetQuantity { id, quantity } => session.set_quantity(&id, &quantity)?,
        Commands::Clear => session.clear(),
        Commands::Show { shipping, html } => {
            if let Some(code) = shipping {
                session.select_shipping(&code)?;
            }
            if html {
                session.print_regions();
                return Ok(());
            }
        }
    }

    session.print_toasts();
    session.print_summary();
    Ok(())
}
