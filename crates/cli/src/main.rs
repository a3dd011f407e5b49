//! Narxbot CLI - Search prices, sign in and manage favorites from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Search for a product
//! narxbot search "sut 1l" --per-page 10
//!
//! # Authenticate with Telegram init data
//! narxbot auth --init-data "query_id=...&user=...&hash=..."
//!
//! # Manage favorites
//! narxbot favorites list
//! narxbot favorites add 42 --from-search "sut 1l"
//! narxbot favorites remove 42
//! ```
//!
//! # Commands
//!
//! - `search` - Run a search and print the products and the cheapest offer
//! - `auth` - Authenticate and print the signed-in user
//! - `favorites` - List, add, remove or toggle favorites

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use narxbot_client::{AppContext, ClientConfig};
use narxbot_core::ProductId;
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "narxbot")]
#[command(author, version, about = "Narxbot price comparison client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products across stores
    Search {
        /// Search text
        query: String,

        /// Page number
        #[arg(long)]
        page: Option<u32>,

        /// Results per page
        #[arg(long)]
        per_page: Option<u32>,

        /// Telegram init data to authenticate with first (defaults to `NARXBOT_INIT_DATA`)
        #[arg(long)]
        init_data: Option<String>,
    },
    /// Authenticate with Telegram init data
    Auth {
        /// Telegram init data (defaults to `NARXBOT_INIT_DATA`)
        #[arg(long)]
        init_data: Option<String>,
    },
    /// Manage favorite products
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites
    List,
    /// Add a product found by a search
    Add {
        /// Product id
        id: ProductId,

        /// Search that returns the product
        #[arg(long)]
        from_search: String,
    },
    /// Remove a product
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Add the product if missing, remove it otherwise
    Toggle {
        /// Product id
        id: ProductId,

        /// Search that returns the product (needed when adding)
        #[arg(long)]
        from_search: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Map tracing levels to Sentry events and breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration errors are reported after tracing is up
    let config = ClientConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "narxbot_client=info,narxbot_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, AppContext::from_config(config)).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, ctx: AppContext) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Search {
            query,
            page,
            per_page,
            init_data,
        } => {
            let init_data = init_data
                .map(SecretString::from)
                .or_else(|| ctx.config().init_data.clone());
            commands::search::run(&ctx, query, page, per_page, init_data.as_ref()).await?;
        }
        Commands::Auth { init_data } => {
            let init_data = init_data
                .map(SecretString::from)
                .or_else(|| ctx.config().init_data.clone())
                .ok_or(commands::auth::AuthError::MissingInitData)?;
            commands::auth::run(&ctx, &init_data).await?;
        }
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list(&ctx),
            FavoritesAction::Add { id, from_search } => {
                commands::favorites::add(&ctx, id, from_search).await?;
            }
            FavoritesAction::Remove { id } => commands::favorites::remove(&ctx, id),
            FavoritesAction::Toggle { id, from_search } => {
                commands::favorites::toggle(&ctx, id, from_search).await?;
            }
        },
    }
    Ok(())
}
