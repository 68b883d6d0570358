//! Vitrine CLI - seed validation and scripted storefront sessions.
//!
//! # Usage
//!
//! ```bash
//! # Validate a seed file without running anything
//! vitrine seed check data/seed.yaml
//!
//! # Run a scripted session (browse, checkout, fulfilment, recovery)
//! # against the built-in seed
//! vitrine demo
//!
//! # Same, with a custom seed and no simulated latency
//! vitrine demo --seed my-seed.yaml --no-latency
//! ```
//!
//! # Commands
//!
//! - `seed check` - Parse and cross-check a seed file
//! - `demo` - Drive the backend through a full order lifecycle

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine storefront backend tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with seed files
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },
    /// Run a scripted storefront session against the in-process backend
    Demo {
        /// Seed file to start from (defaults to the built-in seed)
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Customer login (username or email)
        #[arg(short, long, default_value = "cliente_demo")]
        user: String,

        /// Customer password
        #[arg(short, long, default_value = "123")]
        password: String,

        /// Skip the simulated network latency
        #[arg(long)]
        no_latency: bool,
    },
}

#[derive(Subcommand)]
enum SeedAction {
    /// Parse a seed file and cross-check its references and totals
    Check {
        /// Path to the YAML seed file
        file: PathBuf,
    },
}

fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

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

#[tokio::main]
async fn main() {
    // Load .env before reading SENTRY_DSN
    let _ = dotenvy::dotenv();

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrine_backend=info,vitrine_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { action } => match action {
            SeedAction::Check { file } => commands::seed::check(&file).await?,
        },
        Commands::Demo {
            seed,
            user,
            password,
            no_latency,
        } => {
            let options = commands::demo::DemoOptions {
                seed,
                login: user,
                password,
                simulate_latency: !no_latency,
            };
            commands::demo::run(options).await?;
        }
    }
    Ok(())
}
