//! email-gate
//!
//! Authorizes email addresses against allowed domains and a polled
//! allow-list file.
//!
//! ```text
//!                ┌──────────────────────────────────────────────┐
//!                │                 EMAIL GATE                   │
//!  auth_request  │  ┌────────┐    ┌───────────┐    ┌─────────┐  │
//!  ─────────────▶│  │  http  │───▶│ validator │───▶│ domain  │  │
//!                │  │ server │    │   gate    │    │  rules  │  │
//!  202/403/401   │  └────────┘    └─────┬─────┘    └─────────┘  │
//!  ◀─────────────│                      │ lock-free read        │
//!                │                      ▼                       │
//!                │               ┌────────────┐   publish       │
//!                │               │ allow-list │◀────────┐       │
//!                │               │  snapshot  │         │       │
//!                │               └────────────┘   ┌─────┴─────┐ │
//!                │                                │  refresh  │◀┼── emails file
//!                │                                │   task    │ │   (polled)
//!                │                                └───────────┘ │
//!                └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use email_gate::config::{load_config, GateConfig};
use email_gate::lifecycle::{signals, Shutdown};
use email_gate::observability::{logging, metrics};
use email_gate::{HttpServer, Validator};

#[derive(Parser)]
#[command(name = "email-gate", version)]
#[command(about = "Email allow-list gate with a polled authenticated-emails file", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP gate
    Serve,
    /// Check addresses against the configured rules
    Check {
        #[arg(required = true)]
        emails: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    logging::init(&config.observability)?;
    tracing::info!("email-gate v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    tracing::info!(
        domains = config.validator.email_domains.len(),
        emails_file = ?config.validator.authenticated_emails_file,
        poll_interval_secs = config.validator.poll_interval_secs,
        "Configuration loaded"
    );

    // `check` answers once and exits, so it never needs the refresh task.
    let mut validator_config = config.validator.clone();
    if matches!(cli.command, Commands::Check { .. }) {
        validator_config.poll_interval_secs = 0;
    }

    let validator = match Validator::from_config(&validator_config) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize validator");
            return Err(e.into());
        }
    };

    match cli.command {
        Commands::Check { emails } => {
            let mut denied = false;
            for email in &emails {
                let allowed = validator.is_valid(email);
                denied |= !allowed;
                println!("{}\t{}", if allowed { "allow" } else { "deny" }, email);
            }
            Ok(if denied { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Commands::Serve => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;

            let shutdown = Shutdown::new();
            signals::spawn_signal_listener(&shutdown);

            let server = HttpServer::new(&config.listener, Arc::new(validator));
            server.run(listener, shutdown.subscribe()).await?;

            tracing::info!("Shutdown complete");
            Ok(ExitCode::SUCCESS)
        }
    }
}
