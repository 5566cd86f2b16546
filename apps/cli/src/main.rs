mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use config::Config;

/// Record and inspect admission payments from the terminal.
#[derive(Debug, Parser)]
#[command(name = "campusdesk", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show an admission's service charge position and agent roster.
    Details { admission_id: String },
    /// List the agent directory.
    Agents,
    /// Check whether a transaction reference is already used.
    CheckRef { reference: String },
    /// Show how a draft payment would be allocated, without saving it.
    Preview {
        admission_id: String,
        /// JSON payment draft (camelCase fields, as sent to the API).
        draft: PathBuf,
    },
    /// Record a payment and print the refreshed totals.
    Submit {
        admission_id: String,
        /// JSON payment draft (camelCase fields, as sent to the API).
        draft: PathBuf,
        /// Receipt image or PDF to upload with the payment.
        #[arg(long)]
        attachment: Option<PathBuf>,
    },
    /// Ask the server to rebuild an admission's totals. Admins only.
    Recalculate { admission_id: String },
}

fn init_tracing() {
    let log_format = std::env::var("CD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Loads .env; must run before init_tracing
    let config = Config::from_env()?;
    init_tracing();

    tracing::debug!("Using API at {}", config.api_url);
    let app = commands::App::connect(&config)?;

    match cli.command {
        Command::Details { admission_id } => app.details(&admission_id).await,
        Command::Agents => app.agents().await,
        Command::CheckRef { reference } => app.check_ref(&reference).await,
        Command::Preview {
            admission_id,
            draft,
        } => app.preview(&admission_id, &draft).await,
        Command::Submit {
            admission_id,
            draft,
            attachment,
        } => {
            app.submit(&admission_id, &draft, attachment.as_deref())
                .await
        }
        Command::Recalculate { admission_id } => app.recalculate(&admission_id).await,
    }
}
