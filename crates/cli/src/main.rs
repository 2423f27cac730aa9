//! Backoffice CLI - Main Entry Point
//!
//! Thin command-line front end over the API test harness, useful for poking a
//! running backoffice (health, login, companies, surveys, export jobs).

use anyhow::Result;
use backoffice_harness::{ApiHarness, HarnessOptions};
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{company, export, survey};

/// Survey backoffice command-line client
#[derive(Parser)]
#[command(name = "backoffice")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Backoffice base URL (overrides API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds (overrides API_TIMEOUT)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Bearer token; admin login is performed when absent
    #[arg(long, env = "BACKOFFICE_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backoffice is reachable
    Health,

    /// Log in and print the bearer token
    Login {
        /// Username (defaults to ADMIN_USERNAME)
        #[arg(long)]
        username: Option<String>,

        /// Password (defaults to ADMIN_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// Manage companies
    #[command(subcommand)]
    Company(company::CompanyCommands),

    /// Inspect surveys
    #[command(subcommand)]
    Survey(survey::SurveyCommands),

    /// Manage export jobs
    #[command(subcommand)]
    Export(export::ExportCommands),
}

impl Cli {
    fn harness_options(&self) -> HarnessOptions {
        HarnessOptions {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            timeout_ms: self.timeout_ms,
            seed: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut harness = ApiHarness::new(cli.harness_options())?;
    let format = cli.format;

    match cli.command {
        Commands::Health => {
            let base_url = harness.api_config().base_url;
            if harness.health_check().await {
                output::print_success(&format!("Backoffice is healthy at {}", base_url));
            } else {
                output::print_error(&format!("Backoffice is not responding at {}", base_url));
                std::process::exit(1);
            }
        }
        Commands::Login { username, password } => {
            let username = username.unwrap_or_else(|| harness.env().admin_username.clone());
            let password = password.unwrap_or_else(|| harness.env().admin_password.clone());
            let token = harness.login(&username, &password).await?;
            output::print_message(&token, format);
        }
        Commands::Company(cmd) => {
            company::execute(cmd, commands::authenticated(harness).await?, format).await?
        }
        Commands::Survey(cmd) => {
            survey::execute(cmd, commands::authenticated(harness).await?, format).await?
        }
        Commands::Export(cmd) => {
            export::execute(cmd, commands::authenticated(harness).await?, format).await?
        }
    }

    Ok(())
}
