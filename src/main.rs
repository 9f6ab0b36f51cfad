//! synthdata - command-line client for synthetic data generation
//!
#![doc = "Main entry point for the synthdata CLI."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use synthdata::cli::{Cli, Commands};
use synthdata::commands::{self, AppContext};
use synthdata::config::Config;
use synthdata::SynthError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<SynthError>() {
            Some(err) => eprintln!("Error: {}", err),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    let ctx = AppContext::from_config(config)?;

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
            accept_terms,
        } => {
            tracing::info!("Creating account for {}", email);
            commands::auth::signup(&ctx, &name, &email, &password, accept_terms).await
        }
        Commands::Login { email, password } => {
            tracing::info!("Signing in as {}", email);
            commands::auth::login(&ctx, &email, &password).await
        }
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Quota => commands::auth::quota(&ctx),
        Commands::Schema {
            description,
            model,
            columns,
            out,
        } => {
            commands::generate::generate_schema(&ctx, &description, model.as_deref(), columns, out)
                .await
        }
        Commands::Data {
            schema,
            model,
            rows,
            format,
            out,
        } => {
            commands::generate::generate_data(&ctx, &schema, model.as_deref(), rows, &format, out)
                .await
        }
        Commands::Export { input, format, out } => {
            commands::generate::export(&input, &format, out)
        }
        Commands::Wizard => commands::wizard::run_wizard(&ctx).await,
    }
}

/// Initialize tracing subscriber with environment filter.
///
/// Logs go to stderr so exported data on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "synthdata=debug" } else { "synthdata=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
