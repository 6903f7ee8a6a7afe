/// Cadence - playback queue from the command line
use cadence_cli::{config::CadenceConfig, execute, open_session, Command};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence playback queue", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CadenceConfig::load(cli.config.as_deref())?;
    tracing::debug!(
        database = %config.storage.database_path.display(),
        namespace = %config.storage.namespace,
        "Configuration loaded"
    );

    let mut session = open_session(&config)?;
    let output = execute(&mut session, &cli.command)?;
    println!("{}", output);

    Ok(())
}
