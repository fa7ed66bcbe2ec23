use clap::Parser;
use linkmover::config::Config;
use linkmover::ledger::Ledger;
use linkmover::pipeline::MovePipeline;
use linkmover::{bot, poster};
use serenity::http::Http;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "linkmover",
    version,
    about = "Moves posted links into a dedicated links channel"
)]
struct Cli {
    /// Path to a .env file to load before reading configuration
    #[arg(long)]
    env_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("linkmover=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .map_err(|e| anyhow::anyhow!("Could not load {}: {}", path.display(), e))?;
        }
        None => {
            // A .env next to the binary is optional.
            dotenvy::dotenv().ok();
        }
    }

    let config = Config::from_env().map_err(|e| {
        anyhow::anyhow!("{e}. Set BOT_TOKEN, SOURCE_CHANNEL_ID and DESTINATION_CHANNEL_ID.")
    })?;

    tracing::info!("Watching channel {}", config.source_channel_id);
    tracing::info!("Moving links to channel {}", config.destination_channel_id);
    tracing::info!(
        "Ledger: {} (capacity {})",
        config.ledger_path.display(),
        config.ledger_capacity
    );

    let ledger = Ledger::load(&config.ledger_path, config.ledger_capacity);
    if !ledger.is_empty() {
        tracing::info!("Loaded {} recently-moved link(s)", ledger.len());
    }

    let http = Arc::new(Http::new(&config.bot_token));
    let poster = poster::build_poster(&config, http.clone());
    let remover = Box::new(bot::HttpRemover::new(http));
    let pipeline = Arc::new(MovePipeline::new(&config, poster, remover, ledger));

    bot::run(&config, pipeline).await
}
