use clap::{Parser, Subcommand};
use std::sync::Arc;

use gitter_bridge::application::shutdown;
use gitter_bridge::infrastructure::adapters::console::{ConsolePushClient, StaticBroker};
use gitter_bridge::infrastructure::adapters::gitter::GitterBroker;
use gitter_bridge::infrastructure::config::Config;
use gitter_bridge::infrastructure::outbox::ChannelOutbox;
use gitter_bridge::{Adapter, BotError, Broker, GitterAdapter, MessageEvent};

#[derive(Parser)]
#[command(name = "gitter-bridge")]
#[command(about = "Relays Gitter chat messages onto the bot's event bus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Gitter token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bridge; push messages are read from stdin as JSON lines
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_bridge(cli.config, cli.token) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("gitter-bridge v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            if let Err(e) = init_config() {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
    }
}

fn load_config(config_path: &str, token_override: Option<String>) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(config_path).exists() {
        let mut config = Config::load(config_path)?;
        config.apply_env();
        config
    } else {
        Config::load_env()
    };

    if let Some(token) = token_override {
        config.gitter.token = Some(token);
        config.console.enabled = false;
    }

    config.validate()?;
    Ok(config)
}

fn run_bridge(config_path: String, token_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(&config_path, token_override)?;
    tracing::info!("Starting {}", config.bot.name);

    let broker: Arc<dyn Broker> = if config.console.enabled {
        tracing::info!("Console mode: identity and rooms come from config");
        Arc::new(StaticBroker::new(config.console_user(), config.console_rooms()))
    } else {
        let token = config.gitter.token.clone().unwrap_or_default();
        tracing::info!("Gitter mode: push envelopes are read from stdin");
        Arc::new(GitterBroker::with_api_base(token, &config.gitter.api_url))
    };

    let (outbox, events) = ChannelOutbox::new();
    let adapter = GitterAdapter::new(
        broker,
        Arc::new(ConsolePushClient::stdin()),
        Arc::new(outbox),
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(async {
        let (handle, signal) = shutdown::channel();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down");
            }
            handle.shutdown();
        });
        tokio::spawn(consume_events(events));

        tracing::info!("Running {} adapter", adapter.friendly_name());
        adapter.run(signal).await.map(|_| ())
    })
}

/// Stand-in for the bot's event bus: echo anything addressed to the bot
async fn consume_events(mut events: tokio::sync::mpsc::UnboundedReceiver<MessageEvent>) {
    while let Some(event) = events.recv().await {
        if !event.message.is_addressed_to(&event.bot) {
            continue;
        }
        if let Err(e) = event.reply(&format!("Echo: {}", event.message.text)).await {
            tracing::warn!("Failed to reply in {}: {}", event.room.name, e);
        }
    }
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    Ok(())
}
