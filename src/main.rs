use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liga_hub::{config::Config, web::WebServer};

#[derive(Parser)]
#[command(name = "liga-hub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A football league data aggregation service with live provider fallback")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("liga_hub={},tower_http=trace", cli.log_level)
    } else {
        format!("liga_hub={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting La Liga Hub v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    if config.upstream.api_key.is_some() {
        info!("Live upstream enabled: {:?}", config.upstream.provider);
    } else {
        info!("No upstream API key, serving bundled data only");
    }

    let server = WebServer::new(&config)?;
    info!("Starting web server on {}", server.addr());
    server.serve().await?;

    Ok(())
}
