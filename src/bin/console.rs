//! Host Monitoring Console
//!
//! Interactive terminal dashboard for probing hosts, collecting their logs
//! and following the alerts the collections produce.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use hostwatch::Config;
use hostwatch::console::App;

#[derive(Parser, Debug)]
#[command(name = "hostwatch-console")]
#[command(about = "Terminal dashboard for host monitoring", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host API base URL (overrides config file and environment)
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Anti-forgery token sent with log collection requests
    #[arg(long, value_name = "TOKEN")]
    csrf_token: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    // Logs go to a file while the terminal is in raw mode
    let log_path = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("hostwatch")
        .join("console.log");

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    match log_file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_level(true)
                .with_max_level(level)
                .with_writer(file)
                .init();
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_level(true)
                .with_max_level(Level::ERROR)
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?.with_env_overrides();

    // CLI flags win over file and environment
    let config = Config {
        api_url: args.url.unwrap_or(config.api_url),
        csrf_token: args.csrf_token.or(config.csrf_token),
        debug: args.debug || config.debug,
        ..config
    };

    init_tracing(config.debug);

    let app = App::mount(config).await?;
    app.run().await
}
