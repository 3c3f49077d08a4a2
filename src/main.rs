use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use headlines::api::NewsClient;
use headlines::app::{App, AppEvent};
use headlines::config::{Config, API_URL_ENV};
use headlines::feed::FilterState;
use headlines::ui;

/// Default config file path (~/.config/headlines/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("headlines")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "headlines", about = "Terminal client for a news aggregation service")]
struct Args {
    /// Config file (default: ~/.config/headlines/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// API base URL (overrides the config file and HEADLINES_API_URL)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Start with a search for TEXT
    #[arg(long, value_name = "TEXT", conflicts_with = "category")]
    query: Option<String>,

    /// Start filtered to category NAME
    #[arg(long, value_name = "NAME")]
    category: Option<String>,
}

impl Args {
    fn initial_filter(&self) -> FilterState {
        match (&self.query, &self.category) {
            (Some(query), _) => FilterState::search(query),
            (None, Some(category)) => FilterState::category(&category.to_lowercase()),
            (None, None) => FilterState::all(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; set RUST_LOG to see them
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    let env_url = std::env::var(API_URL_ENV).ok();
    let base_url = config.resolve_base_url(args.base_url.as_deref(), env_url.as_deref());

    let client = NewsClient::new(&base_url, config.request_timeout())
        .with_context(|| format!("Cannot use API base URL '{}'", base_url))?;
    tracing::info!(base_url = %client.base_url(), "Starting headlines");

    let mut app = App::new(client, &config, args.initial_filter());

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
