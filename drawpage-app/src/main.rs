use anyhow::{Context, Result};
use clap::Parser;
use drawpage_common::observability::{LogConfig, init_logging};
use drawpage_common::{DrawpageError, ScraperConfig};
use drawpage_config::{DrawpageConfigLoader, default_config_path};
use drawpage_scraper::{CancellationToken, DrawTarget, Scraper};
use tracing::{info, warn};

mod cli;

use cli::Cli;

fn load_config(cli: &Cli) -> Result<ScraperConfig> {
    let loader = match (&cli.config, default_config_path()) {
        (Some(path), _) => DrawpageConfigLoader::new().with_file(path),
        (None, Some(path)) => DrawpageConfigLoader::new().with_optional_file(path),
        (None, None) => DrawpageConfigLoader::new(),
    };
    let mut cfg = loader
        .load()
        .map_err(|err| DrawpageError::Config(err.to_string()))?;

    if let Some(selector) = &cli.selector {
        cfg.selector = selector.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        cfg.navigation.timeout_ms = timeout_ms;
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = init_logging(LogConfig {
        emit_stderr: true,
        format: cli.log_format,
        default_filter: "warn,scraper=info,browser.launch=info",
        ..LogConfig::default()
    })?;

    let cfg = load_config(&cli)?;
    info!(log = %log_path.display(), selector = %cfg.selector, "drawpage starting");

    let target = DrawTarget::new(&cli.base_url, &cli.slug, &cli.draw_no);
    let scraper = Scraper::from_config(&cfg);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling scrape");
            on_signal.cancel();
        }
    });

    let fragments = scraper
        .scrape(&target, &cancel)
        .await
        .with_context(|| format!("failed to scrape {target}"))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&fragments)?);
    } else {
        for html in &fragments {
            println!("{html}");
        }
    }
    Ok(())
}
