use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use webintel::app::AppContext;
use webintel::cli::{commands, Cli, Commands};
use webintel::config::Config;
use webintel::domain::ScrapeRequest;
use webintel::watch::Watcher;

/// The TUI owns the terminal, so it logs to a file instead of stderr.
fn init_tracing(to_file: bool) -> anyhow::Result<()> {
    if to_file {
        let path = AppContext::data_dir()?.join("webintel.log");
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Tui))?;

    let config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };
    let ctx = AppContext::new(config, cli.api_url.as_deref())?;

    match cli.command {
        Commands::Scrape {
            url,
            preview,
            no_ai,
            prompt,
            method,
            json,
        } => {
            let request = ScrapeRequest::new(url)
                .with_method(method)
                .with_ai(!no_ai)
                .with_prompt(prompt.as_deref());
            commands::scrape(&ctx, &request, preview, json).await?;
        }
        Commands::List { page, limit } => {
            commands::list_records(&ctx, page, limit).await?;
        }
        Commands::Stats => {
            commands::show_stats(&ctx).await?;
        }
        Commands::Delete { id } => {
            commands::delete_record(&ctx, &id).await?;
        }
        Commands::RefreshStale { threshold } => {
            commands::refresh_stale(&ctx, threshold).await?;
        }
        Commands::Watch => {
            Watcher::new(&ctx)?.run().await?;
        }
        Commands::Tui => {
            webintel::tui::run(Arc::new(ctx)).await?;
        }
    }

    Ok(())
}
