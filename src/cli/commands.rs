use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::app::{AppContext, Result, WebIntelError};
use crate::config::interval::format_interval;
use crate::dashboard::delete_with_feedback;
use crate::domain::{
    classify_freshness, format_relative_time, format_score, Displayed, ScrapeRecord,
    ScrapeRequest, Statistics,
};
use crate::notify::ConsoleNotifier;
use crate::submit::submit_scrape;

pub async fn scrape(
    ctx: &AppContext,
    request: &ScrapeRequest,
    preview: bool,
    json: bool,
) -> Result<()> {
    let notifier = ConsoleNotifier::new();
    let displayed = submit_scrape(ctx.api.as_ref(), &notifier, request, preview)
        .await
        .ok_or_else(|| WebIntelError::Other(format!("Scrape of {} failed", request.url)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&displayed)?);
    } else {
        print!("{}", describe(&displayed));
    }
    Ok(())
}

pub async fn list_records(ctx: &AppContext, page: u32, limit: u32) -> Result<()> {
    let records = ctx.api.list_data(page.max(1), limit.max(1)).await?;

    if records.is_empty() {
        println!("No records");
        return Ok(());
    }

    let now = Utc::now();
    for record in &records {
        println!("{}", record_line(record, now));
    }
    Ok(())
}

pub async fn show_stats(ctx: &AppContext) -> Result<()> {
    let stats = ctx.api.get_statistics().await?;
    print!("{}", stats_block(&stats));
    Ok(())
}

pub async fn delete_record(ctx: &AppContext, id: &str) -> Result<()> {
    delete_with_feedback(ctx.api.as_ref(), &ConsoleNotifier::new(), id).await?;
    Ok(())
}

pub async fn refresh_stale(ctx: &AppContext, threshold: Duration) -> Result<()> {
    println!("Refreshing records older than {}...", format_interval(threshold));
    let response = ctx.api.refresh_stale(threshold).await?;

    if response.has_refreshed() {
        println!("{}", response.message);
    } else if response.success {
        println!("No stale records");
    } else {
        return Err(WebIntelError::Other(if response.message.is_empty() {
            "Stale refresh failed".to_string()
        } else {
            response.message
        }));
    }
    Ok(())
}

/// `[fresh] 2m ago  Example Domain  https://example.com  (id)`
fn record_line(record: &ScrapeRecord, now: DateTime<Utc>) -> String {
    format!(
        "[{}] {:>8}  {}{}  {}  ({})",
        classify_freshness(record.created_at, now).label(),
        format_relative_time(record.created_at, now),
        record.display_title(),
        if record.is_recent(now) { " *" } else { "" },
        record.url,
        record.id
    )
}

fn stats_block(stats: &Statistics) -> String {
    format!(
        "Total scraped:  {}\nUnique URLs:    {}\nRecent (24h):   {}\n",
        stats.total_scraped, stats.unique_urls, stats.recent_scrapes
    )
}

/// Plain-text rendering of a scrape result.
fn describe(displayed: &Displayed) -> String {
    let content = displayed.content();
    let mut out = String::new();

    out.push_str(&format!("{}\n", displayed.title()));
    if let Some(url) = displayed.url() {
        out.push_str(&format!("{}\n", url));
    }
    if let Some(description) = &content.description {
        out.push_str(&format!("\n{}\n", description));
    }
    if let Some(stats) = &content.content_stats {
        out.push_str(&format!(
            "\n{} words, {} min read\n",
            stats.word_count, stats.reading_time
        ));
    }

    if let Some(analysis) = &content.ai_analysis {
        if let Some(summary) = &analysis.summary {
            out.push_str(&format!("\nSummary: {}\n", summary));
        }
        for (label, score) in analysis.scores() {
            out.push_str(&format!("  {:<24} {}\n", label, format_score(score)));
        }
        if !analysis.key_points.is_empty() {
            out.push_str("\nKey points:\n");
            for point in &analysis.key_points {
                out.push_str(&format!("  - {}\n", point));
            }
        }
    }
    out
}
