//! Scrape and preview submission with user feedback.

use tracing::{error, info};

use crate::api::ScraperApi;
use crate::domain::{Displayed, ScrapeRequest};
use crate::notify::{Notifier, ToastKind};

/// Submit `request` as a full scrape, or as a preview when `preview` is set.
///
/// Progress and outcome are reported through `notifier`. Returns what should
/// be shown in the results view, or `None` when nothing was produced.
pub async fn submit_scrape(
    api: &(dyn ScraperApi + Send + Sync),
    notifier: &dyn Notifier,
    request: &ScrapeRequest,
    preview: bool,
) -> Option<Displayed> {
    if request.url.trim().is_empty() {
        notifier.warning("Please enter a URL");
        return None;
    }

    let toast = notifier.loading(if preview {
        "Loading preview..."
    } else {
        "Scraping URL..."
    });

    let result = if preview {
        api.preview_scrape(request).await.map(|response| {
            (
                "Preview loaded successfully!".to_string(),
                Displayed::Preview(response.data),
            )
        })
    } else {
        api.scrape_url(request).await.map(|response| {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "URL scraped and saved!".to_string());
            (message, Displayed::Record(response.data))
        })
    };

    match result {
        Ok((message, displayed)) => {
            info!("{} ({})", message, request.url);
            notifier.update(toast, ToastKind::Success, &message);
            Some(displayed)
        }
        Err(e) => {
            error!("Scrape of {} failed: {}", request.url, e);
            notifier.update(toast, ToastKind::Error, &e.user_message("Failed to scrape URL"));
            None
        }
    }
}
