use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::ScraperApi;
use crate::config::{ConfigError, RefreshConfig};
use crate::dashboard::{DashboardSnapshot, RefreshState, COUNTDOWN_MAX};
use crate::notify::{Notifier, ToastKind};

/// Timings and sizes the controller runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub auto_refresh: bool,
    pub page_size: u32,
    pub data_interval: Duration,
    pub stale_interval: Duration,
    pub stale_threshold: Duration,
    /// Wait between a successful stale refresh and the follow-up reload.
    pub settle_delay: Duration,
    /// Value the countdown resets to after a refresh cycle.
    pub countdown: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            page_size: 5,
            data_interval: Duration::from_secs(60),
            stale_interval: Duration::from_secs(60),
            stale_threshold: Duration::from_secs(60 * 60),
            settle_delay: Duration::from_millis(2000),
            countdown: COUNTDOWN_MAX,
        }
    }
}

impl DashboardSettings {
    pub fn from_config(config: &RefreshConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            auto_refresh: config.auto_refresh,
            page_size: config.page_size,
            data_interval: Duration::from_secs(config.data_interval_secs),
            stale_interval: Duration::from_secs(config.stale_interval_secs),
            stale_threshold: config.stale_threshold()?,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            countdown: config.countdown_secs.clamp(1, COUNTDOWN_MAX),
        })
    }
}

/// Owns the dashboard state and every operation that mutates it.
///
/// State lives behind a `Mutex` that is never held across an `.await`, so a
/// load commits statistics and records in one critical section. Once
/// [`dispose`](Self::dispose) has been called, responses that arrive late are
/// dropped instead of committed.
pub struct DashboardController {
    api: Arc<dyn ScraperApi + Send + Sync>,
    notifier: Arc<dyn Notifier>,
    settings: DashboardSettings,
    state: Mutex<DashboardSnapshot>,
    disposed: AtomicBool,
    /// Non-silent loads still awaiting the backend; `loading` is set while
    /// this is non-zero.
    loads_in_flight: AtomicUsize,
    /// Delayed reloads scheduled by stale refreshes.
    followups: Mutex<Vec<JoinHandle<()>>>,
}

impl DashboardController {
    pub fn new(
        api: Arc<dyn ScraperApi + Send + Sync>,
        notifier: Arc<dyn Notifier>,
        settings: DashboardSettings,
    ) -> Self {
        let state = DashboardSnapshot {
            refresh: RefreshState {
                auto_refresh_enabled: settings.auto_refresh,
                countdown_seconds: settings.countdown,
                last_updated_at: None,
            },
            ..Default::default()
        };

        Self {
            api,
            notifier,
            settings,
            state: Mutex::new(state),
            disposed: AtomicBool::new(false),
            loads_in_flight: AtomicUsize::new(0),
            followups: Mutex::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.with_state(|state| state.clone())
    }

    pub fn is_auto_refresh_enabled(&self) -> bool {
        self.with_state(|state| state.refresh.auto_refresh_enabled)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Stop committing state and cancel pending follow-up reloads.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let pending = std::mem::take(
            &mut *self
                .followups
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for handle in pending {
            handle.abort();
        }
        debug!("Dashboard controller disposed");
    }

    /// Fetch statistics and the most recent records together.
    ///
    /// A silent load reports success with a low-key info toast and only logs
    /// failures. A non-silent load raises the loading flag while in flight
    /// and surfaces failures as error toasts.
    pub async fn load_dashboard_data(&self, silent: bool) {
        if self.is_disposed() {
            return;
        }
        if !silent {
            self.with_state(|state| {
                self.loads_in_flight.fetch_add(1, Ordering::SeqCst);
                state.loading = true;
            });
        }

        let result = tokio::try_join!(
            self.api.get_statistics(),
            self.api.list_data(1, self.settings.page_size)
        );

        if self.is_disposed() {
            debug!("Discarding dashboard response after dispose");
            return;
        }

        let countdown = self.settings.countdown;
        match result {
            Ok((statistics, recent)) => {
                let count = recent.len();
                self.with_state(|state| {
                    state.statistics = Some(statistics);
                    state.recent = recent;
                    state.refresh.last_updated_at = Some(Utc::now());
                    state.refresh.countdown_seconds = countdown;
                    if !silent {
                        self.finish_loading(state);
                    }
                });
                info!("Dashboard loaded ({} recent records)", count);
                if silent {
                    self.notifier.info("Dashboard refreshed");
                }
            }
            Err(e) => {
                self.with_state(|state| {
                    if state.refresh.auto_refresh_enabled {
                        state.refresh.countdown_seconds = countdown;
                    }
                    if !silent {
                        self.finish_loading(state);
                    }
                });
                if silent {
                    warn!("Background dashboard refresh failed: {}", e);
                } else {
                    error!("Failed to load dashboard data: {}", e);
                    self.notifier
                        .error(&e.user_message("Failed to load dashboard data"));
                }
            }
        }
    }

    /// Ask the backend to re-scrape stale records, then reload once it settles.
    pub async fn refresh_stale_urls(self: &Arc<Self>) {
        if self.is_disposed() {
            return;
        }

        match self.api.refresh_stale(self.settings.stale_threshold).await {
            Ok(response) if response.has_refreshed() => {
                if self.is_disposed() {
                    return;
                }
                info!("Stale refresh: {}", response.message);
                self.notifier.info(&response.message);
                self.schedule_reload();
            }
            Ok(_) => debug!("No stale URLs to refresh"),
            Err(e) => warn!("Stale URL refresh failed: {}", e),
        }
    }

    fn schedule_reload(self: &Arc<Self>) {
        let controller = Arc::clone(self);
        let delay = self.settings.settle_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.load_dashboard_data(true).await;
        });

        let mut followups = self
            .followups
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        followups.retain(|h| !h.is_finished());
        followups.push(handle);
    }

    /// Flip auto-refresh and return the new value. Timers keep running and
    /// check the flag when they fire.
    pub fn toggle_auto_refresh(&self) -> bool {
        let enabled = self.with_state(|state| {
            state.refresh.auto_refresh_enabled = !state.refresh.auto_refresh_enabled;
            state.refresh.auto_refresh_enabled
        });
        info!("Auto-refresh {}", if enabled { "enabled" } else { "disabled" });
        enabled
    }

    pub async fn handle_manual_refresh(&self) {
        self.notifier.info("Refreshing dashboard...");
        self.load_dashboard_data(false).await;
    }

    /// Delete a record and reload the dashboard. Returns whether the backend
    /// accepted the delete.
    pub async fn delete_record(&self, id: &str) -> bool {
        match delete_with_feedback(self.api.as_ref(), self.notifier.as_ref(), id).await {
            Ok(_) => {
                self.load_dashboard_data(false).await;
                true
            }
            Err(_) => false,
        }
    }

    /// One countdown step; wraps from 0 back to the reset value.
    pub fn tick_countdown(&self) -> u32 {
        let reset = self.settings.countdown;
        self.with_state(|state| {
            let refresh = &mut state.refresh;
            refresh.countdown_seconds = match refresh.countdown_seconds {
                0 => reset,
                n => n - 1,
            };
            refresh.countdown_seconds
        })
    }

    /// Called with the state lock held, so the counter and flag move together.
    fn finish_loading(&self, state: &mut DashboardSnapshot) {
        let remaining = self.loads_in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        state.loading = remaining > 0;
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut DashboardSnapshot) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

/// Delete `id` behind a loading toast that settles on the backend message,
/// `"Deleted successfully!"`, or the error text. Returns the message shown.
pub async fn delete_with_feedback(
    api: &(dyn ScraperApi + Send + Sync),
    notifier: &dyn Notifier,
    id: &str,
) -> crate::app::Result<String> {
    let toast = notifier.loading("Deleting...");

    match api.delete_data(id).await {
        Ok(response) => {
            let message = response.message_or("Deleted successfully!");
            info!("Deleted record {}", id);
            notifier.update(toast, ToastKind::Success, &message);
            Ok(message)
        }
        Err(e) => {
            error!("Failed to delete record {}: {}", id, e);
            notifier.update(toast, ToastKind::Error, &e.user_message("Failed to delete"));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{record, FakeApi};
    use crate::api::StaleRefreshResponse;
    use crate::domain::Statistics;
    use crate::notify::ToastCenter;

    fn stats(total: u64) -> Statistics {
        Statistics {
            total_scraped: total,
            unique_urls: 10,
            recent_scrapes: 3,
        }
    }

    fn setup(api: FakeApi) -> (Arc<DashboardController>, Arc<FakeApi>, Arc<ToastCenter>) {
        let api = Arc::new(api);
        let toasts = Arc::new(ToastCenter::default());
        let controller = Arc::new(DashboardController::new(
            api.clone(),
            toasts.clone(),
            DashboardSettings::default(),
        ));
        (controller, api, toasts)
    }

    fn default_api() -> FakeApi {
        let now = Utc::now();
        FakeApi::new(
            stats(42),
            vec![
                record("a", now - chrono::Duration::minutes(2)),
                record("b", now - chrono::Duration::minutes(90)),
            ],
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_commits_and_resets_countdown() {
        let (controller, _api, toasts) = setup(default_api());
        controller.tick_countdown();
        controller.tick_countdown();
        assert_eq!(controller.snapshot().refresh.countdown_seconds, 58);

        let started = Utc::now();
        controller.load_dashboard_data(false).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.statistics, Some(stats(42)));
        assert_eq!(snapshot.recent.len(), 2);
        assert_eq!(snapshot.refresh.countdown_seconds, 60);
        assert!(snapshot.refresh.last_updated_at.unwrap() >= started);
        assert!(!snapshot.loading);
        assert!(toasts.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_load_shows_refreshed_toast() {
        let (controller, _api, toasts) = setup(default_api());
        controller.load_dashboard_data(true).await;

        assert_eq!(
            toasts.messages(),
            vec![(ToastKind::Info, "Dashboard refreshed".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_failure_keeps_state_and_stays_quiet() {
        let (controller, api, toasts) = setup(default_api());
        controller.load_dashboard_data(false).await;
        let before = controller.snapshot();

        *api.stats.lock().unwrap() = stats(99);
        api.fail_list.store(true, Ordering::SeqCst);
        controller.load_dashboard_data(true).await;

        let after = controller.snapshot();
        assert_eq!(after.statistics, before.statistics);
        assert_eq!(after.recent, before.recent);
        assert_eq!(after.refresh.last_updated_at, before.refresh.last_updated_at);
        assert!(toasts
            .messages()
            .iter()
            .all(|(kind, _)| *kind != ToastKind::Error));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loud_failure_shows_error_toast() {
        let (controller, api, toasts) = setup(default_api());
        api.fail_stats.store(true, Ordering::SeqCst);
        controller.load_dashboard_data(false).await;

        let snapshot = controller.snapshot();
        assert!(snapshot.statistics.is_none());
        assert!(!snapshot.loading);
        assert_eq!(
            toasts.messages(),
            vec![(ToastKind::Error, "stats failed".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_resets_countdown_only_when_enabled() {
        let (controller, api, _toasts) = setup(default_api());
        api.fail_stats.store(true, Ordering::SeqCst);

        controller.tick_countdown();
        controller.load_dashboard_data(true).await;
        assert_eq!(controller.snapshot().refresh.countdown_seconds, 60);

        controller.toggle_auto_refresh();
        controller.tick_countdown();
        controller.load_dashboard_data(true).await;
        assert_eq!(controller.snapshot().refresh.countdown_seconds, 59);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_wraps() {
        let (controller, _api, _toasts) = setup(default_api());
        for _ in 0..60 {
            controller.tick_countdown();
        }
        assert_eq!(controller.snapshot().refresh.countdown_seconds, 0);
        assert_eq!(controller.tick_countdown(), 60);
        assert_eq!(controller.tick_countdown(), 59);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_refresh_announces_first() {
        let (controller, _api, toasts) = setup(default_api());
        controller.handle_manual_refresh().await;

        assert_eq!(
            toasts.messages(),
            vec![(ToastKind::Info, "Refreshing dashboard...".to_string())]
        );
        assert!(controller.snapshot().statistics.is_some());
    }

    fn spawn_load(
        controller: &Arc<DashboardController>,
        silent: bool,
    ) -> JoinHandle<()> {
        let controller = Arc::clone(controller);
        tokio::spawn(async move { controller.load_dashboard_data(silent).await })
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_flag_tracks_loud_load() {
        let (controller, api, _toasts) = setup(default_api());
        api.list_script
            .lock()
            .unwrap()
            .push_back((Duration::from_secs(3), vec![record("a", Utc::now())]));

        let load = spawn_load(&controller, false);
        tokio::task::yield_now().await;
        assert!(controller.snapshot().loading);

        load.await.unwrap();
        assert!(!controller.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_load_leaves_loading_flag_alone() {
        let (controller, api, _toasts) = setup(default_api());
        api.list_script
            .lock()
            .unwrap()
            .push_back((Duration::from_secs(3), vec![record("a", Utc::now())]));

        let load = spawn_load(&controller, true);
        tokio::task::yield_now().await;
        assert!(!controller.snapshot().loading);

        load.await.unwrap();
        assert!(!controller.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_loud_loads_keep_loading_until_last() {
        let (controller, api, _toasts) = setup(default_api());
        let now = Utc::now();
        {
            let mut script = api.list_script.lock().unwrap();
            script.push_back((Duration::from_secs(5), vec![record("slow", now)]));
            script.push_back((Duration::from_secs(1), vec![record("fast", now)]));
        }

        let slow = spawn_load(&controller, false);
        tokio::task::yield_now().await;
        let fast = spawn_load(&controller, false);

        fast.await.unwrap();
        assert_eq!(controller.snapshot().recent[0].id, "fast");
        assert!(controller.snapshot().loading);

        slow.await.unwrap();
        assert!(!controller.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_loud_load_clears_loading() {
        let (controller, api, _toasts) = setup(default_api());
        api.fail_list.store(true, Ordering::SeqCst);
        api.list_script
            .lock()
            .unwrap()
            .push_back((Duration::from_secs(1), vec![]));

        let slow = spawn_load(&controller, false);
        tokio::task::yield_now().await;
        controller.load_dashboard_data(false).await;
        assert!(controller.snapshot().loading);

        slow.await.unwrap();
        assert!(!controller.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_applied_response_wins() {
        let (controller, api, _toasts) = setup(default_api());
        let now = Utc::now();
        {
            let mut script = api.list_script.lock().unwrap();
            script.push_back((Duration::from_secs(5), vec![record("slow", now)]));
            script.push_back((Duration::from_secs(1), vec![record("fast", now)]));
        }

        let background = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.load_dashboard_data(true).await })
        };
        tokio::task::yield_now().await;

        controller.handle_manual_refresh().await;
        assert_eq!(controller.snapshot().recent[0].id, "fast");

        background.await.unwrap();
        assert_eq!(controller.snapshot().recent[0].id, "slow");
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_drops_late_response() {
        let (controller, api, toasts) = setup(default_api());
        api.list_script
            .lock()
            .unwrap()
            .push_back((Duration::from_secs(5), vec![record("late", Utc::now())]));

        let pending = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.load_dashboard_data(true).await })
        };
        tokio::task::yield_now().await;
        controller.dispose();
        pending.await.unwrap();

        let snapshot = controller.snapshot();
        assert!(snapshot.statistics.is_none());
        assert!(snapshot.recent.is_empty());
        assert!(toasts.messages().is_empty());

        controller.load_dashboard_data(false).await;
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_refresh_schedules_delayed_reload() {
        let (controller, api, toasts) = setup(default_api());
        *api.stale_response.lock().unwrap() = StaleRefreshResponse {
            success: true,
            message: "Refreshed 3 URLs".to_string(),
            refreshed: Some(3),
        };

        controller.refresh_stale_urls().await;
        assert_eq!(
            toasts.messages(),
            vec![(ToastKind::Info, "Refreshed 3 URLs".to_string())]
        );
        assert_eq!(api.fetch_calls(), 0);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(api.fetch_calls(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(api.fetch_calls(), 2);
        assert_eq!(
            toasts.messages().last(),
            Some(&(ToastKind::Info, "Dashboard refreshed".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_refresh_with_nothing_to_do() {
        let (controller, api, toasts) = setup(default_api());
        *api.stale_response.lock().unwrap() = StaleRefreshResponse {
            success: true,
            message: "Refreshed 0 URLs".to_string(),
            refreshed: Some(0),
        };

        controller.refresh_stale_urls().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(toasts.messages().is_empty());
        assert_eq!(api.fetch_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_refresh_failure_is_silent() {
        let (controller, api, toasts) = setup(default_api());
        api.fail_stale.store(true, Ordering::SeqCst);

        controller.refresh_stale_urls().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(toasts.messages().is_empty());
        assert_eq!(api.stale_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.fetch_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_cancels_followup_reload() {
        let (controller, api, _toasts) = setup(default_api());
        *api.stale_response.lock().unwrap() = StaleRefreshResponse {
            success: true,
            message: "Refreshed 1 URLs".to_string(),
            refreshed: Some(1),
        };

        controller.refresh_stale_urls().await;
        controller.dispose();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.fetch_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_success_reloads() {
        let (controller, api, toasts) = setup(default_api());
        assert!(controller.delete_record("a").await);

        assert_eq!(api.delete_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            toasts.messages(),
            vec![(ToastKind::Success, "Deleted a".to_string())]
        );
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.recent.len(), 1);
        assert_eq!(snapshot.recent[0].id, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_failure_uses_backend_message() {
        let (controller, api, toasts) = setup(default_api());
        *api.fail_delete.lock().unwrap() = Some("Record not found".to_string());
        assert!(!controller.delete_record("zzz").await);
        assert_eq!(
            toasts.messages(),
            vec![(ToastKind::Error, "Record not found".to_string())]
        );
        assert_eq!(api.fetch_calls(), 0);

        *api.fail_delete.lock().unwrap() = Some(String::new());
        controller.delete_record("zzz").await;
        assert_eq!(
            toasts.messages().last(),
            Some(&(ToastKind::Error, "Failed to delete".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_feedback_defaults_blank_message() {
        let api = FakeApi::new(stats(1), vec![]);
        let toasts = ToastCenter::default();

        *api.fail_delete.lock().unwrap() = Some(String::new());
        assert!(delete_with_feedback(&api, &toasts, "x").await.is_err());

        *api.fail_delete.lock().unwrap() = None;
        let message = delete_with_feedback(&api, &toasts, "x").await.unwrap();
        assert_eq!(message, "Deleted x");
        assert_eq!(
            toasts.messages(),
            vec![
                (ToastKind::Error, "Failed to delete".to_string()),
                (ToastKind::Success, "Deleted x".to_string()),
            ]
        );
    }

    #[test]
    fn test_settings_from_config() {
        let config = RefreshConfig {
            countdown_secs: 500,
            stale_threshold: "30m".to_string(),
            ..Default::default()
        };
        let settings = DashboardSettings::from_config(&config).unwrap();
        assert_eq!(
            settings,
            DashboardSettings {
                countdown: COUNTDOWN_MAX,
                stale_threshold: Duration::from_secs(1800),
                ..Default::default()
            }
        );

        let bad = RefreshConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(DashboardSettings::from_config(&bad).is_err());
    }
}
