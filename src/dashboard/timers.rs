use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::dashboard::DashboardController;

/// Fallback first tick for periods the clock cannot add.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Countdown display resolution.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Keeps the three dashboard timers alive.
///
/// Stopping or dropping the handle disposes the controller and aborts every
/// timer task together.
pub struct RefreshHandle {
    controller: Arc<DashboardController>,
    tasks: Vec<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn stop(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        self.controller.dispose();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        debug!("Dashboard timers stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Interval whose first tick is one full period from now, or as far out as
/// the clock can represent.
fn periodic(period: Duration) -> Interval {
    let now = Instant::now();
    let start = now
        .checked_add(period)
        .unwrap_or_else(|| now + FAR_FUTURE);
    let mut timer = interval_at(start, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

impl DashboardController {
    /// Register the data refresh, stale remediation and countdown timers.
    ///
    /// Both refresh timers check the auto-refresh flag when they fire; the
    /// countdown ticks regardless. Must be called from within a Tokio runtime.
    pub fn start(self: &Arc<Self>) -> RefreshHandle {
        let data_interval = self.settings().data_interval;
        let stale_interval = self.settings().stale_interval;

        let data = {
            let controller = Arc::clone(self);
            tokio::spawn(async move {
                let mut timer = periodic(data_interval);
                loop {
                    timer.tick().await;
                    if controller.is_disposed() {
                        break;
                    }
                    if controller.is_auto_refresh_enabled() {
                        debug!("Scheduled dashboard refresh");
                        controller.load_dashboard_data(true).await;
                    }
                }
            })
        };

        let stale = {
            let controller = Arc::clone(self);
            tokio::spawn(async move {
                let mut timer = periodic(stale_interval);
                loop {
                    timer.tick().await;
                    if controller.is_disposed() {
                        break;
                    }
                    if controller.is_auto_refresh_enabled() {
                        debug!("Scheduled stale URL refresh");
                        controller.refresh_stale_urls().await;
                    }
                }
            })
        };

        let countdown = {
            let controller = Arc::clone(self);
            tokio::spawn(async move {
                let mut timer = interval(COUNTDOWN_TICK);
                timer.tick().await;
                loop {
                    timer.tick().await;
                    if controller.is_disposed() {
                        break;
                    }
                    controller.tick_countdown();
                }
            })
        };

        RefreshHandle {
            controller: Arc::clone(self),
            tasks: vec![data, stale, countdown],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::Utc;

    use super::*;
    use crate::api::fake::{record, FakeApi};
    use crate::api::StaleRefreshResponse;
    use crate::dashboard::DashboardSettings;
    use crate::domain::Statistics;
    use crate::notify::ToastCenter;

    fn controller(api: Arc<FakeApi>) -> Arc<DashboardController> {
        Arc::new(DashboardController::new(
            api,
            Arc::new(ToastCenter::default()),
            DashboardSettings::default(),
        ))
    }

    fn api() -> Arc<FakeApi> {
        Arc::new(FakeApi::new(
            Statistics::default(),
            vec![record("a", Utc::now())],
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_data_timer_fires_every_minute() {
        let api = api();
        let controller = controller(api.clone());
        let _handle = controller.start();

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.stale_calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(api.stale_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_period_keeps_timer_alive() {
        let api = api();
        let controller = Arc::new(DashboardController::new(
            api.clone(),
            Arc::new(ToastCenter::default()),
            DashboardSettings {
                data_interval: Duration::MAX,
                ..Default::default()
            },
        ));
        let handle = controller.start();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.stale_calls.load(Ordering::SeqCst), 1);
        assert!(handle.tasks.iter().all(|task| !task.is_finished()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_ticks_every_second() {
        let controller = controller(api());
        let _handle = controller.start();

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(controller.snapshot().refresh.countdown_seconds, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_auto_refresh_skips_fetches() {
        let api = api();
        let controller = controller(api.clone());
        controller.toggle_auto_refresh();
        let _handle = controller.start();

        tokio::time::sleep(Duration::from_secs(125)).await;
        assert_eq!(api.fetch_calls(), 0);
        assert_eq!(api.stale_calls.load(Ordering::SeqCst), 0);
        // countdown keeps ticking while disabled
        assert_ne!(controller.snapshot().refresh.countdown_seconds, 60);

        controller.toggle_auto_refresh();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_tears_down_every_timer() {
        let api = api();
        *api.stale_response.lock().unwrap() = StaleRefreshResponse {
            success: true,
            message: "Refreshed 2 URLs".to_string(),
            refreshed: Some(2),
        };
        let controller = controller(api.clone());
        let mut handle = controller.start();
        assert!(handle.is_running());

        tokio::time::sleep(Duration::from_secs(61)).await;
        let calls = api.fetch_calls();
        let countdown = controller.snapshot().refresh.countdown_seconds;

        // the stale follow-up reload is still pending at this point
        handle.stop();
        assert!(!handle.is_running());
        assert!(controller.is_disposed());

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(api.fetch_calls(), calls);
        assert_eq!(api.stale_calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.snapshot().refresh.countdown_seconds, countdown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_disposes_controller() {
        let api = api();
        let controller = controller(api.clone());
        drop(controller.start());

        assert!(controller.is_disposed());
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(api.fetch_calls(), 0);
    }
}
