use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::notify::{Notifier, ToastId, ToastKind};

pub const DEFAULT_AUTO_CLOSE: Duration = Duration::from_millis(3000);
const MAX_TOASTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug, Default)]
struct ToastState {
    next_id: u64,
    toasts: Vec<Toast>,
}

/// In-memory toast list backing the TUI status bar.
///
/// Terminal toasts expire `auto_close` after they were shown; loading toasts
/// stay until updated.
#[derive(Debug)]
pub struct ToastCenter {
    auto_close: Duration,
    state: Mutex<ToastState>,
}

impl ToastCenter {
    pub fn new(auto_close: Duration) -> Self {
        Self {
            auto_close,
            state: Mutex::new(ToastState::default()),
        }
    }

    /// Most recent live toast, if any.
    pub fn latest(&self) -> Option<Toast> {
        self.latest_at(Instant::now())
    }

    pub fn latest_at(&self, now: Instant) -> Option<Toast> {
        self.with_state(|state| {
            state
                .toasts
                .iter()
                .rev()
                .find(|t| !self.is_expired(t, now))
                .cloned()
        })
    }

    /// Drop expired toasts.
    pub fn prune(&self, now: Instant) {
        let auto_close = self.auto_close;
        self.with_state(|state| {
            state.toasts.retain(|t| !Self::expired(auto_close, t, now));
        });
    }

    /// Every toast still held, oldest first.
    pub fn all(&self) -> Vec<Toast> {
        self.with_state(|state| state.toasts.clone())
    }

    /// `(kind, message)` pairs, oldest first.
    pub fn messages(&self) -> Vec<(ToastKind, String)> {
        self.all()
            .into_iter()
            .map(|t| (t.kind, t.message))
            .collect()
    }

    fn is_expired(&self, toast: &Toast, now: Instant) -> bool {
        Self::expired(self.auto_close, toast, now)
    }

    fn expired(auto_close: Duration, toast: &Toast, now: Instant) -> bool {
        toast.kind != ToastKind::Loading
            && now.saturating_duration_since(toast.shown_at) >= auto_close
    }

    fn push(&self, kind: ToastKind, message: &str) -> ToastId {
        self.with_state(|state| Self::push_locked(state, kind, message))
    }

    fn push_locked(state: &mut ToastState, kind: ToastKind, message: &str) -> ToastId {
        state.next_id += 1;
        let id = ToastId(state.next_id);
        state.toasts.push(Toast {
            id,
            kind,
            message: message.to_string(),
            shown_at: Instant::now(),
        });
        if state.toasts.len() > MAX_TOASTS {
            let excess = state.toasts.len() - MAX_TOASTS;
            state.toasts.drain(..excess);
        }
        id
    }

    /// Recovers a poisoned lock; every mutation leaves the list consistent.
    fn with_state<R>(&self, f: impl FnOnce(&mut ToastState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_CLOSE)
    }
}

impl Notifier for ToastCenter {
    fn notify(&self, kind: ToastKind, message: &str) {
        tracing::debug!("toast {:?}: {}", kind, message);
        self.push(kind, message);
    }

    fn loading(&self, message: &str) -> ToastId {
        self.push(ToastKind::Loading, message)
    }

    fn update(&self, id: ToastId, kind: ToastKind, message: &str) {
        self.with_state(|state| {
            match state.toasts.iter_mut().find(|t| t.id == id) {
                Some(toast) => {
                    toast.kind = kind;
                    toast.message = message.to_string();
                    toast.shown_at = Instant::now();
                }
                None => {
                    Self::push_locked(state, kind, message);
                }
            }
        });
    }
}
