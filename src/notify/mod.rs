//! User-facing transient notifications ("toasts").
//!
//! The dashboard and submission flows only ever talk to the [`Notifier`]
//! trait. The TUI plugs in a [`ToastCenter`], one-shot CLI commands a
//! [`ConsoleNotifier`].

mod console;
mod toast;

pub use console::ConsoleNotifier;
pub use toast::{Toast, ToastCenter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

impl ToastKind {
    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Info => "i",
            ToastKind::Success => "✓",
            ToastKind::Warning => "!",
            ToastKind::Error => "✗",
            ToastKind::Loading => "…",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

/// Fire-and-forget notification surface.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: ToastKind, message: &str);

    /// Show a loading toast that stays until [`Notifier::update`] settles it.
    fn loading(&self, message: &str) -> ToastId;

    /// Turn a loading toast into a terminal one.
    fn update(&self, id: ToastId, kind: ToastKind, message: &str);

    fn info(&self, message: &str) {
        self.notify(ToastKind::Info, message);
    }

    fn success(&self, message: &str) {
        self.notify(ToastKind::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(ToastKind::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(ToastKind::Error, message);
    }
}
