use std::sync::atomic::{AtomicU64, Ordering};

use crate::notify::{Notifier, ToastId, ToastKind};

/// Prints notifications for one-shot CLI commands.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    next_id: AtomicU64,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: ToastKind, message: &str) {
        match kind {
            ToastKind::Error | ToastKind::Warning => eprintln!("{} {}", kind.icon(), message),
            _ => println!("{} {}", kind.icon(), message),
        }
    }

    fn loading(&self, message: &str) -> ToastId {
        println!("{} {}", ToastKind::Loading.icon(), message);
        ToastId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn update(&self, _id: ToastId, kind: ToastKind, message: &str) {
        self.notify(kind, message);
    }
}
