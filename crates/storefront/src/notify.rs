//! Transient shopper notifications ("toasts").

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// How long a toast stays visible.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(1500);

/// Surfaces short messages to the shopper.
pub trait Notifier {
    /// Show a message. Messages expire on their own.
    fn show(&mut self, message: &str);
}

/// Writes notifications to the log instead of displaying them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show(&mut self, message: &str) {
        tracing::info!(notification = message, "cart notification");
    }
}

/// A displayed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub shown_at: Instant,
}

/// Stack of self-expiring toasts.
///
/// Each toast expires a fixed duration after it was shown, independent of the
/// others. Expired toasts are dropped the next time the stack is read. Clones
/// share the same stack, so the store can own one handle while the page reads
/// another.
#[derive(Debug, Clone)]
pub struct Toaster {
    inner: Rc<RefCell<ToasterInner>>,
}

#[derive(Debug)]
struct ToasterInner {
    duration: Duration,
    toasts: VecDeque<Toast>,
    next_id: u64,
}

impl Toaster {
    /// Create an empty stack whose toasts last `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ToasterInner {
                duration,
                toasts: VecDeque::new(),
                next_id: 1,
            })),
        }
    }

    /// Push a toast shown at `now`. Returns its id.
    pub fn show_at(&self, message: &str, now: Instant) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.toasts.push_back(Toast {
            id,
            message: message.to_owned(),
            shown_at: now,
        });
        id
    }

    /// Toasts still visible at `now`, oldest first.
    #[must_use]
    pub fn visible_at(&self, now: Instant) -> Vec<Toast> {
        let mut inner = self.inner.borrow_mut();
        let duration = inner.duration;
        inner
            .toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < duration);
        inner.toasts.iter().cloned().collect()
    }

    /// Toasts still visible right now.
    #[must_use]
    pub fn visible(&self) -> Vec<Toast> {
        self.visible_at(Instant::now())
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl Notifier for Toaster {
    fn show(&mut self, message: &str) {
        self.show_at(message, Instant::now());
    }
}
