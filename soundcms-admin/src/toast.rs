//! Toast notifications and the messaging channel they travel on.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;

/// Default duration for toast notifications.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);

/// Toasts kept for [`Messages::drain`]; older ones are dropped first.
pub const MAX_QUEUED_TOASTS: usize = 64;

/// Toast notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// A toast notification.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use soundcms_admin::toast::{Toast, ToastLevel};
///
/// let toast = Toast::error("Failed to load sounds").with_duration(Duration::from_secs(8));
/// assert_eq!(toast.level, ToastLevel::Error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Severity.
    pub level: ToastLevel,
    /// Text shown to the user.
    pub message: String,
    /// How long to show the toast.
    pub duration: Duration,
}

impl Toast {
    fn with_level(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    /// Create an info toast.
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Info, message)
    }

    /// Create a success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Success, message)
    }

    /// Create a warning toast.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Warning, message)
    }

    /// Create an error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Error, message)
    }

    /// Set a custom duration for this toast.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl From<String> for Toast {
    fn from(message: String) -> Self {
        Toast::info(message)
    }
}

impl From<&str> for Toast {
    fn from(message: &str) -> Self {
        Toast::info(message)
    }
}

// =============================================================================
// Messages
// =============================================================================

#[derive(Default)]
struct MessagesInner {
    queue: VecDeque<Toast>,
    subscribers: Vec<mpsc::UnboundedSender<Toast>>,
}

/// The messaging channel shared by tables and forms.
///
/// Cheap to clone; all clones feed the same queue. Pushed toasts are queued
/// for polling with [`drain`](Self::drain) and forwarded to every live
/// [`subscribe`](Self::subscribe) receiver. The queue holds at most
/// [`MAX_QUEUED_TOASTS`] entries.
#[derive(Clone, Default)]
pub struct Messages {
    inner: Arc<Mutex<MessagesInner>>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast and forward it to subscribers.
    pub fn push(&self, toast: impl Into<Toast>) {
        let toast = toast.into();
        match toast.level {
            ToastLevel::Error => error!("toast: {}", toast.message),
            ToastLevel::Warning => warn!("toast: {}", toast.message),
            ToastLevel::Success | ToastLevel::Info => info!("toast: {}", toast.message),
        }

        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|tx| tx.send(toast.clone()).is_ok());
        if inner.queue.len() == MAX_QUEUED_TOASTS {
            inner.queue.pop_front();
        }
        inner.queue.push_back(toast);
    }

    /// Take every queued toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.lock().queue.drain(..).collect()
    }

    /// Number of queued toasts.
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recently queued toast, if any.
    pub fn last(&self) -> Option<Toast> {
        self.lock().queue.back().cloned()
    }

    /// Receive every toast pushed from now on.
    ///
    /// Dropped receivers are pruned on the next push.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Toast> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        inner.subscribers.push(tx);
        debug!("messages: {} subscriber(s)", inner.subscribers.len());
        rx
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MessagesInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("queued", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_level() {
        assert_eq!(Toast::info("a").level, ToastLevel::Info);
        assert_eq!(Toast::success("a").level, ToastLevel::Success);
        assert_eq!(Toast::warning("a").level, ToastLevel::Warning);
        assert_eq!(Toast::error("a").level, ToastLevel::Error);
        assert_eq!(Toast::info("a").duration, DEFAULT_TOAST_DURATION);
    }

    #[test]
    fn test_push_and_drain() {
        let messages = Messages::new();
        let shared = messages.clone();
        shared.push(Toast::success("Saved"));
        shared.push("plain text");

        assert_eq!(messages.len(), 2);
        let drained = messages.drain();
        assert_eq!(drained[0].message, "Saved");
        assert_eq!(drained[1].level, ToastLevel::Info);
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_forwards() {
        let messages = Messages::new();
        let mut rx = messages.subscribe();
        messages.push(Toast::error("boom"));

        let toast = rx.recv().await.unwrap();
        assert_eq!(toast.message, "boom");
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_queue_is_bounded() {
        let messages = Messages::new();
        let _rx = messages.subscribe();
        for i in 0..MAX_QUEUED_TOASTS + 10 {
            messages.push(Toast::error(format!("failure {}", i)));
        }

        assert_eq!(messages.len(), MAX_QUEUED_TOASTS);
        let drained = messages.drain();
        assert_eq!(drained[0].message, "failure 10");
        assert_eq!(
            drained.last().unwrap().message,
            format!("failure {}", MAX_QUEUED_TOASTS + 9)
        );
    }

    #[test]
    fn test_dropped_subscriber_pruned() {
        let messages = Messages::new();
        drop(messages.subscribe());
        messages.push("one");
        assert_eq!(messages.inner.lock().unwrap().subscribers.len(), 0);
    }
}
