//! User-facing notifications and the login redirect hook.
//!
//! The API client never talks to the screen directly. It reports outcomes
//! through a [`Notifier`] and asks for a fresh login through a
//! [`Navigator`]; the front end decides how to show either.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// How long a toast stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Toasts kept at once; older ones are dropped first
const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: Instant,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.created_at) >= ttl
    }
}

/// Sink for transient user-facing messages
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }
}

/// Hook invoked when the session is unrecoverable and the user must log in again
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Shared, time-limited notification queue.
///
/// Clones share the same queue.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Mutex<VecDeque<Notification>>>,
    ttl: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
            ttl,
        }
    }

    /// Notifications still within their display window, oldest first
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let Ok(mut queue) = self.inner.lock() else {
            return Vec::new();
        };
        queue.retain(|n| !n.is_expired(now, self.ttl));
        queue.iter().cloned().collect()
    }

    /// Remove and return everything queued, expired or not
    pub fn drain(&self) -> Vec<Notification> {
        match self.inner.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        if let Ok(mut queue) = self.inner.lock() {
            queue.push_back(notification);
            while queue.len() > MAX_TOASTS {
                queue.pop_front();
            }
        }
    }
}

/// Flag-based [`Navigator`]; the UI loop polls [`LoginRedirect::take`]
#[derive(Clone, Default)]
pub struct LoginRedirect {
    requested: Arc<AtomicBool>,
}

impl LoginRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return whether a redirect was requested, resetting the flag
    pub fn take(&self) -> bool {
        self.requested.swap(false, Ordering::AcqRel)
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

impl Navigator for LoginRedirect {
    fn redirect_to_login(&self) {
        self.requested.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_queue_shared_between_clones() {
        let queue = ToastQueue::default();
        let other = queue.clone();
        other.success("Saved");
        other.error("Nope");

        let active = queue.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].level, NotificationLevel::Success);
        assert_eq!(active[1].message, "Nope");
    }

    #[test]
    fn test_toast_queue_expires() {
        let queue = ToastQueue::new(Duration::ZERO);
        queue.error("gone");
        assert!(queue.active().is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_toast_queue_caps_length() {
        let queue = ToastQueue::default();
        for i in 0..(MAX_TOASTS + 3) {
            queue.notify(Notification::info(format!("toast {}", i)));
        }
        let drained = queue.drain();
        assert_eq!(drained.len(), MAX_TOASTS);
        assert_eq!(drained[0].message, "toast 3");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_login_redirect_take_resets() {
        let redirect = LoginRedirect::new();
        assert!(!redirect.take());
        redirect.redirect_to_login();
        assert!(redirect.is_requested());
        assert!(redirect.take());
        assert!(!redirect.take());
    }
}
