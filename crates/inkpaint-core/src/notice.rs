//! Transient status banners ("Drawing saved", "Failed to load", ...).

use crate::storage::StorageError;
use std::time::{Duration, Instant};

/// How long a notice stays visible.
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    shown_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTICE_DURATION
    }
}

/// Holds at most one notice; a new one replaces the old.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, text: impl Into<String>, kind: NoticeKind) {
        self.show_at(text, kind, Instant::now());
    }

    pub fn show_at(&mut self, text: impl Into<String>, kind: NoticeKind, now: Instant) {
        self.current = Some(Notice {
            text: text.into(),
            kind,
            shown_at: now,
        });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.show(text, NoticeKind::Success);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(text, NoticeKind::Error);
    }

    /// Report a failed store operation.
    pub fn storage_error(&mut self, action: &str, err: &StorageError) {
        let text = match err {
            StorageError::Unauthorized(_) | StorageError::Forbidden(_) => {
                format!("{}: please sign in again", action)
            }
            StorageError::NotFound(_) => format!("{}: drawing not found", action),
            StorageError::Invalid(msg) | StorageError::Conflict(msg) => format!("{}: {}", action, msg),
            _ => action.to_string(),
        };
        self.error(text);
    }

    /// The notice still visible at `now`, if any.
    pub fn current_at(&self, now: Instant) -> Option<&Notice> {
        self.current.as_ref().filter(|n| !n.is_expired(now))
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current_at(Instant::now())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
