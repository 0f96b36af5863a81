//! Transient notices.
//!
//! Every form outcome surfaces as a notice in that form's slot. A notice
//! stays visible for five seconds and a new post replaces whatever the slot
//! held, so rapid resubmission never stacks banners.

use chrono::{DateTime, Duration, Utc};

/// How long a notice stays visible.
pub const NOTICE_TTL_SECONDS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Which banner this belongs to (`login`, `register`, `busInfo`, ...).
    pub slot: String,
    pub kind: NoticeKind,
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

impl Notice {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.posted_at + Duration::seconds(NOTICE_TTL_SECONDS)
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }
}

/// The currently posted notices, at most one per slot.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    entries: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post into `slot`, replacing whatever was there.
    pub fn post(&mut self, slot: &str, kind: NoticeKind, message: impl Into<String>) {
        self.post_at(slot, kind, message, Utc::now());
    }

    pub fn post_at(
        &mut self,
        slot: &str,
        kind: NoticeKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.entries.retain(|notice| notice.slot != slot);
        self.entries.push(Notice {
            slot: slot.to_string(),
            kind,
            message: message.into(),
            posted_at: now,
        });
    }

    /// Notices still visible at `now`. Expired ones are swept out.
    pub fn active(&mut self, now: DateTime<Utc>) -> Vec<Notice> {
        self.entries.retain(|notice| notice.is_active(now));
        self.entries.clone()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
