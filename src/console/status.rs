//! Transient status banner.
//!
//! At most one message is live. A new message replaces the current one and
//! restarts the clock; nothing is queued.

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Banner colour, in spirit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

/// One status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Holds the live message and when it expires.
#[derive(Debug)]
pub struct StatusBanner {
    ttl: Duration,
    current: Option<(StatusMessage, Instant)>,
}

impl StatusBanner {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Show a message, replacing whatever is live.
    pub fn show(&mut self, message: StatusMessage) {
        tracing::debug!(kind = message.kind.as_str(), text = %message.text, "status");
        self.current = Some((message, Instant::now() + self.ttl));
    }

    /// The live message, if it has not expired yet.
    pub fn current(&self) -> Option<&StatusMessage> {
        match &self.current {
            Some((message, deadline)) if Instant::now() < *deadline => Some(message),
            _ => None,
        }
    }

    /// When the live message expires.
    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Drop the message if its deadline has passed. Returns true if one was dropped.
    pub fn expire(&mut self) -> bool {
        match &self.current {
            Some((_, deadline)) if Instant::now() >= *deadline => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}
