//! Channel, message, and cursor domain types.
//!
//! A [`ChannelLog`] is an append-only sequence of [`StoredMessage`]s plus a
//! map of per-agent read cursors. Messages have no IDs — a message is
//! identified by its 0-based position in the log, and indices are dense and
//! never renumbered.
//!
//! The serialized shape is the persisted wire format: a channel maps to
//! `{"messages": [{"time", "agent", "text"}, ...], "last_read": {agent: idx}}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cursor value for an agent that has never read a channel.
pub const NEVER_READ: i64 = -1;

/// The full persisted store: channel name → channel log.
pub type StoreState = HashMap<String, ChannelLog>;

/// A single immutable message in a channel's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Creation timestamp (UTC). Non-decreasing across the log.
    pub time: DateTime<Utc>,

    /// Self-asserted sender name.
    pub agent: String,

    /// Arbitrary UTF-8 payload, stored unescaped.
    pub text: String,
}

impl StoredMessage {
    pub fn new(agent: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            agent: agent.into(),
            text: text.into(),
        }
    }
}

/// One named channel: its message log and per-agent read cursors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelLog {
    /// Append-only, insertion order = arrival order.
    #[serde(default)]
    pub messages: Vec<StoredMessage>,

    /// Agent name → index of the last message that agent has consumed.
    #[serde(default)]
    pub last_read: HashMap<String, i64>,
}

impl ChannelLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The agent's cursor, clamped to the log: never below [`NEVER_READ`],
    /// never greater than `len - 1`. A persisted file can carry any `i64`.
    pub fn cursor_for(&self, agent: &str) -> i64 {
        let stored = self.last_read.get(agent).copied().unwrap_or(NEVER_READ);
        stored.clamp(NEVER_READ, self.messages.len() as i64 - 1)
    }

    /// Messages after the agent's cursor, regardless of author.
    pub fn unread_count(&self, agent: &str) -> usize {
        let cursor = self.cursor_for(agent);
        (self.messages.len() as i64 - 1 - cursor).max(0) as usize
    }

    /// Append a message and return its index.
    pub fn append(&mut self, message: StoredMessage) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Move the agent's cursor to `index`. Cursors only move forward.
    pub fn mark_read_to(&mut self, agent: &str, index: i64) {
        let entry = self.last_read.entry(agent.to_string()).or_insert(NEVER_READ);
        *entry = (*entry).max(index);
    }
}

/// Which window a read request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Unread messages since the agent's cursor; advances the cursor.
    New,
    /// The most recent messages regardless of cursor; read-only.
    History,
}

impl Default for ReadMode {
    fn default() -> Self {
        Self::New
    }
}

impl std::str::FromStr for ReadMode {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "history" => Ok(Self::History),
            _ => Err(crate::error::Error::validation(
                "Invalid mode. Must be 'new' or 'history'",
            )),
        }
    }
}

impl std::fmt::Display for ReadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::History => write!(f, "history"),
        }
    }
}

/// Result of a successful send: where the message landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub index: usize,
}

/// Result of a read: the kept window plus bookkeeping counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResult {
    /// Kept messages, in original log order.
    pub messages: Vec<StoredMessage>,

    /// Total messages in the channel (not just this window).
    pub total: usize,

    /// Messages in the returned payload that are new to the agent.
    /// Always 0 in history mode.
    pub new_messages: usize,

    /// Unread messages dropped from this response by the overflow limit.
    /// They are marked read anyway and never replayed.
    pub skipped: usize,

    /// Size of the returned payload.
    pub returned: usize,

    pub mode: ReadMode,
}

impl ReadResult {
    /// An empty result, e.g. for a channel that does not exist yet.
    pub fn empty(mode: ReadMode) -> Self {
        Self {
            messages: Vec::new(),
            total: 0,
            new_messages: 0,
            skipped: 0,
            returned: 0,
            mode,
        }
    }
}

/// One row of the channel listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub name: String,
    pub message_count: usize,
}
