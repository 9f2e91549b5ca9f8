//! The Channel Store — relay semantics behind one lock.
//!
//! A single `RwLock` guards the whole state: send and new-mode reads take
//! the write half (both mutate cursors), history reads and listings take the
//! read half. The unread computation, the append, and the cursor update all
//! happen inside one critical section, and the flush happens there too —
//! success is only reported once the state is on disk.

use crate::storage::Storage;
use agenthub_core::{
    ChannelLog, ChannelSummary, Error, ReadMode, ReadResult, Result, SendReceipt, StoreState,
    StoredMessage, validate_name,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Floor for read limits. Requests for less are silently raised — a smaller
/// window would let an agent "catch up" without seeing what it skipped.
pub const MIN_READ_LIMIT: usize = 20;

/// Process-wide channel registry. One instance per server, shared via `Arc`.
pub struct ChannelStore {
    storage: Box<dyn Storage>,
    state: RwLock<StoreState>,
}

impl ChannelStore {
    /// Load the persisted state and wrap it. Fails if the backend holds a
    /// document we cannot parse — refusing to start beats discarding history.
    pub fn open(storage: Box<dyn Storage>) -> Result<Self> {
        let state = storage.load()?;
        info!(
            backend = storage.name(),
            channels = state.len(),
            "Channel store opened"
        );
        Ok(Self {
            storage,
            state: RwLock::new(state),
        })
    }

    /// Append a message, enforcing check-before-send.
    ///
    /// The sender's cursor is advanced to the new message so an immediate
    /// new-mode read won't replay it. If the flush fails, both the append
    /// and the cursor update are rolled back and the error is surfaced.
    pub async fn send(&self, channel: &str, agent: &str, text: &str) -> Result<SendReceipt> {
        validate_name(channel, "channel name")?;
        validate_name(agent, "agent name")?;
        if text.is_empty() {
            return Err(Error::validation("Message text must not be empty"));
        }

        let mut state = self.state.write().await;

        let created = !state.contains_key(channel);
        let log = state.entry(channel.to_string()).or_default();

        let unread = log.unread_count(agent);
        if unread > 0 {
            return Err(Error::UnreadPending {
                unread_count: unread,
                hint: format!("GET /api/messages?channel={channel}&agent={agent}"),
            });
        }

        let index = log.append(StoredMessage::new(agent, text));
        let prior_cursor = log.last_read.insert(agent.to_string(), index as i64);

        if let Err(err) = self.storage.save(&state) {
            // Flush failed: undo the append and cursor so memory and disk
            // never diverge on an acknowledged write.
            if let Some(log) = state.get_mut(channel) {
                log.messages.pop();
                match prior_cursor {
                    Some(c) => {
                        log.last_read.insert(agent.to_string(), c);
                    }
                    None => {
                        log.last_read.remove(agent);
                    }
                }
            }
            if created {
                state.remove(channel);
            }
            return Err(err);
        }

        debug!(channel, agent, index, "Message appended");
        Ok(SendReceipt { index })
    }

    /// Read from a channel.
    ///
    /// `limit` is clamped to [`MIN_READ_LIMIT`]. A nonexistent channel yields
    /// an empty result and is NOT created — reading is always safe.
    pub async fn read(
        &self,
        channel: &str,
        agent: &str,
        mode: ReadMode,
        limit: usize,
    ) -> Result<ReadResult> {
        validate_name(channel, "channel name")?;
        validate_name(agent, "agent name")?;
        let limit = limit.max(MIN_READ_LIMIT);

        match mode {
            ReadMode::History => self.read_history(channel, limit).await,
            ReadMode::New => self.read_new(channel, agent, limit).await,
        }
    }

    /// History mode: the most recent `limit` messages, the agent's own
    /// included. Never touches cursors, never persists.
    async fn read_history(&self, channel: &str, limit: usize) -> Result<ReadResult> {
        let state = self.state.read().await;
        let Some(log) = state.get(channel) else {
            return Ok(ReadResult::empty(ReadMode::History));
        };

        let start = log.len().saturating_sub(limit);
        let messages: Vec<StoredMessage> = log.messages[start..].to_vec();

        Ok(ReadResult {
            total: log.len(),
            new_messages: 0,
            skipped: 0,
            returned: messages.len(),
            messages,
            mode: ReadMode::History,
        })
    }

    /// New mode: the unread window since the agent's cursor.
    ///
    /// The overflow limit applies to the raw unread span — if more than
    /// `limit` messages are pending, the oldest are dropped from the
    /// response (and still marked read: backlog loss, not backpressure).
    /// The agent's own messages are filtered from the payload but count
    /// toward cursor advancement and the skipped tally.
    async fn read_new(&self, channel: &str, agent: &str, limit: usize) -> Result<ReadResult> {
        let mut state = self.state.write().await;
        let Some(log) = state.get_mut(channel) else {
            return Ok(ReadResult::empty(ReadMode::New));
        };

        let cursor = log.cursor_for(agent);
        let span_start = (cursor + 1) as usize;
        let span = &log.messages[span_start..];

        let skipped = span.len().saturating_sub(limit);
        let messages: Vec<StoredMessage> = span[skipped..]
            .iter()
            .filter(|m| m.agent != agent)
            .cloned()
            .collect();

        let result = ReadResult {
            total: log.len(),
            new_messages: messages.len(),
            skipped,
            returned: messages.len(),
            messages,
            mode: ReadMode::New,
        };

        // Advance to the end of the log regardless of how many entries the
        // overflow policy dropped; those are permanently not replayed.
        let end = log.len() as i64 - 1;
        if end > cursor {
            let prior = log.last_read.get(agent).copied();
            log.mark_read_to(agent, end);

            if let Err(err) = self.storage.save(&state) {
                if let Some(log) = state.get_mut(channel) {
                    match prior {
                        Some(c) => {
                            log.last_read.insert(agent.to_string(), c);
                        }
                        None => {
                            log.last_read.remove(agent);
                        }
                    }
                }
                return Err(err);
            }
            debug!(channel, agent, cursor = end, "Cursor advanced");
        }

        Ok(result)
    }

    /// All known channels with message counts, sorted by name.
    pub async fn list_channels(&self) -> Vec<ChannelSummary> {
        let state = self.state.read().await;
        let mut channels: Vec<ChannelSummary> = state
            .iter()
            .map(|(name, log)| ChannelSummary {
                name: name.clone(),
                message_count: log.len(),
            })
            .collect();
        channels.sort_by(|a, b| a.name.cmp(&b.name));
        channels
    }

    /// Total count plus the most recent `limit` messages of a channel, for
    /// the human-readable views. `None` if the channel does not exist.
    pub async fn recent(&self, channel: &str, limit: usize) -> Option<(usize, Vec<StoredMessage>)> {
        let state = self.state.read().await;
        let log = state.get(channel)?;
        let start = log.len().saturating_sub(limit);
        Some((log.len(), log.messages[start..].to_vec()))
    }
}
