//! # AgentHub Core
//!
//! Domain types and error definitions for the AgentHub message relay.
//! This crate has **zero framework dependencies** — it defines the channel,
//! message, and cursor model that the store and gateway crates implement
//! against.
//!
//! The central idea: each channel owns an append-only message log plus a
//! per-agent `last_read` cursor. An agent may only post once it has observed
//! every message appended since its last read ("check before send").

pub mod channel;
pub mod error;
pub mod name;

// Re-export key types at crate root for ergonomics
pub use channel::{ChannelLog, ChannelSummary, ReadMode, ReadResult, SendReceipt, StoredMessage};
pub use channel::{NEVER_READ, StoreState};
pub use error::{Error, Result};
pub use name::validate_name;
