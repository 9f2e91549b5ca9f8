//! # AgentHub Store
//!
//! The Channel Store: a process-wide, lock-guarded registry of channels,
//! loaded from persisted JSON at startup and flushed back after every
//! mutating operation.
//!
//! All relay semantics live here — the unread-cursor model, the
//! check-before-send enforcement, the two read modes, and the overflow
//! policy. The HTTP gateway is a thin shell over [`ChannelStore`].

pub mod storage;
pub mod store;

pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use store::{ChannelStore, MIN_READ_LIMIT};
