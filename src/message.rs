//! Messages and the per-payload message list
//!
//! [`Message`] is one produced or fetched record. Key and payload are
//! refcounted [`Bytes`] slices, so a fetched message can alias the receive
//! buffer it was decoded from without copying, and a message can sit on a
//! delivery-report op while the application still holds a reference to it.
//!
//! [`MessageQueue`] is the FIFO list a delivery-report op carries. The count
//! is kept in an atomic so readers can observe it without touching the list
//! itself, matching the batch-container interface the rest of the client
//! codebase programs against.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;

use crate::error::ErrorCode;
use crate::partition::OFFSET_INVALID;

/// Timestamp value meaning "not available"
pub const TIMESTAMP_INVALID: i64 = -1;

/// A single produced or consumed message
#[derive(Debug, Clone)]
pub struct Message {
    /// Topic this message belongs to
    pub topic: String,
    /// Partition within the topic
    pub partition: i32,
    /// Message offset, or [`OFFSET_INVALID`] before assignment
    pub offset: i64,
    /// Optional message key
    pub key: Option<Bytes>,
    /// Optional message payload
    pub payload: Option<Bytes>,
    /// Broker or producer timestamp (milliseconds), or [`TIMESTAMP_INVALID`]
    pub timestamp_ms: i64,
    /// Per-message result, e.g. the delivery outcome on a delivery report
    pub err: ErrorCode,
}

impl Default for Message {
    fn default() -> Self {
        Message {
            topic: String::new(),
            partition: -1,
            offset: OFFSET_INVALID,
            key: None,
            payload: None,
            timestamp_ms: TIMESTAMP_INVALID,
            err: ErrorCode::NoError,
        }
    }
}

impl Message {
    /// Byte length of the payload (0 when absent)
    pub fn payload_len(&self) -> usize {
        self.payload.as_ref().map_or(0, |p| p.len())
    }
}

/// FIFO message list with an atomically readable count
///
/// Messages are held as `Arc<Message>` so moving one between lists (active →
/// purge on a delivery report) and handing it to the application are both
/// refcount bumps, never copies.
#[derive(Debug, Default)]
pub struct MessageQueue {
    msgs: VecDeque<Arc<Message>>,
    count: AtomicUsize,
}

impl MessageQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        MessageQueue::default()
    }

    /// Append a message at the tail
    pub fn push(&mut self, msg: Arc<Message>) {
        self.msgs.push_back(msg);
        self.count.store(self.msgs.len(), Ordering::Release);
    }

    /// Remove and return the head message
    pub fn pop(&mut self) -> Option<Arc<Message>> {
        let msg = self.msgs.pop_front();
        self.count.store(self.msgs.len(), Ordering::Release);
        msg
    }

    /// Peek at the head message without removing it
    pub fn first(&self) -> Option<&Arc<Message>> {
        self.msgs.front()
    }

    /// Current live count
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// True when no messages are queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain every message into `other`, preserving order
    pub fn move_all_to(&mut self, other: &mut MessageQueue) {
        while let Some(msg) = self.pop() {
            other.push(msg);
        }
    }
}
