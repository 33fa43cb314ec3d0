//! Op queues
//!
//! [`OpQueue`] is the hand-off point between threads: the application posts
//! work ops to a worker's queue, workers post results to the application's
//! reply queue, and every synchronous request carries a private single-use
//! queue for its reply. Ownership of an op transfers with the op itself;
//! once enqueued, the sender must not touch it again.
//!
//! Queues are shared as `Arc<OpQueue>`; cloning the Arc acquires a
//! reference, dropping it releases one, and the queue (with any ops still
//! inside) is destroyed when the last holder goes away.
//!
//! Ordering: FIFO, except ops flagged `priority` are delivered ahead of all
//! queued non-priority ops while keeping insertion order among themselves.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::error::ErrorCode;
use crate::op::{Op, OpKind};
use crate::partition::PartitionContext;

/// A multi-producer, single-owner-per-op FIFO queue of operations
#[derive(Default)]
pub struct OpQueue {
    inner: Mutex<VecDeque<Op>>,
    nonempty: Condvar,
}

impl OpQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        OpQueue::default()
    }

    /// Publish an op, transferring its ownership to whoever dequeues it
    ///
    /// Priority ops are inserted behind the last queued priority op and
    /// ahead of everything else.
    pub fn enqueue(&self, op: Op) {
        trace!(kind = op.kind().name(), priority = op.flags.priority, "op enqueued");
        let mut q = self.inner.lock();
        if op.flags.priority {
            let idx = q
                .iter()
                .position(|queued| !queued.flags.priority)
                .unwrap_or(q.len());
            q.insert(idx, op);
        } else {
            q.push_back(op);
        }
        drop(q);
        self.nonempty.notify_one();
    }

    /// Dequeue the next op, blocking up to `timeout`
    ///
    /// Returns `None` when the timeout elapses with the queue still empty.
    pub fn pop(&self, timeout: Duration) -> Option<Op> {
        let deadline = Instant::now() + timeout;
        let mut q = self.inner.lock();
        loop {
            if let Some(op) = q.pop_front() {
                return Some(op);
            }
            if self.nonempty.wait_until(&mut q, deadline).timed_out() {
                return q.pop_front();
            }
        }
    }

    /// Dequeue the next op without blocking
    pub fn try_pop(&self) -> Option<Op> {
        self.inner.lock().pop_front()
    }

    /// Number of ops currently queued
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when no ops are queued
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Build and enqueue an error op in one step
    ///
    /// Convenience for worker threads reporting a failure toward the
    /// application: stamps kind (Err or ConsumerErr), error code, version,
    /// partition scope, offset and reason onto a fresh op and publishes it.
    pub fn send_err(
        &self,
        kind: OpKind,
        err: ErrorCode,
        version: i32,
        partition: Option<Arc<PartitionContext>>,
        offset: i64,
        reason: impl Into<String>,
    ) {
        debug_assert!(
            matches!(kind, OpKind::Err | OpKind::ConsumerErr),
            "send_err takes an error kind"
        );
        let mut op = match kind {
            OpKind::ConsumerErr => Op::consumer_error(err, offset, reason),
            _ => Op::error(err, offset, reason),
        };
        op.version = version;
        op.partition = partition;
        self.enqueue(op);
    }
}

impl std::fmt::Debug for OpQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpQueue").field("len", &self.len()).finish()
    }
}
