//! Synchronous request/reply over op queues
//!
//! A caller on one thread can await a result produced on another by sending
//! an op with a private, single-use reply queue attached and blocking on
//! that queue. The worker processes the op and posts a reply op (same kind,
//! reply marker set, same version) back to the attached queue.
//!
//! Ownership on timeout: the request is not retracted. The processing
//! thread always consumes and destroys the request op, whether or not the
//! caller is still waiting; a reply posted to an abandoned reply queue is
//! dropped together with the queue's last reference. The caller only ever
//! owns the reply, so no op can be freed twice.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::ErrorCode;
use crate::op::{Op, OpKind};
use crate::queue::OpQueue;

/// Send `op` to `dest` and block until a reply arrives or `timeout` elapses
///
/// Attaches a fresh single-use reply queue to the op before publishing it.
/// Returns the reply op, or `None` on timeout; see the module docs for who
/// owns what after a timeout.
pub fn send_request(dest: &Arc<OpQueue>, mut op: Op, timeout: Duration) -> Option<Op> {
    let replyq = Arc::new(OpQueue::new());
    op.reply_to = Some(Arc::clone(&replyq));
    let kind = op.kind();
    dest.enqueue(op);

    let reply = replyq.pop(timeout);
    if reply.is_none() {
        debug!(
            kind = kind.name(),
            timeout_ms = timeout.as_millis() as u64,
            "request timed out; the worker still owns and will destroy the op"
        );
    }
    reply
}

/// Send a payload-less request of `kind` and await the reply
///
/// For query ops whose request side carries nothing (name, subscription,
/// assignment, coordinator queries).
pub fn send_request_of(dest: &Arc<OpQueue>, kind: OpKind, timeout: Duration) -> Option<Op> {
    send_request(dest, Op::new(kind), timeout)
}

/// Collapse a reply into its error code, treating a timeout as an error
///
/// `None` (no reply before the deadline) maps to
/// [`ErrorCode::RequestTimedOut`]; the reply op, if any, is dropped here.
pub fn reply_error(reply: Option<Op>) -> ErrorCode {
    match reply {
        Some(op) => op.err,
        None => ErrorCode::RequestTimedOut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_arrives_with_error_and_version() {
        let workq = Arc::new(OpQueue::new());

        let mut req = Op::new(OpKind::CoordQuery);
        req.version = 5;

        // Serve the request inline: no worker thread needed to exercise the
        // protocol itself.
        let replyq = Arc::new(OpQueue::new());
        req.reply_to = Some(Arc::clone(&replyq));
        workq.enqueue(req);

        let mut served = workq.try_pop().unwrap();
        assert!(served.send_reply(ErrorCode::NotCoordinator));

        let reply = replyq.try_pop().unwrap();
        assert!(reply.reply);
        assert_eq!(reply.version, 5);
        assert_eq!(reply.err, ErrorCode::NotCoordinator);
    }

    #[test]
    fn test_send_request_times_out_when_unserved() {
        let workq = Arc::new(OpQueue::new());
        let reply = send_request(&workq, Op::new(OpKind::Name), Duration::from_millis(20));
        assert!(reply.is_none());
        // The request is still queued; whoever serves it owns it.
        assert_eq!(workq.len(), 1);
    }

    #[test]
    fn test_reply_error_maps_timeout() {
        assert_eq!(reply_error(None), ErrorCode::RequestTimedOut);

        let mut op = Op::new(OpKind::Name);
        op.err = ErrorCode::Unknown;
        assert_eq!(reply_error(Some(op)), ErrorCode::Unknown);
    }

    #[test]
    fn test_reply_to_abandoned_queue_is_dropped_quietly() {
        let workq = Arc::new(OpQueue::new());
        assert!(send_request(&workq, Op::new(OpKind::Name), Duration::from_millis(5)).is_none());

        // Caller gave up; worker serves the op anyway and replies into the
        // abandoned queue. The reply drops with the queue's last Arc.
        let mut served = workq.try_pop().unwrap();
        assert!(served.send_reply(ErrorCode::NoError));
        drop(served);
    }
}
