//! The application-facing event view
//!
//! An [`Event`] *is* an op: when a completed envelope reaches the public
//! boundary it is wrapped (not copied) and read through the accessors
//! here. The application owns the event from that point on; dropping it (or
//! calling [`Event::destroy`]) releases the payload, the message lists and
//! every shared reference the envelope holds.
//!
//! Message iteration is lazy, single-pass and non-restartable: a fetch event
//! yields its one message once, a delivery-report event drains its active
//! list head-first. Yielded messages are retained by the event (on the
//! internal purge list) until it drops, so references handed out stay
//! readable for the event's whole lifetime.

use std::sync::Arc;

use crate::error::ErrorCode;
use crate::message::Message;
use crate::op::{Op, OpPayload};
use crate::partition::{TopicPartition, TopicPartitionList};

/// Public event tags
///
/// Coarser than [`OpKind`](crate::op::OpKind): several internal op kinds
/// project to one event kind, and purely internal ops project to `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Not an application-visible event
    #[default]
    None,
    /// Produce delivery report
    DeliveryReport,
    /// Fetched message
    Fetch,
    /// Error report
    Error,
    /// Consumer group rebalance
    Rebalance,
    /// Log line
    Log,
}

impl EventKind {
    /// Fixed human-readable name
    pub fn name(self) -> &'static str {
        match self {
            EventKind::None => "(NONE)",
            EventKind::DeliveryReport => "DeliveryReport",
            EventKind::Fetch => "Fetch",
            EventKind::Error => "Error",
            EventKind::Rebalance => "Rebalance",
            EventKind::Log => "Log",
        }
    }
}

/// A completed op, viewed read-only at the application boundary
pub struct Event(Op);

impl From<Op> for Event {
    fn from(op: Op) -> Self {
        Event(op)
    }
}

impl Event {
    /// The public event tag
    pub fn event_kind(&self) -> EventKind {
        self.0.event_kind
    }

    /// Fixed human-readable name for the event's kind
    pub fn name(&self) -> &'static str {
        self.0.event_kind.name()
    }

    /// The op's result code; zero/success when no error was attached
    ///
    /// Valid for every event kind.
    pub fn error(&self) -> ErrorCode {
        self.0.err
    }

    /// The generation stamp the underlying op was created with
    pub fn version(&self) -> i32 {
        self.0.version
    }

    /// Number of messages this event carries
    ///
    /// Delivery reports: the live count of the not-yet-yielded list.
    /// Fetch: always 1. Anything else: 0.
    pub fn message_count(&self) -> usize {
        match &self.0.payload {
            OpPayload::DeliveryReport(dr) => dr.msgq.len(),
            OpPayload::Fetch(_) => 1,
            _ => 0,
        }
    }

    /// Yield the next message
    ///
    /// Single-pass and non-restartable. For a fetch event the first call
    /// returns the embedded message and every later call returns `None`.
    /// For a delivery report each call removes the head of the active list
    /// and moves it to the purge list, so the returned message stays alive
    /// until the event drops even if the caller lets its reference go.
    /// Every other kind always returns `None`.
    pub fn next_message(&mut self) -> Option<Arc<Message>> {
        match &mut self.0.payload {
            OpPayload::DeliveryReport(dr) => {
                let msg = dr.msgq.pop()?;
                dr.purged.push(Arc::clone(&msg));
                Some(msg)
            }
            OpPayload::Fetch(fetch) => {
                if fetch.yielded {
                    return None;
                }
                fetch.yielded = true;
                Some(Arc::clone(&fetch.message))
            }
            _ => None,
        }
    }

    /// Log facility, text and level
    ///
    /// `None` unless this is a Log event.
    pub fn log(&self) -> Option<(&str, &str, i32)> {
        if self.0.event_kind != EventKind::Log {
            return None;
        }
        match &self.0.payload {
            OpPayload::Log {
                facility,
                text,
                level,
            } => Some((facility.as_str(), text.as_str(), *level)),
            _ => None,
        }
    }

    /// The partition list of a rebalance event
    ///
    /// Borrowed from the event; `None` for every other kind.
    pub fn topic_partition_list(&self) -> Option<&TopicPartitionList> {
        if self.0.event_kind != EventKind::Rebalance {
            return None;
        }
        match &self.0.payload {
            OpPayload::Rebalance { partitions } => Some(partitions),
            _ => None,
        }
    }

    /// A fresh, caller-owned record for the partition this event concerns
    ///
    /// `None` when the op carries no partition reference. The record's
    /// `err` is the event's error; for error and consumer-error events the
    /// offset is patched in from the payload.
    pub fn topic_partition(&self) -> Option<TopicPartition> {
        let ctx = self.0.partition.as_ref()?;
        let mut tp = TopicPartition::from_context(ctx);
        match &self.0.payload {
            OpPayload::Err(e) | OpPayload::ConsumerErr(e) => tp.offset = e.offset,
            _ => {}
        }
        tp.err = self.0.err;
        Some(tp)
    }

    /// Destroy the event, releasing the payload and every held reference
    ///
    /// Equivalent to dropping it; provided for symmetry with the rest of
    /// the public surface.
    pub fn destroy(self) {}
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.name())
            .field("err", &self.0.err)
            .field("message_count", &self.message_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::OpKind;

    #[test]
    fn test_event_names_are_fixed() {
        assert_eq!(EventKind::None.name(), "(NONE)");
        assert_eq!(EventKind::DeliveryReport.name(), "DeliveryReport");
        assert_eq!(EventKind::Fetch.name(), "Fetch");
        assert_eq!(EventKind::Error.name(), "Error");
    }

    #[test]
    fn test_plain_op_projects_to_none() {
        let ev = Event::from(Op::new(OpKind::Terminate));
        assert_eq!(ev.event_kind(), EventKind::None);
        assert_eq!(ev.name(), "(NONE)");
        assert_eq!(ev.message_count(), 0);
    }

    #[test]
    fn test_log_accessor_requires_log_kind() {
        let ev = Event::from(Op::error(ErrorCode::Unknown, -1, "boom"));
        assert!(ev.log().is_none());

        let ev = Event::from(Op::log("BROKER", "connection refused", 3));
        let (facility, text, level) = ev.log().unwrap();
        assert_eq!(facility, "BROKER");
        assert_eq!(text, "connection refused");
        assert_eq!(level, 3);
    }

    #[test]
    fn test_error_is_readable_for_every_kind() {
        let mut op = Op::new(OpKind::Name);
        op.err = ErrorCode::RebalanceInProgress;
        let ev = Event::from(op);
        assert_eq!(ev.error(), ErrorCode::RebalanceInProgress);

        let ev = Event::from(Op::new(OpKind::None));
        assert_eq!(ev.error(), ErrorCode::NoError);
    }
}
