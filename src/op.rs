//! The operation envelope
//!
//! Every piece of work and every result in the client travels as one [`Op`]:
//! the application thread sends fetch-start/seek/subscribe ops to worker
//! threads, workers send fetched messages, delivery reports and errors back,
//! and synchronous calls ride the same envelope in both directions.
//!
//! The payload is a sum type with one variant per op kind, so the kind tag
//! and the live payload cannot disagree: [`Op::kind`] is derived from the
//! variant. Routing metadata (reply marker, callback, flags, version stamp,
//! partition/queue/handle references) lives beside the payload on the
//! envelope itself.
//!
//! Ownership rules:
//! - An op is moved by value through queues; exactly one thread owns it at
//!   any time, and dropping it releases everything it holds.
//! - Shared resources (partition context, reply queue, client handle, topic)
//!   are held as `Arc`s; the op keeps one strong count per reference.
//! - Strings, buffers and lists inside payloads are owned by the payload
//!   unless the field's type says otherwise ([`ListRef::Shared`]).

use std::fmt;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};

use crate::client::ClientHandle;
use crate::error::ErrorCode;
use crate::event::EventKind;
use crate::message::{Message, MessageQueue};
use crate::metadata::{Metadata, Topic};
use crate::partition::{
    ConsumerGroup, ListRef, PartitionContext, TopicPartitionList, OFFSET_INVALID,
};
use crate::queue::OpQueue;

/// Op kind tags
///
/// One tag per payload variant; see [`OpPayload`] for what each carries.
/// The comments note the usual direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// No payload; placeholder and generic plumbing
    None,
    /// Worker -> application: one fetched message
    Fetch,
    /// Worker -> application: generic error
    Err,
    /// Worker -> application: consumer error
    ConsumerErr,
    /// Worker -> application: produce delivery report
    DeliveryReport,
    /// Worker -> application: statistics snapshot
    Stats,
    /// Any -> broker thread: request cluster metadata
    MetadataRequest,
    /// Any -> partition's broker thread: commit offsets
    OffsetCommit,
    /// Any -> broker thread: broker node update
    NodeUpdate,
    /// Any -> broker thread: transmit buffer
    XmitBuf,
    /// Broker thread -> any: received response buffer
    RecvBuf,
    /// Any -> broker thread: retry a transmit buffer
    XmitRetry,
    /// Application -> partition's broker thread: start fetching
    FetchStart,
    /// Application -> partition's broker thread: stop fetching
    FetchStop,
    /// Application -> partition's broker thread: seek to offset
    Seek,
    /// Broker -> broker thread: fetch committed offsets
    OffsetFetch,
    /// Any -> group/broker thread: add partition
    PartitionJoin,
    /// Any -> group/broker thread: remove partition
    PartitionLeave,
    /// Broker thread -> application: group rebalance
    Rebalance,
    /// Generic termination marker
    Terminate,
    /// Query for the group coordinator
    CoordQuery,
    /// New subscription
    Subscribe,
    /// New assignment
    Assign,
    /// Get current subscription (same payload shape as Subscribe)
    GetSubscription,
    /// Get current assignment (same payload shape as Assign)
    GetAssignment,
    /// Broker throttle report
    Throttle,
    /// Request the client name
    Name,
    /// Offset reset notification
    OffsetReset,
    /// Worker -> application: log line
    Log,
    /// Pure callback op: run [`Op::call`] on the target thread
    Callback,
}

impl OpKind {
    /// Short stable name for log lines and diagnostics
    pub fn name(self) -> &'static str {
        match self {
            OpKind::None => "NONE",
            OpKind::Fetch => "FETCH",
            OpKind::Err => "ERR",
            OpKind::ConsumerErr => "CONSUMER_ERR",
            OpKind::DeliveryReport => "DR",
            OpKind::Stats => "STATS",
            OpKind::MetadataRequest => "METADATA_REQ",
            OpKind::OffsetCommit => "OFFSET_COMMIT",
            OpKind::NodeUpdate => "NODE_UPDATE",
            OpKind::XmitBuf => "XMIT_BUF",
            OpKind::RecvBuf => "RECV_BUF",
            OpKind::XmitRetry => "XMIT_RETRY",
            OpKind::FetchStart => "FETCH_START",
            OpKind::FetchStop => "FETCH_STOP",
            OpKind::Seek => "SEEK",
            OpKind::OffsetFetch => "OFFSET_FETCH",
            OpKind::PartitionJoin => "PARTITION_JOIN",
            OpKind::PartitionLeave => "PARTITION_LEAVE",
            OpKind::Rebalance => "REBALANCE",
            OpKind::Terminate => "TERMINATE",
            OpKind::CoordQuery => "COORD_QUERY",
            OpKind::Subscribe => "SUBSCRIBE",
            OpKind::Assign => "ASSIGN",
            OpKind::GetSubscription => "GET_SUBSCRIPTION",
            OpKind::GetAssignment => "GET_ASSIGNMENT",
            OpKind::Throttle => "THROTTLE",
            OpKind::Name => "NAME",
            OpKind::OffsetReset => "OFFSET_RESET",
            OpKind::Log => "LOG",
            OpKind::Callback => "CALLBACK",
        }
    }
}

/// Per-op behavior flags
///
/// These ride beside the kind tag instead of being OR'd into it. Payload
/// ownership needs no flag here: whether a field is freed on drop is decided
/// by its type (owned `String`/`Bytes`/list vs `Arc`/[`ListRef::Shared`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpFlags {
    /// Insert at the head of the destination queue, behind other priority ops
    pub priority: bool,
    /// Transmit buffer: no response expected
    pub no_response: bool,
    /// Buffer requires CRC calculation
    pub crc: bool,
    /// Blocking protocol request
    pub blocking: bool,
    /// Group coordinator: reprocess this op at a later time
    pub reprocess: bool,
}

/// Callback carried by an op, invoked once on the target thread
pub type OpCallback = Box<dyn FnOnce(&ClientHandle, &mut Op) + Send>;

/// Payload of a fetch op: exactly one decoded message
#[derive(Debug)]
pub struct FetchPayload {
    /// Receive buffer the message was decoded from; the message's key and
    /// payload slices alias this allocation
    pub buf: Option<Bytes>,
    /// The decoded message
    pub message: Arc<Message>,
    /// One-shot iteration cursor; set once the message has been yielded
    pub(crate) yielded: bool,
}

impl Default for FetchPayload {
    fn default() -> Self {
        FetchPayload {
            buf: None,
            message: Arc::new(Message::default()),
            yielded: false,
        }
    }
}

/// Payload of an error or consumer-error op
#[derive(Debug)]
pub struct ErrPayload {
    /// Offset the error pertains to, or [`OFFSET_INVALID`]
    pub offset: i64,
    /// Human-readable reason
    pub reason: String,
}

impl Default for ErrPayload {
    fn default() -> Self {
        ErrPayload {
            offset: OFFSET_INVALID,
            reason: String::new(),
        }
    }
}

/// Payload of a delivery-report op
///
/// `msgq` holds the messages not yet handed to the application. Messages the
/// application has consumed move to `purged`, which keeps them alive until
/// the whole op drops; the purge list is never visible across the public
/// boundary.
#[derive(Debug, Default)]
pub struct DrPayload {
    /// Topic the reported messages were produced to
    pub topic: Option<Arc<Topic>>,
    /// Active message list
    pub msgq: MessageQueue,
    /// Already-yielded messages, retained until the op drops
    pub(crate) purged: MessageQueue,
}

/// Payload of a metadata request/result op
///
/// The request and its result share the variant: the worker fills in
/// `metadata` and sends the op back as a reply.
#[derive(Debug, Default)]
pub struct MetadataPayload {
    /// Restrict the request to one topic, or none for the full set
    pub topic: Option<Arc<Topic>>,
    /// Request metadata for all known topics
    pub all_topics: bool,
    /// Why the request was issued (diagnostics)
    pub reason: String,
    /// The result, present once the op has been processed
    pub metadata: Option<Metadata>,
}

/// The payload variants, one per [`OpKind`]
#[derive(Debug)]
pub enum OpPayload {
    /// No payload
    None,
    /// One fetched message
    Fetch(FetchPayload),
    /// Generic error
    Err(ErrPayload),
    /// Consumer error
    ConsumerErr(ErrPayload),
    /// Produce delivery report
    DeliveryReport(DrPayload),
    /// Statistics snapshot (JSON)
    Stats {
        /// The serialized snapshot
        json: String,
    },
    /// Metadata request/result
    MetadataRequest(MetadataPayload),
    /// Offsets to commit
    OffsetCommit {
        /// Partitions with the offsets to commit
        partitions: TopicPartitionList,
    },
    /// Broker node update
    NodeUpdate {
        /// Broker node id
        node_id: i32,
        /// Broker node name ("host:port")
        node_name: String,
    },
    /// Transmit buffer
    XmitBuf {
        /// Bytes to transmit
        buf: BytesMut,
    },
    /// Received response buffer
    RecvBuf {
        /// Bytes received
        buf: Bytes,
    },
    /// Transmit buffer scheduled for retry
    XmitRetry {
        /// Bytes to retransmit
        buf: BytesMut,
    },
    /// Start fetching a partition
    FetchStart {
        /// Offset to start from (absolute or logical)
        offset: i64,
        /// Consumer group driving the fetch, if any
        group: Option<Arc<ConsumerGroup>>,
    },
    /// Stop fetching a partition
    FetchStop,
    /// Seek a partition to an offset (same shape as FetchStart)
    Seek {
        /// Target offset
        offset: i64,
        /// Consumer group driving the fetch, if any
        group: Option<Arc<ConsumerGroup>>,
    },
    /// Committed offsets fetched for partitions
    OffsetFetch {
        /// Owned or shared partition list
        partitions: ListRef,
    },
    /// Add a partition to a group/broker
    PartitionJoin,
    /// Remove a partition from a group/broker
    PartitionLeave,
    /// Group rebalance notification
    Rebalance {
        /// The (proposed) assignment
        partitions: TopicPartitionList,
    },
    /// Termination marker
    Terminate,
    /// Coordinator query
    CoordQuery,
    /// New subscription
    Subscribe {
        /// Subscribed topics
        topics: TopicPartitionList,
    },
    /// New assignment
    Assign {
        /// Assigned partitions
        partitions: TopicPartitionList,
    },
    /// Current subscription (reply payload)
    GetSubscription {
        /// Subscribed topics
        topics: TopicPartitionList,
    },
    /// Current assignment (reply payload)
    GetAssignment {
        /// Assigned partitions
        partitions: TopicPartitionList,
    },
    /// Broker throttle report
    Throttle {
        /// Throttle duration imposed by the broker (milliseconds)
        throttle_time_ms: i32,
        /// Broker node id
        node_id: i32,
        /// Broker node name
        node_name: String,
    },
    /// Client name
    Name {
        /// The name
        name: String,
    },
    /// Offset reset notification
    OffsetReset {
        /// Offset being reset to
        offset: i64,
        /// Why the reset happened
        reason: String,
    },
    /// Log line
    Log {
        /// Log facility
        facility: String,
        /// Log text
        text: String,
        /// Syslog-style level
        level: i32,
    },
    /// Pure callback op; the callback itself lives on the envelope
    Callback,
}

impl OpPayload {
    /// The kind tag of the live variant
    pub fn kind(&self) -> OpKind {
        match self {
            OpPayload::None => OpKind::None,
            OpPayload::Fetch(_) => OpKind::Fetch,
            OpPayload::Err(_) => OpKind::Err,
            OpPayload::ConsumerErr(_) => OpKind::ConsumerErr,
            OpPayload::DeliveryReport(_) => OpKind::DeliveryReport,
            OpPayload::Stats { .. } => OpKind::Stats,
            OpPayload::MetadataRequest(_) => OpKind::MetadataRequest,
            OpPayload::OffsetCommit { .. } => OpKind::OffsetCommit,
            OpPayload::NodeUpdate { .. } => OpKind::NodeUpdate,
            OpPayload::XmitBuf { .. } => OpKind::XmitBuf,
            OpPayload::RecvBuf { .. } => OpKind::RecvBuf,
            OpPayload::XmitRetry { .. } => OpKind::XmitRetry,
            OpPayload::FetchStart { .. } => OpKind::FetchStart,
            OpPayload::FetchStop => OpKind::FetchStop,
            OpPayload::Seek { .. } => OpKind::Seek,
            OpPayload::OffsetFetch { .. } => OpKind::OffsetFetch,
            OpPayload::PartitionJoin => OpKind::PartitionJoin,
            OpPayload::PartitionLeave => OpKind::PartitionLeave,
            OpPayload::Rebalance { .. } => OpKind::Rebalance,
            OpPayload::Terminate => OpKind::Terminate,
            OpPayload::CoordQuery => OpKind::CoordQuery,
            OpPayload::Subscribe { .. } => OpKind::Subscribe,
            OpPayload::Assign { .. } => OpKind::Assign,
            OpPayload::GetSubscription { .. } => OpKind::GetSubscription,
            OpPayload::GetAssignment { .. } => OpKind::GetAssignment,
            OpPayload::Throttle { .. } => OpKind::Throttle,
            OpPayload::Name { .. } => OpKind::Name,
            OpPayload::OffsetReset { .. } => OpKind::OffsetReset,
            OpPayload::Log { .. } => OpKind::Log,
            OpPayload::Callback => OpKind::Callback,
        }
    }

    /// The empty payload variant for a kind, as produced by [`Op::new`]
    pub fn default_for(kind: OpKind) -> OpPayload {
        match kind {
            OpKind::None => OpPayload::None,
            OpKind::Fetch => OpPayload::Fetch(FetchPayload::default()),
            OpKind::Err => OpPayload::Err(ErrPayload::default()),
            OpKind::ConsumerErr => OpPayload::ConsumerErr(ErrPayload::default()),
            OpKind::DeliveryReport => OpPayload::DeliveryReport(DrPayload::default()),
            OpKind::Stats => OpPayload::Stats {
                json: String::new(),
            },
            OpKind::MetadataRequest => OpPayload::MetadataRequest(MetadataPayload::default()),
            OpKind::OffsetCommit => OpPayload::OffsetCommit {
                partitions: TopicPartitionList::new(),
            },
            OpKind::NodeUpdate => OpPayload::NodeUpdate {
                node_id: -1,
                node_name: String::new(),
            },
            OpKind::XmitBuf => OpPayload::XmitBuf {
                buf: BytesMut::new(),
            },
            OpKind::RecvBuf => OpPayload::RecvBuf { buf: Bytes::new() },
            OpKind::XmitRetry => OpPayload::XmitRetry {
                buf: BytesMut::new(),
            },
            OpKind::FetchStart => OpPayload::FetchStart {
                offset: OFFSET_INVALID,
                group: None,
            },
            OpKind::FetchStop => OpPayload::FetchStop,
            OpKind::Seek => OpPayload::Seek {
                offset: OFFSET_INVALID,
                group: None,
            },
            OpKind::OffsetFetch => OpPayload::OffsetFetch {
                partitions: ListRef::default(),
            },
            OpKind::PartitionJoin => OpPayload::PartitionJoin,
            OpKind::PartitionLeave => OpPayload::PartitionLeave,
            OpKind::Rebalance => OpPayload::Rebalance {
                partitions: TopicPartitionList::new(),
            },
            OpKind::Terminate => OpPayload::Terminate,
            OpKind::CoordQuery => OpPayload::CoordQuery,
            OpKind::Subscribe => OpPayload::Subscribe {
                topics: TopicPartitionList::new(),
            },
            OpKind::Assign => OpPayload::Assign {
                partitions: TopicPartitionList::new(),
            },
            OpKind::GetSubscription => OpPayload::GetSubscription {
                topics: TopicPartitionList::new(),
            },
            OpKind::GetAssignment => OpPayload::GetAssignment {
                partitions: TopicPartitionList::new(),
            },
            OpKind::Throttle => OpPayload::Throttle {
                throttle_time_ms: 0,
                node_id: -1,
                node_name: String::new(),
            },
            OpKind::Name => OpPayload::Name {
                name: String::new(),
            },
            OpKind::OffsetReset => OpPayload::OffsetReset {
                offset: OFFSET_INVALID,
                reason: String::new(),
            },
            OpKind::Log => OpPayload::Log {
                facility: String::new(),
                text: String::new(),
                level: 6,
            },
            OpKind::Callback => OpPayload::Callback,
        }
    }
}

/// The operation envelope
///
/// Constructed with [`Op::new`] (kind set, everything else zero/none), then
/// populated field by field and published to a queue. The envelope exposes
/// no behavior of its own beyond field access and the small helpers below;
/// queueing lives in [`OpQueue`], synchronous calls in
/// [`crate::request`], and the application view in
/// [`crate::event::Event`].
pub struct Op {
    /// The live payload; its variant is the op's kind
    pub payload: OpPayload,
    /// Public-facing event tag; [`EventKind::None`] for internal plumbing
    pub event_kind: EventKind,
    /// Behavior flags
    pub flags: OpFlags,
    /// Generation stamp copied from the originating context at creation;
    /// 0 means unversioned (exempt from staleness filtering)
    pub version: i32,
    /// Result code, meaningful once the op has been processed
    pub err: ErrorCode,
    /// Payload-dependent size hint, typically a message byte length
    pub len: i32,
    /// The topic-partition this op concerns, if any
    pub partition: Option<Arc<PartitionContext>>,
    /// Queue a reply must be delivered to; presence marks the op a request
    pub reply_to: Option<Arc<OpQueue>>,
    /// Set on ops derived with [`Op::new_reply`]
    pub reply: bool,
    /// Callback to run on the target thread via [`Op::call`]
    pub callback: Option<OpCallback>,
    /// Owning client; kept private so in-flight accounting stays balanced
    handle: Option<Arc<ClientHandle>>,
}

impl Op {
    /// Create an op of `kind` with an empty payload and no routing metadata
    pub fn new(kind: OpKind) -> Op {
        Op {
            payload: OpPayload::default_for(kind),
            event_kind: EventKind::None,
            flags: OpFlags::default(),
            version: 0,
            err: ErrorCode::NoError,
            len: 0,
            partition: None,
            reply_to: None,
            reply: false,
            callback: None,
            handle: None,
        }
    }

    /// The kind tag of the live payload
    pub fn kind(&self) -> OpKind {
        self.payload.kind()
    }

    /// Build an application-bound error op
    pub fn error(err: ErrorCode, offset: i64, reason: impl Into<String>) -> Op {
        let mut op = Op::new(OpKind::Err);
        op.payload = OpPayload::Err(ErrPayload {
            offset,
            reason: reason.into(),
        });
        op.event_kind = EventKind::Error;
        op.err = err;
        op
    }

    /// Build an application-bound consumer error op
    pub fn consumer_error(err: ErrorCode, offset: i64, reason: impl Into<String>) -> Op {
        let mut op = Op::new(OpKind::ConsumerErr);
        op.payload = OpPayload::ConsumerErr(ErrPayload {
            offset,
            reason: reason.into(),
        });
        op.event_kind = EventKind::Error;
        op.err = err;
        op
    }

    /// Build a fetch op carrying one decoded message
    ///
    /// `buf` is the receive buffer the message was decoded from; passing it
    /// here keeps the allocation alive for as long as the message references
    /// into it.
    pub fn fetch(message: Message, buf: Option<Bytes>) -> Op {
        let mut op = Op::new(OpKind::Fetch);
        op.len = message.payload_len() as i32;
        op.payload = OpPayload::Fetch(FetchPayload {
            buf,
            message: Arc::new(message),
            yielded: false,
        });
        op.event_kind = EventKind::Fetch;
        op
    }

    /// Build an empty delivery-report op for `topic`
    ///
    /// The producer fills `msgq` with the reported messages before
    /// publishing.
    pub fn delivery_report(topic: Option<Arc<Topic>>) -> Op {
        let mut op = Op::new(OpKind::DeliveryReport);
        op.payload = OpPayload::DeliveryReport(DrPayload {
            topic,
            msgq: MessageQueue::new(),
            purged: MessageQueue::new(),
        });
        op.event_kind = EventKind::DeliveryReport;
        op
    }

    /// Build a rebalance op carrying a proposed assignment
    pub fn rebalance(partitions: TopicPartitionList) -> Op {
        let mut op = Op::new(OpKind::Rebalance);
        op.payload = OpPayload::Rebalance { partitions };
        op.event_kind = EventKind::Rebalance;
        op
    }

    /// Build a statistics op; `len` mirrors the JSON byte length
    pub fn stats(json: impl Into<String>) -> Op {
        let json = json.into();
        let mut op = Op::new(OpKind::Stats);
        op.len = json.len() as i32;
        op.payload = OpPayload::Stats { json };
        op
    }

    /// Build a log op
    pub fn log(facility: impl Into<String>, text: impl Into<String>, level: i32) -> Op {
        let mut op = Op::new(OpKind::Log);
        op.payload = OpPayload::Log {
            facility: facility.into(),
            text: text.into(),
            level,
        };
        op.event_kind = EventKind::Log;
        op
    }

    /// Build a throttle op from a broker throttle report
    pub fn throttle(throttle_time_ms: i32, node_id: i32, node_name: impl Into<String>) -> Op {
        let mut op = Op::new(OpKind::Throttle);
        op.payload = OpPayload::Throttle {
            throttle_time_ms,
            node_id,
            node_name: node_name.into(),
        };
        op
    }

    /// Build a callback op; `cb` runs once on whichever thread serves it
    pub fn callback(cb: impl FnOnce(&ClientHandle, &mut Op) + Send + 'static) -> Op {
        let mut op = Op::new(OpKind::Callback);
        op.callback = Some(Box::new(cb));
        op
    }

    /// Bind this op to its owning client
    ///
    /// Increments the handle's in-flight op count; the count drops again
    /// when the op does, wherever that happens.
    pub fn bind_handle(&mut self, handle: &Arc<ClientHandle>) {
        if self.handle.is_none() {
            handle.op_bound(self.kind());
            self.handle = Some(Arc::clone(handle));
        }
    }

    /// The owning client, if bound
    pub fn handle(&self) -> Option<&Arc<ClientHandle>> {
        self.handle.as_ref()
    }

    /// True when this op was produced under a since-superseded generation
    ///
    /// Version 0 means unversioned: such ops are never stale. A consumer
    /// receiving a stale op must drop it instead of acting on it; dropping
    /// is the entire cancellation mechanism.
    pub fn is_stale(&self, current_version: i32) -> bool {
        self.version != 0 && self.version < current_version
    }

    /// Derive a reply op from `orig`
    ///
    /// Same kind (empty payload), same version, `reply` set, `err` set.
    /// `orig` is not consumed; the processing thread still owns and drops it.
    pub fn new_reply(orig: &Op, err: ErrorCode) -> Op {
        let mut reply = Op::new(orig.kind());
        reply.reply = true;
        reply.version = orig.version;
        reply.err = err;
        if let Some(handle) = &orig.handle {
            reply.bind_handle(handle);
        }
        reply
    }

    /// Send a reply carrying `err` to this op's reply queue
    ///
    /// Detaches the reply queue so at most one reply is ever sent. Returns
    /// false when the op carries no reply queue (fire-and-forget request).
    pub fn send_reply(&mut self, err: ErrorCode) -> bool {
        let Some(replyq) = self.reply_to.take() else {
            return false;
        };
        replyq.enqueue(Op::new_reply(self, err));
        true
    }

    /// Send a reply op (with payload) to this op's reply queue
    ///
    /// Like [`Op::send_reply`] but the caller builds the reply, e.g. to echo
    /// a metadata result or an assignment list back to the requester. The
    /// reply's version is stamped from this op.
    pub fn send_reply_op(&mut self, mut reply: Op) -> bool {
        let Some(replyq) = self.reply_to.take() else {
            return false;
        };
        reply.reply = true;
        reply.version = self.version;
        replyq.enqueue(reply);
        true
    }

    /// Run and clear the callback, if any
    ///
    /// Called by the thread serving the op's destination queue. Returns
    /// whether a callback ran; it can run at most once.
    pub fn call(&mut self, handle: &ClientHandle) -> bool {
        match self.callback.take() {
            Some(cb) => {
                cb(handle, self);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Op")
            .field("kind", &self.kind().name())
            .field("event_kind", &self.event_kind)
            .field("flags", &self.flags)
            .field("version", &self.version)
            .field("err", &self.err)
            .field("len", &self.len)
            .field("reply", &self.reply)
            .field("has_partition", &self.partition.is_some())
            .field("has_reply_to", &self.reply_to.is_some())
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl Drop for Op {
    fn drop(&mut self) {
        // Payload fields drop on their own; only the in-flight accounting
        // needs a hand.
        if let Some(handle) = self.handle.take() {
            handle.op_unbound();
        }
    }
}
