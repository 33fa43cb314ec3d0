//! kafkaq - the operation/event backbone of a Kafka client
//!
//! Everything the client's threads say to each other travels as one
//! envelope type, the [`Op`]: the application posts work (fetch-start,
//! seek, subscribe, commit) to worker threads, workers post results
//! (fetched messages, delivery reports, errors, rebalances) back, and
//! synchronous calls ride the same envelope in both directions with a
//! private reply queue attached.
//!
//! At the application boundary a completed op is wrapped, without copying,
//! as an [`Event`] and read through typed accessors.
//!
//! Architecture:
//!
//! - Threads never share a mutable op; ownership moves with the op through
//!   [`OpQueue`]s, one hop at a time.
//! - Shared resources (partition contexts, queues, the client handle) are
//!   `Arc`s; an op holds one strong reference per resource for its lifetime
//!   and releases them all when it drops.
//! - Stale work is discarded by generation stamp, not cancelled: see
//!   [`Op::is_stale`] and [`PartitionContext::bump_fetch_version`].
//!
//! Wire protocol encoding, broker selection and retry policy live outside
//! this crate; it is purely the in-process envelope and its queues.

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod metadata;
pub mod op;
pub mod partition;
pub mod queue;
pub mod request;

// Re-export the types that make up the public surface
pub use client::ClientHandle;
pub use config::ClientConfig;
pub use error::{ConfigError, ErrorCode};
pub use event::{Event, EventKind};
pub use message::{Message, MessageQueue};
pub use metadata::{BrokerInfo, Metadata, PartitionMetadata, Topic, TopicMetadata};
pub use op::{Op, OpFlags, OpKind, OpPayload};
pub use partition::{
    ConsumerGroup, ListRef, PartitionContext, TopicPartition, TopicPartitionList,
    OFFSET_BEGINNING, OFFSET_END, OFFSET_INVALID,
};
pub use queue::OpQueue;
pub use request::{reply_error, send_request, send_request_of};
