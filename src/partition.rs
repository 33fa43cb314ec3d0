//! Topic-partition state referenced from ops
//!
//! [`PartitionContext`] is the long-lived, shared per-partition state an op
//! may be scoped to. Ops hold it as `Arc<PartitionContext>`; every holder
//! keeps it alive, and the last drop releases it. Its fetch generation
//! counter is what makes stale-op filtering work: ops are stamped with the
//! generation current at creation, and a consumer discards anything older
//! (see [`Op::is_stale`](crate::op::Op::is_stale)).
//!
//! [`TopicPartition`] is the flat, caller-owned record handed across the
//! public boundary; [`TopicPartitionList`] is the container moved around in
//! subscribe/assign/commit/rebalance payloads.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use crate::error::ErrorCode;

/// Offset value meaning "not set"
pub const OFFSET_INVALID: i64 = -1001;

/// Logical offset: beginning of the partition log
pub const OFFSET_BEGINNING: i64 = -2;

/// Logical offset: end of the partition log
pub const OFFSET_END: i64 = -1;

/// Shared per-partition state
///
/// One instance exists per assigned topic-partition; ops and worker threads
/// share it via `Arc`. Only the fetch generation is mutable, and it is
/// atomic, so the context needs no lock.
#[derive(Debug)]
pub struct PartitionContext {
    topic: String,
    partition: i32,
    /// Current fetch generation; bumped on seek/stop/reassign
    fetch_version: AtomicI32,
}

impl PartitionContext {
    /// Create a context for `topic`/`partition` at generation 1
    pub fn new(topic: impl Into<String>, partition: i32) -> Arc<Self> {
        Arc::new(PartitionContext {
            topic: topic.into(),
            partition,
            fetch_version: AtomicI32::new(1),
        })
    }

    /// Topic name
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Partition id
    pub fn partition(&self) -> i32 {
        self.partition
    }

    /// Generation ops created now should be stamped with
    pub fn fetch_version(&self) -> i32 {
        self.fetch_version.load(Ordering::Acquire)
    }

    /// Invalidate outstanding ops: bump the generation and return the new one
    ///
    /// Called when the application seeks, stops fetching, or the partition is
    /// reassigned. Ops stamped with an older generation are discarded by
    /// their consumer instead of acted upon; no cancel message is needed.
    pub fn bump_fetch_version(&self) -> i32 {
        self.fetch_version.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// A caller-owned topic-partition record
///
/// The flat representation used in lists and returned from
/// [`Event::topic_partition`](crate::event::Event::topic_partition).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPartition {
    /// Topic name
    pub topic: String,
    /// Partition id
    pub partition: i32,
    /// Offset, or [`OFFSET_INVALID`]
    pub offset: i64,
    /// Per-partition result code
    pub err: ErrorCode,
}

impl TopicPartition {
    /// Create a record with no offset and no error
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        TopicPartition {
            topic: topic.into(),
            partition,
            offset: OFFSET_INVALID,
            err: ErrorCode::NoError,
        }
    }

    /// Derive a fresh record from a shared partition context
    pub fn from_context(ctx: &PartitionContext) -> Self {
        TopicPartition::new(ctx.topic().to_string(), ctx.partition())
    }
}

/// An ordered list of topic-partition records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicPartitionList {
    elems: Vec<TopicPartition>,
}

impl TopicPartitionList {
    /// Create an empty list
    pub fn new() -> Self {
        TopicPartitionList::default()
    }

    /// Append a topic-partition and return a mutable reference to it
    pub fn add(&mut self, topic: impl Into<String>, partition: i32) -> &mut TopicPartition {
        self.elems.push(TopicPartition::new(topic, partition));
        self.elems.last_mut().unwrap()
    }

    /// Append a topic-partition with an offset
    pub fn add_with_offset(&mut self, topic: impl Into<String>, partition: i32, offset: i64) {
        let tp = self.add(topic, partition);
        tp.offset = offset;
    }

    /// Find an entry by topic and partition
    pub fn find(&self, topic: &str, partition: i32) -> Option<&TopicPartition> {
        self.elems
            .iter()
            .find(|tp| tp.partition == partition && tp.topic == topic)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// True when the list holds no entries
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, TopicPartition> {
        self.elems.iter()
    }
}

impl<'a> IntoIterator for &'a TopicPartitionList {
    type Item = &'a TopicPartition;
    type IntoIter = std::slice::Iter<'a, TopicPartition>;

    fn into_iter(self) -> Self::IntoIter {
        self.elems.iter()
    }
}

/// A partition list that is either owned by the op or shared with other holders
///
/// Ownership is part of the type: dropping an `Owned` list frees it, dropping
/// a `Shared` one only releases this holder's reference. Payload destruction
/// cannot mis-free a list someone else still uses.
#[derive(Debug, Clone)]
pub enum ListRef {
    /// List owned exclusively by the op
    Owned(TopicPartitionList),
    /// List shared with longer-lived state
    Shared(Arc<TopicPartitionList>),
}

impl ListRef {
    /// Read access regardless of ownership
    pub fn as_list(&self) -> &TopicPartitionList {
        match self {
            ListRef::Owned(list) => list,
            ListRef::Shared(list) => list,
        }
    }
}

impl Default for ListRef {
    fn default() -> Self {
        ListRef::Owned(TopicPartitionList::new())
    }
}

impl std::ops::Deref for ListRef {
    type Target = TopicPartitionList;

    fn deref(&self) -> &TopicPartitionList {
        self.as_list()
    }
}

/// Consumer group handle referenced from fetch-start/seek ops
///
/// The group coordination logic itself lives outside this crate; ops only
/// need a shared reference and the group's generation for staleness checks.
#[derive(Debug)]
pub struct ConsumerGroup {
    group_id: String,
    generation: AtomicI32,
}

impl ConsumerGroup {
    /// Create a group handle at generation 0 (not yet joined)
    pub fn new(group_id: impl Into<String>) -> Arc<Self> {
        Arc::new(ConsumerGroup {
            group_id: group_id.into(),
            generation: AtomicI32::new(0),
        })
    }

    /// Group id
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Current group generation
    pub fn generation(&self) -> i32 {
        self.generation.load(Ordering::Acquire)
    }

    /// Record the generation from a completed rebalance
    pub fn set_generation(&self, generation: i32) {
        self.generation.store(generation, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_version_starts_at_one_and_bumps() {
        let ctx = PartitionContext::new("orders", 3);
        assert_eq!(ctx.fetch_version(), 1);
        assert_eq!(ctx.bump_fetch_version(), 2);
        assert_eq!(ctx.fetch_version(), 2);
    }

    #[test]
    fn test_topic_partition_from_context() {
        let ctx = PartitionContext::new("orders", 3);
        let tp = TopicPartition::from_context(&ctx);
        assert_eq!(tp.topic, "orders");
        assert_eq!(tp.partition, 3);
        assert_eq!(tp.offset, OFFSET_INVALID);
        assert_eq!(tp.err, ErrorCode::NoError);
    }

    #[test]
    fn test_list_add_and_find() {
        let mut list = TopicPartitionList::new();
        list.add("a", 0);
        list.add_with_offset("a", 1, 42);
        list.add("b", 0);

        assert_eq!(list.len(), 3);
        assert_eq!(list.find("a", 1).unwrap().offset, 42);
        assert!(list.find("a", 2).is_none());
        assert!(list.find("c", 0).is_none());
    }

    #[test]
    fn test_shared_list_survives_op_side_drop() {
        let mut list = TopicPartitionList::new();
        list.add("a", 0);
        let shared = Arc::new(list);

        let held = ListRef::Shared(Arc::clone(&shared));
        assert_eq!(Arc::strong_count(&shared), 2);
        drop(held);
        assert_eq!(Arc::strong_count(&shared), 1);
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn test_listref_deref() {
        let mut list = TopicPartitionList::new();
        list.add("t", 5);
        let owned = ListRef::Owned(list);
        assert_eq!(owned.len(), 1);
        assert!(owned.find("t", 5).is_some());
    }

    #[test]
    fn test_group_generation_updates() {
        let group = ConsumerGroup::new("cg-1");
        assert_eq!(group.generation(), 0);
        group.set_generation(7);
        assert_eq!(group.generation(), 7);
        assert_eq!(group.group_id(), "cg-1");
    }
}
