// Event projection tests
//
// Covers the application-facing contract of events:
// - one-shot fetch message iteration
// - delivery-report iteration order, count, and exhaustion
// - message validity until the event is destroyed (purge list)
// - fixed event names
// - topic-partition projection and offset patching
// - wrong-kind accessors returning sentinels

mod helpers;

use std::sync::Arc;

use kafkaq::{
    ErrorCode, Event, EventKind, Op, OpKind, PartitionContext, TopicPartitionList, OFFSET_INVALID,
};

use helpers::{delivery_report_event, fetch_event};

#[test]
fn test_fetch_event_yields_exactly_one_message() {
    let mut ev = fetch_event(42);
    assert_eq!(ev.event_kind(), EventKind::Fetch);
    assert_eq!(ev.message_count(), 1);

    let msg = ev.next_message().expect("first call yields the message");
    assert_eq!(msg.offset, 42);
    assert_eq!(msg.payload.as_ref().unwrap().as_ref(), b"fetched-record");

    // Non-restartable: every later call returns none, no matter how many
    for _ in 0..5 {
        assert!(ev.next_message().is_none());
    }
}

#[test]
fn test_delivery_report_yields_all_messages_in_order() {
    let n = 7;
    let mut ev = delivery_report_event(n);
    assert_eq!(ev.event_kind(), EventKind::DeliveryReport);
    assert_eq!(ev.message_count(), n);

    for expected in 0..n {
        let msg = ev.next_message().expect("message available");
        assert_eq!(msg.offset, expected as i64, "enqueue order preserved");
    }
    assert!(ev.next_message().is_none(), "(N+1)-th call returns none");
    assert_eq!(ev.message_count(), 0, "live count reflects the drain");
}

#[test]
fn test_yielded_messages_live_until_event_destroyed() {
    let mut ev = delivery_report_event(1);

    let msg = ev.next_message().unwrap();
    // The event retains the yielded message on its purge list: the caller's
    // reference plus the event's make two.
    assert_eq!(Arc::strong_count(&msg), 2);
    assert_eq!(msg.payload.as_ref().unwrap().as_ref(), b"dr-payload");

    ev.destroy();
    // The purge list went away with the event; only the caller's reference
    // remains, still readable.
    assert_eq!(Arc::strong_count(&msg), 1);
    assert_eq!(msg.offset, 0);
}

#[test]
fn test_event_names_are_fixed_strings() {
    assert_eq!(Event::from(Op::new(OpKind::None)).name(), "(NONE)");
    assert_eq!(delivery_report_event(0).name(), "DeliveryReport");
    assert_eq!(fetch_event(0).name(), "Fetch");
    assert_eq!(
        Event::from(Op::error(ErrorCode::Unknown, -1, "x")).name(),
        "Error"
    );
    // Internal plumbing projects to no event
    assert_eq!(Event::from(Op::new(OpKind::Terminate)).name(), "(NONE)");
}

#[test]
fn test_message_iteration_on_other_kinds_yields_nothing() {
    let mut ev = Event::from(Op::error(ErrorCode::Unknown, -1, "x"));
    assert_eq!(ev.message_count(), 0);
    assert!(ev.next_message().is_none());
}

#[test]
fn test_topic_partition_absent_without_context() {
    let ev = Event::from(Op::error(ErrorCode::Unknown, -1, "x"));
    assert!(ev.topic_partition().is_none());
}

#[test]
fn test_topic_partition_copies_error_and_patches_offset() {
    let ctx = PartitionContext::new("orders", 2);

    let mut op = Op::consumer_error(ErrorCode::OffsetOutOfRange, 5000, "out of range");
    op.partition = Some(Arc::clone(&ctx));
    let ev = Event::from(op);

    let tp = ev.topic_partition().expect("context attached");
    assert_eq!(tp.topic, "orders");
    assert_eq!(tp.partition, 2);
    assert_eq!(tp.err, ErrorCode::OffsetOutOfRange);
    assert_eq!(tp.offset, 5000, "offset patched for consumer errors");
}

#[test]
fn test_topic_partition_offset_untouched_for_non_error_kinds() {
    let ctx = PartitionContext::new("orders", 2);

    let mut op = Op::new(OpKind::FetchStop);
    op.partition = Some(Arc::clone(&ctx));
    op.err = ErrorCode::NotLeaderForPartition;
    let ev = Event::from(op);

    let tp = ev.topic_partition().unwrap();
    assert_eq!(tp.err, ErrorCode::NotLeaderForPartition);
    assert_eq!(tp.offset, OFFSET_INVALID, "no payload offset to patch");
}

#[test]
fn test_log_accessor_not_applicable_for_other_kinds() {
    for ev in [
        delivery_report_event(1),
        fetch_event(0),
        Event::from(Op::error(ErrorCode::Unknown, -1, "x")),
        Event::from(Op::new(OpKind::None)),
    ] {
        assert!(ev.log().is_none());
    }

    let ev = Event::from(Op::log("FETCH", "partition lagging", 4));
    assert_eq!(ev.log(), Some(("FETCH", "partition lagging", 4)));
}

#[test]
fn test_partition_list_only_on_rebalance_events() {
    let mut partitions = TopicPartitionList::new();
    partitions.add("orders", 0);
    partitions.add("orders", 1);

    let ev = Event::from(Op::rebalance(partitions));
    assert_eq!(ev.event_kind(), EventKind::Rebalance);
    let list = ev.topic_partition_list().expect("rebalance carries a list");
    assert_eq!(list.len(), 2);
    assert!(list.find("orders", 1).is_some());

    assert!(fetch_event(0).topic_partition_list().is_none());
    assert!(delivery_report_event(1).topic_partition_list().is_none());
}

#[test]
fn test_destroy_releases_shared_references() {
    let ctx = PartitionContext::new("orders", 0);

    let mut op = Op::new(OpKind::FetchStop);
    op.partition = Some(Arc::clone(&ctx));
    let ev = Event::from(op);

    assert_eq!(Arc::strong_count(&ctx), 2);
    ev.destroy();
    assert_eq!(Arc::strong_count(&ctx), 1);
}

#[test]
fn test_dropping_no_event_is_a_no_op() {
    // The "destroy(null)" contract: an absent event can be dropped freely.
    let none: Option<Event> = None;
    drop(none);
}

#[test]
fn test_error_readable_for_every_kind() {
    let mut op = Op::new(OpKind::Subscribe);
    op.err = ErrorCode::RebalanceInProgress;
    assert_eq!(Event::from(op).error(), ErrorCode::RebalanceInProgress);

    // Unset means success, not "no field"
    assert_eq!(fetch_event(0).error(), ErrorCode::NoError);
}
