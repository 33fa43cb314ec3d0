// Shared builders for kafkaq integration tests
//
// Constructs the op/event fixtures the test files share: messages backed by
// static buffers, delivery-report events with N queued messages, and fetch
// events carrying one decoded message.

use std::sync::Arc;

use bytes::Bytes;
use kafkaq::{Event, Message, Op, OpPayload, Topic};

/// Build a message with a static payload
pub fn message(topic: &str, partition: i32, offset: i64, payload: &'static [u8]) -> Arc<Message> {
    Arc::new(Message {
        topic: topic.to_string(),
        partition,
        offset,
        payload: Some(Bytes::from_static(payload)),
        ..Default::default()
    })
}

/// Build a delivery-report event carrying `n` messages at offsets `0..n`
pub fn delivery_report_event(n: usize) -> Event {
    let mut op = Op::delivery_report(Some(Topic::new("dr-topic")));
    if let OpPayload::DeliveryReport(dr) = &mut op.payload {
        for i in 0..n {
            dr.msgq.push(message("dr-topic", 0, i as i64, b"dr-payload"));
        }
    }
    Event::from(op)
}

/// Build a fetch event whose message payload aliases a shared receive buffer
pub fn fetch_event(offset: i64) -> Event {
    let buf = Bytes::from_static(b"framing|fetched-record");
    let msg = Message {
        topic: "fetch-topic".to_string(),
        partition: 0,
        offset,
        payload: Some(buf.slice(8..)),
        ..Default::default()
    };
    Event::from(Op::fetch(msg, Some(buf)))
}
