//! Topic handles and cluster metadata results
//!
//! [`Topic`] is the shared per-topic handle a metadata or delivery-report op
//! references; it is always held as `Arc<Topic>` so ops, partition contexts,
//! and the client can point at the same instance without copies.
//!
//! [`Metadata`] and its children are the owned result carried back on a
//! completed metadata op. They are plain data; interpreting them (leader
//! selection, connection setup) happens outside this core.

use std::sync::Arc;

use crate::error::ErrorCode;

/// Shared per-topic handle
#[derive(Debug, PartialEq, Eq)]
pub struct Topic {
    name: String,
}

impl Topic {
    /// Create a shared topic handle
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Topic { name: name.into() })
    }

    /// Topic name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One broker in a metadata result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerInfo {
    /// Broker node id
    pub node_id: i32,
    /// Advertised host
    pub host: String,
    /// Advertised port
    pub port: i32,
}

/// Per-partition slice of a topic's metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionMetadata {
    /// Partition id
    pub id: i32,
    /// Node id of the current leader, or -1 when none is known
    pub leader: i32,
    /// Replica node ids
    pub replicas: Vec<i32>,
    /// In-sync replica node ids
    pub isrs: Vec<i32>,
    /// Per-partition result code
    pub err: ErrorCode,
}

/// Per-topic slice of a metadata result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMetadata {
    /// Topic name
    pub topic: String,
    /// Partitions, ordered by id
    pub partitions: Vec<PartitionMetadata>,
    /// Per-topic result code
    pub err: ErrorCode,
}

/// Cluster metadata carried on a completed metadata op
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Known brokers
    pub brokers: Vec<BrokerInfo>,
    /// Topic metadata, one entry per requested (or known) topic
    pub topics: Vec<TopicMetadata>,
}

impl Metadata {
    /// Find a topic's metadata by name
    pub fn topic(&self, name: &str) -> Option<&TopicMetadata> {
        self.topics.iter().find(|t| t.topic == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_handle_is_shared() {
        let topic = Topic::new("orders");
        let clone = Arc::clone(&topic);
        assert_eq!(Arc::strong_count(&topic), 2);
        assert_eq!(clone.name(), "orders");
    }

    #[test]
    fn test_metadata_topic_lookup() {
        let md = Metadata {
            brokers: vec![BrokerInfo {
                node_id: 1,
                host: "localhost".to_string(),
                port: 9092,
            }],
            topics: vec![TopicMetadata {
                topic: "orders".to_string(),
                partitions: vec![PartitionMetadata {
                    id: 0,
                    leader: 1,
                    replicas: vec![1],
                    isrs: vec![1],
                    err: ErrorCode::NoError,
                }],
                err: ErrorCode::NoError,
            }],
        };

        assert!(md.topic("orders").is_some());
        assert!(md.topic("absent").is_none());
        assert_eq!(md.topic("orders").unwrap().partitions[0].leader, 1);
    }
}
