//! Error types for the op/event core
//!
//! Two distinct error surfaces live here:
//!
//! - [`ErrorCode`]: the protocol-level result code carried by value on every
//!   op and event. It is data, not control flow: worker threads attach it to
//!   the envelope, and whoever reads the envelope inspects it. Zero means
//!   success by convention; there is no "unset" state.
//! - [`ConfigError`]: the one place this crate returns a Rust `Result`,
//!   from configuration validation.

use thiserror::Error;

/// Protocol result codes carried on ops and events
///
/// Values match the Kafka protocol error codes for broker-originated errors.
/// See: https://kafka.apache.org/protocol.html#protocol_error_codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum ErrorCode {
    /// No error (success)
    #[default]
    NoError = 0,

    /// Unknown server error
    Unknown = -1,

    /// Requested offset is outside the range available on the broker
    OffsetOutOfRange = 1,

    /// Corrupt message (CRC mismatch or invalid batch format)
    CorruptMessage = 2,

    /// Unknown topic or partition
    UnknownTopicOrPartition = 3,

    /// This broker is not the leader for the partition
    NotLeaderForPartition = 6,

    /// Request exceeded its broker-side timeout
    RequestTimedOut = 7,

    /// Coordinator not available
    CoordinatorNotAvailable = 15,

    /// Not coordinator for group
    NotCoordinator = 16,

    /// Consumer group generation ID is stale
    IllegalGeneration = 22,

    /// Unknown consumer group member ID
    UnknownMemberId = 25,

    /// Group rebalance in progress
    RebalanceInProgress = 27,

    /// Unsupported protocol version
    UnsupportedVersion = 35,
}

impl ErrorCode {
    /// The wire-level error code
    pub fn code(self) -> i16 {
        self as i16
    }

    /// True for anything other than [`ErrorCode::NoError`]
    pub fn is_error(self) -> bool {
        self != ErrorCode::NoError
    }

    /// Map a raw protocol code back to a typed code
    ///
    /// Codes this core does not model collapse to [`ErrorCode::Unknown`],
    /// mirroring how unrecognized broker errors are surfaced to applications.
    pub fn from_code(code: i16) -> Self {
        match code {
            0 => ErrorCode::NoError,
            1 => ErrorCode::OffsetOutOfRange,
            2 => ErrorCode::CorruptMessage,
            3 => ErrorCode::UnknownTopicOrPartition,
            6 => ErrorCode::NotLeaderForPartition,
            7 => ErrorCode::RequestTimedOut,
            15 => ErrorCode::CoordinatorNotAvailable,
            16 => ErrorCode::NotCoordinator,
            22 => ErrorCode::IllegalGeneration,
            25 => ErrorCode::UnknownMemberId,
            27 => ErrorCode::RebalanceInProgress,
            35 => ErrorCode::UnsupportedVersion,
            _ => ErrorCode::Unknown,
        }
    }

    /// Short stable name, e.g. for log lines
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::NoError => "NO_ERROR",
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::OffsetOutOfRange => "OFFSET_OUT_OF_RANGE",
            ErrorCode::CorruptMessage => "CORRUPT_MESSAGE",
            ErrorCode::UnknownTopicOrPartition => "UNKNOWN_TOPIC_OR_PARTITION",
            ErrorCode::NotLeaderForPartition => "NOT_LEADER_FOR_PARTITION",
            ErrorCode::RequestTimedOut => "REQUEST_TIMED_OUT",
            ErrorCode::CoordinatorNotAvailable => "COORDINATOR_NOT_AVAILABLE",
            ErrorCode::NotCoordinator => "NOT_COORDINATOR",
            ErrorCode::IllegalGeneration => "ILLEGAL_GENERATION",
            ErrorCode::UnknownMemberId => "UNKNOWN_MEMBER_ID",
            ErrorCode::RebalanceInProgress => "REBALANCE_IN_PROGRESS",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Errors from client configuration validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Client ID is empty or exceeds the allowed length
    #[error("Invalid client id: {0}")]
    InvalidClientId(String),

    /// A numeric setting is outside its allowed range
    #[error("Invalid value for {name}: {value} (must be between {min} and {max})")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_match_kafka_spec() {
        // Verify against Kafka protocol error codes
        assert_eq!(ErrorCode::NoError.code(), 0);
        assert_eq!(ErrorCode::Unknown.code(), -1);
        assert_eq!(ErrorCode::OffsetOutOfRange.code(), 1);
        assert_eq!(ErrorCode::UnknownTopicOrPartition.code(), 3);
        assert_eq!(ErrorCode::IllegalGeneration.code(), 22);
        assert_eq!(ErrorCode::UnsupportedVersion.code(), 35);
    }

    #[test]
    fn test_from_code_round_trip() {
        for code in [
            ErrorCode::NoError,
            ErrorCode::Unknown,
            ErrorCode::OffsetOutOfRange,
            ErrorCode::CorruptMessage,
            ErrorCode::UnknownTopicOrPartition,
            ErrorCode::NotLeaderForPartition,
            ErrorCode::RequestTimedOut,
            ErrorCode::CoordinatorNotAvailable,
            ErrorCode::NotCoordinator,
            ErrorCode::IllegalGeneration,
            ErrorCode::UnknownMemberId,
            ErrorCode::RebalanceInProgress,
            ErrorCode::UnsupportedVersion,
        ] {
            assert_eq!(ErrorCode::from_code(code.code()), code);
        }
    }

    #[test]
    fn test_unmodeled_code_collapses_to_unknown() {
        assert_eq!(ErrorCode::from_code(87), ErrorCode::Unknown);
        assert_eq!(ErrorCode::from_code(-42), ErrorCode::Unknown);
    }

    #[test]
    fn test_success_is_not_an_error() {
        assert!(!ErrorCode::NoError.is_error());
        assert!(ErrorCode::Unknown.is_error());
        assert!(ErrorCode::RebalanceInProgress.is_error());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::OutOfRange {
            name: "default_timeout_ms",
            value: 0,
            min: 1,
            max: 300_000,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("default_timeout_ms"));
        assert!(msg.contains("between 1 and 300000"));
    }
}
