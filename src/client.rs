//! The client handle
//!
//! [`ClientHandle`] is the shared back-reference an op may carry to its
//! owning client instance. It owns the application-bound reply queue (where
//! workers deliver fetch results, delivery reports, errors and rebalances)
//! and the in-flight op count used to verify that every op created against
//! the handle is eventually destroyed.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::{ConfigError, ErrorCode};
use crate::event::Event;
use crate::op::OpKind;
use crate::partition::OFFSET_INVALID;
use crate::queue::OpQueue;

/// Shared client instance state
///
/// Created once per client and shared via `Arc` with every thread and op
/// that needs a back-reference. Dropping the last reference tears the
/// handle down; by then the in-flight op count has returned to zero.
pub struct ClientHandle {
    config: ClientConfig,
    reply_queue: Arc<OpQueue>,
    ops_in_flight: AtomicI64,
}

impl ClientHandle {
    /// Validate `config` and create the handle
    pub fn new(config: ClientConfig) -> Result<Arc<Self>, ConfigError> {
        config.validate()?;
        debug!(client_id = %config.client_id, "client handle created");
        Ok(Arc::new(ClientHandle {
            config,
            reply_queue: Arc::new(OpQueue::new()),
            ops_in_flight: AtomicI64::new(0),
        }))
    }

    /// Client identifier from the configuration
    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    /// The configuration this handle was created with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The application-bound reply queue
    pub fn reply_queue(&self) -> &Arc<OpQueue> {
        &self.reply_queue
    }

    /// Configured default timeout for synchronous calls
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.config.default_timeout_ms)
    }

    /// Ops currently bound to this handle and not yet destroyed
    pub fn inflight_ops(&self) -> i64 {
        self.ops_in_flight.load(Ordering::Acquire)
    }

    /// Serve the application queue: run callbacks, surface events
    ///
    /// Blocks up to `timeout` for an op. Callback ops are invoked here and
    /// consumed without surfacing; anything else is handed to the
    /// application as an [`Event`] it now owns.
    pub fn poll(&self, timeout: Duration) -> Option<Event> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            let mut op = self.reply_queue.pop(remaining)?;
            if op.callback.is_some() {
                op.call(self);
                continue;
            }
            return Some(Event::from(op));
        }
    }

    /// Report an operational error to the application
    ///
    /// Builds an error op and publishes it on the reply queue, where the
    /// application picks it up as an Error event.
    pub fn post_error(&self, err: ErrorCode, reason: impl Into<String>) {
        self.reply_queue
            .send_err(OpKind::Err, err, 0, None, OFFSET_INVALID, reason);
    }

    pub(crate) fn op_bound(&self, kind: OpKind) {
        let now = self.ops_in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        if self.config.log_op_flow {
            trace!(client_id = %self.config.client_id, kind = kind.name(), inflight = now, "op bound");
        }
        if now > self.config.max_inflight_ops {
            warn!(
                client_id = %self.config.client_id,
                inflight = now,
                ceiling = self.config.max_inflight_ops,
                "in-flight op count exceeds the configured ceiling"
            );
        }
    }

    pub(crate) fn op_unbound(&self) {
        self.ops_in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("client_id", &self.config.client_id)
            .field("inflight_ops", &self.inflight_ops())
            .finish()
    }
}
