//! Federation observer trait for progress reporting and message tracing.

use std::collections::BTreeMap;

use fc_bus::{Delivery, MessageKind};
use fc_core::LogicalTime;
use tracing::{debug, info};

/// Callbacks invoked by [`Federation::run`][crate::Federation::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — grant counter
///
/// ```rust,ignore
/// struct Grants(u64);
///
/// impl SimObserver for Grants {
///     fn on_grant(&mut self, _federate: &str, _time: LogicalTime) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after a federate's advance is granted, before its due messages
    /// are delivered.
    fn on_grant(&mut self, _federate: &str, _time: LogicalTime) {}

    /// Called for every message handed to a federate's receive callback.
    fn on_delivery(&mut self, _receiver: &str, _delivery: &Delivery) {}

    /// Called when a federate leaves the federation.
    fn on_resign(&mut self, _federate: &str, _time: LogicalTime) {}

    /// Called once after every federate has resigned.
    fn on_end(&mut self, _final_time: LogicalTime) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Counts deliveries per message kind and logs progress every
/// `interval` logical time units.
#[derive(Debug)]
pub struct TraceObserver {
    interval:      f64,
    next_report:   f64,
    pub grants:    u64,
    pub resigned:  Vec<String>,
    pub delivered: BTreeMap<MessageKind, u64>,
}

impl TraceObserver {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            next_report: interval,
            grants:      0,
            resigned:    Vec::new(),
            delivered:   BTreeMap::new(),
        }
    }

    /// Deliveries of `kind` so far.
    pub fn count(&self, kind: impl Into<MessageKind>) -> u64 {
        self.delivered.get(&kind.into()).copied().unwrap_or(0)
    }

    pub fn total_delivered(&self) -> u64 {
        self.delivered.values().sum()
    }
}

impl SimObserver for TraceObserver {
    fn on_grant(&mut self, federate: &str, time: LogicalTime) {
        self.grants += 1;
        if self.interval > 0.0 && time.value() >= self.next_report {
            info!(%time, federate, grants = self.grants, delivered = self.total_delivered(), "progress");
            while self.next_report <= time.value() {
                self.next_report += self.interval;
            }
        }
    }

    fn on_delivery(&mut self, receiver: &str, delivery: &Delivery) {
        *self.delivered.entry(delivery.kind).or_insert(0) += 1;
        debug!(receiver, kind = %delivery.kind, time = %delivery.time, sender = %delivery.sender, "delivered");
    }

    fn on_resign(&mut self, federate: &str, time: LogicalTime) {
        self.resigned.push(federate.to_owned());
        info!(federate, %time, "resigned");
    }

    fn on_end(&mut self, final_time: LogicalTime) {
        for (kind, n) in &self.delivered {
            info!(%kind, count = n, "deliveries");
        }
        info!(%final_time, grants = self.grants, "federation finished");
    }
}
