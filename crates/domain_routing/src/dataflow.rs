//! Dataflow capability
//!
//! The engine computes every decision synchronously and then hands an event
//! to a dataflow. `StreamingDataflow` fans events out to subscribers over a
//! broadcast channel; `NullDataflow` drops them. Decisions are identical
//! under either.

use tokio::sync::broadcast;
use tracing::trace;

use crate::events::RoutingEvent;

/// Sink for routing events
pub trait RoutingDataflow: Send + Sync {
    /// Short name reported in engine status
    fn name(&self) -> &'static str;

    /// Publishes an event; never blocks and never fails the caller
    fn publish(&self, event: RoutingEvent);

    /// A live event stream, if this dataflow supports one
    fn subscribe(&self) -> Option<broadcast::Receiver<RoutingEvent>> {
        None
    }
}

/// Broadcast-backed dataflow
///
/// Slow subscribers lag and lose the oldest events rather than holding up
/// routing.
#[derive(Debug, Clone)]
pub struct StreamingDataflow {
    sender: broadcast::Sender<RoutingEvent>,
}

impl StreamingDataflow {
    /// `capacity` must be greater than zero
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl RoutingDataflow for StreamingDataflow {
    fn name(&self) -> &'static str {
        "streaming"
    }

    fn publish(&self, event: RoutingEvent) {
        let event_type = event.event_type();
        if self.sender.send(event).is_err() {
            trace!(event_type, "No dataflow subscribers");
        }
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<RoutingEvent>> {
        Some(self.sender.subscribe())
    }
}

/// Dataflow that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDataflow;

impl RoutingDataflow for NullDataflow {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn publish(&self, _event: RoutingEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rules_replaced(version: u64) -> RoutingEvent {
        RoutingEvent::RulesReplaced {
            rules_version: version,
            rules_count: 0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_streaming_delivers_to_subscribers() {
        let dataflow = StreamingDataflow::new(8);
        let mut rx = dataflow.subscribe().unwrap();
        dataflow.publish(rules_replaced(3));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.event_type(), "RulesReplaced");
        assert_eq!(event.rules_version(), 3);
    }

    #[test]
    fn test_streaming_without_subscribers_is_silent() {
        let dataflow = StreamingDataflow::new(8);
        assert_eq!(dataflow.subscriber_count(), 0);
        dataflow.publish(rules_replaced(1));
    }

    #[test]
    fn test_null_dataflow_has_no_stream() {
        let dataflow = NullDataflow;
        dataflow.publish(rules_replaced(1));
        assert!(dataflow.subscribe().is_none());
        assert_eq!(dataflow.name(), "fallback");
    }
}
