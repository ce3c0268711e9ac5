//! Event types for reporting graph activity
//!
//! Events are sent from the graph to the canvas (or any consumer) to report
//! mutations, execution results and values handed to the renderer by viewer
//! nodes.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::{AttributeId, NodeId, Value};

/// Trait for receiving graph events
///
/// This abstracts over whatever renders the graph (a GUI canvas, a text
/// console, a test recorder).
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered. The graph logs
    /// such failures and carries on.
    fn send(&self, event: GraphEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Values a node hands to the rendering collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisplayUpdate {
    /// Minimum and maximum of a sequence
    Extrema { min: Value, max: Value },
    /// A 1-D series
    Series { values: Value },
    /// A 2-D line series
    Line { x: Value, y: Value },
}

/// Events emitted by a graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GraphEvent {
    /// A node was registered
    #[serde(rename_all = "camelCase")]
    NodeAdded {
        node_id: NodeId,
        label: String,
        template_id: String,
    },

    /// A node and its links were removed
    #[serde(rename_all = "camelCase")]
    NodeRemoved { node_id: NodeId },

    /// A link was created
    #[serde(rename_all = "camelCase")]
    LinkCreated {
        output: AttributeId,
        input: AttributeId,
    },

    /// A link was removed
    #[serde(rename_all = "camelCase")]
    LinkRemoved {
        output: AttributeId,
        input: AttributeId,
    },

    /// Every node and link was discarded
    GraphReset,

    /// An output's value reached one linked input
    #[serde(rename_all = "camelCase")]
    ValueDelivered {
        output: AttributeId,
        input: AttributeId,
    },

    /// A node finished executing
    #[serde(rename_all = "camelCase")]
    NodeExecuted {
        node_id: NodeId,
        outputs_produced: usize,
        deliveries: usize,
    },

    /// A node's computation faulted
    #[serde(rename_all = "camelCase")]
    NodeFailed { node_id: NodeId, error: String },

    /// A node handed values to the renderer
    #[serde(rename_all = "camelCase")]
    Display {
        node_id: NodeId,
        update: DisplayUpdate,
    },
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: GraphEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: Mutex<Vec<GraphEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<GraphEvent> {
        self.events.lock().clone()
    }

    /// Display updates collected so far, with the node that sent them
    pub fn displays(&self) -> Vec<(NodeId, DisplayUpdate)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                GraphEvent::Display { node_id, update } => Some((*node_id, update.clone())),
                _ => None,
            })
            .collect()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: GraphEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}
