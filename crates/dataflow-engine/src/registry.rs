//! Template registry and node factory
//!
//! Maps template id strings to metadata and a behavior factory. The
//! registry is the only place nodes are constructed: `create` builds the
//! template's fixed attribute shape from its metadata, captures the payload
//! and hands back a fresh [`Node`]. It never touches a graph.
//!
//! # Usage
//!
//! ```ignore
//! use dataflow_engine::NodeRegistry;
//!
//! let mut registry = NodeRegistry::with_builtins();
//! registry.register_template::<MyNode>();
//!
//! let node = registry.create("min-max", serde_json::Value::Null)?;
//! graph.add_node(node);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::descriptor::{TemplateDescriptor, TemplateFn, TemplateMetadata};
use crate::error::{EngineError, Result};
use crate::node::{Node, NodeBehavior};
use crate::types::{TemplateCategory, Value};

/// Produces the behavior for each new node of one template
pub trait NodeFactory: Send + Sync {
    fn create_behavior(&self) -> Box<dyn NodeBehavior>;
}

impl<F> NodeFactory for F
where
    F: Fn() -> Box<dyn NodeBehavior> + Send + Sync,
{
    fn create_behavior(&self) -> Box<dyn NodeBehavior> {
        self()
    }
}

/// A registration entry combining metadata with its factory
struct RegistryEntry {
    metadata: TemplateMetadata,
    factory: Arc<dyn NodeFactory>,
}

/// Registry of node templates
///
/// Registries compose by merging; entries from the merged registry win on
/// id collisions.
pub struct NodeRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry holding every template submitted with `inventory`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for template in inventory::iter::<TemplateFn> {
            registry.register((template.descriptor)(), Arc::new(template.behavior));
        }
        log::debug!(
            "NodeRegistry: collected {} built-in templates",
            registry.len()
        );
        registry
    }

    /// Register a template with metadata and a behavior factory
    pub fn register(&mut self, metadata: TemplateMetadata, factory: Arc<dyn NodeFactory>) {
        if self.entries.contains_key(&metadata.template_id) {
            log::debug!(
                "NodeRegistry: replacing template '{}'",
                metadata.template_id
            );
        }
        self.entries.insert(
            metadata.template_id.clone(),
            RegistryEntry { metadata, factory },
        );
    }

    /// Register a template type that describes itself
    pub fn register_template<T>(&mut self)
    where
        T: TemplateDescriptor + NodeBehavior + Default + 'static,
    {
        let template = TemplateFn::of::<T>();
        self.register((template.descriptor)(), Arc::new(template.behavior));
    }

    /// Get metadata for a template
    pub fn get_metadata(&self, template_id: &str) -> Option<&TemplateMetadata> {
        self.entries.get(template_id).map(|e| &e.metadata)
    }

    /// All registered metadata, sorted by label
    pub fn all_metadata(&self) -> Vec<&TemplateMetadata> {
        let mut all: Vec<_> = self.entries.values().map(|e| &e.metadata).collect();
        all.sort_by(|a, b| a.label.cmp(&b.label));
        all
    }

    /// Metadata grouped by palette category
    pub fn metadata_by_category(&self) -> HashMap<TemplateCategory, Vec<&TemplateMetadata>> {
        let mut grouped: HashMap<TemplateCategory, Vec<&TemplateMetadata>> = HashMap::new();
        for metadata in self.all_metadata() {
            grouped.entry(metadata.category).or_default().push(metadata);
        }
        grouped
    }

    /// Check if a template is registered
    pub fn has_template(&self, template_id: &str) -> bool {
        self.entries.contains_key(template_id)
    }

    /// Registered template ids, sorted
    pub fn template_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.entries.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another registry into this one
    pub fn merge(&mut self, other: NodeRegistry) {
        self.entries.extend(other.entries);
    }

    /// Build a node with the template's default label
    pub fn create(&self, template_id: &str, payload: Value) -> Result<Node> {
        let label = self
            .get_metadata(template_id)
            .map(|m| m.label.clone())
            .ok_or_else(|| EngineError::UnknownTemplate(template_id.to_string()))?;
        self.create_labeled(template_id, label, payload)
    }

    /// Build a node with an explicit label
    ///
    /// Fails with `UnknownTemplate` or `PayloadShape`; nothing is built in
    /// either case.
    pub fn create_labeled(
        &self,
        template_id: &str,
        label: impl Into<String>,
        payload: Value,
    ) -> Result<Node> {
        let entry = self
            .entries
            .get(template_id)
            .ok_or_else(|| EngineError::UnknownTemplate(template_id.to_string()))?;
        let metadata = &entry.metadata;

        if !metadata.payload.accepts(&payload) {
            return Err(EngineError::PayloadShape {
                template_id: template_id.to_string(),
                expected: metadata.payload,
            });
        }

        let mut node = Node::new(
            label,
            template_id,
            payload,
            entry.factory.create_behavior(),
        );
        for port in &metadata.inputs {
            node.add_input(port.label.clone());
        }
        for port in &metadata.statics {
            node.add_static(port.label.clone(), port.default.clone());
        }
        for port in &metadata.outputs {
            node.add_output(port.label.clone());
        }

        log::debug!("NodeRegistry: created '{}' from '{}'", node.label(), template_id);
        Ok(node)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
