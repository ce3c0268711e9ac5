//! Source catalog offered to the user
//!
//! A [`Palette`] groups entries into one section per [`TemplateCategory`].
//! Each entry pairs a display label with a template id and the payload the
//! node is created with. Dropping an entry onto a graph is `create` followed
//! by `add_node`; the palette never keeps a reference to what it created.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::graph::Graph;
use crate::registry::NodeRegistry;
use crate::types::{NodeId, TemplateCategory, Value};

/// One draggable catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteEntry {
    pub label: String,
    pub template_id: String,
    pub payload: Value,
}

/// Entries of one category, in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteSection {
    pub category: TemplateCategory,
    pub entries: Vec<PaletteEntry>,
}

impl PaletteSection {
    pub fn title(&self) -> &'static str {
        self.category.section_title()
    }
}

/// Catalog of templates, grouped into sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    sections: Vec<PaletteSection>,
}

impl Palette {
    /// Create a palette with one empty section per category
    pub fn new() -> Self {
        Self {
            sections: TemplateCategory::ALL
                .iter()
                .map(|category| PaletteSection {
                    category: *category,
                    entries: Vec::new(),
                })
                .collect(),
        }
    }

    /// Add an entry to the section for `category`
    pub fn add(
        &mut self,
        category: TemplateCategory,
        label: impl Into<String>,
        template_id: impl Into<String>,
        payload: Value,
    ) -> &mut Self {
        let entry = PaletteEntry {
            label: label.into(),
            template_id: template_id.into(),
            payload,
        };
        if let Some(section) = self.sections.iter_mut().find(|s| s.category == category) {
            section.entries.push(entry);
        }
        self
    }

    /// Add a data source with its sequence
    pub fn add_data_set(&mut self, label: impl Into<String>, data: Vec<f64>) -> &mut Self {
        self.add(
            TemplateCategory::DataSet,
            label,
            "data-set",
            Value::from(data),
        )
    }

    pub fn add_modifier(
        &mut self,
        label: impl Into<String>,
        template_id: impl Into<String>,
    ) -> &mut Self {
        self.add(TemplateCategory::Modifier, label, template_id, Value::Null)
    }

    pub fn add_inspector(
        &mut self,
        label: impl Into<String>,
        template_id: impl Into<String>,
    ) -> &mut Self {
        self.add(TemplateCategory::Inspector, label, template_id, Value::Null)
    }

    pub fn add_tool(
        &mut self,
        label: impl Into<String>,
        template_id: impl Into<String>,
    ) -> &mut Self {
        self.add(TemplateCategory::Tool, label, template_id, Value::Null)
    }

    pub fn sections(&self) -> &[PaletteSection] {
        &self.sections
    }

    /// Every entry, section by section
    pub fn entries(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }

    /// Entry with this label, if any
    pub fn find(&self, label: &str) -> Option<&PaletteEntry> {
        self.entries().find(|e| e.label == label)
    }

    /// `(label, template_id, default_payload)` for every entry
    pub fn catalog(&self) -> Vec<(String, String, Value)> {
        self.entries()
            .map(|e| (e.label.clone(), e.template_id.clone(), e.payload.clone()))
            .collect()
    }

    /// Check that every entry can be built by `registry`
    pub fn validate(&self, registry: &NodeRegistry) -> Result<()> {
        for entry in self.entries() {
            let metadata = registry
                .get_metadata(&entry.template_id)
                .ok_or_else(|| EngineError::UnknownTemplate(entry.template_id.clone()))?;
            if !metadata.payload.accepts(&entry.payload) {
                return Err(EngineError::PayloadShape {
                    template_id: entry.template_id.clone(),
                    expected: metadata.payload,
                });
            }
        }
        Ok(())
    }

    /// Create the node for an entry and register it in `graph`
    pub fn drop_onto(
        &self,
        label: &str,
        registry: &NodeRegistry,
        graph: &mut Graph,
    ) -> Result<NodeId> {
        let entry = self
            .find(label)
            .ok_or_else(|| EngineError::UnknownPaletteEntry(label.to_string()))?;
        let node = registry.create_labeled(&entry.template_id, &entry.label, entry.payload.clone())?;
        Ok(graph.add_node(node))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PayloadShape, PortMetadata, TemplateMetadata};
    use crate::node::{ComputeContext, NodeBehavior};
    use serde_json::json;
    use std::sync::Arc;

    struct Emit;

    impl NodeBehavior for Emit {
        fn compute(&self, ctx: &ComputeContext<'_>) -> Result<Vec<Value>> {
            Ok(vec![ctx.payload().clone()])
        }
    }

    fn emit() -> Box<dyn NodeBehavior> {
        Box::new(Emit)
    }

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        registry.register(
            TemplateMetadata {
                template_id: "data-set".to_string(),
                category: TemplateCategory::DataSet,
                label: "Data Set".to_string(),
                description: "Emits its sequence".to_string(),
                inputs: vec![],
                statics: vec![],
                outputs: vec![PortMetadata::new("data", "data")],
                payload: PayloadShape::Sequence,
            },
            Arc::new(emit),
        );
        registry
    }

    #[test]
    fn test_sections_follow_categories() {
        let mut palette = Palette::new();
        palette
            .add_data_set("Test Data", vec![1.0, 2.0])
            .add_tool("Viewer", "view-1d");

        let titles: Vec<_> = palette.sections().iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["Data Sets", "Modifiers", "Inspectors", "Tools"]);
        assert_eq!(palette.sections()[0].entries.len(), 1);
        assert_eq!(palette.sections()[3].entries.len(), 1);

        let catalog = palette.catalog();
        assert_eq!(catalog[0], ("Test Data".to_string(), "data-set".to_string(), json!([1.0, 2.0])));
        assert_eq!(catalog[1].2, Value::Null);
    }

    #[test]
    fn test_drop_onto_registers_node() {
        let registry = registry();
        let mut palette = Palette::new();
        palette.add_data_set("Test Data", vec![3.0]);

        let mut graph = Graph::new();
        let id = palette.drop_onto("Test Data", &registry, &mut graph).unwrap();
        let node = graph.node(id).unwrap();
        assert_eq!(node.label(), "Test Data");
        assert_eq!(node.payload(), &json!([3.0]));
        assert!(graph.links().is_empty());

        let err = palette.drop_onto("Missing", &registry, &mut graph).unwrap_err();
        assert!(matches!(err, EngineError::UnknownPaletteEntry(_)));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_validate() {
        let registry = registry();
        let mut palette = Palette::new();
        palette.add_data_set("Test Data", vec![]);
        assert!(palette.validate(&registry).is_ok());

        palette.add_inspector("MinMax", "min-max");
        assert!(matches!(
            palette.validate(&registry),
            Err(EngineError::UnknownTemplate(ref id)) if id == "min-max"
        ));

        let mut bad = Palette::new();
        bad.add(TemplateCategory::DataSet, "Broken", "data-set", json!(1));
        assert!(matches!(
            bad.validate(&registry),
            Err(EngineError::PayloadShape { .. })
        ));
    }
}
