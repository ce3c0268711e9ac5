//! Dataflow Nodes
//!
//! Built-in node templates for the dataflow editor and the default palette
//! that offers them.
//!
//! # Categories
//!
//! - **Source**: Nodes that emit a fixed data set
//! - **Modifier**: Nodes that transform data
//! - **Inspector**: Nodes that summarize data
//! - **Tool**: Viewer nodes that hand data to the renderer

pub mod inspector;
pub mod modifier;
pub mod numeric;
pub mod source;
pub mod tool;

// Re-export all templates for convenience
pub use inspector::*;
pub use modifier::*;
pub use source::*;
pub use tool::*;

use dataflow_engine::{NodeRegistry, Palette};

/// Sequence offered by the default palette's data set
pub const TEST_DATA: [f64; 10] = [-5.0, -5.0, -3.0, -3.0, 0.0, 0.0, 3.0, 3.0, 5.0, 5.0];

/// Register every built-in template explicitly
pub fn register_builtins(registry: &mut NodeRegistry) {
    registry.register_template::<DataSetNode>();
    registry.register_template::<MinMaxNode>();
    registry.register_template::<DataShifterNode>();
    registry.register_template::<View1dNode>();
    registry.register_template::<View2dNode>();
}

/// A registry holding exactly the built-in templates
pub fn builtin_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    register_builtins(&mut registry);
    registry
}

/// The catalog shown when the editor starts
pub fn default_palette() -> Palette {
    let mut palette = Palette::new();
    palette
        .add_data_set("Test Data", TEST_DATA.to_vec())
        .add_tool("1D Data View", View1dNode::TEMPLATE_ID)
        .add_tool("2D Data View", View2dNode::TEMPLATE_ID)
        .add_inspector("MinMax", MinMaxNode::TEMPLATE_ID)
        .add_modifier("Data Shifter", DataShifterNode::TEMPLATE_ID);
    palette
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataflow_engine::TemplateCategory;

    #[test]
    fn test_inventory_collects_all_builtins() {
        let registry = NodeRegistry::with_builtins();
        assert_eq!(registry.len(), 5, "Expected 5 built-in templates");

        assert!(registry.has_template("data-set"));
        assert!(registry.has_template("min-max"));
        assert!(registry.has_template("data-shifter"));
        assert!(registry.has_template("view-1d"));
        assert!(registry.has_template("view-2d"));
    }

    #[test]
    fn test_explicit_registry_matches_inventory() {
        let explicit = builtin_registry();
        let collected = NodeRegistry::with_builtins();
        assert_eq!(explicit.template_ids(), collected.template_ids());
    }

    #[test]
    fn test_default_palette() {
        let palette = default_palette();
        palette.validate(&builtin_registry()).unwrap();

        let labels: Vec<_> = palette.entries().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Test Data", "Data Shifter", "MinMax", "1D Data View", "2D Data View"]
        );

        let tools = palette
            .sections()
            .iter()
            .find(|s| s.category == TemplateCategory::Tool)
            .unwrap();
        assert_eq!(tools.entries.len(), 2);
        assert_eq!(
            palette.find("Test Data").unwrap().payload,
            serde_json::json!([-5.0, -5.0, -3.0, -3.0, 0.0, 0.0, 3.0, 3.0, 5.0, 5.0])
        );
    }
}
