//! 2D Data View Node

use dataflow_engine::{
    ComputeContext, DisplayUpdate, NodeBehavior, PayloadShape, PortMetadata, Result,
    TemplateCategory, TemplateDescriptor, TemplateFn, TemplateMetadata, Value,
};

/// Plots y against x as a line series
///
/// # Inputs
/// - `x` (required)
/// - `y` (required)
#[derive(Debug, Clone, Copy, Default)]
pub struct View2dNode;

impl View2dNode {
    pub const TEMPLATE_ID: &'static str = "view-2d";
    pub const PORT_X: &'static str = "x";
    pub const PORT_Y: &'static str = "y";
}

impl TemplateDescriptor for View2dNode {
    fn descriptor() -> TemplateMetadata {
        TemplateMetadata {
            template_id: Self::TEMPLATE_ID.to_string(),
            category: TemplateCategory::Tool,
            label: "2D Data View".to_string(),
            description: "Plots a line series from x and y sequences".to_string(),
            inputs: vec![
                PortMetadata::new(Self::PORT_X, "x"),
                PortMetadata::new(Self::PORT_Y, "y"),
            ],
            statics: vec![],
            outputs: vec![],
            payload: PayloadShape::Empty,
        }
    }
}

inventory::submit!(TemplateFn::of::<View2dNode>());

impl NodeBehavior for View2dNode {
    fn compute(&self, ctx: &ComputeContext<'_>) -> Result<Vec<Value>> {
        let x = ctx.require_input(0)?.clone();
        let y = ctx.require_input(1)?.clone();
        ctx.display(DisplayUpdate::Line { x, y });
        Ok(vec![])
    }
}
