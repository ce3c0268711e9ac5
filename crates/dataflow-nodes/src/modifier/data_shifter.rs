//! Data Shifter Node
//!
//! Adds a constant offset to every element of an x and a y sequence.

use dataflow_engine::{
    ComputeContext, NodeBehavior, PayloadShape, PortMetadata, Result, StaticMetadata,
    TemplateCategory, TemplateDescriptor, TemplateFn, TemplateMetadata, Value,
};

use crate::numeric;

/// Data Shifter Node
///
/// The axes are shifted independently: each output has the length of its
/// own input, and sequences of different lengths are passed through as-is.
///
/// # Inputs
/// - `x` (required) - sequence of numbers
/// - `y` (required) - sequence of numbers
///
/// # Statics
/// - `x_shift` - offset added to every x element (default 0)
/// - `y_shift` - offset added to every y element (default 0)
///
/// # Outputs
/// - `x mod` - shifted x
/// - `y mod` - shifted y
#[derive(Debug, Clone, Copy, Default)]
pub struct DataShifterNode;

impl DataShifterNode {
    pub const TEMPLATE_ID: &'static str = "data-shifter";
    pub const PORT_X: &'static str = "x";
    pub const PORT_Y: &'static str = "y";
    pub const STATIC_X_SHIFT: &'static str = "x_shift";
    pub const STATIC_Y_SHIFT: &'static str = "y_shift";
    pub const PORT_X_MOD: &'static str = "x_mod";
    pub const PORT_Y_MOD: &'static str = "y_mod";
}

impl TemplateDescriptor for DataShifterNode {
    fn descriptor() -> TemplateMetadata {
        TemplateMetadata {
            template_id: Self::TEMPLATE_ID.to_string(),
            category: TemplateCategory::Modifier,
            label: "Data Shifter".to_string(),
            description: "Shifts x and y sequences by constant offsets".to_string(),
            inputs: vec![
                PortMetadata::new(Self::PORT_X, "x"),
                PortMetadata::new(Self::PORT_Y, "y"),
            ],
            statics: vec![
                StaticMetadata::new(Self::STATIC_X_SHIFT, "x_shift", Value::from(0)),
                StaticMetadata::new(Self::STATIC_Y_SHIFT, "y_shift", Value::from(0)),
            ],
            outputs: vec![
                PortMetadata::new(Self::PORT_X_MOD, "x mod"),
                PortMetadata::new(Self::PORT_Y_MOD, "y mod"),
            ],
            payload: PayloadShape::Empty,
        }
    }
}

inventory::submit!(TemplateFn::of::<DataShifterNode>());

impl NodeBehavior for DataShifterNode {
    fn compute(&self, ctx: &ComputeContext<'_>) -> Result<Vec<Value>> {
        let x = shift_axis(ctx, 0)?;
        let y = shift_axis(ctx, 1)?;

        if x.len() != y.len() {
            log::debug!(
                "DataShifterNode '{}': x has {} elements, y has {}",
                ctx.label(),
                x.len(),
                y.len()
            );
        }

        Ok(vec![Value::Array(x), Value::Array(y)])
    }
}

/// Shift input `index` by static `index`
fn shift_axis(ctx: &ComputeContext<'_>, index: usize) -> Result<Vec<Value>> {
    let port = ctx.input_label(index);
    let values = numeric::sequence(ctx.require_input(index)?, port)?;

    let zero = Value::from(0);
    let shift = ctx.static_value(index).unwrap_or(&zero);
    numeric::number(shift, ctx.static_label(index))?;

    values
        .iter()
        .map(|value| numeric::add(value, shift, port))
        .collect()
}
