//! Text rendering of the graph and palette
//!
//! [`TextCanvas`] is the rendering collaborator of the headless host. It
//! receives graph events as an [`EventSink`], turns display updates into
//! printable lines, and renders node snapshots on request. The theme is
//! handed in at construction; nothing here reads global state.

use std::collections::HashMap;
use std::fmt::Write as _;

use parking_lot::Mutex;

use dataflow_engine::{
    AttributeId, AttributeKind, DisplayUpdate, EventError, EventSink, Graph, GraphEvent, NodeId,
    NodeView, Palette,
};

use crate::config::{CanvasConfig, Rgb, ThemeConfig};

pub struct TextCanvas {
    theme: ThemeConfig,
    settings: CanvasConfig,
    labels: Mutex<HashMap<NodeId, String>>,
    pending: Mutex<Vec<String>>,
}

impl TextCanvas {
    pub fn new(theme: ThemeConfig, settings: CanvasConfig) -> Self {
        Self {
            theme,
            settings,
            labels: Mutex::new(HashMap::new()),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Lines produced by events since the last call
    pub fn take_output(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock())
    }

    /// Render the palette, one section per category
    pub fn render_palette(&self, palette: &Palette) -> String {
        let mut out = String::new();
        for section in palette.sections() {
            let _ = writeln!(out, "{}", section.title());
            for entry in &section.entries {
                let button = self.paint_background(&format!(" {} ", entry.label), self.theme.source_button);
                let _ = writeln!(out, "  {}", button);
            }
        }
        out
    }

    /// Render every node with its attributes, then the links
    pub fn render_graph(&self, graph: &Graph) -> String {
        let views = graph.views();
        if views.is_empty() {
            return "(empty graph)\n".to_string();
        }

        let mut ports: HashMap<AttributeId, (usize, &str)> = HashMap::new();
        for (position, view) in views.iter().enumerate() {
            for attribute in &view.attributes {
                ports.insert(attribute.id, (position + 1, attribute.label.as_str()));
            }
        }

        let mut out = String::new();
        for (position, view) in views.iter().enumerate() {
            self.render_node(&mut out, position + 1, view);
        }

        let links = graph.links();
        if !links.is_empty() {
            let _ = writeln!(out, "links:");
            for link in links {
                let (Some(from), Some(to)) = (ports.get(&link.output), ports.get(&link.input)) else {
                    continue;
                };
                let _ = writeln!(out, "  {}.{} -> {}.{}", from.0, from.1, to.0, to.1);
            }
        }
        out
    }

    fn render_node(&self, out: &mut String, position: usize, view: &NodeView) {
        let title = format!("[{}] {} ({})", position, view.label, view.template_id);
        let title = if view.executed {
            self.paint_background(&title, self.theme.completion_title_bar)
        } else {
            title
        };
        let _ = writeln!(out, "{}", title);

        for kind in [AttributeKind::Input, AttributeKind::Static, AttributeKind::Output] {
            for attribute in view.attributes_of(kind) {
                let marker = if attribute.linked { "*" } else { " " };
                let _ = write!(
                    out,
                    "  {:<6}{} {}: {}",
                    kind.to_string(),
                    marker,
                    attribute.label,
                    attribute.display_text(&self.settings.placeholder)
                );
                if self.settings.show_ids {
                    let _ = write!(out, "  <{}>", attribute.id);
                }
                out.push('\n');
            }
        }
    }

    fn paint_background(&self, text: &str, color: Rgb) -> String {
        if !self.settings.color {
            return text.to_string();
        }
        let [r, g, b] = color;
        format!("\x1b[48;2;{};{};{}m{}\x1b[0m", r, g, b, text)
    }

    fn label_of(&self, node_id: NodeId) -> String {
        self.labels
            .lock()
            .get(&node_id)
            .cloned()
            .unwrap_or_else(|| node_id.to_string())
    }

    fn describe(update: &DisplayUpdate) -> String {
        match update {
            DisplayUpdate::Extrema { min, max } => format!("min = {}, max = {}", min, max),
            DisplayUpdate::Series { values } => format!("series {}", values),
            DisplayUpdate::Line { x, y } => format!("line x = {} y = {}", x, y),
        }
    }
}

impl EventSink for TextCanvas {
    fn send(&self, event: GraphEvent) -> Result<(), EventError> {
        match event {
            GraphEvent::NodeAdded { node_id, label, .. } => {
                self.labels.lock().insert(node_id, label);
            }
            GraphEvent::NodeRemoved { node_id } => {
                self.labels.lock().remove(&node_id);
            }
            GraphEvent::GraphReset => {
                self.labels.lock().clear();
            }
            GraphEvent::Display { node_id, update } => {
                let line = format!("{} | {}", self.label_of(node_id), Self::describe(&update));
                self.pending.lock().push(line);
            }
            GraphEvent::NodeFailed { node_id, error } => {
                let line = format!("{} | failed: {}", self.label_of(node_id), error);
                self.pending.lock().push(line);
            }
            other => log::trace!("TextCanvas: {:?}", other),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataflow_nodes::{builtin_registry, default_palette};
    use std::sync::Arc;

    fn plain() -> TextCanvas {
        TextCanvas::new(
            ThemeConfig::default(),
            CanvasConfig {
                color: false,
                ..CanvasConfig::default()
            },
        )
    }

    #[test]
    fn test_render_palette_sections() {
        let text = plain().render_palette(&default_palette());
        assert!(text.starts_with("Data Sets\n   Test Data \n"));
        assert!(text.contains("Tools\n   1D Data View \n   2D Data View \n"));
    }

    #[test]
    fn test_render_graph_placeholder_and_completion() {
        let canvas = Arc::new(plain());
        let registry = builtin_registry();
        let palette = default_palette();
        let mut graph = Graph::with_event_sink(canvas.clone());

        let data = palette.drop_onto("Test Data", &registry, &mut graph).unwrap();
        let mm = palette.drop_onto("MinMax", &registry, &mut graph).unwrap();
        let out = graph.node(data).unwrap().output_id(0).unwrap();
        let input = graph.node(mm).unwrap().input_id(0).unwrap();
        graph.link(out, input).unwrap();

        let text = canvas.render_graph(&graph);
        assert!(text.contains("[2] MinMax (min-max)\n"));
        assert!(text.contains("output  min: Not Calculated"));
        assert!(text.contains("links:\n  1.data -> 2.values\n"));

        graph.execute(data).unwrap();
        graph.execute(mm).unwrap();
        assert_eq!(canvas.take_output(), vec!["MinMax | min = -5.0, max = 5.0"]);
        assert!(canvas.take_output().is_empty());
        assert!(canvas.render_graph(&graph).contains("output  min: -5.0"));
    }

    #[test]
    fn test_completion_color_from_theme() {
        let theme = ThemeConfig {
            completion_title_bar: [1, 2, 3],
            ..ThemeConfig::default()
        };
        let canvas = Arc::new(TextCanvas::new(theme, CanvasConfig::default()));
        let registry = builtin_registry();
        let mut graph = Graph::with_event_sink(canvas.clone());
        let id = graph
            .add_node(registry.create("data-set", serde_json::json!([1])).unwrap());

        assert!(!canvas.render_graph(&graph).contains("\x1b[48;2;1;2;3m"));
        graph.execute(id).unwrap();
        assert!(canvas.render_graph(&graph).contains("\x1b[48;2;1;2;3m[1] Data Set"));
    }

    #[test]
    fn test_failures_are_reported() {
        let canvas = Arc::new(plain());
        let registry = builtin_registry();
        let mut graph = Graph::with_event_sink(canvas.clone());
        let id = graph.add_node(registry.create("view-1d", serde_json::Value::Null).unwrap());

        assert!(graph.execute(id).is_err());
        let lines = canvas.take_output();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("1D Data View | failed: Missing input"));
    }
}
