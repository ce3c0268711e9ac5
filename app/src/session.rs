//! Interactive command session
//!
//! Reads one command per line and applies it to the graph. Nodes are
//! addressed by their 1-based position on the canvas; ports by label
//! (spaces may be written as underscores) or by 1-based position.
//! A failed command prints its error and the session carries on.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use dataflow_engine::{
    AttributeId, AttributeKind, EngineError, Graph, NodeId, NodeRegistry, Palette, Value,
};
use dataflow_nodes::{builtin_registry, default_palette};

use crate::canvas::TextCanvas;
use crate::config::AppConfig;
use crate::constants::defaults;

const HELP: &str = "\
commands:
  palette                       list the catalog
  add <label>                   drop a palette entry onto the canvas
  link <n>.<output> <n>.<input> link an output to an input
  unlink <n>.<input>            remove the link into an input
  set <n>.<static> <json>       set a static value
  exec <n>                      execute a node
  remove <n>                    remove a node and its links
  show                          render the graph
  reset                         discard every node
  help                          show this text
  quit                          leave";

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    Parse(String),
    #[error("No node at position {0}")]
    NoSuchNode(usize),
    #[error("Node {node} has no {kind} '{port}'")]
    NoSuchPort {
        node: usize,
        kind: AttributeKind,
        port: String,
    },
    #[error("Invalid JSON value: {0}")]
    Value(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// `<node>.<port>` as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRef {
    pub node: usize,
    pub port: String,
}

impl PortRef {
    fn parse(text: &str) -> Result<Self, SessionError> {
        let (node, port) = text
            .split_once('.')
            .ok_or_else(|| SessionError::Parse(format!("expected <node>.<port>, got '{}'", text)))?;
        if port.is_empty() {
            return Err(SessionError::Parse(format!("missing port in '{}'", text)));
        }
        Ok(Self {
            node: parse_position(node)?,
            port: port.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Palette,
    Add(String),
    Link { from: PortRef, to: PortRef },
    Unlink(PortRef),
    Set { target: PortRef, value: Value },
    Exec(usize),
    Remove(usize),
    Show,
    Reset,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; `Ok(None)` for blank lines
    pub fn parse(line: &str) -> Result<Option<Self>, SessionError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "palette" => Self::Palette,
            "add" if !rest.is_empty() => Self::Add(rest.to_string()),
            "link" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(from), Some(to), None) => Self::Link {
                        from: PortRef::parse(from)?,
                        to: PortRef::parse(to)?,
                    },
                    _ => return Err(usage("link <n>.<output> <n>.<input>")),
                }
            }
            "unlink" if !rest.is_empty() => Self::Unlink(PortRef::parse(rest)?),
            "set" => {
                let (target, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| usage("set <n>.<static> <json>"))?;
                Self::Set {
                    target: PortRef::parse(target)?,
                    value: serde_json::from_str(value.trim())?,
                }
            }
            "exec" if !rest.is_empty() => Self::Exec(parse_position(rest)?),
            "remove" if !rest.is_empty() => Self::Remove(parse_position(rest)?),
            "show" => Self::Show,
            "reset" => Self::Reset,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "add" | "unlink" | "exec" | "remove" => {
                return Err(usage(&format!("{} <argument>", word)))
            }
            other => return Err(SessionError::Parse(format!("unknown command '{}'", other))),
        };
        Ok(Some(command))
    }
}

/// Whether the session keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    registry: NodeRegistry,
    palette: Palette,
    graph: Graph,
    canvas: Arc<TextCanvas>,
}

impl Session {
    /// Build a session over the built-in templates and default palette
    pub fn new(config: AppConfig) -> Result<Self, SessionError> {
        let registry = builtin_registry();
        let palette = default_palette();
        palette.validate(&registry)?;

        let canvas = Arc::new(TextCanvas::new(config.theme, config.canvas));
        let graph = Graph::with_event_sink(canvas.clone());
        log::info!(
            "Session ready: {} templates, {} palette entries",
            registry.len(),
            palette.entries().count()
        );

        Ok(Self {
            registry,
            palette,
            graph,
            canvas,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Read commands from `input` until it ends or `quit` is given
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> io::Result<()> {
        write!(output, "{}", defaults::PROMPT)?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let result = Command::parse(&line).and_then(|command| match command {
                Some(command) => self.handle(command, output),
                None => Ok(Flow::Continue),
            });
            self.flush_canvas(output)?;

            match result {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(SessionError::Io(e)) => return Err(e),
                Err(e) => {
                    log::debug!("Command '{}' failed: {}", line.trim(), e);
                    writeln!(output, "error: {}", e)?;
                }
            }

            write!(output, "{}", defaults::PROMPT)?;
            output.flush()?;
        }
        Ok(())
    }

    /// Apply one command
    pub fn handle<W: Write>(&mut self, command: Command, output: &mut W) -> Result<Flow, SessionError> {
        match command {
            Command::Palette => {
                write!(output, "{}", self.canvas.render_palette(&self.palette))?;
            }
            Command::Add(label) => {
                let id = self.palette.drop_onto(&label, &self.registry, &mut self.graph)?;
                writeln!(output, "added [{}] {}", self.graph.node_count(), self.label(id))?;
            }
            Command::Link { from, to } => {
                let output_id = self.resolve(&from, AttributeKind::Output)?;
                let input_id = self.resolve(&to, AttributeKind::Input)?;
                self.graph.link(output_id, input_id)?;
                writeln!(output, "linked {}.{} -> {}.{}", from.node, from.port, to.node, to.port)?;
            }
            Command::Unlink(target) => {
                let input_id = self.resolve(&target, AttributeKind::Input)?;
                self.graph.unlink(input_id)?;
                writeln!(output, "unlinked {}.{}", target.node, target.port)?;
            }
            Command::Set { target, value } => {
                let static_id = self.resolve(&target, AttributeKind::Static)?;
                self.graph.set_static(static_id, value)?;
                writeln!(output, "set {}.{}", target.node, target.port)?;
            }
            Command::Exec(position) => {
                let id = self.node_id(position)?;
                let report = self.graph.execute(id)?;
                writeln!(
                    output,
                    "executed {}: {} outputs, {} deliveries",
                    self.label(id),
                    report.outputs_produced,
                    report.deliveries
                )?;
            }
            Command::Remove(position) => {
                let id = self.node_id(position)?;
                let node = self.graph.remove_node(id)?;
                writeln!(output, "removed {}", node.label())?;
            }
            Command::Show => {
                write!(output, "{}", self.canvas.render_graph(&self.graph))?;
            }
            Command::Reset => {
                self.graph.reset();
                writeln!(output, "graph reset")?;
            }
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn flush_canvas<W: Write>(&self, output: &mut W) -> io::Result<()> {
        for line in self.canvas.take_output() {
            writeln!(output, "{}", line)?;
        }
        Ok(())
    }

    fn label(&self, id: NodeId) -> &str {
        self.graph.node(id).map(|n| n.label()).unwrap_or("?")
    }

    fn node_id(&self, position: usize) -> Result<NodeId, SessionError> {
        position
            .checked_sub(1)
            .and_then(|index| self.graph.node_at(index))
            .map(|node| node.id())
            .ok_or(SessionError::NoSuchNode(position))
    }

    fn resolve(&self, port: &PortRef, kind: AttributeKind) -> Result<AttributeId, SessionError> {
        let id = self.node_id(port.node)?;
        let node = self
            .graph
            .node(id)
            .ok_or(SessionError::NoSuchNode(port.node))?;
        let labels: Vec<&str> = match kind {
            AttributeKind::Input => node.inputs().iter().map(|a| a.label()).collect(),
            AttributeKind::Static => node.statics().iter().map(|a| a.label()).collect(),
            AttributeKind::Output => node.outputs().iter().map(|a| a.label()).collect(),
        };

        let index = labels
            .iter()
            .position(|label| *label == port.port || label.replace(' ', "_") == port.port)
            .or_else(|| {
                port.port
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .filter(|index| *index < labels.len())
            })
            .ok_or_else(|| SessionError::NoSuchPort {
                node: port.node,
                kind,
                port: port.port.clone(),
            })?;
        Ok(node.attribute_id(kind, index)?)
    }
}

fn parse_position(text: &str) -> Result<usize, SessionError> {
    text.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| SessionError::Parse(format!("expected a node number, got '{}'", text)))
}

fn usage(text: &str) -> SessionError {
    SessionError::Parse(format!("usage: {}", text))
}
