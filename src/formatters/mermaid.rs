//! Mermaid flowchart output.
//!
//! The text depends only on graph order, so an unchanged project renders to
//! byte-identical output and diffs cleanly when checked in.
//!
//! ```text
//! graph TD;
//!   F0["📄 a.js"];
//!   C1["🧩 a"];
//!   F0 -->|defines| C1;
//!   subgraph "src"
//!     F2
//!   end
//! ```

use anyhow::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::core::{Node, ProjectGraph};

const FILE_ICON: &str = "📄";
const COMPONENT_ICON: &str = "🧩";

pub struct MermaidFormatter {
    direction: &'static str,
}

impl MermaidFormatter {
    pub fn new() -> Self {
        Self { direction: "TD" }
    }

    pub fn format_to_file(&self, graph: &ProjectGraph, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format_graph(graph))?;
        Ok(())
    }

    pub fn format_graph(&self, graph: &ProjectGraph) -> String {
        let mut diagram = String::with_capacity(64 * (graph.node_count() + graph.edge_count()));
        let _ = writeln!(diagram, "graph {};", self.direction);

        for node in graph.nodes() {
            let icon = match node {
                Node::File(_) => FILE_ICON,
                Node::Component(_) => COMPONENT_ICON,
            };
            let _ = writeln!(
                diagram,
                "  {}[\"{} {}\"];",
                node_ref(node),
                icon,
                escape_label(node.name())
            );
        }

        for edge in graph.edges() {
            let (Some(source), Some(target)) = (graph.node(edge.source), graph.node(edge.target))
            else {
                continue;
            };
            let _ = writeln!(
                diagram,
                "  {} -->|{}| {};",
                node_ref(source),
                edge.kind.as_str(),
                node_ref(target)
            );
        }

        for (directory, ids) in directory_groups(graph) {
            let _ = writeln!(diagram, "  subgraph \"{}\"", escape_label(directory));
            for id in ids {
                let _ = writeln!(diagram, "    F{id}");
            }
            diagram.push_str("  end\n");
        }

        diagram
    }
}

impl Default for MermaidFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// `F<id>` or `C<id>`, chosen by the node's own variant.
pub fn node_ref(node: &Node) -> String {
    match node {
        Node::File(file) => format!("F{}", file.id),
        Node::Component(component) => format!("C{}", component.id),
    }
}

/// File ids per parent directory, directories in first-seen order. Files at
/// the project root are not grouped.
fn directory_groups(graph: &ProjectGraph) -> Vec<(&str, Vec<usize>)> {
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    for file in graph.file_nodes() {
        let Some(directory) = file.directory() else {
            continue;
        };
        match groups.iter_mut().find(|(dir, _)| *dir == directory) {
            Some((_, ids)) => ids.push(file.id),
            None => groups.push((directory, vec![file.id])),
        }
    }
    groups
}

fn escape_label(text: &str) -> String {
    text.replace('"', "#quot;")
}
