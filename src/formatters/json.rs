use std::fs;
use std::path::Path;

use crate::core::ProjectGraph;
use crate::error::{MapperError, Result};

/// Serializes the graph as `{nodes, edges, groups}`.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Two-space indented output.
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn format_to_file(&self, graph: &ProjectGraph, output_path: &Path) -> anyhow::Result<()> {
        let json_content = self.format_graph(graph)?;
        fs::write(output_path, json_content)
            .map_err(|err| MapperError::io(output_path, err))?;
        Ok(())
    }

    pub fn format_graph(&self, graph: &ProjectGraph) -> Result<String> {
        let document = graph.to_document();
        let json = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(json)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
