use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::trace;

use super::graph::{EdgeKind, GraphBuilder, Node};

/// Counters for one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub attempted: usize,
    pub resolved: usize,
    pub dropped: usize,
}

/// Maps raw import targets onto project files.
///
/// Candidates are tried in a fixed order: the exact path, the path with each
/// extension appended, then `index.<ext>` inside the path. Extensions are
/// tried in configuration order at both stages.
pub struct ImportResolver {
    root: PathBuf,
    extensions: Vec<String>,
}

impl ImportResolver {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }

    /// Emit `imports` and `uses` edges for every recorded import, in node
    /// order then import order. Imports that do not land on a file node of
    /// this run are dropped without error.
    pub fn resolve_all(&self, builder: &mut GraphBuilder) -> ResolveStats {
        let mut stats = ResolveStats::default();

        for (source, importer_path, imports) in builder.pending_imports() {
            for import in imports {
                stats.attempted += 1;

                let target = self
                    .resolve_target(&importer_path, &import.target)
                    .and_then(|path| builder.file_node(&path));
                let Some(target) = target else {
                    trace!(importer = %importer_path, target = %import.target, "import dropped");
                    stats.dropped += 1;
                    continue;
                };

                builder.push_edge(EdgeKind::Imports, source, target);

                let components = match builder.node(target) {
                    Some(Node::File(file)) => file.component_names.clone(),
                    _ => Vec::new(),
                };
                for name in components {
                    if let Some(component) = builder.component_node(&name) {
                        builder.push_edge(EdgeKind::Uses, source, component);
                    }
                }
                stats.resolved += 1;
            }
        }

        stats
    }

    /// Project-relative path of the file `target` refers to when written in
    /// `importer_path`, or `None` for external, escaping or missing targets.
    pub fn resolve_target(&self, importer_path: &str, target: &str) -> Option<String> {
        let base = if let Some(absolute) = target.strip_prefix('/') {
            normalize_relative(absolute)?
        } else if target.starts_with('.') {
            let directory = importer_path
                .rsplit_once('/')
                .map(|(dir, _)| dir)
                .unwrap_or("");
            normalize_relative(&format!("{directory}/{target}"))?
        } else {
            return None;
        };

        self.candidates(&base)
            .into_iter()
            .find(|candidate| self.is_file(candidate))
    }

    fn candidates(&self, base: &str) -> Vec<String> {
        let mut candidates = Vec::with_capacity(1 + self.extensions.len() * 2);
        if !base.is_empty() {
            candidates.push(base.to_string());
            candidates.extend(self.extensions.iter().map(|ext| format!("{base}.{ext}")));
        }
        candidates.extend(self.extensions.iter().map(|ext| {
            if base.is_empty() {
                format!("index.{ext}")
            } else {
                format!("{base}/index.{ext}")
            }
        }));
        candidates
    }

    fn is_file(&self, relative: &str) -> bool {
        let path = self.root.join(relative);
        match fs::metadata(&path) {
            Ok(metadata) => metadata.is_file(),
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    trace!(path = %path.display(), error = %err, "candidate check failed");
                }
                false
            }
        }
    }
}

/// Lexically normalize a `/`-separated path relative to the project root.
/// Returns `None` when `..` climbs above the root; the root itself is `""`.
pub fn normalize_relative(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            part => parts.push(part),
        }
    }
    Some(parts.join("/"))
}
