use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::graph::{GraphBuilder, ProjectGraph, RawImport};
use super::resolver::ImportResolver;
use super::scanner::{FileInfo, FileScanner};
use crate::config::MapperConfig;
use crate::error::{Issue, MapperError, Result};
use crate::extractors::common::component_name;
use crate::extractors::ExtractorChain;

/// Outcome of one run: a best-effort graph plus every non-fatal issue.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub root: PathBuf,
    pub graph: ProjectGraph,
    pub issues: Vec<Issue>,
}

impl Analysis {
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

pub struct ProjectMapper {
    config: MapperConfig,
    extractors: ExtractorChain,
}

impl ProjectMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            extractors: ExtractorChain::new(),
        }
    }

    pub fn with_extractors(mut self, extractors: ExtractorChain) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Traverse, extract, then resolve. Only a missing or non-directory root
    /// is an error; everything else ends up in [`Analysis::issues`].
    pub fn analyze(&self, root: &Path) -> Result<Analysis> {
        let root = absolute_root(root)?;
        let started = Instant::now();
        let deadline = self.config.time_budget().map(|budget| started + budget);
        info!(root = %root.display(), "mapping project structure");

        let scan = FileScanner::new(self.config.clone()).scan_directory(&root, deadline);
        let mut issues = scan.issues;

        let mut builder = GraphBuilder::new();
        for directory in &scan.directories {
            builder.add_group(
                &directory.name,
                &directory.relative_path,
                &directory.parent_path,
            );
        }

        // Reading is independent per file; registration below stays in
        // traversal order so ids do not depend on scheduling.
        let extracted: Vec<std::io::Result<Vec<RawImport>>> = if self.config.parallel {
            scan.files
                .par_iter()
                .map(|file| self.extractors.extract_file(&file.path))
                .collect()
        } else {
            scan.files
                .iter()
                .map(|file| self.extractors.extract_file(&file.path))
                .collect()
        };

        for (file, result) in scan.files.iter().zip(extracted) {
            if let Some(issue) = register_file(&mut builder, file, result) {
                warn!("{issue}");
                issues.push(issue);
            }
        }
        debug!(
            nodes = builder.node_count(),
            edges = builder.edge_count(),
            "extraction finished"
        );

        let resolver = ImportResolver::new(&root, self.config.extensions.clone());
        let stats = resolver.resolve_all(&mut builder);
        debug!(
            attempted = stats.attempted,
            resolved = stats.resolved,
            dropped = stats.dropped,
            "resolution finished"
        );

        let graph = builder.build();
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            issues = issues.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );

        Ok(Analysis {
            root,
            graph,
            issues,
        })
    }
}

impl Default for ProjectMapper {
    fn default() -> Self {
        Self::new(MapperConfig::default())
    }
}

/// Analyze `root` with the default configuration.
pub fn analyze(root: &Path) -> Result<Analysis> {
    ProjectMapper::default().analyze(root)
}

fn register_file(
    builder: &mut GraphBuilder,
    file: &FileInfo,
    extracted: std::io::Result<Vec<RawImport>>,
) -> Option<Issue> {
    let (node, created) = builder.add_file(&file.relative_path);
    if !created {
        return None;
    }
    builder.register_component(node, &component_name(&file.relative_path));

    match extracted {
        Ok(imports) => {
            builder.add_imports(node, imports);
            None
        }
        Err(err) => Some(Issue::UnreadableFile {
            path: file.relative_path.clone(),
            message: err.to_string(),
        }),
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf> {
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|err| MapperError::io(root, err))?
            .join(root)
    };

    match fs::metadata(&root) {
        Ok(metadata) if metadata.is_dir() => Ok(root),
        Ok(_) => Err(MapperError::NotADirectory(root)),
        Err(_) => Err(MapperError::RootNotFound(root)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    fn info(relative_path: &str) -> FileInfo {
        FileInfo {
            path: PathBuf::from("/nowhere").join(relative_path),
            relative_path: relative_path.to_string(),
        }
    }

    #[test]
    fn unreadable_file_keeps_an_empty_node() {
        let mut builder = GraphBuilder::new();
        let failure = Err(Error::new(ErrorKind::PermissionDenied, "denied"));

        let issue = register_file(&mut builder, &info("src/locked.js"), failure);

        assert!(matches!(issue, Some(Issue::UnreadableFile { ref path, .. }) if path == "src/locked.js"));
        let graph = builder.build();
        let file = graph.file_by_path("src/locked.js").unwrap();
        assert!(file.import_targets.is_empty());
        assert_eq!(file.component_names, vec!["locked".to_string()]);
    }

    #[test]
    fn a_path_is_registered_once() {
        let mut builder = GraphBuilder::new();
        let file = info("a.js");
        let imports = vec![RawImport::new("./b", crate::core::PatternKind::Esm)];

        assert!(register_file(&mut builder, &file, Ok(imports.clone())).is_none());
        assert!(register_file(&mut builder, &file, Ok(imports)).is_none());

        let graph = builder.build();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.file_by_path("a.js").unwrap().import_targets.len(), 1);
    }
}
