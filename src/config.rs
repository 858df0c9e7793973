use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{MapperError, Result};

/// Analyzable extensions in resolution priority order.
pub const DEFAULT_EXTENSIONS: [&str; 6] = ["js", "jsx", "ts", "tsx", "vue", "svelte"];

/// Directory names that are never traversed.
pub const DEFAULT_IGNORED_DIRS: [&str; 1] = ["node_modules"];

/// Settings for one mapper instance.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapperConfig {
    /// Extensions without the leading dot, highest priority first
    pub extensions: Vec<String>,
    pub ignored_dirs: Vec<String>,
    /// Skip directories whose name starts with `.`
    pub skip_hidden_dirs: bool,
    /// Read and extract files on the rayon pool
    pub parallel: bool,
    pub time_budget_ms: Option<u64>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            ignored_dirs: DEFAULT_IGNORED_DIRS
                .iter()
                .map(|dir| dir.to_string())
                .collect(),
            skip_hidden_dirs: true,
            parallel: true,
            time_budget_ms: None,
        }
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON config file and normalize it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| MapperError::io(path, err))?;
        let config: MapperConfig = serde_json::from_str(&content)?;
        config.normalized()
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(&Into::<String>::into(ext)))
            .collect();
        self
    }

    pub fn with_ignored_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hidden_dirs_skipped(mut self, skip: bool) -> Self {
        self.skip_hidden_dirs = skip;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = Some(budget.as_millis() as u64);
        self
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Strip leading dots and lower-case extensions, dropping duplicates
    /// while keeping the first occurrence's priority.
    pub fn normalized(mut self) -> Result<Self> {
        let mut extensions: Vec<String> = Vec::with_capacity(self.extensions.len());
        for raw in &self.extensions {
            let ext = normalize_extension(raw);
            if ext.is_empty() {
                continue;
            }
            if ext.contains('/') || ext.contains('\\') {
                return Err(MapperError::Config(format!(
                    "extension {raw:?} contains a path separator"
                )));
            }
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        if extensions.is_empty() {
            return Err(MapperError::Config(
                "at least one analyzable extension is required".to_string(),
            ));
        }
        self.extensions = extensions;
        self.ignored_dirs = self
            .ignored_dirs
            .into_iter()
            .map(|dir| dir.trim().to_string())
            .filter(|dir| !dir.is_empty())
            .collect();
        Ok(self)
    }

    pub fn is_analyzable_extension(&self, extension: &str) -> bool {
        let lowered = extension.to_lowercase();
        self.extensions.iter().any(|ext| *ext == lowered)
    }

    pub fn is_skipped_dir(&self, name: &str) -> bool {
        (self.skip_hidden_dirs && name.starts_with('.'))
            || self.ignored_dirs.iter().any(|dir| dir == name)
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_lowercase()
}
