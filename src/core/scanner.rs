use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::MapperConfig;
use crate::error::Issue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Absolute path used for reading
    pub path: PathBuf,
    /// Project-relative, `/`-separated key
    pub relative_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryInfo {
    pub name: String,
    pub relative_path: String,
    pub parent_path: String,
}

/// Everything a traversal saw, in depth-first visiting order.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub directories: Vec<DirectoryInfo>,
    pub files: Vec<FileInfo>,
    pub issues: Vec<Issue>,
    pub interrupted: bool,
}

pub struct FileScanner {
    config: MapperConfig,
}

impl FileScanner {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Walk `root` depth-first. Children are visited in file-name order so two
    /// scans of the same tree agree. A directory that cannot be listed loses
    /// its subtree only; the failure is reported as an issue.
    pub fn scan_directory(&self, root: &Path, deadline: Option<Instant>) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_skipped(entry));

        for entry in walker {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                warn!(
                    files = outcome.files.len(),
                    "time budget exhausted, stopping traversal"
                );
                outcome.issues.push(Issue::TraversalInterrupted {
                    files_collected: outcome.files.len(),
                });
                outcome.interrupted = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let message = err
                        .io_error()
                        .map(|io| io.to_string())
                        .unwrap_or_else(|| err.to_string());
                    let issue = walk_issue(root, err.path(), message);
                    warn!("{issue}");
                    outcome.issues.push(issue);
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let relative_path = project_relative(root, entry.path());
            if entry.file_type().is_dir() {
                let parent_path = relative_path
                    .rsplit_once('/')
                    .map(|(parent, _)| parent.to_string())
                    .unwrap_or_default();
                outcome.directories.push(DirectoryInfo {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    relative_path,
                    parent_path,
                });
            } else if self.is_analyzable(&entry) {
                outcome.files.push(FileInfo {
                    path: entry.path().to_path_buf(),
                    relative_path,
                });
            }
        }

        debug!(
            directories = outcome.directories.len(),
            files = outcome.files.len(),
            "scan finished"
        );
        outcome
    }

    // Lossy so undecodable names still see the hidden and ignore rules.
    fn is_skipped(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && self
                .config
                .is_skipped_dir(&entry.file_name().to_string_lossy())
    }

    fn is_analyzable(&self, entry: &DirEntry) -> bool {
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        is_file
            && entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.config.is_analyzable_extension(ext))
    }
}

/// A directory that could not be listed loses its subtree; anything else
/// is a single entry that could not be inspected.
fn walk_issue(root: &Path, path: Option<&Path>, message: String) -> Issue {
    let relative = path
        .map(|path| project_relative(root, path))
        .unwrap_or_default();
    if path.is_some_and(Path::is_dir) {
        Issue::UnreadableDirectory {
            path: relative,
            message,
        }
    } else {
        Issue::UnreadableEntry {
            path: relative,
            message,
        }
    }
}

/// `path` relative to `root` with `/` separators on every platform.
pub fn project_relative(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
