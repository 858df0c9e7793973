//! File-backed memory store.
//!
//! Outputs are kept as named slots, one file per slot, in a single directory.
//! The mapper itself never writes here; callers hand its rendered bytes over.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

use crate::core::ProjectGraph;
use crate::error::{MapperError, Result};
use crate::formatters::{JsonFormatter, MermaidFormatter};

pub const STRUCTURE_DIAGRAM_SLOT: &str = "structure.mmd";
pub const STRUCTURE_GRAPH_SLOT: &str = "structure.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    pub name: String,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

pub trait MemoryStore {
    /// `None` when the slot does not exist yet.
    fn read(&self, slot: &str) -> Result<Option<String>>;
    fn write(&self, slot: &str, content: &str) -> Result<()>;
    /// Appends, creating the slot with its well-known header if missing.
    fn append(&self, slot: &str, content: &str) -> Result<()>;
    /// Slots sorted by name.
    fn list(&self) -> Result<Vec<SlotInfo>>;
}

pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| MapperError::io(&dir, err))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        validate_slot(slot)?;
        Ok(self.dir.join(slot))
    }
}

impl MemoryStore for DirectoryStore {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(MapperError::io(path, err)),
        }
    }

    fn write(&self, slot: &str, content: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        fs::write(&path, content).map_err(|err| MapperError::io(&path, err))?;
        debug!(slot, bytes = content.len(), "slot written");
        Ok(())
    }

    fn append(&self, slot: &str, content: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            let initial = format!("{}{content}", slot_header(slot));
            return fs::write(&path, initial).map_err(|err| MapperError::io(&path, err));
        }
        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|err| MapperError::io(&path, err))?;
        file.write_all(content.as_bytes())
            .map_err(|err| MapperError::io(&path, err))
    }

    fn list(&self) -> Result<Vec<SlotInfo>> {
        let entries = fs::read_dir(&self.dir).map_err(|err| MapperError::io(&self.dir, err))?;
        let mut slots = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| MapperError::io(&self.dir, err))?;
            let metadata = entry
                .metadata()
                .map_err(|err| MapperError::io(entry.path(), err))?;
            if !metadata.is_file() {
                continue;
            }
            slots.push(SlotInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified: metadata.modified().ok(),
            });
        }
        slots.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(slots)
    }
}

/// Write the diagram and graph slots for `graph`.
pub fn persist_structure(store: &dyn MemoryStore, graph: &ProjectGraph) -> Result<()> {
    store.write(
        STRUCTURE_DIAGRAM_SLOT,
        &MermaidFormatter::new().format_graph(graph),
    )?;
    store.write(
        STRUCTURE_GRAPH_SLOT,
        &JsonFormatter::new().format_graph(graph)?,
    )
}

/// Header a slot starts with when `append` creates it.
pub fn slot_header(slot: &str) -> &'static str {
    match slot {
        "memory.md" => "# Project Memory\n\n",
        "decisions.md" => "# Design Decisions\n\n",
        "changelog.md" => "# Changelog\n\n",
        "todos.md" => "# To-Do List\n\n",
        "development-guidelines.md" => "# Development Guidelines\n\n",
        _ => "",
    }
}

fn validate_slot(slot: &str) -> Result<()> {
    let plain = !slot.is_empty()
        && slot != "."
        && slot != ".."
        && !slot.contains(['/', '\\', '\0']);
    if plain {
        Ok(())
    } else {
        Err(MapperError::InvalidSlot(slot.to_string()))
    }
}
