//! # depmap
//!
//! Static source-dependency mapping for JavaScript-family projects.
//!
//! A run walks the project tree, lexically extracts `import` / `require`
//! statements, resolves them to project files and builds a graph of files,
//! the components they define and the components they use. The graph renders
//! to a Mermaid flowchart or a JSON document.
//!
//! ## Pipeline
//!
//! 1. **Scan**: depth-first walk, skipping hidden and ignored directories
//! 2. **Extract**: ordered chain of lexical import patterns per file
//! 3. **Resolve**: exact path, then `path.ext`, then `path/index.ext`
//! 4. **Render**: pure function of the finished graph
//!
//! ## Supported Extensions
//!
//! `.js`, `.jsx`, `.ts`, `.tsx`, `.vue`, `.svelte` (configurable)

pub mod config;
pub mod core;
pub mod error;
pub mod extractors;
pub mod formatters;
pub mod store;

pub use crate::config::MapperConfig;
pub use crate::core::{analyze, Analysis, ProjectGraph, ProjectMapper};
pub use crate::error::{Issue, MapperError};
