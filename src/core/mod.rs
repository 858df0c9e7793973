pub mod analyzer;
pub mod graph;
pub mod resolver;
pub mod scanner;

pub use analyzer::{analyze, Analysis, ProjectMapper};
pub use graph::{
    BindingKind, ComponentNode, DependencyGraph, Edge, EdgeKind, FileNode, GraphBuilder,
    GraphDocument, GraphSummary, Group, ImportBinding, Node, PatternKind, ProjectGraph, RawImport,
};
pub use resolver::{ImportResolver, ResolveStats};
pub use scanner::{FileScanner, ScanOutcome};
