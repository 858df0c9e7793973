use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::{Directed, Graph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{MapperError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Defines,
    Imports,
    Uses,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Defines => "defines",
            EdgeKind::Imports => "imports",
            EdgeKind::Uses => "uses",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Default,
    Named,
}

/// Which lexical matcher produced an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Esm,
    CommonJs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportBinding {
    pub kind: BindingKind,
    pub name: String,
}

impl ImportBinding {
    pub fn default_import(name: impl Into<String>) -> Self {
        Self {
            kind: BindingKind::Default,
            name: name.into(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: BindingKind::Named,
            name: name.into(),
        }
    }
}

/// An import target as written in the source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImport {
    pub target: String,
    pub bindings: Vec<ImportBinding>,
    pub pattern: PatternKind,
}

impl RawImport {
    pub fn new(target: impl Into<String>, pattern: PatternKind) -> Self {
        Self {
            target: target.into(),
            bindings: Vec::new(),
            pattern,
        }
    }

    pub fn with_bindings(mut self, bindings: Vec<ImportBinding>) -> Self {
        self.bindings = bindings;
        self
    }

    /// Relative (`./x`, `../x`) or root-absolute (`/x`) targets can name
    /// project files; bare specifiers cannot.
    pub fn is_project_target(target: &str) -> bool {
        target.starts_with('.') || target.starts_with('/')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: usize,
    /// Base name with extension
    pub name: String,
    /// Project-relative, `/`-separated
    pub path: String,
    #[serde(rename = "components")]
    pub component_names: Vec<String>,
    #[serde(skip)]
    pub import_targets: Vec<RawImport>,
}

impl FileNode {
    pub fn new(id: usize, path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(path.as_str()).to_string();
        Self {
            id,
            name,
            path,
            component_names: Vec::new(),
            import_targets: Vec::new(),
        }
    }

    /// Parent directory, `None` for files at the project root.
    pub fn directory(&self) -> Option<&str> {
        self.path.rsplit_once('/').map(|(dir, _)| dir)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    pub id: usize,
    pub name: String,
    pub defined_in: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    File(FileNode),
    Component(ComponentNode),
}

impl Node {
    pub fn id(&self) -> usize {
        match self {
            Node::File(file) => file.id,
            Node::Component(component) => component.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => &file.name,
            Node::Component(component) => &component.name,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(file) => Some(file),
            Node::Component(_) => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            Node::Component(component) => Some(component),
            Node::File(_) => None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(kind: EdgeKind, source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: usize,
    pub name: String,
    pub path: String,
    pub parent_path: String,
}

/// Node index equals node id: nodes are only ever appended.
pub type DependencyGraph = Graph<Node, Edge, Directed>;

/// The serialized shape of a [`ProjectGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GraphSummary {
    pub files: usize,
    pub components: usize,
    pub groups: usize,
    pub defines: usize,
    pub imports: usize,
    pub uses: usize,
}

/// Result graph of one analysis run. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    graph: DependencyGraph,
    groups: Vec<Group>,
}

impl ProjectGraph {
    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_weights()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.raw_edges().iter().map(|edge| &edge.weight)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.graph.node_weight(NodeIndex::new(id))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn file_nodes(&self) -> impl Iterator<Item = &FileNode> + '_ {
        self.nodes().filter_map(Node::as_file)
    }

    pub fn component_nodes(&self) -> impl Iterator<Item = &ComponentNode> + '_ {
        self.nodes().filter_map(Node::as_component)
    }

    pub fn file_by_path(&self, path: &str) -> Option<&FileNode> {
        self.file_nodes().find(|file| file.path == path)
    }

    pub fn component_by_name(&self, name: &str) -> Option<&ComponentNode> {
        self.component_nodes()
            .find(|component| component.name == name)
    }

    pub fn summary(&self) -> GraphSummary {
        let mut summary = GraphSummary {
            groups: self.groups.len(),
            ..GraphSummary::default()
        };
        for node in self.nodes() {
            match node {
                Node::File(_) => summary.files += 1,
                Node::Component(_) => summary.components += 1,
            }
        }
        for edge in self.edges() {
            match edge.kind {
                EdgeKind::Defines => summary.defines += 1,
                EdgeKind::Imports => summary.imports += 1,
                EdgeKind::Uses => summary.uses += 1,
            }
        }
        summary
    }

    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes().cloned().collect(),
            edges: self.edges().copied().collect(),
            groups: self.groups.clone(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: GraphDocument = serde_json::from_str(json)?;
        Self::try_from(document)
    }
}

impl TryFrom<GraphDocument> for ProjectGraph {
    type Error = MapperError;

    fn try_from(document: GraphDocument) -> Result<Self> {
        let mut graph = DependencyGraph::with_capacity(document.nodes.len(), document.edges.len());
        let mut paths = HashSet::new();
        let mut names = HashSet::new();

        for (position, node) in document.nodes.into_iter().enumerate() {
            if node.id() != position {
                return Err(MapperError::MalformedGraph(format!(
                    "node at position {position} has id {}",
                    node.id()
                )));
            }
            let unique = match &node {
                Node::File(file) => paths.insert(file.path.clone()),
                Node::Component(component) => names.insert(component.name.clone()),
            };
            if !unique {
                return Err(MapperError::MalformedGraph(format!(
                    "duplicate key for node {position}"
                )));
            }
            graph.add_node(node);
        }

        let node_count = graph.node_count();
        for edge in document.edges {
            if edge.source >= node_count || edge.target >= node_count {
                return Err(MapperError::MalformedGraph(format!(
                    "edge {} -> {} points outside {node_count} nodes",
                    edge.source, edge.target
                )));
            }
            graph.add_edge(NodeIndex::new(edge.source), NodeIndex::new(edge.target), edge);
        }

        Ok(Self {
            graph,
            groups: document.groups,
        })
    }
}

impl Serialize for ProjectGraph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

/// Build context for a single run: owns the graph and both lookup tables.
pub struct GraphBuilder {
    graph: DependencyGraph,
    groups: Vec<Group>,
    file_index: HashMap<String, NodeIndex>,
    component_index: HashMap<String, NodeIndex>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            groups: Vec::new(),
            file_index: HashMap::new(),
            component_index: HashMap::new(),
        }
    }

    /// Returns the node for `path`, creating it when absent. The flag is
    /// `true` only when the node was created by this call.
    pub fn add_file(&mut self, path: &str) -> (NodeIndex, bool) {
        if let Some(&index) = self.file_index.get(path) {
            return (index, false);
        }
        let id = self.graph.node_count();
        let index = self.graph.add_node(Node::File(FileNode::new(id, path)));
        self.file_index.insert(path.to_string(), index);
        (index, true)
    }

    /// Record that `file` declares `name`. A name already listed on the file
    /// is ignored; a new name gets a `defines` edge, creating the component
    /// node on first sight.
    pub fn register_component(&mut self, file: NodeIndex, name: &str) -> Option<NodeIndex> {
        let defined_in = match self.graph.node_weight_mut(file)? {
            Node::File(file_node) => {
                if file_node.component_names.iter().any(|existing| existing == name) {
                    return self.component_index.get(name).copied();
                }
                file_node.component_names.push(name.to_string());
                file_node.path.clone()
            }
            Node::Component(_) => return None,
        };

        let component = match self.component_index.get(name) {
            Some(&index) => index,
            None => {
                let id = self.graph.node_count();
                let index = self.graph.add_node(Node::Component(ComponentNode {
                    id,
                    name: name.to_string(),
                    defined_in,
                }));
                self.component_index.insert(name.to_string(), index);
                index
            }
        };

        self.push_edge(EdgeKind::Defines, file, component);
        Some(component)
    }

    pub fn add_imports(&mut self, file: NodeIndex, imports: Vec<RawImport>) {
        if let Some(Node::File(file_node)) = self.graph.node_weight_mut(file) {
            file_node.import_targets.extend(imports);
        }
    }

    pub fn add_group(&mut self, name: &str, path: &str, parent_path: &str) -> usize {
        let id = self.groups.len();
        self.groups.push(Group {
            id,
            name: name.to_string(),
            path: path.to_string(),
            parent_path: parent_path.to_string(),
        });
        id
    }

    /// Adds an edge between existing nodes; `None` if either id is unknown.
    pub fn add_edge(&mut self, edge: Edge) -> Option<EdgeIndex> {
        let node_count = self.graph.node_count();
        if edge.source >= node_count || edge.target >= node_count {
            return None;
        }
        Some(self.graph.add_edge(
            NodeIndex::new(edge.source),
            NodeIndex::new(edge.target),
            edge,
        ))
    }

    pub(crate) fn push_edge(&mut self, kind: EdgeKind, source: NodeIndex, target: NodeIndex) {
        let edge = Edge::new(kind, source.index(), target.index());
        self.graph.add_edge(source, target, edge);
    }

    pub fn file_node(&self, path: &str) -> Option<NodeIndex> {
        self.file_index.get(path).copied()
    }

    pub fn component_node(&self, name: &str) -> Option<NodeIndex> {
        self.component_index.get(name).copied()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(index)
    }

    /// Snapshot of every file that has imports to resolve, in node order.
    pub(crate) fn pending_imports(&self) -> Vec<(NodeIndex, String, Vec<RawImport>)> {
        self.graph
            .node_indices()
            .filter_map(|index| match &self.graph[index] {
                Node::File(file) if !file.import_targets.is_empty() => {
                    Some((index, file.path.clone(), file.import_targets.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn build(self) -> ProjectGraph {
        ProjectGraph {
            graph: self.graph,
            groups: self.groups,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
