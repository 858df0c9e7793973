use depmap::analyze;
use depmap::core::{ComponentNode, Edge, EdgeKind, FileNode, GraphDocument, Node, ProjectGraph};
use depmap::formatters::MermaidFormatter;
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn mermaid_snapshot_root_level_files() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path(), "a.js", "import {b} from './b'\n");
    write(dir.path(), "b.js", "");

    let graph = analyze(dir.path()).unwrap().graph;
    let expected = "\
graph TD;
  F0[\"📄 a.js\"];
  C1[\"🧩 a\"];
  F2[\"📄 b.js\"];
  C3[\"🧩 b\"];
  F0 -->|defines| C1;
  F2 -->|defines| C3;
  F0 -->|imports| F2;
  F0 -->|uses| C3;
";
    assert_eq!(MermaidFormatter::new().format_graph(&graph), expected);
}

#[test]
fn mermaid_snapshot_with_directory_subgraphs() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "src/app.js",
        "import Button from './components/button';\nimport { helper } from '../lib';\n",
    );
    write(root, "src/components/button.jsx", "");
    write(root, "lib/index.ts", "");

    let graph = analyze(root).unwrap().graph;
    let expected = "\
graph TD;
  F0[\"📄 index.ts\"];
  C1[\"🧩 index\"];
  F2[\"📄 app.js\"];
  C3[\"🧩 app\"];
  F4[\"📄 button.jsx\"];
  C5[\"🧩 button\"];
  F0 -->|defines| C1;
  F2 -->|defines| C3;
  F4 -->|defines| C5;
  F2 -->|imports| F4;
  F2 -->|uses| C5;
  F2 -->|imports| F0;
  F2 -->|uses| C1;
  subgraph \"lib\"
    F0
  end
  subgraph \"src\"
    F2
  end
  subgraph \"src/components\"
    F4
  end
";
    assert_eq!(MermaidFormatter::new().format_graph(&graph), expected);

    let groups: Vec<_> = graph.groups().iter().map(|g| g.path.as_str()).collect();
    assert_eq!(groups, vec!["lib", "src", "src/components"]);
}

#[test]
fn edge_prefixes_follow_endpoint_variants() {
    let document = GraphDocument {
        nodes: vec![
            Node::Component(ComponentNode {
                id: 0,
                name: "left".into(),
                defined_in: "left.js".into(),
            }),
            Node::Component(ComponentNode {
                id: 1,
                name: "right".into(),
                defined_in: "right.js".into(),
            }),
            Node::File(FileNode::new(2, "say \"hi\".js")),
        ],
        edges: vec![
            Edge::new(EdgeKind::Imports, 0, 1),
            Edge::new(EdgeKind::Uses, 2, 0),
        ],
        groups: vec![],
    };
    let graph = ProjectGraph::try_from(document).unwrap();

    let diagram = MermaidFormatter::new().format_graph(&graph);
    assert!(diagram.contains("  C0 -->|imports| C1;\n"));
    assert!(diagram.contains("  F2 -->|uses| C0;\n"));
    assert!(diagram.contains("F2[\"📄 say #quot;hi#quot;.js\"];"));
    assert!(!diagram.contains("subgraph"));
}

#[test]
fn format_to_file_writes_the_diagram() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path(), "project/one.js", "");
    let graph = analyze(&dir.path().join("project")).unwrap().graph;

    let out = dir.path().join("structure.mmd");
    MermaidFormatter::new().format_to_file(&graph, &out).unwrap();
    let s = fs::read_to_string(&out).unwrap();

    assert!(s.starts_with("graph TD;\n"));
    assert!(s.contains("F0[\"📄 one.js\"];"));
}
