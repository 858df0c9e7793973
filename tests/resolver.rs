use depmap::config::DEFAULT_EXTENSIONS;
use depmap::core::resolver::ImportResolver;
use depmap::core::{EdgeKind, GraphBuilder, PatternKind, RawImport};
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn resolver(root: &Path) -> ImportResolver {
    ImportResolver::new(root, DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
}

#[test]
fn extension_stage_precedes_index_stage() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "foo.js", "");
    write(root, "foo/index.js", "");
    write(root, "main.js", "");

    let resolved = resolver(root).resolve_target("main.js", "./foo");
    assert_eq!(resolved.as_deref(), Some("foo.js"));
}

#[test]
fn extension_priority_is_fixed() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/widget.tsx", "");
    write(root, "src/widget.jsx", "");
    write(root, "src/widget.ts", "");

    let resolved = resolver(root).resolve_target("src/app.js", "./widget");
    assert_eq!(resolved.as_deref(), Some("src/widget.jsx"));
}

#[test]
fn index_files_resolve_directories() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "lib/index.ts", "");
    write(root, "src/app.js", "");
    write(root, "index.js", "");

    let r = resolver(root);
    assert_eq!(r.resolve_target("src/app.js", "../lib").as_deref(), Some("lib/index.ts"));
    assert_eq!(r.resolve_target("src/app.js", "..").as_deref(), Some("index.js"));
}

#[test]
fn exact_paths_and_root_absolute_targets() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "lib/util.js", "");
    write(root, "src/deep/nested/x.js", "");

    let r = resolver(root);
    assert_eq!(
        r.resolve_target("src/deep/nested/x.js", "/lib/util").as_deref(),
        Some("lib/util.js")
    );
    assert_eq!(
        r.resolve_target("src/deep/nested/x.js", "../../../lib/util.js").as_deref(),
        Some("lib/util.js")
    );
}

#[test]
fn unresolvable_targets_return_none() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a.js", "");

    let r = resolver(root);
    assert_eq!(r.resolve_target("a.js", "./missing"), None);
    assert_eq!(r.resolve_target("a.js", "react"), None);
    assert_eq!(r.resolve_target("a.js", "../../etc/passwd"), None);
}

#[test]
fn resolve_all_emits_imports_then_uses() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a.js", "");
    write(root, "b.js", "");

    let mut builder = GraphBuilder::new();
    let (a, _) = builder.add_file("a.js");
    builder.register_component(a, "a");
    let (b, _) = builder.add_file("b.js");
    builder.register_component(b, "b");
    builder.add_imports(
        a,
        vec![
            RawImport::new("./b", PatternKind::Esm),
            RawImport::new("./nowhere", PatternKind::CommonJs),
        ],
    );

    let stats = resolver(root).resolve_all(&mut builder);
    assert_eq!(stats.attempted, 2);
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.dropped, 1);

    let graph = builder.build();
    let edges: Vec<_> = graph.edges().map(|e| (e.source, e.target, e.kind)).collect();
    assert_eq!(
        edges,
        vec![
            (0, 1, EdgeKind::Defines),
            (2, 3, EdgeKind::Defines),
            (0, 2, EdgeKind::Imports),
            (0, 3, EdgeKind::Uses),
        ]
    );
}

#[test]
fn files_outside_the_graph_are_not_linked() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a.js", "");
    write(root, "node_modules/dep/index.js", "");

    let mut builder = GraphBuilder::new();
    let (a, _) = builder.add_file("a.js");
    builder.add_imports(a, vec![RawImport::new("./node_modules/dep", PatternKind::Esm)]);

    let stats = resolver(root).resolve_all(&mut builder);
    assert_eq!(stats.resolved, 0);
    assert_eq!(builder.edge_count(), 0);
}
