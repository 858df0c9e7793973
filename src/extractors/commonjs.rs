use regex::Regex;
use std::sync::LazyLock;

use super::common::parse_named_bindings;
use super::ImportExtractor;
use crate::core::{ImportBinding, PatternKind, RawImport};

// const|let|var {a, b} = require('t') | const|let|var name = require("t")
static REQUIRE_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(?:const|let|var)\s+(?:\{(?P<named>[^}]*)\}|(?P<default>[A-Za-z_$][\w$]*))\s*=\s*require\s*\(\s*['"](?P<target>[^'"]+)['"]\s*\)"#,
    )
    .unwrap()
});

pub struct CommonJsExtractor;

impl CommonJsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CommonJsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportExtractor for CommonJsExtractor {
    fn extract_imports(&self, source: &str) -> Vec<RawImport> {
        REQUIRE_BINDING
            .captures_iter(source)
            .filter_map(|caps| {
                let target = caps.name("target")?.as_str();
                if !RawImport::is_project_target(target) {
                    return None;
                }

                let bindings = match (caps.name("default"), caps.name("named")) {
                    (Some(default), _) => vec![ImportBinding::default_import(default.as_str())],
                    (None, Some(list)) => parse_named_bindings(list.as_str(), ":"),
                    (None, None) => Vec::new(),
                };

                Some(RawImport::new(target, PatternKind::CommonJs).with_bindings(bindings))
            })
            .collect()
    }

    fn pattern_kind(&self) -> PatternKind {
        PatternKind::CommonJs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destructured_renames_keep_the_exported_name() {
        let imports = CommonJsExtractor::new()
            .extract_imports("const { readFile: read, write } = require( './fs-utils' );");
        assert_eq!(imports.len(), 1);
        assert_eq!(
            imports[0].bindings,
            vec![ImportBinding::named("readFile"), ImportBinding::named("write")]
        );
    }

    #[test]
    fn bare_require_without_binding_is_ignored() {
        let imports = CommonJsExtractor::new().extract_imports("require('./side-effect');");
        assert!(imports.is_empty());
    }
}
