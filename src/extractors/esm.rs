use regex::Regex;
use std::sync::LazyLock;

use super::common::parse_named_bindings;
use super::ImportExtractor;
use crate::core::{ImportBinding, PatternKind, RawImport};

// import Default from 't' | import {a, b} from 't' | import Default, {a} from 't'
static ESM_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\bimport\s+(?:type\s+)?(?:(?P<default>[A-Za-z_$][\w$]*)(?:\s*,\s*\{(?P<trailing>[^}]*)\})?|\{(?P<named>[^}]*)\})\s*from\s*['"](?P<target>[^'"]+)['"]"#,
    )
    .unwrap()
});

pub struct EsModuleExtractor;

impl EsModuleExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EsModuleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportExtractor for EsModuleExtractor {
    fn extract_imports(&self, source: &str) -> Vec<RawImport> {
        ESM_IMPORT
            .captures_iter(source)
            .filter_map(|caps| {
                let target = caps.name("target")?.as_str();
                if !RawImport::is_project_target(target) {
                    return None;
                }

                let mut bindings = Vec::new();
                if let Some(default) = caps.name("default") {
                    bindings.push(ImportBinding::default_import(default.as_str()));
                }
                if let Some(list) = caps.name("named").or_else(|| caps.name("trailing")) {
                    bindings.extend(
                        parse_named_bindings(list.as_str(), " as ")
                            .into_iter()
                            .map(strip_type_modifier),
                    );
                }

                Some(RawImport::new(target, PatternKind::Esm).with_bindings(bindings))
            })
            .collect()
    }

    fn pattern_kind(&self) -> PatternKind {
        PatternKind::Esm
    }
}

// `import { type Props } from './x'`
fn strip_type_modifier(mut binding: ImportBinding) -> ImportBinding {
    if let Some(rest) = binding.name.strip_prefix("type ") {
        binding.name = rest.trim().to_string();
    }
    binding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BindingKind;

    #[test]
    fn default_and_named_in_one_statement() {
        let imports = EsModuleExtractor::new()
            .extract_imports("import React, { useState, useEffect } from './react-shim';");
        assert_eq!(imports.len(), 1);
        let kinds: Vec<_> = imports[0].bindings.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BindingKind::Default, BindingKind::Named, BindingKind::Named]
        );
        assert_eq!(imports[0].bindings[2].name, "useEffect");
    }

    #[test]
    fn type_only_imports_are_matched() {
        let imports = EsModuleExtractor::new()
            .extract_imports("import type { Props, type State } from './types';");
        assert_eq!(imports.len(), 1);
        let names: Vec<_> = imports[0].bindings.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Props", "State"]);
    }

    #[test]
    fn default_named_type_is_not_a_modifier() {
        let imports = EsModuleExtractor::new().extract_imports("import type from './kind';");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].bindings, vec![ImportBinding::default_import("type")]);
    }
}
