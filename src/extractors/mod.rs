//! Lexical import extraction.
//!
//! Each extractor is one regex-driven pattern over the whole file text. The
//! chain runs them in order and concatenates their findings, so swapping in a
//! syntax-aware extractor later does not touch resolution or rendering.

pub mod commonjs;
pub mod common;
pub mod esm;

use std::path::Path;

use crate::core::{PatternKind, RawImport};

pub trait ImportExtractor {
    /// All project-relative imports in `source`, in textual order.
    fn extract_imports(&self, source: &str) -> Vec<RawImport>;
    fn pattern_kind(&self) -> PatternKind;
}

/// Ordered list of extractors applied to every analyzable file.
pub struct ExtractorChain {
    extractors: Vec<Box<dyn ImportExtractor + Send + Sync>>,
}

impl ExtractorChain {
    /// ES module imports first, then CommonJS `require` bindings.
    pub fn new() -> Self {
        Self::empty()
            .with_extractor(Box::new(esm::EsModuleExtractor::new()))
            .with_extractor(Box::new(commonjs::CommonJsExtractor::new()))
    }

    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn ImportExtractor + Send + Sync>) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn pattern_kinds(&self) -> Vec<PatternKind> {
        self.extractors
            .iter()
            .map(|extractor| extractor.pattern_kind())
            .collect()
    }

    pub fn extract_source(&self, source: &str) -> Vec<RawImport> {
        self.extractors
            .iter()
            .flat_map(|extractor| extractor.extract_imports(source))
            .collect()
    }

    pub fn extract_file(&self, file_path: &Path) -> std::io::Result<Vec<RawImport>> {
        let source = common::read_source(file_path)?;
        Ok(self.extract_source(&source))
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::new()
    }
}
