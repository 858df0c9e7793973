use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::core::ImportBinding;

/// Read a source file, replacing invalid UTF-8 instead of failing.
pub fn read_source(file_path: &Path) -> std::io::Result<String> {
    let file = File::open(file_path)?;
    let file_size = file.metadata()?.len() as usize;

    let mut reader = BufReader::with_capacity(file_size.clamp(1, 8192), file);
    let mut bytes = Vec::with_capacity(file_size);
    reader.read_to_end(&mut bytes)?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// Component identity of a file: its base name without the last extension.
pub fn component_name(relative_path: &str) -> String {
    let base = relative_path.rsplit('/').next().unwrap_or(relative_path);
    Path::new(base)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| base.to_string())
}

/// Split the inside of `{ ... }` into named bindings. `separator` marks an
/// alias (`as` for ES modules, `:` for destructuring); the imported name on
/// its left is kept.
pub fn parse_named_bindings(list: &str, separator: &str) -> Vec<ImportBinding> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let imported = entry
                .split_once(separator)
                .map(|(left, _)| left.trim())
                .unwrap_or(entry);
            ImportBinding::named(imported)
        })
        .collect()
}
