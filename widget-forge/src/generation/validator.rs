//! Rule-based static gate applied to each synthesized file before it is
//! accepted into the artifact store.
//!
//! Rules are pure, synchronous and evaluated in a fixed order; the first
//! failing rule wins. Files without a source-code extension are accepted
//! unconditionally.

use crate::generation::types::ValidationResult;

const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];
const COMPONENT_EXTENSIONS: &[&str] = &[".tsx", ".jsx"];

fn has_source_extension(path: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn is_component_file(path: &str) -> bool {
    COMPONENT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// True when `dir` appears as a whole directory segment of `path`. The
/// final segment (the filename) is never considered, and partial segment
/// matches (`prototypes` vs `types`) do not count.
pub(crate) fn has_dir_segment(path: &str, dir: &str) -> bool {
    let mut segments: Vec<&str> = path.split('/').collect();
    segments.pop();
    segments.iter().any(|segment| *segment == dir)
}

fn has_export_marker(content: &str) -> bool {
    content.contains("export")
}

fn has_react_import(content: &str) -> bool {
    content.contains("import React")
        || content.contains("from 'react'")
        || content.contains("from \"react\"")
}

/// Markup tokens that identify JSX in a file that must stay plain
/// TypeScript. Generic type parameters (`Promise<Quote>`) are not flagged;
/// closing and self-closing tags are.
fn contains_markup(content: &str) -> bool {
    content.contains("</") || content.contains("/>") || content.contains("<div")
}

/// Validate one synthesized file. First failing rule wins.
pub fn validate(path: &str, content: &str) -> ValidationResult {
    if content.trim().is_empty() {
        return ValidationResult::invalid("Empty file content");
    }

    if !has_source_extension(path) {
        return ValidationResult::valid();
    }

    if !has_dir_segment(path, "types") && !has_export_marker(content) {
        return ValidationResult::invalid("TypeScript file missing exports");
    }

    if has_dir_segment(path, "widgets") && is_component_file(path) {
        if !content.contains("WidgetProps") && !content.contains("interface") {
            return ValidationResult::invalid("Widget component missing proper props interface");
        }
        if !has_react_import(content) {
            return ValidationResult::invalid("Widget component missing React import");
        }
    }

    if has_dir_segment(path, "services") && (!has_export_marker(content) || contains_markup(content)) {
        return ValidationResult::invalid("Service file appears to contain JSX or missing exports");
    }

    ValidationResult::valid()
}
