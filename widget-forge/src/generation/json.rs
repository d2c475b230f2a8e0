//! JSON utilities for extracting structured data out of model output.
//!
//! Model responses wrap their payload in prose, markdown fences, or both.
//! Extraction is best-effort (first balanced object span, first fenced
//! block); the strict guarantees come from schema validation at parse time.

use serde::de::DeserializeOwned;

use crate::generation::error::GenerationError;

/// Locate the first balanced `{...}` span in `text`.
///
/// The scan is string- and escape-aware, so braces inside JSON string
/// values do not unbalance the span. Returns `None` when no opening brace
/// exists or the object never closes.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Strip an enclosing fenced code block from `text`, first occurrence only.
///
/// Handles ```lang fences and bare ``` fences. A fence without a closing
/// marker yields everything after the opening line. Text without any fence
/// is returned trimmed.
pub fn strip_code_fence(text: &str) -> String {
    let Some(fence_start) = text.find("```") else {
        return text.trim().to_string();
    };

    // Skip the language tag, if any, through the end of the opening line
    let after_fence = &text[fence_start + 3..];
    let body_start = after_fence
        .find('\n')
        .map(|pos| pos + 1)
        .unwrap_or(after_fence.len());
    let body = &after_fence[body_start..];

    match body.find("```") {
        Some(end) => body[..end].trim().to_string(),
        None => body.trim().to_string(),
    }
}

/// Parse a JSON string into a typed structure, mapping failure to
/// [`GenerationError::MalformedModelOutput`]
pub fn parse_json<T: DeserializeOwned>(
    json: &str,
    expected: &'static str,
) -> Result<T, GenerationError> {
    serde_json::from_str(json).map_err(|e| GenerationError::MalformedModelOutput {
        expected,
        detail: e.to_string(),
    })
}

/// Extract the first balanced JSON object from model output and parse it
pub fn extract_and_parse<T: DeserializeOwned>(
    text: &str,
    expected: &'static str,
) -> Result<T, GenerationError> {
    let span = extract_json_object(text).ok_or(GenerationError::MalformedModelOutput {
        expected,
        detail: "no JSON object found in model output".to_string(),
    })?;
    parse_json(span, expected)
}
