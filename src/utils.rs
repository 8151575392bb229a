//! Utility functions for the Collagen generator

use crate::error::{CollagenError, Result};

/// Normalize a store-relative path.
///
/// Paths are forward-slash separated and relative to the store root. `.`
/// segments and empty segments are dropped, `..` pops the previous segment.
/// The store root itself is the empty string. Absolute paths, backslashes
/// and any `..` that would climb above the root are rejected.
pub fn normalize_path(path: &str) -> Result<String> {
    if path.starts_with('/') {
        return Err(CollagenError::invalid_path(path, "absolute paths are not allowed"));
    }
    if path.contains('\\') {
        return Err(CollagenError::invalid_path(path, "paths must use '/' as separator"));
    }
    if has_drive_prefix(path) {
        return Err(CollagenError::invalid_path(path, "absolute paths are not allowed"));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(CollagenError::invalid_path(
                        path,
                        "path escapes the skeleton root",
                    ));
                }
            }
            other => segments.push(other),
        }
    }

    Ok(segments.join("/"))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Join `relative` onto the directory `base` and normalize the result.
pub fn join_path(base: &str, relative: &str) -> Result<String> {
    if relative.starts_with('/') || has_drive_prefix(relative) {
        return Err(CollagenError::invalid_path(relative, "absolute paths are not allowed"));
    }
    if base.is_empty() {
        normalize_path(relative)
    } else {
        normalize_path(&format!("{}/{}", base, relative)).map_err(|e| match e {
            CollagenError::InvalidPath { reason, .. } => {
                CollagenError::invalid_path(relative, reason)
            }
            other => other,
        })
    }
}

/// Directory part of a normalized path; the root's parent is the root.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "",
    }
}

/// File extension of a path, lowercased.
pub fn extension(path: &str) -> Option<String> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let dot = file_name.rfind('.')?;
    if dot == 0 || dot + 1 == file_name.len() {
        return None;
    }
    Some(file_name[dot + 1..].to_ascii_lowercase())
}

/// Render a JSON number the way it appears in attribute values and
/// interpolated text.
///
/// Integers print as plain decimal digits. Anything else goes through
/// `f64`'s `Display`, which emits the shortest digits that round-trip and
/// never switches to exponent notation, so `1.5` stays `1.5` and `2.0`
/// becomes `2`.
pub fn format_number(number: &serde_json::Number) -> String {
    if let Some(value) = number.as_i64() {
        value.to_string()
    } else if let Some(value) = number.as_u64() {
        value.to_string()
    } else {
        match number.as_f64() {
            Some(value) => format!("{}", value),
            None => number.to_string(),
        }
    }
}

/// Escape a string for use inside a double-quoted XML attribute value.
///
/// `quick_xml::escape::escape` would also turn `'` into `&apos;`; output
/// attribute values keep apostrophes as they are.
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Return the markup between an SVG document's outer `<svg ...>` and
/// `</svg>` tags.
///
/// A leading byte-order mark, XML declaration, processing instructions,
/// comments and a doctype (including an internal subset) are skipped. The
/// inner markup is returned verbatim.
pub fn strip_svg_wrapper<'a>(svg: &'a str, path: &str) -> Result<&'a str> {
    let malformed = |message: &str| CollagenError::MalformedSvg {
        path: path.to_string(),
        message: message.to_string(),
    };

    let mut rest = svg.trim_start_matches('\u{feff}').trim_start();
    loop {
        if rest.starts_with("<?") {
            let end = rest.find("?>").ok_or_else(|| malformed("unterminated XML declaration"))?;
            rest = rest[end + 2..].trim_start();
        } else if rest.starts_with("<!--") {
            let end = rest.find("-->").ok_or_else(|| malformed("unterminated comment"))?;
            rest = rest[end + 3..].trim_start();
        } else if rest.starts_with("<!DOCTYPE") || rest.starts_with("<!doctype") {
            let end = doctype_end(rest).ok_or_else(|| malformed("unterminated doctype"))?;
            rest = rest[end..].trim_start();
        } else {
            break;
        }
    }

    let after_name = rest
        .strip_prefix("<svg")
        .ok_or_else(|| malformed("document does not start with an <svg> element"))?;
    if !after_name.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/') {
        return Err(malformed("document does not start with an <svg> element"));
    }

    let open_end = start_tag_end(after_name).ok_or_else(|| malformed("unterminated <svg> tag"))?;
    if after_name[..open_end].ends_with('/') {
        return Ok("");
    }

    let body = &after_name[open_end + 1..];
    let close = body.rfind("</svg").ok_or_else(|| malformed("missing closing </svg> tag"))?;
    Ok(&body[..close])
}

/// Byte offset of the `>` that ends a start tag, skipping quoted values.
fn start_tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (index, ch) in tag.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == '>' => return Some(index),
            None => {}
        }
    }
    None
}

/// Byte offset just past a doctype declaration, including any `[...]` subset.
fn doctype_end(doctype: &str) -> Option<usize> {
    let mut in_subset = false;
    for (index, ch) in doctype.char_indices() {
        match ch {
            '[' => in_subset = true,
            ']' => in_subset = false,
            '>' if !in_subset => return Some(index + 1),
            _ => {}
        }
    }
    None
}

/// Check if a string is a valid variable name.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
