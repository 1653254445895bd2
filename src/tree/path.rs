//! Segment-aware materialized-path helpers.
//!
//! All prefix logic compares whole segments: `/a/b` covers `/a/b/c` but
//! never `/a/bc`. Naive string-prefix or regex matching is a correctness
//! bug and is deliberately absent.

use crate::error::{Result, TreegateError};

/// True iff `path` is `prefix` itself or a descendant of it, on segment
/// boundaries.
pub fn is_same_or_descendant(path: &str, prefix: &str) -> bool {
    path == prefix || is_strict_descendant(path, prefix)
}

/// True iff `path` lies strictly below `prefix` on segment boundaries.
pub fn is_strict_descendant(path: &str, prefix: &str) -> bool {
    path.len() > prefix.len()
        && path.starts_with(prefix)
        && path.as_bytes()[prefix.len()] == b'/'
}

/// The path one segment up, or None at a single-segment path.
pub fn parent(path: &str) -> Option<&str> {
    match path.rfind('/') {
        Some(0) | None => None,
        Some(idx) => Some(&path[..idx]),
    }
}

/// Number of segments in the path.
pub fn depth(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}

/// Final segment of the path.
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Append one segment to a parent path.
pub fn join(parent: &str, segment: &str) -> String {
    format!("{parent}/{segment}")
}

/// Replace `old_prefix` with `new_prefix` if `path` falls under it on a
/// segment boundary. Returns None when the path is unaffected.
pub fn rewrite_prefix(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if path == old_prefix {
        Some(new_prefix.to_string())
    } else if is_strict_descendant(path, old_prefix) {
        Some(format!("{new_prefix}{}", &path[old_prefix.len()..]))
    } else {
        None
    }
}

/// All proper ancestor paths strictly below `root` and strictly above
/// `path`, shallowest first. `/categories/a/b/c` with root `/categories`
/// yields `/categories/a`, `/categories/a/b`.
pub fn ancestors_below_root<'a>(path: &'a str, root: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut current = path;
    while let Some(p) = parent(current) {
        if p == root || !is_strict_descendant(p, root) {
            break;
        }
        out.push(p);
        current = p;
    }
    out.reverse();
    out
}

/// Validate a stored path: leading slash, no empty segments, URL-safe
/// segment characters only.
pub fn validate(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(TreegateError::InconsistentPrefix {
            path: path.to_string(),
            reason: "missing leading slash".to_string(),
        });
    }
    for segment in path[1..].split('/') {
        if segment.is_empty() {
            return Err(TreegateError::InconsistentPrefix {
                path: path.to_string(),
                reason: "empty segment".to_string(),
            });
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(TreegateError::InconsistentPrefix {
                path: path.to_string(),
                reason: format!("segment \"{segment}\" has non-URL-safe characters"),
            });
        }
    }
    Ok(())
}
