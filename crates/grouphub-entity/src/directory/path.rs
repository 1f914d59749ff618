//! Materialized path algebra.
//!
//! Every structural edit to the tree is expressed through these functions
//! so that the path invariant (`path == parent path + "/" + name`, unique
//! per group) is maintained the same way everywhere: by exact prefix
//! substitution, never by recomputation from scratch.

use grouphub_core::{AppError, AppResult};

/// Validate a directory or file name: non-empty and slash-free.
pub fn validate_name(name: &str) -> AppResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if trimmed.contains('/') {
        return Err(AppError::validation("Name cannot contain '/'"));
    }
    Ok(())
}

/// Normalize a parent path: leading slash enforced, trailing slash trimmed.
///
/// The empty string and `"/"` both denote the root.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return "/".to_string();
    }
    let with_lead = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    with_lead.trim_end_matches('/').to_string()
}

/// Join a normalized parent path with a child name.
pub fn join(parent: &str, name: &str) -> String {
    let parent = normalize(parent);
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// The final path segment.
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Compute the path produced by renaming the final segment.
pub fn with_last_segment(path: &str, new_name: &str) -> String {
    match path.rfind('/') {
        Some(idx) => format!("{}/{new_name}", &path[..idx]),
        None => format!("/{new_name}"),
    }
}

/// Whether `candidate` is `prefix` itself or lies under it.
///
/// Boundary-safe: `/docs` contains `/docs/a` but not `/docsA`.
pub fn is_within(prefix: &str, candidate: &str) -> bool {
    candidate == prefix
        || (candidate.len() > prefix.len()
            && candidate.starts_with(prefix)
            && candidate.as_bytes()[prefix.len()] == b'/')
}

/// Rewrite a descendant path when its ancestor moves from `old_prefix` to
/// `new_prefix`.
///
/// The suffix after the ancestor's path is preserved byte-for-byte. Returns
/// `None` when `candidate` does not lie under `old_prefix`.
pub fn rebase(old_prefix: &str, new_prefix: &str, candidate: &str) -> Option<String> {
    if !is_within(old_prefix, candidate) {
        return None;
    }
    Some(format!("{new_prefix}{}", &candidate[old_prefix.len()..]))
}
