//! Virtual path normalization.
//!
//! Archive paths mix `/` and `\` and have inconsistent casing across
//! platforms. Every comparison in this crate runs on the folded form: the
//! normalized path lower-cased with [`str::to_lowercase`], which is ordinal and
//! locale-independent.

/// Canonical separator of normalized virtual paths.
pub const SEPARATOR: char = '\\';

/// Unify separators and strip the leading and trailing separator runs.
///
/// Casing is preserved; use [`fold`] for comparison keys.
pub fn normalize(path: &str) -> String {
    path.replace('/', "\\")
        .trim_start_matches(SEPARATOR)
        .trim_end_matches(SEPARATOR)
        .to_string()
}

/// Normalized, lower-cased comparison key.
pub fn fold(path: &str) -> String {
    normalize(path).to_lowercase()
}

/// Reject paths that cannot be laid out under an output root.
pub(crate) fn validate(normalized: &str) -> std::result::Result<(), &'static str> {
    if normalized.is_empty() {
        return Err("empty path");
    }
    if normalized.contains('\0') {
        return Err("contains null byte");
    }
    for segment in normalized.split(SEPARATOR) {
        match segment {
            "." | ".." => return Err("contains relative segment"),
            _ => {}
        }
    }
    Ok(())
}

/// Suffix match on whole segments: `a\b\x.uasset` ends with `x.uasset`
/// but `a\b\bx.uasset` does not.
pub fn ends_with_segment(key: &str, tail: &str) -> bool {
    match key.strip_suffix(tail) {
        Some("") => true,
        Some(head) => head.ends_with(SEPARATOR),
        None => false,
    }
}

/// Remainder of `key` below `folder`, if `key` sits strictly inside it.
pub fn strip_folder<'a>(key: &'a str, folder: &str) -> Option<&'a str> {
    key.strip_prefix(folder)?
        .strip_prefix(SEPARATOR)
        .filter(|rest| !rest.is_empty())
}

/// Last segment of a normalized path.
pub fn basename(normalized: &str) -> &str {
    normalized
        .rsplit_once(SEPARATOR)
        .map_or(normalized, |(_, name)| name)
}

/// Segments between a folder of `depth` segments and the file name.
pub fn subfolders(normalized: &str, depth: usize) -> Vec<&str> {
    let segments: Vec<&str> = normalized.split(SEPARATOR).collect();
    if segments.len() <= depth + 1 {
        return Vec::new();
    }
    segments[depth..segments.len() - 1].to_vec()
}

pub fn depth(normalized: &str) -> usize {
    if normalized.is_empty() {
        0
    } else {
        normalized.split(SEPARATOR).count()
    }
}
