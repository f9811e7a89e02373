use regex::Regex;

use crate::{Tag, TagRange};

/// Result of a whole-buffer literal replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub content: String,
    pub count: usize,
}

/// Scan the whole buffer for `query`, case-insensitively, and return every
/// non-overlapping match as a `Found` tag range (byte offsets). An empty
/// query matches nothing. The query is matched literally, not as a pattern.
pub fn find_all(content: &str, query: &str) -> Vec<TagRange> {
    if query.is_empty() {
        return Vec::new();
    }

    let pattern = format!("(?i){}", regex::escape(query));
    let re = Regex::new(&pattern).expect("escaped literal pattern must compile");

    re.find_iter(content)
        .map(|m| TagRange::new(m.start(), m.end(), Tag::Found))
        .collect()
}

/// Replace every literal occurrence of `query` with `replacement` and return
/// the rewritten content. Returns `None` when the query is empty: replacing
/// the empty string everywhere is never what the user meant, so a cancelled
/// or blank prompt is a no-op.
pub fn replace_all(content: &str, query: &str, replacement: &str) -> Option<Replacement> {
    if query.is_empty() {
        return None;
    }

    let count = content.matches(query).count();
    Some(Replacement {
        content: content.replace(query, replacement),
        count,
    })
}
