use lazy_static::lazy_static;
use regex::Regex;

use crate::{Tag, TagRange};

/// The fixed keyword set tagged on every pass.
pub const KEYWORDS: [&str; 10] = [
    "def", "class", "if", "else", "elif", "while", "for", "import", "from", "return",
];

lazy_static! {
    static ref KEYWORD_PATTERNS: Vec<(&'static str, Regex)> = KEYWORDS
        .iter()
        .map(|kw| {
            let re = Regex::new(&format!(r"\b{}\b", kw)).expect("Invalid keyword pattern");
            (*kw, re)
        })
        .collect();
}

/// Tag every whole-word keyword occurrence in the buffer.
///
/// One full scan per keyword, O(keywords x buffer length), rebuilt from
/// scratch on every call. Fine for the small documents this editor targets;
/// an incremental pass is future work, not a behavior change.
pub fn keyword_tags(content: &str) -> Vec<TagRange> {
    let mut tags = Vec::new();
    for (kw, re) in KEYWORD_PATTERNS.iter() {
        for m in re.find_iter(content) {
            tags.push(TagRange::new(m.start(), m.end(), Tag::Keyword(kw)));
        }
    }
    tags.sort_by_key(|t| t.start);
    tags
}
