pub mod gutter;
pub mod highlight;
pub mod scan;

pub use gutter::{gutter_text, logical_line_count};
pub use highlight::{keyword_tags, KEYWORDS};
pub use scan::{find_all, replace_all, Replacement};

/// Category of a tagged range. Every pass rebuilds its tags from scratch;
/// nothing here survives a buffer mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// A search match ("highlight all" style).
    Found,
    /// A whole-word keyword match; carries the keyword itself.
    Keyword(&'static str),
}

/// A stylable half-open byte range over the buffer content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRange {
    pub start: usize,
    pub end: usize,
    pub tag: Tag,
}

impl TagRange {
    pub fn new(start: usize, end: usize, tag: Tag) -> Self {
        Self { start, end, tag }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
