/// Number of logical lines in the buffer: one more than the newline count,
/// so an empty buffer still has line 1 and a trailing newline opens a new
/// numbered line. This is what the gutter must show immediately after any
/// mutation or load.
pub fn logical_line_count(content: &str) -> usize {
    content.split('\n').count()
}

/// Regenerate the gutter listing wholesale: `1..=n`, newline-joined.
pub fn gutter_text(content: &str) -> String {
    let count = logical_line_count(content);
    let mut out = String::new();
    for i in 1..=count {
        if i > 1 {
            out.push('\n');
        }
        out.push_str(&i.to_string());
    }
    out
}
