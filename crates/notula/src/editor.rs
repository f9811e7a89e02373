use ropey::Rope;
use std::cmp;
use unicode_segmentation::UnicodeSegmentation;

/// The open document: a rope buffer plus cursor, selection, clipboard and
/// snapshot-based undo history. The rope is the single source of truth;
/// everything the UI shows is re-derived from it after each mutation.
#[derive(Clone)]
pub struct Editor {
    rope: Rope,
    cursor_line: usize,
    cursor_col: usize, // char offset within the line
    viewport_offset: usize,
    viewport_height: usize,
    modified: bool,
    clipboard: String,
    // Undo/Redo support
    history: Vec<EditorState>,
    history_index: usize,
    // Selection (anchor end; the cursor is the moving end)
    selection_anchor: Option<(usize, usize)>,
    // Tab configuration
    tab_size: usize,
    use_spaces: bool,
}

#[derive(Clone)]
struct EditorState {
    content: String,
    cursor_line: usize,
    cursor_col: usize,
}

impl Editor {
    pub fn new() -> Self {
        let initial_state = EditorState {
            content: String::new(),
            cursor_line: 0,
            cursor_col: 0,
        };

        Self {
            rope: Rope::new(),
            cursor_line: 0,
            cursor_col: 0,
            viewport_offset: 0,
            viewport_height: 24, // Default, will be updated
            modified: false,
            clipboard: String::new(),
            history: vec![initial_state],
            history_index: 0,
            selection_anchor: None,
            tab_size: 4,
            use_spaces: true,
        }
    }

    /// Replace the buffer wholesale and reset history, as on New/Open.
    pub fn set_content(&mut self, content: String) {
        self.rope = Rope::from_str(&content);
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.viewport_offset = 0;
        self.modified = false;
        self.selection_anchor = None;

        let initial_state = EditorState {
            content,
            cursor_line: 0,
            cursor_col: 0,
        };
        self.history = vec![initial_state];
        self.history_index = 0;
    }

    /// Rewrite the whole buffer as a single undoable edit, as Replace does.
    pub fn replace_content(&mut self, content: String) {
        self.rope = Rope::from_str(&content);
        self.selection_anchor = None;
        let max_line = self.rope.len_lines().saturating_sub(1);
        self.cursor_line = self.cursor_line.min(max_line);
        self.cursor_col = self.cursor_col.min(self.line_char_len(self.cursor_line));
        self.modified = true;
        self.adjust_viewport();
        self.save_state();
    }

    pub fn get_content(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        (self.cursor_line, self.cursor_col)
    }

    pub fn set_cursor_position(&mut self, line: usize, col: usize) {
        let max_line = self.rope.len_lines().saturating_sub(1);
        self.cursor_line = line.min(max_line);
        self.cursor_col = col.min(self.line_char_len(self.cursor_line));
        self.adjust_viewport();
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
    }

    pub fn get_viewport_offset(&self) -> usize {
        self.viewport_offset
    }

    pub fn get_viewport_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let end_line = cmp::min(
            self.viewport_offset + self.viewport_height,
            self.rope.len_lines(),
        );

        for i in self.viewport_offset..end_line {
            if let Some(line) = self.rope.get_line(i) {
                lines.push(line.to_string());
            }
        }

        lines
    }

    /// Byte offset of the start of a line in the full content, for
    /// intersecting tag ranges with viewport lines.
    pub fn line_start_byte(&self, line: usize) -> usize {
        self.rope.line_to_byte(line.min(self.rope.len_lines().saturating_sub(1)))
    }

    pub fn set_tab_config(&mut self, tab_size: usize, use_spaces: bool) {
        self.tab_size = tab_size;
        self.use_spaces = use_spaces;
    }

    // --- Editing -----------------------------------------------------------

    pub fn insert_char(&mut self, c: char) {
        self.delete_selection_if_any();
        let char_idx = self.char_idx();
        self.rope.insert_char(char_idx, c);
        self.cursor_col += 1;
        self.modified = true;
        self.save_state();
    }

    pub fn insert_newline(&mut self) {
        self.delete_selection_if_any();
        let char_idx = self.char_idx();
        self.rope.insert_char(char_idx, '\n');
        self.cursor_line += 1;
        self.cursor_col = 0;
        self.modified = true;
        self.adjust_viewport();
        self.save_state();
    }

    pub fn insert_tab(&mut self) {
        if self.use_spaces {
            for _ in 0..self.tab_size {
                self.insert_char(' ');
            }
        } else {
            self.insert_char('\t');
        }
    }

    pub fn delete_char_backward(&mut self) {
        if self.delete_selection_if_any() {
            return;
        }
        if self.cursor_col > 0 {
            let line = self.line_text(self.cursor_line);
            let start = prev_grapheme_boundary(&line, self.cursor_col);
            let line_start = self.rope.line_to_char(self.cursor_line);
            self.rope.remove(line_start + start..line_start + self.cursor_col);
            self.cursor_col = start;
            self.modified = true;
            self.save_state();
        } else if self.cursor_line > 0 {
            // Join with the previous line by removing its trailing newline
            self.cursor_line -= 1;
            self.cursor_col = self.line_char_len(self.cursor_line);
            let newline_idx = self.rope.line_to_char(self.cursor_line + 1) - 1;
            self.rope.remove(newline_idx..newline_idx + 1);
            self.modified = true;
            self.adjust_viewport();
            self.save_state();
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.delete_selection_if_any() {
            return;
        }
        let line_len = self.line_char_len(self.cursor_line);
        let char_idx = self.char_idx();
        if self.cursor_col < line_len {
            let line = self.line_text(self.cursor_line);
            let end = next_grapheme_boundary(&line, self.cursor_col);
            let line_start = self.rope.line_to_char(self.cursor_line);
            self.rope.remove(char_idx..line_start + end);
            self.modified = true;
            self.save_state();
        } else if char_idx < self.rope.len_chars() {
            // At end of line: remove the newline
            self.rope.remove(char_idx..char_idx + 1);
            self.modified = true;
            self.save_state();
        }
    }

    // --- Selection and clipboard -------------------------------------------

    pub fn begin_selection(&mut self) {
        if self.selection_anchor.is_none() {
            self.selection_anchor = Some((self.cursor_line, self.cursor_col));
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection_anchor = None;
    }

    pub fn has_selection(&self) -> bool {
        self.selection_range().is_some()
    }

    /// Ordered, non-empty char range between the anchor and the cursor.
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        let (anchor_line, anchor_col) = self.selection_anchor?;
        let anchor = self.rope.line_to_char(anchor_line) + anchor_col;
        let cursor = self.char_idx();
        if anchor == cursor {
            return None;
        }
        Some((anchor.min(cursor), anchor.max(cursor)))
    }

    pub fn selected_text(&self) -> String {
        match self.selection_range() {
            Some((start, end)) => self.rope.slice(start..end).to_string(),
            None => String::new(),
        }
    }

    /// Cut the selection to the clipboard. No selection is a no-op.
    pub fn cut(&mut self) -> bool {
        match self.selection_range() {
            Some((start, end)) => {
                self.clipboard = self.rope.slice(start..end).to_string();
                self.remove_char_range(start, end);
                self.save_state();
                true
            }
            None => false,
        }
    }

    /// Copy the selection to the clipboard. No selection is a no-op.
    pub fn copy(&mut self) -> bool {
        match self.selection_range() {
            Some((start, end)) => {
                self.clipboard = self.rope.slice(start..end).to_string();
                true
            }
            None => false,
        }
    }

    /// Insert the clipboard at the cursor, replacing any selection.
    pub fn paste(&mut self) -> bool {
        if self.clipboard.is_empty() {
            return false;
        }
        self.delete_selection_if_any();
        let char_idx = self.char_idx();
        let pasted = self.clipboard.clone();
        self.rope.insert(char_idx, &pasted);
        let (line, col) = self.char_idx_to_line_col(char_idx + pasted.chars().count());
        self.cursor_line = line;
        self.cursor_col = col;
        self.modified = true;
        self.adjust_viewport();
        self.save_state();
        true
    }

    // --- Cursor movement ---------------------------------------------------

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.adjust_cursor_col();
            self.adjust_viewport();
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.rope.len_lines() {
            self.cursor_line += 1;
            self.adjust_cursor_col();
            self.adjust_viewport();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            let line = self.line_text(self.cursor_line);
            self.cursor_col = prev_grapheme_boundary(&line, self.cursor_col);
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_char_len(self.cursor_line);
            self.adjust_viewport();
        }
    }

    pub fn move_cursor_right(&mut self) {
        let line_len = self.line_char_len(self.cursor_line);
        if self.cursor_col < line_len {
            let line = self.line_text(self.cursor_line);
            self.cursor_col = next_grapheme_boundary(&line, self.cursor_col);
        } else if self.cursor_line + 1 < self.rope.len_lines() {
            self.cursor_line += 1;
            self.cursor_col = 0;
            self.adjust_viewport();
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor_col = self.line_char_len(self.cursor_line);
    }

    pub fn page_up(&mut self) {
        self.cursor_line = self.cursor_line.saturating_sub(self.viewport_height);
        self.viewport_offset = self.viewport_offset.saturating_sub(self.viewport_height);
        self.adjust_cursor_col();
    }

    pub fn page_down(&mut self) {
        let max_line = self.rope.len_lines().saturating_sub(1);
        self.cursor_line = cmp::min(self.cursor_line + self.viewport_height, max_line);
        self.viewport_offset = cmp::min(
            self.viewport_offset + self.viewport_height,
            max_line.saturating_sub(self.viewport_height.saturating_sub(1)),
        );
        self.adjust_cursor_col();
    }

    // --- Undo/Redo ---------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        if self.history_index > 0 {
            self.history_index -= 1;
            self.restore_state();
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.history_index + 1 < self.history.len() {
            self.history_index += 1;
            self.restore_state();
            true
        } else {
            false
        }
    }

    fn restore_state(&mut self) {
        let state = &self.history[self.history_index];
        self.rope = Rope::from_str(&state.content);
        self.cursor_line = state.cursor_line;
        self.cursor_col = state.cursor_col;
        self.selection_anchor = None;
        self.adjust_viewport();
        self.modified = true;
    }

    fn save_state(&mut self) {
        let current_state = EditorState {
            content: self.rope.to_string(),
            cursor_line: self.cursor_line,
            cursor_col: self.cursor_col,
        };

        // Don't save if the content hasn't changed from current history state
        if let Some(last_state) = self.history.get(self.history_index) {
            if last_state.content == current_state.content {
                return;
            }
        }

        self.history.truncate(self.history_index + 1);
        self.history.push(current_state);
        self.history_index += 1;

        // Limit history size to prevent memory issues
        if self.history.len() > 100 {
            self.history.remove(0);
            self.history_index -= 1;
        }
    }

    // --- Internals ---------------------------------------------------------

    fn char_idx(&self) -> usize {
        self.rope.line_to_char(self.cursor_line) + self.cursor_col
    }

    fn char_idx_to_line_col(&self, char_idx: usize) -> (usize, usize) {
        let line = self.rope.char_to_line(char_idx);
        (line, char_idx - self.rope.line_to_char(line))
    }

    /// Line length in chars, without the trailing newline.
    fn line_char_len(&self, line: usize) -> usize {
        match self.rope.get_line(line) {
            Some(l) => {
                let len = l.len_chars();
                if len > 0 && l.char(len - 1) == '\n' {
                    len - 1
                } else {
                    len
                }
            }
            None => 0,
        }
    }

    fn line_text(&self, line: usize) -> String {
        match self.rope.get_line(line) {
            Some(l) => l.to_string().trim_end_matches('\n').to_string(),
            None => String::new(),
        }
    }

    fn delete_selection_if_any(&mut self) -> bool {
        match self.selection_range() {
            Some((start, end)) => {
                self.remove_char_range(start, end);
                self.save_state();
                true
            }
            None => {
                // An anchor with nothing selected (e.g. a shift-move that
                // could not move) must not survive into the next edit, or
                // it would swallow the text typed after it.
                self.selection_anchor = None;
                false
            }
        }
    }

    fn remove_char_range(&mut self, start: usize, end: usize) {
        self.rope.remove(start..end);
        let (line, col) = self.char_idx_to_line_col(start);
        self.cursor_line = line;
        self.cursor_col = col;
        self.selection_anchor = None;
        self.modified = true;
        self.adjust_viewport();
    }

    fn adjust_cursor_col(&mut self) {
        self.cursor_col = cmp::min(self.cursor_col, self.line_char_len(self.cursor_line));
    }

    fn adjust_viewport(&mut self) {
        if self.cursor_line < self.viewport_offset {
            self.viewport_offset = self.cursor_line;
        } else if self.viewport_height > 0
            && self.cursor_line >= self.viewport_offset + self.viewport_height
        {
            self.viewport_offset = self.cursor_line - (self.viewport_height - 1);
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

/// Char offset of the grapheme boundary immediately before `col`.
fn prev_grapheme_boundary(line: &str, col: usize) -> usize {
    let mut prev = 0;
    let mut chars = 0;
    for g in line.graphemes(true) {
        let next = chars + g.chars().count();
        if next >= col {
            return prev;
        }
        prev = next;
        chars = next;
    }
    prev
}

/// Char offset of the grapheme boundary immediately after `col`.
fn next_grapheme_boundary(line: &str, col: usize) -> usize {
    let mut chars = 0;
    for g in line.graphemes(true) {
        chars += g.chars().count();
        if chars > col {
            return chars;
        }
    }
    chars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_creation() {
        let editor = Editor::new();
        assert_eq!(editor.cursor_position(), (0, 0));
        assert_eq!(editor.line_count(), 1); // Empty editor has one empty line
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_text_insertion() {
        let mut editor = Editor::new();
        editor.insert_char('H');
        editor.insert_char('i');

        assert_eq!(editor.get_content(), "Hi");
        assert_eq!(editor.cursor_position(), (0, 2));
        assert!(editor.is_modified());
    }

    #[test]
    fn test_newline_insertion() {
        let mut editor = Editor::new();
        editor.insert_char('H');
        editor.insert_char('i');
        editor.insert_newline();
        editor.insert_char('!');

        assert_eq!(editor.get_content(), "Hi\n!");
        assert_eq!(editor.cursor_position(), (1, 1));
        assert_eq!(editor.line_count(), 2);
    }

    #[test]
    fn test_backspace() {
        let mut editor = Editor::new();
        editor.insert_char('H');
        editor.insert_char('i');
        editor.delete_char_backward();

        assert_eq!(editor.get_content(), "H");
        assert_eq!(editor.cursor_position(), (0, 1));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut editor = Editor::new();
        editor.set_content("ab\ncd".to_string());
        editor.set_cursor_position(1, 0);
        editor.delete_char_backward();

        assert_eq!(editor.get_content(), "abcd");
        assert_eq!(editor.cursor_position(), (0, 2));
    }

    #[test]
    fn test_delete_forward() {
        let mut editor = Editor::new();
        editor.set_content("abc".to_string());
        editor.delete_char_forward();
        assert_eq!(editor.get_content(), "bc");

        // At end of buffer, nothing happens
        editor.set_cursor_position(0, 2);
        editor.delete_char_forward();
        editor.delete_char_forward();
        assert_eq!(editor.get_content(), "b");
    }

    #[test]
    fn test_cursor_movement() {
        let mut editor = Editor::new();
        editor.set_content("Hello\nWorld".to_string());

        editor.move_cursor_right();
        assert_eq!(editor.cursor_position(), (0, 1));

        editor.move_cursor_down();
        assert_eq!(editor.cursor_position(), (1, 1));

        editor.move_cursor_left();
        assert_eq!(editor.cursor_position(), (1, 0));

        editor.move_cursor_up();
        assert_eq!(editor.cursor_position(), (0, 0));
    }

    #[test]
    fn test_cursor_wraps_across_lines() {
        let mut editor = Editor::new();
        editor.set_content("ab\ncd".to_string());

        editor.move_to_line_end();
        editor.move_cursor_right();
        assert_eq!(editor.cursor_position(), (1, 0));

        editor.move_cursor_left();
        assert_eq!(editor.cursor_position(), (0, 2));
    }

    #[test]
    fn test_modified_state() {
        let mut editor = Editor::new();
        assert!(!editor.is_modified());

        editor.insert_char('a');
        assert!(editor.is_modified());

        editor.mark_saved();
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_content_setting() {
        let mut editor = Editor::new();
        let test_content = "This is a test\nWith multiple lines\nAnd more content";

        editor.set_content(test_content.to_string());
        assert_eq!(editor.get_content(), test_content);
        assert_eq!(editor.line_count(), 3);
        assert!(!editor.is_modified()); // set_content should not mark as modified
    }

    #[test]
    fn test_replace_content_is_undoable() {
        let mut editor = Editor::new();
        editor.set_content("cat and cat".to_string());

        editor.replace_content("dog and dog".to_string());
        assert_eq!(editor.get_content(), "dog and dog");
        assert!(editor.is_modified());

        assert!(editor.undo());
        assert_eq!(editor.get_content(), "cat and cat");
    }

    #[test]
    fn test_undo_redo() {
        let mut editor = Editor::new();

        // Empty history: silent no-op
        assert!(!editor.undo());
        assert!(!editor.redo());
        assert_eq!(editor.get_content(), "");

        editor.insert_char('H');
        editor.insert_char('i');
        assert_eq!(editor.get_content(), "Hi");

        assert!(editor.undo());
        assert_eq!(editor.get_content(), "H");

        assert!(editor.redo());
        assert_eq!(editor.get_content(), "Hi");

        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.get_content(), "");
        assert!(!editor.undo()); // Should fail - no more history
    }

    #[test]
    fn test_set_content_resets_history() {
        let mut editor = Editor::new();
        editor.insert_char('H');
        editor.insert_char('i');
        assert!(editor.undo());

        editor.set_content("New content".to_string());
        assert!(!editor.undo());

        editor.insert_char('!');
        assert!(editor.undo());
        assert_eq!(editor.get_content(), "New content");
    }

    #[test]
    fn test_selection_and_copy() {
        let mut editor = Editor::new();
        editor.set_content("Hello World".to_string());

        editor.begin_selection();
        for _ in 0..5 {
            editor.move_cursor_right();
        }
        assert_eq!(editor.selected_text(), "Hello");

        assert!(editor.copy());
        assert_eq!(editor.get_content(), "Hello World"); // Copy leaves text

        editor.clear_selection();
        assert!(!editor.has_selection());
    }

    #[test]
    fn test_cut_and_paste() {
        let mut editor = Editor::new();
        editor.set_content("Hello World".to_string());

        editor.begin_selection();
        for _ in 0..6 {
            editor.move_cursor_right();
        }
        assert!(editor.cut());
        assert_eq!(editor.get_content(), "World");
        assert_eq!(editor.cursor_position(), (0, 0));

        editor.set_cursor_position(0, 5);
        assert!(editor.paste());
        assert_eq!(editor.get_content(), "WorldHello ");
    }

    #[test]
    fn test_cut_without_selection_is_noop() {
        let mut editor = Editor::new();
        editor.set_content("Hello".to_string());
        assert!(!editor.cut());
        assert!(!editor.copy());
        assert_eq!(editor.get_content(), "Hello");
    }

    #[test]
    fn test_paste_replaces_selection() {
        let mut editor = Editor::new();
        editor.set_content("abc def".to_string());

        editor.begin_selection();
        for _ in 0..3 {
            editor.move_cursor_right();
        }
        assert!(editor.copy());

        // Select " def" and paste over it
        editor.clear_selection();
        editor.begin_selection();
        editor.move_to_line_end();
        assert!(editor.paste());
        assert_eq!(editor.get_content(), "abcabc");
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut editor = Editor::new();
        editor.set_content("Hello".to_string());

        editor.begin_selection();
        editor.move_to_line_end();
        editor.insert_char('X');
        assert_eq!(editor.get_content(), "X");
    }

    #[test]
    fn test_empty_selection_does_not_swallow_typing() {
        // A shift-move at the buffer edge anchors without selecting anything;
        // subsequent keystrokes must all land in the buffer.
        let mut editor = Editor::new();
        editor.begin_selection();
        editor.move_cursor_left(); // at (0, 0), cannot move

        editor.insert_char('a');
        editor.insert_char('b');
        assert_eq!(editor.get_content(), "ab");
        assert!(!editor.has_selection());
    }

    #[test]
    fn test_multiline_selection() {
        let mut editor = Editor::new();
        editor.set_content("Line 1\nLine 2\nLine 3".to_string());

        editor.begin_selection();
        editor.move_cursor_down();
        editor.move_to_line_end();
        let selected = editor.selected_text();
        assert!(selected.contains("Line 1"));
        assert!(selected.contains("Line 2"));
    }

    #[test]
    fn test_history_limit() {
        let mut editor = Editor::new();

        for i in 0..110 {
            editor.insert_char((b'a' + (i % 26) as u8) as char);
        }

        assert!(editor.undo());
        assert!(editor.history.len() <= 100);
    }

    #[test]
    fn test_tab_insertion() {
        let mut editor = Editor::new();
        editor.set_tab_config(4, true);
        editor.insert_tab();
        assert_eq!(editor.get_content(), "    ");

        let mut editor = Editor::new();
        editor.set_tab_config(4, false);
        editor.insert_tab();
        assert_eq!(editor.get_content(), "\t");
    }

    #[test]
    fn test_combining_character_backspace() {
        let mut editor = Editor::new();
        // "e" followed by a combining acute accent is one grapheme, two chars
        editor.set_content("ae\u{0301}b".to_string());
        editor.set_cursor_position(0, 3);
        editor.delete_char_backward();
        assert_eq!(editor.get_content(), "ab");
        assert_eq!(editor.cursor_position(), (0, 1));
    }

    #[test]
    fn test_fullwidth_text_editing() {
        let mut editor = Editor::new();
        editor.set_content("こんにちは".to_string());

        assert_eq!(editor.line_count(), 1);
        editor.move_cursor_right();
        editor.insert_char('!');
        assert_eq!(editor.get_content(), "こ!んにちは");
    }

    #[test]
    fn test_line_start_byte() {
        let mut editor = Editor::new();
        editor.set_content("ab\ncd".to_string());
        assert_eq!(editor.line_start_byte(0), 0);
        assert_eq!(editor.line_start_byte(1), 3);
    }
}
