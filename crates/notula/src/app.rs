use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

use editcore::{gutter, highlight, scan, TagRange};

use crate::config::{Config, FontConfig, Theme, LIGHT_BACKGROUND};
use crate::editor::Editor;
use crate::file_manager::FileManager;
use crate::menu::{MenuAction, MenuBar};
use crate::ui_state::{PromptKind, UIState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Edit,
    Menu,
    Prompt,
    ConfirmExit,
}

/// Presentation state recomputed from the buffer after every change: the
/// line-number gutter, the highlight tag ranges, and the cursor readout.
pub struct Derived {
    pub gutter: String,
    pub tags: Vec<TagRange>,
    pub cursor_status: String,
}

pub struct App {
    pub editor: Editor,
    pub config: Config,
    pub ui_state: UIState,
    pub file_manager: FileManager,
    pub menu_bar: MenuBar,
    pub derived: Derived,
    /// Last search query; its matches stay highlighted until the next
    /// search or New.
    pub active_query: String,
}

impl App {
    pub async fn new() -> Result<Self> {
        let config = Config::load().await?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        let mut editor = Editor::new();
        editor.set_tab_config(config.editor.tab_size, config.editor.use_spaces);

        let mut app = Self {
            editor,
            config,
            ui_state: UIState::new(),
            file_manager: FileManager::new(),
            menu_bar: MenuBar::new(),
            derived: Derived {
                gutter: String::new(),
                tags: Vec::new(),
                cursor_status: String::new(),
            },
            active_query: String::new(),
        };
        app.refresh_derived();
        app
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit()
    }

    /// Open a file given on the command line, before the first draw.
    pub async fn open_path(&mut self, path: PathBuf) {
        match self.file_manager.open_file(path.clone()).await {
            Ok(content) => {
                self.editor.set_content(content);
                if self.file_manager.is_readonly() {
                    self.ui_state
                        .set_warning_message(format!("Opened {} (read-only)", path.display()));
                } else {
                    self.ui_state
                        .set_success_message(format!("Opened {}", path.display()));
                }
            }
            Err(e) => self.ui_state.set_error_message(e.to_string()),
        }
        self.refresh_derived();
    }

    /// Recompute everything shown alongside the buffer. Tag offsets are byte
    /// positions into the current content, so this must run after every
    /// buffer change.
    pub fn refresh_derived(&mut self) {
        let content = self.editor.get_content();
        let keywords = highlight::keyword_tags(&content);
        let found = scan::find_all(&content, &self.active_query);

        self.derived.gutter = gutter::gutter_text(&content);
        self.derived.tags = resolve_tags(keywords, found);

        let (line, col) = self.editor.cursor_position();
        self.derived.cursor_status = format!("Line {}, Column {}", line + 1, col + 1);
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match self.ui_state.mode {
            Mode::Edit => self.handle_edit_key(key).await?,
            Mode::Menu => self.handle_menu_key(key).await?,
            Mode::Prompt => self.handle_prompt_key(key).await?,
            Mode::ConfirmExit => self.handle_confirm_key(key),
        }
        Ok(())
    }

    async fn handle_edit_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => self.execute_action(MenuAction::New).await?,
                KeyCode::Char('o') => self.execute_action(MenuAction::Open).await?,
                KeyCode::Char('s') => self.execute_action(MenuAction::Save).await?,
                KeyCode::Char('q') => self.execute_action(MenuAction::Exit).await?,
                KeyCode::Char('f') => self.execute_action(MenuAction::Find).await?,
                KeyCode::Char('h') => self.execute_action(MenuAction::Replace).await?,
                KeyCode::Char('z') => self.execute_action(MenuAction::Undo).await?,
                KeyCode::Char('y') => self.execute_action(MenuAction::Redo).await?,
                KeyCode::Char('x') => self.execute_action(MenuAction::Cut).await?,
                KeyCode::Char('c') => self.execute_action(MenuAction::Copy).await?,
                KeyCode::Char('v') => self.execute_action(MenuAction::Paste).await?,
                _ => {}
            }
            return Ok(());
        }

        // Alt+M opens the menu bar, same as F10
        if key.modifiers.contains(KeyModifiers::ALT) {
            if key.code == KeyCode::Char('m') {
                self.menu_bar.open();
                self.ui_state.enter_menu_mode();
            }
            return Ok(());
        }

        match key.code {
            KeyCode::F(10) => {
                self.menu_bar.open();
                self.ui_state.enter_menu_mode();
            }
            KeyCode::Esc => {
                self.editor.clear_selection();
                self.ui_state.clear_status_message();
            }
            KeyCode::Char(c) => self.editor.insert_char(c),
            KeyCode::Enter => self.editor.insert_newline(),
            KeyCode::Tab => self.editor.insert_tab(),
            KeyCode::Backspace => self.editor.delete_char_backward(),
            KeyCode::Delete => self.editor.delete_char_forward(),
            KeyCode::Left => {
                self.prepare_cursor_move(key.modifiers);
                self.editor.move_cursor_left();
            }
            KeyCode::Right => {
                self.prepare_cursor_move(key.modifiers);
                self.editor.move_cursor_right();
            }
            KeyCode::Up => {
                self.prepare_cursor_move(key.modifiers);
                self.editor.move_cursor_up();
            }
            KeyCode::Down => {
                self.prepare_cursor_move(key.modifiers);
                self.editor.move_cursor_down();
            }
            KeyCode::Home => {
                self.prepare_cursor_move(key.modifiers);
                self.editor.move_to_line_start();
            }
            KeyCode::End => {
                self.prepare_cursor_move(key.modifiers);
                self.editor.move_to_line_end();
            }
            KeyCode::PageUp => {
                self.prepare_cursor_move(key.modifiers);
                self.editor.page_up();
            }
            KeyCode::PageDown => {
                self.prepare_cursor_move(key.modifiers);
                self.editor.page_down();
            }
            _ => {}
        }

        self.refresh_derived();
        Ok(())
    }

    /// Shift extends a selection from the current cursor; a plain move
    /// drops any selection.
    fn prepare_cursor_move(&mut self, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::SHIFT) {
            if !self.editor.has_selection() {
                self.editor.begin_selection();
            }
        } else {
            self.editor.clear_selection();
        }
    }

    async fn handle_menu_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::F(10) => self.ui_state.enter_edit_mode(),
            KeyCode::Left => self.menu_bar.prev_menu(),
            KeyCode::Right => self.menu_bar.next_menu(),
            KeyCode::Up => self.menu_bar.prev_item(),
            KeyCode::Down => self.menu_bar.next_item(),
            KeyCode::Enter => {
                if let Some(action) = self.menu_bar.current_action() {
                    self.ui_state.enter_edit_mode();
                    self.execute_action(action).await?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                // Cancelling a search drops the previous highlights
                if self.ui_state.prompt_kind() == Some(&PromptKind::Find) {
                    self.active_query.clear();
                    self.refresh_derived();
                }
                self.ui_state.enter_edit_mode();
            }
            KeyCode::Enter => {
                if let Some((kind, input)) = self.ui_state.take_prompt() {
                    self.ui_state.enter_edit_mode();
                    self.submit_prompt(kind, input).await?;
                }
            }
            KeyCode::Backspace => self.ui_state.pop_from_prompt(),
            KeyCode::Char(c) => self.ui_state.push_to_prompt(c),
            _ => {}
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.ui_state.quit(),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.ui_state.clear_status_message();
                self.ui_state.enter_edit_mode();
            }
            _ => {}
        }
    }

    pub async fn execute_action(&mut self, action: MenuAction) -> Result<()> {
        match action {
            MenuAction::New => {
                self.editor.set_content(String::new());
                self.file_manager.reset();
                self.active_query.clear();
                self.ui_state.set_info_message("New file".to_string());
            }
            MenuAction::Open => {
                let prefill = self
                    .file_manager
                    .current_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.ui_state.enter_prompt(PromptKind::OpenPath, prefill);
            }
            MenuAction::Save => {
                let prefill = self
                    .file_manager
                    .current_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.ui_state.enter_prompt(PromptKind::SavePath, prefill);
            }
            // Always asks, whether or not the buffer is modified
            MenuAction::Exit => self.ui_state.enter_confirm_exit(),
            MenuAction::Cut => {
                if self.editor.cut() {
                    self.ui_state.set_info_message("Cut selection".to_string());
                } else {
                    self.ui_state
                        .set_warning_message("Nothing selected".to_string());
                }
            }
            MenuAction::Copy => {
                if self.editor.copy() {
                    self.ui_state
                        .set_info_message("Copied selection".to_string());
                } else {
                    self.ui_state
                        .set_warning_message("Nothing selected".to_string());
                }
            }
            MenuAction::Paste => {
                if !self.editor.paste() {
                    self.ui_state
                        .set_warning_message("Clipboard is empty".to_string());
                }
            }
            MenuAction::Find => {
                let prefill = self.active_query.clone();
                self.ui_state.enter_prompt(PromptKind::Find, prefill);
            }
            MenuAction::Replace => {
                self.ui_state
                    .enter_prompt(PromptKind::ReplaceQuery, String::new());
            }
            // Undo and redo are silent when there is nothing to do
            MenuAction::Undo => {
                self.editor.undo();
            }
            MenuAction::Redo => {
                self.editor.redo();
            }
            MenuAction::Font => {
                let prefill = self.config.editor_font.family.clone();
                self.ui_state.enter_prompt(PromptKind::FontFamily, prefill);
            }
            MenuAction::ToggleDarkMode => self.toggle_dark_mode().await,
        }

        self.refresh_derived();
        Ok(())
    }

    async fn submit_prompt(&mut self, kind: PromptKind, input: String) -> Result<()> {
        match kind {
            PromptKind::OpenPath => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    return Ok(());
                }
                let path = PathBuf::from(trimmed);
                match self.file_manager.open_file(path.clone()).await {
                    Ok(content) => {
                        self.editor.set_content(content);
                        if self.file_manager.is_readonly() {
                            self.ui_state.set_warning_message(format!(
                                "Opened {} (read-only)",
                                path.display()
                            ));
                        } else {
                            self.ui_state
                                .set_success_message(format!("Opened {}", path.display()));
                        }
                    }
                    Err(e) => self.ui_state.set_error_message(e.to_string()),
                }
            }
            PromptKind::SavePath => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    return Ok(());
                }
                let mut path = PathBuf::from(trimmed);
                if path.extension().is_none() {
                    path.set_extension("txt");
                }
                self.save_to(path).await;
            }
            PromptKind::Find => {
                self.active_query = input;
                if self.active_query.is_empty() {
                    self.ui_state
                        .set_info_message("Search cleared".to_string());
                } else {
                    let count =
                        scan::find_all(&self.editor.get_content(), &self.active_query).len();
                    if count == 0 {
                        self.ui_state
                            .set_warning_message(format!("No matches for '{}'", self.active_query));
                    } else {
                        self.ui_state
                            .set_info_message(format!("{} match(es)", count));
                    }
                }
            }
            PromptKind::ReplaceQuery => {
                if input.is_empty() {
                    return Ok(());
                }
                self.ui_state
                    .enter_prompt(PromptKind::ReplaceWith { query: input }, String::new());
            }
            PromptKind::ReplaceWith { query } => {
                if let Some(replacement) =
                    scan::replace_all(&self.editor.get_content(), &query, &input)
                {
                    if replacement.count > 0 {
                        self.editor.replace_content(replacement.content);
                        self.ui_state.set_success_message(format!(
                            "Replaced {} occurrence(s)",
                            replacement.count
                        ));
                    } else {
                        self.ui_state
                            .set_warning_message(format!("No matches for '{}'", query));
                    }
                }
            }
            PromptKind::FontFamily => {
                let family = input.trim().to_string();
                if family.is_empty() {
                    return Ok(());
                }
                let prefill = self.config.editor_font.size.to_string();
                self.ui_state
                    .enter_prompt(PromptKind::FontSize { family }, prefill);
            }
            PromptKind::FontSize { family } => match input.trim().parse::<u16>() {
                Ok(size) if (6..=72).contains(&size) => {
                    self.config.editor_font = FontConfig { size, family };
                    self.persist_config().await;
                    self.ui_state.set_success_message(format!(
                        "Font set to {} {}",
                        self.config.editor_font.family, self.config.editor_font.size
                    ));
                }
                _ => {
                    self.ui_state
                        .set_error_message(format!("Invalid font size: {}", input.trim()));
                }
            },
        }

        self.refresh_derived();
        Ok(())
    }

    async fn save_to(&mut self, path: PathBuf) {
        match self.file_manager.save_as(path, &mut self.editor).await {
            Ok(message) => self.ui_state.set_success_message(message),
            Err(e) => self.ui_state.set_error_message(format!("Save failed: {}", e)),
        }
    }

    /// Flip between the light and dark palettes. The light background color
    /// is the pivot: anything else, including a hand-edited custom color,
    /// counts as dark and toggles back to light.
    async fn toggle_dark_mode(&mut self) {
        if self.config.theme.editor_background == LIGHT_BACKGROUND {
            self.config.theme = Theme::dark();
            self.ui_state.set_info_message("Dark mode on".to_string());
        } else {
            self.config.theme = Theme::light();
            self.ui_state.set_info_message("Dark mode off".to_string());
        }
        self.persist_config().await;
    }

    async fn persist_config(&mut self) {
        if let Err(e) = self.config.save().await {
            log::error!("Failed to save config: {}", e);
            self.ui_state
                .set_error_message(format!("Failed to save settings: {}", e));
        }
    }
}

/// Combine keyword and search tags into one sorted, pairwise-disjoint list.
/// Search matches win: a keyword range overlapping any match is dropped.
fn resolve_tags(keywords: Vec<TagRange>, found: Vec<TagRange>) -> Vec<TagRange> {
    let mut tags: Vec<TagRange> = keywords
        .into_iter()
        .filter(|k| !found.iter().any(|f| k.start < f.end && f.start < k.end))
        .collect();
    tags.extend(found);
    tags.sort_by_key(|t| t.start);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use editcore::Tag;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn shift(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::SHIFT)
    }

    async fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_fresh_app_status_line() {
        let app = App::with_config(Config::default());
        assert_eq!(app.ui_state.mode, Mode::Edit);
        assert_eq!(app.derived.cursor_status, "Line 1, Column 1");
        assert_eq!(app.derived.gutter, "1");
        assert!(app.derived.tags.is_empty());
    }

    #[tokio::test]
    async fn test_typing_updates_derived_state() {
        let mut app = App::with_config(Config::default());
        type_str(&mut app, "hi").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.editor.get_content(), "hi\n");
        assert_eq!(app.derived.gutter, "1\n2");
        assert_eq!(app.derived.cursor_status, "Line 2, Column 1");
    }

    #[tokio::test]
    async fn test_keywords_highlighted_while_typing() {
        let mut app = App::with_config(Config::default());
        type_str(&mut app, "def f").await;

        let keyword_tags: Vec<_> = app
            .derived
            .tags
            .iter()
            .filter(|t| matches!(t.tag, Tag::Keyword(_)))
            .collect();
        assert_eq!(keyword_tags.len(), 1);
        assert_eq!(keyword_tags[0].start, 0);
        assert_eq!(keyword_tags[0].end, 3);
    }

    #[tokio::test]
    async fn test_find_highlights_all_matches() {
        let mut app = App::with_config(Config::default());
        app.editor.set_content("foo bar FOO".to_string());
        app.refresh_derived();

        app.handle_key_event(ctrl('f')).await.unwrap();
        assert_eq!(app.ui_state.mode, Mode::Prompt);
        assert_eq!(app.ui_state.prompt_kind(), Some(&PromptKind::Find));

        type_str(&mut app, "foo").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.ui_state.mode, Mode::Edit);
        let found: Vec<_> = app
            .derived
            .tags
            .iter()
            .filter(|t| t.tag == Tag::Found)
            .collect();
        assert_eq!(found.len(), 2);
        assert!(app.ui_state.status_message().contains('2'));
    }

    #[tokio::test]
    async fn test_find_highlights_follow_edits() {
        let mut app = App::with_config(Config::default());
        app.editor.set_content("foo bar foo".to_string());
        app.refresh_derived();

        app.handle_key_event(ctrl('f')).await.unwrap();
        type_str(&mut app, "foo").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        // Cursor is at the start; typing another match ahead of the others
        type_str(&mut app, "foo ").await;
        assert_eq!(app.editor.get_content(), "foo foo bar foo");

        let found = app
            .derived
            .tags
            .iter()
            .filter(|t| t.tag == Tag::Found)
            .count();
        assert_eq!(found, 3);
    }

    #[tokio::test]
    async fn test_search_matches_win_over_keywords() {
        let mut app = App::with_config(Config::default());
        app.editor.set_content("def foo".to_string());
        app.active_query = "def".to_string();
        app.refresh_derived();

        assert_eq!(app.derived.tags.len(), 1);
        assert_eq!(app.derived.tags[0].tag, Tag::Found);
    }

    #[tokio::test]
    async fn test_replace_flow() {
        let mut app = App::with_config(Config::default());
        app.editor.set_content("cat and cat".to_string());
        app.refresh_derived();

        app.handle_key_event(ctrl('h')).await.unwrap();
        assert_eq!(app.ui_state.prompt_kind(), Some(&PromptKind::ReplaceQuery));
        type_str(&mut app, "cat").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.ui_state.mode, Mode::Prompt);
        assert_eq!(
            app.ui_state.prompt_kind(),
            Some(&PromptKind::ReplaceWith {
                query: "cat".to_string()
            })
        );
        type_str(&mut app, "dog").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.editor.get_content(), "dog and dog");
        assert!(app.ui_state.status_message().contains('2'));
    }

    #[tokio::test]
    async fn test_replace_with_empty_query_is_noop() {
        let mut app = App::with_config(Config::default());
        app.editor.set_content("cat".to_string());
        app.editor.mark_saved();
        app.refresh_derived();

        app.handle_key_event(ctrl('h')).await.unwrap();
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.ui_state.mode, Mode::Edit);
        assert_eq!(app.editor.get_content(), "cat");
        assert!(!app.editor.is_modified());
    }

    #[tokio::test]
    async fn test_replace_is_undoable() {
        let mut app = App::with_config(Config::default());
        app.editor.set_content("cat".to_string());
        app.refresh_derived();

        app.handle_key_event(ctrl('h')).await.unwrap();
        type_str(&mut app, "cat").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        type_str(&mut app, "dog").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.editor.get_content(), "dog");

        app.handle_key_event(ctrl('z')).await.unwrap();
        assert_eq!(app.editor.get_content(), "cat");
    }

    #[tokio::test]
    async fn test_undo_with_empty_history_is_silent() {
        let mut app = App::with_config(Config::default());
        app.handle_key_event(ctrl('z')).await.unwrap();

        assert_eq!(app.editor.get_content(), "");
        assert_eq!(app.ui_state.status_message(), "");
    }

    #[tokio::test]
    async fn test_undo_redo_shortcuts() {
        let mut app = App::with_config(Config::default());
        type_str(&mut app, "a").await;

        app.handle_key_event(ctrl('z')).await.unwrap();
        assert_eq!(app.editor.get_content(), "");

        app.handle_key_event(ctrl('y')).await.unwrap();
        assert_eq!(app.editor.get_content(), "a");
    }

    #[tokio::test]
    async fn test_selection_cut_and_paste() {
        let mut app = App::with_config(Config::default());
        type_str(&mut app, "abc").await;

        app.handle_key_event(shift(KeyCode::Left)).await.unwrap();
        app.handle_key_event(shift(KeyCode::Left)).await.unwrap();
        assert!(app.editor.has_selection());

        app.handle_key_event(ctrl('x')).await.unwrap();
        assert_eq!(app.editor.get_content(), "a");

        app.handle_key_event(ctrl('v')).await.unwrap();
        assert_eq!(app.editor.get_content(), "abc");
    }

    #[tokio::test]
    async fn test_stuck_shift_move_then_typing_keeps_every_char() {
        let mut app = App::with_config(Config::default());

        // Shift+Left at the very start of the buffer cannot move
        app.handle_key_event(shift(KeyCode::Left)).await.unwrap();
        type_str(&mut app, "ab").await;

        assert_eq!(app.editor.get_content(), "ab");
    }

    #[tokio::test]
    async fn test_copy_without_selection_warns() {
        let mut app = App::with_config(Config::default());
        type_str(&mut app, "abc").await;

        app.handle_key_event(ctrl('c')).await.unwrap();
        assert!(app.ui_state.status_message().contains("Nothing selected"));
    }

    #[tokio::test]
    async fn test_menu_enter_executes_action() {
        let mut app = App::with_config(Config::default());
        app.handle_key_event(key(KeyCode::F(10))).await.unwrap();
        assert_eq!(app.ui_state.mode, Mode::Menu);

        // File menu opens on its first item, New
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.ui_state.mode, Mode::Edit);
        assert_eq!(app.ui_state.status_message(), "New file");
    }

    #[tokio::test]
    async fn test_new_clears_search_highlights() {
        let mut app = App::with_config(Config::default());
        app.editor.set_content("foo foo".to_string());
        app.active_query = "foo".to_string();
        app.refresh_derived();
        assert_eq!(app.derived.tags.len(), 2);

        app.execute_action(MenuAction::New).await.unwrap();
        assert!(app.derived.tags.is_empty());
        assert_eq!(app.derived.cursor_status, "Line 1, Column 1");
    }

    #[tokio::test]
    async fn test_exit_always_asks_first() {
        // The confirmation is not content-aware; a pristine buffer asks too
        let mut app = App::with_config(Config::default());
        app.handle_key_event(ctrl('q')).await.unwrap();
        assert_eq!(app.ui_state.mode, Mode::ConfirmExit);
        assert!(!app.should_quit());

        app.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.ui_state.mode, Mode::Edit);
        assert_eq!(app.ui_state.status_message(), "");

        app.handle_key_event(ctrl('q')).await.unwrap();
        app.handle_key_event(key(KeyCode::Char('y'))).await.unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_save_prompts_with_current_path() {
        let mut app = App::with_config(Config::default());
        app.handle_key_event(ctrl('s')).await.unwrap();
        assert_eq!(app.ui_state.prompt_kind(), Some(&PromptKind::SavePath));
        assert_eq!(app.ui_state.prompt_buffer(), "");
    }

    #[tokio::test]
    async fn test_save_appends_txt_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = App::with_config(Config::default());
        type_str(&mut app, "hello").await;

        app.handle_key_event(ctrl('s')).await.unwrap();
        for c in dir.path().join("note").display().to_string().chars() {
            app.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
        }
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert!(dir.path().join("note.txt").exists());
        assert!(!app.editor.is_modified());
    }

    #[tokio::test]
    async fn test_cancelled_find_clears_highlights() {
        let mut app = App::with_config(Config::default());
        app.editor.set_content("foo foo".to_string());
        app.active_query = "foo".to_string();
        app.refresh_derived();
        assert_eq!(app.derived.tags.len(), 2);

        app.handle_key_event(ctrl('f')).await.unwrap();
        app.handle_key_event(key(KeyCode::Esc)).await.unwrap();

        assert_eq!(app.ui_state.mode, Mode::Edit);
        assert!(app.derived.tags.is_empty());
    }

    #[tokio::test]
    async fn test_alt_m_opens_menu() {
        let mut app = App::with_config(Config::default());
        app.handle_key_event(KeyEvent::new(KeyCode::Char('m'), KeyModifiers::ALT))
            .await
            .unwrap();
        assert_eq!(app.ui_state.mode, Mode::Menu);
    }

    #[tokio::test]
    async fn test_toggle_dark_mode_round_trip() {
        let _env = crate::config::test_env::isolated_config_dir();
        let mut app = App::with_config(Config::default());
        assert_eq!(app.config.theme.editor_background, LIGHT_BACKGROUND);

        app.execute_action(MenuAction::ToggleDarkMode).await.unwrap();
        assert_ne!(app.config.theme.editor_background, LIGHT_BACKGROUND);
        assert_eq!(app.config.theme.name, "dark");

        app.execute_action(MenuAction::ToggleDarkMode).await.unwrap();
        assert_eq!(app.config.theme.editor_background, LIGHT_BACKGROUND);
        assert_eq!(app.config.theme.name, "light");
    }

    #[tokio::test]
    async fn test_font_prompt_chain() {
        let _env = crate::config::test_env::isolated_config_dir();
        let mut app = App::with_config(Config::default());

        app.execute_action(MenuAction::Font).await.unwrap();
        assert_eq!(app.ui_state.prompt_kind(), Some(&PromptKind::FontFamily));
        assert_eq!(app.ui_state.prompt_buffer(), "monospace");

        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(
            app.ui_state.prompt_kind(),
            Some(&PromptKind::FontSize {
                family: "monospace".to_string()
            })
        );
        // Prefilled with the current size
        assert_eq!(app.ui_state.prompt_buffer(), "12");

        app.handle_key_event(key(KeyCode::Backspace)).await.unwrap();
        app.handle_key_event(key(KeyCode::Backspace)).await.unwrap();
        type_str(&mut app, "16").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.config.editor_font.size, 16);
        assert!(app.ui_state.status_message().contains("Font set"));
    }

    #[tokio::test]
    async fn test_font_rejects_bad_size() {
        let mut app = App::with_config(Config::default());

        app.execute_action(MenuAction::Font).await.unwrap();
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        app.ui_state.prompt_buffer = "huge".to_string();
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.config.editor_font.size, 12);
        assert!(app.ui_state.status_message().contains("Invalid font size"));
    }
}
