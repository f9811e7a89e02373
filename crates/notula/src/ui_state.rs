use crate::app::Mode;
use crate::status_manager::{MessageType, StatusManager};

/// Which blocking prompt is currently up. Replace and Font are two-step
/// prompts; the first answer is carried in the second step's variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    OpenPath,
    SavePath,
    Find,
    ReplaceQuery,
    ReplaceWith { query: String },
    FontFamily,
    FontSize { family: String },
}

impl PromptKind {
    /// Label shown in front of the input line.
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::OpenPath => "Open file: ",
            PromptKind::SavePath => "Save as: ",
            PromptKind::Find => "Find: ",
            PromptKind::ReplaceQuery => "Replace: ",
            PromptKind::ReplaceWith { .. } => "Replace with: ",
            PromptKind::FontFamily => "Font family: ",
            PromptKind::FontSize { .. } => "Font size: ",
        }
    }
}

pub struct UIState {
    pub mode: Mode,
    pub status_manager: StatusManager,
    pub prompt_kind: Option<PromptKind>,
    pub prompt_buffer: String,
    pub should_quit: bool,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Edit,
            status_manager: StatusManager::new(),
            prompt_kind: None,
            prompt_buffer: String::new(),
            should_quit: false,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn enter_edit_mode(&mut self) {
        self.mode = Mode::Edit;
        self.prompt_kind = None;
        self.prompt_buffer.clear();
    }

    pub fn enter_menu_mode(&mut self) {
        self.mode = Mode::Menu;
    }

    /// Put up a blocking prompt, optionally prefilled.
    pub fn enter_prompt(&mut self, kind: PromptKind, prefill: String) {
        self.mode = Mode::Prompt;
        self.prompt_kind = Some(kind);
        self.prompt_buffer = prefill;
    }

    pub fn enter_confirm_exit(&mut self) {
        self.mode = Mode::ConfirmExit;
        self.status_manager.set_permanent(
            "Do you really want to quit? (y = quit, Esc = cancel)".to_string(),
            MessageType::Warning,
        );
    }

    pub fn prompt_kind(&self) -> Option<&PromptKind> {
        self.prompt_kind.as_ref()
    }

    pub fn prompt_buffer(&self) -> &str {
        &self.prompt_buffer
    }

    pub fn push_to_prompt(&mut self, c: char) {
        self.prompt_buffer.push(c);
    }

    pub fn pop_from_prompt(&mut self) {
        self.prompt_buffer.pop();
    }

    /// Take the finished prompt, returning its kind and entered text.
    pub fn take_prompt(&mut self) -> Option<(PromptKind, String)> {
        let kind = self.prompt_kind.take()?;
        let input = std::mem::take(&mut self.prompt_buffer);
        Some((kind, input))
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // Status message helpers, delegating to the StatusManager

    pub fn set_info_message(&mut self, message: String) {
        self.status_manager.set_info(message);
    }

    pub fn set_success_message(&mut self, message: String) {
        self.status_manager.set_success(message);
    }

    pub fn set_warning_message(&mut self, message: String) {
        self.status_manager.set_warning(message);
    }

    pub fn set_error_message(&mut self, message: String) {
        self.status_manager.set_error(message);
    }

    pub fn clear_status_message(&mut self) {
        self.status_manager.clear();
    }

    pub fn status_message(&self) -> &str {
        self.status_manager
            .current_message()
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    pub fn update_status(&mut self) {
        self.status_manager.update();
    }
}

impl Default for UIState {
    fn default() -> Self {
        Self::new()
    }
}
