use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
    pub created_at: Instant,
    pub auto_clear_duration: Option<Duration>,
}

impl StatusMessage {
    pub fn new(content: String, message_type: MessageType) -> Self {
        let auto_clear_duration = Self::default_duration_for_type(&message_type);
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration,
        }
    }

    /// A message that stays until explicitly cleared, as for prompts.
    pub fn permanent(content: String, message_type: MessageType) -> Self {
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        match self.auto_clear_duration {
            Some(duration) => self.created_at.elapsed() > duration,
            None => false,
        }
    }

    fn default_duration_for_type(message_type: &MessageType) -> Option<Duration> {
        match message_type {
            MessageType::Info => Some(Duration::from_secs(3)),
            MessageType::Success => Some(Duration::from_secs(2)),
            MessageType::Warning => Some(Duration::from_secs(5)),
            MessageType::Error => Some(Duration::from_secs(7)),
        }
    }
}

/// Holds the transient message shown in the status bar; errors linger longer
/// than successes, and everything expires on its own.
#[derive(Clone, Default)]
pub struct StatusManager {
    current_message: Option<StatusMessage>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self {
            current_message: None,
        }
    }

    pub fn set_info(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, MessageType::Info));
    }

    pub fn set_success(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, MessageType::Success));
    }

    pub fn set_warning(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, MessageType::Warning));
    }

    pub fn set_error(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, MessageType::Error));
    }

    pub fn set_permanent(&mut self, message: String, message_type: MessageType) {
        self.current_message = Some(StatusMessage::permanent(message, message_type));
    }

    pub fn clear(&mut self) {
        self.current_message = None;
    }

    /// Drop the current message once its display duration has elapsed.
    pub fn update(&mut self) {
        if let Some(ref message) = self.current_message {
            if message.is_expired() {
                self.current_message = None;
            }
        }
    }

    pub fn current_message(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn has_message(&self) -> bool {
        self.current_message.is_some()
    }
}
