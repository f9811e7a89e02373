// Notula library exports

pub mod app;
pub mod config;
pub mod editor;
pub mod file_manager;
pub mod menu;
pub mod status_manager;
pub mod ui;
pub mod ui_state;

pub use app::{App, Mode};
pub use config::Config;
pub use editor::Editor;
pub use file_manager::FileManager;
pub use menu::{MenuAction, MenuBar};
pub use status_manager::StatusManager;
pub use ui_state::UIState;
