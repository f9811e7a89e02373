use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::try_exists;

/// Light-mode sentinel background. The dark-mode toggle tests the current
/// editor background against this exact value; anything else counts as
/// "currently dark". A custom background therefore toggles to light first,
/// which is a known quirk of the scheme rather than an accident.
pub const LIGHT_BACKGROUND: &str = "#FFFFFF";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub editor_font: FontConfig,
    pub gutter_font: FontConfig,
    pub editor: EditorConfig,
}

/// Concrete display colors, applied uniformly to the editor area and the
/// line-number gutter on every draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub editor_foreground: String,
    pub editor_background: String,
    pub cursor_color: String,
    pub gutter_foreground: String,
    pub gutter_background: String,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: String::from("light"),
            editor_foreground: String::from("#000000"),
            editor_background: String::from(LIGHT_BACKGROUND),
            cursor_color: String::from("#000000"),
            gutter_foreground: String::from("#000000"),
            gutter_background: String::from("#D3D3D3"),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: String::from("dark"),
            editor_foreground: String::from("#FFFFFF"),
            editor_background: String::from("#000000"),
            cursor_color: String::from("#FFFFFF"),
            gutter_foreground: String::from("#FFFFFF"),
            gutter_background: String::from("#000000"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    pub size: u16,
    pub family: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub tab_size: usize,
    pub use_spaces: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::light(),
            editor_font: FontConfig {
                size: 12,
                family: String::from("monospace"),
            },
            gutter_font: FontConfig {
                size: 12,
                family: String::from("monospace"),
            },
            editor: EditorConfig {
                tab_size: 4,
                use_spaces: true,
            },
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if try_exists(&config_path).await? {
                match tokio::fs::read_to_string(&config_path).await {
                    Ok(content) => {
                        if content.trim().is_empty() {
                            log::warn!("Config file is empty, creating new one");
                            let default_config = Self::default();
                            let _ = default_config.save().await;
                            return Ok(default_config);
                        }

                        match serde_json::from_str::<Self>(&content) {
                            Ok(mut config) => {
                                config.validate()?;
                                log::info!(
                                    "Successfully loaded config from: {}",
                                    config_path.display()
                                );
                                return Ok(config);
                            }
                            Err(json_err) => {
                                log::error!("Failed to parse config file: {}", json_err);

                                // Keep the broken file around for inspection
                                let backup_path = config_path.with_extension("bak");
                                if let Err(e) = tokio::fs::copy(&config_path, &backup_path).await {
                                    log::warn!("Failed to backup broken config: {}", e);
                                } else {
                                    log::info!(
                                        "Backed up broken config to: {}",
                                        backup_path.display()
                                    );
                                }

                                let default_config = Self::default();
                                let _ = default_config.save().await;
                                return Ok(default_config);
                            }
                        }
                    }
                    Err(io_err) => {
                        log::error!("Failed to read config file: {}", io_err);
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        let default_config = Self::default();
        let _ = default_config.save().await;
        Ok(default_config)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            let mut config_to_save = self.clone();
            config_to_save.validate()?;

            if let Some(parent) = config_path.parent() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    return Err(anyhow::anyhow!(
                        "Failed to create config directory {}: {}",
                        parent.display(),
                        e
                    ));
                }
            }

            let content = serde_json::to_string_pretty(&config_to_save)?;
            if let Err(e) = tokio::fs::write(&config_path, content).await {
                return Err(anyhow::anyhow!(
                    "Failed to write config file {}: {}",
                    config_path.display(),
                    e
                ));
            }
            log::info!("Successfully saved config to: {}", config_path.display());
        }
        Ok(())
    }

    /// Validate configuration values and fix invalid ones
    pub fn validate(&mut self) -> Result<()> {
        let mut has_issues = false;

        if self.editor_font.size < 6 || self.editor_font.size > 72 {
            log::warn!("Invalid editor font size: {}, using default", self.editor_font.size);
            self.editor_font.size = 12;
            has_issues = true;
        }

        if self.gutter_font.size < 6 || self.gutter_font.size > 72 {
            log::warn!("Invalid gutter font size: {}, using default", self.gutter_font.size);
            self.gutter_font.size = 12;
            has_issues = true;
        }

        if self.editor.tab_size == 0 || self.editor.tab_size > 16 {
            log::warn!("Invalid tab size: {}, using default", self.editor.tab_size);
            self.editor.tab_size = 4;
            has_issues = true;
        }

        if self.theme.name.is_empty() {
            log::warn!("Empty theme name, using light theme");
            self.theme = Theme::light();
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("NOTULA_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("NOTULA_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "notula", "notula")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
