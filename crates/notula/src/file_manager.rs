use anyhow::Result;
use std::path::PathBuf;
use tokio::fs;

use crate::editor::Editor;

/// Whole-file open and save. Content is read and written wholesale with no
/// line-ending normalization; UTF-8 is the only supported encoding.
pub struct FileManager {
    current_path: Option<PathBuf>,
    is_readonly: bool,
}

impl FileManager {
    pub fn new() -> Self {
        Self {
            current_path: None,
            is_readonly: false,
        }
    }

    pub fn current_path(&self) -> Option<&PathBuf> {
        self.current_path.as_ref()
    }

    pub fn has_file(&self) -> bool {
        self.current_path.is_some()
    }

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    /// Forget the current file, as on New.
    pub fn reset(&mut self) {
        self.current_path = None;
        self.is_readonly = false;
    }

    pub async fn open_file(&mut self, path: PathBuf) -> Result<String> {
        if !path.exists() {
            return Err(anyhow::anyhow!("File not found: {}", path.display()));
        }

        if !path.is_file() {
            return Err(anyhow::anyhow!(
                "Path is not a regular file: {}",
                path.display()
            ));
        }

        match fs::metadata(&path).await {
            Ok(metadata) => {
                self.is_readonly = metadata.permissions().readonly();

                // Warn about large files (>10MB); reading blocks the event loop
                const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024;
                if metadata.len() > LARGE_FILE_THRESHOLD {
                    log::warn!(
                        "Large file detected ({} bytes): {}",
                        metadata.len(),
                        path.display()
                    );
                }
            }
            Err(e) => {
                log::warn!("Failed to get file metadata: {}", e);
                self.is_readonly = false;
            }
        }

        match fs::read_to_string(&path).await {
            Ok(content) => {
                if content.contains('\0') {
                    return Err(anyhow::anyhow!(
                        "File appears to be binary: {}",
                        path.display()
                    ));
                }

                self.current_path = Some(path.clone());
                log::info!("Successfully opened file: {}", path.display());
                Ok(content)
            }
            Err(e) => {
                let error_msg = match e.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        format!("Permission denied: {}", path.display())
                    }
                    std::io::ErrorKind::NotFound => {
                        format!("File not found: {}", path.display())
                    }
                    std::io::ErrorKind::InvalidData => {
                        format!("File is not valid UTF-8: {}", path.display())
                    }
                    _ => format!("Failed to read {}: {}", path.display(), e),
                };
                Err(anyhow::anyhow!(error_msg))
            }
        }
    }

    /// Write the whole buffer to `path`, overwriting unconditionally, and
    /// make it the current file.
    pub async fn save_as(&mut self, path: PathBuf, editor: &mut Editor) -> Result<String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent).await {
                    return Err(anyhow::anyhow!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ));
                }
                log::info!("Created directory: {}", parent.display());
            }
        }

        if path.exists() {
            match fs::metadata(&path).await {
                Ok(metadata) => {
                    if metadata.permissions().readonly() {
                        return Err(anyhow::anyhow!(
                            "Target file is read-only: {}",
                            path.display()
                        ));
                    }
                }
                Err(e) => {
                    log::warn!("Failed to check target file metadata: {}", e);
                }
            }
        }

        let content = editor.get_content();

        match fs::write(&path, content.as_bytes()).await {
            Ok(_) => {
                self.current_path = Some(path.clone());
                self.is_readonly = false;
                editor.mark_saved();
                log::info!("Successfully saved file: {}", path.display());
                Ok(format!(
                    "Wrote {} lines to {}",
                    editor.line_count(),
                    path.display()
                ))
            }
            Err(e) => {
                let error_msg = match e.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        format!("Permission denied writing {}", path.display())
                    }
                    std::io::ErrorKind::WriteZero => {
                        format!("Disk may be full writing {}", path.display())
                    }
                    _ => format!("Failed to write {}: {}", path.display(), e),
                };
                Err(anyhow::anyhow!(error_msg))
            }
        }
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new()
    }
}
