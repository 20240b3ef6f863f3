//! Seal embedding into compiled objects
//!
//! The core never embeds anything itself. It hands a [`Seal`] and an object
//! path to a [`SealEmbedder`] and reports what comes back as
//! [`Error::Embed`](crate::Error::Embed), separate from compilation errors.
//! IR text produced before the call is never touched.

use super::seal::Seal;
use crate::error::EmbedError;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the object section that carries the seal
pub const SEAL_SECTION: &str = ".lettera_seal";

/// Tools tried in order
const TOOLS: &[&str] = &["llvm-objcopy", "objcopy"];

/// Platforms whose native object format takes no custom sections
const UNSUPPORTED_PLATFORMS: &[&str] = &["macos"];

/// Adds a seal to an already-compiled object
pub trait SealEmbedder {
    /// Embed `seal` into the object at `object`
    fn embed(&self, seal: &Seal, object: &Path) -> Result<(), EmbedError>;
}

/// Embeds the hex seal as a `noload,readonly` section using objcopy
#[derive(Debug, Clone)]
pub struct ObjcopyEmbedder {
    platform: String,
    search_path: Option<OsString>,
}

impl Default for ObjcopyEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjcopyEmbedder {
    /// Embedder for the host platform, searching `PATH`
    pub fn new() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
            search_path: None,
        }
    }

    /// Override the platform name (`std::env::consts::OS` spelling)
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Search these directories instead of `PATH`
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// First available objcopy tool
    pub fn find_tool(&self) -> Option<PathBuf> {
        let path = self
            .search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))?;
        let dirs: Vec<PathBuf> = std::env::split_paths(&path).collect();
        TOOLS.iter().find_map(|tool| {
            dirs.iter()
                .map(|dir| dir.join(tool))
                .find(|candidate| candidate.is_file())
        })
    }

    fn check_platform(&self) -> Result<(), EmbedError> {
        if UNSUPPORTED_PLATFORMS.contains(&self.platform.as_str()) {
            return Err(EmbedError::UnsupportedPlatform {
                platform: self.platform.clone(),
            });
        }
        Ok(())
    }

    fn run(&self, tool: &Path, seal: &Seal, object: &Path) -> Result<(), EmbedError> {
        let mut section = tempfile::NamedTempFile::new().map_err(|e| EmbedError::Io(e.to_string()))?;
        section
            .write_all(seal.to_hex().as_bytes())
            .and_then(|_| section.flush())
            .map_err(|e| EmbedError::Io(e.to_string()))?;

        let mut add = OsString::from(format!("{}=", SEAL_SECTION));
        add.push(section.path());

        let tool_name = tool.display().to_string();
        let output = Command::new(tool)
            .arg("--add-section")
            .arg(add)
            .arg("--set-section-flags")
            .arg(format!("{}=noload,readonly", SEAL_SECTION))
            .arg(object)
            .output()
            .map_err(|e| EmbedError::ToolFailed {
                tool: tool_name.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            return Err(EmbedError::ToolFailed {
                tool: tool_name,
                reason,
            });
        }
        Ok(())
    }
}

impl SealEmbedder for ObjcopyEmbedder {
    fn embed(&self, seal: &Seal, object: &Path) -> Result<(), EmbedError> {
        self.check_platform()?;
        let tool = self.find_tool().ok_or(EmbedError::ToolNotFound)?;
        tracing::debug!(
            "embedding seal {} into {} with {}",
            &seal.to_hex()[..12],
            object.display(),
            tool.display()
        );
        self.run(&tool, seal, object)
    }
}
