use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// UTF-8 byte-order mark as written at the start of `Utf8Bom` files.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Text encoding used when writing generated files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// UTF-8 without a byte-order mark.
    Utf8,
    /// UTF-8 prefixed with a byte-order mark.
    Utf8Bom,
}

impl TextEncoding {
    pub fn encode(&self, content: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => content.as_bytes().to_vec(),
            TextEncoding::Utf8Bom => {
                let mut bytes = Vec::with_capacity(UTF8_BOM.len() + content.len());
                bytes.extend_from_slice(UTF8_BOM);
                bytes.extend_from_slice(content.as_bytes());
                bytes
            }
        }
    }
}

/// Entry returned from directory listing
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Trait for file system operations used by scaffolding and validation.
///
/// Recursive listings include the root itself (for directories) and are
/// returned in a stable, name-sorted, depth-first order.
pub trait FileSystem {
    fn current_dir(&self) -> Result<PathBuf>;
    fn dir_exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str, encoding: TextEncoding) -> Result<()>;
    fn list(&self, dir: &Path) -> Result<Vec<Entry>>;
    fn list_dirs_recursive(&self, root: &Path) -> Result<Vec<PathBuf>>;
    fn list_files_recursive(&self, root: &Path) -> Result<Vec<PathBuf>>;
    fn ensure_dir(&self, dir: &Path) -> Result<()>;
    fn delete_dir(&self, dir: &Path) -> Result<()>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    fn walk(&self, root: &Path, want_dirs: bool) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        // Links are classified by their target; a cycle surfaces as a walk error.
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("walk {}", root.display())))
            })?;
            let file_type = entry.file_type();
            if (want_dirs && file_type.is_dir()) || (!want_dirs && file_type.is_file()) {
                result.push(entry.into_path());
            }
        }
        Ok(result)
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn current_dir(&self) -> Result<PathBuf> {
        std::env::current_dir()
            .map_err(|e| Error::internal_io(e.to_string(), Some("current directory".to_string())))
    }

    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::internal_io(
                    format!("File not found: {}", path.display()),
                    Some("read file".to_string()),
                )
            } else {
                Error::internal_io(e.to_string(), Some("read file".to_string()))
            }
        })?;

        // Encoding is decided on write; never carry a source BOM into content.
        Ok(match content.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => content,
        })
    }

    fn write(&self, path: &Path, content: &str, encoding: TextEncoding) -> Result<()> {
        // Atomic write: write to temp file, then rename
        let parent = path.parent().ok_or_else(|| {
            Error::internal_io(
                format!("Invalid path: {}", path.display()),
                Some("write file".to_string()),
            )
        })?;

        let filename = path.file_name().ok_or_else(|| {
            Error::internal_io(
                format!("Invalid path: {}", path.display()),
                Some("write file".to_string()),
            )
        })?;

        let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

        fs::write(&tmp_path, encoding.encode(content))
            .map_err(|e| Error::internal_io(e.to_string(), Some("write temp file".to_string())))?;

        fs::rename(&tmp_path, path)
            .map_err(|e| Error::internal_io(e.to_string(), Some("rename temp file".to_string())))?;

        Ok(())
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir)
            .map_err(|e| Error::internal_io(e.to_string(), Some("list directory".to_string())))?;

        let mut result = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_dir = path.is_dir();
            result.push(Entry { path, is_dir });
        }
        result.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(result)
    }

    fn list_dirs_recursive(&self, root: &Path) -> Result<Vec<PathBuf>> {
        self.walk(root, true)
    }

    fn list_files_recursive(&self, root: &Path) -> Result<Vec<PathBuf>> {
        self.walk(root, false)
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                Error::internal_io(e.to_string(), Some("create directory".to_string()))
            })?;
        }
        Ok(())
    }

    fn delete_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(dir)
            .map_err(|e| Error::internal_io(e.to_string(), Some("delete directory".to_string())))
    }
}
