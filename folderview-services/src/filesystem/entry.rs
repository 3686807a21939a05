// SPDX-License-Identifier: LGPL-3.0-only
//! File entry handles resolved from folder model rows.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Type of filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Other type (e.g., device, socket, etc.).
    Other,
}

/// Metadata about a filesystem entry, as reported by the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMetadata {
    /// Size of the file in bytes.
    pub size: u64,
    /// Last modification time, if known.
    pub modified: Option<SystemTime>,
    /// File permissions (Unix-style).
    pub permissions: u32,
    /// MIME type of the file (if detected).
    pub mime_type: Option<String>,
}

/// An opaque handle to a file or directory shown in a folder view.
///
/// Views never look inside beyond [FileInfo::path]; the rest feeds the
/// model's display columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    path: PathBuf,
    name: String,
    file_type: FileType,
    metadata: FileMetadata,
}

impl FileInfo {
    /// Create an entry. The name is the last path component.
    pub fn new(path: impl Into<PathBuf>, file_type: FileType, metadata: FileMetadata) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path,
            name,
            file_type,
            metadata,
        }
    }

    /// A regular file with empty metadata.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileType::File, FileMetadata::default())
    }

    /// A directory with empty metadata.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileType::Directory, FileMetadata::default())
    }

    /// Full path to the entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the entry (file or directory name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type of the entry.
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Metadata about the entry.
    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    /// Dot files are hidden.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Get the file extension (if any).
    pub fn extension(&self) -> Option<&str> {
        self.path.extension()?.to_str()
    }

    /// Get the parent directory path.
    pub fn parent_path(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Human readable type, used by the Type column.
    pub fn type_description(&self) -> String {
        match (self.file_type, self.metadata.mime_type.as_deref()) {
            (FileType::Directory, _) => "Folder".to_string(),
            (FileType::Symlink, _) => "Link".to_string(),
            (_, Some(mime)) => mime.to_string(),
            (_, None) => match self.extension() {
                Some(ext) => format!("{} file", ext.to_uppercase()),
                None => "File".to_string(),
            },
        }
    }
}
