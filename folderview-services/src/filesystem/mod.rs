// SPDX-License-Identifier: LGPL-3.0-only
//! Folder model for folderview, similar to a sorted/filtered proxy over a directory listing.
//!
//! Provides the file entry handles views resolve from model indexes, the
//! [FolderModel] accessor trait and a concrete [ProxyFolderModel].

pub mod entry;
pub mod folder_model;
pub mod proxy_model;

// Re-export public API
pub use entry::{FileInfo, FileMetadata, FileType};
pub use folder_model::{FolderModel, FILE_NAME_COLUMN};
pub use proxy_model::{FolderChange, FolderColumn, ProxyFolderModel, SortOrder};
