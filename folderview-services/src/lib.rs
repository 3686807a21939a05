// SPDX-License-Identifier: LGPL-3.0-only
//! Folder models, file entries and settings for folderview.
//!
//! Nothing in here reads directories: listings are produced by an outside
//! loader and pushed into [filesystem::ProxyFolderModel].

pub mod filesystem;
pub mod settings;

pub use filesystem::{FileInfo, FileMetadata, FileType, FolderModel, ProxyFolderModel};
pub use settings::{SettingsError, SettingsRegistry};
