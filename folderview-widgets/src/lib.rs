#![warn(missing_docs)]

//! Folder view widgets for folderview => See `folderview` crate.
//!
//! Contains the [folder_view::FolderView] widget and the surfaces it switches between.

/// Contains the [folder_view::FolderView] widget.
pub mod folder_view;
