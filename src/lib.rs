#![warn(missing_docs)]

//! A folder view widget with interchangeable icon, compact, thumbnail and
//! detailed list presentations over a shared folder model.

pub use kurbo as geometry;
pub use nalgebra as math;

pub use folderview_core as core;
pub use folderview_services as services;
pub use folderview_widgets as widgets;

/// A "prelude" for users of folderview.
///
/// ```rust
/// use folderview::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::input::{KeyEvent, PointerEvent};
    pub use crate::core::model::{ItemModel, ItemRole, ModelIndex};
    pub use crate::core::update::Update;
    pub use crate::core::widget::Widget;
    pub use crate::core::window::{Key, ModifiersState, MouseButton, NamedKey};

    pub use crate::services::filesystem::{FolderChange, FolderColumn, SortOrder, FILE_NAME_COLUMN};
    pub use crate::services::{FileInfo, FileMetadata, FileType, FolderModel, ProxyFolderModel, SettingsRegistry};

    pub use crate::widgets::folder_view::{
        ClickType, EmptySpaceContextPolicy, FolderView, FolderViewEvent, FolderViewSettings,
        SharedModel, ViewMode, ViewSurface,
    };

    // Math
    pub use kurbo::{Point, Rect, Size};
    pub use nalgebra::Vector2;
}
