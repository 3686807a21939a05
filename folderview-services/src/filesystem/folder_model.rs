// SPDX-License-Identifier: LGPL-3.0-only
use std::sync::Arc;

use folderview_core::model::{ItemModel, ItemRole, ModelIndex};

use super::entry::FileInfo;

/// Column showing the file name. Views install their item delegate here.
pub const FILE_NAME_COLUMN: usize = 0;

/// An [ItemModel] whose rows are file-system entries.
pub trait FolderModel: ItemModel {
    /// The entry bound to the row of `index`, or `None` for an invalid index.
    ///
    /// The default implementation downcasts the [ItemRole::FileInfo] payload.
    fn file_info(&self, index: &ModelIndex) -> Option<Arc<FileInfo>> {
        if !self.is_valid(index) {
            return None;
        }
        self.data(index, ItemRole::FileInfo).downcast::<FileInfo>()
    }
}
