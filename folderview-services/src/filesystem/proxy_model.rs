// SPDX-License-Identifier: LGPL-3.0-only
//! Sorted and filtered projection of a directory listing.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Local};
use folderview_core::model::{ItemModel, ItemRole, ModelData, ModelIndex, Orientation};
use humansize::{format_size, DECIMAL};

use super::entry::FileInfo;
use super::folder_model::FolderModel;

/// Columns exposed by [ProxyFolderModel].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderColumn {
    /// File name, the column item delegates are installed on.
    Name,
    /// Size in human readable form, empty for folders.
    Size,
    /// Last modification time.
    Modified,
    /// MIME type or a generic description.
    Type,
}

impl FolderColumn {
    /// Every column, in display order.
    pub const ALL: [FolderColumn; 4] = [
        FolderColumn::Name,
        FolderColumn::Size,
        FolderColumn::Modified,
        FolderColumn::Type,
    ];

    /// The column at a model column position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Header title.
    pub fn title(self) -> &'static str {
        match self {
            FolderColumn::Name => "Name",
            FolderColumn::Size => "Size",
            FolderColumn::Modified => "Modified",
            FolderColumn::Type => "Type",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// A to Z, small to large, old to new.
    #[default]
    Ascending,
    /// The reverse.
    Descending,
}

/// A change reported by whoever loads and watches the directory.
#[derive(Debug, Clone)]
pub enum FolderChange {
    /// The listing was (re)loaded; replaces every entry.
    Loaded(Vec<FileInfo>),
    /// A new entry appeared.
    Added(FileInfo),
    /// An entry disappeared.
    Removed(PathBuf),
    /// An entry changed; matched by path.
    Modified(FileInfo),
    /// An entry was renamed.
    Renamed {
        /// Old path.
        old_path: PathBuf,
        /// The entry under its new path.
        entry: FileInfo,
    },
}

#[derive(Debug)]
struct ProxyState {
    source: Vec<Arc<FileInfo>>,
    rows: Vec<Arc<FileInfo>>,
    show_hidden: bool,
    folders_first: bool,
    sort_column: FolderColumn,
    sort_order: SortOrder,
    name_filter: Option<String>,
    revision: u64,
}

impl ProxyState {
    fn accepts(&self, entry: &FileInfo) -> bool {
        if !self.show_hidden && entry.is_hidden() {
            return false;
        }
        match &self.name_filter {
            Some(pattern) => entry.name().to_lowercase().contains(pattern),
            None => true,
        }
    }

    fn compare(&self, a: &FileInfo, b: &FileInfo) -> Ordering {
        if self.folders_first && a.is_dir() != b.is_dir() {
            // Folders stay on top whatever the direction.
            return b.is_dir().cmp(&a.is_dir());
        }

        let by_name = || {
            a.name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then_with(|| a.path().cmp(b.path()))
        };
        let ordering = match self.sort_column {
            FolderColumn::Name => by_name(),
            FolderColumn::Size => a.metadata().size.cmp(&b.metadata().size).then_with(by_name),
            FolderColumn::Modified => a.metadata().modified.cmp(&b.metadata().modified).then_with(by_name),
            FolderColumn::Type => a.type_description().cmp(&b.type_description()).then_with(by_name),
        };

        match self.sort_order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    fn rebuild(&mut self) {
        let mut rows: Vec<Arc<FileInfo>> = self
            .source
            .iter()
            .filter(|entry| self.accepts(entry))
            .cloned()
            .collect();
        rows.sort_by(|a, b| self.compare(a, b));
        self.rows = rows;
        self.revision += 1;
    }
}

/// A filtered, sorted view over the entries of one folder.
///
/// The listing comes from outside through [ProxyFolderModel::apply]; the
/// model only projects it. It is meant to be shared as `Arc<ProxyFolderModel>`
/// between the folder view and the code feeding it, so all mutation goes
/// through `&self`.
#[derive(Debug)]
pub struct ProxyFolderModel {
    state: RwLock<ProxyState>,
}

impl Default for ProxyFolderModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyFolderModel {
    /// Create an empty model: hidden files filtered out, folders first, sorted by name.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ProxyState {
                source: Vec::new(),
                rows: Vec::new(),
                show_hidden: false,
                folders_first: true,
                sort_column: FolderColumn::Name,
                sort_order: SortOrder::Ascending,
                name_filter: None,
                revision: 0,
            }),
        }
    }

    /// Create a model already holding `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = FileInfo>) -> Self {
        let model = Self::new();
        model.set_entries(entries);
        model
    }

    fn read(&self) -> RwLockReadGuard<'_, ProxyState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProxyState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the whole listing.
    pub fn set_entries(&self, entries: impl IntoIterator<Item = FileInfo>) {
        self.apply(FolderChange::Loaded(entries.into_iter().collect()));
    }

    /// Add an entry, replacing any entry with the same path.
    pub fn insert_entry(&self, entry: FileInfo) {
        self.apply(FolderChange::Added(entry));
    }

    /// Drop the entry at `path`.
    pub fn remove_path(&self, path: impl Into<PathBuf>) {
        self.apply(FolderChange::Removed(path.into()));
    }

    /// Fold a change from the loader into the listing.
    pub fn apply(&self, change: FolderChange) {
        let mut state = self.write();
        match change {
            FolderChange::Loaded(entries) => {
                log::debug!("ProxyFolderModel: loaded {} entries", entries.len());
                state.source = entries.into_iter().map(Arc::new).collect();
            },
            FolderChange::Added(entry) => {
                state.source.retain(|existing| existing.path() != entry.path());
                state.source.push(Arc::new(entry));
            },
            FolderChange::Removed(path) => {
                state.source.retain(|existing| existing.path() != path);
            },
            FolderChange::Modified(entry) => {
                match state.source.iter_mut().find(|existing| existing.path() == entry.path()) {
                    Some(slot) => *slot = Arc::new(entry),
                    None => log::warn!("ProxyFolderModel: modified entry {:?} is not listed", entry.path()),
                }
            },
            FolderChange::Renamed { old_path, entry } => {
                state.source.retain(|existing| existing.path() != old_path);
                state.source.push(Arc::new(entry));
            },
        }
        state.rebuild();
    }

    /// Show or hide dot files.
    pub fn set_show_hidden(&self, show: bool) {
        let mut state = self.write();
        if state.show_hidden != show {
            state.show_hidden = show;
            state.rebuild();
        }
    }

    /// Whether dot files are shown.
    pub fn show_hidden(&self) -> bool {
        self.read().show_hidden
    }

    /// Keep folders above files regardless of the sort column.
    pub fn set_folders_first(&self, folders_first: bool) {
        let mut state = self.write();
        if state.folders_first != folders_first {
            state.folders_first = folders_first;
            state.rebuild();
        }
    }

    /// Whether folders are kept above files.
    pub fn folders_first(&self) -> bool {
        self.read().folders_first
    }

    /// Only show entries whose name contains `pattern` (case-insensitive). `None` shows everything.
    pub fn set_name_filter(&self, pattern: Option<&str>) {
        let mut state = self.write();
        state.name_filter = pattern
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_lowercase);
        state.rebuild();
    }

    /// Sort by `column` in `order`.
    pub fn sort(&self, column: FolderColumn, order: SortOrder) {
        let mut state = self.write();
        state.sort_column = column;
        state.sort_order = order;
        state.rebuild();
    }

    /// The current sort column and order.
    pub fn sort_column(&self) -> (FolderColumn, SortOrder) {
        let state = self.read();
        (state.sort_column, state.sort_order)
    }

    /// The visible entry at `row`.
    pub fn file_info_at(&self, row: usize) -> Option<Arc<FileInfo>> {
        self.read().rows.get(row).cloned()
    }

    /// Typed lookup of the entry bound to `index`.
    pub fn file_info_from_index(&self, index: &ModelIndex) -> Option<Arc<FileInfo>> {
        if index.column() >= FolderColumn::ALL.len() {
            return None;
        }
        self.file_info_at(index.row())
    }

    /// The row showing `path`, if it passes the filter.
    pub fn index_of_path(&self, path: &Path) -> Option<ModelIndex> {
        self.read()
            .rows
            .iter()
            .position(|entry| entry.path() == path)
            .map(|row| ModelIndex::new(row, 0))
    }

    fn display(entry: &FileInfo, column: FolderColumn) -> String {
        match column {
            FolderColumn::Name => entry.name().to_string(),
            FolderColumn::Size if entry.is_dir() => String::new(),
            FolderColumn::Size => format_size(entry.metadata().size, DECIMAL),
            FolderColumn::Modified => entry
                .metadata()
                .modified
                .map(|time| DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            FolderColumn::Type => entry.type_description(),
        }
    }

    fn icon_name(entry: &FileInfo) -> String {
        if entry.is_dir() {
            return "folder".to_string();
        }
        match entry.metadata().mime_type.as_deref() {
            Some(mime) => mime.replace('/', "-"),
            None => "text-x-generic".to_string(),
        }
    }
}

impl ItemModel for ProxyFolderModel {
    fn row_count(&self) -> usize {
        self.read().rows.len()
    }

    fn column_count(&self) -> usize {
        FolderColumn::ALL.len()
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ModelData {
        let (Some(column), Some(entry)) = (
            FolderColumn::from_index(index.column()),
            self.file_info_at(index.row()),
        ) else {
            return ModelData::None;
        };

        match role {
            ItemRole::Display => Self::display(&entry, column).into(),
            ItemRole::Icon if column == FolderColumn::Name => Self::icon_name(&entry).into(),
            ItemRole::ToolTip => entry.path().display().to_string().into(),
            ItemRole::Sort => match column {
                FolderColumn::Size => ModelData::Int(entry.metadata().size as i64),
                _ => Self::display(&entry, column).to_lowercase().into(),
            },
            ItemRole::FileInfo => ModelData::Custom(entry),
            _ => ModelData::None,
        }
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> ModelData {
        match (orientation, role, FolderColumn::from_index(section)) {
            (Orientation::Horizontal, ItemRole::Display, Some(column)) => column.title().into(),
            _ => ModelData::None,
        }
    }

    fn revision(&self) -> u64 {
        self.read().revision
    }
}

impl FolderModel for ProxyFolderModel {
    fn file_info(&self, index: &ModelIndex) -> Option<Arc<FileInfo>> {
        self.file_info_from_index(index)
    }
}
