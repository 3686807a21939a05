use std::any::Any;
use std::sync::Arc;

/// Role for data lookup in the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// The primary text to display (String)
    Display,
    /// The icon to display (usually an icon name)
    Icon,
    /// Tooltip text (String)
    ToolTip,
    /// Sort key (for sorting, defaults to Display)
    Sort,
    /// The file-system entry bound to a row, as a [ModelData::Custom] payload
    FileInfo,
    /// User defined role starting point
    User(u32),
}

/// Generic data variant for model data
#[derive(Debug, Clone)]
pub enum ModelData {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Custom(Arc<dyn Any + Send + Sync>),
    None,
}

impl ModelData {
    /// Returns the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ModelData::String(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast a [ModelData::Custom] payload to a concrete type.
    ///
    /// Returns `None` for any other variant or when the payload has another type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            ModelData::Custom(payload) => payload.clone().downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Returns true for [ModelData::None].
    pub fn is_none(&self) -> bool {
        matches!(self, ModelData::None)
    }
}

impl From<String> for ModelData {
    fn from(s: String) -> Self {
        ModelData::String(s)
    }
}

impl From<&str> for ModelData {
    fn from(s: &str) -> Self {
        ModelData::String(s.to_string())
    }
}

/// A (row, column) cell address inside an [ItemModel].
///
/// Indexes are plain values; a model hands out only indexes that are in range
/// at the time of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelIndex {
    row: usize,
    column: usize,
}

impl ModelIndex {
    /// Create an index. Prefer [ItemModel::index], which checks bounds.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The row of this index.
    pub const fn row(&self) -> usize {
        self.row
    }

    /// The column of this index.
    pub const fn column(&self) -> usize {
        self.column
    }

    /// The index of another column in the same row.
    pub const fn sibling(&self, column: usize) -> Self {
        Self::new(self.row, column)
    }
}

/// Trait defining a tabular data model for item views
pub trait ItemModel: Send + Sync {
    /// Number of rows in the model
    fn row_count(&self) -> usize;

    /// Number of columns in the model
    fn column_count(&self) -> usize;

    /// Get data for a specific index and role
    fn data(&self, index: &ModelIndex, role: ItemRole) -> ModelData;

    /// Get header data for a specific column
    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> ModelData {
        if role == ItemRole::Display && orientation == Orientation::Horizontal {
            ModelData::String(format!("Column {}", section))
        } else {
            ModelData::None
        }
    }

    /// Returns the index for `(row, column)`, or `None` when it is out of range.
    fn index(&self, row: usize, column: usize) -> Option<ModelIndex> {
        (row < self.row_count() && column < self.column_count())
            .then(|| ModelIndex::new(row, column))
    }

    /// Returns true if `index` addresses an existing cell.
    fn is_valid(&self, index: &ModelIndex) -> bool {
        self.index(index.row(), index.column()).is_some()
    }

    /// A counter bumped whenever rows are added, removed or reordered.
    ///
    /// Views compare it against the value seen at bind time to drop stale selections.
    fn revision(&self) -> u64 {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}
