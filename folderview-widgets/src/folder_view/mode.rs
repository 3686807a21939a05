use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// View mode for the folder view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Large icons with labels below, wrapping left to right.
    #[default]
    Icon,
    /// Small icons with labels on the right, one entry per line.
    Compact,
    /// Thumbnails in a wide grid.
    Thumbnail,
    /// One row per entry with name, size, date and type columns.
    DetailedList,
}

/// The kind of surface backing a view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceFamily {
    /// Grid/list surface, shared by Icon, Compact and Thumbnail.
    List,
    /// Hierarchical column surface, used by DetailedList only.
    Tree,
}

/// How a list surface arranges its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListViewMode {
    /// Icon above the label.
    Icon,
    /// Icon left of the label.
    List,
}

/// Direction in which a list surface lays out consecutive items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Fill a line from left to right, then continue below.
    LeftToRight,
    /// Fill a column from top to bottom, then continue to the right.
    TopToBottom,
}

/// Static per-mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeConfig {
    default_icon_size: (u32, u32),
    grid_size: (u32, u32),
    /// Icon or list arrangement.
    pub list_mode: ListViewMode,
    /// Pixels between items.
    pub spacing: u32,
    /// Whether labels may wrap onto several lines.
    pub word_wrap: bool,
    /// Whether items continue on a new line once the current one is full.
    pub wrapping: bool,
    /// Direction of the item flow.
    pub flow: Flow,
}

impl ModeConfig {
    /// Icon size used until the caller changes it.
    pub fn default_icon_size(&self) -> Vector2<u32> {
        Vector2::new(self.default_icon_size.0, self.default_icon_size.1)
    }

    /// Fixed cell size, or zero when items are sized by their delegate.
    pub fn grid_size(&self) -> Vector2<u32> {
        Vector2::new(self.grid_size.0, self.grid_size.1)
    }
}

/// Configuration for every mode, indexed by [ViewMode::index].
///
/// The DetailedList entry only contributes its icon size; the list layout
/// fields are not used by the tree surface.
pub static MODE_TABLE: [ModeConfig; ViewMode::COUNT] = [
    // Icon
    ModeConfig {
        default_icon_size: (48, 48),
        grid_size: (80, 100),
        list_mode: ListViewMode::Icon,
        spacing: 10,
        word_wrap: true,
        wrapping: true,
        flow: Flow::LeftToRight,
    },
    // Compact
    ModeConfig {
        default_icon_size: (24, 24),
        grid_size: (0, 0),
        list_mode: ListViewMode::List,
        spacing: 0,
        word_wrap: false,
        wrapping: false,
        flow: Flow::TopToBottom,
    },
    // Thumbnail
    ModeConfig {
        default_icon_size: (128, 128),
        grid_size: (160, 160),
        list_mode: ListViewMode::Icon,
        spacing: 0,
        word_wrap: true,
        wrapping: true,
        flow: Flow::LeftToRight,
    },
    // DetailedList
    ModeConfig {
        default_icon_size: (24, 24),
        grid_size: (0, 0),
        list_mode: ListViewMode::List,
        spacing: 0,
        word_wrap: false,
        wrapping: false,
        flow: Flow::TopToBottom,
    },
];

impl ViewMode {
    /// Number of view modes.
    pub const COUNT: usize = 4;

    /// Every mode, in table order.
    pub const ALL: [ViewMode; ViewMode::COUNT] = [
        ViewMode::Icon,
        ViewMode::Compact,
        ViewMode::Thumbnail,
        ViewMode::DetailedList,
    ];

    /// Position of the mode in [MODE_TABLE] and in icon size tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The mode at a table position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Like [ViewMode::from_index], for callers that already validated the value.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid mode; that is a caller bug.
    pub fn from_index_checked(index: usize) -> Self {
        assert!(index < Self::COUNT, "invalid view mode index {}", index);
        Self::ALL[index]
    }

    /// The surface family this mode needs.
    pub const fn family(self) -> SurfaceFamily {
        match self {
            ViewMode::DetailedList => SurfaceFamily::Tree,
            ViewMode::Icon | ViewMode::Compact | ViewMode::Thumbnail => SurfaceFamily::List,
        }
    }

    /// Static configuration of this mode.
    pub fn config(self) -> &'static ModeConfig {
        &MODE_TABLE[self.index()]
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Icon => "Icons",
            ViewMode::Compact => "Compact",
            ViewMode::Thumbnail => "Thumbnails",
            ViewMode::DetailedList => "Detailed List",
        }
    }
}

/// Icon size per view mode. Entries persist while their mode is inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSizeTable {
    sizes: [Vector2<u32>; ViewMode::COUNT],
}

impl Default for IconSizeTable {
    fn default() -> Self {
        Self {
            sizes: ViewMode::ALL.map(|mode| mode.config().default_icon_size()),
        }
    }
}

impl IconSizeTable {
    /// The icon size of `mode`.
    pub fn get(&self, mode: ViewMode) -> Vector2<u32> {
        self.sizes[mode.index()]
    }

    /// Change the icon size of `mode`.
    pub fn set(&mut self, mode: ViewMode, size: Vector2<u32>) {
        self.sizes[mode.index()] = size;
    }
}
