use std::sync::atomic::{AtomicU64, Ordering};

use kurbo::Size;
use nalgebra::Vector2;

use super::mode::{ListViewMode, ModeConfig};

/// Height of one label line.
pub const LINE_HEIGHT: f64 = 16.0;
/// Space between an icon and its label.
pub const ICON_TEXT_GAP: f64 = 4.0;
/// Padding around an item.
pub const ITEM_PADDING: f64 = 2.0;
/// Narrowest label under an icon.
const MIN_ICON_LABEL_WIDTH: f64 = 64.0;
/// Label width reserved beside an icon when no grid is set.
const LIST_LABEL_WIDTH: f64 = 160.0;

static NEXT_DELEGATE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a delegate instance.
pub type DelegateId = u64;

/// Sizes the file-name cell of a folder view item.
///
/// A fresh delegate is installed every time a surface is (re)configured, so
/// its settings always match the active mode.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderItemDelegate {
    id: DelegateId,
    list_mode: ListViewMode,
    word_wrap: bool,
}

impl FolderItemDelegate {
    /// Create a delegate for the given mode configuration.
    pub fn new(config: &ModeConfig) -> Self {
        Self {
            id: NEXT_DELEGATE_ID.fetch_add(1, Ordering::Relaxed),
            list_mode: config.list_mode,
            word_wrap: config.word_wrap,
        }
    }

    /// Unique id of this instance.
    pub fn id(&self) -> DelegateId {
        self.id
    }

    /// Whether labels wrap.
    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    /// Number of label lines an item reserves.
    pub fn label_lines(&self) -> u32 {
        match (self.list_mode, self.word_wrap) {
            (ListViewMode::Icon, true) => 2,
            _ => 1,
        }
    }

    /// Size of one item. A non-zero `grid_size` wins over the computed size.
    pub fn size_hint(&self, icon_size: Vector2<u32>, grid_size: Vector2<u32>) -> Size {
        if grid_size.x > 0 && grid_size.y > 0 {
            return Size::new(grid_size.x as f64, grid_size.y as f64);
        }

        let icon_w = icon_size.x as f64;
        let icon_h = icon_size.y as f64;
        let text_h = LINE_HEIGHT * self.label_lines() as f64;
        match self.list_mode {
            ListViewMode::Icon => Size::new(
                icon_w.max(MIN_ICON_LABEL_WIDTH) + ITEM_PADDING * 2.0,
                icon_h + ICON_TEXT_GAP + text_h + ITEM_PADDING * 2.0,
            ),
            ListViewMode::List => Size::new(
                icon_w + ICON_TEXT_GAP + LIST_LABEL_WIDTH + ITEM_PADDING * 2.0,
                icon_h.max(text_h) + ITEM_PADDING * 2.0,
            ),
        }
    }
}
