use std::collections::HashMap;

use folderview_core::kurbo::{Point, Rect, Size};
use folderview_core::layout::SizePolicy;
use folderview_core::model::{ModelIndex, Orientation, ItemRole};
use folderview_core::selection::SelectionBehavior;
use folderview_core::widget::{Widget, WidgetId};

use super::delegate::{ITEM_PADDING, LINE_HEIGHT};
use super::mode::SurfaceFamily;
use super::surface::{SurfaceCore, ViewSurface, FRAME_WIDTH};

/// Height of the column header.
pub const HEADER_HEIGHT: f64 = 24.0;
/// Width of a column nobody resized.
pub const DEFAULT_SECTION_SIZE: f64 = 100.0;
/// The stretched first column never gets narrower than this.
pub const MIN_FIRST_SECTION_SIZE: f64 = 120.0;

/// Display options of a [TreeSurface].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Whether rows can be expanded. Folder listings are flat.
    pub items_expandable: bool,
    /// Whether top-level rows get an expand arrow.
    pub root_is_decorated: bool,
    /// Whether the focus frame spans all columns.
    pub all_columns_show_focus: bool,
    /// Whether the first column takes the width the others leave.
    pub stretch_first_section: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            items_expandable: false,
            root_is_decorated: false,
            all_columns_show_focus: false,
            stretch_first_section: true,
        }
    }
}

/// Column surface used by the DetailedList mode.
///
/// Clicks select whole rows. The header sits above the viewport, so the
/// viewport origin is offset by [HEADER_HEIGHT].
pub struct TreeSurface {
    core: SurfaceCore,
    options: TreeOptions,
    section_sizes: HashMap<usize, f64>,
}

impl Default for TreeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeSurface {
    /// Create a flat, row-selecting tree surface.
    pub fn new() -> Self {
        Self {
            core: SurfaceCore::new(SelectionBehavior::Rows),
            options: TreeOptions::default(),
            section_sizes: HashMap::new(),
        }
    }

    /// Resize a column. The first column ignores this while it stretches.
    pub fn set_section_size(&mut self, column: usize, width: f64) {
        self.section_sizes.insert(column, width.max(0.0));
    }

    /// Current width of `column`.
    pub fn section_size(&self, column: usize) -> f64 {
        if column == 0 && self.options.stretch_first_section {
            let others: f64 = (1..self.core.column_count())
                .map(|column| self.fixed_section_size(column))
                .sum();
            return (self.viewport_rect().width() - others).max(MIN_FIRST_SECTION_SIZE);
        }
        self.fixed_section_size(column)
    }

    fn fixed_section_size(&self, column: usize) -> f64 {
        self.section_sizes.get(&column).copied().unwrap_or(DEFAULT_SECTION_SIZE)
    }

    fn section_position(&self, column: usize) -> f64 {
        (0..column).map(|column| self.section_size(column)).sum()
    }

    /// Height of every row.
    pub fn row_height(&self) -> f64 {
        (self.core.icon_size().y as f64).max(LINE_HEIGHT) + ITEM_PADDING * 2.0
    }

    /// Header titles, as provided by the model.
    pub fn header_titles(&self) -> Vec<String> {
        let Some(model) = self.model() else {
            return Vec::new();
        };
        (0..model.column_count())
            .map(|section| {
                model
                    .header_data(section, Orientation::Horizontal, ItemRole::Display)
                    .as_str()
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    /// Display options.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }
}

impl Widget for TreeSurface {
    fn widget_id(&self) -> WidgetId {
        WidgetId::new("folderview-widgets", "TreeSurface")
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.core.set_geometry(rect);
    }

    fn geometry(&self) -> Rect {
        self.core.geometry()
    }

    fn size_hint(&self) -> Size {
        let width = MIN_FIRST_SECTION_SIZE
            + (1..self.core.column_count().max(1))
                .map(|column| self.fixed_section_size(column))
                .sum::<f64>();
        Size::new(
            width + FRAME_WIDTH * 2.0,
            HEADER_HEIGHT + self.row_height() * 8.0 + FRAME_WIDTH * 2.0,
        )
    }

    fn size_policy(&self) -> SizePolicy {
        SizePolicy::Expanding
    }
}

impl ViewSurface for TreeSurface {
    fn core(&self) -> &SurfaceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SurfaceCore {
        &mut self.core
    }

    fn family(&self) -> SurfaceFamily {
        SurfaceFamily::Tree
    }

    fn viewport_rect(&self) -> Rect {
        let size = self.core.geometry().size();
        let top = FRAME_WIDTH + HEADER_HEIGHT;
        Rect::new(
            FRAME_WIDTH,
            top,
            (size.width - FRAME_WIDTH).max(FRAME_WIDTH),
            (size.height - FRAME_WIDTH).max(top),
        )
    }

    fn visual_rect(&self, index: &ModelIndex) -> Option<Rect> {
        if index.row() >= self.core.row_count() || index.column() >= self.core.column_count() {
            return None;
        }
        let row_height = self.row_height();
        let rect = Rect::from_origin_size(
            (
                self.section_position(index.column()),
                index.row() as f64 * row_height,
            ),
            (self.section_size(index.column()), row_height),
        );
        Some(rect - self.core.scroll())
    }

    fn index_at(&self, pos: Point) -> Option<ModelIndex> {
        let content = pos + self.core.scroll();
        if content.x < 0.0 || content.y < 0.0 {
            return None;
        }

        let row = (content.y / self.row_height()).floor() as usize;
        if row >= self.core.row_count() {
            return None;
        }

        let mut right = 0.0;
        for column in 0..self.core.column_count() {
            right += self.section_size(column);
            if content.x < right {
                return Some(ModelIndex::new(row, column));
            }
        }
        None
    }

    fn tree_options(&self) -> Option<&TreeOptions> {
        Some(&self.options)
    }
}
