use folderview_core::kurbo::{Point, Rect, Size, Vec2};
use folderview_core::layout::SizePolicy;
use folderview_core::model::ModelIndex;
use folderview_core::selection::SelectionBehavior;
use folderview_core::widget::{Widget, WidgetId};
use folderview_services::filesystem::FILE_NAME_COLUMN;
use nalgebra::Vector2;

use super::mode::{Flow, ListViewMode, ModeConfig, SurfaceFamily, ViewMode};
use super::surface::{SurfaceCore, ViewSurface, FRAME_WIDTH};

/// Layout parameters of a [ListSurface], taken from the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Icon or list arrangement.
    pub view_mode: ListViewMode,
    /// Fixed cell size; zero lets the delegate size items.
    pub grid_size: Vector2<u32>,
    /// Pixels between items.
    pub spacing: u32,
    /// Whether labels wrap.
    pub word_wrap: bool,
    /// Whether the flow continues on a new line once a line is full.
    pub wrapping: bool,
    /// Direction of the flow.
    pub flow: Flow,
}

impl From<&ModeConfig> for ListOptions {
    fn from(config: &ModeConfig) -> Self {
        Self {
            view_mode: config.list_mode,
            grid_size: config.grid_size(),
            spacing: config.spacing,
            word_wrap: config.word_wrap,
            wrapping: config.wrapping,
            flow: config.flow,
        }
    }
}

/// Grid/list surface used by the Icon, Compact and Thumbnail modes.
///
/// Shows the file-name column only; every row of the model is one item.
pub struct ListSurface {
    core: SurfaceCore,
    options: ListOptions,
}

impl Default for ListSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSurface {
    /// Create a surface laid out like the Icon mode until configured otherwise.
    pub fn new() -> Self {
        Self {
            core: SurfaceCore::new(SelectionBehavior::Items),
            options: ViewMode::Icon.config().into(),
        }
    }

    /// Size of one item.
    pub fn item_size(&self) -> Size {
        match self.core.delegate(FILE_NAME_COLUMN) {
            Some(delegate) => delegate.size_hint(self.core.icon_size(), self.options.grid_size),
            None if self.options.grid_size.x > 0 && self.options.grid_size.y > 0 => Size::new(
                self.options.grid_size.x as f64,
                self.options.grid_size.y as f64,
            ),
            None => {
                let icon = self.core.icon_size();
                Size::new(icon.x as f64, icon.y as f64)
            },
        }
    }

    /// Items per line (or per column for a top-to-bottom flow). Always at least 1.
    fn items_per_line(&self, item: Size) -> usize {
        let spacing = self.options.spacing as f64;
        let viewport = self.viewport_rect().size();
        let (available, extent) = match self.options.flow {
            Flow::LeftToRight => (viewport.width, item.width),
            Flow::TopToBottom => (viewport.height, item.height),
        };
        (((available - spacing) / (extent + spacing)).floor().max(1.0)) as usize
    }

    /// Rectangle of `row` in content coordinates (viewport coordinates before scrolling).
    fn item_rect(&self, row: usize) -> Rect {
        let item = self.item_size();
        let spacing = self.options.spacing as f64;
        let step_x = item.width + spacing;
        let step_y = item.height + spacing;

        let (line, position) = if self.options.wrapping {
            let per_line = self.items_per_line(item);
            (row / per_line, row % per_line)
        } else {
            (0, row)
        };

        match self.options.flow {
            Flow::LeftToRight => Rect::from_origin_size(
                (spacing + position as f64 * step_x, spacing + line as f64 * step_y),
                item,
            ),
            Flow::TopToBottom if !self.options.wrapping && self.options.view_mode == ListViewMode::List => {
                // A single column of rows spans the whole viewport.
                let width = (self.viewport_rect().width() - spacing * 2.0).max(item.width);
                Rect::from_origin_size(
                    (spacing, spacing + position as f64 * step_y),
                    (width, item.height),
                )
            },
            Flow::TopToBottom => Rect::from_origin_size(
                (spacing + line as f64 * step_x, spacing + position as f64 * step_y),
                item,
            ),
        }
    }

    /// Size of the area covered by all items.
    pub fn content_size(&self) -> Size {
        let rows = self.core.row_count();
        if rows == 0 {
            return Size::ZERO;
        }
        let spacing = self.options.spacing as f64;
        let bounds = (0..rows).fold(Rect::ZERO, |acc, row| acc.union(self.item_rect(row)));
        Size::new(bounds.x1 + spacing, bounds.y1 + spacing)
    }
}

impl Widget for ListSurface {
    fn widget_id(&self) -> WidgetId {
        WidgetId::new("folderview-widgets", "ListSurface")
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.core.set_geometry(rect);
    }

    fn geometry(&self) -> Rect {
        self.core.geometry()
    }

    fn size_hint(&self) -> Size {
        Size::new(256.0, 192.0)
    }

    fn size_policy(&self) -> SizePolicy {
        SizePolicy::Expanding
    }
}

impl ViewSurface for ListSurface {
    fn core(&self) -> &SurfaceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SurfaceCore {
        &mut self.core
    }

    fn family(&self) -> SurfaceFamily {
        SurfaceFamily::List
    }

    fn viewport_rect(&self) -> Rect {
        let size = self.core.geometry().size();
        Rect::new(
            FRAME_WIDTH,
            FRAME_WIDTH,
            (size.width - FRAME_WIDTH).max(FRAME_WIDTH),
            (size.height - FRAME_WIDTH).max(FRAME_WIDTH),
        )
    }

    fn visual_rect(&self, index: &ModelIndex) -> Option<Rect> {
        if index.column() != FILE_NAME_COLUMN || index.row() >= self.core.row_count() {
            return None;
        }
        Some(self.item_rect(index.row()) - self.core.scroll())
    }

    fn index_at(&self, pos: Point) -> Option<ModelIndex> {
        let content = pos + self.core.scroll();
        (0..self.core.row_count())
            .find(|&row| self.item_rect(row).contains(content))
            .map(|row| ModelIndex::new(row, FILE_NAME_COLUMN))
    }

    fn apply_mode_config(&mut self, config: &ModeConfig) {
        self.options = config.into();
        // Item positions change with the layout; keep the origin in view.
        self.set_scroll_offset(Vec2::ZERO);
    }

    fn list_options(&self) -> Option<&ListOptions> {
        Some(&self.options)
    }
}
