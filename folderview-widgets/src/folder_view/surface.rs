//! The rendering surfaces a folder view switches between.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use folderview_core::input::{KeyEvent, PointerEvent};
use folderview_core::kurbo::{Point, Rect, Vec2};
use folderview_core::model::ModelIndex;
use folderview_core::selection::{
    ItemSelectionModel, SelectionBehavior, SelectionFlags, SelectionMode,
};
use folderview_core::widget::Widget;
use folderview_core::window::{ElementState, Key, ModifiersState, MouseButton, NamedKey};
use folderview_services::filesystem::{FileInfo, FolderModel, FILE_NAME_COLUMN};
use nalgebra::Vector2;
use tokio::sync::mpsc::UnboundedSender;

use super::delegate::FolderItemDelegate;
use super::list_surface::ListOptions;
use super::mode::{ModeConfig, SurfaceFamily};
use super::tree_surface::TreeOptions;

/// A folder model shared between the view and its surface.
pub type SharedModel = Arc<dyn FolderModel>;

/// Identity of a surface instance. Never reused within a process.
pub type SurfaceId = u64;

/// Maximum delay between two presses on the same item to count as a double click.
pub const DEFAULT_DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(400);

/// Width of the frame drawn around a surface's viewport.
pub const FRAME_WIDTH: f64 = 1.0;

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Low-level events a surface reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// An item was activated (double click or Enter).
    Activated(ModelIndex),
    /// A pointer button was pressed. The position is surface-local.
    PointerPressed(PointerEvent),
}

/// Whether a surface opens a context menu of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextMenuPolicy {
    /// The surface handles context menu requests itself.
    #[default]
    Default,
    /// Requests are left to the containing widget.
    NoContextMenu,
}

/// Drag and drop capabilities of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragDropMode {
    /// Neither drag nor drop.
    #[default]
    NoDragDrop,
    /// Items can be dragged out.
    DragOnly,
    /// Items can be dropped in.
    DropOnly,
    /// Both.
    DragDrop,
}

impl DragDropMode {
    fn from_flags(drag: bool, drop: bool) -> Self {
        match (drag, drop) {
            (false, false) => DragDropMode::NoDragDrop,
            (true, false) => DragDropMode::DragOnly,
            (false, true) => DragDropMode::DropOnly,
            (true, true) => DragDropMode::DragDrop,
        }
    }
}

fn same_model(a: &SharedModel, b: &SharedModel) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// The entry of every row, in row order.
fn row_entries(model: &SharedModel) -> Vec<Option<Arc<FileInfo>>> {
    (0..model.row_count())
        .map(|row| model.file_info(&ModelIndex::new(row, FILE_NAME_COLUMN)))
        .collect()
}

fn rows_by_path(entries: &[Option<Arc<FileInfo>>]) -> HashMap<&Path, usize> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(row, entry)| entry.as_ref().map(|entry| (entry.path(), row)))
        .collect()
}

/// State and behavior shared by every surface variant.
pub struct SurfaceCore {
    id: SurfaceId,
    model: Option<SharedModel>,
    model_revision: u64,
    /// Entries of the rows the selection refers to, as of `model_revision`.
    entries: Vec<Option<Arc<FileInfo>>>,
    icon_size: Vector2<u32>,
    selection: ItemSelectionModel,
    selection_mode: SelectionMode,
    selection_behavior: SelectionBehavior,
    delegates: HashMap<usize, FolderItemDelegate>,
    drag_enabled: bool,
    accept_drops: bool,
    context_menu_policy: ContextMenuPolicy,
    geometry: Rect,
    scroll: Vec2,
    events: Option<UnboundedSender<SurfaceEvent>>,
    last_click: Option<(Instant, ModelIndex)>,
    double_click_interval: Duration,
}

impl SurfaceCore {
    /// Create the state of a new surface with a fresh id.
    pub fn new(selection_behavior: SelectionBehavior) -> Self {
        Self {
            id: NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed),
            model: None,
            model_revision: 0,
            entries: Vec::new(),
            icon_size: Vector2::new(24, 24),
            selection: ItemSelectionModel::default(),
            selection_mode: SelectionMode::Single,
            selection_behavior,
            delegates: HashMap::new(),
            drag_enabled: false,
            accept_drops: false,
            context_menu_policy: ContextMenuPolicy::Default,
            geometry: Rect::ZERO,
            scroll: Vec2::ZERO,
            events: None,
            last_click: None,
            double_click_interval: DEFAULT_DOUBLE_CLICK_INTERVAL,
        }
    }

    /// Number of rows of the bound model, 0 without one.
    pub fn row_count(&self) -> usize {
        self.model.as_ref().map_or(0, |model| model.row_count())
    }

    /// Number of columns of the bound model, 0 without one.
    pub fn column_count(&self) -> usize {
        self.model.as_ref().map_or(0, |model| model.column_count())
    }

    /// The delegate installed for `column`.
    pub fn delegate(&self, column: usize) -> Option<&FolderItemDelegate> {
        self.delegates.get(&column)
    }

    /// Current icon size.
    pub fn icon_size(&self) -> Vector2<u32> {
        self.icon_size
    }

    /// Current scroll offset of the viewport.
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Rectangle in the parent's coordinates.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub(crate) fn set_geometry(&mut self, rect: Rect) {
        self.geometry = rect;
    }

    /// Bind a model. Binding the model that is already bound keeps the selection.
    pub(crate) fn set_model(&mut self, model: Option<SharedModel>) {
        if let (Some(current), Some(new)) = (&self.model, &model) {
            if same_model(current, new) {
                return;
            }
        }
        self.model = model;
        self.model_revision = self.model.as_ref().map_or(0, |model| model.revision());
        self.entries = self.model.as_ref().map(row_entries).unwrap_or_default();
        self.selection.reset(self.row_count(), self.column_count());
        self.last_click = None;
    }

    /// Route low-level events to `sender`. The surface owns the sender, so
    /// dropping the surface disconnects it.
    pub(crate) fn connect_events(&mut self, sender: UnboundedSender<SurfaceEvent>) {
        self.events = Some(sender);
    }

    /// Returns true if the model changed since the selection was last
    /// reconciled with it. Selection rows then refer to the old row order.
    pub fn is_stale(&self) -> bool {
        self.model.as_ref().is_some_and(|model| {
            model.revision() != self.model_revision
                || model.row_count() != self.selection.row_count()
                || model.column_count() != self.selection.column_count()
        })
    }

    /// Translate indexes taken from the selection into the model's current rows.
    ///
    /// Every index follows the entry its row showed when the selection was
    /// last reconciled. Indexes whose entry is gone are dropped.
    pub fn live_indexes(&self, indexes: Vec<ModelIndex>) -> Vec<ModelIndex> {
        let Some(model) = &self.model else {
            return Vec::new();
        };
        if !self.is_stale() {
            return indexes;
        }
        let current = row_entries(model);
        let rows = rows_by_path(&current);
        let columns = model.column_count();
        indexes
            .into_iter()
            .filter_map(|index| {
                let entry = self.entries.get(index.row())?.as_ref()?;
                let row = *rows.get(entry.path())?;
                (index.column() < columns).then(|| ModelIndex::new(row, index.column()))
            })
            .collect()
    }

    /// Move the selection to the rows its entries occupy now. Entries that
    /// left the model drop out of the selection.
    fn sync_model(&mut self) -> bool {
        if !self.is_stale() {
            return false;
        }
        let Some(model) = &self.model else {
            return false;
        };
        let revision = model.revision();
        let current = row_entries(model);
        let (rows, columns) = (current.len(), model.column_count());
        let new_rows = rows_by_path(&current);
        let old = &self.entries;
        self.selection.remap_rows(rows, columns, |row| {
            let entry = old.get(row)?.as_ref()?;
            new_rows.get(entry.path()).copied()
        });
        log::debug!(
            "Surface {}: model changed, {} selected cells kept",
            self.id,
            self.selection.selected_indexes().len()
        );
        self.model_revision = revision;
        self.entries = current;
        self.last_click = None;
        true
    }

    fn send(&self, event: SurfaceEvent) {
        if let Some(events) = &self.events {
            if events.send(event).is_err() {
                log::trace!("Surface {}: owner is gone, event dropped", self.id);
            }
        }
    }

    fn row_flags(&self) -> SelectionFlags {
        match self.selection_behavior {
            SelectionBehavior::Rows => SelectionFlags::ROWS,
            SelectionBehavior::Items => SelectionFlags::empty(),
        }
    }

    fn select_on_press(&mut self, index: Option<ModelIndex>, modifiers: ModifiersState) {
        let rows = self.row_flags();
        let ctrl = modifiers.control_key();
        match (self.selection_mode, index) {
            (SelectionMode::None, target) => self.selection.set_current_index(target),
            (_, None) => {
                // Clicking empty space drops the selection unless Ctrl is held.
                if !ctrl {
                    self.selection.clear_selection();
                }
            },
            (SelectionMode::Single, Some(target)) => {
                self.selection.select(target, SelectionFlags::CLEAR_AND_SELECT | SelectionFlags::CURRENT | rows);
            },
            (SelectionMode::Multi, Some(target)) => {
                self.selection.select(target, SelectionFlags::TOGGLE | SelectionFlags::CURRENT | rows);
            },
            (SelectionMode::Extended, Some(target)) => {
                if let Some(anchor) = self.selection.anchor().filter(|_| modifiers.shift_key()) {
                    let base = if ctrl {
                        SelectionFlags::SELECT
                    } else {
                        SelectionFlags::CLEAR_AND_SELECT
                    };
                    self.selection.select_range(anchor, target, base | SelectionFlags::CURRENT | rows);
                } else if ctrl {
                    self.selection.select(target, SelectionFlags::TOGGLE | SelectionFlags::CURRENT | rows);
                } else {
                    self.selection.select(target, SelectionFlags::CLEAR_AND_SELECT | SelectionFlags::CURRENT | rows);
                }
            },
        }
    }

    fn is_double_click(&self, index: ModelIndex, time: Instant) -> bool {
        match self.last_click {
            Some((last_time, last_index)) => {
                last_index.row() == index.row()
                    && time.saturating_duration_since(last_time) <= self.double_click_interval
            },
            None => false,
        }
    }

    fn press(&mut self, index: Option<ModelIndex>, event: &PointerEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        self.sync_model();

        let mut activated = None;
        if event.button == MouseButton::Left {
            self.select_on_press(index, event.modifiers);
            match index {
                Some(index) if self.is_double_click(index, event.time) => {
                    self.last_click = None;
                    activated = Some(index);
                },
                _ => self.last_click = index.map(|index| (event.time, index)),
            }
        }

        self.send(SurfaceEvent::PointerPressed(event.clone()));
        if let Some(index) = activated {
            self.send(SurfaceEvent::Activated(index));
        }
    }

    fn select_all(&mut self) {
        if matches!(self.selection_mode, SelectionMode::None | SelectionMode::Single) {
            return;
        }
        match self.selection_behavior {
            SelectionBehavior::Rows => self.selection.select_all(),
            SelectionBehavior::Items => {
                let rows = self.selection.row_count();
                if rows > 0 {
                    self.selection.select_range(
                        ModelIndex::new(0, 0),
                        ModelIndex::new(rows - 1, 0),
                        SelectionFlags::CLEAR_AND_SELECT,
                    );
                }
            },
        }
    }

    fn key_press(&mut self, event: &KeyEvent) {
        self.sync_model();
        match &event.key {
            Key::Named(NamedKey::Enter) => {
                if let Some(current) = self.selection.current_index() {
                    self.send(SurfaceEvent::Activated(current));
                }
            },
            Key::Named(NamedKey::Escape) => self.selection.clear_selection(),
            Key::Character(text) if event.modifiers.control_key() && text.eq_ignore_ascii_case("a") => {
                self.select_all();
            },
            _ => {},
        }
    }
}

/// A rendering surface showing the rows of a [FolderModel].
///
/// Two variants exist: [ListSurface](super::list_surface::ListSurface) for
/// the grid/list modes and [TreeSurface](super::tree_surface::TreeSurface)
/// for the detailed list. The owning view talks to either one through this
/// trait and receives their low-level events on a channel it connects
/// when the surface is created. Model binding and event wiring stay with
/// the owner; this trait does not expose them.
///
/// Three coordinate spaces are involved: the parent's, the surface's own
/// (origin at [Widget::geometry]'s top-left) and the viewport's (origin at
/// [ViewSurface::viewport_rect]'s top-left, before scrolling).
pub trait ViewSurface: Widget {
    /// Shared state.
    fn core(&self) -> &SurfaceCore;

    /// Shared state, mutably.
    fn core_mut(&mut self) -> &mut SurfaceCore;

    /// Which family this surface belongs to.
    fn family(&self) -> SurfaceFamily;

    /// The viewport, in surface coordinates.
    fn viewport_rect(&self) -> Rect;

    /// Where `index` is drawn, in viewport coordinates. `None` if it is not shown.
    fn visual_rect(&self, index: &ModelIndex) -> Option<Rect>;

    /// The item under a viewport position.
    fn index_at(&self, pos: Point) -> Option<ModelIndex>;

    /// Apply mode-specific layout parameters. Surfaces without such parameters ignore them.
    fn apply_mode_config(&mut self, _config: &ModeConfig) {}

    /// Layout parameters of a list surface.
    fn list_options(&self) -> Option<&ListOptions> {
        None
    }

    /// Display options of a tree surface.
    fn tree_options(&self) -> Option<&TreeOptions> {
        None
    }

    /// Identity of this instance.
    fn id(&self) -> SurfaceId {
        self.core().id
    }

    /// The bound model.
    fn model(&self) -> Option<&SharedModel> {
        self.core().model.as_ref()
    }

    /// Change the icon size.
    fn set_icon_size(&mut self, size: Vector2<u32>) {
        self.core_mut().icon_size = size;
    }

    /// Current icon size.
    fn icon_size(&self) -> Vector2<u32> {
        self.core().icon_size
    }

    /// Change how many items the user may select.
    fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.core_mut().selection_mode = mode;
    }

    /// How many items the user may select.
    fn selection_mode(&self) -> SelectionMode {
        self.core().selection_mode
    }

    /// Whether clicks select cells or rows.
    fn selection_behavior(&self) -> SelectionBehavior {
        self.core().selection_behavior
    }

    /// Install `delegate` for `column`, replacing any previous one.
    fn set_item_delegate_for_column(&mut self, column: usize, delegate: FolderItemDelegate) {
        self.core_mut().delegates.insert(column, delegate);
    }

    /// The delegate installed for `column`.
    fn item_delegate_for_column(&self, column: usize) -> Option<&FolderItemDelegate> {
        self.core().delegate(column)
    }

    /// Allow dragging items out.
    fn set_drag_enabled(&mut self, enabled: bool) {
        self.core_mut().drag_enabled = enabled;
    }

    /// Whether items can be dragged out.
    fn drag_enabled(&self) -> bool {
        self.core().drag_enabled
    }

    /// Allow dropping onto the surface.
    fn set_accept_drops(&mut self, accept: bool) {
        self.core_mut().accept_drops = accept;
    }

    /// Whether drops are accepted.
    fn accept_drops(&self) -> bool {
        self.core().accept_drops
    }

    /// Combined drag and drop capabilities.
    fn drag_drop_mode(&self) -> DragDropMode {
        DragDropMode::from_flags(self.drag_enabled(), self.accept_drops())
    }

    /// Decide who handles context menu requests.
    fn set_context_menu_policy(&mut self, policy: ContextMenuPolicy) {
        self.core_mut().context_menu_policy = policy;
    }

    /// Who handles context menu requests.
    fn context_menu_policy(&self) -> ContextMenuPolicy {
        self.core().context_menu_policy
    }

    /// Change the double click interval.
    fn set_double_click_interval(&mut self, interval: Duration) {
        self.core_mut().double_click_interval = interval;
    }

    /// The selection state.
    fn selection(&self) -> &ItemSelectionModel {
        &self.core().selection
    }

    /// The selection state, mutably.
    fn selection_mut(&mut self) -> &mut ItemSelectionModel {
        &mut self.core_mut().selection
    }

    /// Deselect everything.
    fn clear_selection(&mut self) {
        self.core_mut().selection.clear_selection();
    }

    /// Select every item the surface shows.
    fn select_all(&mut self) {
        let core = self.core_mut();
        core.sync_model();
        core.select_all();
    }

    /// Scroll the viewport so content at `offset` is at its top-left corner.
    fn set_scroll_offset(&mut self, offset: Vec2) {
        self.core_mut().scroll = Vec2::new(offset.x.max(0.0), offset.y.max(0.0));
    }

    /// Current scroll offset.
    fn scroll_offset(&self) -> Vec2 {
        self.core().scroll
    }

    /// Map a point from the parent's coordinates to the surface's.
    fn map_from_parent(&self, pos: Point) -> Point {
        pos - self.geometry().origin().to_vec2()
    }

    /// Map a point from the surface's coordinates to the parent's.
    fn map_to_parent(&self, pos: Point) -> Point {
        pos + self.geometry().origin().to_vec2()
    }

    /// Map a point from the surface's coordinates to the viewport's.
    fn map_to_viewport(&self, pos: Point) -> Point {
        pos - self.viewport_rect().origin().to_vec2()
    }

    /// Handle a pointer press at a surface-local position.
    ///
    /// Left presses update the selection and detect double clicks; every
    /// press is then forwarded to the owner.
    fn mouse_press_event(&mut self, event: &PointerEvent) {
        let index = if self.viewport_rect().contains(event.position) {
            self.index_at(self.map_to_viewport(event.position))
        } else {
            None
        };
        self.core_mut().press(index, event);
    }

    /// Handle a key press.
    fn key_press_event(&mut self, event: &KeyEvent) {
        self.core_mut().key_press(event);
    }

    /// Reconcile the selection with the model. Returns true if the model had changed.
    fn sync_model(&mut self) -> bool {
        self.core_mut().sync_model()
    }
}
