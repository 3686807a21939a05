//! A file listing that switches between icon, compact, thumbnail and
//! detailed presentations.
//!
//! [FolderView] owns exactly one rendering surface at a time. Modes that
//! share the grid/list surface reuse it; crossing into or out of the
//! detailed list replaces it. Low-level surface events arrive on a channel
//! owned by the current surface and are turned into [FolderViewEvent]s
//! published to every subscriber.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use folderview_core::input::{KeyEvent, PointerEvent};
use folderview_core::kurbo::{Point, Rect, Size};
use folderview_core::layout::{BoxLayout, SizePolicy};
use folderview_core::model::ModelIndex;
use folderview_core::selection::{ItemSelectionModel, SelectionMode};
use folderview_core::update::Update;
use folderview_core::widget::{Widget, WidgetId};
use folderview_core::window::{ElementState, MouseButton};
use folderview_services::filesystem::{FileInfo, FILE_NAME_COLUMN};
use nalgebra::Vector2;
use tokio::sync::{broadcast, mpsc};

pub mod clicks;
/// Contains the [delegate::FolderItemDelegate].
pub mod delegate;
/// Contains the [list_surface::ListSurface].
pub mod list_surface;
/// Contains [mode::ViewMode] and the per-mode configuration table.
pub mod mode;
/// Contains the `[folder_view]` settings section.
pub mod settings;
pub mod surface;
/// Contains the [tree_surface::TreeSurface].
pub mod tree_surface;

pub use clicks::{ClickType, EmptySpaceContextPolicy, FolderViewEvent};
pub use delegate::FolderItemDelegate;
pub use list_surface::{ListOptions, ListSurface};
pub use mode::{Flow, IconSizeTable, ListViewMode, ModeConfig, SurfaceFamily, ViewMode, MODE_TABLE};
pub use settings::{FolderViewSettings, IconSizeSettings};
pub use surface::{
    ContextMenuPolicy, DragDropMode, SharedModel, SurfaceEvent, SurfaceId, ViewSurface,
    DEFAULT_DOUBLE_CLICK_INTERVAL,
};
pub use tree_surface::{TreeOptions, TreeSurface};

/// Capacity of the notification channel. Slow subscribers lag past this.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// The folder view widget.
pub struct FolderView {
    mode: ViewMode,
    surface: Option<Box<dyn ViewSurface>>,
    model: Option<SharedModel>,
    icon_sizes: IconSizeTable,
    grid_size: Vector2<u32>,
    layout: BoxLayout,
    geometry: Rect,
    surface_events: Option<mpsc::UnboundedReceiver<SurfaceEvent>>,
    events: broadcast::Sender<FolderViewEvent>,
    empty_space_policy: EmptySpaceContextPolicy,
    double_click_interval: Duration,
}

impl Default for FolderView {
    fn default() -> Self {
        Self::new(ViewMode::default())
    }
}

impl FolderView {
    /// Create a view in `mode`, without a model.
    pub fn new(mode: ViewMode) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut view = Self {
            mode,
            surface: None,
            model: None,
            icon_sizes: IconSizeTable::default(),
            grid_size: Vector2::zeros(),
            layout: BoxLayout::new(0.0),
            geometry: Rect::ZERO,
            surface_events: None,
            events,
            empty_space_policy: EmptySpaceContextPolicy::default(),
            double_click_interval: DEFAULT_DOUBLE_CLICK_INTERVAL,
        };
        view.recreate_surface();
        view.configure_surface();
        view
    }

    /// Create a view configured from `settings`, starting in its default mode.
    pub fn with_settings(settings: &FolderViewSettings) -> Self {
        let mut view = Self::new(settings.default_mode);
        view.apply_settings(settings);
        view
    }

    /// Switch the presentation.
    ///
    /// Switching to the current mode does nothing. The surface is replaced
    /// only when the mode crosses into or out of [ViewMode::DetailedList];
    /// in that case the selection does not survive.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.mode {
            return;
        }

        let from = self.mode;
        let recreate = self
            .surface
            .as_ref()
            .map_or(true, |surface| surface.family() != mode.family());

        log::debug!(
            "FolderView: {} -> {} ({})",
            from.label(),
            mode.label(),
            if recreate { "new surface" } else { "reusing surface" }
        );

        self.mode = mode;
        if recreate {
            self.recreate_surface();
        }
        self.configure_surface();

        self.emit(FolderViewEvent::ViewModeChanged {
            from,
            to: mode,
            surface_recreated: recreate,
        });
    }

    /// The current presentation.
    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    /// Change the icon size used by `mode`. Applies immediately if `mode` is active.
    pub fn set_icon_size(&mut self, mode: ViewMode, size: Vector2<u32>) {
        self.icon_sizes.set(mode, size);
        if mode == self.mode {
            if let Some(surface) = self.surface.as_deref_mut() {
                surface.set_icon_size(size);
            }
        }
    }

    /// The icon size used by `mode`, whether it is active or not.
    pub fn icon_size(&self, mode: ViewMode) -> Vector2<u32> {
        self.icon_sizes.get(mode)
    }

    /// Store a grid size. Surfaces take their grid from the mode table, so
    /// this value is kept for callers only.
    pub fn set_grid_size(&mut self, size: Vector2<u32>) {
        self.grid_size = size;
    }

    /// The stored grid size.
    pub fn grid_size(&self) -> Vector2<u32> {
        self.grid_size
    }

    /// Install a model, releasing the previous one. Passing the installed
    /// model again keeps the selection.
    pub fn set_model(&mut self, model: Option<SharedModel>) {
        let unchanged = match (&self.model, &model) {
            (Some(current), Some(new)) => Arc::ptr_eq(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        if let Some(surface) = self.surface.as_deref_mut() {
            surface.core_mut().set_model(model.clone());
        }
        // The old model goes away here, after the surface let go of it.
        self.model = model;
        log::debug!("FolderView: model {}", if self.model.is_some() { "installed" } else { "removed" });
        self.emit(FolderViewEvent::ModelChanged);
    }

    /// The installed model.
    pub fn model(&self) -> Option<&SharedModel> {
        self.model.as_ref()
    }

    /// The active surface.
    pub fn child_view(&self) -> Option<&dyn ViewSurface> {
        self.surface.as_deref()
    }

    /// The active surface, mutably. The model stays the one set through
    /// [FolderView::set_model].
    pub fn child_view_mut(&mut self) -> Option<&mut (dyn ViewSurface + 'static)> {
        self.surface.as_deref_mut()
    }

    /// Selection state of the active surface.
    ///
    /// Its rows are those of the model as of the last [Widget::update] or
    /// input event. The `selected_*` queries below account for changes since.
    pub fn selection_model(&self) -> Option<&ItemSelectionModel> {
        self.surface.as_deref().map(|surface| surface.selection())
    }

    /// Every selected cell, in the model's current rows.
    pub fn selected_indexes(&self) -> Vec<ModelIndex> {
        self.surface
            .as_deref()
            .map(|surface| surface.core().live_indexes(surface.selection().selected_indexes()))
            .unwrap_or_default()
    }

    /// One index per selected row, in `column`, in the model's current rows.
    pub fn selected_rows(&self, column: usize) -> Vec<ModelIndex> {
        self.surface
            .as_deref()
            .map(|surface| surface.core().live_indexes(surface.selection().selected_rows(column)))
            .unwrap_or_default()
    }

    /// The detailed list selects rows, the other modes select cells.
    fn selection_targets(&self) -> Vec<ModelIndex> {
        match self.mode.family() {
            SurfaceFamily::Tree => self.selected_rows(FILE_NAME_COLUMN),
            SurfaceFamily::List => self.selected_indexes(),
        }
    }

    /// Entries of the selection, in selection order. Empty without a model.
    ///
    /// The selection follows its entries when the model is re-sorted or
    /// changed; entries removed from the model are no longer reported.
    pub fn selected_files(&self) -> Vec<Arc<FileInfo>> {
        let Some(model) = &self.model else {
            return Vec::new();
        };
        self.selection_targets()
            .iter()
            .filter_map(|index| model.file_info(index))
            .collect()
    }

    /// Paths of [FolderView::selected_files].
    pub fn selected_file_paths(&self) -> Vec<PathBuf> {
        self.selected_files()
            .iter()
            .map(|file| file.path().to_path_buf())
            .collect()
    }

    /// Select every entry.
    pub fn select_all(&mut self) {
        if let Some(surface) = self.surface.as_deref_mut() {
            surface.select_all();
        }
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        if let Some(surface) = self.surface.as_deref_mut() {
            surface.clear_selection();
        }
    }

    /// Not supported. The selection is left as is.
    pub fn invert_selection(&mut self) {
        log::debug!("FolderView: invert_selection is not supported");
    }

    /// Subscribe to click, mode and model notifications.
    pub fn subscribe_events(&self) -> broadcast::Receiver<FolderViewEvent> {
        self.events.subscribe()
    }

    /// What a context menu over empty space does to the selection.
    pub fn set_empty_space_policy(&mut self, policy: EmptySpaceContextPolicy) {
        self.empty_space_policy = policy;
    }

    /// See [FolderView::set_empty_space_policy].
    pub fn empty_space_policy(&self) -> EmptySpaceContextPolicy {
        self.empty_space_policy
    }

    /// Change the double click interval of the active and future surfaces.
    pub fn set_double_click_interval(&mut self, interval: Duration) {
        self.double_click_interval = interval;
        if let Some(surface) = self.surface.as_deref_mut() {
            surface.set_double_click_interval(interval);
        }
    }

    /// Apply icon sizes, click handling and timing from `settings`.
    ///
    /// The view mode is left alone; [FolderViewSettings::default_mode] only
    /// applies to views built with [FolderView::with_settings].
    pub fn apply_settings(&mut self, settings: &FolderViewSettings) {
        settings.icon_sizes.apply_to(&mut self.icon_sizes);
        self.empty_space_policy = settings.empty_space_context_menu;
        self.set_double_click_interval(settings.double_click_interval());

        let size = self.icon_sizes.get(self.mode);
        if let Some(surface) = self.surface.as_deref_mut() {
            surface.set_icon_size(size);
        }
    }

    /// Resize the view, keeping its position.
    pub fn resize(&mut self, size: Size) {
        self.set_geometry(Rect::from_origin_size(self.geometry.origin(), size));
    }

    /// Feed a pointer event at a view-local position.
    ///
    /// Presses go to the surface. A right press also requests a context
    /// menu, since surfaces leave those to the view.
    pub fn dispatch_pointer(&mut self, event: &PointerEvent) -> Update {
        if event.state != ElementState::Pressed {
            return Update::empty();
        }
        let Some(surface) = self.surface.as_deref_mut() else {
            return Update::empty();
        };

        let local = surface.map_from_parent(event.position);
        surface.mouse_press_event(&event.translated(local));
        let defers_menu = surface.context_menu_policy() == ContextMenuPolicy::NoContextMenu;

        self.process_surface_events();
        if event.button == MouseButton::Right && defers_menu {
            self.context_menu_event(event.position);
        }
        Update::DRAW
    }

    /// Feed a key press.
    pub fn dispatch_key(&mut self, event: &KeyEvent) -> Update {
        let Some(surface) = self.surface.as_deref_mut() else {
            return Update::empty();
        };
        surface.key_press_event(event);
        self.process_surface_events();
        Update::DRAW
    }

    /// Handle a context menu request at a view-local position.
    ///
    /// Over an entry, publishes [ClickType::ContextMenu] with that entry.
    /// Over empty space, applies the empty space policy and publishes it
    /// without an entry.
    pub fn context_menu_event(&mut self, pos: Point) {
        let policy = self.empty_space_policy;
        let Some(surface) = self.surface.as_deref_mut() else {
            return;
        };
        let local = surface.map_from_parent(pos);
        let click = clicks::clicked_at(surface, ClickType::ContextMenu, local, policy);
        if let Some(click) = click {
            self.emit(click);
        }
    }

    /// Drop the current surface, then build one of the family of the current mode.
    fn recreate_surface(&mut self) {
        if let Some(old) = self.surface.take() {
            log::debug!("FolderView: releasing surface {}", old.id());
            self.layout.take_widget();
            drop(old);
        }
        // Events still queued belong to the released surface.
        self.surface_events = None;

        let mut surface: Box<dyn ViewSurface> = match self.mode.family() {
            SurfaceFamily::List => Box::new(ListSurface::new()),
            SurfaceFamily::Tree => Box::new(TreeSurface::new()),
        };
        let (sender, receiver) = mpsc::unbounded_channel();
        surface.core_mut().connect_events(sender);
        self.surface_events = Some(receiver);

        log::debug!("FolderView: created {} {}", surface.widget_id().id(), surface.id());
        self.surface = Some(surface);
    }

    /// Apply everything the current mode prescribes to the surface and put it in the layout.
    fn configure_surface(&mut self) {
        let Some(surface) = self.surface.as_deref_mut() else {
            return;
        };
        let config = self.mode.config();

        surface.set_item_delegate_for_column(FILE_NAME_COLUMN, FolderItemDelegate::new(config));
        surface.set_drag_enabled(true);
        surface.set_accept_drops(true);
        surface.set_selection_mode(SelectionMode::Extended);
        surface.set_context_menu_policy(ContextMenuPolicy::NoContextMenu);
        surface.set_icon_size(self.icon_sizes.get(self.mode));
        surface.apply_mode_config(config);
        surface.set_double_click_interval(self.double_click_interval);

        self.layout.replace_widget(surface.id());
        surface.set_geometry(self.layout.child_geometry());

        if self.model.is_some() {
            surface.core_mut().set_model(self.model.clone());
        }
    }

    /// Translate and publish whatever the surface reported.
    fn process_surface_events(&mut self) -> bool {
        let Some(receiver) = self.surface_events.as_mut() else {
            return false;
        };
        let mut pending = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            pending.push(event);
        }
        if pending.is_empty() {
            return false;
        }

        let policy = self.empty_space_policy;
        let mut notifications = Vec::new();
        if let Some(surface) = self.surface.as_deref_mut() {
            for event in pending {
                log::trace!("FolderView: surface event {:?}", event);
                notifications.extend(clicks::translate(surface, event, policy));
            }
        }
        for notification in notifications {
            self.emit(notification);
        }
        true
    }

    fn emit(&self, event: FolderViewEvent) {
        if self.events.send(event).is_err() {
            log::trace!("FolderView: no subscribers");
        }
    }
}

impl Widget for FolderView {
    fn widget_id(&self) -> WidgetId {
        WidgetId::new("folderview-widgets", "FolderView")
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.geometry = rect;
        let child = self.layout.set_geometry(rect);
        if let Some(surface) = self.surface.as_deref_mut() {
            surface.set_geometry(child);
        }
    }

    fn geometry(&self) -> Rect {
        self.geometry
    }

    fn size_hint(&self) -> Size {
        let child = self
            .surface
            .as_deref()
            .map_or(Size::ZERO, |surface| surface.size_hint());
        self.layout.size_hint(child)
    }

    fn size_policy(&self) -> SizePolicy {
        SizePolicy::Expanding
    }

    fn update(&mut self) -> Update {
        let mut update = Update::empty();
        if let Some(surface) = self.surface.as_deref_mut() {
            if surface.sync_model() {
                update |= Update::DRAW;
            }
        }
        if self.process_surface_events() {
            update |= Update::DRAW;
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folderview_services::filesystem::ProxyFolderModel;

    fn model(names: &[&str]) -> Arc<ProxyFolderModel> {
        Arc::new(ProxyFolderModel::with_entries(
            names.iter().map(|name| FileInfo::file(format!("/d/{}", name))),
        ))
    }

    #[test]
    fn test_new_view_is_configured() {
        let view = FolderView::new(ViewMode::Compact);
        let surface = view.child_view().unwrap();
        assert_eq!(surface.family(), SurfaceFamily::List);
        assert_eq!(surface.icon_size(), Vector2::new(24, 24));
        assert_eq!(surface.selection_mode(), SelectionMode::Extended);
        assert_eq!(surface.context_menu_policy(), ContextMenuPolicy::NoContextMenu);
        assert_eq!(surface.drag_drop_mode(), DragDropMode::DragDrop);
        assert!(surface.item_delegate_for_column(FILE_NAME_COLUMN).is_some());
        assert_eq!(surface.list_options().unwrap().flow, Flow::TopToBottom);
    }

    #[test]
    fn test_layout_holds_current_surface() {
        let mut view = FolderView::new(ViewMode::Icon);
        view.set_view_mode(ViewMode::DetailedList);
        let id = view.child_view().unwrap().id();
        assert_eq!(view.layout.widget(), Some(id));
        assert_eq!(view.layout.count(), 1);
    }

    #[test]
    fn test_current_mode_on_new_view_is_noop() {
        let mut view = FolderView::new(ViewMode::DetailedList);
        let id = view.child_view().unwrap().id();
        let delegate = view.child_view().unwrap().item_delegate_for_column(0).unwrap().id();
        let mut events = view.subscribe_events();

        view.set_view_mode(ViewMode::DetailedList);

        let surface = view.child_view().unwrap();
        assert_eq!(surface.id(), id);
        assert_eq!(surface.item_delegate_for_column(0).unwrap().id(), delegate);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_reconfiguration_installs_fresh_delegate() {
        let mut view = FolderView::new(ViewMode::Icon);
        let first = view.child_view().unwrap().item_delegate_for_column(0).unwrap().id();
        view.set_view_mode(ViewMode::Thumbnail);
        let second = view.child_view().unwrap().item_delegate_for_column(0).unwrap().id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_resize_reaches_surface() {
        let mut view = FolderView::new(ViewMode::Icon);
        view.resize(Size::new(300.0, 200.0));
        assert_eq!(view.child_view().unwrap().geometry(), Rect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(view.size_policy(), SizePolicy::Expanding);
    }

    #[test]
    fn test_set_model_twice_keeps_selection() {
        let mut view = FolderView::new(ViewMode::Icon);
        let shared: SharedModel = model(&["a", "b"]);
        view.set_model(Some(shared.clone()));
        view.select_all();
        view.set_model(Some(shared));
        assert_eq!(view.selected_indexes().len(), 2);
    }

    #[test]
    fn test_invert_selection_leaves_selection() {
        let mut view = FolderView::new(ViewMode::Icon);
        view.set_model(Some(model(&["a", "b", "c"])));
        view.child_view_mut()
            .unwrap()
            .selection_mut()
            .select(ModelIndex::new(1, 0), folderview_core::selection::SelectionFlags::SELECT);
        view.invert_selection();
        assert_eq!(view.selected_indexes(), vec![ModelIndex::new(1, 0)]);
    }

    #[test]
    fn test_no_model_means_no_files() {
        let mut view = FolderView::new(ViewMode::DetailedList);
        view.select_all();
        assert!(view.selected_files().is_empty());
        assert!(view.selected_file_paths().is_empty());
    }
}
