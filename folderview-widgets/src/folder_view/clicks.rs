//! Turns raw surface events into clicks on file-system entries.

use std::sync::Arc;

use folderview_core::kurbo::Point;
use folderview_core::model::ModelIndex;
use folderview_core::window::MouseButton;
use folderview_services::filesystem::FileInfo;
use serde::{Deserialize, Serialize};

use super::mode::ViewMode;
use super::surface::{SurfaceEvent, ViewSurface};

/// What kind of click a [FolderViewEvent::Clicked] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickType {
    /// An entry was opened (double click or Enter).
    Activated,
    /// The middle button was pressed on an entry.
    MiddleClick,
    /// A context menu was requested.
    ContextMenu,
}

/// Notifications published by a [FolderView](super::FolderView).
#[derive(Debug, Clone)]
pub enum FolderViewEvent {
    /// A click addressed to an entry. `file` is `None` when a context menu
    /// was requested over empty space.
    Clicked {
        /// Kind of click.
        click: ClickType,
        /// The entry under the pointer.
        file: Option<Arc<FileInfo>>,
    },
    /// The view mode changed.
    ViewModeChanged {
        /// Previous mode.
        from: ViewMode,
        /// New mode.
        to: ViewMode,
        /// Whether the surface was replaced by a new instance.
        surface_recreated: bool,
    },
    /// A different model was installed.
    ModelChanged,
}

impl FolderViewEvent {
    /// Shorthand for a click event.
    pub fn clicked(click: ClickType, file: Option<Arc<FileInfo>>) -> Self {
        FolderViewEvent::Clicked { click, file }
    }
}

/// What a context menu request over empty space does to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySpaceContextPolicy {
    /// Deselect everything before reporting the click.
    #[default]
    ClearSelection,
    /// Leave the selection alone so the menu can act on it.
    KeepSelection,
}

/// The entry shown at a surface-local position.
pub fn entry_at(surface: &dyn ViewSurface, pos: Point) -> Option<(ModelIndex, Arc<FileInfo>)> {
    if !surface.viewport_rect().contains(pos) {
        return None;
    }
    let index = surface.index_at(surface.map_to_viewport(pos))?;
    let file = surface.model()?.file_info(&index)?;
    Some((index, file))
}

/// Resolve a click at a surface-local position.
///
/// Middle clicks over empty space produce nothing. Context menu requests
/// always produce an event and, over empty space, apply `policy`.
pub fn clicked_at(
    surface: &mut dyn ViewSurface,
    click: ClickType,
    pos: Point,
    policy: EmptySpaceContextPolicy,
) -> Option<FolderViewEvent> {
    let file = entry_at(surface, pos).map(|(_, file)| file);
    match (click, file) {
        (_, Some(file)) => Some(FolderViewEvent::clicked(click, Some(file))),
        (ClickType::ContextMenu, None) => {
            if policy == EmptySpaceContextPolicy::ClearSelection {
                surface.clear_selection();
            }
            Some(FolderViewEvent::clicked(ClickType::ContextMenu, None))
        },
        (_, None) => None,
    }
}

/// Translate a low-level surface event into a notification, if it maps to one.
pub fn translate(
    surface: &mut dyn ViewSurface,
    event: SurfaceEvent,
    policy: EmptySpaceContextPolicy,
) -> Option<FolderViewEvent> {
    match event {
        SurfaceEvent::Activated(index) => {
            let file = surface.model()?.file_info(&index);
            if file.is_none() {
                log::trace!("Activated row {} has no entry, ignored", index.row());
                return None;
            }
            Some(FolderViewEvent::clicked(ClickType::Activated, file))
        },
        SurfaceEvent::PointerPressed(pointer) if pointer.is_press_of(MouseButton::Middle) => {
            clicked_at(surface, ClickType::MiddleClick, pointer.position, policy)
        },
        SurfaceEvent::PointerPressed(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder_view::list_surface::ListSurface;
    use folderview_core::input::PointerEvent;
    use folderview_core::kurbo::Rect;
    use folderview_core::selection::SelectionFlags;
    use folderview_core::widget::Widget;
    use folderview_services::filesystem::ProxyFolderModel;

    // Icon layout: items at (10,10), (100,10), (190,10) inside a 1px frame.
    fn surface() -> ListSurface {
        let model = ProxyFolderModel::with_entries(
            ["/d/a", "/d/b", "/d/c"].into_iter().map(FileInfo::file),
        );
        let mut surface = ListSurface::new();
        surface.set_geometry(Rect::new(0.0, 0.0, 402.0, 302.0));
        surface.core_mut().set_model(Some(Arc::new(model)));
        surface
    }

    fn name(event: &FolderViewEvent) -> Option<String> {
        match event {
            FolderViewEvent::Clicked { file, .. } => file.as_ref().map(|f| f.name().to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_middle_click_on_entry() {
        let mut surface = surface();
        let event = SurfaceEvent::PointerPressed(PointerEvent::press(MouseButton::Middle, (105.0, 20.0)));
        let click = translate(&mut surface, event, EmptySpaceContextPolicy::default()).unwrap();
        assert!(matches!(click, FolderViewEvent::Clicked { click: ClickType::MiddleClick, .. }));
        assert_eq!(name(&click).as_deref(), Some("b"));
    }

    #[test]
    fn test_middle_click_on_empty_space_is_silent() {
        let mut surface = surface();
        let event = SurfaceEvent::PointerPressed(PointerEvent::press(MouseButton::Middle, (300.0, 250.0)));
        assert!(translate(&mut surface, event, EmptySpaceContextPolicy::default()).is_none());
    }

    #[test]
    fn test_left_press_is_not_a_click() {
        let mut surface = surface();
        let event = SurfaceEvent::PointerPressed(PointerEvent::press(MouseButton::Left, (105.0, 20.0)));
        assert!(translate(&mut surface, event, EmptySpaceContextPolicy::default()).is_none());
    }

    #[test]
    fn test_activation_resolves_entry() {
        let mut surface = surface();
        let click = translate(
            &mut surface,
            SurfaceEvent::Activated(ModelIndex::new(2, 0)),
            EmptySpaceContextPolicy::default(),
        )
        .unwrap();
        assert_eq!(name(&click).as_deref(), Some("c"));
    }

    #[test]
    fn test_context_menu_on_empty_space_follows_policy() {
        let mut surface = surface();
        surface.selection_mut().select(ModelIndex::new(1, 0), SelectionFlags::SELECT);

        let click = clicked_at(
            &mut surface,
            ClickType::ContextMenu,
            Point::new(300.0, 250.0),
            EmptySpaceContextPolicy::KeepSelection,
        )
        .unwrap();
        assert!(name(&click).is_none());
        assert!(surface.selection().has_selection());

        clicked_at(
            &mut surface,
            ClickType::ContextMenu,
            Point::new(300.0, 250.0),
            EmptySpaceContextPolicy::ClearSelection,
        );
        assert!(!surface.selection().has_selection());
    }

    #[test]
    fn test_context_menu_on_entry_keeps_selection() {
        let mut surface = surface();
        surface.selection_mut().select(ModelIndex::new(0, 0), SelectionFlags::SELECT);
        let click = clicked_at(
            &mut surface,
            ClickType::ContextMenu,
            Point::new(195.0, 20.0),
            EmptySpaceContextPolicy::ClearSelection,
        )
        .unwrap();
        assert_eq!(name(&click).as_deref(), Some("c"));
        assert!(surface.selection().is_selected(&ModelIndex::new(0, 0)));
    }
}
