use std::sync::Arc;
use std::time::{Duration, Instant};

use folderview_core::input::{KeyEvent, PointerEvent};
use folderview_core::kurbo::{Point, Size};
use folderview_core::model::ModelIndex;
use folderview_core::selection::{SelectionBehavior, SelectionFlags};
use folderview_core::widget::Widget;
use folderview_core::window::{Key, ModifiersState, MouseButton, NamedKey};
use folderview_services::filesystem::{FileInfo, FolderChange, ProxyFolderModel};
use folderview_services::SettingsRegistry;
use folderview_widgets::folder_view::{
    ClickType, EmptySpaceContextPolicy, FolderView, FolderViewEvent, FolderViewSettings,
    SharedModel, SurfaceFamily, ViewMode,
};
use nalgebra::Vector2;
use tokio::sync::broadcast;

const LIST_MODES: [ViewMode; 3] = [ViewMode::Icon, ViewMode::Compact, ViewMode::Thumbnail];

fn model(names: &[&str]) -> Arc<ProxyFolderModel> {
    Arc::new(ProxyFolderModel::with_entries(
        names.iter().map(|name| FileInfo::file(format!("/home/user/{}", name))),
    ))
}

/// A 402x302 view: the surface viewport is 400x300, one pixel in.
fn view(mode: ViewMode, model: &Arc<ProxyFolderModel>) -> FolderView {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut view = FolderView::new(mode);
    view.resize(Size::new(402.0, 302.0));
    view.set_model(Some(model.clone()));
    view
}

fn surface_id(view: &FolderView) -> u64 {
    view.child_view().unwrap().id()
}

fn bound_to(view: &FolderView, model: &Arc<ProxyFolderModel>) -> bool {
    let expected: SharedModel = model.clone();
    let bound = view.child_view().unwrap().model().unwrap();
    std::ptr::eq(
        Arc::as_ptr(bound) as *const (),
        Arc::as_ptr(&expected) as *const (),
    )
}

fn clicks(events: &mut broadcast::Receiver<FolderViewEvent>) -> Vec<(ClickType, Option<String>)> {
    let mut clicks = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let FolderViewEvent::Clicked { click, file } = event {
            clicks.push((click, file.map(|file| file.name().to_string())));
        }
    }
    clicks
}

fn names(files: &[Arc<FileInfo>]) -> Vec<&str> {
    files.iter().map(|file| file.name()).collect()
}

// Icon mode cells are 80x100 with 10px spacing, starting at (10, 10) in the viewport.
fn icon_item(column: usize) -> Point {
    Point::new(11.0 + column as f64 * 90.0 + 5.0, 16.0)
}

// Detailed rows are 28px high below a 24px header.
fn detailed_row(row: usize) -> Point {
    Point::new(20.0, 25.0 + row as f64 * 28.0 + 5.0)
}

#[test]
fn test_list_family_reuses_surface() {
    let entries = model(&["a", "b"]);
    for from in LIST_MODES {
        for to in LIST_MODES {
            let mut view = view(from, &entries);
            let before = surface_id(&view);
            view.set_view_mode(to);
            assert_eq!(surface_id(&view), before, "{:?} -> {:?}", from, to);
        }
    }
}

#[test]
fn test_detailed_list_boundary_recreates_surface() {
    let entries = model(&["a", "b"]);
    for mode in LIST_MODES {
        let mut view = view(mode, &entries);
        let list = surface_id(&view);

        view.set_view_mode(ViewMode::DetailedList);
        let tree = surface_id(&view);
        assert_ne!(tree, list);
        assert_eq!(view.child_view().unwrap().family(), SurfaceFamily::Tree);
        assert_eq!(view.child_view().unwrap().selection_behavior(), SelectionBehavior::Rows);

        view.set_view_mode(mode);
        assert_ne!(surface_id(&view), tree);
        assert_ne!(surface_id(&view), list);
    }
}

#[test]
fn test_same_mode_is_noop() {
    let entries = model(&["a", "b"]);
    let mut view = view(ViewMode::Thumbnail, &entries);
    view.set_icon_size(ViewMode::Compact, Vector2::new(20, 20));
    let id = surface_id(&view);
    let mut events = view.subscribe_events();

    view.set_view_mode(ViewMode::Thumbnail);

    assert_eq!(surface_id(&view), id);
    assert!(bound_to(&view, &entries));
    assert_eq!(view.icon_size(ViewMode::Compact), Vector2::new(20, 20));
    assert_eq!(view.icon_size(ViewMode::Thumbnail), Vector2::new(128, 128));
    assert!(events.try_recv().is_err());
}

#[test]
fn test_inactive_icon_size_applies_on_switch() {
    let entries = model(&["a"]);
    let mut view = view(ViewMode::Icon, &entries);

    view.set_icon_size(ViewMode::Thumbnail, Vector2::new(96, 96));
    view.set_icon_size(ViewMode::DetailedList, Vector2::new(16, 16));
    assert_eq!(view.child_view().unwrap().icon_size(), Vector2::new(48, 48));

    view.set_view_mode(ViewMode::Thumbnail);
    assert_eq!(view.child_view().unwrap().icon_size(), Vector2::new(96, 96));
    view.set_view_mode(ViewMode::DetailedList);
    assert_eq!(view.child_view().unwrap().icon_size(), Vector2::new(16, 16));
    view.set_view_mode(ViewMode::Icon);
    assert_eq!(view.child_view().unwrap().icon_size(), Vector2::new(48, 48));
}

#[test]
fn test_active_icon_size_applies_immediately() {
    let entries = model(&["a"]);
    let mut view = view(ViewMode::Compact, &entries);
    view.set_icon_size(ViewMode::Compact, Vector2::new(32, 32));
    assert_eq!(view.child_view().unwrap().icon_size(), Vector2::new(32, 32));
}

#[test]
fn test_model_stays_bound_across_switches() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::Icon, &entries);
    for mode in [
        ViewMode::DetailedList,
        ViewMode::Compact,
        ViewMode::Thumbnail,
        ViewMode::DetailedList,
        ViewMode::Icon,
    ] {
        view.set_view_mode(mode);
        assert!(bound_to(&view, &entries), "after switching to {:?}", mode);
    }

    let other = model(&["x"]);
    view.set_model(Some(other.clone()));
    assert!(bound_to(&view, &other));
}

#[test]
fn test_replacing_model_releases_previous() {
    let first = model(&["a"]);
    let mut view = view(ViewMode::DetailedList, &first);
    // Held by the test, the view and its surface.
    assert_eq!(Arc::strong_count(&first), 3);

    view.set_model(Some(model(&["b"])));
    assert_eq!(Arc::strong_count(&first), 1);
}

#[test]
fn test_detailed_selection_is_per_row() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::DetailedList, &entries);
    let selection = view.child_view_mut().unwrap().selection_mut();
    for index in [ModelIndex::new(0, 0), ModelIndex::new(0, 1), ModelIndex::new(2, 3)] {
        selection.select(index, SelectionFlags::SELECT);
    }

    assert_eq!(view.selected_indexes().len(), 3);
    assert_eq!(names(&view.selected_files()), vec!["a", "c"]);
}

#[test]
fn test_icon_selection_is_per_cell() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::Icon, &entries);
    let selection = view.child_view_mut().unwrap().selection_mut();
    for index in [ModelIndex::new(0, 0), ModelIndex::new(0, 1), ModelIndex::new(2, 3)] {
        selection.select(index, SelectionFlags::SELECT);
    }

    assert_eq!(names(&view.selected_files()), vec!["a", "a", "c"]);
}

#[test]
fn test_clicking_rows_selects_whole_rows() {
    let entries = model(&["a", "b", "c", "d"]);
    let mut view = view(ViewMode::DetailedList, &entries);

    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, detailed_row(1)));
    view.dispatch_pointer(
        &PointerEvent::press(MouseButton::Left, detailed_row(3)).with_modifiers(ModifiersState::SHIFT),
    );

    assert_eq!(view.selected_indexes().len(), 3 * 4);
    assert_eq!(
        view.selected_file_paths(),
        vec![
            std::path::PathBuf::from("/home/user/b"),
            std::path::PathBuf::from("/home/user/c"),
            std::path::PathBuf::from("/home/user/d"),
        ]
    );
}

#[test]
fn test_ctrl_click_extends_selection() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::Icon, &entries);

    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, icon_item(0)));
    view.dispatch_pointer(
        &PointerEvent::press(MouseButton::Left, icon_item(2)).with_modifiers(ModifiersState::CONTROL),
    );
    assert_eq!(names(&view.selected_files()), vec!["a", "c"]);

    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, icon_item(1)));
    assert_eq!(names(&view.selected_files()), vec!["b"]);
}

#[test]
fn test_middle_click_on_entry() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::Icon, &entries);
    let mut events = view.subscribe_events();

    view.dispatch_pointer(&PointerEvent::press(MouseButton::Middle, icon_item(1)));

    assert_eq!(clicks(&mut events), vec![(ClickType::MiddleClick, Some("b".to_string()))]);
    assert!(view.selected_files().is_empty());
}

#[test]
fn test_middle_click_on_nothing_is_silent() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::DetailedList, &entries);
    let mut events = view.subscribe_events();

    view.dispatch_pointer(&PointerEvent::press(MouseButton::Middle, detailed_row(5)));
    view.dispatch_pointer(&PointerEvent::press(MouseButton::Middle, Point::new(20.0, 10.0)));

    assert!(clicks(&mut events).is_empty());
}

#[test]
fn test_context_menu_on_empty_space_clears_selection() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::Icon, &entries);
    view.select_all();
    let mut events = view.subscribe_events();

    view.context_menu_event(Point::new(300.0, 250.0));

    assert_eq!(clicks(&mut events), vec![(ClickType::ContextMenu, None)]);
    assert!(view.selected_indexes().is_empty());
}

#[test]
fn test_context_menu_on_entry_keeps_selection() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::Icon, &entries);
    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, icon_item(0)));
    let mut events = view.subscribe_events();

    view.context_menu_event(icon_item(2));

    assert_eq!(clicks(&mut events), vec![(ClickType::ContextMenu, Some("c".to_string()))]);
    assert_eq!(names(&view.selected_files()), vec!["a"]);
}

#[test]
fn test_keep_selection_policy() {
    let entries = model(&["a", "b"]);
    let mut view = view(ViewMode::DetailedList, &entries);
    view.set_empty_space_policy(EmptySpaceContextPolicy::KeepSelection);
    view.select_all();
    let mut events = view.subscribe_events();

    view.context_menu_event(detailed_row(6));

    assert_eq!(clicks(&mut events), vec![(ClickType::ContextMenu, None)]);
    assert_eq!(names(&view.selected_files()), vec!["a", "b"]);
}

#[test]
fn test_right_press_requests_context_menu() {
    let entries = model(&["a", "b"]);
    let mut view = view(ViewMode::DetailedList, &entries);
    let mut events = view.subscribe_events();

    view.dispatch_pointer(&PointerEvent::press(MouseButton::Right, detailed_row(1)));

    assert_eq!(clicks(&mut events), vec![(ClickType::ContextMenu, Some("b".to_string()))]);
}

#[test]
fn test_double_click_activates() {
    let entries = model(&["a", "b"]);
    let mut view = view(ViewMode::Compact, &entries);
    let mut events = view.subscribe_events();
    let start = Instant::now();
    // Compact rows are 28px high and span the viewport width.
    let second_row = Point::new(50.0, 1.0 + 28.0 + 10.0);

    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, second_row).at(start));
    view.dispatch_pointer(
        &PointerEvent::press(MouseButton::Left, second_row).at(start + Duration::from_millis(150)),
    );

    assert_eq!(clicks(&mut events), vec![(ClickType::Activated, Some("b".to_string()))]);
}

#[test]
fn test_slow_clicks_do_not_activate() {
    let entries = model(&["a", "b"]);
    let mut view = view(ViewMode::Icon, &entries);
    view.set_double_click_interval(Duration::from_millis(100));
    let mut events = view.subscribe_events();
    let start = Instant::now();

    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, icon_item(0)).at(start));
    view.dispatch_pointer(
        &PointerEvent::press(MouseButton::Left, icon_item(0)).at(start + Duration::from_millis(300)),
    );

    assert!(clicks(&mut events).is_empty());
}

#[test]
fn test_enter_activates_current_entry() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::DetailedList, &entries);
    let mut events = view.subscribe_events();

    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, detailed_row(2)));
    view.dispatch_key(&KeyEvent::new(Key::Named(NamedKey::Enter)));

    assert_eq!(clicks(&mut events), vec![(ClickType::Activated, Some("c".to_string()))]);
}

#[test]
fn test_selection_follows_entry_when_rows_shift() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::DetailedList, &entries);
    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, detailed_row(1)));
    let selected = vec![std::path::PathBuf::from("/home/user/b")];
    assert_eq!(view.selected_file_paths(), selected);

    // "aa" sorts before "b" and pushes it down one row.
    entries.apply(FolderChange::Added(FileInfo::file("/home/user/aa")));
    assert_eq!(view.selected_file_paths(), selected);
    assert_eq!(view.selected_rows(0), vec![ModelIndex::new(2, 0)]);

    view.update();
    assert_eq!(view.selected_file_paths(), selected);
    assert_eq!(view.selection_model().unwrap().selected_rows(0), vec![ModelIndex::new(2, 0)]);
    assert_eq!(view.selection_model().unwrap().current_index(), Some(ModelIndex::new(2, 0)));
}

#[test]
fn test_unrelated_change_keeps_selection() {
    let entries = model(&["a", "b"]);
    let mut view = view(ViewMode::Icon, &entries);
    view.select_all();

    entries.apply(FolderChange::Added(FileInfo::file("/home/user/zz")));
    view.update();

    assert_eq!(names(&view.selected_files()), vec!["a", "b"]);
}

#[test]
fn test_removed_entry_leaves_selection() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::Icon, &entries);
    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, icon_item(0)));
    view.dispatch_pointer(
        &PointerEvent::press(MouseButton::Left, icon_item(2)).with_modifiers(ModifiersState::CONTROL),
    );

    entries.apply(FolderChange::Removed("/home/user/a".into()));
    assert_eq!(names(&view.selected_files()), vec!["c"]);

    view.update();
    assert_eq!(names(&view.selected_files()), vec!["c"]);
    assert_eq!(view.selected_indexes(), vec![ModelIndex::new(1, 0)]);
}

#[test]
fn test_shift_click_after_change_extends_from_moved_anchor() {
    let entries = model(&["b", "c", "d"]);
    let mut view = view(ViewMode::DetailedList, &entries);
    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, detailed_row(0)));

    entries.apply(FolderChange::Added(FileInfo::file("/home/user/a")));
    view.dispatch_pointer(
        &PointerEvent::press(MouseButton::Left, detailed_row(2)).with_modifiers(ModifiersState::SHIFT),
    );

    assert_eq!(names(&view.selected_files()), vec!["b", "c"]);
}

#[test]
fn test_child_view_edits_keep_bound_model() {
    let entries = model(&["a", "b"]);
    let mut view = view(ViewMode::Compact, &entries);

    let surface = view.child_view_mut().unwrap();
    surface.selection_mut().select(ModelIndex::new(1, 0), SelectionFlags::SELECT);
    surface.set_icon_size(Vector2::new(20, 20));

    assert!(bound_to(&view, &entries));
    assert_eq!(names(&view.selected_files()), vec!["b"]);
}

#[test]
fn test_mode_change_notification() {
    let entries = model(&["a"]);
    let mut view = view(ViewMode::Icon, &entries);
    let mut events = view.subscribe_events();

    view.set_view_mode(ViewMode::DetailedList);

    match events.try_recv() {
        Ok(FolderViewEvent::ViewModeChanged { from, to, surface_recreated }) => {
            assert_eq!(from, ViewMode::Icon);
            assert_eq!(to, ViewMode::DetailedList);
            assert!(surface_recreated);
        },
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_settings_configure_view() {
    let registry = SettingsRegistry::from_toml_str(
        r#"
        [folder_view]
        default_mode = "compact"
        empty_space_context_menu = "keep_selection"

        [folder_view.icon_sizes]
        compact = [16, 16]
        "#,
    )
    .unwrap();
    let settings = FolderViewSettings::from_registry(&registry).unwrap();
    let view = FolderView::with_settings(&settings);

    assert_eq!(view.view_mode(), ViewMode::Compact);
    assert_eq!(view.child_view().unwrap().icon_size(), Vector2::new(16, 16));
    assert_eq!(view.empty_space_policy(), EmptySpaceContextPolicy::KeepSelection);
}

#[test]
fn test_icon_to_thumbnail_and_detailed_scenario() {
    let entries = model(&["a", "b", "c"]);
    let mut view = view(ViewMode::Icon, &entries);
    view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, icon_item(0)));
    view.dispatch_pointer(
        &PointerEvent::press(MouseButton::Left, icon_item(2)).with_modifiers(ModifiersState::CONTROL),
    );
    assert_eq!(names(&view.selected_files()), vec!["a", "c"]);
    let icon_surface = surface_id(&view);

    view.set_view_mode(ViewMode::Thumbnail);
    assert_eq!(surface_id(&view), icon_surface);
    assert_eq!(view.child_view().unwrap().icon_size(), Vector2::new(128, 128));
    assert!(bound_to(&view, &entries));

    view.set_view_mode(ViewMode::DetailedList);
    assert_ne!(surface_id(&view), icon_surface);
    assert_eq!(view.child_view().unwrap().icon_size(), Vector2::new(24, 24));
    assert!(bound_to(&view, &entries));
}
