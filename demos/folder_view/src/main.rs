use std::path::{Path, PathBuf};
use std::sync::Arc;

use folderview::prelude::*;
use smol::stream::StreamExt;

async fn read_folder(path: &Path) -> std::io::Result<Vec<FileInfo>> {
    let mut entries = Vec::new();
    let mut dir = smol::fs::read_dir(path).await?;
    while let Some(entry) = dir.next().await {
        let entry = entry?;
        let meta = entry.metadata().await?;
        let file_type = if entry.file_type().await?.is_symlink() {
            FileType::Symlink
        } else if meta.is_dir() {
            FileType::Directory
        } else {
            FileType::File
        };
        let metadata = FileMetadata {
            size: meta.len(),
            modified: meta.modified().ok(),
            ..Default::default()
        };
        entries.push(FileInfo::new(entry.path(), file_type, metadata));
    }
    Ok(entries)
}

fn main() {
    env_logger::init();

    smol::block_on(async {
        let registry = SettingsRegistry::new().await.unwrap_or_else(|e| {
            log::warn!("Using default settings: {}", e);
            SettingsRegistry::default()
        });
        let settings = FolderViewSettings::from_registry(&registry).unwrap_or_else(|e| {
            log::warn!("Invalid folder view settings: {}", e);
            FolderViewSettings::default()
        });

        let current_dir = std::env::current_dir().unwrap_or(PathBuf::from("."));
        let model = Arc::new(ProxyFolderModel::new());
        settings.apply_to_model(&model);
        match read_folder(&current_dir).await {
            Ok(entries) => model.apply(FolderChange::Loaded(entries)),
            Err(e) => log::error!("Failed to read {:?}: {}", current_dir, e),
        }

        let mut view = FolderView::with_settings(&settings);
        let mut events = view.subscribe_events();
        view.resize(Size::new(640.0, 480.0));
        view.set_model(Some(model.clone()));

        for mode in ViewMode::ALL {
            view.set_view_mode(mode);
            view.select_all();
            println!(
                "{:>13}: {} selected, icon size {}x{}",
                mode.label(),
                view.selected_files().len(),
                view.icon_size(mode).x,
                view.icon_size(mode).y
            );
        }

        // A double click on the first row of the detailed list.
        let first_row = Point::new(20.0, 40.0);
        view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, first_row));
        view.dispatch_pointer(&PointerEvent::press(MouseButton::Left, first_row));
        view.context_menu_event(Point::new(20.0, 470.0));

        while let Ok(event) = events.try_recv() {
            if let FolderViewEvent::Clicked { click, file } = event {
                match file {
                    Some(file) => println!("{:?} on {}", click, file.path().display()),
                    None => println!("{:?} on empty space", click),
                }
            }
        }
    });
}
