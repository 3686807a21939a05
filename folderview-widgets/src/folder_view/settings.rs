use std::time::Duration;

use folderview_services::filesystem::ProxyFolderModel;
use folderview_services::{SettingsError, SettingsRegistry};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::clicks::EmptySpaceContextPolicy;
use super::mode::{IconSizeTable, ViewMode};
use super::surface::DEFAULT_DOUBLE_CLICK_INTERVAL;

/// Per-mode icon size overrides, as `[width, height]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSizeSettings {
    /// Icon mode.
    pub icon: Option<[u32; 2]>,
    /// Compact mode.
    pub compact: Option<[u32; 2]>,
    /// Thumbnail mode.
    pub thumbnail: Option<[u32; 2]>,
    /// Detailed list mode.
    pub detailed_list: Option<[u32; 2]>,
}

impl IconSizeSettings {
    /// The override configured for `mode`.
    pub fn get(&self, mode: ViewMode) -> Option<Vector2<u32>> {
        let size = match mode {
            ViewMode::Icon => self.icon,
            ViewMode::Compact => self.compact,
            ViewMode::Thumbnail => self.thumbnail,
            ViewMode::DetailedList => self.detailed_list,
        };
        size.map(|[width, height]| Vector2::new(width, height))
    }

    /// Write every configured override into `table`.
    pub fn apply_to(&self, table: &mut IconSizeTable) {
        for mode in ViewMode::ALL {
            if let Some(size) = self.get(mode) {
                table.set(mode, size);
            }
        }
    }
}

/// The `[folder_view]` section of the settings file.
///
/// ```toml
/// [folder_view]
/// default_mode = "detailed_list"
/// show_hidden = true
/// empty_space_context_menu = "keep_selection"
///
/// [folder_view.icon_sizes]
/// icon = [64, 64]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderViewSettings {
    /// Mode a new view starts in.
    pub default_mode: ViewMode,
    /// Icon size overrides.
    pub icon_sizes: IconSizeSettings,
    /// Show dot files.
    pub show_hidden: bool,
    /// List folders before files.
    pub sort_folders_first: bool,
    /// Selection handling for context menus over empty space.
    pub empty_space_context_menu: EmptySpaceContextPolicy,
    /// Double click interval in milliseconds.
    pub double_click_interval_ms: u64,
}

impl Default for FolderViewSettings {
    fn default() -> Self {
        Self {
            default_mode: ViewMode::Icon,
            icon_sizes: IconSizeSettings::default(),
            show_hidden: false,
            sort_folders_first: true,
            empty_space_context_menu: EmptySpaceContextPolicy::ClearSelection,
            double_click_interval_ms: DEFAULT_DOUBLE_CLICK_INTERVAL.as_millis() as u64,
        }
    }
}

impl FolderViewSettings {
    /// Name of the settings section.
    pub const SECTION: &'static str = "folder_view";

    /// Read the section from `registry`, falling back to defaults when it is absent.
    pub fn from_registry(registry: &SettingsRegistry) -> Result<Self, SettingsError> {
        Ok(registry.section::<Self>(Self::SECTION)?.unwrap_or_default())
    }

    /// Maximum delay between the presses of a double click.
    pub fn double_click_interval(&self) -> Duration {
        Duration::from_millis(self.double_click_interval_ms)
    }

    /// Apply the filter and sort preferences to a model.
    pub fn apply_to_model(&self, model: &ProxyFolderModel) {
        model.set_show_hidden(self.show_hidden);
        model.set_folders_first(self.sort_folders_first);
    }
}
