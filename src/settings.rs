use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use crate::flipper::{NavigationOrientation, SpineLocation, TransitionStyle};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
pub const APP_NAME: &str = "leafturn";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default = "default_true")]
    pub toolbar_visible: bool,

    #[serde(default = "default_true")]
    pub bottombar_visible: bool,

    #[serde(default = "default_true")]
    pub page_number_visible: bool,

    #[serde(default = "default_true")]
    pub note_btn_visible: bool,

    #[serde(default = "default_true")]
    pub bookmarks_btn_visible: bool,

    #[serde(default = "default_true")]
    pub thumbs_btn_visible: bool,

    #[serde(default)]
    pub page_transition_style: TransitionStyle,

    #[serde(default)]
    pub page_navigation_orientation: NavigationOrientation,

    /// Show two pages side by side
    #[serde(default)]
    pub dual_page: bool,
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_theme() -> String {
    "Oceanic Next".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            theme: default_theme(),
            toolbar_visible: true,
            bottombar_visible: true,
            page_number_visible: true,
            note_btn_visible: true,
            bookmarks_btn_visible: true,
            thumbs_btn_visible: true,
            page_transition_style: TransitionStyle::default(),
            page_navigation_orientation: NavigationOrientation::default(),
            dual_page: false,
        }
    }
}

impl Settings {
    pub fn spine_location(&self) -> SpineLocation {
        if self.dual_page {
            SpineLocation::Mid
        } else {
            SpineLocation::Min
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

pub fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from the default location, writing defaults there on
/// first run.
pub fn load_settings() {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };
    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, &path);
        }
    }
}

pub fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );
    settings.version = CURRENT_VERSION;
}

pub fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let body = match serde_yaml::to_string(settings) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };

    match fs::write(path, format!("{SETTINGS_HEADER}{body}")) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

const SETTINGS_HEADER: &str = r#"# leafturn settings
#
# page_transition_style: page_curl | scroll
# page_navigation_orientation: horizontal | vertical
# dual_page: show two pages side by side (prior/next move by two pages)
# *_visible: hide or show parts of the toolbar and bottom bar

"#;

/// Snapshot of the current settings
pub fn current() -> Settings {
    SETTINGS
        .read()
        .map(|s| s.clone())
        .unwrap_or_default()
}

/// Apply command-line overrides without persisting them
pub fn apply_overrides(apply: impl FnOnce(&mut Settings)) {
    if let Ok(mut settings) = SETTINGS.write() {
        apply(&mut settings);
    }
}
