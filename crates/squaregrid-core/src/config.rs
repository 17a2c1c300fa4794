use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::grid::{GridItem, LayoutConfig, RowMode, StaticItemSource};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (holds the log file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Tiles per grid line (1-5)
    #[serde(default = "default_columns")]
    pub columns: usize,
    /// Gap around and between tiles, in terminal cells
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Arrangement of double items: "strip" or "block"
    #[serde(default)]
    pub row_mode: RowMode,
    /// Number of generated single-image items when `items` is not set
    #[serde(default = "default_item_count")]
    pub item_count: usize,
    /// Explicit item list, overrides `item_count`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<GridItem>>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            spacing: default_spacing(),
            row_mode: RowMode::default(),
            item_count: default_item_count(),
            items: None,
        }
    }
}

impl GridConfig {
    /// Validated layout parameters
    pub fn layout_config(&self) -> crate::Result<LayoutConfig> {
        LayoutConfig::new(self.columns, self.spacing)
    }

    /// Item source described by this configuration
    pub fn item_source(&self) -> StaticItemSource {
        match &self.items {
            Some(items) => StaticItemSource::new(items.clone()),
            None => StaticItemSource::sequential(self.item_count),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Enable mouse clicks on tiles and header buttons
    #[serde(default = "default_true")]
    pub mouse: bool,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Scroll animation settings
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            mouse: default_true(),
            theme: ThemeConfig::default(),
            scroll: ScrollConfig::default(),
        }
    }
}

/// Easing curve used by scroll animations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump at the end of the animation
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    /// Exponential ease-out
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate jumps to a scroll target
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Animation length in milliseconds
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Frame rate while an animation runs
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
        }
    }
}

/// Theme configuration
/// Can be specified as a simple string (theme name) or as a full struct with overrides
#[derive(Debug, Clone, Serialize)]
pub struct ThemeConfig {
    /// Theme name ("default", "gruvbox-dark", "mono")
    pub name: String,
    /// Optional color overrides
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

// Accept either a bare theme name or a map with `name` and `colors`
impl<'de> Deserialize<'de> for ThemeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct ThemeConfigVisitor;

        impl<'de> Visitor<'de> for ThemeConfigVisitor {
            type Value = ThemeConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string (theme name) or a map with 'name' and optional 'colors'")
            }

            fn visit_str<E>(self, value: &str) -> Result<ThemeConfig, E>
            where
                E: de::Error,
            {
                Ok(ThemeConfig {
                    name: value.to_string(),
                    colors: ThemeColorOverrides::default(),
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<ThemeConfig, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut name: Option<String> = None;
                let mut colors: Option<ThemeColorOverrides> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "colors" => colors = Some(map.next_value()?),
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(ThemeConfig {
                    name: name.unwrap_or_else(default_theme_name),
                    colors: colors.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(ThemeConfigVisitor)
    }
}

/// Optional color overrides, each a hex string ("#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Screen background
    pub background: Option<String>,
    /// Text on the header and status bar
    pub foreground: Option<String>,
    /// Fill of single-image tiles
    pub tile: Option<String>,
    /// Fill of double-row sub-tiles
    pub sub_tile: Option<String>,
    /// Tile border and label
    pub tile_border: Option<String>,
    /// Check mark on selected tiles
    pub check: Option<String>,
    /// Focused tile border, active picker entry, buttons
    pub accent: Option<String>,
    /// Inactive picker entries and hints
    pub muted: Option<String>,
    /// Header and status bar background
    pub bar: Option<String>,
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-j>" (Ctrl+j), "<S-g>" (Shift+g), "<CR>" (Enter), "<Esc>", "<Tab>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Move focus to the previous tile
    #[serde(default = "default_key_move_left")]
    pub move_left: String,
    /// Move focus to the next tile
    #[serde(default = "default_key_move_right")]
    pub move_right: String,
    /// Move focus one grid line up
    #[serde(default = "default_key_move_up")]
    pub move_up: String,
    /// Move focus one grid line down
    #[serde(default = "default_key_move_down")]
    pub move_down: String,
    /// Toggle selection of the focused tile
    #[serde(default = "default_key_toggle_select")]
    pub toggle_select: String,
    /// Scroll to the first item
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    /// Scroll to the last item
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,
    /// One more tile per line
    #[serde(default = "default_key_columns_increase")]
    pub columns_increase: String,
    /// One less tile per line
    #[serde(default = "default_key_columns_decrease")]
    pub columns_decrease: String,
    /// Switch double rows between strip and block
    #[serde(default = "default_key_toggle_row_mode")]
    pub toggle_row_mode: String,
    /// Deselect every tile
    #[serde(default = "default_key_clear_selection")]
    pub clear_selection: String,
    /// Show the help overlay
    #[serde(default = "default_key_help")]
    pub help: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            move_left: default_key_move_left(),
            move_right: default_key_move_right(),
            move_up: default_key_move_up(),
            move_down: default_key_move_down(),
            toggle_select: default_key_toggle_select(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            columns_increase: default_key_columns_increase(),
            columns_decrease: default_key_columns_decrease(),
            toggle_row_mode: default_key_toggle_row_mode(),
            clear_selection: default_key_clear_selection(),
            help: default_key_help(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_move_left() -> String { "h".to_string() }
fn default_key_move_right() -> String { "l".to_string() }
fn default_key_move_up() -> String { "k".to_string() }
fn default_key_move_down() -> String { "j".to_string() }
fn default_key_toggle_select() -> String { "<Space>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_columns_increase() -> String { "+".to_string() }
fn default_key_columns_decrease() -> String { "-".to_string() }
fn default_key_toggle_row_mode() -> String { "m".to_string() }
fn default_key_clear_selection() -> String { "<Esc>".to_string() }
fn default_key_help() -> String { "?".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("squaregrid")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_columns() -> usize {
    1
}

fn default_spacing() -> f64 {
    1.0
}

fn default_item_count() -> usize {
    14
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_duration() -> u64 {
    150
}

fn default_animation_fps() -> u32 {
    60
}

fn default_theme_name() -> String {
    "default".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> crate::Result<()> {
        self.grid
            .layout_config()
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        Ok(())
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the configuration file path
    /// Always uses ~/.config/squaregrid/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("squaregrid")
            .join("config.toml")
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("squaregrid.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.grid.columns, 1);
        assert_eq!(config.grid.row_mode, RowMode::Strip);
        assert_eq!(config.grid.item_count, 14);
        assert_eq!(config.ui.scroll.easing, EasingType::Cubic);
        assert_eq!(config.keymap.jump_to_top, "gg");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: AppConfig = toml::from_str(
            r#"
            [grid]
            columns = 3
            row_mode = "block"

            [[grid.items]]
            id = 1

            [[grid.items]]
            id = 2
            image_count = 2

            [ui]
            theme = "gruvbox-dark"

            [ui.scroll]
            easing = "ease_out"
            "#,
        )
        .unwrap();

        assert_eq!(config.grid.columns, 3);
        assert_eq!(config.grid.row_mode, RowMode::Block);
        assert_eq!(config.grid.spacing, 1.0);
        assert_eq!(
            config.grid.items,
            Some(vec![GridItem::single(1), GridItem::double(2)])
        );
        assert_eq!(config.ui.theme.name, "gruvbox-dark");
        assert_eq!(config.ui.scroll.easing, EasingType::EaseOut);
        assert_eq!(config.ui.scroll.animation_fps, 60);
        assert_eq!(config.keymap.quit, "q");
    }

    #[test]
    fn test_theme_as_table() {
        let config: AppConfig = toml::from_str(
            r##"
            [ui.theme]
            name = "mono"
            colors = { accent = "#ff8800" }
            "##,
        )
        .unwrap();
        assert_eq!(config.ui.theme.name, "mono");
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#ff8800"));
    }

    #[test]
    fn test_item_source_selection() {
        use crate::grid::ItemSource;

        let mut grid = GridConfig {
            item_count: 4,
            ..Default::default()
        };
        assert_eq!(grid.item_source().items().len(), 4);

        grid.items = Some(vec![GridItem::double(5)]);
        assert_eq!(grid.item_source().items(), vec![GridItem::double(5)]);
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.grid.columns, 1);

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[grid]\ncolumns = 4\nspacing = 2.5").unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.grid.columns, 4);
        assert_eq!(config.grid.spacing, 2.5);
    }

    #[test]
    fn test_invalid_columns_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[grid]\ncolumns = 6\n").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.grid.columns = 2;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.grid.columns, 2);
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
    }
}
