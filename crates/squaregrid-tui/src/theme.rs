use ratatui::style::Color;
use squaregrid_core::config::{ThemeColorOverrides, ThemeConfig};
use tracing::warn;

/// Runtime theme with configurable colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub tile: Color,
    pub sub_tile: Color,
    pub tile_border: Color,
    pub check: Color,
    pub accent: Color,
    pub muted: Color,
    pub bar: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Purple single tiles, pink sub-tiles, white borders, blue checks
        Self {
            background: Color::Rgb(0x12, 0x12, 0x16),
            foreground: Color::Rgb(0xee, 0xee, 0xf2),
            tile: Color::Rgb(0xaf, 0x52, 0xde),
            sub_tile: Color::Rgb(0xff, 0x2d, 0x55),
            tile_border: Color::Rgb(0xff, 0xff, 0xff),
            check: Color::Rgb(0x0a, 0x84, 0xff),
            accent: Color::Rgb(0x0a, 0x84, 0xff),
            muted: Color::Rgb(0x8e, 0x8e, 0x93),
            bar: Color::Rgb(0x2c, 0x2c, 0x2e),
            error: Color::Rgb(0xff, 0x45, 0x3a),
        }
    }
}

impl Theme {
    pub fn gruvbox_dark() -> Self {
        Self {
            background: Color::Rgb(0x28, 0x28, 0x28),
            foreground: Color::Rgb(0xd4, 0xbe, 0x98),
            tile: Color::Rgb(0xd3, 0x86, 0x9b),
            sub_tile: Color::Rgb(0xe7, 0x8a, 0x4e),
            tile_border: Color::Rgb(0xdd, 0xc7, 0xa1),
            check: Color::Rgb(0x7d, 0xae, 0xa3),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            muted: Color::Rgb(0x92, 0x83, 0x74),
            bar: Color::Rgb(0x45, 0x40, 0x3d),
            error: Color::Rgb(0xea, 0x69, 0x62),
        }
    }

    /// Named ANSI colors only, for terminals without truecolor
    pub fn mono() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            tile: Color::DarkGray,
            sub_tile: Color::Gray,
            tile_border: Color::White,
            check: Color::LightBlue,
            accent: Color::LightCyan,
            muted: Color::Gray,
            bar: Color::Black,
            error: Color::LightRed,
        }
    }
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Load a theme by name from config
pub fn load_theme(config: &ThemeConfig) -> Theme {
    let mut theme = match config.name.to_lowercase().as_str() {
        "default" => Theme::default(),
        "gruvbox" | "gruvbox-dark" => Theme::gruvbox_dark(),
        "mono" | "monochrome" => Theme::mono(),
        other => {
            warn!("Unknown theme '{}', using default", other);
            Theme::default()
        }
    };
    apply_overrides(&mut theme, &config.colors);
    theme
}

fn apply_overrides(theme: &mut Theme, colors: &ThemeColorOverrides) {
    let slots = [
        (&colors.background, &mut theme.background),
        (&colors.foreground, &mut theme.foreground),
        (&colors.tile, &mut theme.tile),
        (&colors.sub_tile, &mut theme.sub_tile),
        (&colors.tile_border, &mut theme.tile_border),
        (&colors.check, &mut theme.check),
        (&colors.accent, &mut theme.accent),
        (&colors.muted, &mut theme.muted),
        (&colors.bar, &mut theme.bar),
    ];

    for (value, slot) in slots {
        let Some(hex) = value else { continue };
        match parse_hex_color(hex) {
            Some(color) => *slot = color,
            None => warn!("Invalid color '{}' in theme overrides, ignoring", hex),
        }
    }
}
