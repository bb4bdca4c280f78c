//! Editor theme: palette colours resolved to egui types plus font metrics.

use egui::{Color32, FontId};
use template_pad_config::{HexColor, Palette};

/// Converts a `HexColor` to egui `Color32`.
fn hex_to_color32(c: HexColor) -> Color32 {
    Color32::from_rgba_premultiplied(c.r, c.g, c.b, c.a)
}

#[derive(Debug, Clone)]
pub struct EditorTheme {
    pub font_size: f32,
    pub font_id: FontId,
    pub dark_mode: bool,
    pub bg_color: Color32,
    pub text_color: Color32,
    pub cursor_color: Color32,
    pub known_variable: Color32,
    pub known_variable_bg: Color32,
    pub unknown_variable: Color32,
    pub unknown_variable_bg: Color32,
    pub dropdown_bg: Color32,
    pub dropdown_text: Color32,
    pub dropdown_description: Color32,
    pub dropdown_highlight: Color32,
    pub status_bar_bg: Color32,
}

impl Default for EditorTheme {
    fn default() -> Self {
        Self::from_palette(&Palette::default(), 16.0)
    }
}

impl EditorTheme {
    pub fn from_palette(palette: &Palette, font_size: f32) -> Self {
        Self {
            font_size,
            font_id: FontId::monospace(font_size),
            dark_mode: palette.is_dark(),
            bg_color: hex_to_color32(palette.background),
            text_color: hex_to_color32(palette.text),
            cursor_color: hex_to_color32(palette.caret),
            known_variable: hex_to_color32(palette.known_variable),
            known_variable_bg: hex_to_color32(palette.known_variable_bg),
            unknown_variable: hex_to_color32(palette.unknown_variable),
            unknown_variable_bg: hex_to_color32(palette.unknown_variable_bg),
            dropdown_bg: hex_to_color32(palette.dropdown_bg),
            dropdown_text: hex_to_color32(palette.dropdown_text),
            dropdown_description: hex_to_color32(palette.dropdown_description),
            dropdown_highlight: hex_to_color32(palette.dropdown_highlight),
            status_bar_bg: hex_to_color32(palette.status_bar_bg),
        }
    }

    /// Height of one text line.
    pub fn line_height(&self) -> f32 {
        self.font_size * 1.4
    }
}
