/// Editor colours: surface, caret, variable tokens and the dropdown.
use serde::{Deserialize, Serialize};

use crate::color::HexColor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: HexColor,
    pub text: HexColor,
    pub caret: HexColor,
    /// Token whose name is in the catalog.
    pub known_variable: HexColor,
    pub known_variable_bg: HexColor,
    /// Well-formed token with a name the catalog does not list.
    pub unknown_variable: HexColor,
    pub unknown_variable_bg: HexColor,
    pub dropdown_bg: HexColor,
    pub dropdown_text: HexColor,
    pub dropdown_description: HexColor,
    pub dropdown_highlight: HexColor,
    pub status_bar_bg: HexColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: HexColor::rgb(30, 30, 30),
            text: HexColor::rgb(212, 212, 212),
            caret: HexColor::rgb(255, 255, 255),
            known_variable: HexColor::rgb(120, 200, 255),
            known_variable_bg: HexColor::rgba(40, 90, 140, 120),
            unknown_variable: HexColor::rgb(240, 170, 80),
            unknown_variable_bg: HexColor::rgba(140, 80, 20, 110),
            dropdown_bg: HexColor::rgb(43, 43, 43),
            dropdown_text: HexColor::rgb(220, 220, 220),
            dropdown_description: HexColor::rgb(140, 140, 140),
            dropdown_highlight: HexColor::rgb(50, 110, 200),
            status_bar_bg: HexColor::rgb(37, 37, 37),
        }
    }
}

impl Palette {
    /// Light preset.
    pub fn light() -> Self {
        Self {
            background: HexColor::rgb(255, 255, 255),
            text: HexColor::rgb(30, 30, 30),
            caret: HexColor::rgb(0, 0, 0),
            known_variable: HexColor::rgb(20, 90, 170),
            known_variable_bg: HexColor::rgba(120, 170, 230, 90),
            unknown_variable: HexColor::rgb(170, 80, 0),
            unknown_variable_bg: HexColor::rgba(240, 180, 100, 90),
            dropdown_bg: HexColor::rgb(248, 248, 248),
            dropdown_text: HexColor::rgb(30, 30, 30),
            dropdown_description: HexColor::rgb(110, 110, 110),
            dropdown_highlight: HexColor::rgb(190, 215, 245),
            status_bar_bg: HexColor::rgb(235, 235, 235),
        }
    }

    /// True when the background is darker than mid grey.
    pub fn is_dark(&self) -> bool {
        let bg = self.background;
        let luma = 0.299 * f32::from(bg.r) + 0.587 * f32::from(bg.g) + 0.114 * f32::from(bg.b);
        luma < 128.0
    }
}
