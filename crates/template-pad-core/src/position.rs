//! Placement of the autocomplete dropdown relative to the editable surface.

/// Gap between the caret's bottom edge and the dropdown.
pub const DEFAULT_DROPDOWN_MARGIN: f32 = 4.0;

/// Axis-aligned rectangle in host coordinates (pixels, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// Current scroll offset of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f32,
    pub y: f32,
}

/// Dropdown origin relative to the surface's own origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DropdownPosition {
    pub top: f32,
    pub left: f32,
}

/// Puts the dropdown just below the caret: the caret's bottom edge relative
/// to the surface, plus `margin`, plus the surface scroll. No clipping or
/// flipping is attempted.
pub fn dropdown_position(
    caret: Rect,
    surface: Rect,
    scroll: ScrollOffset,
    margin: f32,
) -> DropdownPosition {
    DropdownPosition {
        top: caret.bottom() - surface.top + margin + scroll.y,
        left: caret.left - surface.left + scroll.x,
    }
}
