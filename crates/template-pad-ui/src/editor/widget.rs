//! Template editor widget: layout, painting, mouse interaction, and the
//! autocomplete dropdown.
//!
//! Each frame the widget releases the previous render's reentrancy guard,
//! tracks focus changes, feeds input into the core editor, runs the
//! debounced re-render, and paints the surface nodes. The dropdown is an
//! `egui::Area` anchored just below the caret.

use std::time::{Duration, Instant};

use egui::{text::LayoutJob, Color32, FontId, Pos2, Rect, Response, Sense, Stroke, TextFormat, Ui, Vec2};
use template_pad_core::{position, CaretMove, FocusTarget, ScrollOffset};

use super::layout::{column_at, line_at, line_job, split_lines};
use super::state::EditorState;
use super::theme::EditorTheme;

/// Padding between the widget edge and the text.
const TEXT_PADDING: f32 = 6.0;
/// Fixed width of the dropdown.
const DROPDOWN_WIDTH: f32 = 320.0;

/// The custom editor widget that renders an [`EditorState`].
pub struct TemplateEditorWidget<'a> {
    pub state: &'a mut EditorState,
    pub theme: &'a EditorTheme,
    /// Rows shown in the dropdown before it starts scrolling with the highlight.
    pub max_visible_candidates: usize,
}

fn to_core_rect(rect: Rect) -> position::Rect {
    position::Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

impl<'a> TemplateEditorWidget<'a> {
    pub fn new(state: &'a mut EditorState, theme: &'a EditorTheme) -> Self {
        Self {
            state,
            theme,
            max_visible_candidates: 8,
        }
    }

    pub fn max_visible_candidates(mut self, rows: usize) -> Self {
        self.max_visible_candidates = rows.max(1);
        self
    }

    /// Shows the editor widget and returns its response.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let time = ui.input(|i| i.time);
        let now = self.state.instant_at(time);

        // The render from the previous frame has been painted by now.
        self.state.editor.on_frame();

        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, Sense::click_and_drag());
        let rect = response.rect;

        let font_id = self.theme.font_id.clone();
        let line_height = self.theme.line_height();
        let char_width = measure_char_width(ui, &font_id);
        let text_origin = rect.min + Vec2::splat(TEXT_PADDING);
        let visible_lines = ((rect.height() - TEXT_PADDING) / line_height).floor().max(1.0) as usize;

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
            if scroll_delta.y != 0.0 {
                let max_scroll_y = self.state.editor.len_lines().saturating_sub(1) as f32;
                self.state.scroll_y =
                    (self.state.scroll_y - scroll_delta.y / line_height).clamp(0.0, max_scroll_y);
            }
        }

        let caret_before = self.state.editor.caret();
        let version_before = self.state.editor.content_version();

        if response.clicked() || response.drag_started() {
            self.state.caret_activity_time = time;
            if let Some(pos) = response.interact_pointer_pos() {
                let line = line_at(pos.y - text_origin.y, line_height) + self.state.scroll_y as usize;
                let col = column_at(pos.x - text_origin.x, char_width);
                let offset = self.state.editor.offset_at(line, col);
                self.state
                    .editor
                    .move_caret(CaretMove::To(offset), &mut self.state.surface);
            }
            response.request_focus();
        }

        if self.state.refocus {
            self.state.refocus = false;
            response.request_focus();
        }

        self.track_focus(ui, &response, now);

        if response.has_focus() {
            // Keep Tab, arrows and Escape with the editor instead of egui's
            // focus navigation.
            ui.memory_mut(|mem| {
                mem.set_focus_lock_filter(
                    response.id,
                    egui::EventFilter {
                        tab: true,
                        horizontal_arrows: true,
                        vertical_arrows: true,
                        escape: true,
                    },
                );
            });
            self.handle_keyboard_input(ui, now);
        }

        self.state.editor.tick(&mut self.state.surface, now);

        let caret_moved = self.state.editor.caret() != caret_before
            || self.state.editor.content_version() != version_before;
        if caret_moved {
            self.ensure_caret_visible(visible_lines);
        }

        // ── Paint ───────────────────────────────────────────────
        painter.rect_filled(rect, 0.0, self.theme.bg_color);
        let text_painter = painter.with_clip_rect(rect.shrink(1.0));

        let lines = split_lines(self.state.surface.nodes(), self.state.editor.catalog());
        let first_line = self.state.scroll_y as usize;
        let last_line = (first_line + visible_lines + 1).min(lines.len());
        for (index, runs) in lines.iter().enumerate().take(last_line).skip(first_line) {
            if runs.is_empty() {
                continue;
            }
            let y = text_origin.y + (index - first_line) as f32 * line_height;
            let job = line_job(runs, self.theme, &font_id);
            let galley = ui.fonts_mut(|f| f.layout_job(job));
            text_painter.galley(Pos2::new(text_origin.x, y), galley, Color32::WHITE);
        }

        let (caret_line, caret_col) = self.state.editor.caret_line_col();
        let caret_pos = Pos2::new(
            text_origin.x + caret_col as f32 * char_width,
            text_origin.y + (caret_line as f32 - first_line as f32) * line_height,
        );
        if response.has_focus() && caret_visible(time, self.state.caret_activity_time) {
            text_painter.line_segment(
                [caret_pos, Pos2::new(caret_pos.x, caret_pos.y + line_height)],
                Stroke::new(2.0, self.theme.cursor_color),
            );
        }

        let caret_rect = Rect::from_min_size(caret_pos, Vec2::new(2.0, line_height));
        self.show_dropdown(ui, &response, rect, caret_rect, line_height);

        if response.has_focus() {
            ui.ctx().request_repaint_after(Duration::from_millis(500));
        }
        if let Some(remaining) = self.state.editor.render_due_in(now) {
            ui.ctx().request_repaint_after(remaining);
        }

        response
    }

    /// Notes blur and focus transitions and resolves a pending blur against
    /// where focus went.
    fn track_focus(&mut self, ui: &Ui, response: &Response, now: Instant) {
        let has_focus = response.has_focus();
        if self.state.had_focus && !has_focus {
            self.state.editor.on_blur(now);
        } else if !self.state.had_focus && has_focus {
            self.state.editor.on_focus();
        }
        self.state.had_focus = has_focus;

        let target = if has_focus {
            FocusTarget::Surface
        } else if ui
            .input(|i| i.pointer.hover_pos())
            .zip(self.state.dropdown_rect)
            .is_some_and(|(pos, dropdown)| dropdown.contains(pos))
        {
            FocusTarget::Dropdown
        } else {
            FocusTarget::Outside
        };
        if self.state.editor.resolve_blur(target, now) {
            tracing::debug!("autocomplete closed after focus left the editor");
        }
        if self.state.editor.session().is_active() && !has_focus {
            // Blur resolution needs another frame once the delay passes.
            ui.ctx()
                .request_repaint_after(self.state.editor.options().blur_check);
        }
    }

    fn ensure_caret_visible(&mut self, visible_lines: usize) {
        let (line, _) = self.state.editor.caret_line_col();
        let line = line as f32;
        if line < self.state.scroll_y {
            self.state.scroll_y = line;
        } else if line >= self.state.scroll_y + visible_lines as f32 {
            self.state.scroll_y = line - visible_lines as f32 + 1.0;
        }
    }

    /// Paints the autocomplete dropdown when a session is open. Hovering a
    /// row highlights it; clicking commits it.
    fn show_dropdown(
        &mut self,
        ui: &Ui,
        response: &Response,
        surface_rect: Rect,
        caret_rect: Rect,
        line_height: f32,
    ) {
        let scroll = ScrollOffset {
            x: 0.0,
            y: self.state.scroll_y * line_height,
        };
        let Some(position) = self.state.editor.dropdown_position(
            to_core_rect(caret_rect),
            to_core_rect(surface_rect),
            scroll,
        ) else {
            self.state.dropdown_rect = None;
            return;
        };

        let session = self.state.editor.session();
        let highlighted = session.highlighted_index();
        let max_rows = self.max_visible_candidates.max(1);
        let first_row = (highlighted + 1).saturating_sub(max_rows);
        let rows: Vec<(usize, String, String)> = session
            .filtered()
            .iter()
            .enumerate()
            .skip(first_row)
            .take(max_rows)
            .map(|(i, c)| (i, c.name.clone(), c.description.clone()))
            .collect();

        let theme = self.theme;
        let origin = surface_rect.min + Vec2::new(position.left, position.top - scroll.y);
        let name_font = FontId::monospace(theme.font_size);
        let description_font = FontId::proportional(theme.font_size * 0.8);
        let row_height = theme.line_height();

        let mut hovered_row = None;
        let mut clicked_row = None;
        let area = egui::Area::new(response.id.with("autocomplete"))
            .order(egui::Order::Foreground)
            .fixed_pos(origin)
            .show(ui.ctx(), |ui| {
                egui::Frame::new()
                    .fill(theme.dropdown_bg)
                    .stroke(Stroke::new(1.0, theme.dropdown_highlight))
                    .corner_radius(egui::CornerRadius::same(4))
                    .inner_margin(egui::Margin::same(4))
                    .show(ui, |ui| {
                        ui.spacing_mut().item_spacing.y = 0.0;
                        if rows.is_empty() {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new("No matching variables")
                                        .color(theme.dropdown_description),
                                )
                                .selectable(false),
                            );
                            return;
                        }
                        for (index, name, description) in &rows {
                            let (row_rect, row_response) = ui.allocate_exact_size(
                                Vec2::new(DROPDOWN_WIDTH, row_height),
                                Sense::click(),
                            );
                            if *index == highlighted {
                                ui.painter().rect_filled(
                                    row_rect,
                                    egui::CornerRadius::same(2),
                                    theme.dropdown_highlight,
                                );
                            }
                            let text_y = row_rect.center().y;
                            ui.painter().text(
                                Pos2::new(row_rect.min.x + 6.0, text_y),
                                egui::Align2::LEFT_CENTER,
                                name,
                                name_font.clone(),
                                theme.dropdown_text,
                            );
                            if !description.is_empty() {
                                ui.painter().text(
                                    Pos2::new(row_rect.max.x - 6.0, text_y),
                                    egui::Align2::RIGHT_CENTER,
                                    description,
                                    description_font.clone(),
                                    theme.dropdown_description,
                                );
                            }
                            if row_response.hovered() {
                                hovered_row = Some(*index);
                            }
                            if row_response.clicked() {
                                clicked_row = Some(*index);
                            }
                        }
                    });
            });
        self.state.dropdown_rect = Some(area.response.rect);

        if let Some(index) = clicked_row {
            if let Some(name) = self.state.editor.commit(index, &mut self.state.surface) {
                tracing::debug!(variable = %name, "variable picked from dropdown");
            }
            self.state.dropdown_rect = None;
            self.state.refocus = true;
            ui.ctx().request_repaint();
        } else if let Some(index) = hovered_row.filter(|i| *i != highlighted) {
            self.state.editor.highlight(index);
        }
    }
}

/// Caret stays solid for half a second after activity, then blinks.
fn caret_visible(time: f64, activity_time: f64) -> bool {
    if time - activity_time < 0.5 {
        return true;
    }
    ((time * 2.0) as u64).is_multiple_of(2)
}

fn measure_char_width(ui: &Ui, font_id: &FontId) -> f32 {
    let mut job = LayoutJob::default();
    job.append(
        "M",
        0.0,
        TextFormat {
            font_id: font_id.clone(),
            ..Default::default()
        },
    );
    let galley = ui.fonts_mut(|f| f.layout_job(job));
    galley.rect.width()
}
