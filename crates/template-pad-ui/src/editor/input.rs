//! Keyboard input handling for the template editor widget.
//!
//! Keys the autocomplete session cares about (Enter, arrows, Escape and
//! typed characters) go to the core editor first; anything it does not
//! consume becomes a plain edit on the surface.

use std::time::Instant;

use egui::Ui;
use template_pad_core::{CaretMove, EditorKey, KeyOutcome};

use super::widget::TemplateEditorWidget;

impl<'a> TemplateEditorWidget<'a> {
    /// Handles all keyboard input for this frame. Returns true if anything
    /// was processed.
    pub(crate) fn handle_keyboard_input(&mut self, ui: &mut Ui, now: Instant) -> bool {
        let events: Vec<egui::Event> = ui.input(|i| i.events.clone());
        if events.is_empty() {
            return false;
        }
        self.state.caret_activity_time = ui.input(|i| i.time);

        for event in &events {
            match event {
                egui::Event::Text(text) => {
                    // Ctrl/Alt combos are shortcuts, not text.
                    if !ui.input(|i| i.modifiers.ctrl || i.modifiers.command || i.modifiers.alt) {
                        self.state.type_text(text, now);
                    }
                }
                egui::Event::Paste(text) => {
                    self.state.surface.insert_text(text);
                    self.state.editor.on_input(&self.state.surface, now);
                }
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => {
                    self.handle_key(*key, *modifiers, now);
                }
                _ => {}
            }
        }
        true
    }

    fn handle_key(&mut self, key: egui::Key, modifiers: egui::Modifiers, now: Instant) {
        let ctrl = modifiers.ctrl || modifiers.command;

        let session_key = match key {
            egui::Key::Enter => Some(EditorKey::Enter),
            egui::Key::ArrowUp => Some(EditorKey::ArrowUp),
            egui::Key::ArrowDown => Some(EditorKey::ArrowDown),
            egui::Key::Escape => Some(EditorKey::Escape),
            _ => None,
        };
        if let Some(session_key) = session_key {
            let outcome = self
                .state
                .editor
                .handle_key(session_key, &mut self.state.surface);
            if outcome == KeyOutcome::Consumed {
                return;
            }
        }

        if let Some(movement) = navigation(key, ctrl) {
            self.state
                .editor
                .move_caret(movement, &mut self.state.surface);
            return;
        }

        match key {
            egui::Key::Enter => {
                self.state.surface.insert_text("\n");
                self.state.editor.on_input(&self.state.surface, now);
            }
            egui::Key::Backspace => {
                if self.state.surface.delete_backward() {
                    self.state.editor.on_input(&self.state.surface, now);
                }
            }
            egui::Key::Delete => {
                if self.state.surface.delete_forward() {
                    self.state.editor.on_input(&self.state.surface, now);
                }
            }
            _ => {}
        }
    }
}

/// Caret movement for a navigation key, if it is one.
fn navigation(key: egui::Key, ctrl: bool) -> Option<CaretMove> {
    let movement = match key {
        egui::Key::ArrowLeft if ctrl => CaretMove::WordLeft,
        egui::Key::ArrowRight if ctrl => CaretMove::WordRight,
        egui::Key::ArrowLeft => CaretMove::Left,
        egui::Key::ArrowRight => CaretMove::Right,
        egui::Key::ArrowUp => CaretMove::Up,
        egui::Key::ArrowDown => CaretMove::Down,
        egui::Key::Home if ctrl => CaretMove::Start,
        egui::Key::End if ctrl => CaretMove::End,
        egui::Key::Home => CaretMove::LineStart,
        egui::Key::End => CaretMove::LineEnd,
        _ => return None,
    };
    Some(movement)
}
