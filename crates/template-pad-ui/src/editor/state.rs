//! Per-editor state kept across frames: the core editor, the surface it
//! renders onto, and the bits of view state the widget needs.

use std::time::{Duration, Instant};

use template_pad_core::{
    EditorEvent, EditorOptions, MarkupSurface, TemplateEditor, VariableCatalog,
};

pub struct EditorState {
    pub editor: TemplateEditor,
    pub surface: MarkupSurface,
    /// Instant matching egui time 0.0; egui time is mapped onto it so the
    /// debounce runs on the UI clock.
    epoch: Instant,
    /// Vertical scroll, in lines.
    pub scroll_y: f32,
    /// egui time of the last caret activity (keeps the caret solid while typing).
    pub(crate) caret_activity_time: f64,
    /// Screen rect of the dropdown on the previous frame.
    pub(crate) dropdown_rect: Option<egui::Rect>,
    /// Pull keyboard focus back to the surface on the next frame.
    pub(crate) refocus: bool,
    /// Surface focus as of the previous frame, to detect blur and focus.
    pub(crate) had_focus: bool,
}

impl std::fmt::Debug for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorState")
            .field("value", &self.editor.value())
            .field("caret", &self.editor.caret())
            .finish()
    }
}

impl EditorState {
    pub fn new(catalog: VariableCatalog, options: EditorOptions, seed: &str) -> Self {
        let mut editor = TemplateEditor::new(catalog, options).with_seed(seed);
        let mut surface = MarkupSurface::new();
        editor.mount(&mut surface);
        Self {
            editor,
            surface,
            epoch: Instant::now(),
            scroll_y: 0.0,
            caret_activity_time: 0.0,
            dropdown_rect: None,
            refocus: true,
            had_focus: false,
        }
    }

    /// The editor clock for a given egui time.
    pub fn instant_at(&self, egui_time: f64) -> Instant {
        self.epoch + Duration::from_secs_f64(egui_time.max(0.0))
    }

    pub fn value(&self) -> String {
        self.editor.value()
    }

    /// Loads another template body; caret goes to the end.
    pub fn set_value(&mut self, value: &str) {
        self.editor.set_value(value, &mut self.surface);
        self.scroll_y = 0.0;
        self.dropdown_rect = None;
    }

    /// Types `text` at the caret as if it came from the keyboard.
    pub fn type_text(&mut self, text: &str, now: Instant) {
        for ch in text.chars() {
            let key = template_pad_core::EditorKey::Char(ch);
            if self.editor.handle_key(key, &mut self.surface)
                == template_pad_core::KeyOutcome::Ignored
            {
                let mut buf = [0u8; 4];
                self.surface.insert_text(ch.encode_utf8(&mut buf));
                self.editor.on_input(&self.surface, now);
            }
        }
    }

    /// Asks the widget to take keyboard focus on its next frame.
    pub fn request_focus(&mut self) {
        self.refocus = true;
    }

    /// Runs any pending debounced render right away.
    pub fn flush(&mut self) -> bool {
        // Whatever was rendered before has been painted by now.
        self.editor.on_frame();
        let now = Instant::now();
        match self.editor.render_due_in(now) {
            Some(remaining) => self.editor.tick(&mut self.surface, now + remaining),
            None => false,
        }
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.editor.drain_events()
    }
}
