//! Autocomplete wiring: session refresh, key interception, commits.

use super::{EditorEvent, EditorKey, KeyOutcome, TemplateEditor};
use crate::autocomplete::{KeyAction, SessionKey};
use crate::caret_sync;
use crate::catalog::Candidate;
use crate::surface::EditableSurface;
use crate::trigger::{self, CLOSE, OPEN};

impl TemplateEditor {
    /// Re-runs trigger detection at the caret and opens, re-filters or
    /// closes the session accordingly.
    pub(super) fn refresh_session(&mut self) {
        let content = self.buffer.to_string();
        let Some(found) = trigger::detect(&content, self.caret.offset()) else {
            self.dismissed_trigger = None;
            if self.session.is_active() {
                self.session.cancel();
            }
            return;
        };

        if self.dismissed_trigger == Some(found.offset) {
            return;
        }
        self.dismissed_trigger = None;

        if self.session.is_active() && self.session.trigger_offset() == found.offset {
            if self.session.query() != found.query {
                self.session.update_query(&found.query, &self.catalog);
            }
            return;
        }

        self.session.open(found.offset, &self.catalog);
        if !found.query.is_empty() {
            self.session.update_query(&found.query, &self.catalog);
        }
    }

    /// Key interception. Call before the surface applies the key; when the
    /// result is `Consumed` the host must suppress its default handling.
    ///
    /// A `}` typed right after another `}` closes the session but is still
    /// left to the surface to insert.
    pub fn handle_key<S: EditableSurface + ?Sized>(
        &mut self,
        key: EditorKey,
        surface: &mut S,
    ) -> KeyOutcome {
        let session_key = match key {
            EditorKey::ArrowUp => SessionKey::Up,
            EditorKey::ArrowDown => SessionKey::Down,
            EditorKey::Enter => SessionKey::Enter,
            EditorKey::Escape => SessionKey::Escape,
            EditorKey::Char(ch) => {
                if self.session.is_active()
                    && trigger::closes_session(&self.buffer.to_string(), self.caret.offset(), ch)
                {
                    tracing::debug!("closing braces typed, autocomplete closed");
                    self.session.cancel();
                }
                return KeyOutcome::Ignored;
            }
        };

        let trigger_offset = self.session.trigger_offset();
        match self.session.handle_key(session_key) {
            KeyAction::Ignored => KeyOutcome::Ignored,
            KeyAction::Handled => KeyOutcome::Consumed,
            KeyAction::Cancelled => {
                self.dismissed_trigger = Some(trigger_offset);
                KeyOutcome::Consumed
            }
            KeyAction::Commit(candidate) => {
                self.apply_commit(trigger_offset, &candidate, surface);
                KeyOutcome::Consumed
            }
        }
    }

    /// Commits the candidate at `index` of the filtered list (e.g. a click
    /// on a dropdown row). Returns the committed name, or `None` if there is
    /// no session or no candidate at `index`; in that case nothing changes.
    pub fn commit<S: EditableSurface + ?Sized>(
        &mut self,
        index: usize,
        surface: &mut S,
    ) -> Option<String> {
        let trigger_offset = self.session.trigger_offset();
        let candidate = self.session.commit(index)?;
        self.apply_commit(trigger_offset, &candidate, surface);
        Some(candidate.name)
    }

    /// Commits the highlighted candidate.
    pub fn commit_highlighted<S: EditableSurface + ?Sized>(&mut self, surface: &mut S) -> Option<String> {
        let index = self.session.highlighted_index();
        self.commit(index, surface)
    }

    /// Moves the dropdown highlight (pointer hover).
    pub fn highlight(&mut self, index: usize) {
        self.session.set_highlighted(index);
    }

    /// Closes the dropdown without committing.
    pub fn dismiss_autocomplete(&mut self) {
        if self.session.is_active() {
            self.dismissed_trigger = Some(self.session.trigger_offset());
            self.session.cancel();
        }
    }

    /// Inserts a complete `{{name}}` token at the caret (toolbar buttons,
    /// variable pickers). Any open session is closed.
    pub fn insert_variable<S: EditableSurface + ?Sized>(
        &mut self,
        name: &str,
        surface: &mut S,
    ) {
        let token = format!("{OPEN}{name}{CLOSE}");
        let at = self.caret.offset();
        if let Err(e) = self.buffer.insert(at, &token) {
            tracing::warn!("Could not insert variable '{name}': {e:#}");
            return;
        }
        self.caret.set(at + token.chars().count(), &self.buffer);
        self.session.cancel();
        self.dismissed_trigger = None;
        self.mark_changed();
        self.flush(surface);
    }

    /// Splices the chosen name over `[trigger + 2, caret)` and closes the
    /// token, unless the text after the caret already starts with `}}`. The
    /// caret lands just after the closing braces.
    fn apply_commit<S: EditableSurface + ?Sized>(
        &mut self,
        trigger_offset: usize,
        candidate: &Candidate,
        surface: &mut S,
    ) {
        let total = self.buffer.len_chars();
        let start = (trigger_offset + OPEN.chars().count()).min(total);
        let end = self.caret.offset().clamp(start, total);
        let already_closed = self.buffer.matches_at(end, CLOSE);
        let insertion = if already_closed {
            candidate.name.clone()
        } else {
            format!("{}{CLOSE}", candidate.name)
        };

        if let Err(e) = self.buffer.replace(start, end, &insertion) {
            tracing::warn!("Could not commit variable '{}': {e:#}", candidate.name);
            return;
        }
        let caret = start + candidate.name.chars().count() + CLOSE.chars().count();
        self.caret.set(caret, &self.buffer);
        self.dismissed_trigger = None;
        self.mark_changed();
        self.events
            .push(EditorEvent::VariableCommitted(candidate.name.clone()));
        tracing::debug!(variable = %candidate.name, caret, "variable committed");
        self.flush(surface);
    }

    /// Pushes a programmatic edit to the surface right away instead of
    /// waiting for the debounce.
    fn flush<S: EditableSurface + ?Sized>(&mut self, surface: &mut S) {
        self.debouncer.cancel();
        if !self.render_into(surface) {
            caret_sync::restore(surface, self.caret.offset());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::catalog::{Candidate, VariableCatalog};
    use crate::editor::{EditorEvent, EditorKey, EditorOptions, KeyOutcome, TemplateEditor};
    use crate::surface::{EditableSurface, MarkupSurface};

    fn setup(seed: &str) -> (TemplateEditor, MarkupSurface, Instant) {
        let catalog = VariableCatalog::new(vec![
            Candidate::new("clientName", "Client full name"),
            Candidate::new("clientBonus", "Bonus points"),
            Candidate::new("paymentDate", "Due date"),
            Candidate::new("name", ""),
        ]);
        let mut editor = TemplateEditor::new(catalog, EditorOptions::default()).with_seed(seed);
        let mut surface = MarkupSurface::new();
        editor.mount(&mut surface);
        editor.on_frame();
        editor.drain_events();
        (editor, surface, Instant::now())
    }

    fn type_text(editor: &mut TemplateEditor, surface: &mut MarkupSurface, text: &str, now: Instant) {
        for ch in text.chars() {
            if editor.handle_key(EditorKey::Char(ch), surface) == KeyOutcome::Ignored {
                surface.insert_text(&ch.to_string());
                editor.on_input(surface, now);
            }
        }
    }

    #[test]
    fn test_double_brace_opens_with_full_catalog() {
        let (mut editor, mut surface, now) = setup("Hi ");
        type_text(&mut editor, &mut surface, "{{", now);
        let session = editor.session();
        assert!(session.is_active());
        assert_eq!(session.trigger_offset(), 3);
        assert_eq!(session.query(), "");
        assert_eq!(session.filtered().len(), 4);
        assert_eq!(session.highlighted_index(), 0);
    }

    #[test]
    fn test_query_filters_and_resets_highlight() {
        let (mut editor, mut surface, now) = setup("");
        type_text(&mut editor, &mut surface, "{{", now);
        editor.handle_key(EditorKey::ArrowDown, &mut surface);
        assert_eq!(editor.session().highlighted_index(), 1);

        type_text(&mut editor, &mut surface, "cli", now);
        let names: Vec<&str> = editor
            .session()
            .filtered()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["clientName", "clientBonus"]);
        assert_eq!(editor.session().highlighted_index(), 0);
    }

    #[test]
    fn test_enter_commits_and_closes_token() {
        let (mut editor, mut surface, now) = setup("Hi ");
        type_text(&mut editor, &mut surface, "{{na", now);
        // "na" matches clientName ("Name") and name
        let outcome = editor.handle_key(EditorKey::Enter, &mut surface);
        assert_eq!(outcome, KeyOutcome::Consumed);
        assert_eq!(editor.value(), "Hi {{clientName}}");
        assert_eq!(editor.caret(), 17);
        assert_eq!(surface.plain_text(), "Hi {{clientName}}");
        assert_eq!(surface.caret_offset(), 17);
        assert!(!editor.session().is_active());
        let events = editor.drain_events();
        assert_eq!(
            events.last(),
            Some(&EditorEvent::VariableCommitted("clientName".into()))
        );
    }

    #[test]
    fn test_commit_reuses_existing_closing_braces() {
        let (mut editor, mut surface, _) = setup("Hi {{}} there");
        editor.move_caret(crate::editor::CaretMove::To(5), &mut surface);
        assert!(editor.session().is_active());
        let committed = editor.commit(3, &mut surface);
        assert_eq!(committed.as_deref(), Some("name"));
        assert_eq!(editor.value(), "Hi {{name}} there");
        assert_eq!(editor.caret(), 11);
    }

    #[test]
    fn test_commit_out_of_range_changes_nothing() {
        let (mut editor, mut surface, _) = setup("{{pay");
        editor.move_caret(crate::editor::CaretMove::End, &mut surface);
        assert!(editor.session().is_active());
        assert_eq!(editor.commit(7, &mut surface), None);
        assert_eq!(editor.value(), "{{pay");
        assert!(editor.session().is_active());
    }

    #[test]
    fn test_escape_dismisses_until_new_trigger() {
        let (mut editor, mut surface, now) = setup("");
        type_text(&mut editor, &mut surface, "{{cl", now);
        assert_eq!(
            editor.handle_key(EditorKey::Escape, &mut surface),
            KeyOutcome::Consumed
        );
        assert!(!editor.session().is_active());

        // Still inside the same trigger: stays closed
        type_text(&mut editor, &mut surface, "i", now);
        assert!(!editor.session().is_active());

        // A fresh trigger later in the text opens again
        type_text(&mut editor, &mut surface, " {{", now);
        assert!(editor.session().is_active());
        assert_eq!(editor.session().trigger_offset(), 6);
    }

    #[test]
    fn test_keys_ignored_without_session() {
        let (mut editor, mut surface, _) = setup("plain");
        for key in [
            EditorKey::ArrowUp,
            EditorKey::ArrowDown,
            EditorKey::Enter,
            EditorKey::Escape,
        ] {
            assert_eq!(editor.handle_key(key, &mut surface), KeyOutcome::Ignored);
        }
    }

    #[test]
    fn test_typed_closing_braces_close_session() {
        let (mut editor, mut surface, now) = setup("");
        type_text(&mut editor, &mut surface, "{{name}", now);
        assert!(editor.session().is_active());
        type_text(&mut editor, &mut surface, "}", now);
        assert!(!editor.session().is_active());
        assert_eq!(editor.value(), "{{name}}");
    }

    #[test]
    fn test_insert_variable_renders_immediately() {
        let (mut editor, mut surface, now) = setup("Dear ");
        let renders = surface.render_count();
        editor.insert_variable("clientName", &mut surface);
        assert_eq!(editor.value(), "Dear {{clientName}}");
        assert_eq!(editor.caret(), 19);
        assert_eq!(surface.render_count(), renders + 1);
        assert_eq!(surface.caret_offset(), 19);
        assert!(!editor.has_pending_render());
        assert_eq!(
            editor.drain_events(),
            vec![EditorEvent::Changed("Dear {{clientName}}".into())]
        );
        // Settles after one frame
        assert!(!editor.tick(&mut surface, now + Duration::from_secs(1)));
        assert!(editor.on_frame());
    }

    #[test]
    fn test_hover_moves_highlight_and_click_commits_it() {
        let (mut editor, mut surface, now) = setup("");
        type_text(&mut editor, &mut surface, "{{", now);
        editor.highlight(2);
        assert_eq!(editor.session().highlighted_index(), 2);
        assert_eq!(
            editor.commit_highlighted(&mut surface).as_deref(),
            Some("paymentDate")
        );
        assert_eq!(editor.value(), "{{paymentDate}}");
    }

    #[test]
    fn test_caret_moving_out_of_trigger_closes_session() {
        let (mut editor, mut surface, now) = setup("ab ");
        type_text(&mut editor, &mut surface, "{{cl", now);
        assert!(editor.session().is_active());
        editor.move_caret(crate::editor::CaretMove::Start, &mut surface);
        assert!(!editor.session().is_active());
    }
}
