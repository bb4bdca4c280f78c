//! Template editor: the content model plus the debounced render/caret cycle.
//!
//! `TemplateEditor` owns the authoritative plain text and caret offset. The
//! host owns the editable surface and reports what happened to it:
//!
//! 1. `on_input` after every edit of the surface: the content model is
//!    re-read from the surface, the trigger detector runs at the caret, the
//!    autocomplete session is (re)computed and a render is scheduled.
//! 2. `tick` on every frame: once the debounce delay has passed the content
//!    is rendered onto the surface (skipped if unchanged since the last
//!    render) and the caret is restored.
//! 3. `on_frame` at the start of every frame: releases the reentrancy guard
//!    raised by the previous render.
//!
//! Autocomplete keys, commits, and programmatic insertions live in the
//! `completion` submodule.

mod completion;

use std::time::{Duration, Instant};

use crate::autocomplete::{AutocompleteSession, NoMatchPolicy};
use crate::buffer::TextBuffer;
use crate::caret::{self, Caret};
use crate::caret_sync;
use crate::catalog::VariableCatalog;
use crate::focus::{BlurWatch, FocusTarget, DEFAULT_BLUR_CHECK};
use crate::guard::{Debouncer, ReentrancyGuard, DEFAULT_DEBOUNCE};
use crate::highlight::RenderMemo;
use crate::position::{self, DropdownPosition, Rect, ScrollOffset, DEFAULT_DROPDOWN_MARGIN};
use crate::surface::EditableSurface;

/// Tunables for an editor instance.
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Delay between the last keystroke and the re-render.
    pub debounce: Duration,
    /// Delay before a blur is allowed to cancel the session.
    pub blur_check: Duration,
    pub no_match_policy: NoMatchPolicy,
    /// Gap between the caret and the dropdown, in pixels.
    pub dropdown_margin: f32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            blur_check: DEFAULT_BLUR_CHECK,
            no_match_policy: NoMatchPolicy::default(),
            dropdown_margin: DEFAULT_DROPDOWN_MARGIN,
        }
    }
}

/// Notifications for the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The content changed; carries the exact plain text.
    Changed(String),
    /// A candidate was chosen from the dropdown; carries its name.
    VariableCommitted(String),
}

/// Keys the editor may want to intercept before the surface sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Char(char),
}

/// Whether the host should still apply its default handling for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    Ignored,
}

/// Caret movements the host can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMove {
    Left,
    Right,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    Up,
    Down,
    Start,
    End,
    To(usize),
}

#[derive(Debug)]
pub struct TemplateEditor {
    buffer: TextBuffer,
    caret: Caret,
    catalog: VariableCatalog,
    session: AutocompleteSession,
    /// Trigger offset the user dismissed with Escape; not re-opened until a
    /// different trigger appears.
    dismissed_trigger: Option<usize>,
    memo: RenderMemo,
    guard: ReentrancyGuard,
    debouncer: Debouncer,
    blur: BlurWatch,
    options: EditorOptions,
    events: Vec<EditorEvent>,
    /// Bumped on every content change.
    content_version: u64,
}

impl TemplateEditor {
    pub fn new(catalog: VariableCatalog, options: EditorOptions) -> Self {
        Self {
            buffer: TextBuffer::new(),
            caret: Caret::new(),
            catalog,
            session: AutocompleteSession::new(options.no_match_policy),
            dismissed_trigger: None,
            memo: RenderMemo::new(),
            guard: ReentrancyGuard::new(),
            debouncer: Debouncer::new(options.debounce),
            blur: BlurWatch::new(options.blur_check),
            options,
            events: Vec::new(),
            content_version: 0,
        }
    }

    /// Seeds the content (e.g. an existing template body), caret at the end.
    pub fn with_seed(mut self, seed: &str) -> Self {
        self.buffer = TextBuffer::from(seed);
        self.caret.move_to_end(&self.buffer);
        self
    }

    /// The exact plain-text content.
    pub fn value(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Caret offset in characters.
    pub fn caret(&self) -> usize {
        self.caret.offset()
    }

    pub fn len_lines(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Caret as (line, column), both zero-based.
    pub fn caret_line_col(&self) -> (usize, usize) {
        caret::line_col(&self.buffer, self.caret.offset())
    }

    /// Char offset of `col` on `line`, clamped to the content.
    pub fn offset_at(&self, line: usize, col: usize) -> usize {
        let last_line = self.buffer.len_lines().saturating_sub(1);
        caret::offset_at(&self.buffer, line.min(last_line), col)
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &AutocompleteSession {
        &self.session
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    /// True while the surface is being (or was just) rewritten by a render.
    pub fn is_formatting(&self) -> bool {
        self.guard.is_active()
    }

    /// True if a debounced render is waiting.
    pub fn has_pending_render(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Time until the pending render, if any.
    pub fn render_due_in(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    /// Replaces the catalog; an open session is re-filtered against it.
    pub fn set_catalog(&mut self, catalog: VariableCatalog) {
        self.catalog = catalog;
        if self.session.is_active() {
            let query = self.session.query().to_string();
            self.session.update_query(&query, &self.catalog);
        }
    }

    /// Takes the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// First render of the seeded content onto a fresh surface.
    pub fn mount<S: EditableSurface + ?Sized>(&mut self, surface: &mut S) {
        self.memo.invalidate();
        self.render_into(surface);
    }

    /// Replaces the content programmatically (no `Changed` event is
    /// emitted). The caret moves to the end and any session is dropped.
    pub fn set_value<S: EditableSurface + ?Sized>(&mut self, value: &str, surface: &mut S) {
        if self.buffer.to_string() != value {
            self.buffer = TextBuffer::from(value);
            self.content_version += 1;
        }
        self.caret.move_to_end(&self.buffer);
        self.session.cancel();
        self.dismissed_trigger = None;
        self.debouncer.cancel();
        if !self.render_into(surface) {
            caret_sync::restore(surface, self.caret.offset());
        }
    }

    /// Input notification: the surface was edited.
    ///
    /// The model follows the surface and the trigger detector runs on every
    /// notification. While the reentrancy guard is up, a surface that still
    /// holds the last rendered content is the render echoing back and does
    /// not schedule another render; anything else typed in that window is
    /// scheduled as usual.
    pub fn on_input<S: EditableSurface + ?Sized>(&mut self, surface: &S, now: Instant) {
        let text = surface.plain_text();
        let caret = caret_sync::save(surface).unwrap_or_else(|| text.chars().count());
        let changed = self.apply_content(&text);
        self.caret.set(caret, &self.buffer);

        self.refresh_session();
        let echo = self.guard.is_active() && self.memo.is_current(&text);
        if changed && !echo {
            self.debouncer.schedule(now);
        }
    }

    /// Selection notification: the caret moved without an edit (click,
    /// navigation handled by the platform).
    pub fn on_selection_change<S: EditableSurface + ?Sized>(&mut self, surface: &S) {
        if let Some(caret) = caret_sync::save(surface) {
            self.caret.set(caret, &self.buffer);
        }
        self.refresh_session();
    }

    /// Moves the caret and mirrors the move onto the surface.
    pub fn move_caret<S: EditableSurface + ?Sized>(&mut self, movement: CaretMove, surface: &mut S) {
        let buffer = &self.buffer;
        match movement {
            CaretMove::Left => self.caret.move_left(),
            CaretMove::Right => self.caret.move_right(buffer),
            CaretMove::WordLeft => self.caret.move_word_left(buffer),
            CaretMove::WordRight => self.caret.move_word_right(buffer),
            CaretMove::LineStart => self.caret.move_to_line_start(buffer),
            CaretMove::LineEnd => self.caret.move_to_line_end(buffer),
            CaretMove::Up => self.caret.move_up(buffer),
            CaretMove::Down => self.caret.move_down(buffer),
            CaretMove::Start => self.caret.move_to_start(),
            CaretMove::End => self.caret.move_to_end(buffer),
            CaretMove::To(offset) => self.caret.set(offset, buffer),
        }
        caret_sync::restore(surface, self.caret.offset());
        self.refresh_session();
    }

    /// Runs the debounced render once its delay has passed. Returns true if
    /// the surface was rewritten.
    pub fn tick<S: EditableSurface + ?Sized>(&mut self, surface: &mut S, now: Instant) -> bool {
        if !self.debouncer.take_due(now) {
            return false;
        }
        if self.guard.is_active() {
            self.debouncer.schedule(now);
            return false;
        }
        self.render_into(surface)
    }

    /// Frame callback; releases the guard raised by the previous render.
    pub fn on_frame(&mut self) -> bool {
        self.guard.on_frame()
    }

    /// The surface lost focus.
    pub fn on_blur(&mut self, now: Instant) {
        self.blur.on_blur(now);
    }

    /// The surface regained focus.
    pub fn on_focus(&mut self) {
        self.blur.on_focus();
    }

    /// Resolves a pending blur once its delay has passed: the session is
    /// cancelled unless focus is on the surface or the dropdown. Returns true
    /// if the session was cancelled.
    pub fn resolve_blur(&mut self, target: FocusTarget, now: Instant) -> bool {
        if self.blur.should_cancel(now, target) && self.session.is_active() {
            self.session.cancel();
            return true;
        }
        false
    }

    /// Where to draw the dropdown, relative to the surface origin. `None`
    /// when no session is open.
    pub fn dropdown_position(
        &self,
        caret_rect: Rect,
        surface_rect: Rect,
        scroll: ScrollOffset,
    ) -> Option<DropdownPosition> {
        if !self.session.is_active() {
            return None;
        }
        Some(position::dropdown_position(
            caret_rect,
            surface_rect,
            scroll,
            self.options.dropdown_margin,
        ))
    }

    /// Stores `text` as the new content. Returns true if it differed.
    fn apply_content(&mut self, text: &str) -> bool {
        if self.buffer.to_string() == text {
            return false;
        }
        self.buffer = TextBuffer::from(text);
        self.caret.clamp(&self.buffer);
        self.mark_changed();
        true
    }

    fn mark_changed(&mut self) {
        self.content_version += 1;
        self.events.push(EditorEvent::Changed(self.buffer.to_string()));
    }

    /// Renders the content onto the surface and restores the caret, unless
    /// the content is what was rendered last. Returns true if the surface
    /// was rewritten.
    fn render_into<S: EditableSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let content = self.buffer.to_string();
        let Some(markup) = self.memo.render_if_changed(&content) else {
            return false;
        };
        // Already raised when a programmatic write lands in the same frame
        // as a render; the pending release still applies.
        self.guard.begin();
        surface.replace_content(&markup);
        caret_sync::restore(surface, self.caret.offset());
        self.guard.finish();
        tracing::debug!(
            chars = self.buffer.len_chars(),
            caret = self.caret.offset(),
            variables = markup.variables().count(),
            "rendered template surface"
        );
        true
    }
}
