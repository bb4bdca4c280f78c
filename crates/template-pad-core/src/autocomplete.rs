//! Autocomplete session for the variable dropdown.
//!
//! A session lives while an unterminated `{{` sits in front of the caret.
//! It keeps the filtered candidate list and the highlighted row, and turns
//! navigation keys into moves, commits, or cancellation. Splicing the chosen
//! name into the content is the editor's job.

use serde::{Deserialize, Serialize};

use crate::catalog::{Candidate, VariableCatalog};

/// What to show when no candidate matches the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    /// Keep the dropdown populated with the whole catalog.
    #[default]
    FallbackToAll,
    /// Show an empty list ("no matches").
    ShowNone,
}

/// Keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    Up,
    Down,
    Enter,
    Escape,
}

/// Result of feeding a key to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// The key was consumed without closing the session.
    Handled,
    /// The user chose a candidate; the session is now closed.
    Commit(Candidate),
    /// The session was cancelled.
    Cancelled,
    /// No active session; the host should process the key itself.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct AutocompleteSession {
    active: bool,
    trigger_offset: usize,
    query: String,
    filtered: Vec<Candidate>,
    highlighted_index: usize,
    policy: NoMatchPolicy,
}

impl AutocompleteSession {
    /// Creates an inactive session using `policy` for empty results.
    pub fn new(policy: NoMatchPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Char offset of the `{{` that opened the session.
    pub fn trigger_offset(&self) -> usize {
        self.trigger_offset
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filtered(&self) -> &[Candidate] {
        &self.filtered
    }

    pub fn highlighted_index(&self) -> usize {
        self.highlighted_index
    }

    pub fn highlighted(&self) -> Option<&Candidate> {
        self.filtered.get(self.highlighted_index)
    }

    pub fn policy(&self) -> NoMatchPolicy {
        self.policy
    }

    /// Opens a session for the `{{` at `trigger_offset` with an empty query.
    pub fn open(&mut self, trigger_offset: usize, catalog: &VariableCatalog) {
        self.active = true;
        self.trigger_offset = trigger_offset;
        self.query.clear();
        self.refilter(catalog);
        tracing::debug!(trigger_offset, "autocomplete opened");
    }

    /// Recomputes the filtered list for `query` and resets the highlight.
    pub fn update_query(&mut self, query: &str, catalog: &VariableCatalog) {
        if !self.active {
            return;
        }
        self.query.clear();
        self.query.push_str(query);
        self.refilter(catalog);
    }

    fn refilter(&mut self, catalog: &VariableCatalog) {
        let mut filtered = catalog.matching(&self.query);
        if filtered.is_empty() && self.policy == NoMatchPolicy::FallbackToAll {
            filtered = catalog.candidates().to_vec();
        }
        self.filtered = filtered;
        self.highlighted_index = 0;
    }

    /// Moves the highlight down one row, stopping at the last row.
    pub fn move_down(&mut self) {
        if self.highlighted_index + 1 < self.filtered.len() {
            self.highlighted_index += 1;
        }
    }

    /// Moves the highlight up one row, stopping at the first row.
    pub fn move_up(&mut self) {
        self.highlighted_index = self.highlighted_index.saturating_sub(1);
    }

    /// Highlights `index` (e.g. on pointer hover). Out-of-range indices are
    /// clamped to the last row.
    pub fn set_highlighted(&mut self, index: usize) {
        self.highlighted_index = index.min(self.filtered.len().saturating_sub(1));
    }

    /// Chooses the candidate at `index` and closes the session.
    ///
    /// With no candidate at `index` (e.g. an empty catalog) nothing happens
    /// and the session stays open.
    pub fn commit(&mut self, index: usize) -> Option<Candidate> {
        if !self.active {
            return None;
        }
        let candidate = self.filtered.get(index).cloned()?;
        self.close();
        tracing::debug!(name = %candidate.name, "autocomplete committed");
        Some(candidate)
    }

    /// Closes the session without choosing anything.
    pub fn cancel(&mut self) {
        if self.active {
            tracing::debug!(trigger_offset = self.trigger_offset, "autocomplete cancelled");
        }
        self.close();
    }

    fn close(&mut self) {
        self.active = false;
        self.query.clear();
        self.filtered.clear();
        self.highlighted_index = 0;
    }

    /// Keyboard state machine: Up/Down move the highlight without
    /// wrapping, Enter commits the highlighted row, Escape cancels.
    pub fn handle_key(&mut self, key: SessionKey) -> KeyAction {
        if !self.active {
            return KeyAction::Ignored;
        }
        match key {
            SessionKey::Down => {
                self.move_down();
                KeyAction::Handled
            }
            SessionKey::Up => {
                self.move_up();
                KeyAction::Handled
            }
            SessionKey::Enter => match self.commit(self.highlighted_index) {
                Some(candidate) => KeyAction::Commit(candidate),
                None => KeyAction::Handled,
            },
            SessionKey::Escape => {
                self.cancel();
                KeyAction::Cancelled
            }
        }
    }
}
