//! Editor core for message templates containing `{{variable}}` placeholders.
//!
//! The core owns the plain-text content and caret, detects open `{{`
//! triggers, drives the autocomplete session, renders content into a safe
//! markup tree, and restores the caret after the rendered surface has been
//! replaced. It performs no I/O: hosts feed it surface snapshots, key presses
//! and timestamps, and read back plain strings and events.

pub mod autocomplete;
pub mod buffer;
pub mod caret;
pub mod caret_sync;
pub mod catalog;
pub mod editor;
pub mod focus;
pub mod guard;
pub mod highlight;
pub mod markup;
pub mod position;
pub mod surface;
pub mod trigger;

pub use autocomplete::{AutocompleteSession, KeyAction, NoMatchPolicy, SessionKey};
pub use catalog::{Candidate, VariableCatalog};
pub use editor::{CaretMove, EditorEvent, EditorKey, EditorOptions, KeyOutcome, TemplateEditor};
pub use focus::FocusTarget;
pub use markup::{Markup, Node};
pub use position::{DropdownPosition, Rect, ScrollOffset};
pub use surface::{EditableSurface, MarkupSurface, SurfacePoint};
pub use trigger::Trigger;
