//! Highlighter: turns plain content into [`Markup`].
//!
//! One left-to-right regex pass picks out complete `{{identifier}}` tokens;
//! everything between them (stray braces, unterminated `{{`) stays literal
//! text. `render` is pure, so identical content always yields identical
//! markup, and [`RenderMemo`] uses that to skip redundant re-renders.

use std::sync::LazyLock;

use regex::Regex;

use crate::markup::{Markup, Node};

static VARIABLE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").expect("variable token pattern is valid")
});

/// Renders `content` into markup. `render(s).plain_text() == s` for every `s`.
pub fn render(content: &str) -> Markup {
    let mut nodes = Vec::new();
    let mut last = 0;

    for caps in VARIABLE_TOKEN.captures_iter(content) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            nodes.push(Node::Text(content[last..whole.start()].to_string()));
        }
        nodes.push(Node::Variable {
            name: name.as_str().to_string(),
        });
        last = whole.end();
    }
    if last < content.len() {
        nodes.push(Node::Text(content[last..].to_string()));
    }

    Markup::from_nodes(nodes)
}

/// Distinct variable names used in `content`, in order of first use.
pub fn variable_names(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in VARIABLE_TOKEN.captures_iter(content) {
        if let Some(name) = caps.get(1) {
            if !names.iter().any(|n| n == name.as_str()) {
                names.push(name.as_str().to_string());
            }
        }
    }
    names
}

/// Remembers the last content that was rendered onto the surface.
#[derive(Debug, Clone, Default)]
pub struct RenderMemo {
    snapshot: Option<String>,
}

impl RenderMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `content` is exactly what was last rendered.
    pub fn is_current(&self, content: &str) -> bool {
        self.snapshot.as_deref() == Some(content)
    }

    /// Renders `content` unless it matches the snapshot, recording it.
    /// Returns `None` when the render was skipped.
    pub fn render_if_changed(&mut self, content: &str) -> Option<Markup> {
        if self.is_current(content) {
            return None;
        }
        let markup = render(content);
        self.snapshot = Some(content.to_string());
        Some(markup)
    }

    /// Forgets the snapshot so the next render always runs.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }
}
