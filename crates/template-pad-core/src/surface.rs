//! The editable surface seam.
//!
//! A surface is whatever the user actually types into: a contenteditable
//! DOM subtree in a browser, or the in-memory [`MarkupSurface`] used by the
//! egui host and the tests. The editor only talks to it through
//! [`EditableSurface`], which exposes text nodes in document order plus a
//! collapsed selection, mirroring the platform selection APIs.

use crate::markup::{Markup, Node};

/// A collapsed selection: node index plus char offset inside that node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfacePoint {
    pub node: usize,
    pub offset: usize,
}

impl SurfacePoint {
    pub fn new(node: usize, offset: usize) -> Self {
        Self { node, offset }
    }
}

pub trait EditableSurface {
    /// Text of every text node, in document order.
    fn text_nodes(&self) -> Vec<&str>;

    /// Whether typing inside node `index` is expected (false for inert
    /// variable spans).
    fn is_editable_node(&self, _index: usize) -> bool {
        true
    }

    /// Current collapsed selection, if the surface has one.
    fn selection(&self) -> Option<SurfacePoint>;

    /// Places a collapsed selection.
    fn set_selection(&mut self, point: SurfacePoint);

    /// Replaces the whole content with rendered markup. The selection is
    /// lost, as it would be when a DOM subtree is swapped out.
    fn replace_content(&mut self, markup: &Markup);

    /// Appends an empty editable text node and returns its index.
    fn push_empty_text_node(&mut self) -> usize;

    /// Concatenated text of all nodes.
    fn plain_text(&self) -> String {
        self.text_nodes().concat()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceNodeKind {
    Text,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceNode {
    pub kind: SurfaceNodeKind,
    pub text: String,
}

impl SurfaceNode {
    fn text(text: impl Into<String>) -> Self {
        Self {
            kind: SurfaceNodeKind::Text,
            text: text.into(),
        }
    }

    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// In-memory surface behaving like a contenteditable subtree: typing goes
/// into whichever node holds the selection (including a variable span) and
/// stays there until the next render replaces the nodes.
#[derive(Debug, Clone, Default)]
pub struct MarkupSurface {
    nodes: Vec<SurfaceNode>,
    selection: Option<SurfacePoint>,
    /// Number of `replace_content` calls, i.e. renders applied.
    renders: u64,
}

impl MarkupSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface holding `text` as a single unformatted text node, with the
    /// caret at its end.
    pub fn from_text(text: &str) -> Self {
        let mut surface = Self::new();
        if !text.is_empty() {
            surface.nodes.push(SurfaceNode::text(text));
            surface.selection = Some(SurfacePoint::new(0, text.chars().count()));
        }
        surface
    }

    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Global char offset of the selection (end of content if none).
    pub fn caret_offset(&self) -> usize {
        crate::caret_sync::save(self).unwrap_or_else(|| self.total_chars())
    }

    /// Moves the selection to a global char offset.
    pub fn set_caret_offset(&mut self, offset: usize) {
        crate::caret_sync::restore(self, offset);
    }

    fn total_chars(&self) -> usize {
        self.nodes.iter().map(SurfaceNode::len_chars).sum()
    }

    /// Inserts `text` at the selection, the way a browser would for a
    /// keystroke or paste. Without a selection the caret goes to the end.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let point = match self.selection {
            Some(point) if point.node < self.nodes.len() => point,
            _ => {
                let end = self.total_chars();
                crate::caret_sync::restore(self, end)
            }
        };
        let node = &mut self.nodes[point.node];
        let local = point.offset.min(node.len_chars());
        let byte = byte_index(&node.text, local);
        node.text.insert_str(byte, text);
        self.selection = Some(SurfacePoint::new(
            point.node,
            local + text.chars().count(),
        ));
    }

    /// Deletes the character before the caret. Returns false at the start.
    pub fn delete_backward(&mut self) -> bool {
        let caret = self.caret_offset();
        if caret == 0 {
            return false;
        }
        self.delete_char_at(caret - 1)
    }

    /// Deletes the character after the caret. Returns false at the end.
    pub fn delete_forward(&mut self) -> bool {
        let caret = self.caret_offset();
        if caret >= self.total_chars() {
            return false;
        }
        self.delete_char_at(caret)
    }

    /// Removes the char at global offset `target` from the node holding it
    /// and leaves the caret where that char was.
    fn delete_char_at(&mut self, target: usize) -> bool {
        let mut start = 0;
        for (index, node) in self.nodes.iter_mut().enumerate() {
            let len = node.len_chars();
            if target < start + len {
                let local = target - start;
                let byte = byte_index(&node.text, local);
                node.text.remove(byte);
                self.selection = Some(SurfacePoint::new(index, local));
                return true;
            }
            start += len;
        }
        false
    }
}

impl EditableSurface for MarkupSurface {
    fn text_nodes(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.text.as_str()).collect()
    }

    fn is_editable_node(&self, index: usize) -> bool {
        self.nodes
            .get(index)
            .is_some_and(|n| n.kind == SurfaceNodeKind::Text)
    }

    fn selection(&self) -> Option<SurfacePoint> {
        self.selection
    }

    fn set_selection(&mut self, point: SurfacePoint) {
        self.selection = Some(point);
    }

    fn replace_content(&mut self, markup: &Markup) {
        self.nodes = markup
            .nodes()
            .iter()
            .map(|node| match node {
                Node::Text(text) => SurfaceNode::text(text.as_str()),
                Node::Variable { .. } => SurfaceNode {
                    kind: SurfaceNodeKind::Variable,
                    text: node.source_text(),
                },
            })
            .collect();
        self.selection = None;
        self.renders += 1;
    }

    fn push_empty_text_node(&mut self) -> usize {
        self.nodes.push(SurfaceNode::text(""));
        self.nodes.len() - 1
    }
}

/// Byte index of the `chars`-th character of `s` (or `s.len()`).
fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(byte, _)| byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::render;

    #[test]
    fn test_from_text_places_caret_at_end() {
        let surface = MarkupSurface::from_text("Olá");
        assert_eq!(surface.caret_offset(), 3);
        assert_eq!(surface.plain_text(), "Olá");
    }

    #[test]
    fn test_empty_surface_has_no_nodes() {
        let surface = MarkupSurface::from_text("");
        assert!(surface.nodes().is_empty());
        assert_eq!(surface.selection(), None);
        assert_eq!(surface.caret_offset(), 0);
    }

    #[test]
    fn test_insert_into_empty_surface_creates_text_node() {
        let mut surface = MarkupSurface::new();
        surface.insert_text("H");
        surface.insert_text("i");
        assert_eq!(surface.plain_text(), "Hi");
        assert_eq!(surface.caret_offset(), 2);
    }

    #[test]
    fn test_replace_content_builds_nodes_and_drops_selection() {
        let mut surface = MarkupSurface::from_text("Hi {{name}}!");
        surface.replace_content(&render("Hi {{name}}!"));
        let kinds: Vec<SurfaceNodeKind> = surface.nodes().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SurfaceNodeKind::Text,
                SurfaceNodeKind::Variable,
                SurfaceNodeKind::Text
            ]
        );
        assert_eq!(surface.selection(), None);
        assert_eq!(surface.render_count(), 1);
        assert!(!surface.is_editable_node(1));
        assert!(surface.is_editable_node(2));
    }

    #[test]
    fn test_insert_in_middle_of_node() {
        let mut surface = MarkupSurface::from_text("Hi !");
        surface.set_caret_offset(3);
        surface.insert_text("there");
        assert_eq!(surface.plain_text(), "Hi there!");
        assert_eq!(surface.caret_offset(), 8);
    }

    #[test]
    fn test_delete_backward_across_nodes() {
        let mut surface = MarkupSurface::new();
        surface.replace_content(&render("ab{{x}}cd"));
        surface.set_caret_offset(7); // between "}}" and "cd"
        assert!(surface.delete_backward());
        assert_eq!(surface.plain_text(), "ab{{x}cd");
        assert_eq!(surface.caret_offset(), 6);
    }

    #[test]
    fn test_delete_at_bounds() {
        let mut surface = MarkupSurface::from_text("ab");
        assert!(!surface.delete_forward());
        surface.set_caret_offset(0);
        assert!(!surface.delete_backward());
        assert!(surface.delete_forward());
        assert_eq!(surface.plain_text(), "b");
        assert_eq!(surface.caret_offset(), 0);
    }

    #[test]
    fn test_delete_multibyte_char() {
        let mut surface = MarkupSurface::from_text("a🎉b");
        surface.set_caret_offset(2);
        assert!(surface.delete_backward());
        assert_eq!(surface.plain_text(), "ab");
        assert_eq!(surface.caret_offset(), 1);
    }

    /// Surface that only supplies the required methods.
    struct PlainSurface {
        nodes: Vec<String>,
        selection: Option<SurfacePoint>,
    }

    impl EditableSurface for PlainSurface {
        fn text_nodes(&self) -> Vec<&str> {
            self.nodes.iter().map(String::as_str).collect()
        }

        fn selection(&self) -> Option<SurfacePoint> {
            self.selection
        }

        fn set_selection(&mut self, point: SurfacePoint) {
            self.selection = Some(point);
        }

        fn replace_content(&mut self, markup: &Markup) {
            self.nodes = vec![markup.plain_text()];
            self.selection = None;
        }

        fn push_empty_text_node(&mut self) -> usize {
            self.nodes.push(String::new());
            self.nodes.len() - 1
        }
    }

    #[test]
    fn test_default_methods_treat_every_node_as_editable() {
        let mut surface = PlainSurface {
            nodes: vec!["Hi ".into(), "{{name}}".into()],
            selection: None,
        };
        assert!(surface.is_editable_node(1));
        assert_eq!(surface.plain_text(), "Hi {{name}}");

        // End of the last node holds the caret, no empty node appended
        let point = crate::caret_sync::restore(&mut surface, 11);
        assert_eq!(point, SurfacePoint::new(1, 8));
        assert_eq!(surface.nodes.len(), 2);
    }
}
