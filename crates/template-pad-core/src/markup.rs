//! Rendered form of the template content.
//!
//! A `Markup` is an ordered list of plain-text and variable nodes. It can
//! only be built by the highlighter, and its only HTML serialization escapes
//! every text node, so user text can never reach the output as tags.

use std::fmt::Write as _;

/// CSS class carried by rendered variable spans.
pub const VARIABLE_CLASS: &str = "template-variable";

/// A single rendered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, including malformed or partial brace sequences.
    Text(String),
    /// A complete `{{name}}` token.
    Variable { name: String },
}

impl Node {
    /// The exact source text this node stands for.
    pub fn source_text(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Variable { name } => variable_literal(name),
        }
    }

    /// Length of the source text in characters.
    pub fn len_chars(&self) -> usize {
        match self {
            Node::Text(text) => text.chars().count(),
            Node::Variable { name } => name.chars().count() + 4,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Node::Variable { .. })
    }
}

/// Formats `name` as `{{name}}`.
pub fn variable_literal(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    nodes: Vec<Node>,
}

impl Markup {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Concatenated source text of all nodes. For markup produced by the
    /// highlighter this equals the content it was rendered from.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Variable { name } => {
                    out.push_str("{{");
                    out.push_str(name);
                    out.push_str("}}");
                }
            }
        }
        out
    }

    /// Names of the variable nodes in document order (duplicates kept).
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Variable { name } => Some(name.as_str()),
            Node::Text(_) => None,
        })
    }

    /// Serializes to HTML suitable for a contenteditable host.
    ///
    /// Text is escaped; variables become inert spans whose text content is
    /// the literal token, so reading the text back reproduces the content.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => escape_html_into(text, &mut out),
                Node::Variable { name } => {
                    // Names are identifiers, so they need no escaping.
                    let _ = write!(
                        out,
                        r#"<span class="{VARIABLE_CLASS}" contenteditable="false" data-variable="{name}">{{{{{name}}}}}</span>"#
                    );
                }
            }
        }
        out
    }
}

/// Appends `text` to `out` with HTML special characters escaped.
pub fn escape_html_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Returns `text` with HTML special characters escaped.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_html_into(text, &mut out);
    out
}

/// Reads back the text content of HTML produced by [`Markup::to_html`]:
/// tags are dropped and the entities emitted by the escaper are decoded.
/// Unknown entities are kept verbatim.
pub fn text_content(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(pos) = rest.find(['<', '&']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        if rest.starts_with('<') {
            match rest.find('>') {
                Some(end) => rest = &rest[end + 1..],
                None => {
                    rest = "";
                }
            }
            continue;
        }
        let decoded = [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
            ("&#39;", '\''),
        ]
        .into_iter()
        .find(|(entity, _)| rest.starts_with(entity));
        match decoded {
            Some((entity, ch)) => {
                out.push(ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Markup {
        Markup::from_nodes(vec![
            Node::Text("Hi ".into()),
            Node::Variable {
                name: "clientName".into(),
            },
            Node::Text(" <3 & more".into()),
        ])
    }

    #[test]
    fn test_plain_text_concatenates_sources() {
        assert_eq!(sample().plain_text(), "Hi {{clientName}} <3 & more");
    }

    #[test]
    fn test_node_lengths() {
        let nodes = sample();
        let lens: Vec<usize> = nodes.nodes().iter().map(Node::len_chars).collect();
        assert_eq!(lens, vec![3, 14, 10]);
        assert_eq!(nodes.nodes()[1].source_text(), "{{clientName}}");
    }

    #[test]
    fn test_to_html_escapes_text_and_wraps_variables() {
        assert_eq!(
            sample().to_html(),
            "Hi <span class=\"template-variable\" contenteditable=\"false\" \
             data-variable=\"clientName\">{{clientName}}</span> &lt;3 &amp; more"
        );
    }

    #[test]
    fn test_text_content_round_trips_html() {
        let markup = sample();
        assert_eq!(text_content(&markup.to_html()), markup.plain_text());
    }

    #[test]
    fn test_escape_html_covers_quotes() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_text_content_keeps_unknown_entities() {
        assert_eq!(text_content("a &nbsp; b"), "a &nbsp; b");
        assert_eq!(text_content("trailing &"), "trailing &");
    }

    #[test]
    fn test_variables_in_order() {
        let markup = Markup::from_nodes(vec![
            Node::Variable { name: "a".into() },
            Node::Text("-".into()),
            Node::Variable { name: "b".into() },
            Node::Variable { name: "a".into() },
        ]);
        assert_eq!(markup.variables().collect::<Vec<_>>(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_variable_literal() {
        assert_eq!(variable_literal("clientBonus"), "{{clientBonus}}");
    }
}
