//! Turns the surface nodes into per-line styled runs and egui layout jobs.
//!
//! The editor uses a monospace font, so a column maps to `col * char_width`
//! without measuring glyphs.

use egui::{text::LayoutJob, Color32, FontId, TextFormat};
use template_pad_core::surface::{SurfaceNode, SurfaceNodeKind};
use template_pad_core::trigger::{CLOSE, OPEN};
use template_pad_core::VariableCatalog;

use super::theme::EditorTheme;

/// How a run of text is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Plain,
    /// Variable span whose name the catalog lists.
    Known,
    /// Variable span with a name the catalog does not list.
    Unknown,
}

/// The name inside a `{{name}}` span, if the span still has that shape.
pub fn token_name(text: &str) -> Option<&str> {
    text.strip_prefix(OPEN)?.strip_suffix(CLOSE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StyledRun {
    pub text: String,
    pub kind: TokenKind,
}

fn node_kind(node: &SurfaceNode, catalog: &VariableCatalog) -> TokenKind {
    match node.kind {
        SurfaceNodeKind::Text => TokenKind::Plain,
        SurfaceNodeKind::Variable => match token_name(&node.text) {
            Some(name) if catalog.contains(name) => TokenKind::Known,
            _ => TokenKind::Unknown,
        },
    }
}

/// Splits the nodes at newlines. Always returns at least one (possibly
/// empty) line.
pub(crate) fn split_lines(nodes: &[SurfaceNode], catalog: &VariableCatalog) -> Vec<Vec<StyledRun>> {
    let mut lines: Vec<Vec<StyledRun>> = vec![Vec::new()];
    for node in nodes {
        let kind = node_kind(node, catalog);
        for (i, piece) in node.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if piece.is_empty() {
                continue;
            }
            if let Some(line) = lines.last_mut() {
                line.push(StyledRun {
                    text: piece.to_string(),
                    kind,
                });
            }
        }
    }
    lines
}

pub(crate) fn line_job(runs: &[StyledRun], theme: &EditorTheme, font_id: &FontId) -> LayoutJob {
    let mut job = LayoutJob::default();
    for run in runs {
        let (color, background) = match run.kind {
            TokenKind::Plain => (theme.text_color, Color32::TRANSPARENT),
            TokenKind::Known => (theme.known_variable, theme.known_variable_bg),
            TokenKind::Unknown => (theme.unknown_variable, theme.unknown_variable_bg),
        };
        job.append(
            &run.text,
            0.0,
            TextFormat {
                font_id: font_id.clone(),
                color,
                background,
                ..Default::default()
            },
        );
    }
    job
}

/// Column nearest to `x` (relative to the text origin).
pub(crate) fn column_at(x: f32, char_width: f32) -> usize {
    if char_width <= 0.0 || x <= 0.0 {
        return 0;
    }
    (x / char_width).round() as usize
}

/// Line under `y` (relative to the text origin).
pub(crate) fn line_at(y: f32, line_height: f32) -> usize {
    if line_height <= 0.0 || y <= 0.0 {
        return 0;
    }
    (y / line_height).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use template_pad_core::highlight::render;
    use template_pad_core::{Candidate, EditableSurface, MarkupSurface};

    fn nodes(content: &str) -> Vec<SurfaceNode> {
        let mut surface = MarkupSurface::new();
        surface.replace_content(&render(content));
        surface.nodes().to_vec()
    }

    fn catalog() -> VariableCatalog {
        VariableCatalog::new(vec![Candidate::new("clientName", "")])
    }

    #[test]
    fn test_token_name() {
        assert_eq!(token_name("{{abc}}"), Some("abc"));
        assert_eq!(token_name("{{abc}"), None);
        assert_eq!(token_name("abc"), None);
    }

    #[test]
    fn test_split_lines_marks_known_and_unknown() {
        let lines = split_lines(&nodes("Hi {{clientName}}\nbye {{other}}"), &catalog());
        assert_eq!(lines.len(), 2);
        let kinds: Vec<TokenKind> = lines[0].iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Plain, TokenKind::Known]);
        assert_eq!(lines[1][1].kind, TokenKind::Unknown);
        assert_eq!(lines[1][0].text, "bye ");
    }

    #[test]
    fn test_split_lines_keeps_trailing_empty_line() {
        let lines = split_lines(&nodes("a\n"), &catalog());
        assert_eq!(lines.len(), 2);
        assert!(lines[1].is_empty());
        assert_eq!(split_lines(&[], &catalog()).len(), 1);
    }

    #[test]
    fn test_edited_span_is_unknown() {
        let mut nodes = nodes("{{clientName}}");
        nodes[0].text = "{{clientNamex}".to_string();
        let lines = split_lines(&nodes, &catalog());
        assert_eq!(lines[0][0].kind, TokenKind::Unknown);
    }

    #[test]
    fn test_hit_testing() {
        assert_eq!(column_at(-5.0, 8.0), 0);
        assert_eq!(column_at(11.0, 8.0), 1);
        assert_eq!(column_at(13.0, 8.0), 2);
        assert_eq!(line_at(0.0, 20.0), 0);
        assert_eq!(line_at(39.0, 20.0), 1);
        assert_eq!(line_at(41.0, 20.0), 2);
    }
}
