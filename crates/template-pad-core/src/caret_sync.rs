//! Caret synchronizer: converts between a surface selection and a global
//! char offset, so the caret survives the surface being re-rendered.

use crate::surface::{EditableSurface, SurfacePoint};

/// Computes the caret's char offset from the start of the surface: the
/// lengths of all text nodes before the selection node plus the local
/// offset. Returns `None` when the surface has no selection.
pub fn save<S: EditableSurface + ?Sized>(surface: &S) -> Option<usize> {
    let point = surface.selection()?;
    let nodes = surface.text_nodes();
    let before: usize = nodes
        .iter()
        .take(point.node)
        .map(|text| text.chars().count())
        .sum();
    let local = nodes
        .get(point.node)
        .map_or(0, |text| point.offset.min(text.chars().count()));
    Some(before + local)
}

/// Places a collapsed selection at char `offset`, walking the text nodes in
/// document order. Never fails:
///
/// - at a boundary between two nodes, an editable node is preferred over an
///   inert variable span;
/// - past the end, the caret goes to the end of the last node;
/// - if there are no nodes, or the last node is a variable span, an empty
///   text node is appended to hold the caret.
pub fn restore<S: EditableSurface + ?Sized>(surface: &mut S, offset: usize) -> SurfacePoint {
    let point = locate(surface, offset);
    surface.set_selection(point);
    point
}

fn locate<S: EditableSurface + ?Sized>(surface: &mut S, offset: usize) -> SurfacePoint {
    let lengths: Vec<usize> = surface
        .text_nodes()
        .iter()
        .map(|text| text.chars().count())
        .collect();

    let mut start = 0;
    for (index, &len) in lengths.iter().enumerate() {
        let end = start + len;
        if offset < end {
            return SurfacePoint::new(index, offset - start);
        }
        if offset == end {
            let is_last = index + 1 == lengths.len();
            if surface.is_editable_node(index) {
                return SurfacePoint::new(index, len);
            }
            if is_last {
                break;
            }
            // Boundary after an inert span: continue into the next node.
        }
        start = end;
    }

    match lengths.last() {
        Some(&len) if surface.is_editable_node(lengths.len() - 1) => {
            if offset > start {
                tracing::debug!(offset, total = start, "caret offset past end, clamping");
            }
            SurfacePoint::new(lengths.len() - 1, len)
        }
        _ => SurfacePoint::new(surface.push_empty_text_node(), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::render;
    use crate::surface::MarkupSurface;

    fn rendered(content: &str) -> MarkupSurface {
        let mut surface = MarkupSurface::new();
        surface.replace_content(&render(content));
        surface
    }

    #[test]
    fn test_save_without_selection() {
        let surface = rendered("abc");
        assert_eq!(save(&surface), None);
    }

    #[test]
    fn test_restore_then_save_is_identity() {
        let content = "Hi {{clientName}}, you have {{clientBonus}} points";
        let mut surface = rendered(content);
        for offset in 0..=content.chars().count() {
            restore(&mut surface, offset);
            assert_eq!(save(&surface), Some(offset), "offset {offset}");
        }
    }

    #[test]
    fn test_restore_inside_variable_span() {
        let mut surface = rendered("a{{xy}}b");
        let point = restore(&mut surface, 3);
        assert_eq!(point, SurfacePoint::new(1, 2));
    }

    #[test]
    fn test_restore_prefers_text_node_after_span() {
        let mut surface = rendered("a{{xy}}b");
        let point = restore(&mut surface, 7);
        assert_eq!(point, SurfacePoint::new(2, 0));
    }

    #[test]
    fn test_restore_at_text_boundary_stays_in_left_node() {
        let mut surface = rendered("ab{{x}}");
        let point = restore(&mut surface, 2);
        assert_eq!(point, SurfacePoint::new(0, 2));
    }

    #[test]
    fn test_restore_after_trailing_span_appends_text_node() {
        let mut surface = rendered("Hi {{name}}");
        let point = restore(&mut surface, 11);
        assert_eq!(point, SurfacePoint::new(2, 0));
        assert_eq!(surface.nodes().len(), 3);
        assert_eq!(surface.plain_text(), "Hi {{name}}");
        assert_eq!(save(&surface), Some(11));
    }

    #[test]
    fn test_restore_past_end_clamps_to_last_text_node() {
        let mut surface = rendered("abc");
        let point = restore(&mut surface, 50);
        assert_eq!(point, SurfacePoint::new(0, 3));
    }

    #[test]
    fn test_restore_on_empty_surface_creates_node() {
        let mut surface = MarkupSurface::new();
        let point = restore(&mut surface, 4);
        assert_eq!(point, SurfacePoint::new(0, 0));
        assert_eq!(surface.nodes().len(), 1);
        assert_eq!(save(&surface), Some(0));
    }

    #[test]
    fn test_save_clamps_stale_local_offset() {
        let mut surface = rendered("abc");
        surface.set_selection(SurfacePoint::new(0, 99));
        assert_eq!(save(&surface), Some(3));
    }
}
