//! The rendering entry point.

use roteiro_script::ContentSegment;

use crate::node::{NodeStyle, RenderNode};
use crate::placeholder::{Placeholders, push_plain, push_styled, substitute};

/// Base pixel size when the operator has not adjusted the scale control.
pub const DEFAULT_BASE_PX: f32 = 16.0;

/// Render a step's content into a flat node sequence.
///
/// Without segments, the content goes through placeholder substitution and
/// newline splitting. With segments, a cursor advances through the content:
/// each segment's text is searched from the cursor, the gap before a match
/// is emitted plain, the match styled, and the cursor moves past it. A
/// segment whose text no longer occurs — stale after a content edit — is
/// skipped without dropping any surrounding text.
#[must_use]
pub fn render(
    content: &str,
    segments: &[ContentSegment],
    placeholders: &Placeholders,
    base_px: f32,
) -> Vec<RenderNode> {
    let mut nodes = Vec::new();

    if segments.is_empty() {
        substitute(content, placeholders, &mut nodes);
        return nodes;
    }

    let mut cursor = 0;
    for segment in segments {
        if segment.text.is_empty() {
            continue;
        }
        let Some(found) = content[cursor..].find(&segment.text) else {
            continue;
        };
        let start = cursor + found;
        push_plain(&content[cursor..start], &mut nodes);
        let style = NodeStyle::from_segment(&segment.style, base_px);
        push_styled(&segment.text, &style, &mut nodes);
        cursor = start + segment.text.len();
    }
    push_plain(&content[cursor..], &mut nodes);

    nodes
}
