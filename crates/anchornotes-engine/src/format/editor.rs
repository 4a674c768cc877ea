//! Formatting commands for an explicit selection `[start, end)`.
//!
//! Every command first checks that both offsets lie within the buffer and
//! returns [`FormatError::InvalidRange`] otherwise; offsets are never clamped.
//! An empty or reversed selection (`start >= end`) is not an error: the
//! command does nothing and returns `Ok(false)`.
//!
//! Toggling is range-wide. When any matching span touches the selection, all
//! of them are removed whole, including the parts that extend past the
//! selection edges.

use log::debug;

use crate::error::FormatError;

use super::span::{FormatKind, FormatSpan, TextSize};
use super::styled_text::StyledText;

/// Toggle bold over `[start, end)`.
///
/// Removes every `Bold` or `BoldItalic` span overlapping the range if there
/// is one, otherwise adds a `Bold` span over exactly the range.
pub fn toggle_bold(buffer: &mut StyledText, start: usize, end: usize) -> Result<bool, FormatError> {
    toggle(buffer, start, end, FormatKind::Bold, FormatKind::is_bold)
}

/// Toggle italic over `[start, end)`. Mirror image of [`toggle_bold`].
pub fn toggle_italic(
    buffer: &mut StyledText,
    start: usize,
    end: usize,
) -> Result<bool, FormatError> {
    toggle(buffer, start, end, FormatKind::Italic, FormatKind::is_italic)
}

/// Replace the size class of `[start, end)`.
///
/// Removes every size span overlapping the range, then adds a span for
/// `size` unless it is `Medium`, which is represented by having no span.
pub fn apply_size(
    buffer: &mut StyledText,
    start: usize,
    end: usize,
    size: TextSize,
) -> Result<bool, FormatError> {
    buffer.check_bounds(start, end)?;
    if start >= end {
        return Ok(false);
    }

    let removed = buffer.remove_spans(|s| s.kind.is_size() && s.overlaps(start, end));
    debug!("apply_size {size:?} over {start}..{end}: removed {removed} size spans");

    if let Some(kind) = size.format_kind() {
        buffer.add_span(FormatSpan::new(start, end, kind))?;
    }
    Ok(true)
}

fn toggle(
    buffer: &mut StyledText,
    start: usize,
    end: usize,
    kind: FormatKind,
    is_kind: fn(FormatKind) -> bool,
) -> Result<bool, FormatError> {
    buffer.check_bounds(start, end)?;
    if start >= end {
        return Ok(false);
    }

    let removed = buffer.remove_spans(|s| is_kind(s.kind) && s.overlaps(start, end));
    if removed > 0 {
        debug!("toggle {kind:?} over {start}..{end}: removed {removed} spans");
        return Ok(true);
    }

    buffer.add_span(FormatSpan::new(start, end, kind))?;
    Ok(true)
}
