use log::debug;

use crate::format::{FormatSpan, StyledText};

use super::render::{EmphasisRenderer, Rendered};
use super::tags;

/// Parse markdown written by [`to_markdown`](super::serialize::to_markdown)
/// back into a styled buffer.
///
/// Never fails. Tags are stripped first, the remaining bold/italic
/// markdown is handed to `renderer`, and the tag ranges are then mapped
/// through the renderer's offset table onto the rendered text. A tag range
/// that does not land inside the rendered text is dropped.
pub fn from_markdown<R: EmphasisRenderer>(markdown: &str, renderer: &R) -> StyledText {
    if markdown.is_empty() {
        return StyledText::new();
    }

    let clean = tags::extract(markdown);
    let Rendered {
        mut buffer,
        offsets,
    } = renderer.render(&clean.text);

    for range in clean.ranges {
        let (Some(&start), Some(&end)) = (offsets.get(range.start), offsets.get(range.end)) else {
            debug!(
                "{:?} range {}..{} outside rendered offsets, dropping",
                range.kind, range.start, range.end
            );
            continue;
        };

        if start >= end || end > buffer.len() {
            debug!(
                "{:?} range {start}..{end} empty or outside text of length {}, dropping",
                range.kind,
                buffer.len()
            );
            continue;
        }

        if let Err(err) = buffer.add_span(FormatSpan::new(start, end, range.kind)) {
            debug!("dropping {:?} range: {err}", range.kind);
        }
    }

    buffer
}
