use crate::error::FormatError;

use super::span::{Attribute, FormatKind, FormatSpan};

/// Text content plus the formatting spans decorating it.
///
/// All offsets are char offsets. Spans may overlap freely, including spans of
/// the same kind; the buffer never merges or normalizes them.
///
/// Spans behave like exclusive-exclusive rich-text spans when the text is
/// edited through [`insert`](Self::insert), [`delete`](Self::delete) or
/// [`replace_range`](Self::replace_range): text inserted at either edge of a
/// span stays outside it, text inserted strictly inside extends it, and a span
/// whose content is deleted entirely disappears.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledText {
    text: String,
    /// Char count of `text`, kept in step with every mutation.
    len: usize,
    spans: Vec<FormatSpan>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unformatted buffer holding `text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            len,
            spans: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Spans in attachment order.
    pub fn spans(&self) -> &[FormatSpan] {
        &self.spans
    }

    /// Spans ordered by `(start, end, kind)`, for stable comparisons.
    pub fn sorted_spans(&self) -> Vec<FormatSpan> {
        let mut spans = self.spans.clone();
        spans.sort_by_key(|s| (s.start, s.end, s.kind));
        spans
    }

    pub fn spans_of(&self, kind: FormatKind) -> impl Iterator<Item = FormatSpan> + '_ {
        self.spans.iter().copied().filter(move |s| s.kind == kind)
    }

    /// Spans sharing at least one char with `[start, end)`.
    pub fn overlapping(&self, start: usize, end: usize) -> impl Iterator<Item = FormatSpan> + '_ {
        self.spans
            .iter()
            .copied()
            .filter(move |s| s.overlaps(start, end))
    }

    /// True if a span of `kind` covers exactly `[start, end)`.
    pub fn has_span(&self, start: usize, end: usize, kind: FormatKind) -> bool {
        self.spans.contains(&FormatSpan::new(start, end, kind))
    }

    /// Fail with `InvalidRange` unless both offsets lie within the buffer.
    ///
    /// Ordering is not checked; `start >= end` is a legal empty selection.
    pub fn check_bounds(&self, start: usize, end: usize) -> Result<(), FormatError> {
        if start > self.len || end > self.len {
            return Err(self.invalid_range(start, end));
        }
        Ok(())
    }

    /// Attach a span. The span must satisfy `start < end <= len`.
    pub fn add_span(&mut self, span: FormatSpan) -> Result<(), FormatError> {
        if span.start >= span.end || span.end > self.len {
            return Err(self.invalid_range(span.start, span.end));
        }
        self.spans.push(span);
        Ok(())
    }

    /// Attach an externally produced attribute, translating it to a
    /// [`FormatKind`]. Returns the kind stored, or `None` when the attribute
    /// carries no formatting (a default-size scale).
    pub fn apply_attribute(
        &mut self,
        start: usize,
        end: usize,
        attribute: Attribute,
    ) -> Result<Option<FormatKind>, FormatError> {
        let Some(kind) = FormatKind::from_attribute(attribute) else {
            return Ok(None);
        };
        self.add_span(FormatSpan::new(start, end, kind))?;
        Ok(Some(kind))
    }

    /// Remove every span matching `pred`, returning how many were removed.
    pub fn remove_spans<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&FormatSpan) -> bool,
    {
        let before = self.spans.len();
        self.spans.retain(|s| !pred(s));
        before - self.spans.len()
    }

    /// Char at `pos`, if any.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.text.chars().nth(pos)
    }

    /// The text between two char offsets. Offsets past the end are clamped.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.len);
        let start = start.min(end);
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }

    /// Insert `text` at char offset `at`.
    pub fn insert(&mut self, at: usize, text: &str) -> Result<(), FormatError> {
        self.replace_range(at, at, text)
    }

    /// Delete the chars in `[start, end)`.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<(), FormatError> {
        self.replace_range(start, end, "")
    }

    /// Replace the chars in `[start, end)` with `text`, moving spans along.
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) -> Result<(), FormatError> {
        if start > end || end > self.len {
            return Err(self.invalid_range(start, end));
        }

        let byte_start = self.byte_offset(start);
        let byte_end = self.byte_offset(end);
        self.text.replace_range(byte_start..byte_end, text);

        let inserted = text.chars().count();
        self.len = self.len - (end - start) + inserted;

        let shift = |pos: usize| pos - end + start + inserted;
        for span in &mut self.spans {
            if span.end <= start {
                continue;
            }
            if span.start >= end {
                span.start = shift(span.start);
                span.end = shift(span.end);
                continue;
            }
            // Edges inside the replaced region snap outwards: a start moves
            // past the new text, an end moves before it.
            if span.start >= start {
                span.start = start + inserted;
            }
            span.end = if span.end >= end { shift(span.end) } else { start };
        }
        self.spans.retain(|s| s.start < s.end);

        Ok(())
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn invalid_range(&self, start: usize, end: usize) -> FormatError {
        FormatError::InvalidRange {
            start,
            end,
            len: self.len,
        }
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::from_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bold(start: usize, end: usize) -> FormatSpan {
        FormatSpan::new(start, end, FormatKind::Bold)
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let text = StyledText::from_text("héllo ☐");
        assert_eq!(text.len(), 7);
        assert_eq!(text.slice(1, 5), "éllo");
        assert_eq!(text.char_at(6), Some('☐'));
    }

    #[test]
    fn add_span_rejects_empty_and_out_of_bounds() {
        let mut text = StyledText::from_text("abc");
        assert_eq!(
            text.add_span(bold(2, 2)),
            Err(FormatError::InvalidRange {
                start: 2,
                end: 2,
                len: 3
            })
        );
        assert!(text.add_span(bold(1, 4)).is_err());
        assert!(text.add_span(bold(0, 3)).is_ok());
        assert_eq!(text.spans(), &[bold(0, 3)]);
    }

    #[test]
    fn default_size_attribute_adds_nothing() {
        let mut text = StyledText::from_text("abc");
        let kind = text
            .apply_attribute(0, 3, Attribute::RelativeSize(1.0))
            .unwrap();
        assert_eq!(kind, None);
        assert!(text.spans().is_empty());

        let kind = text
            .apply_attribute(0, 3, Attribute::RelativeSize(0.78))
            .unwrap();
        assert_eq!(kind, Some(FormatKind::Small));
    }

    #[test]
    fn insert_at_span_edges_does_not_extend() {
        let mut text = StyledText::from_text("abcdef");
        text.add_span(bold(2, 4)).unwrap();

        text.insert(2, "X").unwrap();
        assert_eq!(text.text(), "abXcdef");
        assert_eq!(text.spans(), &[bold(3, 5)]);

        text.insert(5, "Y").unwrap();
        assert_eq!(text.text(), "abXcdYef");
        assert_eq!(text.spans(), &[bold(3, 5)]);
    }

    #[test]
    fn insert_inside_span_extends_it() {
        let mut text = StyledText::from_text("abcdef");
        text.add_span(bold(1, 5)).unwrap();
        text.insert(3, "XYZ").unwrap();
        assert_eq!(text.text(), "abcXYZdef");
        assert_eq!(text.spans(), &[bold(1, 8)]);
    }

    #[test]
    fn delete_shrinks_and_drops_spans() {
        let mut text = StyledText::from_text("abcdefgh");
        text.add_span(bold(1, 4)).unwrap();
        text.add_span(bold(5, 7)).unwrap();
        text.add_span(FormatSpan::new(0, 8, FormatKind::Italic)).unwrap();

        text.delete(3, 7).unwrap();
        assert_eq!(text.text(), "abch");
        assert_eq!(
            text.spans(),
            &[bold(1, 3), FormatSpan::new(0, 4, FormatKind::Italic)]
        );
    }

    #[test]
    fn replace_moves_trailing_spans() {
        let mut text = StyledText::from_text("hello world");
        text.add_span(bold(6, 11)).unwrap();
        text.replace_range(0, 5, "hi").unwrap();
        assert_eq!(text.text(), "hi world");
        assert_eq!(text.spans(), &[bold(3, 8)]);
    }

    #[test]
    fn replace_rejects_bad_ranges() {
        let mut text = StyledText::from_text("abc");
        assert!(text.replace_range(2, 1, "x").is_err());
        assert!(text.replace_range(0, 4, "x").is_err());
        assert_eq!(text.text(), "abc");
    }

    #[test]
    fn remove_spans_reports_count() {
        let mut text = StyledText::from_text("abcdef");
        text.add_span(bold(0, 2)).unwrap();
        text.add_span(bold(3, 5)).unwrap();
        text.add_span(FormatSpan::new(0, 6, FormatKind::Small)).unwrap();
        assert_eq!(text.remove_spans(|s| s.kind.is_bold()), 2);
        assert_eq!(text.spans().len(), 1);
    }
}
