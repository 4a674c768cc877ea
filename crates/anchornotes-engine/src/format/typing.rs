use std::ops::Range;

use log::{trace, warn};

use crate::error::FormatError;

use super::span::{FormatKind, FormatSpan, TextSize};
use super::styled_text::StyledText;

/// Buffer state recorded just before an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingEdit {
    len_before: usize,
    cursor_before: usize,
}

/// Formatting pinned on for the next characters typed without a selection.
///
/// The host calls [`observe_before_edit`](Self::observe_before_edit) and
/// [`observe_after_edit`](Self::observe_after_edit) around every buffer
/// mutation, strictly alternating. An edit that grew the text by `n` chars
/// is treated as `n` chars typed at the recorded cursor, and each active
/// attribute is added over exactly that range. Edits that did not grow the
/// text (deletions, replacements by shorter text) are left unformatted.
///
/// Not thread-safe; one instance per editing session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypingFormatState {
    bold: bool,
    italic: bool,
    size: Option<TextSize>,
    pending: Option<PendingEdit>,
}

impl TypingFormatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_bold_mode(&mut self) {
        self.bold = !self.bold;
    }

    pub fn toggle_italic_mode(&mut self) {
        self.italic = !self.italic;
    }

    /// Pin a size for typed text. Choosing the active size again unpins it.
    pub fn set_size_mode(&mut self, size: TextSize) {
        if self.size == Some(size) {
            self.size = None;
        } else {
            self.size = Some(size);
        }
    }

    pub fn is_bold_active(&self) -> bool {
        self.bold
    }

    pub fn is_italic_active(&self) -> bool {
        self.italic
    }

    /// The pinned size, if any. `Some(Medium)` is possible and adds no span.
    pub fn active_size(&self) -> Option<TextSize> {
        self.size
    }

    /// Scale of the pinned size, if any.
    pub fn active_size_scale(&self) -> Option<f32> {
        self.size.map(TextSize::scale)
    }

    /// True between a before-edit and its matching after-edit call.
    pub fn is_edit_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record the buffer length and cursor ahead of a mutation.
    pub fn observe_before_edit(
        &mut self,
        buffer: &StyledText,
        cursor: usize,
    ) -> Result<(), FormatError> {
        if self.pending.is_some() {
            return Err(FormatError::EditAlreadyObserved);
        }
        self.pending = Some(PendingEdit {
            len_before: buffer.len(),
            cursor_before: cursor,
        });
        Ok(())
    }

    /// Apply pinned formatting to the chars inserted by the mutation that
    /// followed the last [`observe_before_edit`](Self::observe_before_edit).
    ///
    /// Returns the range treated as typed, or `None` when the edit did not
    /// grow the text.
    pub fn observe_after_edit(
        &mut self,
        buffer: &mut StyledText,
    ) -> Result<Option<Range<usize>>, FormatError> {
        let pending = self.pending.take().ok_or(FormatError::EditNotObserved)?;

        let len_after = buffer.len();
        if len_after <= pending.len_before {
            trace!(
                "edit did not grow text ({} -> {len_after}), no formatting applied",
                pending.len_before
            );
            return Ok(None);
        }

        let inserted = len_after - pending.len_before;
        let start = pending.cursor_before;
        let Some(end) = start.checked_add(inserted).filter(|&end| end <= len_after) else {
            warn!("typed range at {start} of {inserted} chars exceeds buffer length {len_after}, skipping");
            return Ok(None);
        };

        for kind in self.active_kinds() {
            buffer.add_span(FormatSpan::new(start, end, kind))?;
        }
        trace!("typed {start}..{end} with {:?}", self.active_kinds());
        Ok(Some(start..end))
    }

    fn active_kinds(&self) -> Vec<FormatKind> {
        let mut kinds = Vec::new();
        if self.bold {
            kinds.push(FormatKind::Bold);
        }
        if self.italic {
            kinds.push(FormatKind::Italic);
        }
        if let Some(kind) = self.size.and_then(TextSize::format_kind) {
            kinds.push(kind);
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Insert `text` at `at`, wrapped in the before/after hooks.
    fn type_at(
        state: &mut TypingFormatState,
        buffer: &mut StyledText,
        at: usize,
        text: &str,
    ) -> Option<Range<usize>> {
        state.observe_before_edit(buffer, at).unwrap();
        buffer.insert(at, text).unwrap();
        state.observe_after_edit(buffer).unwrap()
    }

    #[test]
    fn bold_mode_formats_inserted_range() {
        let mut state = TypingFormatState::new();
        state.toggle_bold_mode();
        let mut buffer = StyledText::from_text("abcd");

        let typed = type_at(&mut state, &mut buffer, 2, "XYZ");

        assert_eq!(typed, Some(2..5));
        assert_eq!(buffer.text(), "abXYZcd");
        assert_eq!(buffer.spans(), &[FormatSpan::new(2, 5, FormatKind::Bold)]);
    }

    #[test]
    fn deletion_adds_no_span() {
        let mut state = TypingFormatState::new();
        state.toggle_bold_mode();
        let mut buffer = StyledText::from_text("abcd");

        state.observe_before_edit(&buffer, 3).unwrap();
        buffer.delete(2, 3).unwrap();
        assert_eq!(state.observe_after_edit(&mut buffer), Ok(None));
        assert!(buffer.spans().is_empty());
    }

    #[test]
    fn shrinking_replacement_adds_no_span() {
        let mut state = TypingFormatState::new();
        state.toggle_italic_mode();
        let mut buffer = StyledText::from_text("hello world");

        state.observe_before_edit(&buffer, 0).unwrap();
        buffer.replace_range(0, 5, "hi").unwrap();
        assert_eq!(state.observe_after_edit(&mut buffer), Ok(None));
        assert!(buffer.spans().is_empty());
    }

    #[test]
    fn all_active_attributes_are_applied() {
        let mut state = TypingFormatState::new();
        state.toggle_bold_mode();
        state.toggle_italic_mode();
        state.set_size_mode(TextSize::Large);
        let mut buffer = StyledText::new();

        type_at(&mut state, &mut buffer, 0, "Hi");

        assert_eq!(
            buffer.sorted_spans(),
            vec![
                FormatSpan::new(0, 2, FormatKind::Bold),
                FormatSpan::new(0, 2, FormatKind::Italic),
                FormatSpan::new(0, 2, FormatKind::Large),
            ]
        );
    }

    #[test]
    fn no_active_attributes_still_reports_range() {
        let mut state = TypingFormatState::new();
        let mut buffer = StyledText::from_text("ab");
        assert_eq!(type_at(&mut state, &mut buffer, 1, "x"), Some(1..2));
        assert!(buffer.spans().is_empty());
    }

    #[test]
    fn same_size_twice_unpins() {
        let mut state = TypingFormatState::new();
        state.set_size_mode(TextSize::Small);
        assert_eq!(state.active_size(), Some(TextSize::Small));
        assert_eq!(state.active_size_scale(), Some(0.8));

        state.set_size_mode(TextSize::Large);
        assert_eq!(state.active_size(), Some(TextSize::Large));

        state.set_size_mode(TextSize::Large);
        assert_eq!(state.active_size(), None);
    }

    #[test]
    fn medium_mode_types_without_size_span() {
        let mut state = TypingFormatState::new();
        state.set_size_mode(TextSize::Medium);
        let mut buffer = StyledText::new();
        type_at(&mut state, &mut buffer, 0, "abc");
        assert!(buffer.spans().is_empty());
    }

    #[test]
    fn modes_toggle_off() {
        let mut state = TypingFormatState::new();
        state.toggle_bold_mode();
        state.toggle_bold_mode();
        state.toggle_italic_mode();
        assert!(!state.is_bold_active());
        assert!(state.is_italic_active());
    }

    #[test]
    fn after_without_before_is_rejected() {
        let mut state = TypingFormatState::new();
        let mut buffer = StyledText::from_text("abc");
        assert_eq!(
            state.observe_after_edit(&mut buffer),
            Err(FormatError::EditNotObserved)
        );
    }

    #[test]
    fn before_twice_is_rejected() {
        let mut state = TypingFormatState::new();
        let buffer = StyledText::from_text("abc");
        state.observe_before_edit(&buffer, 0).unwrap();
        assert!(state.is_edit_pending());
        assert_eq!(
            state.observe_before_edit(&buffer, 1),
            Err(FormatError::EditAlreadyObserved)
        );
    }

    #[test]
    fn stale_cursor_is_skipped() {
        let mut state = TypingFormatState::new();
        state.toggle_bold_mode();
        let mut buffer = StyledText::from_text("abc");

        // Cursor recorded past the end of the edit's result.
        state.observe_before_edit(&buffer, 3).unwrap();
        buffer.insert(0, "x").unwrap();
        assert_eq!(state.observe_after_edit(&mut buffer), Ok(Some(3..4)));

        state.observe_before_edit(&buffer, 9).unwrap();
        buffer.insert(0, "y").unwrap();
        assert_eq!(state.observe_after_edit(&mut buffer), Ok(None));
        assert!(!state.is_edit_pending());
    }

    #[test]
    fn cursor_at_usize_max_is_skipped() {
        let mut state = TypingFormatState::new();
        state.toggle_italic_mode();
        let mut buffer = StyledText::from_text("abc");

        state.observe_before_edit(&buffer, usize::MAX).unwrap();
        buffer.insert(3, "d").unwrap();
        assert_eq!(state.observe_after_edit(&mut buffer), Ok(None));
        assert!(buffer.spans().is_empty());
        assert!(!state.is_edit_pending());
    }
}
