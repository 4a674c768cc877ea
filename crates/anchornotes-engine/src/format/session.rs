use std::ops::Range;

use log::trace;

use crate::error::FormatError;
use crate::markdown::{MarkdownSerializer, SerializeOptions};

use super::checklist;
use super::editor;
use super::span::TextSize;
use super::styled_text::StyledText;
use super::typing::TypingFormatState;

/// Settings for an [`EditorSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Start a new `☐ ` item after Enter on a checklist line.
    pub continue_checklists: bool,
    pub serialize: SerializeOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            continue_checklists: true,
            serialize: SerializeOptions::default(),
        }
    }
}

/// One note being edited: the buffer, its selection and the pinned typing
/// formats.
///
/// Every mutation goes through [`insert_text`](Self::insert_text) or
/// [`backspace`](Self::backspace), which run the typing hooks around it. The
/// format commands act on the selection when there is one and pin the format
/// for typing when there is not.
#[derive(Debug, Clone)]
pub struct EditorSession {
    buffer: StyledText,
    /// Normalized so `start <= end`, both within the buffer.
    selection: Range<usize>,
    typing: TypingFormatState,
    options: SessionOptions,
    serializer: MarkdownSerializer,
    continuing_checklist: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl EditorSession {
    pub fn new(options: SessionOptions) -> Self {
        Self::with_buffer(StyledText::new(), options)
    }

    /// Start editing `buffer` with the cursor at its end.
    pub fn with_buffer(buffer: StyledText, options: SessionOptions) -> Self {
        let len = buffer.len();
        Self {
            buffer,
            selection: len..len,
            typing: TypingFormatState::new(),
            options,
            serializer: MarkdownSerializer::new().with_options(options.serialize),
            continuing_checklist: false,
        }
    }

    /// Start editing a stored note body.
    pub fn from_markdown(markdown: &str, options: SessionOptions) -> Self {
        let buffer = MarkdownSerializer::new()
            .with_options(options.serialize)
            .deserialize(markdown);
        Self::with_buffer(buffer, options)
    }

    /// The note body to store.
    pub fn to_markdown(&self) -> String {
        self.serializer.serialize(&self.buffer)
    }

    pub fn buffer(&self) -> &StyledText {
        &self.buffer
    }

    pub fn typing_state(&self) -> &TypingFormatState {
        &self.typing
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn cursor(&self) -> usize {
        self.selection.end
    }

    pub fn has_selection(&self) -> bool {
        self.selection.start < self.selection.end
    }

    /// Select `[start, end)`; offsets are clamped to the buffer and ordered.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.buffer.len();
        let (start, end) = (start.min(len), end.min(len));
        self.selection = start.min(end)..start.max(end);
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.set_selection(pos, pos);
    }

    /// Type `text`, replacing the selection if there is one.
    pub fn insert_text(&mut self, text: &str) -> Result<(), FormatError> {
        let Range { start, end } = self.selection();
        self.edit(start, end, text)?;
        let cursor = start + text.chars().count();
        self.set_cursor(cursor);

        if self.options.continue_checklists && !self.continuing_checklist {
            if let Some(bullet) = checklist::continuation_at(&self.buffer, cursor) {
                trace!("continuing checklist at {cursor}");
                self.continuing_checklist = true;
                let result = self.insert_text(bullet);
                self.continuing_checklist = false;
                result?;
            }
        }
        Ok(())
    }

    /// Delete the selection, or the char before the cursor.
    pub fn backspace(&mut self) -> Result<(), FormatError> {
        let Range { start, end } = self.selection();
        let start = if start == end {
            start.saturating_sub(1)
        } else {
            start
        };
        if start == end {
            return Ok(());
        }
        self.edit(start, end, "")?;
        self.set_cursor(start);
        Ok(())
    }

    /// Bold button.
    pub fn bold(&mut self) -> Result<(), FormatError> {
        if self.has_selection() {
            editor::toggle_bold(&mut self.buffer, self.selection.start, self.selection.end)?;
        } else {
            self.typing.toggle_bold_mode();
        }
        Ok(())
    }

    /// Italic button.
    pub fn italic(&mut self) -> Result<(), FormatError> {
        if self.has_selection() {
            editor::toggle_italic(&mut self.buffer, self.selection.start, self.selection.end)?;
        } else {
            self.typing.toggle_italic_mode();
        }
        Ok(())
    }

    /// Size buttons.
    pub fn size(&mut self, size: TextSize) -> Result<(), FormatError> {
        if self.has_selection() {
            editor::apply_size(
                &mut self.buffer,
                self.selection.start,
                self.selection.end,
                size,
            )?;
        } else {
            self.typing.set_size_mode(size);
        }
        Ok(())
    }

    fn edit(&mut self, start: usize, end: usize, text: &str) -> Result<(), FormatError> {
        self.buffer.check_bounds(start, end)?;
        self.typing.observe_before_edit(&self.buffer, start)?;
        let replaced = self.buffer.replace_range(start, end, text);
        // Close the observation even if the edit failed so the hooks stay paired.
        let typed = self.typing.observe_after_edit(&mut self.buffer);
        replaced?;
        typed?;
        Ok(())
    }
}
