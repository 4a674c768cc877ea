//! # Markdown Persistence
//!
//! Converts a [`StyledText`] to the markdown string stored as a note body and
//! back again.
//!
//! ## Format
//!
//! | kind | markup |
//! |---|---|
//! | Bold | `**text**` |
//! | Italic | `*text*` |
//! | BoldItalic | `***text***` |
//! | Small | `<small>text</small>` |
//! | Large | `<big>text</big>` |
//!
//! Bold and italic fall back to `<b>text</b>` and `<i>text</i>` where a `*`
//! run would not parse back, e.g. around `a(b)c`. Emphasis is trimmed of
//! leading and trailing whitespace before it is written.
//!
//! Tags are an extension that standard markdown renderers do not know, so
//! deserialization runs in two phases: `tags` strips them from the raw
//! markdown, then an [`EmphasisRenderer`] interprets bold/italic on what is
//! left.
//!
//! ## Modules
//!
//! - **`serialize`**: span extraction and merging, marker ordering, splicing
//!   and the parse-back check
//! - **`tags`**: `<small>`/`<big>`/`<b>`/`<i>` extraction into clean text + ranges
//! - **`render`**: `EmphasisRenderer` trait and the pulldown-cmark renderer
//! - **`deserialize`**: the two phases joined, with size ranges re-applied
//!
//! ## Round Trip
//!
//! For any markdown produced by [`MarkdownSerializer::serialize`],
//! `serialize(deserialize(md)) == md` up to merging of same-kind spans.

pub mod deserialize;
pub mod render;
pub mod serialize;
pub mod tags;

pub use render::{CmarkRenderer, EmphasisRenderer, Rendered};

use crate::format::StyledText;

/// Tunables for the serialize direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Split spans at `\n` so no markup pair crosses a line break.
    pub split_at_newlines: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            split_at_newlines: true,
        }
    }
}

/// Markdown conversion for note bodies.
#[derive(Debug, Clone, Default)]
pub struct MarkdownSerializer<R = CmarkRenderer> {
    options: SerializeOptions,
    renderer: R,
}

impl MarkdownSerializer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: EmphasisRenderer> MarkdownSerializer<R> {
    /// Use a different bold/italic renderer for [`deserialize`](Self::deserialize).
    pub fn with_renderer(renderer: R) -> Self {
        Self {
            options: SerializeOptions::default(),
            renderer,
        }
    }

    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> SerializeOptions {
        self.options
    }

    /// Styled buffer to markdown. Total; unformatted text comes back as is.
    pub fn serialize(&self, buffer: &StyledText) -> String {
        serialize::to_markdown(buffer, self.options, &self.renderer)
    }

    /// Markdown to styled buffer. Total; malformed markup degrades to text.
    pub fn deserialize(&self, markdown: &str) -> StyledText {
        deserialize::from_markdown(markdown, &self.renderer)
    }
}

/// Serialize with default options.
pub fn to_markdown(buffer: &StyledText) -> String {
    MarkdownSerializer::new().serialize(buffer)
}

/// Deserialize with the default renderer.
pub fn from_markdown(markdown: &str) -> StyledText {
    MarkdownSerializer::new().deserialize(markdown)
}
