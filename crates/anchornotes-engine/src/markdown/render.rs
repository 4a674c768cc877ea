use std::ops::Range;

use log::debug;
use pulldown_cmark::{Event, Options, Parser, Tag};

use crate::format::{FormatKind, FormatSpan, StyledText};

/// Result of rendering bold/italic markdown into styled text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub buffer: StyledText,
    /// `offsets[i]` is the position in `buffer` that char `i` of the input
    /// ended up at. Has one entry more than the input has chars, so the end
    /// of the input maps too.
    pub offsets: Vec<usize>,
}

impl Rendered {
    /// Translate a char offset of the rendered input into a buffer offset.
    pub fn map_offset(&self, input_offset: usize) -> Option<usize> {
        self.offsets.get(input_offset).copied()
    }
}

/// Converts `**bold**` / `*italic*` markdown into styled text.
pub trait EmphasisRenderer {
    fn render(&self, markdown: &str) -> Rendered;
}

/// [`EmphasisRenderer`] backed by pulldown-cmark.
///
/// Only emphasis is interpreted. The delimiter runs of recognised emphasis are
/// removed and everything else (headings, list markers, escapes, literal
/// asterisks that do not form emphasis) is kept byte for byte, so the output
/// text is the input minus exactly the markup this crate writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkRenderer;

/// An emphasis run found by the parser, as byte ranges of the input.
struct EmphasisRun {
    kind: FormatKind,
    content: Range<usize>,
    delimiters: [Range<usize>; 2],
}

impl EmphasisRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> Rendered {
        let runs = emphasis_runs(markdown);

        let mut hidden = vec![false; markdown.len()];
        for run in &runs {
            for delimiter in &run.delimiters {
                hidden[delimiter.clone()].fill(true);
            }
        }

        let mut text = String::with_capacity(markdown.len());
        let mut offsets = Vec::new();
        let mut visible_at_byte = vec![0; markdown.len() + 1];
        let mut visible = 0;
        for (i, c) in markdown.char_indices() {
            offsets.push(visible);
            visible_at_byte[i] = visible;
            if !hidden[i] {
                text.push(c);
                visible += 1;
            }
        }
        offsets.push(visible);
        visible_at_byte[markdown.len()] = visible;

        let mut buffer = StyledText::from_text(text);
        for run in runs {
            let start = visible_at_byte[run.content.start];
            let end = visible_at_byte[run.content.end];
            if let Err(err) = buffer.add_span(FormatSpan::new(start, end, run.kind)) {
                debug!("skipping {:?} run {:?}: {err}", run.kind, run.content);
            }
        }

        Rendered { buffer, offsets }
    }
}

/// Map parser emphasis events onto [`FormatKind`]s.
///
/// This is the one place the renderer's vocabulary is interpreted.
fn emphasis_runs(markdown: &str) -> Vec<EmphasisRun> {
    let mut runs = Vec::new();
    for (event, range) in Parser::new_ext(markdown, Options::empty()).into_offset_iter() {
        let (kind, width) = match event {
            Event::Start(Tag::Strong) => (FormatKind::Bold, 2),
            Event::Start(Tag::Emphasis) => (FormatKind::Italic, 1),
            _ => continue,
        };

        if !is_delimited(markdown, &range, width) {
            debug!("{kind:?} at {range:?} is not wrapped in delimiters, ignoring");
            continue;
        }

        runs.push(EmphasisRun {
            kind,
            content: range.start + width..range.end - width,
            delimiters: [
                range.start..range.start + width,
                range.end - width..range.end,
            ],
        });
    }
    runs
}

fn is_delimited(markdown: &str, range: &Range<usize>, width: usize) -> bool {
    let bytes = markdown.as_bytes();
    if range.end > bytes.len() || range.len() <= 2 * width {
        return false;
    }
    let is_delimiter = |b: &u8| *b == b'*' || *b == b'_';
    bytes[range.start..range.start + width].iter().all(is_delimiter)
        && bytes[range.end - width..range.end].iter().all(is_delimiter)
}
