use std::cmp::Ordering;

use log::debug;

use crate::format::{FormatKind, FormatSpan, StyledText};

use super::SerializeOptions;
use super::deserialize;
use super::render::EmphasisRenderer;
use super::tags;

/// Markup inserted at one position of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    position: usize,
    text: &'static str,
    opening: bool,
    priority: u8,
    /// The other end of the span this marker belongs to.
    partner: usize,
}

/// Convert a styled buffer into markdown that `renderer` reads back into the
/// same formatting.
///
/// Bold and italic are written as `*` runs. CommonMark only accepts a run
/// that flanks its content the right way, so the output is checked against
/// `renderer` and every emphasis span it would misread is rewritten as a
/// `<b>`/`<i>` tag pair, which deserialization strips exactly like the size
/// tags.
pub fn to_markdown<R: EmphasisRenderer>(
    buffer: &StyledText,
    options: SerializeOptions,
    renderer: &R,
) -> String {
    let text = buffer.text();
    if text.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let spans = nest(merge(extract(buffer, options)), &chars);
    if spans.is_empty() {
        return text.to_string();
    }

    // Byte offset of every char position, plus the end.
    let byte_at: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let mut tagged = vec![false; spans.len()];
    loop {
        let mut markers = build_markers(&spans, &tagged);
        markers.sort_by(marker_order);
        let markdown = splice(text, &byte_at, &markers);

        let misread = misread_spans(&markdown, text, &spans, &tagged, renderer);
        if misread.is_empty() {
            return markdown;
        }
        debug!("{} emphasis spans would not parse back, writing them as tags", misread.len());
        for i in misread {
            tagged[i] = true;
        }
    }
}

fn splice(text: &str, byte_at: &[usize], markers: &[Marker]) -> String {
    let mut out = String::with_capacity(text.len() + markers.len() * 4);
    let mut current = 0;
    for marker in markers {
        if marker.position > current {
            out.push_str(&text[byte_at[current]..byte_at[marker.position]]);
            current = marker.position;
        }
        out.push_str(marker.text);
    }
    out.push_str(&text[byte_at[current]..]);
    out
}

/// Collect the buffer's spans as serializable triples.
///
/// Spans are split at newlines when configured so no marker pair spans a
/// line break. Emphasis spans lose leading and trailing whitespace, which
/// shows no emphasis and cannot sit inside a `*` run.
pub(crate) fn extract(buffer: &StyledText, options: SerializeOptions) -> Vec<FormatSpan> {
    let chars: Vec<char> = buffer.text().chars().collect();
    let spans = buffer
        .spans()
        .iter()
        .copied()
        .filter(|s| s.start < s.end && s.end <= chars.len());

    let mut out = Vec::new();
    for span in spans {
        let mut start = span.start;
        if options.split_at_newlines {
            for nl in (span.start..span.end).filter(|&i| chars[i] == '\n') {
                out.extend(trim_emphasis(&chars, FormatSpan::new(start, nl, span.kind)));
                start = nl + 1;
            }
        }
        out.extend(trim_emphasis(&chars, FormatSpan::new(start, span.end, span.kind)));
    }
    out
}

fn trim_emphasis(chars: &[char], mut span: FormatSpan) -> Option<FormatSpan> {
    if !span.kind.is_size() {
        while span.start < span.end && chars[span.start].is_whitespace() {
            span.start += 1;
        }
        while span.start < span.end && chars[span.end - 1].is_whitespace() {
            span.end -= 1;
        }
    }
    (span.start < span.end).then_some(span)
}

/// Merge overlapping or touching spans of the same kind.
pub(crate) fn merge(mut spans: Vec<FormatSpan>) -> Vec<FormatSpan> {
    spans.sort_by_key(|s| (s.kind, s.start, s.end));

    let mut merged: Vec<FormatSpan> = Vec::with_capacity(spans.len());
    for next in spans {
        match merged.last_mut() {
            Some(current) if current.kind == next.kind && next.start <= current.end => {
                current.end = current.end.max(next.end);
            }
            _ => merged.push(next),
        }
    }
    merged
}

/// Cut spans so that any two either nest or are disjoint.
///
/// A span starting inside another and ending past it is split where the
/// other one ends. Cuts only happen at existing span edges, so this
/// terminates.
pub(crate) fn split_crossing(mut spans: Vec<FormatSpan>) -> Vec<FormatSpan> {
    loop {
        let cut = spans.iter().enumerate().find_map(|(i, span)| {
            spans
                .iter()
                .find(|o| o.start < span.start && span.start < o.end && o.end < span.end)
                .map(|o| (i, o.end))
        });

        let Some((i, at)) = cut else {
            return spans;
        };
        let span = spans[i];
        spans[i] = FormatSpan::new(span.start, at, span.kind);
        spans.push(FormatSpan::new(at, span.end, span.kind));
    }
}

/// Split crossing spans, then trim pieces that start or end on whitespace,
/// until neither changes anything.
fn nest(mut spans: Vec<FormatSpan>, chars: &[char]) -> Vec<FormatSpan> {
    loop {
        let next: Vec<FormatSpan> = split_crossing(spans.clone())
            .into_iter()
            .filter_map(|span| trim_emphasis(chars, span))
            .collect();
        if next == spans {
            return spans;
        }
        spans = next;
    }
}

/// Indices of untagged emphasis spans to rewrite as tags, or nothing when
/// `markdown` parses back to `text` with exactly `spans`.
fn misread_spans<R: EmphasisRenderer>(
    markdown: &str,
    text: &str,
    spans: &[FormatSpan],
    tagged: &[bool],
    renderer: &R,
) -> Vec<usize> {
    let parsed = deserialize::from_markdown(markdown, renderer);
    let actual = canonical(parsed.spans());
    if parsed.text() == text && actual == canonical(spans) {
        return Vec::new();
    }

    let untagged: Vec<usize> = (0..spans.len())
        .filter(|&i| !tagged[i] && !spans[i].kind.is_size())
        .collect();
    let missing: Vec<usize> = untagged
        .iter()
        .copied()
        .filter(|&i| !is_covered(spans[i], &actual))
        .collect();

    if !missing.is_empty() {
        return missing;
    }
    if untagged.is_empty() {
        debug!("markdown does not parse back even with every span tagged, keeping it");
    }
    untagged
}

/// Spans with `BoldItalic` split into its two parts, merged per kind.
fn canonical(spans: &[FormatSpan]) -> Vec<FormatSpan> {
    merge(
        spans
            .iter()
            .flat_map(|s| parts(s.kind).iter().map(|&kind| FormatSpan::new(s.start, s.end, kind)))
            .collect(),
    )
}

fn parts(kind: FormatKind) -> &'static [FormatKind] {
    match kind {
        FormatKind::BoldItalic => &[FormatKind::Bold, FormatKind::Italic],
        FormatKind::Bold => &[FormatKind::Bold],
        FormatKind::Italic => &[FormatKind::Italic],
        FormatKind::Small => &[FormatKind::Small],
        FormatKind::Large => &[FormatKind::Large],
    }
}

fn is_covered(span: FormatSpan, actual: &[FormatSpan]) -> bool {
    parts(span.kind).iter().all(|&kind| {
        actual
            .iter()
            .any(|a| a.kind == kind && a.start <= span.start && span.end <= a.end)
    })
}

fn build_markers(spans: &[FormatSpan], tagged: &[bool]) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(spans.len() * 2);
    for (span, &tagged) in spans.iter().zip(tagged) {
        // A tagged BoldItalic is written as an <i> pair and a <b> pair.
        let kinds = if tagged { parts(span.kind) } else { std::slice::from_ref(&span.kind) };
        for &kind in kinds {
            let (open, close, priority) = markup(kind, tagged);
            markers.push(Marker {
                position: span.start,
                text: open,
                opening: true,
                priority,
                partner: span.end,
            });
            markers.push(Marker {
                position: span.end,
                text: close,
                opening: false,
                priority,
                partner: span.start,
            });
        }
    }
    markers
}

/// Opening text, closing text and nesting priority for a kind.
fn markup(kind: FormatKind, tagged: bool) -> (&'static str, &'static str, u8) {
    let priority = match kind {
        FormatKind::Small | FormatKind::Large => 0,
        FormatKind::Italic => 1,
        FormatKind::Bold => 2,
        FormatKind::BoldItalic => 3,
    };
    let (open, close) = match kind {
        FormatKind::Bold if !tagged => ("**", "**"),
        FormatKind::Italic if !tagged => ("*", "*"),
        FormatKind::BoldItalic => ("***", "***"),
        _ => (
            tags::open_tag(kind).unwrap_or_default(),
            tags::close_tag(kind).unwrap_or_default(),
        ),
    };
    (open, close, priority)
}

/// Order markers so that spans nest.
///
/// By position; at one position a span that ends closes before a span that
/// starts opens. This is the reverse of "openers first" and is deliberate:
/// with openers first, `<small>abc</small>` followed by `<big>de</big>`
/// would come out as `<small>abc<big></small>de</big>`.
///
/// Among openers the span reaching further opens first, among closers the
/// span opened last closes first. Equal ranges fall back to priority: size
/// tags outermost, then italic, then bold.
fn marker_order(a: &Marker, b: &Marker) -> Ordering {
    a.position
        .cmp(&b.position)
        .then_with(|| a.opening.cmp(&b.opening))
        .then_with(|| {
            if a.opening {
                b.partner
                    .cmp(&a.partner)
                    .then_with(|| a.priority.cmp(&b.priority))
            } else {
                b.partner
                    .cmp(&a.partner)
                    .then_with(|| b.priority.cmp(&a.priority))
            }
        })
}
