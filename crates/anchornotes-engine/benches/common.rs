use anchornotes_engine::{FormatKind, FormatSpan, StyledText};

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_note_markdown(lines: usize) -> String {
    let base = [
        "☐ **buy** milk and *fresh* bread",
        "<small>fine print about the **offer**</small>",
        "<big>Headline</big> with ***loud*** words",
        "plain line without any formatting at all",
    ];
    (0..lines)
        .map(|i| base[i % base.len()])
        .collect::<Vec<_>>()
        .join("\n")
}

/// A buffer where every word carries a span, many of them overlapping.
#[allow(dead_code)]
pub fn generate_styled_text(words: usize) -> StyledText {
    let kinds = [
        FormatKind::Bold,
        FormatKind::Italic,
        FormatKind::Small,
        FormatKind::Large,
        FormatKind::Bold,
    ];
    let text = vec!["word"; words].join(" ");
    let mut buffer = StyledText::from_text(text);
    for i in 0..words {
        let start = i * 5;
        let end = (start + 9).min(buffer.len());
        if start < end {
            let span = FormatSpan::new(start, end, kinds[i % kinds.len()]);
            buffer.add_span(span).unwrap();
        }
    }
    buffer
}
