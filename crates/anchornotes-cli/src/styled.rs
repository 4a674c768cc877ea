use anchornotes_engine::{FormatKind, StyledText};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Terminal rendering of one formatting kind.
fn modifier(kind: FormatKind) -> Modifier {
    match kind {
        FormatKind::Bold => Modifier::BOLD,
        FormatKind::Italic => Modifier::ITALIC,
        FormatKind::BoldItalic => Modifier::BOLD | Modifier::ITALIC,
        FormatKind::Small => Modifier::DIM,
        FormatKind::Large => Modifier::UNDERLINED,
    }
}

/// Split a note into terminal lines, one ratatui span per run of equally
/// formatted chars.
pub fn styled_lines(buffer: &StyledText) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    for line in buffer.text().split('\n') {
        let line_end = line_start + line.chars().count();
        lines.push(styled_line(buffer, line, line_start, line_end));
        line_start = line_end + 1;
    }
    lines
}

fn styled_line(buffer: &StyledText, line: &str, start: usize, end: usize) -> Line<'static> {
    let mut cuts = vec![start, end];
    for span in buffer.overlapping(start, end) {
        cuts.extend([span.start.max(start), span.end.min(end)]);
    }
    cuts.sort_unstable();
    cuts.dedup();

    let chars: Vec<char> = line.chars().collect();
    let spans: Vec<Span<'static>> = cuts
        .windows(2)
        .map(|w| {
            let modifiers = buffer
                .overlapping(w[0], w[1])
                .fold(Modifier::empty(), |acc, span| acc | modifier(span.kind));
            let text: String = chars[w[0] - start..w[1] - start].iter().collect();
            Span::styled(text, Style::default().add_modifier(modifiers))
        })
        .collect();
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchornotes_engine::from_markdown;
    use pretty_assertions::assert_eq;

    fn plain(text: &str) -> Span<'static> {
        Span::styled(text.to_string(), Style::default())
    }

    fn with(text: &str, modifier: Modifier) -> Span<'static> {
        Span::styled(text.to_string(), Style::default().add_modifier(modifier))
    }

    #[test]
    fn runs_follow_span_edges() {
        let lines = styled_lines(&from_markdown("a **b *c* d** e"));
        assert_eq!(
            lines,
            vec![Line::from(vec![
                plain("a "),
                with("b ", Modifier::BOLD),
                with("c", Modifier::BOLD | Modifier::ITALIC),
                with(" d", Modifier::BOLD),
                plain(" e"),
            ])]
        );
    }

    #[test]
    fn sizes_render_dim_and_underlined() {
        let lines = styled_lines(&from_markdown("<small>s</small><big>L</big>"));
        assert_eq!(
            lines,
            vec![Line::from(vec![
                with("s", Modifier::DIM),
                with("L", Modifier::UNDERLINED),
            ])]
        );
    }

    #[test]
    fn one_line_per_newline() {
        let lines = styled_lines(&from_markdown("☐ **milk**\n\n☑ eggs"));
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            Line::from(vec![plain("☐ "), with("milk", Modifier::BOLD)])
        );
        assert_eq!(lines[1], Line::from(Vec::<Span>::new()));
        assert_eq!(lines[2], Line::from(vec![plain("☑ eggs")]));
    }
}
