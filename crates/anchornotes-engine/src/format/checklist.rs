use super::styled_text::StyledText;

/// Marker of an open checklist item.
pub const UNCHECKED: char = '☐';
/// Marker of a completed checklist item.
pub const CHECKED: char = '☑';
/// Text inserted to start a new checklist item.
pub const BULLET: &str = "☐ ";

/// Decide whether the line just started at `cursor` should continue a
/// checklist.
///
/// Returns the bullet to insert at `cursor` when the char before the cursor
/// is a newline and the line above it starts with a checklist marker
/// (ignoring surrounding whitespace).
pub fn continuation_at(buffer: &StyledText, cursor: usize) -> Option<&'static str> {
    if cursor == 0 || cursor > buffer.len() {
        return None;
    }
    if buffer.char_at(cursor - 1) != Some('\n') {
        return None;
    }

    let before: Vec<char> = buffer.text().chars().take(cursor - 1).collect();
    let line_start = before
        .iter()
        .rposition(|&c| c == '\n')
        .map_or(0, |i| i + 1);
    let line: String = before[line_start..].iter().collect();

    let line = line.trim();
    (line.starts_with(UNCHECKED) || line.starts_with(CHECKED)).then_some(BULLET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("☐ milk\n", 7, Some(BULLET))]
    #[case("☑ eggs\n", 7, Some(BULLET))]
    #[case("  ☐ indented\n", 13, Some(BULLET))]
    #[case("intro\n☐ milk\n", 13, Some(BULLET))]
    #[case("☐ milk\nplain\n", 13, None)]
    #[case("plain\n", 6, None)]
    #[case("☐ milk", 6, None)]
    #[case("\n", 1, None)]
    #[case("", 0, None)]
    fn detects_checklist_lines(
        #[case] text: &str,
        #[case] cursor: usize,
        #[case] expected: Option<&str>,
    ) {
        let buffer = StyledText::from_text(text);
        assert_eq!(continuation_at(&buffer, cursor), expected);
    }

    #[test]
    fn cursor_past_end_is_ignored() {
        let buffer = StyledText::from_text("☐ a\n");
        assert_eq!(continuation_at(&buffer, 10), None);
    }
}
