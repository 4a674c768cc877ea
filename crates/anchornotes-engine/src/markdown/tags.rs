use log::debug;

use crate::format::FormatKind;

/// A tag pair found in the markdown, as a char range of the clean text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRange {
    pub start: usize,
    pub end: usize,
    pub kind: FormatKind,
}

/// Markdown with formatting tags removed, plus where they were.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanMarkup {
    pub text: String,
    /// Ranges in chars of `text`. Nested tags appear before their parent.
    pub ranges: Vec<TagRange>,
}

struct Tag {
    open: &'static str,
    close: &'static str,
    kind: FormatKind,
}

/// Size tags, plus the HTML forms of bold and italic used where `*` runs
/// would not parse back.
const TAGS: [Tag; 4] = [
    Tag {
        open: "<small>",
        close: "</small>",
        kind: FormatKind::Small,
    },
    Tag {
        open: "<big>",
        close: "</big>",
        kind: FormatKind::Large,
    },
    Tag {
        open: "<b>",
        close: "</b>",
        kind: FormatKind::Bold,
    },
    Tag {
        open: "<i>",
        close: "</i>",
        kind: FormatKind::Italic,
    },
];

/// Opening tag for a kind, if it has one.
pub fn open_tag(kind: FormatKind) -> Option<&'static str> {
    TAGS.iter().find(|t| t.kind == kind).map(|t| t.open)
}

/// Closing tag for a kind, if it has one.
pub fn close_tag(kind: FormatKind) -> Option<&'static str> {
    TAGS.iter().find(|t| t.kind == kind).map(|t| t.close)
}

/// Strip formatting tags from `markdown`, recording the clean ranges they
/// wrapped.
///
/// An opening tag without a matching close tag is kept as literal text.
pub fn extract(markdown: &str) -> CleanMarkup {
    let mut out = Builder::default();
    out.strip(markdown);
    CleanMarkup {
        text: out.text,
        ranges: out.ranges,
    }
}

/// Next occurrence of `needle` at or after a position that only moves
/// forward, so each needle is scanned once per source string.
struct Finder {
    needle: &'static str,
    next: Option<usize>,
    exhausted: bool,
}

impl Finder {
    fn new(needle: &'static str) -> Self {
        Self {
            needle,
            next: None,
            exhausted: false,
        }
    }

    fn find_from(&mut self, src: &str, from: usize) -> Option<usize> {
        if self.exhausted {
            return None;
        }
        if let Some(at) = self.next
            && at >= from
        {
            return Some(at);
        }
        match src[from..].find(self.needle) {
            Some(offset) => {
                self.next = Some(from + offset);
                self.next
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

#[derive(Default)]
struct Builder {
    text: String,
    /// Char length of `text`.
    len: usize,
    ranges: Vec<TagRange>,
}

impl Builder {
    fn push(&mut self, s: &str) {
        self.text.push_str(s);
        self.len += s.chars().count();
    }

    fn strip(&mut self, src: &str) {
        let mut openers: Vec<Finder> = TAGS.iter().map(|t| Finder::new(t.open)).collect();
        let mut closers: Vec<Finder> = TAGS.iter().map(|t| Finder::new(t.close)).collect();
        let mut pos = 0;

        loop {
            let next = openers
                .iter_mut()
                .enumerate()
                .filter_map(|(i, finder)| finder.find_from(src, pos).map(|at| (at, i)))
                .min_by_key(|&(at, _)| at);

            let Some((at, i)) = next else {
                self.push(&src[pos..]);
                return;
            };

            let tag = &TAGS[i];
            self.push(&src[pos..at]);
            let inner = at + tag.open.len();

            match closers[i].find_from(src, inner) {
                Some(close) => {
                    let start = self.len;
                    self.strip(&src[inner..close]);
                    self.ranges.push(TagRange {
                        start,
                        end: self.len,
                        kind: tag.kind,
                    });
                    pos = close + tag.close.len();
                }
                None => {
                    debug!("unmatched {} kept as text at clean offset {}", tag.open, self.len);
                    self.push(tag.open);
                    pos = inner;
                }
            }
        }
    }
}
