/// Relative scale of the small text size class.
pub const SMALL_SCALE: f32 = 0.8;
/// Relative scale of the default text size. Never stored as a span.
pub const MEDIUM_SCALE: f32 = 1.0;
/// Relative scale of the large text size class.
pub const LARGE_SCALE: f32 = 1.3;
/// How far a relative size may drift from a class scale and still match it.
pub const SCALE_TOLERANCE: f32 = 0.1;

/// A visual formatting attribute.
///
/// Bold and italic on the same range may be stored either as two spans or as
/// one `BoldItalic` span; both forms are accepted everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatKind {
    Bold,
    Italic,
    BoldItalic,
    Small,
    Large,
}

impl FormatKind {
    /// True for kinds that render bold (`Bold`, `BoldItalic`).
    pub fn is_bold(self) -> bool {
        matches!(self, FormatKind::Bold | FormatKind::BoldItalic)
    }

    /// True for kinds that render italic (`Italic`, `BoldItalic`).
    pub fn is_italic(self) -> bool {
        matches!(self, FormatKind::Italic | FormatKind::BoldItalic)
    }

    /// True for the size classes (`Small`, `Large`).
    pub fn is_size(self) -> bool {
        matches!(self, FormatKind::Small | FormatKind::Large)
    }

    /// Classify a relative size scale. Scales near 1.0 are the default size
    /// and have no kind.
    pub fn from_scale(scale: f32) -> Option<Self> {
        if (scale - SMALL_SCALE).abs() < SCALE_TOLERANCE {
            Some(FormatKind::Small)
        } else if (scale - LARGE_SCALE).abs() < SCALE_TOLERANCE {
            Some(FormatKind::Large)
        } else {
            None
        }
    }

    /// Map an externally produced attribute onto a kind.
    ///
    /// This is the only place foreign attributes are interpreted; everything
    /// downstream works on `FormatKind` alone.
    pub fn from_attribute(attribute: Attribute) -> Option<Self> {
        match attribute {
            Attribute::Bold => Some(FormatKind::Bold),
            Attribute::Italic => Some(FormatKind::Italic),
            Attribute::BoldItalic => Some(FormatKind::BoldItalic),
            Attribute::RelativeSize(scale) => Self::from_scale(scale),
        }
    }
}

/// A formatting attribute as delivered by a rich-text source outside this
/// crate (a platform text widget, an importer, a renderer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attribute {
    Bold,
    Italic,
    BoldItalic,
    /// Font size relative to the body size, e.g. `0.8` or `1.3`.
    RelativeSize(f32),
}

/// One formatting attribute over the char range `[start, end)`.
///
/// Spans are plain values. Validity against a particular buffer
/// (`start < end <= len`) is checked by [`StyledText`](super::StyledText)
/// when the span is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatSpan {
    /// Inclusive start char offset.
    pub start: usize,
    /// Exclusive end char offset.
    pub end: usize,
    pub kind: FormatKind,
}

impl FormatSpan {
    pub fn new(start: usize, end: usize, kind: FormatKind) -> Self {
        Self { start, end, kind }
    }

    /// Length in chars; zero for an inverted span.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True if this span shares at least one char with `[start, end)`.
    pub fn overlaps(self, start: usize, end: usize) -> bool {
        self.start < end && self.end > start
    }
}

/// Size classes offered by the formatting toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

impl TextSize {
    pub fn scale(self) -> f32 {
        match self {
            TextSize::Small => SMALL_SCALE,
            TextSize::Medium => MEDIUM_SCALE,
            TextSize::Large => LARGE_SCALE,
        }
    }

    /// Span kind for this size; `Medium` is the absence of a size span.
    pub fn format_kind(self) -> Option<FormatKind> {
        match self {
            TextSize::Small => Some(FormatKind::Small),
            TextSize::Medium => None,
            TextSize::Large => Some(FormatKind::Large),
        }
    }
}
