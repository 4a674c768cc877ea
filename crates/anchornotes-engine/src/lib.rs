pub mod error;
pub mod format;
pub mod io;
pub mod markdown;
pub mod models;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use error::FormatError;
pub use format::{
    Attribute, EditorSession, FormatKind, FormatSpan, SessionOptions, StyledText, TextSize,
    TypingFormatState,
};
pub use io::*;
pub use markdown::{MarkdownSerializer, SerializeOptions, from_markdown, to_markdown};
pub use models::NoteFile;
