/*!
 * # Formatting Model
 *
 * A note is edited as a [`StyledText`]: plain text plus a flat list of
 * [`FormatSpan`]s over char offsets. Spans may overlap in any way, including
 * spans of the same kind. Nothing here ever merges or normalizes them; that
 * happens once, when the buffer is serialized to markdown.
 *
 * ## Components
 *
 * - **`span`**: the five [`FormatKind`]s, [`TextSize`] and the [`Attribute`]
 *   values a host rich-text widget hands us
 * - **`styled_text`**: the buffer, and how spans move when the host edits text
 * - **`editor`**: bold/italic/size commands over an explicit selection
 * - **`typing`**: formats pinned on for text typed without a selection
 * - **`checklist`**: `☐ ` continuation after Enter on a checklist line
 * - **`session`**: [`EditorSession`] tying the above to a cursor/selection
 *
 * ## Edit Hooks
 *
 * ```text
 * host keypress
 *   └─ EditorSession::insert_text
 *        ├─ TypingFormatState::observe_before_edit   (length + cursor)
 *        ├─ StyledText::replace_range                (spans shift)
 *        ├─ TypingFormatState::observe_after_edit    (pinned spans added)
 *        └─ checklist::continuation_at               (maybe insert "☐ ")
 * ```
 */

pub mod checklist;
pub mod editor;
pub mod session;
pub mod span;
pub mod styled_text;
pub mod typing;

pub use editor::{apply_size, toggle_bold, toggle_italic};
pub use session::{EditorSession, SessionOptions};
pub use span::{Attribute, FormatKind, FormatSpan, TextSize};
pub use styled_text::StyledText;
pub use typing::TypingFormatState;
