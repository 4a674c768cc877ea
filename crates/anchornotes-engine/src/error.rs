use thiserror::Error;

/// Contract violations reported by the formatting operations.
///
/// Markup problems found while parsing markdown are never reported here;
/// deserialization always succeeds and degrades instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Invalid range {start}..{end} for buffer of length {len}")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("observe_after_edit called without a preceding observe_before_edit")]
    EditNotObserved,

    #[error("observe_before_edit called twice without an observe_after_edit in between")]
    EditAlreadyObserved,
}
