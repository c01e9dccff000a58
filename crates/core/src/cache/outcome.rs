use crate::protocol::CommandResult;

/// Result of a write.
///
/// A write is `Stored` only when the backend acknowledged both the value and
/// the partition membership as newly added. Anything else hands the raw
/// results back so the caller can decide what they mean; re-writing an
/// existing key, for instance, reports `["OK", 0]`.
#[derive(Debug, Clone, PartialEq)]
pub enum PutOutcome {
    Stored,
    Unexpected(Vec<CommandResult>),
}

impl PutOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, PutOutcome::Stored)
    }
}
