//! Cross-process adoption of external writes
//!
//! Several processes may share one store file, each holding its own
//! in-memory document. The store is the only synchronization point: a
//! tracker polls it and adopts the stored document wholesale when its
//! stamp is strictly newer than the local one. Ties and older stamps are
//! ignored, so local state wins silently. This is last-writer-wins with
//! no merge of concurrent edits - two processes saving near-simultaneously
//! can lose one side's changes, a documented limitation of the design.

/// Outcome of one reconciliation pass against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The stored document was strictly newer and replaced local state
    Adopted,
    /// The stored document was not newer; local state kept
    Ignored,
    /// The store was missing or unreadable; local state kept
    Unavailable,
}

/// Last-writer-wins adoption rule
///
/// Adopt exactly when the remote stamp is strictly greater; a tie keeps
/// local state.
pub fn should_adopt(local_stamp: i64, remote_stamp: i64) -> bool {
    remote_stamp > local_stamp
}
