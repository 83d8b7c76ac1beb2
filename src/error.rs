//! Errors reported by `LinkedHashMap` and its cursors.

/// Failures of keyed accessors and cursor operations.
///
/// Both variants signal caller misuse; the map itself is left unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// The requested key is not present in the map.
    #[error("key not found")]
    KeyNotFound,

    /// The cursor is past the end, before the beginning, refers to an erased
    /// entry, or belongs to a different map.
    #[error("cursor does not refer to a valid position in this map")]
    InvalidPosition,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
