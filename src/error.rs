use thiserror::Error;

/// Result for container operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error for container operations.
///
/// Every variant is a fixed sentinel: compare with `==` or `matches!`,
/// never by message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// A put was rejected
    #[error("kvc: failed put")]
    Put,

    /// The key is not present
    #[error("kvc: failed get")]
    Get,

    /// The key was not present before the modification
    #[error("kvc: failed mod")]
    Mod,

    /// The key is not present, nothing was deleted
    #[error("kvc: failed del")]
    Del,

    /// A search failed
    #[error("kvc: failed search")]
    Search,

    /// A search-and-update failed
    #[error("kvc: failed search update")]
    SearchUpdate,

    /// A search-and-delete failed
    #[error("kvc: failed search delete")]
    SearchDelete,

    /// A function adapter was called with no function set
    #[error("kvc: used interface without an implementation")]
    Unimplemented,

    /// The context was cancelled
    #[error("kvc: context cancelled")]
    Cancelled,

    /// The context deadline passed
    #[error("kvc: context deadline exceeded")]
    DeadlineExceeded,
}

impl Error {
    /// Returns `true` for the error raised by an unset function adapter.
    pub fn is_unimplemented(&self) -> bool {
        matches!(self, Error::Unimplemented)
    }
}
