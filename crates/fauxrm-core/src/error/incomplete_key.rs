use super::Error;

/// Error when a key lookup does not name every primary key column.
#[derive(Debug)]
pub(super) struct IncompleteKey {
    message: Box<str>,
}

impl std::error::Error for IncompleteKey {}

impl core::fmt::Display for IncompleteKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "incomplete key: {}", self.message)
    }
}

impl Error {
    /// Creates an incomplete key error.
    pub fn incomplete_key(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::IncompleteKey(IncompleteKey {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an incomplete key error.
    pub fn is_incomplete_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IncompleteKey(_))
    }
}
