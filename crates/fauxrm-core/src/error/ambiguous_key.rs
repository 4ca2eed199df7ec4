use super::Error;

/// Error when a primary-key lookup matched more than one row.
///
/// This never happens for a real key; it means the catalog's key does not
/// match the table's constraints.
#[derive(Debug)]
pub(super) struct AmbiguousKey {
    table: Box<str>,
    matched: usize,
}

impl std::error::Error for AmbiguousKey {}

impl core::fmt::Display for AmbiguousKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "ambiguous key: {} rows in `{}` matched a primary key lookup",
            self.matched, self.table
        )
    }
}

impl Error {
    /// Creates an ambiguous key error.
    pub fn ambiguous_key(table: impl Into<String>, matched: usize) -> Error {
        Error::from(super::ErrorKind::AmbiguousKey(AmbiguousKey {
            table: table.into().into(),
            matched,
        }))
    }

    /// Returns `true` if this error is an ambiguous key error.
    pub fn is_ambiguous_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::AmbiguousKey(_))
    }
}
