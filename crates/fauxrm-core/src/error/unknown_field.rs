use super::Error;

/// Error when a caller names a field that the table does not have.
#[derive(Debug)]
pub(super) struct UnknownField {
    table: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UnknownField {}

impl core::fmt::Display for UnknownField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid field `{}` for `{}`", self.field, self.table)
    }
}

impl Error {
    /// Creates an unknown field error.
    pub fn unknown_field(table: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownField(UnknownField {
            table: table.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown field error.
    pub fn is_unknown_field(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownField(_))
    }
}
