use super::Error;
use crate::{schema::ColumnType, stmt::Value};

/// Error when a value's runtime type does not match the column's semantic
/// type.
#[derive(Debug)]
pub(super) struct TypeMismatch {
    field: Box<str>,
    expected: ColumnType,
    given: &'static str,
}

impl std::error::Error for TypeMismatch {}

impl core::fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid type for field `{}`: {} required but {} given",
            self.field, self.expected, self.given
        )
    }
}

impl Error {
    /// Creates a type mismatch error naming the field, the expected column
    /// type and the type of the offending value.
    pub fn type_mismatch(field: impl Into<String>, expected: ColumnType, given: &Value) -> Error {
        Error::from(super::ErrorKind::TypeMismatch(TypeMismatch {
            field: field.into().into(),
            expected,
            given: given.ty_name(),
        }))
    }

    /// Returns `true` if this error is a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeMismatch(_))
    }
}
