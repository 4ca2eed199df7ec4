use super::Error;

/// Error when a null is assigned to a non-nullable column.
#[derive(Debug)]
pub(super) struct NullabilityViolation {
    field: Box<str>,
}

impl std::error::Error for NullabilityViolation {}

impl core::fmt::Display for NullabilityViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "field `{}` cannot be null", self.field)
    }
}

impl Error {
    /// Creates a nullability violation for the given field.
    pub fn nullability_violation(field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NullabilityViolation(NullabilityViolation {
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is a nullability violation.
    pub fn is_nullability_violation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NullabilityViolation(_))
    }
}
