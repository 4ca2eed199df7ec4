use super::Error;

/// Error when the database rejects a statement because of a unique or
/// foreign key constraint.
#[derive(Debug)]
pub(super) struct IntegrityViolation {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for IntegrityViolation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "integrity constraint violated: {}", self.inner)
    }
}

impl Error {
    /// Creates an integrity violation error from the driver's error.
    pub fn integrity_violation(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::IntegrityViolation(IntegrityViolation {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is an integrity violation.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IntegrityViolation(_))
    }
}
