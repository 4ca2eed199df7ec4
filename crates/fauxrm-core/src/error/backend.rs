use super::Error;

/// Context attached to a failed statement.
///
/// The root cause is the driver error; this layer records the SQL text that
/// was sent so it shows up in diagnostics.
#[derive(Debug)]
pub(super) struct Backend {
    sql: Box<str>,
}

impl std::error::Error for Backend {}

impl core::fmt::Display for Backend {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "database error with statement `{}`", self.sql)
    }
}

impl Error {
    /// Creates a backend error for the given statement text.
    ///
    /// Usually attached with [`Error::context`] on top of the driver error.
    pub fn backend(sql: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Backend(Backend {
            sql: sql.into().into(),
        }))
    }

    /// Returns `true` if this error is a backend error.
    pub fn is_backend(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Backend(_))
    }

    /// The SQL text attached to a backend error.
    pub fn sql(&self) -> Option<&str> {
        match self.kind() {
            super::ErrorKind::Backend(err) => Some(&err.sql),
            _ => None,
        }
    }
}
