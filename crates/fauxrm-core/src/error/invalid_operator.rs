use super::Error;

/// Error when a field token carries an operator keyword that is not allowed
/// in its position, e.g. `visit_date___trunc___like`.
#[derive(Debug)]
pub(super) struct InvalidOperator {
    token: Box<str>,
    keyword: Box<str>,
}

impl std::error::Error for InvalidOperator {}

impl core::fmt::Display for InvalidOperator {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid operator `{}` in field `{}`",
            self.keyword, self.token
        )
    }
}

impl Error {
    /// Creates an invalid operator error.
    pub fn invalid_operator(token: impl Into<String>, keyword: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidOperator(InvalidOperator {
            token: token.into().into(),
            keyword: keyword.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid operator error.
    pub fn is_invalid_operator(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidOperator(_))
    }
}
