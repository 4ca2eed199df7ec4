use super::Error;
use crate::schema::ColumnType;

/// Error when a filter references a large object column.
#[derive(Debug)]
pub(super) struct UnsupportedColumn {
    column: Box<str>,
    ty: ColumnType,
}

impl std::error::Error for UnsupportedColumn {}

impl core::fmt::Display for UnsupportedColumn {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot filter on {} column `{}`",
            self.ty, self.column
        )
    }
}

impl Error {
    /// Creates an unsupported column error.
    pub fn unsupported_column(column: impl Into<String>, ty: ColumnType) -> Error {
        Error::from(super::ErrorKind::UnsupportedColumn(UnsupportedColumn {
            column: column.into().into(),
            ty,
        }))
    }

    /// Returns `true` if this error is an unsupported column error.
    pub fn is_unsupported_column(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedColumn(_))
    }
}
