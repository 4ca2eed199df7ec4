use crate::{stmt::RowStream, Result};

#[derive(Debug)]
pub enum Response {
    /// Number of rows affected by the statement
    Count(u64),

    /// Rows produced by the statement
    Rows(RowStream),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self::Count(count)
    }

    pub fn rows(rows: RowStream) -> Self {
        Self::Rows(rows)
    }

    pub fn empty_rows() -> Self {
        Self::Rows(RowStream::default())
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Self::Count(count) => Ok(count),
            Self::Rows(_) => Err(crate::err!("expected an affected-row count, got rows")),
        }
    }

    pub fn into_rows(self) -> Result<RowStream> {
        match self {
            Self::Rows(rows) => Ok(rows),
            Self::Count(_) => Err(crate::err!("expected rows, got an affected-row count")),
        }
    }
}
