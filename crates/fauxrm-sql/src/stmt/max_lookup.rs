use super::Statement;

/// Reads the largest value of a generated column, used to recover the value
/// the database assigned to a freshly inserted row when the backend cannot
/// return it directly.
///
/// This races with concurrent inserts.
#[derive(Debug, Clone)]
pub struct MaxLookup {
    pub column: String,
}

impl MaxLookup {
    /// Column alias of the looked-up value in the result row.
    pub const ALIAS: &'static str = "gen_col";

    pub fn new(column: impl Into<String>) -> MaxLookup {
        MaxLookup {
            column: column.into(),
        }
    }
}

impl From<MaxLookup> for Statement {
    fn from(value: MaxLookup) -> Self {
        Statement::MaxLookup(value)
    }
}
