use super::{Statement, Value};

#[derive(Debug, Clone, Default)]
pub struct Insert {
    /// Column values, in column-list order. Each is bound under the
    /// column's name.
    pub values: Vec<(String, Value)>,

    /// Read the inserted row back with `returning *`
    pub returning: bool,
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}
