use super::{Expr, Statement, Value};

#[derive(Debug, Clone)]
pub struct Update {
    /// New column values, bound under each column's name. Must not overlap
    /// the columns the filter binds.
    pub assignments: Vec<(String, Value)>,

    /// Rows to update
    pub filter: Expr,
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}
