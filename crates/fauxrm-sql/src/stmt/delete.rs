use super::{Expr, Statement};

#[derive(Debug, Clone, Default)]
pub struct Delete {
    /// Rows to delete. `None` deletes every row.
    pub filter: Option<Expr>,
}

impl Delete {
    pub fn filtered(filter: Expr) -> Delete {
        Delete {
            filter: Some(filter),
        }
    }

    pub fn all() -> Delete {
        Delete { filter: None }
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}
