use super::{Expr, Statement};

/// `select count(*)`, optionally filtered.
#[derive(Debug, Clone, Default)]
pub struct Count {
    pub filter: Option<Expr>,
}

impl Count {
    pub fn new(filter: Option<Expr>) -> Count {
        Count { filter }
    }
}

impl From<Count> for Statement {
    fn from(value: Count) -> Self {
        Statement::Count(value)
    }
}
