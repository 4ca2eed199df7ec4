use super::{Expr, Statement};

/// `select *` from the serializer's table.
#[derive(Debug, Clone, Default)]
pub struct Select {
    pub filter: Option<Expr>,

    /// Maximum number of rows to return
    pub limit: Option<u64>,

    /// Lock the selected rows until the transaction ends. Ignored by
    /// flavors without row locks.
    pub for_update: bool,
}

impl Select {
    pub fn new(filter: Option<Expr>) -> Select {
        Select {
            filter,
            ..Select::default()
        }
    }

    pub fn limit(mut self, limit: u64) -> Select {
        self.limit = Some(limit);
        self
    }

    pub fn for_update(mut self) -> Select {
        self.for_update = true;
        self
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Statement::Select(value)
    }
}
