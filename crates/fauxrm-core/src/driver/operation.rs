use crate::stmt::Value;

use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Execute a SQL statement with named bind parameters
    QuerySql(QuerySql),

    /// End the current transaction
    Transaction(Transaction),
}

#[derive(Debug, Clone)]
pub struct QuerySql {
    /// The SQL text, using `:name` placeholders
    pub sql: String,

    /// Values for each placeholder, keyed by name without the colon
    pub params: IndexMap<String, Value>,

    /// When true, the response is a row stream, otherwise an affected-row
    /// count.
    pub returns_rows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Commit,
    Rollback,
}

impl Operation {
    pub fn is_query_sql(&self) -> bool {
        matches!(self, Self::QuerySql(_))
    }

    pub fn as_query_sql(&self) -> Option<&QuerySql> {
        match self {
            Self::QuerySql(op) => Some(op),
            _ => None,
        }
    }
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Self::QuerySql(value)
    }
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Self {
        Self::Transaction(value)
    }
}
