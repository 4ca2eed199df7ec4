use fauxrm_core::{
    schema::TableSchema,
    stmt::{Expr, FieldToken, Query, Value},
    validate, Result,
};

/// Which rows a read or delete applies to.
#[derive(Debug, Clone, Default)]
pub enum Filter {
    /// Every row
    #[default]
    All,

    /// Field tokens and nested expressions, compiled against the table
    Query(Query),

    /// An expression compiled ahead of time
    Expr(Expr),
}

impl Filter {
    pub fn is_all(&self) -> bool {
        match self {
            Filter::All => true,
            Filter::Query(query) => query.is_empty(),
            Filter::Expr(expr) => expr.is_empty(),
        }
    }

    /// Compiles the filter into a `where` expression for `schema`.
    ///
    /// Field names are matched to columns case-insensitively, and every
    /// supplied value is checked against its column before anything is sent
    /// to the database. Returns `None` when the filter selects every row.
    pub(crate) fn compile(self, schema: &TableSchema, in_list_limit: usize) -> Result<Option<Expr>> {
        let expr = match self {
            Filter::All => return Ok(None),
            Filter::Query(mut query) => {
                for (raw, _) in query.fields_mut() {
                    let mut token = FieldToken::parse(raw)?;
                    token.column = schema.resolve(&token.column)?.name.clone();
                    *raw = token.to_string();
                }

                query.set_in_list_limit(in_list_limit);
                query.build()?
            }
            Filter::Expr(expr) => expr,
        };

        for (column, values) in expr.original_values() {
            for value in values {
                validate::filter(schema, column, value)?;
            }
        }

        // Empty lists supply no values, so check every clause's column too
        for clause in expr.clauses() {
            validate::filter(schema, &clause.token.column, &Value::Null)?;
        }

        Ok(if expr.is_empty() { None } else { Some(expr) })
    }
}

impl From<Query> for Filter {
    fn from(value: Query) -> Self {
        Filter::Query(value)
    }
}

impl From<Expr> for Filter {
    fn from(value: Expr) -> Self {
        Filter::Expr(value)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Filter
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(fields: [(K, V); N]) -> Self {
        Filter::from_iter(fields)
    }
}

impl<K, V> From<Vec<(K, V)>> for Filter
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(fields: Vec<(K, V)>) -> Self {
        Filter::from_iter(fields)
    }
}

impl<K, V> FromIterator<(K, V)> for Filter
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Filter::Query(
            iter.into_iter()
                .fold(Query::new(), |query, (token, value)| query.field(token, value)),
        )
    }
}
