use super::{in_list, Clause, Conj, Expr, FieldToken, Operator, ParamAllocator, Predicate, Value};
use crate::{Error, Result};

use indexmap::IndexMap;

/// Most values rendered in a single `in (...)` list unless the backend says
/// otherwise.
pub const DEFAULT_IN_LIST_LIMIT: usize = 1000;

/// Builds an [`Expr`] from field tokens and nested expressions.
///
/// Field clauses are joined with the builder's conjunction. Nested
/// expressions are merged in with [`Query::and`]'s and [`Query::or`]'s own
/// conjunction, while a plain [`Query::new`] ORs them onto its ANDed fields.
///
/// ```
/// use fauxrm_core::stmt::Query;
///
/// let expr = Query::new()
///     .field("age___gte", 30)
///     .field("last_name", "Smith")
///     .build()
///     .unwrap();
///
/// assert_eq!(expr.sql(), "age >= :age and last_name = :last_name");
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    conj: Conj,

    /// Joins nested expressions onto the field clauses
    nested: Conj,

    fields: Vec<(String, Value)>,
    exprs: Vec<Expr>,
    in_list_limit: usize,
}

impl Query {
    /// Fields are ANDed; nested expressions are ORed.
    pub fn new() -> Query {
        Query::with_conj(Conj::And, Conj::Or)
    }

    /// Fields and nested expressions are ANDed.
    pub fn and() -> Query {
        Query::with_conj(Conj::And, Conj::And)
    }

    /// Fields and nested expressions are ORed.
    pub fn or() -> Query {
        Query::with_conj(Conj::Or, Conj::Or)
    }

    fn with_conj(conj: Conj, nested: Conj) -> Query {
        Query {
            conj,
            nested,
            fields: vec![],
            exprs: vec![],
            in_list_limit: DEFAULT_IN_LIST_LIMIT,
        }
    }

    pub fn field(mut self, token: impl Into<String>, value: impl Into<Value>) -> Query {
        self.fields.push((token.into(), value.into()));
        self
    }

    pub fn expr(mut self, expr: Expr) -> Query {
        self.exprs.push(expr);
        self
    }

    pub fn in_list_limit(mut self, limit: usize) -> Query {
        self.in_list_limit = limit;
        self
    }

    pub fn set_in_list_limit(&mut self, limit: usize) {
        self.in_list_limit = limit;
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [(String, Value)] {
        &mut self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.exprs.iter().all(Expr::is_empty)
    }

    pub fn build(self) -> Result<Expr> {
        let mut allocator = ParamAllocator::new();
        let mut params = IndexMap::new();
        let mut values: IndexMap<String, Vec<Value>> = IndexMap::new();
        let mut clauses = Vec::with_capacity(self.fields.len());

        for (raw, value) in self.fields {
            let token = FieldToken::parse(&raw)?;
            let supplied = values.entry(token.column.clone()).or_default();

            let predicate = match value {
                Value::Null => {
                    supplied.push(Value::Null);
                    match token.op {
                        Operator::Eq => Predicate::IsNull,
                        Operator::Ne | Operator::NotIn => Predicate::IsNotNull,
                        op => return Err(Error::invalid_operator(raw, op.keyword())),
                    }
                }
                value if value.is_list() || matches!(token.op, Operator::In | Operator::NotIn) => {
                    let negated = match token.op {
                        Operator::Eq | Operator::In => false,
                        Operator::Ne | Operator::NotIn => true,
                        op => return Err(Error::invalid_operator(raw, op.keyword())),
                    };

                    let items = value.into_items();
                    let names = allocator.list(&token.column, items.len());

                    for (name, item) in names.iter().zip(&items) {
                        params.insert(name.clone(), item.clone());
                    }
                    supplied.extend(items);

                    Predicate::InList {
                        negated,
                        chunks: in_list::split(names, self.in_list_limit),
                    }
                }
                value => {
                    let param = allocator.scalar(&token.column);
                    params.insert(param.clone(), value.clone());
                    supplied.push(value);

                    Predicate::Compare { op: token.op, param }
                }
            };

            clauses.push(Clause { token, predicate });
        }

        let mut expr = Expr::from_clauses(self.conj, clauses, params, allocator, values);

        for nested in self.exprs {
            expr = expr.combine(self.nested, nested);
        }

        Ok(expr)
    }
}

impl Default for Query {
    fn default() -> Self {
        Query::new()
    }
}
