use super::{Clause, ParamAllocator, Value};

use indexmap::IndexMap;
use std::{fmt, ops};

/// A compiled boolean predicate: SQL text plus its parameter bindings.
///
/// Expressions are immutable values. Combining two of them with
/// [`Expr::and`] / [`Expr::or`] (or `&` / `|`) consumes both and renames the
/// right-hand side's parameters wherever they would collide with the left.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    node: Option<Node>,

    /// Bound values keyed by parameter name
    params: IndexMap<String, Value>,

    /// Parameter names handed out per column
    allocator: ParamAllocator,

    /// Every value supplied per column, in supply order. List members are
    /// flattened.
    values: IndexMap<String, Vec<Value>>,
}

/// How sibling predicates are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conj {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    /// Clauses joined by the conjunction, without parentheses
    Group(Conj, Vec<Clause>),

    /// `(<lhs> <conj> (<rhs>))`. A multi-clause group on the left is
    /// parenthesized as well.
    Binary {
        conj: Conj,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
}

impl Expr {
    pub(super) fn from_clauses(
        conj: Conj,
        clauses: Vec<Clause>,
        params: IndexMap<String, Value>,
        allocator: ParamAllocator,
        values: IndexMap<String, Vec<Value>>,
    ) -> Expr {
        Expr {
            node: if clauses.is_empty() {
                None
            } else {
                Some(Node::Group(conj, clauses))
            },
            params,
            allocator,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// The rendered `where` fragment. Empty for an empty expression.
    pub fn sql(&self) -> String {
        self.to_string()
    }

    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.params
    }

    pub fn into_params(self) -> IndexMap<String, Value> {
        self.params
    }

    /// Parameter names used by each column.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.allocator.fields()
    }

    pub fn param_names(&self, column: &str) -> &[String] {
        self.allocator.names(column)
    }

    /// Values supplied for each column.
    pub fn original_values(&self) -> &IndexMap<String, Vec<Value>> {
        &self.values
    }

    /// Every leaf clause, in rendering order.
    pub fn clauses(&self) -> Vec<&Clause> {
        let mut out = vec![];
        if let Some(node) = &self.node {
            node.collect(&mut out);
        }
        out
    }

    pub fn and(self, other: Expr) -> Expr {
        self.combine(Conj::And, other)
    }

    pub fn or(self, other: Expr) -> Expr {
        self.combine(Conj::Or, other)
    }

    pub(super) fn combine(mut self, conj: Conj, other: Expr) -> Expr {
        let Expr {
            node: Some(mut rhs),
            params,
            allocator,
            values,
        } = other
        else {
            return self;
        };

        let Some(lhs) = self.node.take() else {
            return Expr {
                node: Some(rhs),
                params,
                allocator,
                values,
            };
        };

        let rename = self.allocator.absorb(allocator);
        rhs.rename(&rename);

        for (name, value) in params {
            self.params.insert(rename.apply(&name).to_string(), value);
        }

        for (column, supplied) in values {
            self.values.entry(column).or_default().extend(supplied);
        }

        self.node = Some(Node::Binary {
            conj,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        });

        self
    }
}

impl Node {
    fn rename(&mut self, rename: &super::Rename) {
        if rename.is_empty() {
            return;
        }

        match self {
            Node::Group(_, clauses) => {
                for clause in clauses {
                    clause.rename(rename);
                }
            }
            Node::Binary { lhs, rhs, .. } => {
                lhs.rename(rename);
                rhs.rename(rename);
            }
        }
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Clause>) {
        match self {
            Node::Group(_, clauses) => out.extend(clauses),
            Node::Binary { lhs, rhs, .. } => {
                lhs.collect(out);
                rhs.collect(out);
            }
        }
    }
}

impl Conj {
    pub fn as_sql(self) -> &'static str {
        match self {
            Conj::And => "and",
            Conj::Or => "or",
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Some(node) => fmt::Display::fmt(node, f),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Group(conj, clauses) => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", conj.as_sql())?;
                    }
                    fmt::Display::fmt(clause, f)?;
                }
                Ok(())
            }
            Node::Binary { conj, lhs, rhs } => match &**lhs {
                Node::Group(_, clauses) if clauses.len() > 1 => {
                    write!(f, "(({lhs}) {} ({rhs}))", conj.as_sql())
                }
                _ => write!(f, "({lhs} {} ({rhs}))", conj.as_sql()),
            },
        }
    }
}

impl ops::BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        self.and(rhs)
    }
}

impl ops::BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        self.or(rhs)
    }
}
