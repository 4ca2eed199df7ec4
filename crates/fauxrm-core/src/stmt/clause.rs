use super::{FieldToken, Operator, Rename};

use std::fmt;

/// One leaf predicate of an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub token: FieldToken,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `<col> is null`
    IsNull,

    /// `<col> is not null`
    IsNotNull,

    /// `<col> <op> :<param>`
    Compare { op: Operator, param: String },

    /// One or more capped parameter lists. In-lists are OR-joined, negated
    /// lists AND-joined.
    InList {
        negated: bool,
        chunks: Vec<Vec<String>>,
    },
}

impl Clause {
    /// Parameter names the clause binds, in rendering order.
    pub fn params(&self) -> Vec<&str> {
        match &self.predicate {
            Predicate::Compare { param, .. } => vec![param.as_str()],
            Predicate::InList { chunks, .. } => {
                chunks.iter().flatten().map(String::as_str).collect()
            }
            Predicate::IsNull | Predicate::IsNotNull => vec![],
        }
    }

    pub(crate) fn rename(&mut self, rename: &Rename) {
        match &mut self.predicate {
            Predicate::Compare { param, .. } => {
                *param = rename.apply(param).to_string();
            }
            Predicate::InList { chunks, .. } => {
                for param in chunks.iter_mut().flatten() {
                    *param = rename.apply(param).to_string();
                }
            }
            Predicate::IsNull | Predicate::IsNotNull => {}
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.token.target();

        match &self.predicate {
            Predicate::IsNull => write!(f, "{target} is null"),
            Predicate::IsNotNull => write!(f, "{target} is not null"),
            Predicate::Compare { op, param } => write!(f, "{target} {op} :{param}"),
            Predicate::InList { negated, chunks } => {
                let (op, conj) = if *negated {
                    (Operator::NotIn, " and ")
                } else {
                    (Operator::In, " or ")
                };

                match chunks.as_slice() {
                    [] if *negated => f.write_str("1 = 1"),
                    [] => f.write_str("1 = 0"),
                    [chunk] => fmt_list(f, &target, op, chunk),
                    chunks => {
                        f.write_str("(")?;
                        for (i, chunk) in chunks.iter().enumerate() {
                            if i > 0 {
                                f.write_str(conj)?;
                            }
                            fmt_list(f, &target, op, chunk)?;
                        }
                        f.write_str(")")
                    }
                }
            }
        }
    }
}

fn fmt_list(f: &mut fmt::Formatter<'_>, target: &str, op: Operator, chunk: &[String]) -> fmt::Result {
    write!(f, "{target} {op} (")?;
    for (i, param) in chunk.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, ":{param}")?;
    }
    f.write_str(")")
}
