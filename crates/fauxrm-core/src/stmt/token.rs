use super::{Func, Operator};
use crate::{Error, Result};

use std::fmt;

const DELIM: &str = "___";

/// A field token decoded into its column, operator and optional function.
///
/// Tokens use a triple-underscore suffix grammar:
///
/// ```text
/// age                       age = :age
/// age___gte                 age >= :age
/// visit_date___trunc        trunc(visit_date) = :visit_date
/// visit_date___trunc___lt   trunc(visit_date) < :visit_date
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldToken {
    pub column: String,
    pub op: Operator,
    pub func: Option<Func>,
}

impl FieldToken {
    pub fn parse(token: &str) -> Result<FieldToken> {
        let Some((head, keyword)) = token.rsplit_once(DELIM) else {
            return Ok(FieldToken::column(token));
        };

        if let Some(func) = Func::from_keyword(keyword) {
            return Ok(FieldToken {
                column: head.to_string(),
                op: Operator::Eq,
                func: Some(func),
            });
        }

        if let Some((column, qualifier)) = head.rsplit_once(DELIM) {
            if let Some(func) = Func::from_keyword(qualifier) {
                let op = Operator::from_keyword(keyword)
                    .filter(|op| op.allowed_after_func())
                    .ok_or_else(|| Error::invalid_operator(token, keyword))?;

                return Ok(FieldToken {
                    column: column.to_string(),
                    op,
                    func: Some(func),
                });
            }
        }

        match Operator::from_keyword(keyword) {
            Some(op) => Ok(FieldToken {
                column: head.to_string(),
                op,
                func: None,
            }),
            None => Ok(FieldToken::column(token)),
        }
    }

    /// A plain equality token on `column`.
    pub fn column(column: impl Into<String>) -> FieldToken {
        FieldToken {
            column: column.into(),
            op: Operator::Eq,
            func: None,
        }
    }

    /// Renders the column side of a clause, wrapped in the function if any.
    pub fn target(&self) -> String {
        match self.func {
            Some(func) => func.apply(&self.column),
            None => self.column.clone(),
        }
    }
}

impl fmt::Display for FieldToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column)?;

        if let Some(func) = self.func {
            write!(f, "{DELIM}{func}")?;
        }

        if self.op != Operator::Eq {
            write!(f, "{DELIM}{}", self.op.keyword())?;
        }

        Ok(())
    }
}
