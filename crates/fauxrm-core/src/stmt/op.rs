use std::fmt;

/// A comparison operator, decoded from a field token's suffix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    NotIn,
    Like,
    NotLike,
}

impl Operator {
    /// Decodes a suffix keyword. `None` means the text is not an operator
    /// keyword at all.
    pub fn from_keyword(keyword: &str) -> Option<Operator> {
        Some(match keyword {
            "gt" => Operator::Gt,
            "gte" => Operator::Ge,
            "lt" => Operator::Lt,
            "lte" => Operator::Le,
            "ne" => Operator::Ne,
            "in" => Operator::In,
            "nin" => Operator::NotIn,
            "like" => Operator::Like,
            "nlike" => Operator::NotLike,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Ge => "gte",
            Operator::Lt => "lt",
            Operator::Le => "lte",
            Operator::In => "in",
            Operator::NotIn => "nin",
            Operator::Like => "like",
            Operator::NotLike => "nlike",
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Like => "like",
            Operator::NotLike => "not like",
        }
    }

    /// True for the operators that may follow a function qualifier.
    pub fn allowed_after_func(self) -> bool {
        !matches!(self, Operator::Like | Operator::NotLike)
    }

    pub fn is_negated(self) -> bool {
        matches!(self, Operator::Ne | Operator::NotIn | Operator::NotLike)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}
