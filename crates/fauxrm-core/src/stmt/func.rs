use std::fmt;

/// A SQL function wrapped around the column side of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    /// Truncate a datetime to its date
    Trunc,
}

impl Func {
    pub fn from_keyword(keyword: &str) -> Option<Func> {
        match keyword {
            "trunc" => Some(Func::Trunc),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Trunc => "trunc",
        }
    }

    /// Renders `func(column)`.
    pub fn apply(self, column: &str) -> String {
        format!("{}({column})", self.name())
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
