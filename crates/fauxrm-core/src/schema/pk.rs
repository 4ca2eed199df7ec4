use std::fmt;

/// The columns composing a table's primary key, in constraint order.
///
/// A table may have no key at all; views never have one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryKey {
    pub columns: Vec<String>,
}

impl PrimaryKey {
    pub fn new(columns: Vec<String>) -> PrimaryKey {
        PrimaryKey { columns }
    }

    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    pub fn exists(&self) -> bool {
        self.field_count() > 0
    }

    pub fn is_composite(&self) -> bool {
        self.field_count() > 1
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.columns.as_slice() {
            [single] => f.write_str(single),
            columns => write!(f, "({})", columns.join(", ")),
        }
    }
}
