use crate::schema::ObjectKind;

/// A driver's raw description of a table or view, before declared types are
/// mapped.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub kind: ObjectKind,
    pub columns: Vec<ColumnInfo>,

    /// Primary key columns in constraint order.
    pub primary_key: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub nullable: bool,
    pub generated: bool,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> ColumnInfo {
        ColumnInfo {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable: true,
            generated: false,
        }
    }

    pub fn not_null(mut self) -> ColumnInfo {
        self.nullable = false;
        self
    }

    pub fn generated(mut self) -> ColumnInfo {
        self.generated = true;
        self
    }
}
