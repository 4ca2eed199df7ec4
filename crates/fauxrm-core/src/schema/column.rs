use super::ColumnType;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column in the database, lower-cased.
    pub name: String,

    /// The semantic type the column's values are checked against.
    pub ty: ColumnType,

    /// The type as declared in the table's DDL, e.g. `VARCHAR2(100)`.
    pub storage_ty: String,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// True if the database assigns the column's value (identity columns,
    /// sequences behind triggers, rowid aliases).
    pub generated: bool,
}

impl Column {
    pub fn is_lob(&self) -> bool {
        self.ty.is_lob()
    }

    /// Non-nullable columns the caller must supply on insert.
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.generated
    }
}
