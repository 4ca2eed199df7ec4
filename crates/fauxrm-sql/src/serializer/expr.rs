use super::{Formatter, Params, ToSql};

use fauxrm_core::{schema::ColumnType, stmt::Expr};

impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        for (name, value) in self.params() {
            f.params.push(name, value);
        }

        f.dst.push_str(&self.sql());
    }
}

/// A column value bound under the column's name, wrapped in a conversion
/// function where the flavor needs one for large objects.
pub(super) struct Bind<'a> {
    pub(super) column: &'a str,
    pub(super) value: &'a fauxrm_core::stmt::Value,
}

impl ToSql for Bind<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let placeholder = f.params.push(self.column, self.value);

        let wrapper = if f.serializer.is_oracle() && !self.value.is_null() {
            match f.serializer.schema.column(self.column).map(|c| c.ty) {
                Some(ColumnType::Blob) => Some("to_blob"),
                Some(ColumnType::Clob) => Some("to_clob"),
                _ => None,
            }
        } else {
            None
        };

        match wrapper {
            Some(func) => fmt!(f, func "(" placeholder ")"),
            None => fmt!(f, placeholder),
        }
    }
}

/// `column = :column`
pub(super) struct Assign<'a>(pub(super) Bind<'a>);

impl ToSql for Assign<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, self.0.column " = " self.0);
    }
}
