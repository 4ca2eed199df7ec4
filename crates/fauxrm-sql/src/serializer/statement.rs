use super::{expr::Assign, expr::Bind, Comma, Formatter, Params, ToSql};

use crate::stmt::{self, Expr, MaxLookup, Statement};
use fauxrm_core::driver::Flavor;

/// ` where <filter>`, or nothing for a missing or empty filter.
struct Where<'a>(Option<&'a Expr>);

impl ToSql for Where<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(filter) = self.0.filter(|filter| !filter.is_empty()) {
            fmt!(f, " where " filter);
        }
    }
}

struct Table;

impl ToSql for Table {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let name = f.serializer.schema.name.to_string();
        f.dst.push_str(&name);
    }
}

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::Count(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::MaxLookup(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Count {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "select count(*) as count from " Table Where(self.filter.as_ref()));
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "delete from " Table Where(self.filter.as_ref()));
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if self.values.is_empty() {
            fmt!(f, "insert into " Table " default values");
        } else {
            let columns = Comma(self.values.iter().map(|(column, _)| column));
            let values = Comma(
                self.values
                    .iter()
                    .map(|(column, value)| Bind { column, value }),
            );

            fmt!(f, "insert into " Table " (" columns ") values (" values ")");
        }

        if self.returning {
            fmt!(f, " returning *");
        }
    }
}

impl ToSql for &MaxLookup {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let column = &self.column;
        fmt!(f, "select max(" column ") as " MaxLookup::ALIAS " from " Table);
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "select * from " Table Where(self.filter.as_ref()));

        if let Some(limit) = self.limit {
            match f.serializer.flavor {
                Flavor::Oracle => fmt!(f, " fetch first " limit " rows only"),
                Flavor::Sqlite => fmt!(f, " limit " limit),
            }
        }

        if self.for_update && f.serializer.is_oracle() {
            fmt!(f, " for update");
        }
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let assignments = Comma(
            self.assignments
                .iter()
                .map(|(column, value)| Assign(Bind { column, value })),
        );

        fmt!(f, "update " Table " set " assignments Where(Some(&self.filter)));
    }
}
