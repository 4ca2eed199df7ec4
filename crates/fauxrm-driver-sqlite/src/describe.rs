use fauxrm_core::{
    driver::{ColumnInfo, Description},
    schema::{ObjectKind, ObjectName},
    Error, Result,
};
use rusqlite::{params, Connection, OptionalExtension};

struct XInfo {
    name: String,
    declared_type: String,
    not_null: bool,
    pk: i64,
    hidden: i64,
}

pub(crate) fn describe(connection: &Connection, name: &ObjectName) -> Result<Option<Description>> {
    let schema = name.owner.as_deref().unwrap_or("main");

    let sql = format!(
        "select type, name from {}.sqlite_master where lower(name) = ?1 and type in ('table', 'view')",
        quote_ident(schema)
    );
    let found: Option<(String, String)> = connection
        .query_row(&sql, params![name.name], |row| Ok((row.get(0)?, row.get(1)?)))
        .optional()
        .map_err(Error::driver_operation_failed)?;

    let Some((kind, table)) = found else {
        return Ok(None);
    };

    let kind = match kind.as_str() {
        "view" => ObjectKind::View,
        _ => ObjectKind::Table,
    };

    let mut stmt = connection
        .prepare(r#"select name, type, "notnull", pk, hidden from pragma_table_xinfo(?1, ?2)"#)
        .map_err(Error::driver_operation_failed)?;

    let columns = stmt
        .query_map(params![table, schema], |row| {
            Ok(XInfo {
                name: row.get(0)?,
                declared_type: row.get(1)?,
                not_null: row.get(2)?,
                pk: row.get(3)?,
                hidden: row.get(4)?,
            })
        })
        .map_err(Error::driver_operation_failed)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver_operation_failed)?;

    let mut pk: Vec<_> = columns.iter().filter(|column| column.pk > 0).collect();
    pk.sort_by_key(|column| column.pk);

    // A lone INTEGER PRIMARY KEY aliases the rowid and is assigned on insert.
    let rowid_alias = match pk.as_slice() {
        [column] if column.declared_type.eq_ignore_ascii_case("INTEGER") => {
            Some(column.name.clone())
        }
        _ => None,
    };

    let primary_key = pk.iter().map(|column| column.name.to_lowercase()).collect();

    let columns = columns
        .iter()
        .map(|column| ColumnInfo {
            name: column.name.to_lowercase(),
            declared_type: column.declared_type.clone(),
            nullable: !column.not_null && column.pk == 0,
            generated: matches!(column.hidden, 2 | 3)
                || rowid_alias.as_deref() == Some(column.name.as_str()),
        })
        .collect();

    tracing::trace!(object = %name, ?kind, "described sqlite object");

    Ok(Some(Description {
        kind,
        columns,
        primary_key,
    }))
}

/// Quotes an identifier that cannot be bound as a parameter.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
