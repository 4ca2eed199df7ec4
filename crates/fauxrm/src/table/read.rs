use crate::{Cursor, Db, Filter, Row};

use fauxrm_core::{
    schema::{ColumnType, TableSchema},
    stmt::Value,
    Result,
};
use fauxrm_sql::stmt::{Count, Select};
use std::sync::Arc;

pub(super) async fn find(
    db: &mut Db,
    schema: &Arc<TableSchema>,
    filter: Filter,
    limit: Option<u64>,
) -> Result<Vec<Row>> {
    let mut select = Select::new(filter.compile(schema, db.in_list_limit())?);

    if let Some(limit) = limit {
        select = select.limit(limit);
    }

    db.fetch_rows(schema, select).await
}

pub(super) async fn find_one(
    db: &mut Db,
    schema: &Arc<TableSchema>,
    filter: Filter,
) -> Result<Option<Row>> {
    Ok(find(db, schema, filter, Some(1)).await?.pop())
}

pub(super) async fn count(db: &mut Db, schema: &TableSchema, filter: Filter) -> Result<u64> {
    let count = Count::new(filter.compile(schema, db.in_list_limit())?);
    let op = db.prepare(schema, &count.into());
    let (_, rows) = db.fetch(op).await?;

    let value = rows
        .into_iter()
        .next()
        .and_then(|row| row.into_iter().next())
        .unwrap_or(Value::I64(0));

    match ColumnType::Integer.coerce(value)? {
        Value::I64(count) if count >= 0 => Ok(count as u64),
        value => Err(fauxrm_core::err!("unexpected row count {value:?}")),
    }
}

pub(super) fn cursor<'a>(
    db: &'a mut Db,
    schema: &Arc<TableSchema>,
    filter: Filter,
) -> Result<Cursor<'a>> {
    let select = Select::new(filter.compile(schema, db.in_list_limit())?);
    let op = db.prepare(schema, &select.into());
    Ok(Cursor::new(db, schema.clone(), op))
}
