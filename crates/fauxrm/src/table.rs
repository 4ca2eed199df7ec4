mod key;
pub use key::Key;

mod read;

mod view;
pub use view::View;

use crate::{row::Cell, Cursor, Db, Filter, Row};

use fauxrm_core::{
    err,
    schema::{ObjectName, TableSchema},
    stmt::{Expr, Query, Value},
    validate, Error, Result,
};
use fauxrm_sql::stmt::{Delete, Insert, MaxLookup, Select, Update};
use indexmap::IndexMap;
use std::sync::Arc;

/// A table or view handle, as returned by [`Db::model`].
#[derive(Debug, Clone)]
pub enum Model {
    Table(Table),
    View(View),
}

impl Model {
    pub fn schema(&self) -> &TableSchema {
        match self {
            Model::Table(table) => table.schema(),
            Model::View(view) => view.schema(),
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self, Model::View(_))
    }

    pub fn into_table(self) -> Option<Table> {
        match self {
            Model::Table(table) => Some(table),
            Model::View(_) => None,
        }
    }

    /// A read-only handle, for tables and views alike.
    pub fn into_view(self) -> View {
        match self {
            Model::Table(table) => View::new(table.schema),
            Model::View(view) => view,
        }
    }
}

/// A writable table handle.
///
/// Handles are cheap to clone and carry the table's catalog entry; the
/// database connection is passed to each operation.
#[derive(Debug, Clone)]
pub struct Table {
    schema: Arc<TableSchema>,
}

impl Table {
    pub(crate) fn new(schema: Arc<TableSchema>) -> Table {
        Table { schema }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn name(&self) -> &ObjectName {
        &self.schema.name
    }

    /// Every row matching `filter`.
    pub async fn find(&self, db: &mut Db, filter: impl Into<Filter>) -> Result<Vec<Row>> {
        read::find(db, &self.schema, filter.into(), None).await
    }

    /// At most `limit` rows matching `filter`.
    pub async fn find_limit(
        &self,
        db: &mut Db,
        filter: impl Into<Filter>,
        limit: u64,
    ) -> Result<Vec<Row>> {
        read::find(db, &self.schema, filter.into(), Some(limit)).await
    }

    /// The first row matching `filter`.
    pub async fn find_one(&self, db: &mut Db, filter: impl Into<Filter>) -> Result<Option<Row>> {
        read::find_one(db, &self.schema, filter.into()).await
    }

    pub async fn all(&self, db: &mut Db) -> Result<Vec<Row>> {
        read::find(db, &self.schema, Filter::All, None).await
    }

    pub async fn count(&self, db: &mut Db, filter: impl Into<Filter>) -> Result<u64> {
        read::count(db, &self.schema, filter.into()).await
    }

    /// Streams the rows matching `filter` in batches.
    pub fn cursor<'a>(&self, db: &'a mut Db, filter: impl Into<Filter>) -> Result<Cursor<'a>> {
        read::cursor(db, &self.schema, filter.into())
    }

    /// Fetches the row stored under `key`.
    ///
    /// A composite key must name every key column and nothing else.
    pub async fn get(&self, db: &mut Db, key: impl Into<Key>) -> Result<Option<Row>> {
        let fields = key.into().resolve(&self.schema)?;
        let filter = Filter::from(fields);

        if !self.schema.primary_key.is_composite() {
            return read::find_one(db, &self.schema, filter).await;
        }

        let mut rows = read::find(db, &self.schema, filter, None).await?;

        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            matched => Err(Error::ambiguous_key(self.schema.name.to_string(), matched)),
        }
    }

    /// A new, unsaved row. Columns the database generates start as
    /// [`Cell::Generated`], every other unspecified column as
    /// [`Cell::Unset`].
    pub fn new_row<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Result<Row>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut supplied = self.resolve(fields)?;

        let cells = self
            .schema
            .columns
            .values()
            .map(|column| {
                let cell = match supplied.swap_remove(&column.name) {
                    Some(value) => Cell::Value(value),
                    None if column.generated => Cell::Generated,
                    None => Cell::Unset,
                };
                (column.name.clone(), cell)
            })
            .collect();

        Ok(Row::new(self.schema.clone(), cells))
    }

    /// Writes a row and returns it as stored.
    ///
    /// When every key column is supplied and a row exists under that key it
    /// is updated; otherwise a new row is inserted.
    pub async fn save<K, V>(&self, db: &mut Db, fields: impl IntoIterator<Item = (K, V)>) -> Result<Row>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let values = self.resolve(fields)?;
        self.save_values(db, values.into_iter().collect()).await
    }

    /// Deletes the rows matching `filter`. An empty filter is refused; use
    /// [`Table::truncate`] to delete every row.
    pub async fn delete_where(&self, db: &mut Db, filter: impl Into<Filter>) -> Result<u64> {
        let Some(filter) = filter.into().compile(&self.schema, db.in_list_limit())? else {
            return Err(Error::invalid_statement(format!(
                "refusing to delete from `{}` without a filter",
                self.schema.name
            )));
        };

        db.exec_statement(&self.schema, Delete::filtered(filter))
            .await?
            .into_count()
    }

    /// Deletes every row.
    pub async fn truncate(&self, db: &mut Db) -> Result<u64> {
        db.exec_statement(&self.schema, Delete::all())
            .await?
            .into_count()
    }

    pub(crate) async fn save_values(&self, db: &mut Db, values: Vec<(String, Value)>) -> Result<Row> {
        let values = self.resolve(values)?;

        if let Some(key) = self.key_of(&values) {
            if let Some(row) = self.update(db, &key, &values).await? {
                return Ok(row);
            }
        }

        self.insert(db, values).await
    }

    pub(crate) async fn delete_key(&self, db: &mut Db, key: Vec<(String, Value)>) -> Result<u64> {
        let filter = key_filter(&key)?;
        db.exec_statement(&self.schema, Delete::filtered(filter))
            .await?
            .into_count()
    }

    /// Matches fields to columns and checks each value.
    fn resolve<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Result<IndexMap<String, Value>>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut resolved = IndexMap::new();

        for (field, value) in fields {
            let value = value.into();
            let column = validate::assignment(&self.schema, field.as_ref(), &value)?;
            resolved.insert(column.name.clone(), value);
        }

        Ok(resolved)
    }

    /// The key in `values`, if every key column has a non-null value.
    fn key_of(&self, values: &IndexMap<String, Value>) -> Option<Vec<(String, Value)>> {
        let pk = &self.schema.primary_key;

        if !pk.exists() {
            return None;
        }

        pk.columns
            .iter()
            .map(|name| match values.get(name) {
                Some(value) if !value.is_null() => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Updates the row stored under `key`. Returns `None` if there is no
    /// such row.
    async fn update(
        &self,
        db: &mut Db,
        key: &[(String, Value)],
        values: &IndexMap<String, Value>,
    ) -> Result<Option<Row>> {
        let lock = db.capability().select_for_update;

        let mut select = Select::new(Some(key_filter(key)?));
        if lock {
            select = select.for_update();
        }

        if db.fetch_rows(&self.schema, select).await?.is_empty() {
            return Ok(None);
        }

        let assignments: Vec<_> = values
            .iter()
            .filter(|(name, _)| !self.schema.primary_key.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        if !assignments.is_empty() {
            let update = Update {
                assignments,
                filter: key_filter(key)?,
            };

            let count = db.exec_statement(&self.schema, update).await?.into_count()?;

            // Without a row lock the row may vanish between the existence
            // check and the update.
            if count == 0 && !lock {
                return Err(err!(
                    "row {} of `{}` was deleted before it could be updated",
                    fmt_key(key),
                    self.schema.name
                ));
            }
        }

        self.refetch(db, key).await.map(Some)
    }

    async fn insert(&self, db: &mut Db, mut values: IndexMap<String, Value>) -> Result<Row> {
        let schema = &self.schema;

        // Null generated columns are left for the database to fill
        values.retain(|name, value| {
            !value.is_null() || !schema.column(name).is_some_and(|column| column.generated)
        });

        if let Some(missing) = schema
            .required_columns()
            .find(|column| !values.contains_key(&column.name))
        {
            return Err(Error::nullability_violation(&missing.name));
        }

        if db.capability().returning {
            let insert = Insert {
                values: values.into_iter().collect(),
                returning: true,
            };

            return db
                .fetch_rows(schema, insert)
                .await?
                .pop()
                .ok_or_else(|| err!("insert into `{}` returned no row", schema.name));
        }

        let insert = Insert {
            values: values.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            returning: false,
        };
        db.exec_statement(schema, insert).await?.into_count()?;

        for column in schema.generated_columns() {
            if values.contains_key(&column.name) {
                continue;
            }

            tracing::warn!(
                table = %schema.name,
                column = %column.name,
                "resolving generated value with a max() lookup; concurrent inserts may race"
            );

            let lookup = MaxLookup::new(&column.name);
            let value = db
                .fetch_rows(schema, lookup)
                .await?
                .first()
                .and_then(|row| row.get(MaxLookup::ALIAS).cloned())
                .unwrap_or_default();

            values.insert(column.name.clone(), column.ty.coerce(value)?);
        }

        match self.key_of(&values) {
            Some(key) => self.refetch(db, &key).await,
            None => {
                let (columns, values): (Vec<_>, Vec<_>) = values.into_iter().unzip();
                Row::hydrate(schema.clone(), &columns, values)
            }
        }
    }

    async fn refetch(&self, db: &mut Db, key: &[(String, Value)]) -> Result<Row> {
        let select = Select::new(Some(key_filter(key)?)).limit(1);

        db.fetch_rows(&self.schema, select)
            .await?
            .pop()
            .ok_or_else(|| {
                err!(
                    "row {} of `{}` could not be read back after saving",
                    fmt_key(key),
                    self.schema.name
                )
            })
    }
}

fn key_filter(key: &[(String, Value)]) -> Result<Expr> {
    key.iter()
        .fold(Query::new(), |query, (column, value)| {
            query.field(column.clone(), value.clone())
        })
        .build()
}

fn fmt_key(key: &[(String, Value)]) -> String {
    let fields: Vec<_> = key
        .iter()
        .map(|(column, value)| format!("{column}={value:?}"))
        .collect();
    format!("({})", fields.join(", "))
}
