use crate::{table::Table, Db};

use fauxrm_core::{schema::TableSchema, stmt::Value, validate, Error, Result};
use indexmap::IndexMap;
use std::sync::Arc;

/// One field of a [`Row`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Value(Value),

    /// Left unspecified by the caller. Omitted from inserts.
    Unset,

    /// Assigned by the database on insert.
    Generated,
}

impl Cell {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Cell::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Cell::Value(_))
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Cell::Value(value)
    }
}

/// An ordered field → cell map, optionally bound to a table.
///
/// Rows read from a table keep a snapshot of what was read so that a changed
/// primary key can be detected on [`Row::save`].
#[derive(Debug, Clone)]
pub struct Row {
    cells: IndexMap<String, Cell>,

    /// Values as last read from the database. `None` for rows never stored.
    snapshot: Option<IndexMap<String, Value>>,

    schema: Option<Arc<TableSchema>>,
}

impl Row {
    /// A row that has not been stored yet.
    pub(crate) fn new(schema: Arc<TableSchema>, cells: IndexMap<String, Cell>) -> Row {
        Row {
            cells,
            snapshot: None,
            schema: Some(schema),
        }
    }

    /// Builds a row from a result set, converting each value to its
    /// column's type.
    pub(crate) fn hydrate(
        schema: Arc<TableSchema>,
        columns: &[String],
        values: Vec<Value>,
    ) -> Result<Row> {
        let mut snapshot = IndexMap::with_capacity(columns.len());

        for (name, value) in columns.iter().zip(values) {
            let value = match schema.column(name) {
                Some(column) => column.ty.coerce(value)?,
                None => value,
            };
            snapshot.insert(name.clone(), value);
        }

        let cells = snapshot
            .iter()
            .map(|(name, value)| (name.clone(), Cell::Value(value.clone())))
            .collect();

        Ok(Row {
            cells,
            snapshot: Some(snapshot),
            schema: Some(schema),
        })
    }

    /// A row from an ad-hoc query, not bound to any table.
    pub(crate) fn detached(columns: &[String], values: Vec<Value>) -> Row {
        Row {
            cells: columns
                .iter()
                .cloned()
                .zip(values.into_iter().map(Cell::Value))
                .collect(),
            snapshot: None,
            schema: None,
        }
    }

    /// The table or view this row belongs to.
    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_deref()
    }

    /// True until the row has been stored or was read from the database.
    pub fn is_new(&self) -> bool {
        self.snapshot.is_none()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.keys().map(String::as_str)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &Cell)> + '_ {
        self.cells.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    pub fn cell(&self, field: &str) -> Option<&Cell> {
        self.cells
            .get(field)
            .or_else(|| self.cells.get(&field.to_lowercase()))
    }

    /// The field's value. `None` if the field is absent or holds a
    /// placeholder.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.cell(field).and_then(Cell::as_value)
    }

    /// The field's value converted to `T`.
    pub fn get_as<T>(&self, field: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = Error>,
    {
        self.require(field)?.clone().try_into()
    }

    /// Like [`Row::get_as`], mapping null to `None`.
    pub fn get_opt<T>(&self, field: &str) -> Result<Option<T>>
    where
        T: TryFrom<Value, Error = Error>,
    {
        match self.require(field)? {
            Value::Null => Ok(None),
            value => value.clone().try_into().map(Some),
        }
    }

    fn require(&self, field: &str) -> Result<&Value> {
        match self.cell(field) {
            Some(Cell::Value(value)) => Ok(value),
            Some(_) => Err(Error::invalid_statement(format!(
                "field `{field}` has no value until the row is saved"
            ))),
            None => Err(Error::unknown_field(self.table_name(), field)),
        }
    }

    /// Assigns a field.
    ///
    /// On a row bound to a table the value is checked against the column
    /// first.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();

        let name = match &self.schema {
            Some(schema) => validate::assignment(schema, field, &value)?.name.clone(),
            None => field.to_string(),
        };

        self.cells.insert(name, Cell::Value(value));
        Ok(())
    }

    /// The row's primary key values, if every key column holds a non-null
    /// value.
    pub fn key(&self) -> Option<Vec<(String, Value)>> {
        key_of(self.schema.as_deref()?, |name| self.get(name))
    }

    /// The key the row was last read or stored under.
    fn stored_key(&self) -> Option<Vec<(String, Value)>> {
        let snapshot = self.snapshot.as_ref()?;
        key_of(self.schema.as_deref()?, |name| snapshot.get(name))
    }

    /// Writes the row, inserting or updating as needed, then refreshes it
    /// from the database.
    ///
    /// When the primary key was changed since the row was read, the row
    /// stored under the old key is deleted once the new one is written.
    /// Stored rows of tables without a primary key cannot be saved, since
    /// there is no way to tell which row to update.
    pub async fn save(&mut self, db: &mut Db) -> Result<()> {
        let table = self.table()?;

        if !self.is_new() && !table.schema().primary_key.exists() {
            return Err(Error::invalid_statement(format!(
                "cannot update a row of `{}`, which has no primary key",
                table.schema().name
            )));
        }

        let replaced = match (self.stored_key(), self.key()) {
            (Some(stored), Some(current)) if stored != current => Some(stored),
            _ => None,
        };

        let values = self
            .cells
            .iter()
            .filter_map(|(name, cell)| Some((name.clone(), cell.as_value()?.clone())))
            .collect();

        let saved = table.save_values(db, values).await?;

        if let Some(stored) = replaced {
            tracing::debug!(
                table = %table.schema().name,
                "primary key changed; deleting row stored under the old key"
            );
            table.delete_key(db, stored).await?;
        }

        *self = saved;
        Ok(())
    }

    /// Saves the row, then commits the transaction.
    pub async fn save_and_commit(&mut self, db: &mut Db) -> Result<()> {
        self.save(db).await?;
        db.commit().await
    }

    /// Deletes the row by its primary key. The row keeps its values and can
    /// be saved again as a new row.
    pub async fn delete(&mut self, db: &mut Db) -> Result<()> {
        let table = self.table()?;

        let Some(key) = self.stored_key().or_else(|| self.key()) else {
            return Err(Error::incomplete_key(format!(
                "cannot delete a row of `{}` without its primary key {}",
                table.schema().name,
                table.schema().primary_key
            )));
        };

        table.delete_key(db, key).await?;
        self.snapshot = None;
        Ok(())
    }

    fn table(&self) -> Result<Table> {
        match &self.schema {
            Some(schema) if !schema.is_view() => Ok(Table::new(schema.clone())),
            Some(schema) => Err(Error::invalid_statement(format!(
                "rows of view `{}` are read-only",
                schema.name
            ))),
            None => Err(Error::invalid_statement(
                "row is not bound to a table and cannot be written",
            )),
        }
    }

    fn table_name(&self) -> String {
        self.schema
            .as_ref()
            .map(|schema| schema.name.to_string())
            .unwrap_or_else(|| "query result".to_string())
    }
}

/// Rows are the same row when they come from the same table and carry the
/// same primary key. Rows without a key compare field by field.
impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        let same_table = match (&self.schema, &other.schema) {
            (Some(lhs), Some(rhs)) => lhs.name == rhs.name,
            (None, None) => true,
            _ => false,
        };

        if !same_table {
            return false;
        }

        match (self.key(), other.key()) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => self.cells == other.cells,
        }
    }
}

fn key_of<'a>(
    schema: &TableSchema,
    lookup: impl Fn(&str) -> Option<&'a Value>,
) -> Option<Vec<(String, Value)>> {
    if !schema.primary_key.exists() {
        return None;
    }

    schema
        .primary_key
        .columns
        .iter()
        .map(|name| match lookup(name) {
            Some(value) if !value.is_null() => Some((name.clone(), value.clone())),
            _ => None,
        })
        .collect()
}
