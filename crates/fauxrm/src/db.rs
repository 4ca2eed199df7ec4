mod builder;
pub use builder::Builder;

use crate::{
    table::{Model, Table, View},
    Config, Row,
};

use anyhow::Context;
use fauxrm_core::{
    driver::{
        operation::{QuerySql, Transaction},
        Capability, Connection, Flavor, Response,
    },
    schema::{ObjectName, TableSchema},
    stmt::{RowStream, Value},
    Error, Result,
};
use fauxrm_sql::{Serializer, Statement};
use indexmap::IndexMap;
use std::{collections::HashMap, fmt, fs, path::Path, sync::Arc};

/// A database handle owning a single connection.
///
/// Every operation takes `&mut Db`, so statements on one handle run one
/// after another. Work accumulates in the connection's current transaction
/// until [`Db::commit`] or [`Db::rollback`].
pub struct Db {
    connection: Box<dyn Connection>,

    capability: &'static Capability,

    config: Config,

    /// Catalog entries loaded so far, keyed by qualified name
    catalog: HashMap<ObjectName, Arc<TableSchema>>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Connects with the default configuration.
    pub async fn connect(url: &str) -> Result<Db> {
        Db::builder().connect(url).await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn capability(&self) -> &'static Capability {
        self.capability
    }

    /// Most values rendered in a single `in (...)` list.
    pub fn in_list_limit(&self) -> usize {
        self.config.in_list_limit.min(self.capability.max_in_list)
    }

    /// Loads the handle for a table or view, whichever `name` turns out to
    /// be.
    pub async fn model(&mut self, name: &str) -> Result<Model> {
        let schema = self.schema(name).await?;

        Ok(if schema.is_view() {
            Model::View(View::new(schema))
        } else {
            Model::Table(Table::new(schema))
        })
    }

    /// Loads a writable table handle. Fails if `name` is a view.
    pub async fn table(&mut self, name: &str) -> Result<Table> {
        let schema = self.schema(name).await?;

        if schema.is_view() {
            return Err(Error::invalid_statement(format!(
                "`{}` is a view and cannot be written to",
                schema.name
            )));
        }

        Ok(Table::new(schema))
    }

    /// Loads a read-only handle over a table or view.
    pub async fn view(&mut self, name: &str) -> Result<View> {
        Ok(View::new(self.schema(name).await?))
    }

    pub async fn commit(&mut self) -> Result<()> {
        tracing::debug!("committing transaction");
        self.connection
            .exec(Transaction::Commit.into())
            .await?
            .into_count()?;
        Ok(())
    }

    pub async fn rollback(&mut self) -> Result<()> {
        tracing::debug!("rolling back transaction");
        self.connection
            .exec(Transaction::Rollback.into())
            .await?
            .into_count()?;
        Ok(())
    }

    /// Runs raw SQL and returns its rows. The rows are not bound to a table
    /// and cannot be saved.
    pub async fn execute_query<K, V>(
        &mut self,
        sql: &str,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Vec<Row>>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let op = QuerySql {
            sql: sql.to_string(),
            params: collect_params(params),
            returns_rows: true,
        };

        let (columns, rows) = self.fetch(op).await?;
        Ok(rows
            .into_iter()
            .map(|values| Row::detached(&columns, values))
            .collect())
    }

    /// Runs raw SQL and returns the number of affected rows.
    pub async fn execute<K, V>(
        &mut self,
        sql: &str,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Result<u64>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let op = QuerySql {
            sql: sql.to_string(),
            params: collect_params(params),
            returns_rows: false,
        };

        self.exec_sql(op).await?.into_count()
    }

    /// Calls a SQL function and returns its value. `name` may be qualified
    /// as `owner.function`; arguments are bound as `:a_0`, `:a_1`, ...
    pub async fn execute_function<V>(
        &mut self,
        name: &str,
        args: impl IntoIterator<Item = V>,
    ) -> Result<Value>
    where
        V: Into<Value>,
    {
        if !name.split('.').all(is_identifier) {
            return Err(Error::invalid_statement(format!(
                "invalid function name `{name}`"
            )));
        }

        let params: IndexMap<String, Value> = args
            .into_iter()
            .enumerate()
            .map(|(index, value)| (format!("a_{index}"), value.into()))
            .collect();

        let binds: Vec<_> = params.keys().map(|param| format!(":{param}")).collect();
        let mut sql = format!("select {name}({}) as result", binds.join(", "));
        if self.capability.flavor == Flavor::Oracle {
            sql.push_str(" from dual");
        }

        let op = QuerySql {
            sql,
            params,
            returns_rows: true,
        };

        let (_, rows) = self.fetch(op).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .unwrap_or_default())
    }

    /// Runs the SQL statement stored in the file at `path` and returns the
    /// rows it produces, if any. A trailing `;` is ignored.
    pub async fn execute_file(&mut self, path: &Path) -> Result<Vec<Row>> {
        tracing::debug!(path = %path.display(), "executing sql file");

        let sql = fs::read_to_string(path)
            .with_context(|| format!("failed to read sql file: {}", path.display()))?;
        let sql = sql.trim().trim_end_matches(';').trim_end();

        self.execute_query(sql, std::iter::empty::<(String, Value)>())
            .await
    }

    pub(crate) async fn schema(&mut self, name: &str) -> Result<Arc<TableSchema>> {
        let mut object = ObjectName::parse(name);
        if object.owner.is_none() {
            object.owner = self.config.default_owner.clone();
        }

        if let Some(schema) = self.catalog.get(&object) {
            return Ok(schema.clone());
        }

        let description = self
            .connection
            .describe(&object)
            .await?
            .ok_or_else(|| {
                Error::invalid_schema(format!("table or view `{object}` does not exist"))
            })?;

        tracing::trace!(
            object = %object,
            kind = ?description.kind,
            columns = description.columns.len(),
            "loaded catalog entry"
        );

        let schema = Arc::new(TableSchema::from_description(object.clone(), description)?);
        self.catalog.insert(object, schema.clone());
        Ok(schema)
    }

    /// Serializes `stmt` for `schema` in this connection's dialect.
    pub(crate) fn prepare(&self, schema: &TableSchema, stmt: &Statement) -> QuerySql {
        let mut params = IndexMap::new();
        let sql = Serializer::new(schema, self.capability.flavor).serialize(stmt, &mut params);

        QuerySql {
            sql,
            params,
            returns_rows: stmt.returns_rows(),
        }
    }

    pub(crate) async fn exec_statement(
        &mut self,
        schema: &TableSchema,
        stmt: impl Into<Statement>,
    ) -> Result<Response> {
        let op = self.prepare(schema, &stmt.into());
        self.exec_sql(op).await
    }

    /// Runs a row-returning statement and hydrates every row against
    /// `schema`.
    pub(crate) async fn fetch_rows(
        &mut self,
        schema: &Arc<TableSchema>,
        stmt: impl Into<Statement>,
    ) -> Result<Vec<Row>> {
        let op = self.prepare(schema, &stmt.into());
        let (columns, rows) = self.fetch(op).await?;

        rows.into_iter()
            .map(|values| Row::hydrate(schema.clone(), &columns, values))
            .collect()
    }

    /// Runs a row-returning statement, buffering the full result.
    pub(crate) async fn fetch(&mut self, op: QuerySql) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
        let sql = op.sql.clone();
        let stream = self.exec_sql(op).await?.into_rows()?;
        let columns = stream.columns().to_vec();

        match stream.collect().await {
            Ok(rows) => Ok((columns, rows)),
            Err(err) => Err(self.abort(&sql, err).await),
        }
    }

    /// Sends one statement to the connection. On failure the current
    /// transaction is rolled back before the error is returned.
    pub(crate) async fn exec_sql(&mut self, op: QuerySql) -> Result<Response> {
        tracing::debug!(sql = %op.sql, params = ?op.params, "executing statement");

        let sql = op.sql.clone();
        match self.connection.exec(op.into()).await {
            Ok(response) => Ok(response),
            Err(err) => Err(self.abort(&sql, err).await),
        }
    }

    pub(crate) async fn exec_rows(&mut self, op: QuerySql) -> Result<RowStream> {
        self.exec_sql(op).await?.into_rows()
    }

    async fn abort(&mut self, sql: &str, err: Error) -> Error {
        tracing::warn!(sql = %sql, error = %err, "statement failed; rolling back");

        if let Err(rollback) = self.connection.exec(Transaction::Rollback.into()).await {
            tracing::warn!(error = %rollback, "rollback failed");
        }

        if err.any(Error::is_integrity_violation) {
            err
        } else {
            err.context(Error::backend(sql))
        }
    }
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("connection", &self.connection)
            .field("capability", &self.capability)
            .field("config", &self.config)
            .finish()
    }
}

fn collect_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> IndexMap<String, Value>
where
    K: Into<String>,
    V: Into<Value>,
{
    params
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#'))
}
