mod describe;

mod value;
pub(crate) use value::Value;

use fauxrm_core::{
    async_trait, err,
    driver::{
        operation::{Operation, QuerySql, Transaction},
        Capability, Description, Driver, Response,
    },
    schema::ObjectName,
    stmt::{self, RowStream},
    Error, Result,
};
use rusqlite::{
    functions::FunctionFlags, types::ToSql, Connection as RusqliteConnection, ErrorCode,
};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;
use url::Url;

/// Rows a statement may read ahead of its consumer.
const ROW_BUFFER: usize = 64;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_statement(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> String {
        match self {
            Sqlite::InMemory => "sqlite::memory:".to_string(),
            Sqlite::File(path) => format!("sqlite:{}", path.display()),
        }
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn fauxrm_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }
}

/// A SQLite connection.
///
/// Statements run inside an implicit transaction that is opened on first use
/// and ends at the next commit or rollback, so uncommitted work can be
/// discarded the way a server database would.
///
/// Row-returning statements are stepped on a blocking task that feeds a
/// bounded channel, so a result set is never held in memory all at once.
/// The connection stays locked until the stream is drained or dropped.
#[derive(Debug)]
pub struct Connection {
    connection: Arc<Mutex<RusqliteConnection>>,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Self::init(connection)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Self::init(connection)
    }

    fn init(connection: RusqliteConnection) -> Result<Self> {
        // `trunc(datetime)` truncates to midnight, matching the text format
        // datetimes are bound in.
        connection
            .create_scalar_function(
                "trunc",
                1,
                FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
                |ctx| {
                    let value: Option<String> = ctx.get(0)?;
                    Ok(value.map(|text| {
                        let date = text.get(..10).unwrap_or(&text);
                        format!("{date} 00:00:00")
                    }))
                },
            )
            .map_err(Error::driver_operation_failed)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Runs raw SQL outside of the implicit transaction, e.g. DDL.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.lock()?
            .execute_batch(sql)
            .map_err(Error::driver_operation_failed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, RusqliteConnection>> {
        lock(&self.connection)
    }

    fn begin_if_needed(&self) -> Result<()> {
        let connection = self.lock()?;

        if connection.is_autocommit() {
            tracing::trace!("sqlite: BEGIN");
            connection
                .execute_batch("BEGIN")
                .map_err(Error::driver_operation_failed)?;
        }
        Ok(())
    }

    fn end_transaction(&self, op: Transaction) -> Result<Response> {
        let connection = self.lock()?;

        if !connection.is_autocommit() {
            let sql = match op {
                Transaction::Commit => "COMMIT",
                Transaction::Rollback => "ROLLBACK",
            };
            tracing::trace!("sqlite: {sql}");
            connection
                .execute_batch(sql)
                .map_err(Error::driver_operation_failed)?;
        }
        Ok(Response::count(0))
    }

    async fn query_sql(&self, op: QuerySql) -> Result<Response> {
        self.begin_if_needed()?;

        if op.returns_rows {
            return self.query_rows(op).await;
        }

        let connection = self.lock()?;
        let mut stmt = connection.prepare_cached(&op.sql).map_err(sql_error)?;
        let params = Params::new(op.params);

        let count = stmt.execute(params.named().as_slice()).map_err(sql_error)?;
        Ok(Response::count(count as u64))
    }

    /// Starts stepping `op` on a blocking task. Resolves once the first row
    /// has been read, so errors raised by the statement itself (such as a
    /// constraint failure in `insert ... returning`) surface here.
    async fn query_rows(&self, op: QuerySql) -> Result<Response> {
        let connection = self.connection.clone();
        let (ready_tx, ready_rx) = oneshot::channel();
        let (rows_tx, rows_rx) = mpsc::channel(ROW_BUFFER);

        tokio::task::spawn_blocking(move || produce_rows(&connection, op, ready_tx, rows_tx));

        let columns = ready_rx
            .await
            .map_err(|_| err!("sqlite worker exited before the statement started"))??;

        Ok(Response::rows(RowStream::from_stream(
            columns,
            ReceiverStream::new(rows_rx),
        )))
    }
}

/// Named bind values, kept alive while a statement borrows them.
struct Params {
    names: Vec<String>,
    values: Vec<Value>,
}

impl Params {
    fn new(params: impl IntoIterator<Item = (String, stmt::Value)>) -> Params {
        let (names, values) = params
            .into_iter()
            .map(|(name, value)| (format!(":{name}"), Value::from(value)))
            .unzip();
        Params { names, values }
    }

    fn named(&self) -> Vec<(&str, &dyn ToSql)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(|value| value as &dyn ToSql))
            .collect()
    }
}

fn lock(connection: &Mutex<RusqliteConnection>) -> Result<MutexGuard<'_, RusqliteConnection>> {
    connection
        .lock()
        .map_err(|_| err!("sqlite connection lock poisoned"))
}

type Ready = oneshot::Sender<Result<Vec<String>>>;
type Rows = mpsc::Sender<Result<Vec<stmt::Value>>>;

/// Steps a row-returning statement, handing rows to `rows` as the consumer
/// asks for them. Stops early once the consumer hangs up.
fn produce_rows(connection: &Mutex<RusqliteConnection>, op: QuerySql, ready: Ready, rows: Rows) {
    let connection = match lock(connection) {
        Ok(connection) => connection,
        Err(err) => {
            let _ = ready.send(Err(err));
            return;
        }
    };

    let mut stmt = match connection.prepare_cached(&op.sql) {
        Ok(stmt) => stmt,
        Err(err) => {
            let _ = ready.send(Err(sql_error(err)));
            return;
        }
    };

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_lowercase)
        .collect();
    let width = columns.len();

    let params = Params::new(op.params);
    let mut cursor = match stmt.query(params.named().as_slice()) {
        Ok(cursor) => cursor,
        Err(err) => {
            let _ = ready.send(Err(sql_error(err)));
            return;
        }
    };

    let read = |row: &rusqlite::Row<'_>| -> Result<Vec<stmt::Value>> {
        (0..width)
            .map(|index| {
                Value::from_sql(row, index)
                    .map(Value::into_inner)
                    .map_err(sql_error)
            })
            .collect()
    };

    let first = match cursor.next() {
        Ok(row) => row.map(read),
        Err(err) => {
            let _ = ready.send(Err(sql_error(err)));
            return;
        }
    };

    if ready.send(Ok(columns)).is_err() {
        return;
    }

    let Some(first) = first else {
        return;
    };

    let failed = first.is_err();
    if rows.blocking_send(first).is_err() || failed {
        return;
    }

    loop {
        let next = match cursor.next() {
            Ok(Some(row)) => read(row),
            Ok(None) => return,
            Err(err) => Err(sql_error(err)),
        };

        let failed = next.is_err();
        if rows.blocking_send(next).is_err() || failed {
            tracing::trace!(failed, "sqlite: row stream closed early");
            return;
        }
    }
}

#[async_trait]
impl fauxrm_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::QuerySql(op) => self.query_sql(op).await,
            Operation::Transaction(op) => self.end_transaction(op),
        }
    }

    async fn describe(&mut self, name: &ObjectName) -> Result<Option<Description>> {
        describe::describe(&*self.lock()?, name)
    }
}

/// Constraint failures surface as integrity violations; everything else is a
/// plain driver failure.
fn sql_error(err: rusqlite::Error) -> Error {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => Error::integrity_violation(err),
        _ => Error::driver_operation_failed(err),
    }
}
