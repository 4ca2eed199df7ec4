use fauxrm_core::{
    async_trait,
    driver::{Capability, Connection, Description, Driver, Operation, Response},
    schema::ObjectName,
    stmt::RowStream,
    Result,
};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Overrides the inner driver's capability when set
    capability: Option<&'static Capability>,

    /// Log of all operations executed through this driver
    /// Using Arc<Mutex> for thread-safe access from tests
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl LoggingDriver {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            inner: driver,
            capability: None,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reports `capability` instead of the inner driver's, e.g. to exercise
    /// the generated-value lookup on a backend that supports `returning`.
    pub fn with_capability(mut self, capability: &'static Capability) -> Self {
        self.capability = Some(capability);
        self
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn url(&self) -> String {
        self.inner.url()
    }

    fn capability(&self) -> &'static Capability {
        self.capability.unwrap_or_else(|| self.inner.capability())
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect().await?,
            ops_log: self.ops_log_handle(),
        }))
    }
}

#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,
    pub response: Result<Response>,
}

/// A connection wrapper that logs all operations for testing purposes
#[derive(Debug)]
pub struct LoggingConnection {
    /// The underlying connection that actually executes operations
    inner: Box<dyn Connection>,

    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

#[async_trait]
impl Connection for LoggingConnection {
    async fn exec(&mut self, operation: Operation) -> Result<Response> {
        let operation_clone = operation.clone();

        let (response, logged) = match self.inner.exec(operation).await {
            Ok(mut response) => {
                let duplicated = duplicate_response(&mut response).await?;
                (Ok(response), Ok(duplicated))
            }
            Err(err) => (Err(err.clone()), Err(err)),
        };

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                operation: operation_clone,
                response: logged,
            });

        response
    }

    async fn describe(&mut self, name: &ObjectName) -> Result<Option<Description>> {
        self.inner.describe(name).await
    }
}

/// Buffers a row stream so both the caller and the log get a copy.
async fn duplicate_response(response: &mut Response) -> Result<Response> {
    Ok(match response {
        Response::Count(count) => Response::Count(*count),
        Response::Rows(stream) => {
            let columns = stream.columns().to_vec();
            let rows = std::mem::take(stream).collect().await?;

            *stream = RowStream::from_vec(columns.clone(), rows.clone());
            Response::Rows(RowStream::from_vec(columns, rows))
        }
    })
}
