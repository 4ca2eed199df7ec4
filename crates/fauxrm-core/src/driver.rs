mod capability;
pub use capability::{Capability, Flavor};

mod description;
pub use description::{ColumnInfo, Description};

pub mod operation;
pub use operation::Operation;

mod response;
pub use response::Response;

use crate::{async_trait, schema::ObjectName};

use std::fmt::Debug;

/// A factory for connections to one database.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// The URL this driver connects to.
    fn url(&self) -> String;

    /// Describes the driver's capability, which informs statement
    /// rendering.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

/// The raw query-execution channel.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;

    /// Describe a table or view. Returns `None` if the object does not
    /// exist.
    async fn describe(&mut self, name: &ObjectName) -> crate::Result<Option<Description>>;
}
