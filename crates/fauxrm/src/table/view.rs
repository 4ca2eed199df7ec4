use super::read;
use crate::{Cursor, Db, Filter, Row};

use fauxrm_core::{
    schema::{ObjectName, TableSchema},
    Result,
};
use std::sync::Arc;

/// A read-only handle over a view, or over a table opened for reading.
#[derive(Debug, Clone)]
pub struct View {
    schema: Arc<TableSchema>,
}

impl View {
    pub(crate) fn new(schema: Arc<TableSchema>) -> View {
        View { schema }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn name(&self) -> &ObjectName {
        &self.schema.name
    }

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

    pub async fn find_one(&self, db: &mut Db, filter: impl Into<Filter>) -> Result<Option<Row>> {
        read::find_one(db, &self.schema, filter.into()).await
    }

    pub async fn all(&self, db: &mut Db) -> Result<Vec<Row>> {
        read::find(db, &self.schema, Filter::All, None).await
    }

    pub async fn count(&self, db: &mut Db, filter: impl Into<Filter>) -> Result<u64> {
        read::count(db, &self.schema, filter.into()).await
    }

    pub fn cursor<'a>(&self, db: &'a mut Db, filter: impl Into<Filter>) -> Result<Cursor<'a>> {
        read::cursor(db, &self.schema, filter.into())
    }
}
