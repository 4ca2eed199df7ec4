use crate::{Db, Result, Row};

use fauxrm_core::{driver::operation::QuerySql, schema::TableSchema, stmt::RowStream};
use std::sync::Arc;

/// Rows of a query, handed out in batches of
/// [`Config::fetch_batch_size`](crate::Config::fetch_batch_size).
///
/// The statement runs on the first read. [`Cursor::restart`] runs it again.
pub struct Cursor<'a> {
    db: &'a mut Db,
    schema: Arc<TableSchema>,

    /// The compiled statement, kept so the cursor can restart
    op: QuerySql,

    rows: Option<RowStream>,
    batch_size: usize,
}

pub trait FromCursor<A>: Extend<A> + Default {}

impl<A, T: Extend<A> + Default> FromCursor<A> for T {}

impl<'a> Cursor<'a> {
    pub(crate) fn new(db: &'a mut Db, schema: Arc<TableSchema>, op: QuerySql) -> Self {
        let batch_size = db.config().fetch_batch_size.max(1);

        Self {
            db,
            schema,
            op,
            rows: None,
            batch_size,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The SQL the cursor runs.
    pub fn sql(&self) -> &str {
        &self.op.sql
    }

    pub async fn next(&mut self) -> Option<Result<Row>> {
        let next = match self.rows().await {
            Ok(rows) => {
                let columns = rows.columns().to_vec();
                rows.next().await?.map(|values| (columns, values))
            }
            Err(err) => return Some(Err(err)),
        };

        Some(next.and_then(|(columns, values)| Row::hydrate(self.schema.clone(), &columns, values)))
    }

    /// Up to `batch_size` rows. Empty once the cursor is exhausted.
    pub async fn next_batch(&mut self) -> Result<Vec<Row>> {
        let mut batch = Vec::with_capacity(self.batch_size);

        while batch.len() < self.batch_size {
            match self.next().await {
                Some(row) => batch.push(row?),
                None => break,
            }
        }

        tracing::trace!(rows = batch.len(), "fetched batch");
        Ok(batch)
    }

    /// Discards any unread rows. The next read runs the statement again.
    pub fn restart(&mut self) {
        self.rows = None;
    }

    /// Collect all remaining rows
    pub async fn collect<B>(mut self) -> Result<B>
    where
        B: FromCursor<Row>,
    {
        let mut ret = B::default();

        while let Some(res) = self.next().await {
            ret.extend(Some(res?));
        }

        Ok(ret)
    }

    async fn rows(&mut self) -> Result<&mut RowStream> {
        if self.rows.is_none() {
            let stream = self.db.exec_rows(self.op.clone()).await?;
            self.rows = Some(stream);
        }

        match self.rows.as_mut() {
            Some(rows) => Ok(rows),
            None => Err(fauxrm_core::err!("cursor has no open statement")),
        }
    }
}
