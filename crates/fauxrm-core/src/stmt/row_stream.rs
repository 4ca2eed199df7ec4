use super::Value;

use std::{
    collections::VecDeque,
    fmt,
    pin::Pin,
    task::{Context, Poll},
};
use tokio_stream::{Stream, StreamExt};

/// The rows produced by a statement, with the names of the columns they
/// carry.
#[derive(Default)]
pub struct RowStream {
    columns: Vec<String>,
    buffer: VecDeque<Vec<Value>>,
    stream: Option<DynStream>,
}

type DynStream = Pin<Box<dyn Stream<Item = crate::Result<Vec<Value>>> + Send + 'static>>;

impl RowStream {
    pub fn from_stream<T>(columns: Vec<String>, stream: T) -> Self
    where
        T: Stream<Item = crate::Result<Vec<Value>>> + Send + 'static,
    {
        Self {
            columns,
            buffer: VecDeque::new(),
            stream: Some(Box::pin(stream)),
        }
    }

    pub fn from_vec(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            buffer: rows.into(),
            stream: None,
        }
    }

    /// Names of the columns, in the order each row's values appear.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the next row in the stream
    pub async fn next(&mut self) -> Option<crate::Result<Vec<Value>>> {
        StreamExt::next(self).await
    }

    /// The stream will contain at least this number of rows
    pub fn min_len(&self) -> usize {
        let (ret, _) = self.size_hint();
        ret
    }

    pub async fn collect(mut self) -> crate::Result<Vec<Vec<Value>>> {
        let mut ret = Vec::with_capacity(self.min_len());

        while let Some(res) = self.next().await {
            ret.push(res?);
        }

        Ok(ret)
    }
}

impl Stream for RowStream {
    type Item = crate::Result<Vec<Value>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(next) = self.buffer.pop_front() {
            Poll::Ready(Some(Ok(next)))
        } else if let Some(stream) = self.stream.as_mut() {
            Pin::new(stream).poll_next(cx)
        } else {
            Poll::Ready(None)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (mut low, mut high) = match &self.stream {
            Some(stream) => stream.size_hint(),
            None => (0, Some(0)),
        };

        let buffered = self.buffer.len();

        low += buffered;

        if let Some(high) = high.as_mut() {
            *high += buffered;
        }

        (low, high)
    }
}

impl fmt::Debug for RowStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowStream")
            .field("columns", &self.columns)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}
