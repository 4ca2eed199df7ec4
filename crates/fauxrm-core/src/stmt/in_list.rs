//! Splitting of oversized `in` value collections.
//!
//! Databases cap the number of items in a single `in (...)` list. Larger
//! collections are broken into capped chunks that are rendered as separate
//! lists and joined back together.

/// Splits `items` into chunks of at most `limit` items, preserving order.
///
/// An empty collection yields no chunks. A `limit` of zero is treated as
/// one.
pub fn split<T>(items: Vec<T>, limit: usize) -> Vec<Vec<T>> {
    let limit = limit.max(1);
    let mut chunks = Vec::with_capacity(items.len().div_ceil(limit));
    let mut items = items.into_iter().peekable();

    while items.peek().is_some() {
        chunks.push(items.by_ref().take(limit).collect());
    }

    chunks
}
