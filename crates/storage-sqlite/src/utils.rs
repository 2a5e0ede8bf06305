//! Helpers for SQLite parameter limits.

use std::collections::HashSet;

/// Ids per `IN (...)` clause.
///
/// SQLite caps bound parameters per statement (999 on older builds); 500
/// leaves room for the listing's other filters.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits a slice into `IN (...)`-sized chunks.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Sorted copy of an id set, so chunked queries are deterministic.
pub fn sorted_ids(ids: &HashSet<i32>) -> Vec<i32> {
    let mut sorted: Vec<i32> = ids.iter().copied().collect();
    sorted.sort_unstable();
    sorted
}
