//! Row source traits and the provided source implementations.
//!
//! A row source is the engine-side supplier of result rows. The base
//! capability, [`RowSource`], is strictly forward and single-pass: the
//! primitive a pull-based executor naturally exposes. The extended
//! capability, [`RewindableSource`], additionally knows its total row
//! count and can be read backward; a cursor built over it may buffer rows
//! to offer full bidirectional navigation.
//!
//! Two implementations are provided:
//!
//! - [`MemoryRowSource`] - fully materialized rows, rewindable; also the
//!   target of [`MemoryRowSource::materialize`], which promotes any
//!   one-pass source by draining it to completion
//! - [`IterSource`] - adapts a fallible row iterator, the seam a query
//!   engine's operator tree plugs into

use rowset_core::Row;
use tracing::debug;

use crate::error::{SourceError, SourceResult};

/// A forward-only, single-pass supplier of result rows.
///
/// Every `next_row()` call irreversibly consumes one row; there is no way
/// back. `has_next()` answers without consuming; implementations that
/// cannot look ahead for free keep a one-row peek buffer.
///
/// A source is driven by exactly one cursor. The `Send` bound lets a
/// cursor (and the source inside it) move between threads; nothing here
/// is `Sync`.
pub trait RowSource: Send {
    /// Returns true if another row can be pulled.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the underlying producer fails while
    /// looking ahead.
    fn has_next(&mut self) -> SourceResult<bool>;

    /// Pulls the next row, or `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the underlying producer fails or the
    /// query is cancelled.
    fn next_row(&mut self) -> SourceResult<Option<Row>>;
}

/// A row source that also knows its total row count and can be read
/// backward.
///
/// The scroll cursor buffers rows itself and never calls
/// [`previous_row`](Self::previous_row) while navigating; the backward
/// methods make a rewindable source usable directly as well.
pub trait RewindableSource: RowSource {
    /// Returns true if a row precedes the read position.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the underlying producer fails.
    fn has_previous(&mut self) -> SourceResult<bool>;

    /// Steps the read position back and returns the row last handed out,
    /// or `None` at the start.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the underlying producer fails.
    fn previous_row(&mut self) -> SourceResult<Option<Row>>;

    /// The total number of rows this source yields.
    fn row_count(&self) -> u64;
}

/// A fully-materialized, rewindable row source backed by a `Vec<Row>`.
///
/// The read position behaves like a list iterator: `next_row` hands out
/// the row at the position and advances, `previous_row` retreats and
/// hands the same row back.
#[derive(Debug, Clone)]
pub struct MemoryRowSource {
    rows: Vec<Row>,
    /// Index of the next row to hand out going forward.
    read_pos: usize,
}

impl MemoryRowSource {
    /// Creates a source over the given rows.
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows, read_pos: 0 }
    }

    /// Drains a one-pass source to completion, promoting it to a
    /// rewindable one.
    ///
    /// This is the only way to obtain scrollable navigation over a source
    /// that cannot be re-read; the whole result is held in memory
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first [`SourceError`] the drained source reports.
    pub fn materialize<S: RowSource>(mut source: S) -> SourceResult<Self> {
        let mut rows = Vec::new();
        while let Some(row) = source.next_row()? {
            rows.push(row);
        }
        debug!(rows = rows.len(), "materialized one-pass row source");
        Ok(Self::new(rows))
    }

    /// Returns the number of rows in the source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the source holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Row>> for MemoryRowSource {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl RowSource for MemoryRowSource {
    fn has_next(&mut self) -> SourceResult<bool> {
        Ok(self.read_pos < self.rows.len())
    }

    fn next_row(&mut self) -> SourceResult<Option<Row>> {
        match self.rows.get(self.read_pos) {
            Some(row) => {
                self.read_pos += 1;
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }
}

impl RewindableSource for MemoryRowSource {
    fn has_previous(&mut self) -> SourceResult<bool> {
        Ok(self.read_pos > 0)
    }

    fn previous_row(&mut self) -> SourceResult<Option<Row>> {
        if self.read_pos == 0 {
            return Ok(None);
        }
        self.read_pos -= 1;
        Ok(self.rows.get(self.read_pos).cloned())
    }

    fn row_count(&self) -> u64 {
        self.rows.len() as u64
    }
}

/// Adapts a fallible row iterator into a [`RowSource`].
///
/// Keeps a one-row peek buffer so `has_next()` can answer without handing
/// the peeked row out; the buffered row is returned by the following
/// `next_row()` call.
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
    peeked: Option<Row>,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = SourceResult<Row>> + Send,
{
    /// Wraps the given iterator.
    pub fn new(iter: I) -> Self {
        Self { iter, peeked: None }
    }
}

impl<I> RowSource for IterSource<I>
where
    I: Iterator<Item = SourceResult<Row>> + Send,
{
    fn has_next(&mut self) -> SourceResult<bool> {
        if self.peeked.is_none() {
            self.peeked = self.iter.next().transpose()?;
        }
        Ok(self.peeked.is_some())
    }

    fn next_row(&mut self) -> SourceResult<Option<Row>> {
        if let Some(row) = self.peeked.take() {
            return Ok(Some(row));
        }
        self.iter.next().transpose()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use rowset_core::{Schema, Value};

    use super::*;

    fn rows(n: i64) -> Vec<Row> {
        let schema = Arc::new(Schema::new(vec!["n".to_string()]));
        (1..=n).map(|i| Row::new(Arc::clone(&schema), vec![Value::Int(i)])).collect()
    }

    #[test]
    fn memory_source_forward_and_back() {
        let mut source = MemoryRowSource::new(rows(2));
        assert!(source.has_next().expect("has_next failed"));
        assert!(!source.has_previous().expect("has_previous failed"));

        let first = source.next_row().expect("next failed").expect("missing row");
        assert_eq!(first.get(0), Some(&Value::Int(1)));

        // previous_row hands the same row back, list-iterator style.
        let back = source.previous_row().expect("previous failed").expect("missing row");
        assert_eq!(back, first);
        assert!(!source.has_previous().expect("has_previous failed"));
    }

    #[test]
    fn memory_source_exhausts_cleanly() {
        let mut source = MemoryRowSource::new(rows(1));
        assert!(source.next_row().expect("next failed").is_some());
        assert!(source.next_row().expect("next failed").is_none());
        assert!(source.next_row().expect("next failed").is_none());
        assert!(!source.has_next().expect("has_next failed"));
        assert_eq!(source.row_count(), 1);
    }

    #[test]
    fn materialize_drains_a_one_pass_source() {
        let iter = rows(3).into_iter().map(Ok);
        let source =
            MemoryRowSource::materialize(IterSource::new(iter)).expect("materialize failed");
        assert_eq!(source.len(), 3);
        assert_eq!(source.row_count(), 3);
    }

    #[test]
    fn materialize_propagates_source_failure() {
        let iter = vec![
            Ok(Row::single("n", Value::Int(1))),
            Err(SourceError::Cancelled),
        ]
        .into_iter();
        let err = MemoryRowSource::materialize(IterSource::new(iter))
            .expect_err("materialize should fail");
        assert!(matches!(err, SourceError::Cancelled));
    }

    #[test]
    fn iter_source_peek_does_not_consume() {
        let mut source = IterSource::new(rows(1).into_iter().map(Ok));
        assert!(source.has_next().expect("has_next failed"));
        assert!(source.has_next().expect("has_next failed"));
        let row = source.next_row().expect("next failed").expect("missing row");
        assert_eq!(row.get(0), Some(&Value::Int(1)));
        assert!(!source.has_next().expect("has_next failed"));
        assert!(source.next_row().expect("next failed").is_none());
    }
}
