//! Scrollable cursor over a rewindable row source.

use rowset_core::Row;
use tracing::debug;

use crate::cursor::{Cursor, CursorWarning, ScrollKind};
use crate::error::{CursorError, CursorResult, SourceError};
use crate::lifecycle::{CommitHook, Lifecycle};
use crate::position::{self, Position};
use crate::source::{MemoryRowSource, RewindableSource, RowSource};

/// A cursor offering full bidirectional navigation.
///
/// The source is still only ever pulled forward; rows the cursor has
/// moved away from are kept in two stacks, `history` below the current
/// row and `lookahead` above it, so backward movement and re-forward
/// movement replay cached rows instead of re-querying. Together with the
/// current row, the stacks always hold exactly the rows pulled so far, in
/// source order.
///
/// The total row count is captured from the source at construction, which
/// is what lets every boundary query answer without touching the source.
pub struct ScrollCursor<S> {
    /// Source handle; cleared on close so double-release is impossible.
    source: Option<S>,
    /// Total row count, captured at construction.
    total: u64,
    /// Linear position: 0 = before-first, 1..=total = row, total+1 = after-last.
    index: u64,
    current: Option<Row>,
    /// Rows strictly behind the current position, most recent on top.
    history: Vec<Row>,
    /// Rows strictly ahead that were already pulled once, nearest on top.
    lookahead: Vec<Row>,
    /// Rows pulled from the source so far.
    fetched: u64,
    warnings: Vec<CursorWarning>,
    lifecycle: Lifecycle,
}

impl<S: RewindableSource> ScrollCursor<S> {
    /// Creates a cursor positioned before the first row of `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        let total = source.row_count();
        Self {
            source: Some(source),
            total,
            index: 0,
            current: None,
            history: Vec::new(),
            lookahead: Vec::new(),
            fetched: 0,
            warnings: Vec::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Installs a hook run exactly once when the cursor is first closed.
    #[must_use]
    pub fn with_commit_hook(mut self, hook: CommitHook) -> Self {
        self.lifecycle = Lifecycle::with_commit_hook(hook);
        self
    }

    /// The total number of rows in the result.
    #[must_use]
    pub const fn total_rows(&self) -> u64 {
        self.total
    }

    /// The number of rows pulled from the source so far.
    #[must_use]
    pub const fn rows_fetched(&self) -> u64 {
        self.fetched
    }

    /// The cursor's current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        position::index_to_position(self.index, self.total)
    }

    const fn on_row(&self) -> bool {
        1 <= self.index && self.index <= self.total
    }

    /// Pulls one fresh row from the source.
    fn pull(&mut self) -> CursorResult<Row> {
        let source = self.source.as_mut().ok_or(CursorError::Closed)?;
        match source.next_row()? {
            Some(row) => {
                self.fetched += 1;
                Ok(row)
            }
            None => Err(CursorError::Source(SourceError::TruncatedResult {
                expected: self.total,
                got: self.fetched,
            })),
        }
    }

    /// Moves exactly one position forward, replaying the lookahead cache
    /// before pulling fresh rows.
    ///
    /// On failure nothing is updated; position and caches stay as they
    /// were.
    fn step_forward(&mut self) -> CursorResult<()> {
        debug_assert!(self.index <= self.total, "cannot step past after-last");
        if self.index == self.total {
            // Onto the after-last boundary; the final row goes behind us.
            if let Some(row) = self.current.take() {
                self.history.push(row);
            }
            self.index += 1;
            return Ok(());
        }
        let row = match self.lookahead.pop() {
            Some(row) => row,
            None => self.pull()?,
        };
        if let Some(prev) = self.current.replace(row) {
            self.history.push(prev);
        }
        self.index += 1;
        Ok(())
    }

    /// Moves exactly one position backward. Touches only the caches,
    /// never the source, so it cannot fail.
    fn step_backward(&mut self) {
        debug_assert!(self.index >= 1, "cannot step before before-first");
        if let Some(row) = self.current.take() {
            self.lookahead.push(row);
        }
        self.index -= 1;
        if self.index >= 1 {
            debug_assert_eq!(
                self.history.len() as u64,
                self.index,
                "history must hold every row behind the target position"
            );
            self.current = self.history.pop();
        }
    }

    /// Steps straight to `target`, the exact distance and no further.
    fn move_to(&mut self, target: u64) -> CursorResult<()> {
        debug_assert!(target <= self.total + 1);
        while self.index < target {
            self.step_forward()?;
        }
        while self.index > target {
            self.step_backward();
        }
        Ok(())
    }

    fn push_warning(&mut self, message: String) {
        self.warnings.push(CursorWarning::new(message));
    }

    /// Asserts the cache partition invariant: history, current row and
    /// lookahead together hold exactly the rows pulled so far, in source
    /// order.
    #[cfg(test)]
    pub(crate) fn assert_cache_partition(&self, source_rows: &[Row]) {
        let cached =
            self.history.len() + usize::from(self.current.is_some()) + self.lookahead.len();
        assert_eq!(cached as u64, self.fetched, "caches must partition the pulled rows");

        let mut in_order: Vec<&Row> = self.history.iter().collect();
        if let Some(row) = &self.current {
            in_order.push(row);
        }
        in_order.extend(self.lookahead.iter().rev());
        let expected: Vec<&Row> = source_rows[..self.fetched as usize].iter().collect();
        assert_eq!(in_order, expected, "caches must preserve source order");

        if self.on_row() {
            assert_eq!(self.history.len() as u64, self.index - 1);
            assert!(self.current.is_some());
        } else {
            assert!(self.current.is_none());
        }
    }
}

impl ScrollCursor<MemoryRowSource> {
    /// Promotes a one-pass source to a scrollable cursor by draining it
    /// into memory first.
    ///
    /// # Errors
    ///
    /// Returns the first [`SourceError`] the drained source reports.
    pub fn materialize<S: RowSource>(source: S) -> Result<Self, SourceError> {
        Ok(Self::new(MemoryRowSource::materialize(source)?))
    }
}

impl<S: RewindableSource> Cursor for ScrollCursor<S> {
    fn next(&mut self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        if self.index > self.total {
            return Ok(false);
        }
        self.step_forward()?;
        Ok(self.on_row())
    }

    fn previous(&mut self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        if self.index == 0 {
            return Ok(false);
        }
        self.step_backward();
        Ok(self.on_row())
    }

    fn first(&mut self) -> CursorResult<bool> {
        self.absolute(1)
    }

    fn last(&mut self) -> CursorResult<bool> {
        self.absolute(-1)
    }

    fn absolute(&mut self, row: i64) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        if position::absolute_overshoots(row, self.total) {
            self.push_warning(format!(
                "absolute target {row} clamped to a boundary of a {}-row result",
                self.total
            ));
        }
        let target = position::normalize_absolute(row, self.total);
        self.move_to(target)?;
        Ok(self.on_row())
    }

    fn relative(&mut self, offset: i64) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        if offset == 0 {
            return Ok(self.on_row());
        }
        let target = position::clamp_offset(self.index, offset, self.total);
        if i128::from(self.index) + i128::from(offset) != i128::from(target) {
            self.push_warning(format!(
                "relative move of {offset} clamped to a boundary of a {}-row result",
                self.total
            ));
        }
        self.move_to(target)?;
        Ok(self.on_row())
    }

    fn before_first(&mut self) -> CursorResult<()> {
        self.lifecycle.ensure_open()?;
        self.move_to(0)
    }

    fn after_last(&mut self) -> CursorResult<()> {
        self.lifecycle.ensure_open()?;
        self.move_to(self.total + 1)
    }

    fn is_before_first(&self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        Ok(self.index == 0)
    }

    fn is_after_last(&self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        Ok(self.index == self.total + 1)
    }

    fn is_first(&self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        Ok(self.index == 1 && self.on_row())
    }

    fn is_last(&mut self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        Ok(self.index == self.total && self.on_row())
    }

    fn row_number(&self) -> CursorResult<u64> {
        self.lifecycle.ensure_open()?;
        Ok(self.position().row_number())
    }

    fn current_row(&self) -> Option<&Row> {
        self.current.as_ref()
    }

    fn kind(&self) -> ScrollKind {
        ScrollKind::ScrollInsensitive
    }

    fn warnings(&self) -> &[CursorWarning] {
        &self.warnings
    }

    fn clear_warnings(&mut self) {
        self.warnings.clear();
    }

    fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    fn close(&mut self) -> CursorResult<()> {
        if self.lifecycle.is_closed() {
            return Ok(());
        }
        debug!(rows = self.fetched, total = self.total, "closing scroll cursor");
        self.source = None;
        self.current = None;
        self.history = Vec::new();
        self.lookahead = Vec::new();
        self.lifecycle.close()
    }
}
