//! Forward-only cursor over a single-pass row source.

use rowset_core::Row;
use tracing::{debug, trace};

use crate::cursor::{Cursor, CursorWarning, ScrollKind};
use crate::error::{CursorError, CursorResult};
use crate::lifecycle::{CommitHook, Lifecycle};
use crate::position::Position;
use crate::source::RowSource;

/// A cursor that honors the single-pass constraint of its source.
///
/// Rows stream through without being retained, so memory stays bounded no
/// matter how large the result is. The price is that any request to
/// revisit a position fails with
/// [`UnsupportedBackwardMove`](CursorError::UnsupportedBackwardMove).
/// The documented exceptions are `first()` before row 1 has been passed
/// and `before_first()` before any movement at all.
pub struct ForwardCursor<S> {
    /// Source handle; cleared on close so double-release is impossible.
    source: Option<S>,
    position: Position,
    current: Option<Row>,
    /// Cached answer of the one-row lookahead peek behind `is_last()`;
    /// invalidated by every pull.
    ahead: Option<bool>,
    /// Rows pulled from the source so far.
    fetched: u64,
    warnings: Vec<CursorWarning>,
    lifecycle: Lifecycle,
}

impl<S: RowSource> ForwardCursor<S> {
    /// Creates a cursor positioned before the first row of `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            position: Position::BeforeFirst,
            current: None,
            ahead: None,
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

    /// The number of rows pulled from the source so far.
    #[must_use]
    pub const fn rows_fetched(&self) -> u64 {
        self.fetched
    }

    /// The cursor's current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    fn source_mut(&mut self) -> CursorResult<&mut S> {
        self.source.as_mut().ok_or(CursorError::Closed)
    }

    /// Pulls one row, advancing onto it or settling after the last row.
    fn pull_next(&mut self) -> CursorResult<bool> {
        let pulled = self.source_mut()?.next_row()?;
        self.ahead = None;
        match pulled {
            Some(row) => {
                self.fetched += 1;
                self.position = Position::Row(self.position.row_number() + 1);
                self.current = Some(row);
                Ok(true)
            }
            None => {
                self.position = Position::AfterLast;
                self.current = None;
                Ok(false)
            }
        }
    }

    /// Peeks whether the source has another row, caching the answer until
    /// the next pull.
    fn source_has_next(&mut self) -> CursorResult<bool> {
        if self.ahead.is_none() {
            let more = self.source_mut()?.has_next()?;
            self.ahead = Some(more);
        }
        Ok(matches!(self.ahead, Some(true)))
    }

    fn push_warning(&mut self, message: String) {
        self.warnings.push(CursorWarning::new(message));
    }
}

impl<S: RowSource> Cursor for ForwardCursor<S> {
    fn next(&mut self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        if self.position.is_after_last() {
            return Ok(false);
        }
        self.pull_next()
    }

    fn previous(&mut self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        Err(CursorError::UnsupportedBackwardMove)
    }

    fn first(&mut self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        match self.position {
            Position::BeforeFirst => self.pull_next(),
            Position::Row(1) => Ok(true),
            Position::Row(_) | Position::AfterLast => Err(CursorError::UnsupportedBackwardMove),
        }
    }

    fn last(&mut self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        if self.position.is_after_last() {
            // The final row is behind the cursor and cannot be revisited.
            return Err(CursorError::UnsupportedBackwardMove);
        }
        while self.source_has_next()? {
            self.pull_next()?;
        }
        trace!(rows = self.fetched, "drained source to last row");
        if self.position.is_on_row() {
            Ok(true)
        } else {
            // Empty source: nothing to land on.
            self.position = Position::AfterLast;
            Ok(false)
        }
    }

    fn absolute(&mut self, row: i64) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        match row {
            0 => {
                self.before_first()?;
                Ok(false)
            }
            1 => self.first(),
            -1 => self.last(),
            r if r < 0 => {
                // Addressing from the end needs the total row count,
                // which a single-pass source cannot provide in advance.
                Err(CursorError::UnsupportedBackwardMove)
            }
            r => {
                let target = r as u64;
                match self.position {
                    Position::Row(n) if target == n => Ok(true),
                    Position::Row(n) if target < n => Err(CursorError::UnsupportedBackwardMove),
                    Position::AfterLast if target <= self.fetched => {
                        Err(CursorError::UnsupportedBackwardMove)
                    }
                    _ => {
                        while self.position.row_number() < target {
                            if !self.next()? {
                                self.push_warning(format!(
                                    "absolute target {target} is beyond the end of the result"
                                ));
                                return Ok(false);
                            }
                        }
                        Ok(true)
                    }
                }
            }
        }
    }

    fn relative(&mut self, offset: i64) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        if offset == 0 {
            return Ok(true);
        }
        if offset < 0 {
            return Err(CursorError::UnsupportedBackwardMove);
        }
        for _ in 0..offset {
            if !self.next()? {
                self.push_warning(format!(
                    "relative move of {offset} went past the end of the result"
                ));
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn before_first(&mut self) -> CursorResult<()> {
        self.lifecycle.ensure_open()?;
        if self.position.is_before_first() {
            Ok(())
        } else {
            Err(CursorError::UnsupportedBackwardMove)
        }
    }

    fn after_last(&mut self) -> CursorResult<()> {
        self.lifecycle.ensure_open()?;
        while !self.position.is_after_last() {
            if !self.next()? {
                break;
            }
        }
        trace!(rows = self.fetched, "drained source to after-last");
        Ok(())
    }

    fn is_before_first(&self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        Ok(self.position.is_before_first())
    }

    fn is_after_last(&self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        Ok(self.position.is_after_last())
    }

    fn is_first(&self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        Ok(matches!(self.position, Position::Row(1)))
    }

    fn is_last(&mut self) -> CursorResult<bool> {
        self.lifecycle.ensure_open()?;
        if !self.position.is_on_row() {
            return Ok(false);
        }
        Ok(!self.source_has_next()?)
    }

    fn row_number(&self) -> CursorResult<u64> {
        self.lifecycle.ensure_open()?;
        Ok(self.position.row_number())
    }

    fn current_row(&self) -> Option<&Row> {
        self.current.as_ref()
    }

    fn kind(&self) -> ScrollKind {
        ScrollKind::ForwardOnly
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
        debug!(rows = self.fetched, "closing forward cursor");
        self.source = None;
        self.current = None;
        self.ahead = None;
        self.lifecycle.close()
    }
}
