//! Shared close and commit-on-close state.
//!
//! Both cursor kinds delegate their closed flag and their optional
//! commit-on-close obligation to [`Lifecycle`]. The commit hook is stored
//! in an `Option` and taken on first close, so it runs at most once no
//! matter how many times `close()` is called.

use std::fmt;

use tracing::debug;

use crate::error::{CursorError, CursorResult, SourceError};

/// Hook invoked exactly once when a cursor created under an auto-commit
/// obligation is first closed.
///
/// The hook is not run if the cursor is dropped without being closed,
/// mirroring how an uncommitted transaction rolls back on drop.
pub type CommitHook = Box<dyn FnOnce() -> Result<(), SourceError> + Send>;

/// Closed flag plus the optional commit-on-close hook.
pub struct Lifecycle {
    closed: bool,
    commit_hook: Option<CommitHook>,
}

impl Lifecycle {
    /// Creates lifecycle state with no commit obligation.
    #[must_use]
    pub fn new() -> Self {
        Self { closed: false, commit_hook: None }
    }

    /// Creates lifecycle state that runs `hook` on first close.
    #[must_use]
    pub fn with_commit_hook(hook: CommitHook) -> Self {
        Self { closed: false, commit_hook: Some(hook) }
    }

    /// Returns true once `close()` has been called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fails with [`CursorError::Closed`] once the cursor is closed.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Closed`] after the first `close()`.
    pub const fn ensure_open(&self) -> CursorResult<()> {
        if self.closed {
            Err(CursorError::Closed)
        } else {
            Ok(())
        }
    }

    /// Marks the cursor closed and runs the commit hook if this is the
    /// first close. Later calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Source`] if the commit hook fails; the
    /// cursor still transitions to closed, and only the first close can
    /// report the failure.
    pub fn close(&mut self) -> CursorResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if let Some(hook) = self.commit_hook.take() {
            debug!("running commit-on-close hook");
            hook()?;
        }
        Ok(())
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("closed", &self.closed)
            .field("has_commit_hook", &self.commit_hook.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn close_is_idempotent() {
        let mut lifecycle = Lifecycle::new();
        assert!(!lifecycle.is_closed());
        assert!(lifecycle.ensure_open().is_ok());

        lifecycle.close().expect("first close failed");
        assert!(lifecycle.is_closed());
        lifecycle.close().expect("second close failed");

        assert!(matches!(lifecycle.ensure_open(), Err(CursorError::Closed)));
    }

    #[test]
    fn commit_hook_runs_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut lifecycle = Lifecycle::with_commit_hook(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        lifecycle.close().expect("first close failed");
        lifecycle.close().expect("second close failed");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_hook_still_closes() {
        let mut lifecycle = Lifecycle::with_commit_hook(Box::new(|| {
            Err(SourceError::Execution("commit refused".to_string()))
        }));

        let err = lifecycle.close().expect_err("first close should report the hook failure");
        assert!(matches!(err, CursorError::Source(SourceError::Execution(_))));
        assert!(lifecycle.is_closed());
        // The failure is reported once; later closes are clean no-ops.
        lifecycle.close().expect("second close failed");
    }
}
