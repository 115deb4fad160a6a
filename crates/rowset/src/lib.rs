//! `rowset`
//!
//! This crate presents query result rows as a navigable sequence with
//! relational-cursor semantics: positional jumps, boundary flags,
//! forward and backward movement, and commit-on-close.
//!
//! # Overview
//!
//! The engine side of a query system naturally produces rows one at a
//! time, forward only. `rowset` layers cursor navigation on top of that
//! primitive in two ways:
//!
//! - [`ForwardCursor`] streams over a one-pass [`RowSource`]. Memory
//!   stays bounded regardless of result size; any request to move
//!   backward fails with [`CursorError::UnsupportedBackwardMove`].
//! - [`ScrollCursor`] navigates a [`RewindableSource`] in both
//!   directions. Rows already pulled are kept in a pair of stacks
//!   (history below the position, lookahead above it), so backward
//!   movement and revisits replay cached rows instead of re-querying.
//!
//! A one-pass source is promoted to a scrollable one by draining it into
//! memory first, via [`MemoryRowSource::materialize`] or
//! [`ScrollCursor::materialize`].
//!
//! # Modules
//!
//! - [`cursor`] - The [`Cursor`] contract and the two implementations
//! - [`source`] - Row source traits and provided sources
//! - [`position`] - The shared position model
//! - [`lifecycle`] - Idempotent close and commit-on-close
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```
//! use rowset::{Cursor, ForwardCursor, MemoryRowSource, Row, Schema, Value};
//! use std::sync::Arc;
//!
//! let schema = Arc::new(Schema::new(vec!["name".to_string()]));
//! let rows = vec![
//!     Row::new(Arc::clone(&schema), vec![Value::from("Alice")]),
//!     Row::new(Arc::clone(&schema), vec![Value::from("Bob")]),
//! ];
//!
//! let mut cursor = ForwardCursor::new(MemoryRowSource::new(rows));
//! while cursor.next()? {
//!     let row = cursor.current_row().ok_or(rowset::CursorError::Closed)?;
//!     println!("{}", row.get_by_name("name").unwrap_or(&Value::Null));
//! }
//! cursor.close()?;
//! # Ok::<(), rowset::CursorError>(())
//! ```

pub mod cursor;
pub mod error;
pub mod lifecycle;
pub mod position;
pub mod source;


// Re-export commonly used items at the crate root
pub use cursor::{Cursor, CursorWarning, ForwardCursor, ScrollCursor, ScrollKind};
pub use error::{CursorError, CursorResult, SourceError, SourceResult};
pub use lifecycle::{CommitHook, Lifecycle};
pub use position::Position;
pub use source::{IterSource, MemoryRowSource, RewindableSource, RowSource};

pub use rowset_core::{Row, Schema, Value};
