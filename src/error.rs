//! # Tree errors.
//!
//! Every fallible operation on [`OrderedTree`](crate::OrderedTree) and
//! [`Cursor`](crate::Cursor) reports a [`TreeError`].

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Ranks are 1-based, so an empty tree has no valid rank.
    #[error("rank {rank} is out of range for a tree of {len} keys")]
    RankOutOfRange { rank: usize, len: usize },
    #[error("cannot dereference the end cursor")]
    CursorAtEnd,
    #[error("failed to allocate a tree node")]
    Alloc(#[from] TryReserveError),
}
