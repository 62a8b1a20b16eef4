//! Dense enumeration of a sequential id space.
//!
//! The store exposes only a "next id" counter per id space. Every id in
//! `[first, next)` is assumed to exist, so enumerating the live ids is a plain
//! range walk. A counter at or below the floor yields nothing.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::id::SequentialId;

/// Ascending ids `[first, next)` of one id space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdRange<I> {
    cursor: u64,
    end: u64,
    _id: PhantomData<I>,
}

impl<I: SequentialId> IdRange<I> {
    /// Build the range of existing ids given the configured first id and the
    /// store's current "next id".
    pub fn new(first: I, next: I) -> Self {
        let cursor = first.raw();
        let end = next.raw().max(cursor);
        Self {
            cursor,
            end,
            _id: PhantomData,
        }
    }

    /// An empty range.
    pub fn empty() -> Self {
        Self {
            cursor: 0,
            end: 0,
            _id: PhantomData,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cursor >= self.end
    }

    pub fn contains(&self, id: I) -> bool {
        (self.cursor..self.end).contains(&id.raw())
    }
}

impl<I: SequentialId> Iterator for IdRange<I> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        if self.cursor >= self.end {
            return None;
        }
        let id = I::from_raw(self.cursor);
        self.cursor += 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.cursor).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl<I: SequentialId> ExactSizeIterator for IdRange<I> {}

impl<I: SequentialId> FusedIterator for IdRange<I> {}
