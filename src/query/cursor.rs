//! Restartable cursor over the children of a compound pattern
//!
//! Iteration state lives here, not in the pattern, so one pattern can be
//! run by several searches at once. Discipline:
//!
//! - `current_pattern` and `has_next_query` never move the cursor
//! - `advance` moves by one and reports whether a child is now current
//! - `reset_query` rewinds to the first child

use crate::query::pattern::PatternRef;

#[derive(Clone, Debug)]
pub struct QueryCursor<'p> {
    children: &'p [PatternRef],
    position: usize,
}

impl<'p> QueryCursor<'p> {
    pub fn new(children: &'p [PatternRef]) -> Self {
        Self {
            children,
            position: 0,
        }
    }

    pub fn reset_query(&mut self) {
        self.position = 0;
    }

    /// Whether a child is waiting to be queried
    pub fn has_next_query(&self) -> bool {
        self.position < self.children.len()
    }

    /// Child at the cursor, or `None` once exhausted
    pub fn current_pattern(&self) -> Option<&'p PatternRef> {
        self.children.get(self.position)
    }

    pub fn advance(&mut self) -> bool {
        if self.position < self.children.len() {
            self.position += 1;
        }
        self.has_next_query()
    }

    /// Zero-based index of the current child
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
