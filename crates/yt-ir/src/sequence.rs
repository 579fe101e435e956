//! Song arrangement: an ordered list of patterns.

use alloc::vec::Vec;

use crate::pattern::Pattern;

/// Ordered patterns. Always holds at least one.
#[derive(Clone, Debug)]
pub struct Sequence {
    patterns: Vec<Pattern>,
}

impl Sequence {
    /// A sequence holding a single pattern.
    pub fn new(pattern: Pattern) -> Self {
        Self {
            patterns: alloc::vec![pattern],
        }
    }

    /// The first pattern, the one the transport plays.
    pub fn first(&self) -> &Pattern {
        &self.patterns[0]
    }

    pub fn first_mut(&mut self) -> &mut Pattern {
        &mut self.patterns[0]
    }
}
