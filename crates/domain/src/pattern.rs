use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Step {
    Hit,
    Rest,
}

/// A fixed-length cyclic grid of percussive steps. The length is set at
/// construction and never changes, so one pattern always describes exactly
/// one rhythmic cycle.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepPattern {
    slots: Vec<Step>,
}

impl StepPattern {
    pub fn rests(grid: usize) -> Self {
        Self {
            slots: vec![Step::Rest; grid],
        }
    }

    /// Marks a hit; indices wrap around the cycle. Re-marking a step is a
    /// no-op, multiple onsets collapse into one hit.
    pub fn mark(&mut self, step: usize) {
        if self.slots.is_empty() {
            return;
        }
        let len = self.slots.len();
        self.slots[step % len] = Step::Hit;
    }

    pub fn slots(&self) -> &[Step] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn hit_count(&self) -> usize {
        self.slots.iter().filter(|s| **s == Step::Hit).count()
    }

    pub fn is_all_rests(&self) -> bool {
        self.hit_count() == 0
    }
}
