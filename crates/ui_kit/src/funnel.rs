//! Ordered, single-active-step state machine.
//!
//! A [`StepFunnel`] walks a fixed list of steps one at a time. Transitions
//! that name the step they start from (`next`, `back`, `finish`) are ignored
//! when that step is no longer the live one, so a late async callback cannot
//! move the funnel after the user already has.

use std::fmt::Debug;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunnelError {
    #[error("a funnel needs at least one step")]
    EmptyStepSet,
    #[error("step {0} is not part of this funnel")]
    InvalidStep(String),
    #[error("step {0} is listed more than once")]
    DuplicateStep(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    At(usize),
    Terminal,
}

#[derive(Debug, Clone)]
pub struct StepFunnel<S> {
    steps: Vec<S>,
    position: Position,
}

impl<S: Copy + Eq + Debug> StepFunnel<S> {
    pub fn new(steps: impl IntoIterator<Item = S>, initial: S) -> Result<Self, FunnelError> {
        let steps: Vec<S> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(FunnelError::EmptyStepSet);
        }
        for (index, step) in steps.iter().enumerate() {
            if steps[..index].contains(step) {
                return Err(FunnelError::DuplicateStep(format!("{step:?}")));
            }
        }

        let mut funnel = Self {
            steps,
            position: Position::At(0),
        };
        let index = funnel.index_of(initial)?;
        funnel.position = Position::At(index);
        Ok(funnel)
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    /// The active step, or `None` once the funnel has been finished.
    pub fn current(&self) -> Option<S> {
        match self.position {
            Position::At(index) => Some(self.steps[index]),
            Position::Terminal => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self.position {
            Position::At(index) => Some(index),
            Position::Terminal => None,
        }
    }

    pub fn is_at(&self, step: S) -> bool {
        self.current() == Some(step)
    }

    pub fn is_terminal(&self) -> bool {
        self.position == Position::Terminal
    }

    pub fn is_last(&self) -> bool {
        self.index() == Some(self.steps.len() - 1)
    }

    /// Advances one step past `from`. Returns `false` without touching state
    /// when `from` is stale or already the last step.
    pub fn next(&mut self, from: S) -> bool {
        let Some(index) = self.live_index(from) else {
            debug!(?from, current = ?self.current(), "ignoring stale funnel advance");
            return false;
        };
        if index + 1 >= self.steps.len() {
            return false;
        }
        self.position = Position::At(index + 1);
        debug!(from = ?from, to = ?self.steps[index + 1], "funnel advanced");
        true
    }

    /// Moves one step before `from`, with the same stale guard as [`Self::next`].
    pub fn back(&mut self, from: S) -> bool {
        let Some(index) = self.live_index(from) else {
            debug!(?from, current = ?self.current(), "ignoring stale funnel rollback");
            return false;
        };
        if index == 0 {
            return false;
        }
        self.position = Position::At(index - 1);
        debug!(from = ?from, to = ?self.steps[index - 1], "funnel rolled back");
        true
    }

    pub fn go_to(&mut self, step: S) -> Result<(), FunnelError> {
        let index = self.index_of(step)?;
        self.position = Position::At(index);
        debug!(to = ?step, "funnel jumped");
        Ok(())
    }

    /// Leaves the step list entirely. Only the live step may finish it.
    pub fn finish(&mut self, from: S) -> bool {
        if self.live_index(from).is_none() {
            return false;
        }
        self.position = Position::Terminal;
        debug!(from = ?from, "funnel finished");
        true
    }

    fn live_index(&self, from: S) -> Option<usize> {
        match self.position {
            Position::At(index) if self.steps[index] == from => Some(index),
            _ => None,
        }
    }

    fn index_of(&self, step: S) -> Result<usize, FunnelError> {
        self.steps
            .iter()
            .position(|candidate| *candidate == step)
            .ok_or_else(|| FunnelError::InvalidStep(format!("{step:?}")))
    }
}

type SlotBuilder<'a, C> = Box<dyn Fn() -> C + 'a>;

/// Content registered per step. Slots may be registered in any display
/// order; only the slot of the live step is ever built.
pub struct StepSlots<'a, S, C> {
    slots: Vec<(S, SlotBuilder<'a, C>)>,
}

impl<'a, S: Copy + Eq + Debug, C> StepSlots<'a, S, C> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn step(mut self, step: S, build: impl Fn() -> C + 'a) -> Self {
        self.slots.push((step, Box::new(build)));
        self
    }

    pub fn display_order(&self) -> Vec<S> {
        self.slots.iter().map(|(step, _)| *step).collect()
    }

    pub fn render(&self, funnel: &StepFunnel<S>) -> Option<C> {
        let current = funnel.current()?;
        self.slots
            .iter()
            .find(|(step, _)| *step == current)
            .map(|(_, build)| build())
    }
}

impl<S: Copy + Eq + Debug, C> Default for StepSlots<'_, S, C> {
    fn default() -> Self {
        Self::new()
    }
}
