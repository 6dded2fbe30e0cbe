//! Step counter and the run ceiling.
//!
//! A `Step` counts simulator advances.  It starts at zero before the first
//! `simulationStep` and is incremented once per advance, so the first
//! simulated step is step 1.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Number of simulator advances taken so far.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Increment by one.
    #[inline]
    pub fn advance(&mut self) {
        self.0 += 1;
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upper bound on simulated steps.  A safety bound, not a domain rule.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepLimit(u64);

impl StepLimit {
    pub const DEFAULT: StepLimit = StepLimit(400);

    /// A ceiling of `max` steps.  Zero is rejected: such a run could never
    /// simulate anything.
    pub fn new(max: u64) -> CoreResult<Self> {
        if max == 0 {
            return Err(CoreError::Config("step limit must be at least 1".into()));
        }
        Ok(Self(max))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    /// `true` once `step` has moved past the ceiling.  The step that does so
    /// is not simulated.
    #[inline]
    pub fn exceeded_by(self, step: Step) -> bool {
        step.0 > self.0
    }
}

impl Default for StepLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}
