use std::collections::HashMap;

use thiserror::Error;

use crate::course::spec::Step;

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("course has no steps")]
    EmptyCourse,
}

/// Per-step progress, created lazily on first access and kept for the
/// whole session.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepState {
    pub completed: bool,
    pub score: Option<f64>,
    pub attempts: u32,
}

/// UI-independent course engine: navigation, gating and completion state.
pub struct CourseEngine {
    steps: Vec<Step>,
    index: usize,
    state: HashMap<String, StepState>,
}

impl CourseEngine {
    pub fn new(steps: Vec<Step>) -> Result<Self, CourseError> {
        if steps.is_empty() {
            return Err(CourseError::EmptyCourse);
        }
        Ok(Self {
            steps,
            index: 0,
            state: HashMap::new(),
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &Step {
        &self.steps[self.index]
    }

    pub fn state(&self) -> StepState {
        self.state_for(&self.current().id)
    }

    pub fn state_for(&self, step_id: &str) -> StepState {
        self.state.get(step_id).copied().unwrap_or_default()
    }

    /// Record an attempt on the current step. Attempts count unconditionally;
    /// completion is monotonic and a later failure never clears it.
    pub fn mark_attempt(&mut self, ok: bool, score: Option<f64>) {
        let id = self.current().id.clone();
        let s = self.state.entry(id).or_default();
        s.attempts += 1;
        if let Some(score) = score {
            s.score = Some(score);
        }
        if ok {
            s.completed = true;
        }
    }

    /// The sole forward-navigation gate: non-interactive steps, steps with
    /// `requires_completion` off, and completed steps let the user through.
    pub fn can_continue(&self) -> bool {
        let step = self.current();
        if !step.kind.is_interactive() {
            return true;
        }
        if !step.requires_completion {
            return true;
        }
        self.state_for(&step.id).completed
    }

    /// Advance by one. Returns false when gated (cursor unchanged; the
    /// caller surfaces a hint) or when already on the last step (course
    /// finished; the caller decides what happens next).
    pub fn next(&mut self) -> bool {
        if !self.can_continue() {
            return false;
        }
        if self.index < self.steps.len() - 1 {
            self.index += 1;
            return true;
        }
        false
    }

    /// Move back by one. Never gated.
    pub fn back(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            return true;
        }
        false
    }

    /// Fraction of steps counted as done. Steps that can never gate always
    /// count; gating steps count once completed.
    pub fn progress_ratio(&self) -> f64 {
        let done = self
            .steps
            .iter()
            .filter(|st| {
                if st.kind.is_interactive() && st.requires_completion {
                    self.state_for(&st.id).completed
                } else {
                    true
                }
            })
            .count();
        done as f64 / self.steps.len().max(1) as f64
    }
}
