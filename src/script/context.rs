use crate::script::script_model::{ExpectationResult, StepRecord};

/// Tracks progress and results of a running replay.
#[derive(Debug, Clone, Default)]
pub struct ReplayContext {
    /// Current step index (0-based)
    pub current_step: usize,

    pub steps: Vec<StepRecord>,

    pub expectation_results: Vec<ExpectationResult>,
}

impl ReplayContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_step(&mut self, action: &str, outcome: String) {
        self.steps.push(StepRecord {
            index: self.current_step,
            action: action.to_string(),
            outcome,
        });
    }

    pub fn record_expectations(&mut self, results: Vec<ExpectationResult>) {
        self.expectation_results.extend(results);
    }

    pub fn all_passed(&self) -> bool {
        self.expectation_results.iter().all(|r| r.passed)
    }

    pub fn pass_count(&self) -> usize {
        self.expectation_results.iter().filter(|r| r.passed).count()
    }

    pub fn fail_count(&self) -> usize {
        self.expectation_results.iter().filter(|r| !r.passed).count()
    }
}
