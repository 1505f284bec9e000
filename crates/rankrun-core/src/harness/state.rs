use std::fmt;

use tracing::debug;

use crate::error::CoreError;

/// Lifecycle of one harness run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HarnessState {
    Idle,
    FlavorDetected,
    PlanBuilt,
    Launching,
    Launched,
    Collecting,
    Done,
    Failed,
}

impl HarnessState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarnessState::Idle => "idle",
            HarnessState::FlavorDetected => "flavor-detected",
            HarnessState::PlanBuilt => "plan-built",
            HarnessState::Launching => "launching",
            HarnessState::Launched => "launched",
            HarnessState::Collecting => "collecting",
            HarnessState::Done => "done",
            HarnessState::Failed => "failed",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, HarnessState::Done | HarnessState::Failed)
    }

    /// The only state reachable from `self` on success.
    const fn next(&self) -> Option<HarnessState> {
        match self {
            HarnessState::Idle => Some(HarnessState::FlavorDetected),
            HarnessState::FlavorDetected => Some(HarnessState::PlanBuilt),
            HarnessState::PlanBuilt => Some(HarnessState::Launching),
            HarnessState::Launching => Some(HarnessState::Launched),
            HarnessState::Launched => Some(HarnessState::Collecting),
            HarnessState::Collecting => Some(HarnessState::Done),
            HarnessState::Done | HarnessState::Failed => None,
        }
    }
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forward-only state tracker for a single run.
///
/// Every transition follows the fixed chain `Idle → … → Done`; `Failed` is reachable from any
/// non-terminal state. Nothing is re-entered.
#[derive(Debug)]
pub struct Lifecycle {
    state: HarnessState,
    history: Vec<HarnessState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: HarnessState::Idle,
            history: vec![HarnessState::Idle],
        }
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    /// States visited so far, in order.
    pub fn history(&self) -> &[HarnessState] {
        &self.history
    }

    /// Move to `to`, which must be the successor of the current state.
    pub fn advance(&mut self, to: HarnessState) -> Result<(), CoreError> {
        if self.state.next() != Some(to) {
            return Err(CoreError::IllegalTransition {
                from: self.state,
                to,
            });
        }
        self.enter(to);
        Ok(())
    }

    /// Abort the run. No-op once a terminal state is reached.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.enter(HarnessState::Failed);
        }
    }

    fn enter(&mut self, to: HarnessState) {
        debug!(from = %self.state, to = %to, "harness transition");
        self.state = to;
        self.history.push(to);
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
