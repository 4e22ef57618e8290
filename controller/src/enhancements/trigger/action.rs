use std::time::{
    Duration,
    Instant,
};

use crate::input::{
    InputError,
    PointerInput,
};

/// Upper bound for every phase delay.
pub const MAX_ACTION_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Idle,
    PreDelay,
    Held,
    PostDelay,
}

/// Timed press, hold and release sequence advanced once per frame.
///
/// `wait(delay) -> press -> wait(delay) -> release -> wait(delay)`
/// Each tick performs at most one transition. Input failures abort the
/// sequence and are never reported to the caller.
#[derive(Debug)]
pub struct ActionTrigger {
    phase: ActionPhase,
    delay: Duration,
    deadline: Instant,
}

impl ActionTrigger {
    pub fn new() -> Self {
        Self {
            phase: ActionPhase::Idle,
            delay: Duration::ZERO,
            deadline: Instant::now(),
        }
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase != ActionPhase::Idle
    }

    /// Start a new sequence if the target has been acquired.
    /// Acquisitions while a sequence is running are ignored.
    pub fn maybe_fire(&mut self, target_acquired: bool, delay: Duration, now: Instant) -> bool {
        if !target_acquired || self.is_running() {
            return false;
        }

        self.delay = delay.min(MAX_ACTION_DELAY);
        log::trace!("Target acquired. Firing in {:?}", self.delay);
        self.enter(ActionPhase::PreDelay, now);
        true
    }

    fn enter(&mut self, phase: ActionPhase, now: Instant) {
        self.phase = phase;
        self.deadline = now.checked_add(self.delay).unwrap_or(now);
    }

    fn abort(&mut self, action: &str, error: InputError) {
        match error {
            InputError::Unsupported => log::trace!("Pointer {} unsupported: {}", action, error),
            error => log::debug!("Pointer {} failed: {}", action, error),
        }
        self.phase = ActionPhase::Idle;
    }

    pub fn tick(&mut self, now: Instant, pointer: &dyn PointerInput) {
        if self.phase == ActionPhase::Idle || now < self.deadline {
            return;
        }

        match self.phase {
            ActionPhase::Idle => {}
            ActionPhase::PreDelay => match pointer.press() {
                Ok(()) => self.enter(ActionPhase::Held, now),
                Err(error) => self.abort("press", error),
            },
            ActionPhase::Held => match pointer.release() {
                Ok(()) => self.enter(ActionPhase::PostDelay, now),
                Err(error) => self.abort("release", error),
            },
            ActionPhase::PostDelay => self.phase = ActionPhase::Idle,
        }
    }
}

impl Default for ActionTrigger {
    fn default() -> Self {
        Self::new()
    }
}
