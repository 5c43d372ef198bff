#[cfg(test)]
#[path = "stepper_test.rs"]
mod tests;

use crate::domain::models::RunOutcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Idle,
    Running,
    Completed,
}

/// Tracks progress through a list of instructions.
///
/// A step goes idle -> running when it's started, and running -> completed
/// when its run finishes normally. "Next Step" moves a completed step on to the
/// following one. When executing all steps the index advances on every
/// completed run until the list is exhausted or a run doesn't complete.
#[derive(Clone, Debug)]
pub struct Stepper {
    current: usize,
    count: usize,
    state: StepState,
    execute_all: bool,
}

impl Stepper {
    pub fn new(count: usize) -> Stepper {
        return Stepper {
            current: 0,
            count,
            state: StepState::Idle,
            execute_all: false,
        };
    }

    pub fn current(&self) -> usize {
        return self.current;
    }

    pub fn count(&self) -> usize {
        return self.count;
    }

    pub fn state(&self) -> StepState {
        return self.state;
    }

    pub fn is_completed(&self) -> bool {
        return self.state == StepState::Completed;
    }

    pub fn is_executing_all(&self) -> bool {
        return self.execute_all;
    }

    pub fn is_exhausted(&self) -> bool {
        return self.current >= self.count;
    }

    /// Starts the current step, returning its index.
    pub fn start(&mut self) -> Option<usize> {
        if self.state == StepState::Running || self.is_exhausted() {
            return None;
        }

        self.state = StepState::Running;
        return Some(self.current);
    }

    /// Starts the current step and keeps going through the remaining ones.
    pub fn start_all(&mut self) -> Option<usize> {
        let res = self.start();
        if res.is_some() {
            self.execute_all = true;
        }

        return res;
    }

    /// Records how the running step ended. Returns the index of the next step
    /// to run when executing all steps.
    pub fn finish(&mut self, outcome: &RunOutcome) -> Option<usize> {
        if self.state != StepState::Running {
            return None;
        }

        if let RunOutcome::Completed(_) = outcome {
            if !self.execute_all {
                self.state = StepState::Completed;
                return None;
            }

            self.current += 1;
            if self.is_exhausted() {
                self.state = StepState::Idle;
                self.execute_all = false;
                return None;
            }

            return Some(self.current);
        }

        self.state = StepState::Idle;
        self.execute_all = false;
        return None;
    }

    /// Lets the running step finish without moving on to the following ones.
    pub fn cancel_all(&mut self) {
        self.execute_all = false;
    }

    /// Drops a step that was started but never ran.
    pub fn abandon(&mut self) {
        if self.state == StepState::Running {
            self.state = StepState::Idle;
        }
        self.execute_all = false;
    }

    pub fn can_next(&self) -> bool {
        return self.state == StepState::Completed && self.current + 1 < self.count;
    }

    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }

        self.current += 1;
        self.state = StepState::Idle;
        return true;
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.state = StepState::Idle;
        self.execute_all = false;
    }

    /// Replaces the instruction count, going back to the first step.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.reset();
    }
}
