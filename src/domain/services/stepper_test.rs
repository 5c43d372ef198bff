use super::StepState;
use super::Stepper;
use crate::domain::models::RunOutcome;

fn completed() -> RunOutcome {
    return RunOutcome::Completed(vec![]);
}

#[test]
fn it_starts_idle_at_the_first_step() {
    let stepper = Stepper::new(3);

    assert_eq!(stepper.current(), 0);
    assert_eq!(stepper.state(), StepState::Idle);
    assert!(!stepper.is_completed());
    assert!(!stepper.can_next());
}

#[test]
fn it_completes_a_single_step() {
    let mut stepper = Stepper::new(3);

    assert_eq!(stepper.start(), Some(0));
    assert_eq!(stepper.state(), StepState::Running);
    assert_eq!(stepper.start(), None);

    assert_eq!(stepper.finish(&completed()), None);
    assert!(stepper.is_completed());
    assert!(stepper.can_next());

    assert!(stepper.next());
    assert_eq!(stepper.current(), 1);
    assert_eq!(stepper.state(), StepState::Idle);
}

#[test]
fn it_disables_next_on_the_last_step() {
    let mut stepper = Stepper::new(2);
    stepper.start();
    stepper.finish(&completed());
    stepper.next();

    stepper.start();
    stepper.finish(&completed());

    assert_eq!(stepper.current(), 1);
    assert!(stepper.is_completed());
    assert!(!stepper.can_next());
    assert!(!stepper.next());
    assert_eq!(stepper.current(), 1);
}

#[test]
fn it_disables_next_until_the_step_completes() {
    let mut stepper = Stepper::new(2);
    assert!(!stepper.next());

    stepper.start();
    assert!(!stepper.next());
    assert_eq!(stepper.current(), 0);
}

#[test]
fn it_executes_all_remaining_steps() {
    let mut stepper = Stepper::new(3);

    assert_eq!(stepper.start_all(), Some(0));
    assert_eq!(stepper.finish(&completed()), Some(1));
    assert_eq!(stepper.state(), StepState::Running);
    assert_eq!(stepper.finish(&completed()), Some(2));
    assert_eq!(stepper.finish(&completed()), None);

    assert_eq!(stepper.current(), 3);
    assert!(stepper.is_exhausted());
    assert_eq!(stepper.state(), StepState::Idle);
    assert!(!stepper.is_executing_all());
    assert_eq!(stepper.start(), None);
}

#[test]
fn it_stops_executing_all_on_a_failed_step() {
    let mut stepper = Stepper::new(3);

    stepper.start_all();
    assert_eq!(stepper.finish(&completed()), Some(1));
    assert_eq!(
        stepper.finish(&RunOutcome::Failed("boom".to_string())),
        None
    );

    assert_eq!(stepper.current(), 1);
    assert_eq!(stepper.state(), StepState::Idle);
    assert!(!stepper.is_executing_all());
}

#[test]
fn it_stops_executing_all_on_cancel() {
    let mut stepper = Stepper::new(3);

    stepper.start_all();
    assert_eq!(stepper.finish(&RunOutcome::Cancelled), None);

    assert_eq!(stepper.current(), 0);
    assert_eq!(stepper.state(), StepState::Idle);
}

#[test]
fn it_ignores_finish_when_nothing_runs() {
    let mut stepper = Stepper::new(3);

    assert_eq!(stepper.finish(&completed()), None);
    assert_eq!(stepper.state(), StepState::Idle);
}

#[test]
fn it_resets_on_new_instructions() {
    let mut stepper = Stepper::new(3);
    stepper.start();
    stepper.finish(&completed());
    stepper.next();

    stepper.set_count(5);

    assert_eq!(stepper.current(), 0);
    assert_eq!(stepper.count(), 5);
    assert_eq!(stepper.state(), StepState::Idle);
}

#[test]
fn it_never_starts_without_instructions() {
    let mut stepper = Stepper::new(0);

    assert_eq!(stepper.start(), None);
    assert_eq!(stepper.start_all(), None);
    assert!(!stepper.is_executing_all());
}

#[test]
fn it_completes_the_running_step_after_cancelling_all() {
    let mut stepper = Stepper::new(3);
    stepper.start_all();

    stepper.cancel_all();

    assert_eq!(stepper.finish(&completed()), None);
    assert_eq!(stepper.current(), 0);
    assert!(stepper.is_completed());
    assert!(!stepper.is_executing_all());
}

#[test]
fn it_abandons_a_step_that_never_ran() {
    let mut stepper = Stepper::new(3);
    stepper.start_all();

    stepper.abandon();

    assert_eq!(stepper.state(), StepState::Idle);
    assert!(!stepper.is_executing_all());
    assert_eq!(stepper.current(), 0);
}
