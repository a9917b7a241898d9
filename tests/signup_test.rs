//! Tests for the signup stepper state machine

use rstest::rstest;

use orgtree::domain::signup::{SignupFormValues, MIN_PASSWORD_LEN};
use orgtree::domain::{DomainError, SignupStep, SignupStepper, StepOutcome, Term, TurnstileState};

fn filled() -> SignupFormValues {
    SignupFormValues {
        name: "홍길동".into(),
        email: "hong@example.com".into(),
        password: "correct-horse".into(),
        referral_code: None,
    }
}

#[rstest]
#[case("", "a@b.c", "longenough")]
#[case("Kim", "", "longenough")]
#[case("Kim", "a@b.c", "short")]
fn given_incomplete_details_when_advancing_then_step_not_ready(
    #[case] name: &str,
    #[case] email: &str,
    #[case] password: &str,
) {
    let mut stepper = SignupStepper::new(SignupStep::Details);
    stepper.values = SignupFormValues {
        name: name.into(),
        email: email.into(),
        password: password.into(),
        referral_code: None,
    };

    let err = stepper.next().unwrap_err();

    assert_eq!(err, DomainError::StepNotReady(SignupStep::Details));
    assert_eq!(stepper.step(), SignupStep::Details);
}

#[test]
fn given_password_at_minimum_length_when_advancing_then_accepted() {
    let mut stepper = SignupStepper::default();
    stepper.values = SignupFormValues {
        password: "x".repeat(MIN_PASSWORD_LEN),
        ..filled()
    };

    assert_eq!(
        stepper.next().unwrap(),
        StepOutcome::Advanced(SignupStep::Agreements)
    );
}

#[test]
fn given_only_optional_term_when_advancing_agreements_then_blocked() {
    let mut stepper = SignupStepper::new(SignupStep::Agreements);
    stepper.set_agreement(Term::Marketing, true);
    stepper.set_agreement(Term::Service, true);

    assert!(!stepper.all_required_checked());
    assert!(stepper.next().is_err());

    stepper.set_agreement(Term::Privacy, true);
    assert!(stepper.all_selected());
    assert_eq!(
        stepper.next().unwrap(),
        StepOutcome::Advanced(SignupStep::Verification)
    );
}

#[test]
fn given_toggle_all_when_toggled_off_then_nothing_selected() {
    let mut stepper = SignupStepper::new(SignupStep::Agreements);
    stepper.toggle_all(true);
    assert!(stepper.all_selected());

    stepper.toggle_all(false);

    assert!(!stepper.all_required_checked());
}

#[test]
fn given_verification_success_when_starting_again_then_stays_success() {
    let mut stepper = SignupStepper::new(SignupStep::Verification);
    stepper.start_verification();
    assert_eq!(stepper.turnstile(), TurnstileState::Loading);

    stepper.verification_succeeded();
    stepper.start_verification();

    assert_eq!(stepper.turnstile(), TurnstileState::Success);
}

#[test]
fn given_failed_verification_when_retrying_then_back_to_idle() {
    let mut stepper = SignupStepper::new(SignupStep::Verification);
    stepper.verification_failed();
    assert!(stepper.next().is_err());

    stepper.retry_verification();

    assert_eq!(stepper.turnstile(), TurnstileState::Idle);
    assert_eq!(stepper.turnstile().message(), "보안 확인을 완료해주세요.");
}

#[test]
fn given_complete_flow_when_finishing_then_submission_carries_values() {
    let mut stepper = SignupStepper::default();
    stepper.values = filled();
    stepper.next().unwrap();
    stepper.toggle_all(true);
    stepper.next().unwrap();
    stepper.verification_succeeded();

    let outcome = stepper.next().unwrap();

    match outcome {
        StepOutcome::Completed(submission) => {
            assert_eq!(submission.values, filled());
            assert_eq!(submission.agreements.get(&Term::Marketing), Some(&true));
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(stepper.step(), SignupStep::Verification);
}

#[test]
fn given_first_step_when_going_back_then_clamped() {
    let mut stepper = SignupStepper::new(SignupStep::Verification);

    assert_eq!(stepper.previous(), SignupStep::Agreements);
    assert_eq!(stepper.previous(), SignupStep::Details);
    assert_eq!(stepper.previous(), SignupStep::Details);
}
