//! Three-step signup flow: details, agreements, verification.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::error::{DomainError, DomainResult};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum SignupStep {
    #[default]
    Details = 1,
    Agreements = 2,
    Verification = 3,
}

impl SignupStep {
    pub const ALL: [SignupStep; 3] = [
        SignupStep::Details,
        SignupStep::Agreements,
        SignupStep::Verification,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignupStep::Details => "정보 입력",
            SignupStep::Agreements => "약관 동의",
            SignupStep::Verification => "보안 인증",
        }
    }

    fn next(&self) -> Option<SignupStep> {
        match self {
            SignupStep::Details => Some(SignupStep::Agreements),
            SignupStep::Agreements => Some(SignupStep::Verification),
            SignupStep::Verification => None,
        }
    }

    fn previous(&self) -> SignupStep {
        match self {
            SignupStep::Details | SignupStep::Agreements => SignupStep::Details,
            SignupStep::Verification => SignupStep::Agreements,
        }
    }
}

impl fmt::Display for SignupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Term {
    Service,
    Privacy,
    Marketing,
}

impl Term {
    pub const ALL: [Term; 3] = [Term::Service, Term::Privacy, Term::Marketing];

    pub fn is_required(&self) -> bool {
        match self {
            Term::Service | Term::Privacy => true,
            Term::Marketing => false,
        }
    }
}

/// Human verification widget state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TurnstileState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl TurnstileState {
    pub fn message(&self) -> &'static str {
        match self {
            TurnstileState::Idle => "보안 확인을 완료해주세요.",
            TurnstileState::Loading => "보안 검증 중입니다…",
            TurnstileState::Success => "보안 검증이 완료되었습니다.",
            TurnstileState::Error => "보안 검증에 실패했습니다. 다시 시도해주세요.",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignupFormValues {
    pub name: String,
    pub email: String,
    pub password: String,
    pub referral_code: Option<String>,
}

/// Collected values handed out when the final step completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupSubmission {
    pub values: SignupFormValues,
    pub agreements: BTreeMap<Term, bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced(SignupStep),
    Completed(SignupSubmission),
}

#[derive(Debug, Clone, Default)]
pub struct SignupStepper {
    step: SignupStep,
    pub values: SignupFormValues,
    agreements: BTreeMap<Term, bool>,
    turnstile: TurnstileState,
}

impl SignupStepper {
    pub fn new(initial: SignupStep) -> Self {
        Self {
            step: initial,
            ..Self::default()
        }
    }

    pub fn step(&self) -> SignupStep {
        self.step
    }

    pub fn turnstile(&self) -> TurnstileState {
        self.turnstile
    }

    pub fn set_agreement(&mut self, term: Term, accepted: bool) {
        self.agreements.insert(term, accepted);
    }

    pub fn toggle_all(&mut self, accepted: bool) {
        for term in Term::ALL {
            self.agreements.insert(term, accepted);
        }
    }

    fn accepted(&self, term: Term) -> bool {
        self.agreements.get(&term).copied().unwrap_or(false)
    }

    pub fn all_required_checked(&self) -> bool {
        Term::ALL
            .iter()
            .filter(|t| t.is_required())
            .all(|t| self.accepted(*t))
    }

    pub fn all_selected(&self) -> bool {
        Term::ALL.iter().all(|t| self.accepted(*t))
    }

    /// Moves to `Loading` unless verification already succeeded.
    pub fn start_verification(&mut self) {
        if self.turnstile != TurnstileState::Success {
            self.turnstile = TurnstileState::Loading;
        }
    }

    pub fn verification_succeeded(&mut self) {
        self.turnstile = TurnstileState::Success;
    }

    pub fn verification_failed(&mut self) {
        self.turnstile = TurnstileState::Error;
    }

    pub fn retry_verification(&mut self) {
        self.turnstile = TurnstileState::Idle;
    }

    pub fn can_proceed(&self) -> bool {
        match self.step {
            SignupStep::Details => {
                !self.values.name.is_empty()
                    && !self.values.email.is_empty()
                    && self.values.password.chars().count() >= MIN_PASSWORD_LEN
            }
            SignupStep::Agreements => self.all_required_checked(),
            SignupStep::Verification => self.turnstile == TurnstileState::Success,
        }
    }

    pub fn next(&mut self) -> DomainResult<StepOutcome> {
        if !self.can_proceed() {
            return Err(DomainError::StepNotReady(self.step));
        }
        match self.step.next() {
            Some(step) => {
                self.step = step;
                Ok(StepOutcome::Advanced(step))
            }
            None => Ok(StepOutcome::Completed(SignupSubmission {
                values: self.values.clone(),
                agreements: self.agreements.clone(),
            })),
        }
    }

    pub fn previous(&mut self) -> SignupStep {
        self.step = self.step.previous();
        self.step
    }
}
