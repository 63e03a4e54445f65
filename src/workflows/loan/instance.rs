//! The wizard controller: one instance per application session.
//!
//! Owns the application state, the step cursor, and the two verification
//! flows. Forward navigation is gate-checked, retreat is unconditional, and
//! submit is only honored at the final step with its gate passing.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::domain::{ApplicationState, WizardStep};
use super::submission::{
    next_application_reference, SubmissionError, SubmissionPayload, SubmissionReceipt,
    SubmissionSink,
};
use super::validation::{self, GateFailure};
use super::verification::{
    DigitEntry, ValidationDelay, ValidationTicket, VerificationError, VerificationFlow,
    VerificationTarget,
};
use crate::config::WizardConfig;

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("submission is only offered at the final step")]
    NotAtFinalStep,
    #[error(transparent)]
    Gate(#[from] GateFailure),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Read model for the step tracker.
#[derive(Debug, Clone, Serialize)]
pub struct StepProgressView {
    pub index: u8,
    pub label: &'static str,
    pub active: bool,
    pub satisfied: bool,
}

/// Read model for the shell rendering the wizard chrome.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub step: u8,
    pub step_label: &'static str,
    pub total_steps: u8,
    pub can_retreat: bool,
    pub at_final_step: bool,
}

#[derive(Debug)]
pub struct LoanWizardInstance {
    step: WizardStep,
    state: ApplicationState,
    applicant: VerificationFlow,
    guarantor: VerificationFlow,
    config: WizardConfig,
}

impl LoanWizardInstance {
    pub fn new(config: WizardConfig) -> Self {
        Self {
            step: WizardStep::FIRST,
            state: ApplicationState::default(),
            applicant: VerificationFlow::new(VerificationTarget::Applicant, config.notice_ttl),
            guarantor: VerificationFlow::new(VerificationTarget::Guarantor, config.notice_ttl),
            config,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    /// Open write access for plain form fields. State the input layer must
    /// not fake (verification flags, Aadhaar digits, roster ids) sits behind
    /// private fields and is untouchable from here.
    pub fn state_mut(&mut self) -> &mut ApplicationState {
        &mut self.state
    }

    pub fn set_loan_amount(&mut self, amount: u32) {
        self.state.set_loan_amount(amount);
    }

    /// Gate-checked forward navigation; the step is unchanged on failure.
    pub fn advance(&mut self) -> Result<WizardStep, GateFailure> {
        validation::evaluate(self.step, &self.state)?;

        if let Some(next) = self.step.next() {
            info!(from = self.step.index(), to = next.index(), "wizard advanced");
            self.step = next;
        }
        Ok(self.step)
    }

    /// Backward navigation is always permitted.
    pub fn retreat(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    pub fn flow(&self, target: VerificationTarget) -> &VerificationFlow {
        match target {
            VerificationTarget::Applicant => &self.applicant,
            VerificationTarget::Guarantor => &self.guarantor,
        }
    }

    fn flow_mut(&mut self, target: VerificationTarget) -> &mut VerificationFlow {
        match target {
            VerificationTarget::Applicant => &mut self.applicant,
            VerificationTarget::Guarantor => &mut self.guarantor,
        }
    }

    /// Feed one Aadhaar keystroke into the target's flow.
    pub fn enter_digit(
        &mut self,
        target: VerificationTarget,
        raw: &str,
    ) -> Result<DigitEntry, VerificationError> {
        self.flow_mut(target).enter_digit(raw)
    }

    pub fn backspace(&mut self, target: VerificationTarget) -> Result<(), VerificationError> {
        self.flow_mut(target).backspace()
    }

    /// Start the simulated provider round trip for a freshly issued ticket.
    pub fn begin_validation_delay(&self, ticket: ValidationTicket) -> ValidationDelay {
        ValidationDelay::start(ticket, self.config.validation_delay)
    }

    /// Apply the delayed provider response; stale tickets are refused.
    pub fn complete_validation(
        &mut self,
        ticket: ValidationTicket,
    ) -> Result<(), VerificationError> {
        self.flow_mut(ticket.target()).complete_validation(ticket)
    }

    pub fn set_otp(
        &mut self,
        target: VerificationTarget,
        raw: &str,
    ) -> Result<(), VerificationError> {
        self.flow_mut(target).set_otp(raw)
    }

    /// Accept the OTP and merge the verified identity into the application
    /// state. Flag and prefill land in this one call; there is no state in
    /// which `is_verified` is true but the prefill has not happened.
    pub fn submit_otp(
        &mut self,
        target: VerificationTarget,
        today: NaiveDate,
    ) -> Result<(), VerificationError> {
        let flow = self.flow_mut(target);
        let identity = flow.submit_otp()?;
        let digits = *flow.digits();
        self.state.apply_verified_identity(identity, digits, today);
        info!(flow = target.label(), "identity verified and prefilled");
        Ok(())
    }

    /// Abandon the target's verification attempt. Any pending validation
    /// delay for it is invalidated even if its timer still fires.
    pub fn cancel_verification(&mut self, target: VerificationTarget) {
        self.flow_mut(target).cancel();
    }

    /// Hand the assembled application to the submission collaborator. Only
    /// offered at step 10 and gated by that step's predicate; the session is
    /// done once a receipt comes back.
    pub fn submit(
        &self,
        sink: &dyn SubmissionSink,
        today: NaiveDate,
    ) -> Result<SubmissionReceipt, WizardError> {
        if self.step != WizardStep::LAST {
            return Err(WizardError::NotAtFinalStep);
        }
        validation::evaluate(self.step, &self.state)?;

        let reference = next_application_reference();
        let receipt = sink.accept(SubmissionPayload {
            reference: reference.clone(),
            submitted_on: today,
            application: self.state.clone(),
        })?;
        info!(reference = %reference.0, "application submitted");
        Ok(receipt)
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step.index(),
            step_label: self.step.label(),
            total_steps: WizardStep::LAST.index(),
            can_retreat: self.step.previous().is_some(),
            at_final_step: self.step == WizardStep::LAST,
        }
    }

    /// Gate status for every step, for the tracker rail.
    pub fn step_progress(&self) -> Vec<StepProgressView> {
        WizardStep::ALL
            .iter()
            .map(|step| StepProgressView {
                index: step.index(),
                label: step.label(),
                active: *step == self.step,
                satisfied: validation::evaluate(*step, &self.state).is_ok(),
            })
            .collect()
    }
}

impl Default for LoanWizardInstance {
    fn default() -> Self {
        Self::new(WizardConfig::default())
    }
}
