use super::common::*;
use crate::workflows::loan::domain::{ApplicationState, WizardStep};
use crate::workflows::loan::instance::{LoanWizardInstance, WizardError};
use crate::workflows::loan::submission::SubmissionError;
use crate::workflows::loan::validation::GateFailure;
use crate::workflows::loan::verification::{DigitEntry, VerificationPhase, VerificationTarget};

fn wizard_with(fill: impl FnOnce(&mut ApplicationState)) -> LoanWizardInstance {
    let mut wizard = LoanWizardInstance::default();
    fill(wizard.state_mut());
    wizard
}

/// Drive a target's verification end to end through the instance API,
/// bypassing the timer by completing the ticket directly.
fn verify_through_flow(wizard: &mut LoanWizardInstance, target: VerificationTarget) {
    let mut ticket = None;
    for digit in "123456789012".chars() {
        match wizard
            .enter_digit(target, &digit.to_string())
            .expect("digit accepted")
        {
            DigitEntry::BeganValidating(issued) => ticket = Some(issued),
            DigitEntry::Accepted { .. } => {}
            other => panic!("unexpected entry outcome {other:?}"),
        }
    }
    let ticket = ticket.expect("twelve digits issue a ticket");
    wizard.complete_validation(ticket).expect("ticket live");
    wizard.set_otp(target, "482913").expect("prompt open");
    wizard.submit_otp(target, today()).expect("otp accepted");
}

#[test]
fn advance_refused_until_gate_passes() {
    let mut wizard = LoanWizardInstance::default();
    assert_eq!(
        wizard.advance(),
        Err(GateFailure {
            step: WizardStep::Loan
        })
    );
    assert_eq!(wizard.step(), WizardStep::Loan, "step unchanged on failure");

    wizard.set_loan_amount(30_000);
    wizard.state_mut().loan.application_type = "Computer Training".to_string();
    wizard.state_mut().loan.tenure_years = Some(3);
    assert_eq!(wizard.advance(), Ok(WizardStep::Kyc));
}

#[test]
fn advance_matches_gate_for_every_step() {
    // With a fully satisfied state the wizard walks 1 through 10.
    let mut wizard = wizard_with(|state| *state = complete_state());
    for expected in WizardStep::ALL.iter().skip(1) {
        assert_eq!(wizard.advance(), Ok(*expected));
    }
    assert_eq!(wizard.step(), WizardStep::Vendor);

    // Advancing at the final step is a no-op rather than an overflow.
    assert_eq!(wizard.advance(), Ok(WizardStep::Vendor));
}

#[test]
fn retreat_is_always_permitted() {
    let mut wizard = wizard_with(|state| *state = complete_state());
    wizard.advance().expect("gate passes");
    wizard.advance().expect("gate passes");
    assert_eq!(wizard.step(), WizardStep::Basic);

    // Break the earlier step's gate; retreat must still work.
    wizard.state_mut().loan.application_type.clear();
    assert_eq!(wizard.retreat(), WizardStep::Kyc);
    assert_eq!(wizard.retreat(), WizardStep::Loan);
    assert_eq!(wizard.retreat(), WizardStep::Loan, "floor at the first step");
}

#[test]
fn otp_submission_verifies_and_prefills_atomically() {
    let mut wizard = LoanWizardInstance::default();
    verify_through_flow(&mut wizard, VerificationTarget::Applicant);

    let state = wizard.state();
    assert!(state.kyc.is_verified());
    assert!(state.kyc.aadhaar().is_complete());
    assert_eq!(state.basic.first_name, "Ramesh");
    assert_eq!(state.basic.dob, "1990-05-14");
    assert_eq!(state.basic.age, "36");
    assert_eq!(state.address.current.city, "Pune");
    assert_eq!(
        wizard.flow(VerificationTarget::Applicant).phase(),
        VerificationPhase::Verified
    );
}

#[test]
fn guarantor_verification_prefills_guarantor_record() {
    let mut wizard = LoanWizardInstance::default();
    verify_through_flow(&mut wizard, VerificationTarget::Guarantor);

    let state = wizard.state();
    assert!(state.guarantor.is_verified());
    assert_eq!(state.guarantor.first_name, "Suresh");
    assert_eq!(state.guarantor.email, "suresh.patil@example.com");
    assert!(!state.kyc.is_verified(), "applicant flow untouched");
}

#[test]
fn cancelled_ticket_cannot_complete_through_instance() {
    let mut wizard = LoanWizardInstance::default();
    let mut ticket = None;
    for digit in "123456789012".chars() {
        if let DigitEntry::BeganValidating(issued) = wizard
            .enter_digit(VerificationTarget::Applicant, &digit.to_string())
            .expect("digit accepted")
        {
            ticket = Some(issued);
        }
    }
    let ticket = ticket.expect("ticket issued");

    wizard.cancel_verification(VerificationTarget::Applicant);
    assert!(wizard.complete_validation(ticket).is_err());
    assert_eq!(
        wizard.flow(VerificationTarget::Applicant).phase(),
        VerificationPhase::Entering
    );
    assert!(!wizard.state().kyc.is_verified());
}

#[test]
fn submit_requires_final_step() {
    let wizard = wizard_with(|state| *state = complete_state());
    let sink = MemorySink::default();
    assert!(matches!(
        wizard.submit(&sink, today()),
        Err(WizardError::NotAtFinalStep)
    ));
    assert!(sink.payloads().is_empty());
}

#[test]
fn submit_hands_full_state_to_sink() {
    let mut wizard = wizard_with(|state| *state = complete_state());
    while wizard.step() != WizardStep::Vendor {
        wizard.advance().expect("all gates pass");
    }

    let sink = MemorySink::default();
    let receipt = wizard.submit(&sink, today()).expect("submission accepted");

    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].reference, receipt.reference);
    assert_eq!(payloads[0].submitted_on, today());
    assert_eq!(payloads[0].application, *wizard.state());
    assert!(receipt.reference.0.starts_with("loan-"));
}

#[test]
fn submit_blocked_by_final_gate() {
    let mut wizard = wizard_with(|state| *state = complete_state());
    while wizard.step() != WizardStep::Vendor {
        wizard.advance().expect("all gates pass");
    }
    wizard.state_mut().vendor.vendor_name.clear();

    let sink = MemorySink::default();
    assert!(matches!(
        wizard.submit(&sink, today()),
        Err(WizardError::Gate(GateFailure {
            step: WizardStep::Vendor
        }))
    ));
    assert!(sink.payloads().is_empty());
}

#[test]
fn submit_propagates_sink_failure() {
    let mut wizard = wizard_with(|state| *state = complete_state());
    while wizard.step() != WizardStep::Vendor {
        wizard.advance().expect("all gates pass");
    }

    match wizard.submit(&RefusingSink, today()) {
        Err(WizardError::Submission(SubmissionError::Unavailable(reason))) => {
            assert!(reason.contains("maintenance"));
        }
        other => panic!("expected sink failure, got {other:?}"),
    }
}

#[test]
fn references_are_unique_across_submissions() {
    let sink = MemorySink::default();
    let mut references = Vec::new();
    for _ in 0..3 {
        let mut wizard = wizard_with(|state| *state = complete_state());
        while wizard.step() != WizardStep::Vendor {
            wizard.advance().expect("all gates pass");
        }
        let receipt = wizard.submit(&sink, today()).expect("accepted");
        references.push(receipt.reference);
    }
    let distinct: std::collections::BTreeSet<_> =
        references.iter().map(|reference| reference.0.clone()).collect();
    assert_eq!(distinct.len(), 3);
}

#[test]
fn snapshot_reflects_cursor() {
    let mut wizard = wizard_with(|state| *state = complete_state());
    let first = wizard.snapshot();
    assert_eq!(first.step, 1);
    assert_eq!(first.total_steps, 10);
    assert!(!first.can_retreat);
    assert!(!first.at_final_step);

    while wizard.step() != WizardStep::Vendor {
        wizard.advance().expect("all gates pass");
    }
    let last = wizard.snapshot();
    assert_eq!(last.step, 10);
    assert!(last.can_retreat);
    assert!(last.at_final_step);
}

#[test]
fn step_progress_marks_satisfied_gates() {
    let mut wizard = LoanWizardInstance::default();
    fill_vendor(wizard.state_mut());

    let progress = wizard.step_progress();
    assert_eq!(progress.len(), 10);
    assert!(progress[0].active);
    assert!(!progress[0].satisfied);
    assert!(progress[9].satisfied, "vendor gate satisfied out of order");
}

#[tokio::test(start_paused = true)]
async fn validation_delay_round_trip_through_instance() {
    let mut wizard = LoanWizardInstance::default();
    let mut ticket = None;
    for digit in "123456789012".chars() {
        if let DigitEntry::BeganValidating(issued) = wizard
            .enter_digit(VerificationTarget::Applicant, &digit.to_string())
            .expect("digit accepted")
        {
            ticket = Some(issued);
        }
    }
    let delay = wizard.begin_validation_delay(ticket.expect("ticket issued"));

    tokio::time::advance(std::time::Duration::from_millis(1001)).await;
    let fired = delay.ticket().await.expect("timer fired");
    wizard.complete_validation(fired).expect("ticket live");
    assert_eq!(
        wizard.flow(VerificationTarget::Applicant).phase(),
        VerificationPhase::AwaitingOtp
    );
}
