//! Per-step validation gates.
//!
//! One pure predicate per wizard step, evaluated against the slice of
//! application state the step owns. The wizard refuses forward navigation
//! while the active step's gate fails; retreat is never gated.

use tracing::debug;

use super::domain::{ApplicationState, Collateral, WizardStep, LOAN_AMOUNT_CEILING};

/// Forward navigation refused. The portal shows one generic notice rather
/// than enumerating fields, matching the established form behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("step {index} ({label}): fill all required fields before continuing", index = .step.index(), label = .step.label())]
pub struct GateFailure {
    pub step: WizardStep,
}

/// Evaluate the gate for `step` against the current state.
pub fn evaluate(step: WizardStep, state: &ApplicationState) -> Result<(), GateFailure> {
    let pass = match step {
        WizardStep::Loan => loan_gate(state),
        WizardStep::Kyc => kyc_gate(state),
        WizardStep::Basic => basic_gate(state),
        WizardStep::Address => address_gate(state),
        WizardStep::Family => family_gate(state),
        WizardStep::Collateral => collateral_gate(state),
        WizardStep::Guarantor => guarantor_gate(state),
        WizardStep::Witnesses => witnesses_gate(state),
        WizardStep::Documents => documents_gate(state),
        WizardStep::Vendor => vendor_gate(state),
    };

    if pass {
        Ok(())
    } else {
        debug!(step = step.index(), "gate refused forward navigation");
        Err(GateFailure { step })
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn loan_gate(state: &ApplicationState) -> bool {
    let loan = &state.loan;
    loan.amount > 0
        && loan.amount <= LOAN_AMOUNT_CEILING
        && loan.amount_error.is_none()
        && filled(&loan.application_type)
        && loan.tenure_years.is_some()
}

fn kyc_gate(state: &ApplicationState) -> bool {
    let kyc = &state.kyc;
    kyc.aadhaar().is_complete()
        && kyc.is_verified()
        && filled(&kyc.pan)
        && filled(&kyc.bank_name)
        && filled(&kyc.account_number)
        && filled(&kyc.confirm_account_number)
        && filled(&kyc.ifsc_code)
        && filled(&kyc.account_holder_name)
        && kyc.account_number == kyc.confirm_account_number
}

fn basic_gate(state: &ApplicationState) -> bool {
    let basic = &state.basic;
    [
        &basic.first_name,
        &basic.last_name,
        &basic.gender,
        &basic.age,
        &basic.father_husband_name,
        &basic.mother_full_name,
        &basic.basic_education,
        &basic.mobile,
        &basic.dob,
        &basic.email,
    ]
    .into_iter()
    .all(|field| filled(field))
}

fn address_gate(state: &ApplicationState) -> bool {
    let address = &state.address;
    address.current.is_complete() && (address.same_as_current || address.permanent.is_complete())
}

fn family_gate(state: &ApplicationState) -> bool {
    state.family_members.fields().any(|member| {
        filled(&member.person_name)
            && filled(&member.relation)
            && filled(&member.age)
            && filled(&member.occupation)
    })
}

fn collateral_gate(state: &ApplicationState) -> bool {
    state
        .collateral
        .as_ref()
        .is_some_and(Collateral::is_complete)
}

fn guarantor_gate(state: &ApplicationState) -> bool {
    let guarantor = &state.guarantor;
    guarantor.aadhaar().is_complete()
        && guarantor.is_verified()
        && filled(&guarantor.first_name)
        && filled(&guarantor.last_name)
        && filled(&guarantor.relationship)
        && filled(&guarantor.mobile)
        && filled(&guarantor.address)
        && filled(&guarantor.guarantee_amount)
}

fn witnesses_gate(state: &ApplicationState) -> bool {
    state
        .witnesses
        .fields()
        .any(|witness| filled(&witness.name) && filled(&witness.relation) && filled(&witness.contact))
}

fn documents_gate(state: &ApplicationState) -> bool {
    state
        .documents
        .fields()
        .any(|document| filled(&document.document_type) && document.attachment.is_some())
}

fn vendor_gate(state: &ApplicationState) -> bool {
    let vendor = &state.vendor;
    [
        &vendor.vendor_type,
        &vendor.vendor_name,
        &vendor.vendor_contact,
        &vendor.vendor_address,
        &vendor.vendor_pincode,
        &vendor.amount_to_be_paid,
    ]
    .into_iter()
    .all(|field| filled(field))
}
