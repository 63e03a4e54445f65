use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::workflows::loan::domain::{
    AadhaarDigits, ApplicationState, Collateral, FileAttachment, AADHAAR_LEN,
};
use crate::workflows::loan::submission::{
    SubmissionError, SubmissionPayload, SubmissionReceipt, SubmissionSink,
};
use crate::workflows::loan::verification::{simulated_identity, VerificationTarget};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 29).expect("valid date")
}

pub(super) fn full_digits(digit: u8) -> AadhaarDigits {
    let mut digits = AadhaarDigits::default();
    for slot in 0..AADHAAR_LEN {
        digits.set(slot, digit);
    }
    digits
}

pub(super) fn fill_loan(state: &mut ApplicationState) {
    state.set_loan_amount(30_000);
    state.loan.application_type = "Computer Training".to_string();
    state.loan.tenure_years = Some(3);
}

pub(super) fn verify_applicant(state: &mut ApplicationState) {
    state.apply_verified_identity(
        simulated_identity(VerificationTarget::Applicant),
        full_digits(4),
        today(),
    );
}

pub(super) fn verify_guarantor(state: &mut ApplicationState) {
    state.apply_verified_identity(
        simulated_identity(VerificationTarget::Guarantor),
        full_digits(7),
        today(),
    );
}

pub(super) fn fill_kyc_text(state: &mut ApplicationState) {
    state.kyc.pan = "ABCDE1234F".to_string();
    state.kyc.bank_name = "State Bank of India".to_string();
    state.kyc.account_number = "110025634401".to_string();
    state.kyc.confirm_account_number = "110025634401".to_string();
    state.kyc.ifsc_code = "SBIN0001234".to_string();
    state.kyc.account_holder_name = "Ramesh Kumar".to_string();
}

pub(super) fn fill_basic(state: &mut ApplicationState) {
    let basic = &mut state.basic;
    basic.first_name = "Ramesh".to_string();
    basic.last_name = "Kumar".to_string();
    basic.gender = "Male".to_string();
    basic.age = "36".to_string();
    basic.father_husband_name = "Mohan Kumar".to_string();
    basic.mother_full_name = "Sita Kumar".to_string();
    basic.basic_education = "12th".to_string();
    basic.mobile = "9812345678".to_string();
    basic.dob = "1990-05-14".to_string();
    basic.email = "ramesh.kumar@example.com".to_string();
}

pub(super) fn fill_address(state: &mut ApplicationState) {
    let current = &mut state.address.current;
    current.address = "12 Gandhi Road".to_string();
    current.city = "Pune".to_string();
    current.state = "Maharashtra".to_string();
    current.pincode = "411001".to_string();
    current.district = "Pune".to_string();
    current.taluka = "Haveli".to_string();
    state.address.same_as_current = true;
}

pub(super) fn fill_family(state: &mut ApplicationState) {
    let id = state.family_members.entries()[0].id;
    state.family_members.update(id, |member| {
        member.person_name = "Sunita Kumar".to_string();
        member.relation = "Spouse".to_string();
        member.age = "33".to_string();
        member.occupation = "Tailor".to_string();
    });
}

pub(super) fn fill_collateral(state: &mut ApplicationState) {
    state.collateral = Some(Collateral::Gold {
        weight: "20g".to_string(),
        purity: "22K".to_string(),
    });
}

pub(super) fn fill_guarantor_text(state: &mut ApplicationState) {
    let guarantor = &mut state.guarantor;
    guarantor.first_name = "Suresh".to_string();
    guarantor.last_name = "Patil".to_string();
    guarantor.relationship = "Friend".to_string();
    guarantor.mobile = "9876543210".to_string();
    guarantor.address = "45 Station Road, Nashik".to_string();
    guarantor.guarantee_amount = "30000".to_string();
}

pub(super) fn fill_witnesses(state: &mut ApplicationState) {
    let id = state.witnesses.entries()[0].id;
    state.witnesses.update(id, |witness| {
        witness.name = "Anil Joshi".to_string();
        witness.relation = "Neighbour".to_string();
        witness.contact = "9765432109".to_string();
    });
}

pub(super) fn fill_documents(state: &mut ApplicationState) {
    let id = state.documents.entries()[0].id;
    state.documents.update(id, |document| {
        document.document_type = "Ration Card".to_string();
        document.attachment = Some(FileAttachment {
            display_name: "ration-card.pdf".to_string(),
            handle: "picker://ration-card".to_string(),
        });
    });
}

pub(super) fn fill_vendor(state: &mut ApplicationState) {
    let vendor = &mut state.vendor;
    vendor.vendor_type = "Training Institute".to_string();
    vendor.vendor_name = "Skill Bridge Academy".to_string();
    vendor.vendor_contact = "020-24431234".to_string();
    vendor.vendor_address = "8 FC Road, Pune".to_string();
    vendor.vendor_pincode = "411004".to_string();
    vendor.amount_to_be_paid = "30000".to_string();
}

/// State that satisfies every step's gate.
pub(super) fn complete_state() -> ApplicationState {
    let mut state = ApplicationState::default();
    fill_loan(&mut state);
    verify_applicant(&mut state);
    fill_kyc_text(&mut state);
    fill_basic(&mut state);
    fill_address(&mut state);
    fill_family(&mut state);
    fill_collateral(&mut state);
    verify_guarantor(&mut state);
    fill_guarantor_text(&mut state);
    fill_witnesses(&mut state);
    fill_documents(&mut state);
    fill_vendor(&mut state);
    state
}

#[derive(Default, Clone)]
pub(super) struct MemorySink {
    payloads: Arc<Mutex<Vec<SubmissionPayload>>>,
}

impl MemorySink {
    pub(super) fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().expect("lock").clone()
    }
}

impl SubmissionSink for MemorySink {
    fn accept(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        let receipt = SubmissionReceipt {
            reference: payload.reference.clone(),
        };
        self.payloads.lock().expect("lock").push(payload);
        Ok(receipt)
    }
}

/// Sink that always refuses, for error-path coverage.
#[derive(Default, Clone)]
pub(super) struct RefusingSink;

impl SubmissionSink for RefusingSink {
    fn accept(&self, _payload: SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        Err(SubmissionError::Unavailable("maintenance window".to_string()))
    }
}
