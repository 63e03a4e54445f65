//! Multi-step loan application wizard.
//!
//! The modules mirror the moving parts of the form: keystroke sanitizers,
//! rosters for repeatable sub-records, the per-target identity verification
//! flow, the per-step validation gates, and the instance that strings them
//! together for one application session.

pub mod domain;
mod instance;
pub mod roster;
pub mod sanitize;
pub mod submission;
pub mod validation;
pub mod verification;

#[cfg(test)]
mod tests;

pub use domain::{
    AadhaarDigits, AddressDetails, AddressFields, ApplicantIdentity, ApplicationState,
    BasicDetails, Collateral, Document, FamilyMember, FieldError, FileAttachment,
    GuarantorDetails, GuarantorIdentity, KycDetails, LoanDetails, VendorDetails, VerifiedIdentity,
    Witness, WizardStep, AADHAAR_LEN, LOAN_AMOUNT_CEILING,
};
pub use instance::{LoanWizardInstance, StepProgressView, WizardError, WizardSnapshot};
pub use roster::{EntryId, Roster, RosterEntry, RosterError};
pub use sanitize::{DigitKeystroke, FormatNotice};
pub use submission::{
    ApplicationReference, SubmissionError, SubmissionPayload, SubmissionReceipt, SubmissionSink,
};
pub use validation::GateFailure;
pub use verification::{
    DigitEntry, ValidationDelay, ValidationTicket, VerificationError, VerificationFlow,
    VerificationPhase, VerificationTarget, OTP_LEN,
};
