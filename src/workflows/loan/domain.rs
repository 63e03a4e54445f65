//! Application state for one wizard session.
//!
//! The aggregate is owned by the wizard instance, lives until submit or
//! navigation away, and is handed to the submission sink as one structured
//! payload. Plain text fields are open writes from the input layer; fields
//! with invariants (verification flags, Aadhaar digits, roster membership)
//! are private and only move through their dedicated transitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::roster::Roster;

/// Domain ceiling for this scheme's loan amount, in rupees.
pub const LOAN_AMOUNT_CEILING: u32 = 50_000;

pub const AADHAAR_LEN: usize = 12;

/// The ten wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    Loan,
    Kyc,
    Basic,
    Address,
    Family,
    Collateral,
    Guarantor,
    Witnesses,
    Documents,
    Vendor,
}

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::Loan;
    pub const LAST: WizardStep = WizardStep::Vendor;

    pub const ALL: [WizardStep; 10] = [
        WizardStep::Loan,
        WizardStep::Kyc,
        WizardStep::Basic,
        WizardStep::Address,
        WizardStep::Family,
        WizardStep::Collateral,
        WizardStep::Guarantor,
        WizardStep::Witnesses,
        WizardStep::Documents,
        WizardStep::Vendor,
    ];

    /// One-based position shown in the step tracker.
    pub const fn index(self) -> u8 {
        match self {
            WizardStep::Loan => 1,
            WizardStep::Kyc => 2,
            WizardStep::Basic => 3,
            WizardStep::Address => 4,
            WizardStep::Family => 5,
            WizardStep::Collateral => 6,
            WizardStep::Guarantor => 7,
            WizardStep::Witnesses => 8,
            WizardStep::Documents => 9,
            WizardStep::Vendor => 10,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WizardStep::Loan => "Loan Details",
            WizardStep::Kyc => "KYC & Bank Details",
            WizardStep::Basic => "Basic Details",
            WizardStep::Address => "Address Details",
            WizardStep::Family => "Family Members",
            WizardStep::Collateral => "Collateral",
            WizardStep::Guarantor => "Guarantor",
            WizardStep::Witnesses => "Witnesses",
            WizardStep::Documents => "Documents",
            WizardStep::Vendor => "Vendor Details",
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index.checked_sub(1)? as usize).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_index(self.index().checked_sub(1)?)
    }
}

/// Blocking error attached to a single field, surfaced by the owning step's
/// gate rather than as a standalone failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanDetails {
    pub amount: u32,
    pub application_type: String,
    pub tenure_years: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_error: Option<FieldError>,
}

/// The twelve Aadhaar digit slots; some may still be empty while typing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AadhaarDigits {
    slots: [Option<u8>; AADHAAR_LEN],
}

impl AadhaarDigits {
    pub fn set(&mut self, slot: usize, digit: u8) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = Some(digit);
        }
    }

    pub fn clear(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = None;
        }
    }

    pub fn get(&self, slot: usize) -> Option<u8> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.filled() == AADHAAR_LEN
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    /// Display form of the filled slots, in order.
    pub fn value(&self) -> String {
        self.slots
            .iter()
            .flatten()
            .map(|digit| char::from(b'0' + digit))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KycDetails {
    aadhaar: AadhaarDigits,
    verified: bool,
    pub pan: String,
    pub bank_name: String,
    pub account_number: String,
    pub confirm_account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
}

impl KycDetails {
    pub fn aadhaar(&self) -> &AadhaarDigits {
        &self.aadhaar
    }

    /// True only after a completed verification flow merged its payload.
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub(crate) fn mark_verified(&mut self, digits: AadhaarDigits) {
        self.aadhaar = digits;
        self.verified = true;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicDetails {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub age: String,
    pub father_husband_name: String,
    pub mother_full_name: String,
    pub basic_education: String,
    pub mobile: String,
    pub dob: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressFields {
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub district: String,
    pub taluka: String,
}

impl AddressFields {
    pub fn is_complete(&self) -> bool {
        [
            &self.address,
            &self.city,
            &self.state,
            &self.pincode,
            &self.district,
            &self.taluka,
        ]
        .into_iter()
        .all(|field| !field.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressDetails {
    pub current: AddressFields,
    pub permanent: AddressFields,
    pub same_as_current: bool,
}

/// Collateral offered against the loan; required fields vary by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Collateral {
    Gold {
        weight: String,
        purity: String,
    },
    Land {
        area: String,
        location: String,
    },
    Car {
        make: String,
        model: String,
        year: String,
        registration_number: String,
    },
    Other {
        description: String,
        value: String,
    },
}

impl Collateral {
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Collateral::Gold { .. } => "Gold",
            Collateral::Land { .. } => "Land",
            Collateral::Car { .. } => "Car",
            Collateral::Other { .. } => "Other",
        }
    }

    /// All type-specific required fields present.
    pub fn is_complete(&self) -> bool {
        let fields: Vec<&str> = match self {
            Collateral::Gold { weight, purity } => vec![weight, purity],
            Collateral::Land { area, location } => vec![area, location],
            Collateral::Car {
                make,
                model,
                year,
                registration_number,
            } => vec![make, model, year, registration_number],
            Collateral::Other { description, value } => vec![description, value],
        };
        fields.into_iter().all(|field| !field.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuarantorDetails {
    aadhaar: AadhaarDigits,
    verified: bool,
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub guarantee_amount: String,
}

impl GuarantorDetails {
    pub fn aadhaar(&self) -> &AadhaarDigits {
        &self.aadhaar
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub(crate) fn mark_verified(&mut self, digits: AadhaarDigits) {
        self.aadhaar = digits;
        self.verified = true;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub person_name: String,
    pub relation: String,
    pub age: String,
    pub occupation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Witness {
    pub name: String,
    pub relation: String,
    pub contact: String,
}

/// Display name plus an opaque handle from the file picker; the wizard never
/// inspects the file's content, size, or type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub display_name: String,
    pub handle: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub document_type: String,
    pub attachment: Option<FileAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorDetails {
    pub vendor_type: String,
    pub vendor_name: String,
    pub vendor_contact: String,
    pub vendor_address: String,
    pub vendor_pincode: String,
    pub amount_to_be_paid: String,
}

/// Identity payload returned by the simulated provider for the applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantIdentity {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub address: AddressFields,
}

/// Identity payload returned by the simulated provider for the guarantor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuarantorIdentity {
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VerifiedIdentity {
    Applicant(ApplicantIdentity),
    Guarantor(GuarantorIdentity),
}

/// Root aggregate for one wizard session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationState {
    pub loan: LoanDetails,
    pub kyc: KycDetails,
    pub basic: BasicDetails,
    pub address: AddressDetails,
    pub family_members: Roster<FamilyMember>,
    pub collateral: Option<Collateral>,
    pub guarantor: GuarantorDetails,
    pub witnesses: Roster<Witness>,
    pub documents: Roster<Document>,
    pub vendor: VendorDetails,
}

impl ApplicationState {
    /// Record the requested amount, attaching a blocking field error when it
    /// falls outside `(0, LOAN_AMOUNT_CEILING]`.
    pub fn set_loan_amount(&mut self, amount: u32) {
        self.loan.amount = amount;
        self.loan.amount_error = if amount == 0 {
            Some(FieldError {
                message: "Enter a loan amount greater than zero".to_string(),
            })
        } else if amount > LOAN_AMOUNT_CEILING {
            Some(FieldError {
                message: format!("Loan amount cannot exceed {LOAN_AMOUNT_CEILING}"),
            })
        } else {
            None
        };
    }

    /// Merge a verified identity into the aggregate. Setting the verified
    /// flag and prefilling the dependent fields is one transition; no
    /// observer can see the flag true before the prefill landed.
    pub(crate) fn apply_verified_identity(
        &mut self,
        identity: VerifiedIdentity,
        digits: AadhaarDigits,
        today: NaiveDate,
    ) {
        match identity {
            VerifiedIdentity::Applicant(payload) => {
                self.kyc.mark_verified(digits);
                self.basic.first_name = payload.first_name;
                self.basic.last_name = payload.last_name;
                self.basic.gender = payload.gender;
                self.basic.dob = payload.date_of_birth.format("%Y-%m-%d").to_string();
                self.basic.age = derive_age(payload.date_of_birth, today)
                    .map(|years| years.to_string())
                    .unwrap_or_default();
                self.address.current = payload.address;
            }
            VerifiedIdentity::Guarantor(payload) => {
                self.guarantor.mark_verified(digits);
                self.guarantor.first_name = payload.first_name;
                self.guarantor.last_name = payload.last_name;
                self.guarantor.mobile = payload.mobile;
                self.guarantor.email = payload.email;
                self.guarantor.address = payload.address;
            }
        }
    }
}

/// Whole years elapsed between `dob` and `today`; `None` for a future dob.
pub fn derive_age(dob: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(dob)
}
