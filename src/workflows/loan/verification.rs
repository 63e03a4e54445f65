//! Simulated Aadhaar identity verification.
//!
//! One small state machine, instantiated once per target (applicant and
//! guarantor): digit-by-digit capture, a simulated provider round trip, an
//! OTP challenge, then an atomic prefill merge into the application state.
//! No real network call happens anywhere in here; the provider is a fixed
//! payload behind a cancellable timer.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use super::domain::{
    AadhaarDigits, AddressFields, ApplicantIdentity, GuarantorIdentity, VerifiedIdentity,
    AADHAAR_LEN,
};
use super::sanitize::{self, DigitKeystroke, FormatNotice};

pub const OTP_LEN: usize = 6;

/// Which record a verification flow prefills on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationTarget {
    Applicant,
    Guarantor,
}

impl VerificationTarget {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationTarget::Applicant => "applicant",
            VerificationTarget::Guarantor => "guarantor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationPhase {
    /// Digit-by-digit Aadhaar capture.
    Entering,
    /// Simulated provider round trip in flight.
    Validating,
    /// OTP prompt open; any six-character code is accepted.
    AwaitingOtp,
    /// Terminal for this session.
    Verified,
}

/// Proof that a validation round trip was started. Carries the generation it
/// was issued under; a cancel bumps the generation so a ticket from a
/// since-abandoned round trip can never complete the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationTicket {
    target: VerificationTarget,
    generation: u64,
}

impl ValidationTicket {
    pub fn target(&self) -> VerificationTarget {
        self.target
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("digit entry is only available while entering the Aadhaar number")]
    NotEntering,
    #[error("the one-time password prompt is not open")]
    NotAwaitingOtp,
    #[error("validation was cancelled before it completed")]
    StaleTicket,
    #[error("the one-time password must be exactly {OTP_LEN} characters")]
    OtpLength,
    #[error("this identity is already verified for the session")]
    AlreadyVerified,
}

/// What a digit keystroke did to the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigitEntry {
    /// Digit landed; focus moved to the next empty slot.
    Accepted { slot: usize },
    /// Empty keystroke, nothing changed.
    Ignored,
    /// Non-digit keystroke; show the transient notice.
    Rejected(FormatNotice),
    /// Twelfth digit landed; the provider round trip has begun.
    BeganValidating(ValidationTicket),
}

#[derive(Debug, Clone)]
pub struct VerificationFlow {
    target: VerificationTarget,
    phase: VerificationPhase,
    digits: AadhaarDigits,
    focus: usize,
    otp: String,
    generation: u64,
    notice_ttl: Duration,
}

impl VerificationFlow {
    pub fn new(target: VerificationTarget, notice_ttl: Duration) -> Self {
        Self {
            target,
            phase: VerificationPhase::Entering,
            digits: AadhaarDigits::default(),
            focus: 0,
            otp: String::new(),
            generation: 0,
            notice_ttl,
        }
    }

    pub fn target(&self) -> VerificationTarget {
        self.target
    }

    pub fn phase(&self) -> VerificationPhase {
        self.phase
    }

    pub fn digits(&self) -> &AadhaarDigits {
        &self.digits
    }

    /// Slot the next keystroke lands in. Cosmetic, mirrored for the widgets.
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn otp(&self) -> &str {
        &self.otp
    }

    /// The submit button is enabled exactly when this holds.
    pub fn otp_ready(&self) -> bool {
        self.phase == VerificationPhase::AwaitingOtp && self.otp.chars().count() == OTP_LEN
    }

    /// Feed one keystroke into the focused slot. When the twelfth digit
    /// lands the flow moves to `Validating` and hands back a ticket for the
    /// delayed provider response.
    pub fn enter_digit(&mut self, raw: &str) -> Result<DigitEntry, VerificationError> {
        match self.phase {
            VerificationPhase::Entering => {}
            VerificationPhase::Verified => return Err(VerificationError::AlreadyVerified),
            _ => return Err(VerificationError::NotEntering),
        }

        match sanitize::aadhaar_digit(raw, self.notice_ttl) {
            DigitKeystroke::Ignored => Ok(DigitEntry::Ignored),
            DigitKeystroke::Rejected(notice) => {
                debug!(flow = self.target.label(), "aadhaar keystroke rejected");
                Ok(DigitEntry::Rejected(notice))
            }
            DigitKeystroke::Accepted(digit) => {
                let slot = self.focus.min(AADHAAR_LEN - 1);
                self.digits.set(slot, digit);
                self.focus = self.digits.first_empty().unwrap_or(AADHAAR_LEN - 1);

                if self.digits.is_complete() {
                    self.phase = VerificationPhase::Validating;
                    debug!(flow = self.target.label(), "aadhaar digits complete");
                    Ok(DigitEntry::BeganValidating(ValidationTicket {
                        target: self.target,
                        generation: self.generation,
                    }))
                } else {
                    Ok(DigitEntry::Accepted { slot })
                }
            }
        }
    }

    /// Backspace behavior: clear the focused slot if it holds a digit,
    /// otherwise step back one slot and clear that.
    pub fn backspace(&mut self) -> Result<(), VerificationError> {
        if self.phase != VerificationPhase::Entering {
            return Err(VerificationError::NotEntering);
        }

        if self.digits.get(self.focus).is_some() {
            self.digits.clear(self.focus);
        } else if self.focus > 0 {
            self.focus -= 1;
            self.digits.clear(self.focus);
        }
        Ok(())
    }

    /// Apply the delayed provider response. Rejected when the ticket belongs
    /// to a round trip that was cancelled in the meantime.
    pub fn complete_validation(&mut self, ticket: ValidationTicket) -> Result<(), VerificationError> {
        if self.phase != VerificationPhase::Validating || ticket.generation != self.generation {
            return Err(VerificationError::StaleTicket);
        }

        self.phase = VerificationPhase::AwaitingOtp;
        debug!(flow = self.target.label(), "otp prompt opened");
        Ok(())
    }

    /// Store the OTP as typed, capped at six characters.
    pub fn set_otp(&mut self, raw: &str) -> Result<(), VerificationError> {
        if self.phase != VerificationPhase::AwaitingOtp {
            return Err(VerificationError::NotAwaitingOtp);
        }

        self.otp = raw.chars().take(OTP_LEN).collect();
        Ok(())
    }

    /// Accept the OTP on length alone and return the provider payload. The
    /// caller merges it into the application state in the same transition.
    pub(crate) fn submit_otp(&mut self) -> Result<VerifiedIdentity, VerificationError> {
        if self.phase != VerificationPhase::AwaitingOtp {
            return Err(VerificationError::NotAwaitingOtp);
        }
        if self.otp.chars().count() != OTP_LEN {
            return Err(VerificationError::OtpLength);
        }

        self.phase = VerificationPhase::Verified;
        Ok(simulated_identity(self.target))
    }

    /// Abandon the current attempt: OTP cleared, digits kept, any pending
    /// validation timer invalidated. The flow returns to digit entry.
    pub fn cancel(&mut self) {
        if self.phase == VerificationPhase::Verified {
            return;
        }

        self.generation += 1;
        self.otp.clear();
        self.phase = VerificationPhase::Entering;
        self.focus = self.digits.first_empty().unwrap_or(AADHAAR_LEN - 1);
        debug!(flow = self.target.label(), "verification cancelled");
    }
}

/// Handle for the scheduled provider response. Dropping or aborting it keeps
/// the delayed transition from ever being applied; `complete_validation`'s
/// generation check covers the race where the timer already fired.
#[derive(Debug)]
pub struct ValidationDelay {
    handle: JoinHandle<ValidationTicket>,
}

impl ValidationDelay {
    pub fn start(ticket: ValidationTicket, delay: Duration) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            ticket
        });
        Self { handle }
    }

    /// Wait out the simulated round trip. `None` when the delay was aborted.
    pub async fn ticket(self) -> Option<ValidationTicket> {
        self.handle.await.ok()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Fixed payload standing in for the identity provider's response.
pub(crate) fn simulated_identity(target: VerificationTarget) -> VerifiedIdentity {
    match target {
        VerificationTarget::Applicant => VerifiedIdentity::Applicant(ApplicantIdentity {
            first_name: "Ramesh".to_string(),
            last_name: "Kumar".to_string(),
            gender: "Male".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 14).expect("valid calendar date"),
            address: AddressFields {
                address: "12 Gandhi Road".to_string(),
                city: "Pune".to_string(),
                state: "Maharashtra".to_string(),
                pincode: "411001".to_string(),
                district: "Pune".to_string(),
                taluka: "Haveli".to_string(),
            },
        }),
        VerificationTarget::Guarantor => VerifiedIdentity::Guarantor(GuarantorIdentity {
            first_name: "Suresh".to_string(),
            last_name: "Patil".to_string(),
            mobile: "9876543210".to_string(),
            email: "suresh.patil@example.com".to_string(),
            address: "45 Station Road, Nashik".to_string(),
        }),
    }
}
