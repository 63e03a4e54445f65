//! Outbound boundary for the completed application.
//!
//! The portal's real persistence lives elsewhere; the wizard only hands the
//! assembled state to a sink and forgets about it. The trait keeps the
//! controller testable against an in-memory double.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::ApplicationState;

/// Reference assigned at submit time, unique per process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationReference(pub String);

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_application_reference() -> ApplicationReference {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationReference(format!("loan-{id:06}"))
}

/// The single structured payload handed off on submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub reference: ApplicationReference,
    pub submitted_on: NaiveDate,
    pub application: ApplicationState,
}

/// Acknowledgement from the collaborator accepting the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub reference: ApplicationReference,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission channel unavailable: {0}")]
    Unavailable(String),
}

/// Opaque collaborator that accepts the finished application.
pub trait SubmissionSink: Send + Sync {
    fn accept(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError>;
}
