//! Citizen-facing loan application intake for a welfare-scheme portal.
//!
//! The crate models the one stateful part of the portal worth engineering
//! carefully: a ten-step application wizard with per-step validation gates,
//! repeatable sub-records (family members, witnesses, documents), and a
//! simulated Aadhaar + OTP identity verification flow run once for the
//! applicant and once for the guarantor.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
