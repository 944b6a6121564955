pub mod dashboard;
pub mod engine;
pub mod snippet;

pub use crate::domain::model::{Capture, Finding, ProbeOutcome, ProbeReport};
pub use crate::domain::ports::{CredentialSource, Probe, Storage};
pub use crate::utils::error::Result;
