//! Error types for the Wellness Coach domain

use crate::enums::{AlertStatus, PlanStatus};
use thiserror::Error;

/// Errors raised by domain model transitions and profile input checks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Cannot {action} {status} plan")]
    InvalidPlanState {
        action: &'static str,
        status: PlanStatus,
    },

    #[error("Please confirm that health concerns have been addressed before resuming")]
    HealthConcernUnresolved,

    #[error("Emergency alert cannot move from {from} to {to}")]
    InvalidAlertTransition { from: AlertStatus, to: AlertStatus },
}

impl DomainError {
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        DomainError::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
