//! Wellness Coach Shared Library
//!
//! Domain models, the health safety validator, and API types shared by the
//! backend service and the WASM client hints.

pub mod enums;
pub mod errors;
pub mod models;
pub mod safety;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use enums::*;
pub use errors::*;
pub use types::*;
pub use units::*;

pub use models::{
    EmergencyAlert, HealthProfile, ProgressEntry, SafetyFlag, User, WellnessPlan,
};
