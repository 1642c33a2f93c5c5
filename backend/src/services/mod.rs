//! Business logic services
//!
//! Services enforce the safety gates and coordinate between repositories
//! and the agent service. Handlers stay thin.

pub mod agent;
pub mod alert;
pub mod audit;
pub mod plan;
pub mod profile;
pub mod user;

pub use alert::AlertService;
pub use plan::PlanService;
pub use profile::ProfileService;
pub use user::UserService;
