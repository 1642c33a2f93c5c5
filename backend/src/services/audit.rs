//! Health audit trail
//!
//! Every safety verdict that gates an operation is emitted as a structured
//! `tracing` event under the `wellness_health_audit` target, and counted.
//! Route the target to its own sink with an `EnvFilter` directive.

use tracing::{info, warn};
use uuid::Uuid;
use wellness_coach_shared::safety::ProfileSafetyResult;
use wellness_coach_shared::{RiskLevel, TriggerSource};

/// Operation a verdict was recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent {
    ProfileCreated,
    ProfileUpdated,
    PlanBlocked,
    PlanCreated,
    ConsultationRecommended,
}

impl AuditEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEvent::ProfileCreated => "health_profile_creation",
            AuditEvent::ProfileUpdated => "health_profile_update",
            AuditEvent::PlanBlocked => "wellness_plan_blocked_safety",
            AuditEvent::PlanCreated => "wellness_plan_created",
            AuditEvent::ConsultationRecommended => "professional_consultation_recommended",
        }
    }
}

/// Record a profile safety verdict
pub fn record_verdict(
    user_id: Uuid,
    event: AuditEvent,
    verdict: &ProfileSafetyResult,
    stored_risk: RiskLevel,
) {
    let outcome = if verdict.is_safe { "safe" } else { "unsafe" };
    metrics::counter!("safety_verdicts_total", "outcome" => outcome).increment(1);

    if verdict.is_safe {
        info!(
            target: "wellness_health_audit",
            user_id = %user_id,
            event = event.as_str(),
            risk_level = %stored_risk,
            "Safety verdict recorded"
        );
    } else {
        warn!(
            target: "wellness_health_audit",
            user_id = %user_id,
            event = event.as_str(),
            risk_level = %stored_risk,
            concerns = ?verdict.concerns,
            "Unsafe safety verdict recorded"
        );
    }

    if event == AuditEvent::PlanBlocked {
        metrics::counter!("wellness_plans_blocked_total").increment(1);
    }
}

/// Record a gate that was decided without a fresh verdict
pub fn record_event(user_id: Uuid, event: AuditEvent, detail: &str) {
    info!(
        target: "wellness_health_audit",
        user_id = %user_id,
        event = event.as_str(),
        detail = detail,
        "Health audit event"
    );
    if event == AuditEvent::PlanBlocked {
        metrics::counter!("wellness_plans_blocked_total").increment(1);
    }
}

pub fn record_alert(user_id: Uuid, alert_id: Uuid, source: TriggerSource) {
    metrics::counter!("emergency_alerts_created_total", "source" => source.as_str()).increment(1);
    warn!(
        target: "wellness_health_audit",
        user_id = %user_id,
        alert_id = %alert_id,
        source = source.as_str(),
        "Emergency alert created"
    );
}
