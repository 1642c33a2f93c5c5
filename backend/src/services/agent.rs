//! Client for the plan-generating agent service
//!
//! The agent service turns a health profile summary into a workout and
//! meal plan. It can also decline and recommend professional consultation
//! instead (HTTP 202). Transport and status failures are folded into
//! [`AgentOutcome::Failed`] so handlers only branch on the outcome.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use wellness_coach_shared::models::{HealthAnalysis, HealthCondition};
use wellness_coach_shared::DietaryRestriction;

use crate::config::AgentConfig;

const CREATE_PLAN_PATH: &str = "/api/internal/create-health-plan";
pub const UNREACHABLE_MESSAGE: &str = "Unable to reach agent service";
pub const DISABLED_MESSAGE: &str = "Plan generation is not enabled";

/// Body posted to the agent service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentPlanRequest {
    pub user_id: String,
    pub plan_name: String,
    pub age: i32,
    pub current_activity_level: String,
    pub primary_goal: String,
    pub time_availability_minutes: i32,
    pub preferred_workout_types: Vec<String>,
    pub available_equipment: Vec<String>,
    pub dietary_restrictions: Vec<DietaryRestriction>,
    pub health_conditions: Vec<HealthCondition>,
    pub medical_clearance: bool,
    pub health_disclaimer_acknowledged: bool,
    pub plan_duration_weeks: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentSafetyInformation {
    #[serde(default)]
    pub safety_notes: Vec<String>,
    #[serde(default)]
    pub disclaimers: Vec<String>,
    #[serde(default)]
    pub health_analysis: Option<HealthAnalysis>,
}

/// A generated plan as returned by the agent service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentPlan {
    #[serde(default)]
    pub plan_data: serde_json::Value,
    #[serde(default)]
    pub safety_information: AgentSafetyInformation,
    #[serde(default)]
    pub next_steps: Option<Vec<String>>,
}

impl AgentPlan {
    /// Plan name chosen by the agent, if it set one
    pub fn plan_name(&self) -> Option<&str> {
        self.plan_data.get("plan_name").and_then(|v| v.as_str())
    }

    pub fn plan_duration_weeks(&self) -> Option<i32> {
        self.plan_data
            .get("plan_duration_weeks")
            .and_then(|v| v.as_i64())
            .and_then(|w| i32::try_from(w).ok())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsultationPlan {
    #[serde(default)]
    pub safety_concerns: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub interim_recommendations: Vec<String>,
}

/// Body of a 202 response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentConsultation {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub consultation_plan: Option<ConsultationPlan>,
}

impl AgentConsultation {
    /// Interim recommendations followed by the suggested next steps
    pub fn recommendations(&self) -> Vec<String> {
        self.consultation_plan
            .as_ref()
            .map(|plan| {
                plan.interim_recommendations
                    .iter()
                    .chain(plan.next_steps.iter())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    Created(Box<AgentPlan>),
    ConsultationRecommended(AgentConsultation),
    Failed(String),
}

#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn create_health_plan(&self, request: &AgentPlanRequest) -> AgentOutcome;
}

/// reqwest-backed client
pub struct HttpAgentClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgentClient {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Deserialize)]
struct AgentErrorBody {
    message: Option<String>,
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn create_health_plan(&self, request: &AgentPlanRequest) -> AgentOutcome {
        let url = format!("{}{}", self.base_url, CREATE_PLAN_PATH);
        debug!(user_id = %request.user_id, goal = %request.primary_goal, "Calling agent service");

        let response = match self.client.post(&url).json(request).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, url = %url, "Agent service unreachable");
                return AgentOutcome::Failed(UNREACHABLE_MESSAGE.to_string());
            }
        };

        let status = response.status();
        match status {
            StatusCode::ACCEPTED => {
                let consultation = response.json::<AgentConsultation>().await.unwrap_or_default();
                info!(user_id = %request.user_id, "Agent service recommended consultation");
                AgentOutcome::ConsultationRecommended(consultation)
            }
            StatusCode::OK | StatusCode::CREATED => match response.json::<AgentPlan>().await {
                Ok(plan) => AgentOutcome::Created(Box::new(plan)),
                Err(e) => {
                    error!(error = %e, "Agent service returned an unreadable plan");
                    AgentOutcome::Failed("Invalid response from agent service".to_string())
                }
            },
            _ => {
                let message = response
                    .json::<AgentErrorBody>()
                    .await
                    .ok()
                    .and_then(|b| b.message)
                    .unwrap_or_else(|| {
                        if status.is_client_error() {
                            "Invalid request to agent service".to_string()
                        } else {
                            "Agent service error".to_string()
                        }
                    });
                warn!(status = status.as_u16(), message = %message, "Agent service rejected request");
                AgentOutcome::Failed(message)
            }
        }
    }
}

/// Used when plan generation is switched off
pub struct DisabledAgentClient;

#[async_trait]
impl AgentClient for DisabledAgentClient {
    async fn create_health_plan(&self, _request: &AgentPlanRequest) -> AgentOutcome {
        AgentOutcome::Failed(DISABLED_MESSAGE.to_string())
    }
}

pub fn client_from_config(config: &AgentConfig) -> Arc<dyn AgentClient> {
    if !config.enabled {
        info!("Agent service disabled; plan creation will fail with 502");
        return Arc::new(DisabledAgentClient);
    }

    match HttpAgentClient::new(&config.base_url, Duration::from_secs(config.timeout_secs)) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "Failed to build agent HTTP client");
            Arc::new(DisabledAgentClient)
        }
    }
}

#[cfg(test)]
impl AgentPlanRequest {
    pub(crate) fn sample() -> Self {
        Self {
            user_id: uuid::Uuid::new_v4().to_string(),
            plan_name: "general_fitness Plan".to_string(),
            age: 34,
            current_activity_level: "lightly_active".to_string(),
            primary_goal: "improved_fitness".to_string(),
            time_availability_minutes: 30,
            preferred_workout_types: vec!["walking".to_string()],
            available_equipment: vec!["bodyweight".to_string()],
            dietary_restrictions: Vec::new(),
            health_conditions: Vec::new(),
            medical_clearance: true,
            health_disclaimer_acknowledged: true,
            plan_duration_weeks: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpAgentClient {
        HttpAgentClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_created_plan_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CREATE_PLAN_PATH))
            .and(body_partial_json(serde_json::json!({"primary_goal": "improved_fitness"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "plan_data": {
                    "plan_name": "Fitness Kickoff",
                    "plan_duration_weeks": 4,
                    "workout_plan": [{"day": 1, "rest_day": false}]
                },
                "safety_information": {
                    "safety_notes": ["Warm up before every session"],
                    "disclaimers": ["General guidance only"]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client(&server)
            .create_health_plan(&AgentPlanRequest::sample())
            .await;
        match outcome {
            AgentOutcome::Created(plan) => {
                assert_eq!(plan.plan_name(), Some("Fitness Kickoff"));
                assert_eq!(plan.plan_duration_weeks(), Some(4));
                assert_eq!(plan.safety_information.safety_notes.len(), 1);
                assert!(plan.safety_information.health_analysis.is_none());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_accepted_means_consultation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CREATE_PLAN_PATH))
            .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
                "message": "Professional consultation recommended",
                "consultation_plan": {
                    "safety_concerns": ["Reported chest discomfort"],
                    "next_steps": ["See a cardiologist"],
                    "interim_recommendations": ["Light walking only"]
                }
            })))
            .mount(&server)
            .await;

        let outcome = client(&server)
            .create_health_plan(&AgentPlanRequest::sample())
            .await;
        let AgentOutcome::ConsultationRecommended(consultation) = outcome else {
            panic!("expected consultation");
        };
        assert_eq!(
            consultation.recommendations(),
            vec!["Light walking only".to_string(), "See a cardiologist".to_string()]
        );
    }

    #[tokio::test]
    async fn test_server_error_uses_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CREATE_PLAN_PATH))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"message": "LLM quota exceeded"})),
            )
            .mount(&server)
            .await;

        let outcome = client(&server)
            .create_health_plan(&AgentPlanRequest::sample())
            .await;
        assert_eq!(outcome, AgentOutcome::Failed("LLM quota exceeded".to_string()));
    }

    #[tokio::test]
    async fn test_client_error_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let outcome = client(&server)
            .create_health_plan(&AgentPlanRequest::sample())
            .await;
        assert_eq!(
            outcome,
            AgentOutcome::Failed("Invalid request to agent service".to_string())
        );
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Nothing listens on the discard port
        let client = HttpAgentClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let outcome = client.create_health_plan(&AgentPlanRequest::sample()).await;
        assert_eq!(outcome, AgentOutcome::Failed(UNREACHABLE_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_disabled_config_never_calls_out() {
        let config = AgentConfig {
            enabled: false,
            ..AgentConfig::default()
        };
        let outcome = client_from_config(&config)
            .create_health_plan(&AgentPlanRequest::sample())
            .await;
        assert_eq!(outcome, AgentOutcome::Failed(DISABLED_MESSAGE.to_string()));
    }
}
