//! Contract with the session that talks to the recommendation service
//!
//! Submission, polling, backoff and status interpretation all live behind
//! [`RecommenderSession`]. This crate only assembles the request and reads
//! the terminal job description that comes back.

use crate::models::{
    EndpointConfiguration, JobType, RecommendationJobResults, ResourceLimit, StoppingConditions,
    TrafficPattern,
};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How much progress output the session prints while waiting on a job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    #[default]
    Verbose,
    Quiet,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Verbose => f.write_str("Verbose"),
            LogLevel::Quiet => f.write_str("Quiet"),
        }
    }
}

/// Everything the session needs to create a recommendation job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationJobRequest {
    pub role: String,
    pub job_name: Option<String>,
    pub job_type: JobType,
    pub job_duration_in_seconds: Option<u32>,
    pub model_package_version_arn: String,
    pub framework: Option<String>,
    pub framework_version: Option<String>,
    pub sample_payload_url: Option<String>,
    pub supported_content_types: Vec<String>,
    pub supported_instance_types: Vec<String>,
    pub endpoint_configurations: Option<Vec<EndpointConfiguration>>,
    pub traffic_pattern: Option<TrafficPattern>,
    pub stopping_conditions: Option<StoppingConditions>,
    pub resource_limit: Option<ResourceLimit>,
}

impl RecommendationJobRequest {
    /// True when any advanced load-test document is attached
    pub fn has_advanced_parameters(&self) -> bool {
        self.endpoint_configurations.is_some()
            || self.traffic_pattern.is_some()
            || self.stopping_conditions.is_some()
            || self.resource_limit.is_some()
    }
}

/// Session collaborator that owns transport and polling
#[async_trait]
pub trait RecommenderSession: Send + Sync {
    /// Submit a job and return the name the service assigned to it
    async fn create_inference_recommendations_job(
        &self,
        request: &RecommendationJobRequest,
    ) -> Result<String>;

    /// Block until the job is terminal and return its description
    ///
    /// The description carries the ranked list under `InferenceRecommendations`.
    async fn wait_for_inference_recommendations_job(
        &self,
        job_name: &str,
        log_level: LogLevel,
    ) -> Result<RecommendationJobResults>;
}

/// Builds a session on first use for models created without one
pub trait SessionFactory: Send + Sync {
    fn create_session(&self) -> Result<Arc<dyn RecommenderSession>>;
}

impl<F> SessionFactory for F
where
    F: Fn() -> Result<Arc<dyn RecommenderSession>> + Send + Sync,
{
    fn create_session(&self) -> Result<Arc<dyn RecommenderSession>> {
        self()
    }
}
