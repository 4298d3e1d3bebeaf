//! Right-sizing: submit a recommendation job and collect its results

use crate::config::RecommenderConfig;
use crate::error::{RecommenderError, Result};
use crate::framework::resolve_framework;
use crate::model::Model;
use crate::models::{
    HyperparameterRange, InferenceRecommendation, JobType, ModelLatencyThreshold, Phase,
    RecommendationJobResults, INFERENCE_RECOMMENDATIONS_KEY,
};
use crate::observability::{RecommenderLogger, RecommenderMetrics};
use crate::session::{LogLevel, RecommendationJobRequest};
use crate::translate;
use std::time::Instant;
use tracing::debug;

/// Parameters for a recommendation job
///
/// Leaving every load-test field empty runs a default job. Setting any of
/// them turns the job into an advanced one.
#[derive(Debug, Clone, Default)]
pub struct RightSizeRequest {
    /// S3 location of the sample payload archive
    pub sample_payload_url: Option<String>,
    /// MIME types the model accepts
    pub supported_content_types: Vec<String>,
    /// Instance types the model is expected to run on
    pub supported_instance_types: Vec<String>,
    pub job_name: Option<String>,
    /// Framework label; derived from the model when unset
    pub framework: Option<String>,
    pub job_duration_in_seconds: Option<u32>,
    /// Per-instance environment sweeps; each needs `instance_types`
    pub hyperparameter_ranges: Vec<HyperparameterRange>,
    pub phases: Vec<Phase>,
    pub traffic_type: Option<String>,
    pub max_invocations: Option<u32>,
    pub model_latency_thresholds: Vec<ModelLatencyThreshold>,
    /// Total endpoints the job may create
    pub max_tests: Option<u32>,
    /// Endpoints the job may run at once
    pub max_parallel_tests: Option<u32>,
    pub log_level: Option<LogLevel>,
}

/// Result of a completed recommendation job
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationOutcome {
    pub job_name: String,
    pub job_type: JobType,
    /// Full job description as returned by the session
    pub results: RecommendationJobResults,
    /// Ranked best-first
    pub recommendations: Vec<InferenceRecommendation>,
    pub completed_at: i64,
}

impl RecommendationOutcome {
    /// Build an outcome from a terminal job description
    pub fn from_results(
        job_name: impl Into<String>,
        job_type: JobType,
        results: RecommendationJobResults,
    ) -> Result<Self> {
        let recommendations = extract_recommendations(&results)?;
        Ok(Self {
            job_name: job_name.into(),
            job_type,
            results,
            recommendations,
            completed_at: chrono::Utc::now().timestamp(),
        })
    }

    pub fn top_recommendation(&self) -> Option<&InferenceRecommendation> {
        self.recommendations.first()
    }
}

/// Decode `InferenceRecommendations`; an absent or null list is empty
pub fn extract_recommendations(
    results: &RecommendationJobResults,
) -> Result<Vec<InferenceRecommendation>> {
    match results.get(INFERENCE_RECOMMENDATIONS_KEY) {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(RecommenderError::MalformedResults),
    }
}

/// Assemble the job request without touching the session
pub fn build_job_request(
    model: &Model,
    request: &RightSizeRequest,
    config: &RecommenderConfig,
) -> Result<RecommendationJobRequest> {
    let model_package_arn = model
        .model_package_arn()
        .ok_or(RecommenderError::NotRegisteredModel)?;

    let framework = resolve_framework(request.framework.as_deref(), model.framework());

    let endpoint_configurations = translate::endpoint_configurations(&request.hyperparameter_ranges)?;
    let traffic_type = request
        .traffic_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&config.default_traffic_type);
    let traffic_pattern = translate::traffic_pattern(Some(traffic_type), &request.phases);
    let stopping_conditions =
        translate::stopping_conditions(request.max_invocations, &request.model_latency_thresholds);
    let resource_limit = translate::resource_limit(request.max_tests, request.max_parallel_tests);

    let job_type = if endpoint_configurations.is_some()
        || traffic_pattern.is_some()
        || stopping_conditions.is_some()
        || resource_limit.is_some()
    {
        JobType::Advanced
    } else {
        JobType::Default
    };

    Ok(RecommendationJobRequest {
        role: model.role().to_string(),
        job_name: request.job_name.clone(),
        job_type,
        job_duration_in_seconds: request
            .job_duration_in_seconds
            .or(config.job_duration_in_seconds),
        model_package_version_arn: model_package_arn.to_string(),
        framework,
        framework_version: model.framework_version().map(str::to_string),
        sample_payload_url: request.sample_payload_url.clone(),
        supported_content_types: request.supported_content_types.clone(),
        supported_instance_types: request.supported_instance_types.clone(),
        endpoint_configurations,
        traffic_pattern,
        stopping_conditions,
        resource_limit,
    })
}

impl Model {
    /// Run a recommendation job for this model with default configuration
    pub async fn right_size(&mut self, request: RightSizeRequest) -> Result<RecommendationOutcome> {
        self.right_size_with(request, &RecommenderConfig::default())
            .await
    }

    /// Run a recommendation job and wait for it to finish
    ///
    /// Fails before any session call if the model is not registered or the
    /// hyperparameter ranges are invalid. Session errors are returned as-is.
    pub async fn right_size_with(
        &mut self,
        request: RightSizeRequest,
        config: &RecommenderConfig,
    ) -> Result<RecommendationOutcome> {
        let job_request = build_job_request(self, &request, config)?;
        let job_type = job_request.job_type;

        let logger = RecommenderLogger::new(job_request.model_package_version_arn.as_str());
        let metrics = RecommenderMetrics::new();
        logger.log_job_type(job_type);

        let session = self.ensure_session()?;
        let log_level = request.log_level.unwrap_or(config.log_level);

        debug!(
            job_name = ?job_request.job_name,
            framework = ?job_request.framework,
            "Creating inference recommendations job"
        );
        let job_name = match session
            .create_inference_recommendations_job(&job_request)
            .await
        {
            Ok(name) => name,
            Err(e) => {
                metrics.inc_job_failures();
                logger.log_job_failed(job_request.job_name.as_deref(), &e);
                return Err(RecommenderError::Session(e));
            }
        };
        metrics.inc_jobs_submitted(job_type);
        logger.log_job_submitted(&job_name, job_type);

        let started = Instant::now();
        let results = match session
            .wait_for_inference_recommendations_job(&job_name, log_level)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                metrics.inc_job_failures();
                logger.log_job_failed(Some(&job_name), &e);
                return Err(RecommenderError::Session(e));
            }
        };
        let wait_secs = started.elapsed().as_secs_f64();

        let outcome = RecommendationOutcome::from_results(job_name, job_type, results)?;

        metrics.observe_job_wait(wait_secs);
        metrics.add_recommendations_received(outcome.recommendations.len());
        logger.log_job_completed(
            &outcome.job_name,
            outcome.recommendations.len(),
            wait_secs,
            outcome.completed_at,
        );

        Ok(outcome)
    }
}
