//! Observability for recommendation jobs
//!
//! Provides:
//! - Prometheus metrics (jobs by type, failures, wait time, deploy overrides)
//! - Structured logging of job lifecycle events with tracing

use crate::models::JobType;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for job wait time (in seconds)
const JOB_WAIT_BUCKETS: &[f64] = &[
    60.0, 300.0, 600.0, 1200.0, 1800.0, 3600.0, 7200.0, 14400.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<RecommenderMetricsInner> = OnceLock::new();

struct RecommenderMetricsInner {
    jobs_submitted: IntCounterVec,
    job_failures: IntCounter,
    job_wait_seconds: Histogram,
    recommendations_received: IntCounter,
    deploy_overrides: IntCounterVec,
}

impl RecommenderMetricsInner {
    fn new() -> Self {
        Self {
            jobs_submitted: register_int_counter_vec!(
                "inference_recommender_jobs_submitted_total",
                "Recommendation jobs submitted, by job type",
                &["job_type"]
            )
            .expect("Failed to register jobs_submitted"),

            job_failures: register_int_counter!(
                "inference_recommender_job_failures_total",
                "Recommendation jobs that failed to submit or complete"
            )
            .expect("Failed to register job_failures"),

            job_wait_seconds: register_histogram!(
                "inference_recommender_job_wait_seconds",
                "Time spent waiting for a recommendation job to finish",
                JOB_WAIT_BUCKETS.to_vec()
            )
            .expect("Failed to register job_wait_seconds"),

            recommendations_received: register_int_counter!(
                "inference_recommender_recommendations_received_total",
                "Inference recommendations returned by completed jobs"
            )
            .expect("Failed to register recommendations_received"),

            deploy_overrides: register_int_counter_vec!(
                "inference_recommender_deploy_overrides_total",
                "Deploys that ignored a recommendation, by overriding argument",
                &["reason"]
            )
            .expect("Failed to register deploy_overrides"),
        }
    }
}

/// Handle to the process-wide recommender metrics
///
/// Clones share the same underlying Prometheus collectors.
#[derive(Clone)]
pub struct RecommenderMetrics {
    _private: (),
}

impl Default for RecommenderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommenderMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(RecommenderMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &RecommenderMetricsInner {
        GLOBAL_METRICS.get_or_init(RecommenderMetricsInner::new)
    }

    pub fn inc_jobs_submitted(&self, job_type: JobType) {
        self.inner()
            .jobs_submitted
            .with_label_values(&[job_type.as_str()])
            .inc();
    }

    pub fn inc_job_failures(&self) {
        self.inner().job_failures.inc();
    }

    pub fn observe_job_wait(&self, duration_secs: f64) {
        self.inner().job_wait_seconds.observe(duration_secs);
    }

    pub fn add_recommendations_received(&self, count: usize) {
        self.inner().recommendations_received.inc_by(count as u64);
    }

    pub fn inc_deploy_overrides(&self, reason: &str) {
        self.inner()
            .deploy_overrides
            .with_label_values(&[reason])
            .inc();
    }

    /// Jobs submitted so far with the given type
    pub fn jobs_submitted(&self, job_type: JobType) -> u64 {
        self.inner()
            .jobs_submitted
            .with_label_values(&[job_type.as_str()])
            .get()
    }

    pub fn job_failures(&self) -> u64 {
        self.inner().job_failures.get()
    }

    pub fn recommendations_received(&self) -> u64 {
        self.inner().recommendations_received.get()
    }

    /// Deploys that ignored a recommendation for the given reason
    pub fn deploy_overrides(&self, reason: &str) -> u64 {
        self.inner()
            .deploy_overrides
            .with_label_values(&[reason])
            .get()
    }
}

/// Structured logger for recommendation job events
#[derive(Clone)]
pub struct RecommenderLogger {
    model_package_arn: String,
}

impl RecommenderLogger {
    pub fn new(model_package_arn: impl Into<String>) -> Self {
        Self {
            model_package_arn: model_package_arn.into(),
        }
    }

    /// Log the job type decision
    pub fn log_job_type(&self, job_type: JobType) {
        match job_type {
            JobType::Advanced => info!(
                event = "recommendation_job_type",
                model_package = %self.model_package_arn,
                job_type = %job_type,
                "Advanced job parameters were specified. Running Advanced job..."
            ),
            JobType::Default => info!(
                event = "recommendation_job_type",
                model_package = %self.model_package_arn,
                job_type = %job_type,
                "Advanced job parameters were not specified. Running Default job..."
            ),
        }
    }

    pub fn log_job_submitted(&self, job_name: &str, job_type: JobType) {
        info!(
            event = "recommendation_job_submitted",
            model_package = %self.model_package_arn,
            job_name = %job_name,
            job_type = %job_type,
            "Submitted inference recommendations job"
        );
    }

    pub fn log_job_completed(
        &self,
        job_name: &str,
        recommendations: usize,
        wait_secs: f64,
        completed_at: i64,
    ) {
        info!(
            event = "recommendation_job_completed",
            model_package = %self.model_package_arn,
            job_name = %job_name,
            recommendations = recommendations,
            wait_secs = wait_secs,
            completed_at = completed_at,
            "Inference recommendations job completed"
        );
    }

    pub fn log_job_failed(&self, job_name: Option<&str>, error: &dyn std::fmt::Display) {
        warn!(
            event = "recommendation_job_failed",
            model_package = %self.model_package_arn,
            job_name = ?job_name,
            error = %error,
            "Inference recommendations job failed"
        );
    }
}

/// Log that explicit deploy arguments replace a recommendation
pub fn log_recommendation_overridden(reason: &str, message: &str) {
    warn!(
        event = "recommendation_overridden",
        reason = %reason,
        "{}",
        message
    );
}
