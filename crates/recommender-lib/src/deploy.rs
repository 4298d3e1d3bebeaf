//! Deploy-time use of a previous recommendation
//!
//! A deploy can either take the top recommendation from a finished
//! [`RecommendationOutcome`] or use explicit instance parameters. Explicit
//! parameters always win; the recommendation is only used when nothing
//! conflicts with it.

use crate::error::{RecommenderError, Result};
use crate::observability::{log_recommendation_overridden, RecommenderMetrics};
use crate::right_size::RecommendationOutcome;
use serde::{Deserialize, Serialize};

/// Serverless endpoint sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerlessInferenceConfig {
    pub memory_size_in_mb: u32,
    pub max_concurrency: u32,
}

impl Default for ServerlessInferenceConfig {
    fn default() -> Self {
        Self {
            memory_size_in_mb: 2048,
            max_concurrency: 5,
        }
    }
}

/// Asynchronous invocation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncInferenceConfig {
    pub output_path: Option<String>,
    pub max_concurrent_invocations_per_instance: Option<u32>,
}

/// Arguments a caller passes to a deploy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployArgs {
    pub instance_type: Option<String>,
    pub initial_instance_count: Option<u32>,
    pub accelerator_type: Option<String>,
    pub serverless_inference_config: Option<ServerlessInferenceConfig>,
    pub async_inference_config: Option<AsyncInferenceConfig>,
}

/// Where a deploy will place the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployTarget {
    Instances {
        instance_type: String,
        initial_instance_count: u32,
        accelerator_type: Option<String>,
        async_inference_config: Option<AsyncInferenceConfig>,
    },
    Serverless(ServerlessInferenceConfig),
}

/// Decide whether a deploy should use the top recommendation
///
/// Returns `(instance_type, initial_instance_count)` of the best
/// recommendation, or `None` when explicit deploy arguments take precedence.
pub fn check_inference_recommender_args(
    outcome: &RecommendationOutcome,
    args: &DeployArgs,
) -> Result<Option<(String, u32)>> {
    if args.accelerator_type.is_some() {
        return Err(RecommenderError::AcceleratorTypeNotSupported);
    }

    let metrics = RecommenderMetrics::new();

    if args.instance_type.is_some() || args.initial_instance_count.is_some() {
        metrics.inc_deploy_overrides("instance_type");
        log_recommendation_overridden(
            "instance_type",
            "instance_type or initial_instance_count specified. Overriding right_size() recommendations.",
        );
        return Ok(None);
    }
    if args.async_inference_config.is_some() {
        metrics.inc_deploy_overrides("async_inference_config");
        log_recommendation_overridden(
            "async_inference_config",
            "async_inference_config is specified. Overriding right_size() recommendations.",
        );
        return Ok(None);
    }
    if args.serverless_inference_config.is_some() {
        metrics.inc_deploy_overrides("serverless_inference_config");
        log_recommendation_overridden(
            "serverless_inference_config",
            "serverless_inference_config is specified. Overriding right_size() recommendations.",
        );
        return Ok(None);
    }

    let top = outcome
        .top_recommendation()
        .ok_or(RecommenderError::NoRecommendations)?;
    let endpoint = &top.endpoint_configuration;

    Ok(Some((
        endpoint.instance_type.clone(),
        endpoint.initial_instance_count,
    )))
}

/// Resolve the deploy target from explicit arguments and an optional outcome
pub fn resolve_deploy_target(
    outcome: Option<&RecommendationOutcome>,
    args: DeployArgs,
) -> Result<DeployTarget> {
    let mut instance_type = args.instance_type.clone();
    let mut initial_instance_count = args.initial_instance_count;

    if let Some(outcome) = outcome {
        if let Some((recommended_type, recommended_count)) =
            check_inference_recommender_args(outcome, &args)?
        {
            instance_type = Some(recommended_type);
            initial_instance_count = Some(recommended_count);
        }
    }

    if let Some(serverless) = args.serverless_inference_config {
        return Ok(DeployTarget::Serverless(serverless));
    }

    match (instance_type, initial_instance_count) {
        (Some(instance_type), Some(initial_instance_count)) => Ok(DeployTarget::Instances {
            instance_type,
            initial_instance_count,
            accelerator_type: args.accelerator_type,
            async_inference_config: args.async_inference_config,
        }),
        _ => Err(RecommenderError::MissingDeployTarget),
    }
}
