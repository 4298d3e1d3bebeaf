//! Inference recommender client library
//!
//! This crate provides:
//! - Load-test parameter models and their wire format
//! - Translation of load-test parameters into advanced job documents
//! - Submission of recommendation jobs through a pluggable session
//! - Deploy-time reconciliation of recommendations with explicit arguments

pub mod config;
pub mod deploy;
pub mod error;
pub mod framework;
pub mod model;
pub mod models;
pub mod observability;
pub mod right_size;
pub mod session;
pub mod translate;

pub use config::RecommenderConfig;
pub use deploy::{
    check_inference_recommender_args, resolve_deploy_target, AsyncInferenceConfig, DeployArgs,
    DeployTarget, ServerlessInferenceConfig,
};
pub use error::{RecommenderError, Result};
pub use model::{Model, ModelReference};
pub use models::*;
pub use observability::{RecommenderLogger, RecommenderMetrics};
pub use right_size::{RecommendationOutcome, RightSizeRequest};
pub use session::{LogLevel, RecommendationJobRequest, RecommenderSession, SessionFactory};
