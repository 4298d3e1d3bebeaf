//! Error types for recommendation jobs and deploy resolution

/// Errors raised while building, submitting or consuming a recommendation job
#[derive(Debug, thiserror::Error)]
pub enum RecommenderError {
    /// `right_size` was called on a model that is not in a model registry
    #[error("right_size() is currently only supported with a registered model")]
    NotRegisteredModel,

    /// A hyperparameter range did not name any instance types
    #[error("instance_types must be defined as a hyperparameter_range")]
    MissingInstanceTypes,

    /// Accelerators cannot be combined with a recommendation-based deploy
    #[error("accelerator_type is not compatible with right_size()")]
    AcceleratorTypeNotSupported,

    /// The job finished without producing a single recommendation
    #[error("recommendation job returned no inference recommendations")]
    NoRecommendations,

    /// Neither explicit instance parameters nor a recommendation are available
    #[error("Must specify instance type and instance count unless using serverless inference")]
    MissingDeployTarget,

    /// The model has no session and no way to build one
    #[error("no recommender session or session factory configured for model")]
    SessionUnavailable,

    /// `InferenceRecommendations` could not be decoded from the job results
    #[error("malformed recommendation job results: {0}")]
    MalformedResults(#[source] serde_json::Error),

    /// The configuration file could not be read or decoded
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Anything the session raised, passed through untouched
    #[error(transparent)]
    Session(#[from] anyhow::Error),
}

impl RecommenderError {
    /// Returns true for caller misuse that will fail again if retried as-is
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            RecommenderError::NotRegisteredModel
                | RecommenderError::MissingInstanceTypes
                | RecommenderError::AcceleratorTypeNotSupported
                | RecommenderError::NoRecommendations
                | RecommenderError::MissingDeployTarget
                | RecommenderError::SessionUnavailable
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RecommenderError>;
