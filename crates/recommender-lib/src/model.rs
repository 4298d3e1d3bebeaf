//! Caller-side model handle

use crate::error::{RecommenderError, Result};
use crate::session::{RecommenderSession, SessionFactory};
use std::fmt;
use std::sync::Arc;

/// Where the model's artifacts come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReference {
    /// Container image plus optional model data, not registered anywhere
    Artifact {
        image_uri: String,
        model_data: Option<String>,
    },
    /// A versioned model package published to a model registry
    Registered { model_package_arn: String },
}

/// A trained model that can be right-sized and deployed
pub struct Model {
    role: String,
    reference: ModelReference,
    framework: Option<String>,
    framework_version: Option<String>,
    session: Option<Arc<dyn RecommenderSession>>,
    session_factory: Option<Arc<dyn SessionFactory>>,
}

impl Model {
    /// Model backed by an image and model data
    pub fn from_artifact(
        role: impl Into<String>,
        image_uri: impl Into<String>,
        model_data: Option<String>,
    ) -> Self {
        Self::new(
            role,
            ModelReference::Artifact {
                image_uri: image_uri.into(),
                model_data,
            },
        )
    }

    /// Model backed by a registered model package version
    pub fn from_package(role: impl Into<String>, model_package_arn: impl Into<String>) -> Self {
        Self::new(
            role,
            ModelReference::Registered {
                model_package_arn: model_package_arn.into(),
            },
        )
    }

    fn new(role: impl Into<String>, reference: ModelReference) -> Self {
        Self {
            role: role.into(),
            reference,
            framework: None,
            framework_version: None,
            session: None,
            session_factory: None,
        }
    }

    /// Detected framework name, e.g. "xgboost"
    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    pub fn with_framework_version(mut self, version: impl Into<String>) -> Self {
        self.framework_version = Some(version.into());
        self
    }

    pub fn with_session(mut self, session: Arc<dyn RecommenderSession>) -> Self {
        self.session = Some(session);
        self
    }

    /// Factory used when a job is submitted and no session is attached yet
    pub fn with_session_factory(mut self, factory: Arc<dyn SessionFactory>) -> Self {
        self.session_factory = Some(factory);
        self
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn reference(&self) -> &ModelReference {
        &self.reference
    }

    pub fn framework(&self) -> Option<&str> {
        self.framework.as_deref()
    }

    pub fn framework_version(&self) -> Option<&str> {
        self.framework_version.as_deref()
    }

    /// Package ARN when the model comes from a registry
    pub fn model_package_arn(&self) -> Option<&str> {
        match &self.reference {
            ModelReference::Registered { model_package_arn } => Some(model_package_arn.as_str()),
            ModelReference::Artifact { .. } => None,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.model_package_arn().is_some()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Return the attached session, building it from the factory on first use
    pub fn ensure_session(&mut self) -> Result<Arc<dyn RecommenderSession>> {
        if let Some(session) = &self.session {
            return Ok(Arc::clone(session));
        }

        let factory = self
            .session_factory
            .as_ref()
            .ok_or(RecommenderError::SessionUnavailable)?;
        let session = factory.create_session()?;
        self.session = Some(Arc::clone(&session));
        Ok(session)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("role", &self.role)
            .field("reference", &self.reference)
            .field("framework", &self.framework)
            .field("framework_version", &self.framework_version)
            .field("has_session", &self.session.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecommendationJobResults;
    use crate::session::{LogLevel, RecommendationJobRequest};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullSession;

    #[async_trait]
    impl RecommenderSession for NullSession {
        async fn create_inference_recommendations_job(
            &self,
            _request: &RecommendationJobRequest,
        ) -> anyhow::Result<String> {
            Ok("job".to_string())
        }

        async fn wait_for_inference_recommendations_job(
            &self,
            _job_name: &str,
            _log_level: LogLevel,
        ) -> anyhow::Result<RecommendationJobResults> {
            Ok(RecommendationJobResults::new())
        }
    }

    #[test]
    fn test_registered_model_exposes_arn() {
        let model = Model::from_package("role", "arn:model-package/1");
        assert!(model.is_registered());
        assert_eq!(model.model_package_arn(), Some("arn:model-package/1"));

        let model = Model::from_artifact("role", "image:latest", None);
        assert!(!model.is_registered());
        assert_eq!(model.model_package_arn(), None);
    }

    #[test]
    fn test_missing_session_and_factory() {
        let mut model = Model::from_package("role", "arn");
        let err = model.ensure_session().err().unwrap();
        assert!(matches!(err, RecommenderError::SessionUnavailable));
    }

    #[test]
    fn test_factory_invoked_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let factory = move || -> anyhow::Result<Arc<dyn RecommenderSession>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NullSession))
        };

        let mut model = Model::from_package("role", "arn").with_session_factory(Arc::new(factory));
        assert!(!model.has_session());

        model.ensure_session().unwrap();
        model.ensure_session().unwrap();

        assert!(model.has_session());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_factory_error_propagates() {
        let factory = || -> anyhow::Result<Arc<dyn RecommenderSession>> {
            Err(anyhow::anyhow!("no credentials"))
        };
        let mut model = Model::from_package("role", "arn").with_session_factory(Arc::new(factory));

        let err = model.ensure_session().err().unwrap();
        assert_eq!(err.to_string(), "no credentials");
        assert!(!model.has_session());
    }
}
