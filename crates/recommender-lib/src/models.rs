//! Core data models for recommendation jobs
//!
//! Everything that crosses the wire serializes with the service's PascalCase
//! field names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the hyperparameter range entry that lists candidate instance types
pub const INSTANCE_TYPES_KEY: &str = "instance_types";

/// Traffic type used when a traffic pattern is given without one
pub const DEFAULT_TRAFFIC_TYPE: &str = "PHASES";

/// One segment of a synthetic load pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Phase {
    pub duration_in_seconds: u32,
    pub initial_number_of_users: u32,
    pub spawn_rate: u32,
}

impl Phase {
    pub fn new(duration_in_seconds: u32, initial_number_of_users: u32, spawn_rate: u32) -> Self {
        Self {
            duration_in_seconds,
            initial_number_of_users,
            spawn_rate,
        }
    }
}

/// Response-time bound used as a load-test stopping condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModelLatencyThreshold {
    /// Percentile label, e.g. "P95"
    pub percentile: String,
    pub value_in_milliseconds: u32,
}

impl ModelLatencyThreshold {
    pub fn new(percentile: impl Into<String>, value_in_milliseconds: u32) -> Self {
        Self {
            percentile: percentile.into(),
            value_in_milliseconds,
        }
    }
}

/// A named variable with an enumerated set of candidate values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoricalParameter {
    values: Vec<String>,
}

impl CategoricalParameter {
    pub fn new<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self {
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Range descriptor for this parameter under `name`
    pub fn as_range(&self, name: &str) -> CategoricalParameterRange {
        CategoricalParameterRange {
            name: name.to_string(),
            value: self.values.clone(),
        }
    }
}

/// Insertion-ordered set of categorical parameters for one sweep
///
/// The `instance_types` entry lists the instances to test; every other entry
/// becomes an environment parameter range on each of those instances.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HyperparameterRange {
    entries: Vec<(String, CategoricalParameter)>,
}

impl HyperparameterRange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any previous one with the same name
    pub fn with(mut self, name: impl Into<String>, parameter: CategoricalParameter) -> Self {
        self.insert(name, parameter);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, parameter: CategoricalParameter) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = parameter,
            None => self.entries.push((name, parameter)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CategoricalParameter> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    /// Candidate instance types, if the entry carries any
    pub fn instance_types(&self) -> Option<&CategoricalParameter> {
        self.get(INSTANCE_TYPES_KEY).filter(|p| !p.is_empty())
    }

    /// All entries other than `instance_types`, in insertion order
    pub fn environment_parameters(&self) -> impl Iterator<Item = (&str, &CategoricalParameter)> {
        self.entries
            .iter()
            .filter(|(n, _)| n != INSTANCE_TYPES_KEY)
            .map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Wire fragments

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoricalParameterRange {
    pub name: String,
    pub value: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvironmentParameterRanges {
    pub categorical_parameter_ranges: Vec<CategoricalParameterRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EndpointConfiguration {
    pub environment_parameter_ranges: EnvironmentParameterRanges,
    pub instance_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrafficPattern {
    pub phases: Vec<Phase>,
    pub traffic_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoppingConditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_invocations: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub model_latency_thresholds: Vec<ModelLatencyThreshold>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceLimit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_number_of_tests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_parallel_of_tests: Option<u32>,
}

/// Kind of recommendation job submitted to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    /// Service-provided load-test parameters
    Default,
    /// Caller-provided load-test parameters
    Advanced,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Default => "Default",
            JobType::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Job results

/// Endpoint shape the service recommends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecommendedEndpoint {
    pub instance_type: String,
    pub initial_instance_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_name: Option<String>,
}

/// Load-test measurements for a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecommendationMetrics {
    #[serde(default)]
    pub cost_per_hour: Option<f64>,
    #[serde(default)]
    pub cost_per_inference: Option<f64>,
    #[serde(default)]
    pub max_invocations: Option<u64>,
    #[serde(default)]
    pub model_latency: Option<u64>,
}

/// One ranked entry of `InferenceRecommendations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InferenceRecommendation {
    pub endpoint_configuration: RecommendedEndpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<RecommendationMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_configuration: Option<serde_json::Value>,
}

/// Raw job description returned by the session once the job is terminal
pub type RecommendationJobResults = serde_json::Map<String, serde_json::Value>;

/// Key of the ranked recommendation list inside the job results
pub const INFERENCE_RECOMMENDATIONS_KEY: &str = "InferenceRecommendations";
