//! Translation of load-test parameters into advanced job documents
//!
//! Each translator returns `None` when the caller supplied nothing for its
//! part of the job, which is how `right_size` tells a default job from an
//! advanced one.

use crate::error::{RecommenderError, Result};
use crate::models::{
    EndpointConfiguration, EnvironmentParameterRanges, HyperparameterRange,
    ModelLatencyThreshold, Phase, ResourceLimit, StoppingConditions, TrafficPattern,
    DEFAULT_TRAFFIC_TYPE,
};

/// Expand hyperparameter ranges into one endpoint configuration per instance type
pub fn endpoint_configurations(
    hyperparameter_ranges: &[HyperparameterRange],
) -> Result<Option<Vec<EndpointConfiguration>>> {
    if hyperparameter_ranges.is_empty() {
        return Ok(None);
    }

    let mut configurations = Vec::new();
    for parameter_range in hyperparameter_ranges {
        let instance_types = parameter_range
            .instance_types()
            .ok_or(RecommenderError::MissingInstanceTypes)?;

        for instance_type in instance_types.values() {
            let categorical_parameter_ranges = parameter_range
                .environment_parameters()
                .map(|(name, param)| param.as_range(name))
                .collect();

            configurations.push(EndpointConfiguration {
                environment_parameter_ranges: EnvironmentParameterRanges {
                    categorical_parameter_ranges,
                },
                instance_type: instance_type.clone(),
            });
        }
    }

    Ok(Some(configurations))
}

/// Bundle load phases into a traffic pattern
pub fn traffic_pattern(traffic_type: Option<&str>, phases: &[Phase]) -> Option<TrafficPattern> {
    if phases.is_empty() {
        return None;
    }

    Some(TrafficPattern {
        phases: phases.to_vec(),
        traffic_type: traffic_type
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TRAFFIC_TYPE)
            .to_string(),
    })
}

/// Zero limits mean "not supplied", same as `None`
fn nonzero(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v != 0)
}

/// Bundle invocation and latency limits into stopping conditions
pub fn stopping_conditions(
    max_invocations: Option<u32>,
    model_latency_thresholds: &[ModelLatencyThreshold],
) -> Option<StoppingConditions> {
    let max_invocations = nonzero(max_invocations);
    if max_invocations.is_none() && model_latency_thresholds.is_empty() {
        return None;
    }

    Some(StoppingConditions {
        max_invocations,
        model_latency_thresholds: model_latency_thresholds.to_vec(),
    })
}

/// Bundle test-count limits into a resource limit
pub fn resource_limit(
    max_tests: Option<u32>,
    max_parallel_tests: Option<u32>,
) -> Option<ResourceLimit> {
    let max_tests = nonzero(max_tests);
    let max_parallel_tests = nonzero(max_parallel_tests);
    if max_tests.is_none() && max_parallel_tests.is_none() {
        return None;
    }

    Some(ResourceLimit {
        max_number_of_tests: max_tests,
        max_parallel_of_tests: max_parallel_tests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoricalParameter, INSTANCE_TYPES_KEY};
    use serde_json::json;

    fn sweep(instance_types: &[&str], extra: Vec<(&str, Vec<&str>)>) -> HyperparameterRange {
        let mut range = HyperparameterRange::new()
            .with(INSTANCE_TYPES_KEY, CategoricalParameter::new(instance_types.iter()));
        for (name, values) in extra {
            range.insert(name, CategoricalParameter::new(values));
        }
        range
    }

    #[test]
    fn test_no_ranges_is_none() {
        assert!(endpoint_configurations(&[]).unwrap().is_none());
    }

    #[test]
    fn test_one_configuration_per_instance_type() {
        let ranges = vec![sweep(
            &["ml.c5.xlarge", "ml.c5.2xlarge", "ml.m5.large"],
            vec![
                ("OMP_NUM_THREADS", vec!["1", "2", "4"]),
                ("TS_DEFAULT_WORKERS_PER_MODEL", vec!["1", "2"]),
            ],
        )];

        let configs = endpoint_configurations(&ranges).unwrap().unwrap();
        assert_eq!(configs.len(), 3);
        for config in &configs {
            assert_eq!(
                config
                    .environment_parameter_ranges
                    .categorical_parameter_ranges
                    .len(),
                2
            );
        }
        assert_eq!(configs[1].instance_type, "ml.c5.2xlarge");
    }

    #[test]
    fn test_multiple_ranges_concatenate() {
        let ranges = vec![
            sweep(&["ml.c5.xlarge"], vec![("A", vec!["1"])]),
            sweep(&["ml.g4dn.xlarge", "ml.g4dn.2xlarge"], vec![]),
        ];

        let configs = endpoint_configurations(&ranges).unwrap().unwrap();
        assert_eq!(configs.len(), 3);
        assert!(configs[2]
            .environment_parameter_ranges
            .categorical_parameter_ranges
            .is_empty());
    }

    #[test]
    fn test_missing_instance_types_rejected() {
        let ranges = vec![HyperparameterRange::new().with(
            "OMP_NUM_THREADS",
            CategoricalParameter::new(["1", "2"]),
        )];

        let err = endpoint_configurations(&ranges).unwrap_err();
        assert!(matches!(err, RecommenderError::MissingInstanceTypes));
    }

    #[test]
    fn test_endpoint_configuration_wire_format() {
        let ranges = vec![sweep(&["ml.c5.xlarge"], vec![("OMP_NUM_THREADS", vec!["1", "2"])])];
        let configs = endpoint_configurations(&ranges).unwrap().unwrap();

        assert_eq!(
            serde_json::to_value(&configs).unwrap(),
            json!([{
                "EnvironmentParameterRanges": {
                    "CategoricalParameterRanges": [
                        {"Name": "OMP_NUM_THREADS", "Value": ["1", "2"]}
                    ]
                },
                "InstanceType": "ml.c5.xlarge"
            }])
        );
    }

    #[test]
    fn test_traffic_pattern_without_phases_is_none() {
        assert!(traffic_pattern(None, &[]).is_none());
        assert!(traffic_pattern(Some("PHASES"), &[]).is_none());
    }

    #[test]
    fn test_traffic_pattern_defaults_type() {
        let phases = [Phase::new(120, 1, 1), Phase::new(120, 5, 2)];
        let pattern = traffic_pattern(None, &phases).unwrap();

        assert_eq!(pattern.traffic_type, "PHASES");
        assert_eq!(pattern.phases.len(), 2);
        assert_eq!(
            serde_json::to_value(&pattern).unwrap()["Phases"][1],
            json!({"DurationInSeconds": 120, "InitialNumberOfUsers": 5, "SpawnRate": 2})
        );
    }

    #[test]
    fn test_traffic_pattern_keeps_explicit_type() {
        let pattern = traffic_pattern(Some("STAIRS"), &[Phase::new(60, 1, 1)]).unwrap();
        assert_eq!(pattern.traffic_type, "STAIRS");
    }

    #[test]
    fn test_stopping_conditions() {
        assert!(stopping_conditions(None, &[]).is_none());

        let thresholds = [ModelLatencyThreshold::new("P95", 100)];
        let conditions = stopping_conditions(Some(300), &thresholds).unwrap();
        assert_eq!(
            serde_json::to_value(&conditions).unwrap(),
            json!({
                "MaxInvocations": 300,
                "ModelLatencyThresholds": [{"Percentile": "P95", "ValueInMilliseconds": 100}]
            })
        );
    }

    #[test]
    fn test_empty_traffic_type_defaults() {
        let pattern = traffic_pattern(Some(""), &[Phase::new(60, 1, 1)]).unwrap();
        assert_eq!(pattern.traffic_type, "PHASES");
    }

    #[test]
    fn test_zero_limits_are_absent() {
        assert!(stopping_conditions(Some(0), &[]).is_none());
        assert!(resource_limit(Some(0), Some(0)).is_none());
        assert!(resource_limit(Some(0), None).is_none());

        let limit = resource_limit(Some(0), Some(2)).unwrap();
        assert_eq!(
            serde_json::to_value(&limit).unwrap(),
            json!({"MaxParallelOfTests": 2})
        );

        let thresholds = [ModelLatencyThreshold::new("P99", 250)];
        let conditions = stopping_conditions(Some(0), &thresholds).unwrap();
        assert_eq!(conditions.max_invocations, None);
    }

    #[test]
    fn test_stopping_conditions_with_invocations_only() {
        let conditions = stopping_conditions(Some(300), &[]).unwrap();
        assert_eq!(
            serde_json::to_value(&conditions).unwrap(),
            json!({"MaxInvocations": 300})
        );
    }

    #[test]
    fn test_resource_limit() {
        assert!(resource_limit(None, None).is_none());

        let limit = resource_limit(Some(10), Some(2)).unwrap();
        assert_eq!(
            serde_json::to_value(&limit).unwrap(),
            json!({"MaxNumberOfTests": 10, "MaxParallelOfTests": 2})
        );

        let partial = resource_limit(None, Some(3)).unwrap();
        assert_eq!(
            serde_json::to_value(&partial).unwrap(),
            json!({"MaxParallelOfTests": 3})
        );
    }
}
