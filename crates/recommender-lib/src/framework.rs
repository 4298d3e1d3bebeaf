//! Framework names as understood by the recommendation service

/// Detected framework name to the label the service expects
pub const FRAMEWORK_MAPPING: &[(&str, &str)] = &[
    ("xgboost", "XGBOOST"),
    ("sklearn", "SAGEMAKER-SCIKIT-LEARN"),
    ("pytorch", "PYTORCH"),
    ("tensorflow", "TENSORFLOW"),
    ("mxnet", "MXNET"),
];

/// Map a detected framework name, passing unknown names through unchanged
pub fn recommender_framework(detected: &str) -> String {
    FRAMEWORK_MAPPING
        .iter()
        .find(|(name, _)| *name == detected)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| detected.to_string())
}

/// Pick the framework label for a job: explicit wins, then the detected one
///
/// An empty explicit label counts as unset.
pub fn resolve_framework(explicit: Option<&str>, detected: Option<&str>) -> Option<String> {
    match explicit.filter(|f| !f.is_empty()) {
        Some(framework) => Some(framework.to_string()),
        None => detected.filter(|f| !f.is_empty()).map(recommender_framework),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_frameworks_mapped() {
        assert_eq!(recommender_framework("xgboost"), "XGBOOST");
        assert_eq!(recommender_framework("sklearn"), "SAGEMAKER-SCIKIT-LEARN");
        assert_eq!(recommender_framework("pytorch"), "PYTORCH");
        assert_eq!(recommender_framework("tensorflow"), "TENSORFLOW");
        assert_eq!(recommender_framework("mxnet"), "MXNET");
    }

    #[test]
    fn test_unknown_framework_passes_through() {
        assert_eq!(recommender_framework("huggingface"), "huggingface");
    }

    #[test]
    fn test_explicit_framework_wins() {
        assert_eq!(
            resolve_framework(Some("PYTORCH"), Some("xgboost")),
            Some("PYTORCH".to_string())
        );
        assert_eq!(
            resolve_framework(None, Some("sklearn")),
            Some("SAGEMAKER-SCIKIT-LEARN".to_string())
        );
        assert_eq!(resolve_framework(None, None), None);
    }

    #[test]
    fn test_empty_explicit_framework_falls_back() {
        assert_eq!(
            resolve_framework(Some(""), Some("xgboost")),
            Some("XGBOOST".to_string())
        );
        assert_eq!(resolve_framework(Some(""), None), None);
    }
}
