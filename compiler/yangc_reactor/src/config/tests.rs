use super::*;

#[test]
fn test_default_config() {
    let config = ReactorConfig::default();
    assert!(config.parallel);
    assert!(!config.semantic_versioning);
    assert!(config.supported_features.is_none());
}

#[test]
fn test_builder_methods() {
    let config = ReactorConfig::sequential()
        .with_semantic_versioning(true)
        .with_supported_features(FeatureSet::new().with("urn:foo", "fast"));
    assert!(!config.parallel);
    assert!(config.semantic_versioning);
    let features = config.supported_features.unwrap_or_default();
    assert!(features.contains("urn:foo", "fast"));
    assert!(!features.contains("urn:foo", "slow"));
    assert!(!features.contains("urn:bar", "fast"));
    assert_eq!(features.len(), 1);
}
