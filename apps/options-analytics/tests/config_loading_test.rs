//! Integration tests for configuration file loading.

use std::io::Write;

use options_analytics::config::{ConfigError, LogFormat, load_config};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_from_file() {
    let file = write_config(
        r"
pricing:
  risk_free_rate: 0.045
analysis:
  steps: 201
observability:
  logging:
    format: pretty
",
    );

    let config = load_config(file.path().to_str()).unwrap();
    assert!((config.pricing.risk_free_rate - 0.045).abs() < f64::EPSILON);
    assert_eq!(config.analysis.steps, 201);
    assert_eq!(config.observability.logging.format, LogFormat::Pretty);
    assert_eq!(config.iv_solver.max_iterations, 100);
}

#[test]
fn test_env_default_interpolated_in_file() {
    let file = write_config(
        r"
parallel:
  min_parallel_jobs: ${OPTIONS_ANALYTICS_TEST_UNSET_JOBS:-16}
",
    );

    let config = load_config(file.path().to_str()).unwrap();
    assert_eq!(config.parallel.min_parallel_jobs, 16);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let err = load_config(path.to_str()).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn test_invalid_file_rejected() {
    let file = write_config(
        r"
analysis:
  range_width: -0.5
",
    );

    let err = load_config(file.path().to_str()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn test_malformed_yaml() {
    let file = write_config("pricing: [unclosed");
    assert!(matches!(
        load_config(file.path().to_str()),
        Err(ConfigError::ParseError(_))
    ));
}
