//! Configuration loading across file, environment and CLI sources

use std::fs;
use tempfile::TempDir;
use gdscan::{
    config::{load_config_with_env, CliArgs, ConfigBuilder, ConfigSource, EnvConfig, FileConfig},
    error::ScanError,
    models::config::OutputFormat,
};

#[test]
fn test_init_template_loads_and_validates() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join(".gdscan.toml");
    FileConfig::with_path(&config_path).create_default().unwrap();

    let cli = CliArgs {
        path: Some(dir.path().to_path_buf()),
        config: Some(config_path),
        ..Default::default()
    };
    let settings = load_config_with_env(cli, &EnvConfig::from_vars("GDSCAN", Vec::<(String, String)>::new())).unwrap();

    assert_eq!(settings.output_format, OutputFormat::Text);
    assert!(settings.include_scenes);
    assert!(settings.exclude_patterns.contains(&"addons".to_string()));
}

#[test]
fn test_env_overrides_file_and_cli_overrides_env() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("custom.toml");
    fs::write(
        &config_path,
        "output_format = \"json\"\nparallel = false\ninclude_scenes = true\nmax_depth = 9\n",
    )
    .unwrap();

    let env = EnvConfig::from_vars(
        "GDSCAN",
        [("GDSCAN_OUTPUT_FORMAT", "csv"), ("GDSCAN_INCLUDE_SCENES", "false")],
    );
    let cli = CliArgs {
        path: Some(dir.path().to_path_buf()),
        config: Some(config_path),
        output_format: Some(OutputFormat::Text),
        ..Default::default()
    };

    let settings = load_config_with_env(cli, &env).unwrap();
    assert_eq!(settings.output_format, OutputFormat::Text);
    assert!(!settings.include_scenes);
    assert!(!settings.parallel);
    assert_eq!(settings.max_depth, Some(9));
}

#[test]
fn test_bad_file_is_a_critical_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("bad.toml");
    fs::write(&config_path, "exclude_patterns = \"not a list\"\n").unwrap();

    let err = FileConfig::with_path(&config_path).load().unwrap_err();
    assert!(matches!(err, ScanError::ConfigParse { .. }));
    assert!(err.is_critical());
}

#[test]
fn test_output_directory_must_exist() {
    let dir = TempDir::new().unwrap();
    let partial = gdscan::models::config::PartialSettings {
        source_path: Some(dir.path().to_path_buf()),
        output_file: Some(dir.path().join("missing/report.json")),
        ..Default::default()
    };

    let err = ConfigBuilder::new().merge(partial).build().unwrap_err();
    assert!(matches!(err, ScanError::OutputDirectoryNotFound { .. }));
}
