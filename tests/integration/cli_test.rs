//! Command-line parsing through to a finished run

use clap::Parser;
use std::fs;
use tempfile::TempDir;
use gdscan::{
    cli::{
        args::{Args, OutputFormat as CliOutputFormat},
        commands::{self, Command},
    },
    config::{load_config_with_env, CliArgs, EnvConfig},
    models::config::OutputFormat,
};

#[test]
fn test_cli_args_parsing() {
    let args = Args::parse_from([
        "gdscan",
        "--path",
        "/projects/game",
        "--exclude",
        "addons",
        "--max-depth",
        "4",
        "--output",
        "json",
        "--no-scenes",
        "--verbose",
    ]);

    assert_eq!(args.max_depth, Some(4));
    assert_eq!(args.output, Some(CliOutputFormat::Json));
    assert!(args.no_scenes);
    assert!(args.verbose);
    assert!(!args.quiet);
}

#[test]
fn test_unknown_output_format_is_rejected() {
    assert!(Args::try_parse_from(["gdscan", "--output", "xml"]).is_err());
}

#[test]
fn test_args_to_report() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("arena");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("arena.gd"), "class_name Arena\nextends Node2D\n").unwrap();
    let report = dir.path().join("report.csv");

    let args = Args::parse_from([
        "gdscan",
        "--path",
        project.to_str().unwrap(),
        "--output",
        "csv",
        "--output-file",
        report.to_str().unwrap(),
        "--no-progress",
        "--quiet",
    ]);
    let command = Command::from_args(args);
    let Command::Analyze(args) = &command else {
        panic!("expected an analyze command");
    };

    let env = EnvConfig::from_vars("GDSCAN", Vec::<(String, String)>::new());
    let settings = load_config_with_env(CliArgs::from(args.as_ref()), &env).unwrap();
    assert_eq!(settings.output_format, OutputFormat::Csv);

    let results = commands::analyze(&settings).unwrap();
    commands::write_report(&settings, &results).unwrap();
    assert_eq!(commands::results_exit_code(&results), 0);

    let written = fs::read_to_string(&report).unwrap();
    assert!(written.contains("Arena,entity,Node2D,inheritance,false"));
}

#[test]
fn test_missing_project_exits_with_error_code() {
    let dir = TempDir::new().unwrap();
    let env = EnvConfig::from_vars("GDSCAN", Vec::<(String, String)>::new());
    let cli = CliArgs {
        path: Some(dir.path().join("nowhere")),
        ..Default::default()
    };

    let err = load_config_with_env(cli, &env).unwrap_err();
    assert_eq!(commands::exit_code(&err), 1);
}
