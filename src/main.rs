use std::process;

use gdscan::{
    cli::{
        commands::{self, Command},
        Args,
    },
    error::ScanError,
    models::config::Settings,
};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse_args();
    let command = Command::from_args(args);
    process::exit(run_command(command));
}

/// Install the stderr subscriber; `RUST_LOG` wins over the settings
fn init_tracing(settings: Option<&Settings>) {
    let fallback = settings.map(Settings::log_filter).unwrap_or_else(|| "warn".to_string());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let use_ansi = settings.map_or(true, |settings| settings.use_colors);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(false)
        .try_init();
}

fn report_error(err: &ScanError) -> i32 {
    eprintln!("\nError: {}", err.user_message());

    match err {
        ScanError::InvalidPath { .. } => {
            eprintln!("Suggestion: Check that the path exists and points at a Godot project directory");
        }
        ScanError::ConfigNotFound { .. } => {
            eprintln!("Suggestion: Run `gdscan --init` to create a .gdscan.toml or pass --config");
        }
        ScanError::PermissionDenied { .. } => {
            eprintln!("Suggestion: Check file permissions or exclude the directory with --exclude");
        }
        ScanError::OutputDirectoryNotFound { .. } => {
            eprintln!("Suggestion: Create the output directory first or specify a different path");
        }
        _ => {}
    }

    let code = commands::exit_code(err);
    if code > 0 {
        eprintln!("\nExiting with code {} due to {}", code, err.severity());
    }
    code
}

/// Run the command and map the outcome to a process exit code
fn run_command(command: Command) -> i32 {
    let settings = match command.settings() {
        Ok(settings) => settings,
        Err(err) => {
            init_tracing(None);
            return report_error(&err);
        }
    };
    init_tracing(settings.as_ref());

    match settings {
        None => {
            let path = commands::default_config_path();
            match commands::init_config(&path) {
                Ok(true) => {
                    println!("Created default configuration file at: {}", path.display());
                    println!("Edit it to set source_path, exclude_patterns, output_format and friends.");
                    0
                }
                Ok(false) => {
                    println!("Configuration file already exists at: {}", path.display());
                    println!("To overwrite it, delete the file first and run this command again.");
                    0
                }
                Err(err) => report_error(&err),
            }
        }
        Some(settings) => {
            let outcome = commands::analyze(&settings)
                .and_then(|results| commands::write_report(&settings, &results).map(|_| results));
            match outcome {
                Ok(results) => commands::results_exit_code(&results),
                Err(err) => report_error(&err),
            }
        }
    }
}
