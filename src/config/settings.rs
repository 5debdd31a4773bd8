//! Settings validation

use std::path::Path;

use crate::error::{Result, ResultExt, ScanError};
use crate::models::config::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.source_path.exists() {
            return Err(ScanError::InvalidPath {
                path: settings.source_path.clone(),
            });
        }

        for pattern in &settings.exclude_patterns {
            glob::Pattern::new(pattern).with_context(|| format!("Invalid exclude pattern: {}", pattern))?;
        }

        if let Some(depth) = settings.max_depth {
            if depth == 0 {
                return Err(ScanError::config_error("Max depth must be at least 1"));
            }
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// Validate that the directory of an output path exists
    fn validate_output_path(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(ScanError::OutputDirectoryNotFound {
                    path: parent.to_path_buf(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_valid_settings() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            source_path: dir.path().to_path_buf(),
            output_file: Some(dir.path().join("report.json")),
            max_depth: Some(3),
            ..Default::default()
        };
        assert!(SettingsValidator::validate(&settings).is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        let dir = tempdir().unwrap();

        let missing_root = Settings {
            source_path: dir.path().join("absent"),
            ..Default::default()
        };
        assert!(matches!(
            SettingsValidator::validate(&missing_root),
            Err(ScanError::InvalidPath { .. })
        ));

        let zero_depth = Settings {
            source_path: dir.path().to_path_buf(),
            max_depth: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            SettingsValidator::validate(&zero_depth),
            Err(ScanError::Config { .. })
        ));

        let bad_output = Settings {
            source_path: dir.path().to_path_buf(),
            output_file: Some(dir.path().join("no/such/dir/report.csv")),
            ..Default::default()
        };
        let err = SettingsValidator::validate(&bad_output).unwrap_err();
        assert!(matches!(err, ScanError::OutputDirectoryNotFound { .. }));
        assert!(err.is_critical());
    }

    #[test]
    fn test_bare_output_file_name_is_valid() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            source_path: dir.path().to_path_buf(),
            output_file: Some("report.txt".into()),
            ..Default::default()
        };
        assert!(SettingsValidator::validate(&settings).is_ok());
    }
}
