//! Progress reporting functionality
//!
//! This module provides progress reporting for the extraction loop with
//! support for quiet and verbose modes. Everything is drawn on stderr so
//! the report on stdout stays clean.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

/// Progress reporter for long-running operations
pub struct ProgressReporter {
    quiet: bool,
    verbose: bool,
    bar: Option<ProgressBar>,
    current_operation: Mutex<String>,
}

impl ProgressReporter {
    /// Create a new progress reporter
    ///
    /// No bar is drawn in quiet mode or when `show_progress` is off.
    pub fn new(quiet: bool, verbose: bool, show_progress: bool) -> Self {
        let bar = if quiet || !show_progress {
            None
        } else {
            let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
            if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                bar.set_style(style.progress_chars("#>-"));
            }
            Some(bar)
        };

        Self {
            quiet,
            verbose,
            bar,
            current_operation: Mutex::new(String::new()),
        }
    }

    /// A reporter that draws nothing
    pub fn hidden() -> Self {
        Self::new(true, false, false)
    }

    /// Start a new progress operation
    pub fn start(&self, total: usize, operation: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.bar {
            bar.reset();
            bar.set_length(total as u64);
            bar.set_message(operation.to_string());
        }

        if let Ok(mut current_op) = self.current_operation.lock() {
            *current_op = operation.to_string();
        }

        if self.verbose {
            eprintln!("Starting: {}", operation);
        }
    }

    /// Update progress
    pub fn update(&self, current: usize, total: usize, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.bar {
            bar.set_length(total as u64);
            bar.set_position(current as u64);

            if let Ok(mut current_op) = self.current_operation.lock() {
                if message != *current_op {
                    bar.set_message(message.to_string());
                    *current_op = message.to_string();
                }
            }
        } else if self.verbose {
            eprintln!("[{}/{}] {}", current, total, message);
        }
    }

    /// Finish the progress operation
    pub fn finish(&self, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }

        if self.verbose {
            eprintln!("Finished: {}", message);
        }
    }

    /// Position of the bar, if one is drawn
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }

    /// Print a warning message (always printed, even in quiet mode)
    pub fn print_warning(&self, message: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("Warning: {}", message)),
            None => eprintln!("Warning: {}", message),
        }
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
