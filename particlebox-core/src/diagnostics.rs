//! Diagnostics and error reporting for particlebox
//!
//! Turns configuration and runtime errors into messages for the CLI.

use crate::error::SimulationError;

/// Format a scenario loading error, quoting the offending line when known
pub fn format_config_error(error: &SimulationError, source: &str) -> String {
    let mut msg = format!("Config error: {}", error);

    if let Some((line, column)) = error.location() {
        if let Some(text) = source.lines().nth(line.saturating_sub(1)) {
            msg.push_str(&format!("\n  at line {}, column {}: {}", line, column, text));
        }
    }

    msg
}

/// Format a runtime error with context
pub fn format_runtime_error(error: &dyn std::error::Error) -> String {
    format!("Runtime error: {}", error)
}
