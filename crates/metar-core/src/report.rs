//! Fault reporting collaborator
//!
//! The encoder never logs directly; it hands faults to an injected
//! [`Reporter`] so callers decide where diagnostics go.

use chrono::{DateTime, Utc};
use std::error::Error;

/// Sink for diagnostics raised while encoding
pub trait Reporter: Send + Sync {
    fn report(&self, operation: &str, message: &str, fault: Option<&(dyn Error + 'static)>);
}

/// Build the single-line report text, e.g.
/// `parse_token - Failed to parse 'ff' ... [18/10/2026 12:00:00 utc]`
pub fn format_report(
    operation: &str,
    message: &str,
    fault: Option<&(dyn Error + 'static)>,
    at: DateTime<Utc>,
) -> String {
    let mut line = format!(
        "{} - {} [{} utc]",
        operation,
        message,
        at.format("%d/%m/%Y %H:%M:%S")
    );
    if let Some(fault) = fault {
        line.push_str(&format!("\nFault: {fault}"));
        if let Some(source) = fault.source() {
            line.push_str(&format!("\nCaused by: {source}"));
        }
    }
    line
}

/// Reporter backed by the process-wide `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, operation: &str, message: &str, fault: Option<&(dyn Error + 'static)>) {
        let line = format_report(operation, message, fault, Utc::now());
        match fault {
            Some(fault) => tracing::error!(operation, fault = %fault, "{}", line),
            None => tracing::error!(operation, "{}", line),
        }
    }
}
