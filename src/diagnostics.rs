use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// Non-fatal finding accumulated during a conversion. Warnings never abort
/// the pipeline; they ride alongside a successful result so the caller can
/// surface possible simulation-semantics drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Smallest source fragment that reproduces the finding.
    pub context: String,
    /// Filled in by the orchestrator, which is the only layer that knows
    /// which file a model came from.
    pub file: Option<PathBuf>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            context: context.into(),
            file: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.file {
            Some(file) => write!(
                f,
                "{}: {} ({}: `{}`)",
                severity,
                self.message,
                file.display(),
                self.context
            ),
            None => write!(f, "{}: {} (`{}`)", severity, self.message, self.context),
        }
    }
}
