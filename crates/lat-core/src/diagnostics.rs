//! Diagnostics infrastructure for validation and de-duplicated warnings.
//!
//! Two facilities live here:
//!
//! - [`Diagnostics`], a collector for warnings and errors raised while
//!   validating a system description (unknown unit references, groups that
//!   can never fail, ...). Callers inspect it and decide whether to abort.
//! - [`warn_once`], a process-wide de-duplicated warning channel used by the
//!   reliability builder and the simulator for parameter warnings that would
//!   otherwise repeat on every trace segment or Monte-Carlo iteration.
//!
//! # Example
//!
//! ```
//! use lat_core::diagnostics::{Diagnostics, Severity};
//!
//! let mut diag = Diagnostics::new();
//! diag.add_warning("structure", "group 'soc' can never fail");
//! diag.add_error_with_entity("reference", "unknown unit in group", "cpu9");
//! assert_eq!(diag.warning_count(), 1);
//! assert!(diag.has_errors());
//! ```

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Severity level for diagnostic issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Unusual but operation continued (e.g., defaulted value)
    Warning,
    /// Could not complete element/operation (e.g., malformed data)
    Error,
}

/// A single diagnostic issue encountered during an operation
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    /// Severity of the issue
    pub severity: Severity,
    /// Category for grouping (e.g., "parse", "structure", "reference")
    pub category: String,
    /// Human-readable description of the issue
    pub message: String,
    /// Optional entity reference (e.g., "unit cpu0", "group soc")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;
        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }
        Ok(())
    }
}

/// Collector for issues found while loading or validating a system.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, category: &str, message: &str) {
        self.issues.push(DiagnosticIssue {
            severity: Severity::Warning,
            category: category.to_string(),
            message: message.to_string(),
            entity: None,
        });
    }

    pub fn add_error(&mut self, category: &str, message: &str) {
        self.issues.push(DiagnosticIssue {
            severity: Severity::Error,
            category: category.to_string(),
            message: message.to_string(),
            entity: None,
        });
    }

    pub fn add_error_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.issues.push(DiagnosticIssue {
            severity: Severity::Error,
            category: category.to_string(),
            message: message.to_string(),
            entity: Some(entity.to_string()),
        });
    }

    pub fn add_warning_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.issues.push(DiagnosticIssue {
            severity: Severity::Warning,
            category: category.to_string(),
            message: message.to_string(),
            entity: Some(entity.to_string()),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter()
    }
}

static EMITTED: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Emit a warning at most once per distinct message for the process lifetime.
///
/// Parameter warnings (missing quantity fallbacks, unknown configurations,
/// subthreshold supply voltages) fire from inside per-segment and
/// per-iteration loops; without de-duplication they would flood stderr.
pub fn warn_once(message: &str) {
    let mut seen = EMITTED.lock().unwrap_or_else(PoisonError::into_inner);
    if seen.insert(message.to_string()) {
        tracing::warn!("{message}");
    }
}

/// True if [`warn_once`] has already emitted this exact message.
pub fn warned(message: &str) -> bool {
    EMITTED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(message)
}
