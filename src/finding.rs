//! Result model shared by every stage of a validation run.
//!
//! A [`Finding`] is one reported outcome about one target; a [`ResultSet`] is
//! the ordered, append-only collection a run produces. Findings are immutable
//! once constructed and field extraction never fails: unknown positions are 0
//! and missing text is the empty string.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Classification of a single finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The target (or one aspect of it) passed validation
    Pass,
    /// The validator reported a markup failure
    Fail,
    /// The validator reported a non-fatal warning
    Warning,
    /// The run itself failed for this target (network, parse, config)
    Error,
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Outcome::Fail)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Outcome::Warning)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error)
    }
}

/// One reported outcome about one validated target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The target identifier this finding belongs to
    pub source: String,
    /// Pass/fail/warning/error classification
    pub outcome: Outcome,
    /// Human-readable description
    pub message: String,
    /// Secondary detail; equals `message` when the service gives no more
    pub reason: String,
    /// 1-based line in the submitted document, 0 if unknown
    pub line: u32,
    /// 1-based column in the submitted document, 0 if unknown
    pub column: u32,
}

impl Finding {
    /// Create a passing finding; `reason` mirrors the message
    pub fn pass(source: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            source: source.into(),
            outcome: Outcome::Pass,
            reason: message.clone(),
            message,
            line: 0,
            column: 0,
        }
    }

    /// Create a failing finding with positional information
    pub fn fail(
        source: impl Into<String>,
        message: impl Into<String>,
        reason: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            source: source.into(),
            outcome: Outcome::Fail,
            message: message.into(),
            reason: reason.into(),
            line,
            column,
        }
    }

    /// Create a warning finding with positional information
    pub fn warning(
        source: impl Into<String>,
        message: impl Into<String>,
        reason: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            source: source.into(),
            outcome: Outcome::Warning,
            message: message.into(),
            reason: reason.into(),
            line,
            column,
        }
    }

    /// Create an error finding; `reason` mirrors the message
    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            source: source.into(),
            outcome: Outcome::Error,
            reason: message.clone(),
            message,
            line: 0,
            column: 0,
        }
    }

    /// Convert a per-target failure into the error finding recorded for it
    pub fn from_error(source: impl Into<String>, error: &ValidationError) -> Self {
        Self::error(source, error.to_string())
    }

    /// True when the finding carries a known source position
    pub fn has_position(&self) -> bool {
        self.line != 0 || self.column != 0
    }
}

/// Ordered, append-only collection of findings for one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    findings: Vec<Finding>,
}

/// Per-outcome counters for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one finding, preserving submission order
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Append findings in the order the parser produced them
    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    /// True when any finding is a failure or a run error
    pub fn has_failures(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.outcome.is_fail() || f.outcome.is_error())
    }

    /// Aggregate per-outcome counters
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.findings.len(),
            ..RunSummary::default()
        };
        for finding in &self.findings {
            match finding.outcome {
                Outcome::Pass => summary.passed += 1,
                Outcome::Fail => summary.failed += 1,
                Outcome::Warning => summary.warnings += 1,
                Outcome::Error => summary.errors += 1,
            }
        }
        summary
    }
}

impl IntoIterator for ResultSet {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}
