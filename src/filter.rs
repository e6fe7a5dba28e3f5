//! Message suppression filter for service-reported findings.
//!
//! Operators list substrings of messages they consider acceptable. A finding
//! whose message or reason contains any listed substring (case-insensitive)
//! is re-recorded as a pass, keeping the original text behind an
//! `Ignored Message: ` prefix so reports still show what was suppressed
//! without counting it as a failure.

use crate::finding::{Finding, Outcome};

/// Prefix prepended to the message of a suppressed finding
pub const IGNORED_PREFIX: &str = "Ignored Message: ";

/// Substring-based ignore list, matched case-insensitively
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    patterns: Vec<String>,
}

impl MessageFilter {
    /// Build a filter from configured patterns. Patterns are lowercased once
    /// here; empty patterns are dropped since an empty substring would match
    /// every message.
    pub fn new(patterns: impl IntoIterator<Item = String>) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .filter(|p| !p.is_empty())
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// True when any pattern is a substring of the finding's message or
    /// reason, ignoring case
    pub fn should_ignore(&self, finding: &Finding) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let message = finding.message.to_lowercase();
        let reason = finding.reason.to_lowercase();
        self.patterns
            .iter()
            .any(|p| message.contains(p.as_str()) || reason.contains(p.as_str()))
    }

    /// Re-record a matching finding as a pass, prefixing its message.
    /// Position and reason are preserved so the report keeps the detail.
    pub fn apply(&self, finding: Finding) -> Finding {
        if self.should_ignore(&finding) {
            Finding {
                outcome: Outcome::Pass,
                message: format!("{IGNORED_PREFIX}{}", finding.message),
                ..finding
            }
        } else {
            finding
        }
    }

    /// Apply the filter to every finding, preserving parser order
    pub fn apply_all(&self, findings: Vec<Finding>) -> Vec<Finding> {
        findings.into_iter().map(|f| self.apply(f)).collect()
    }
}
