//! Structured (XML/SOAP) validator response parsing.
//!
//! The service wraps its verdict in a SOAP envelope: one validity element
//! plus namespaced error and warning entries, each carrying line, col,
//! message and explanation children. Elements are matched by local name,
//! ignoring case, so any namespace prefix is accepted.

use roxmltree::{Document, Node};

use crate::error::{Result, ValidationError};
use crate::finding::Finding;

/// Parse a structured response body into findings.
///
/// Output order is fixed: failures, then warnings, then one finding for the
/// validity verdict. A body that is not well-formed XML is a
/// [`ValidationError::MalformedResponse`]; the caller records it as an error
/// finding for the target and moves on.
pub fn parse(source: &str, body: &str) -> Result<Vec<Finding>> {
    let document = Document::parse(body).map_err(|e| ValidationError::MalformedResponse {
        details: e.to_string(),
    })?;

    let mut failures = Vec::new();
    let mut warnings = Vec::new();
    let mut validity = Vec::new();

    for node in document.descendants().filter(|n| n.is_element()) {
        let name = node.tag_name().name();
        if name.eq_ignore_ascii_case("error") {
            failures.push(entry_finding(source, node, true));
        } else if name.eq_ignore_ascii_case("warning") {
            warnings.push(entry_finding(source, node, false));
        } else if name.eq_ignore_ascii_case("validity") {
            validity.push(node);
        }
    }

    let mut findings = failures;
    findings.append(&mut warnings);
    findings.push(validity_finding(source, &validity));
    Ok(findings)
}

/// Build one finding from an error or warning entry. Missing children leave
/// empty text and zero positions; extraction never fails.
fn entry_finding(source: &str, entry: Node, is_failure: bool) -> Finding {
    let mut message = String::new();
    let mut reason = String::new();
    let mut line = 0;
    let mut column = 0;

    for child in entry.children().filter(|n| n.is_element()) {
        let name = child.tag_name().name();
        if name.eq_ignore_ascii_case("line") {
            line = numeric_text(child);
        } else if name.eq_ignore_ascii_case("col") {
            column = numeric_text(child);
        } else if name.eq_ignore_ascii_case("message") {
            message = element_text(child);
        } else if name.eq_ignore_ascii_case("explanation") {
            reason = element_text(child);
        }
    }

    if is_failure {
        Finding::fail(source, message, reason, line, column)
    } else {
        Finding::warning(source, message, reason, line, column)
    }
}

fn validity_finding(source: &str, validity: &[Node]) -> Finding {
    match validity {
        [node] => {
            let is_valid = element_text(*node).eq_ignore_ascii_case("true");
            let message = format!("Validity is {is_valid}");
            if is_valid {
                Finding::pass(source, message)
            } else {
                Finding::fail(source, message.clone(), message, 0, 0)
            }
        }
        _ => Finding::error(source, "No validity node found"),
    }
}

/// Concatenated text of the element's descendant text nodes, trimmed.
/// Entries can carry inline markup inside message text.
fn element_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn numeric_text(node: Node) -> u32 {
    element_text(node).parse().unwrap_or(0)
}
