//! Scraped (HTML report page) validator response parsing.
//!
//! Some service revisions only reply with the human-facing report page, so
//! findings are recovered from its CSS class markers: `msg_err` entries,
//! `msg_warn` entries and the `#results` summary block. Parsing is
//! best-effort; missing attributes or children produce empty fields, never a
//! failure.

use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};

use crate::finding::Finding;

/// Parse a report page into findings: failures, then warnings, then one
/// finding for the summary block.
pub fn parse(source: &str, body: &str) -> Vec<Finding> {
    let document = Html::parse_document(body);

    let mut findings = Vec::new();
    for entry in document.select(error_selector()) {
        findings.push(error_finding(source, entry));
    }
    for entry in document.select(warning_selector()) {
        findings.push(warning_finding(source, entry));
    }
    findings.push(results_finding(source, &document));
    findings
}

/// One failure per `msg_err` entry: the message comes from a child `<span>`
/// marked `msg`, the offending snippet from a child `<pre>`.
fn error_finding(source: &str, entry: ElementRef) -> Finding {
    let mut message = String::new();
    let mut snippet = String::new();

    for child in entry.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "pre" if snippet.is_empty() => {
                snippet = child.text().collect::<String>().trim().to_string();
            }
            "span" if message.is_empty() && class_contains(child, "msg") => {
                message = collapsed_text(child);
            }
            _ => {}
        }
    }

    Finding::fail(source, message, snippet, 0, 0)
}

fn warning_finding(source: &str, entry: ElementRef) -> Finding {
    let message = collapsed_text(entry);
    Finding::warning(source, message.clone(), message, 0, 0)
}

/// The page's verdict. The `#results` block must be unique; its `valid`
/// marker is matched as a whole class token so `invalid` does not count.
fn results_finding(source: &str, document: &Html) -> Finding {
    let nodes: Vec<ElementRef> = document.select(results_selector()).collect();
    match nodes.as_slice() {
        [node] => {
            let is_valid = node
                .value()
                .classes()
                .any(|c| c.eq_ignore_ascii_case("valid"));
            let text = collapsed_text(*node);
            if is_valid {
                let message = if text.is_empty() {
                    "Validity is true".to_string()
                } else {
                    text
                };
                Finding::pass(source, message)
            } else {
                let message = if text.is_empty() {
                    "Validity is false".to_string()
                } else {
                    text
                };
                Finding::fail(source, message.clone(), message, 0, 0)
            }
        }
        _ => Finding::error(source, "expecting a single results node"),
    }
}

fn class_contains(element: ElementRef, marker: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|c| c.contains(marker))
}

/// Text content with whitespace runs collapsed; report pages indent freely
fn collapsed_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn error_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(r#"[class*="msg_err"]"#).expect("valid selector"))
}

fn warning_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(r#"[class*="msg_warn"]"#).expect("valid selector"))
}

fn results_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("#results").expect("valid selector"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Outcome;

    #[test]
    fn test_valid_report_page() {
        let body = r#"<!DOCTYPE html><html><body>
            <div id="results" class="valid">
                <h2>Congratulations</h2>
                <p>This document was successfully checked!</p>
            </div>
        </body></html>"#;

        let findings = parse("a.html", body);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].outcome, Outcome::Pass);
        assert_eq!(
            findings[0].message,
            "Congratulations This document was successfully checked!"
        );
    }

    #[test]
    fn test_invalid_marker_is_not_valid() {
        let body = r#"<html><body>
            <div id="results" class="invalid">Errors found while checking!</div>
        </body></html>"#;

        let findings = parse("a.html", body);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].outcome, Outcome::Fail);
        assert_eq!(findings[0].message, "Errors found while checking!");
    }

    #[test]
    fn test_error_entry_combines_span_and_pre() {
        let body = r#"<html><body>
            <div id="results" class="invalid">Errors found</div>
            <ol>
                <li class="msg_err">
                    <span class="err_type">E</span>
                    <span class="msg">bar</span>
                    <pre>foo</pre>
                </li>
            </ol>
        </body></html>"#;

        let findings = parse("a.html", body);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].outcome, Outcome::Fail);
        assert_eq!(findings[0].message, "bar");
        assert_eq!(findings[0].reason, "foo");
        assert_eq!(findings[1].outcome, Outcome::Fail);
    }

    #[test]
    fn test_error_entry_with_missing_children() {
        let body = r#"<html><body>
            <div id="results" class="invalid">Errors found</div>
            <li class="msg_err"><em>Line 4, Column 2</em></li>
        </body></html>"#;

        let findings = parse("a.html", body);
        assert_eq!(findings[0].outcome, Outcome::Fail);
        assert_eq!(findings[0].message, "");
        assert_eq!(findings[0].reason, "");
        assert_eq!(findings[0].line, 0);
        assert_eq!(findings[0].column, 0);
    }

    #[test]
    fn test_warning_entry_text_becomes_message_and_reason() {
        let body = r#"<html><body>
            <div id="results" class="valid">Checked</div>
            <li class="msg_warn">
                <span class="msg">obsolete   doctype</span>
            </li>
        </body></html>"#;

        let findings = parse("a.html", body);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].outcome, Outcome::Warning);
        assert_eq!(findings[0].message, "obsolete doctype");
        assert_eq!(findings[0].reason, findings[0].message);
    }

    #[test]
    fn test_failures_before_warnings_before_summary() {
        let body = r#"<html><body>
            <li class="msg_warn">minor</li>
            <li class="msg_err"><span class="msg">major</span></li>
            <div id="results" class="invalid">Errors found</div>
        </body></html>"#;

        let findings = parse("a.html", body);
        let outcomes: Vec<Outcome> = findings.iter().map(|f| f.outcome).collect();
        assert_eq!(outcomes, vec![Outcome::Fail, Outcome::Warning, Outcome::Fail]);
        assert_eq!(findings[0].message, "major");
        assert_eq!(findings[1].message, "minor");
    }

    #[test]
    fn test_missing_results_node() {
        let findings = parse("a.html", "<html><body><p>nothing here</p></body></html>");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].outcome, Outcome::Error);
        assert_eq!(findings[0].message, "expecting a single results node");
    }

    #[test]
    fn test_duplicate_results_nodes() {
        let body = r#"<html><body>
            <div id="results" class="valid">one</div>
            <div id="results" class="valid">two</div>
        </body></html>"#;

        let findings = parse("a.html", body);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].outcome, Outcome::Error);
        assert_eq!(findings[0].message, "expecting a single results node");
    }

    #[test]
    fn test_empty_body_degrades_to_error_finding() {
        let findings = parse("a.html", "");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].outcome, Outcome::Error);
    }

    #[test]
    fn test_truncated_markup_is_tolerated() {
        let body = r#"<html><body><div id="results" class="valid">Checked<li class="msg_warn">warn"#;
        let findings = parse("a.html", body);
        assert!(!findings.is_empty());
    }
}
