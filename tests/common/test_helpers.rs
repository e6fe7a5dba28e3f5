use std::time::Duration;

/// Wrap response fragments in the validation service's SOAP envelope
pub fn soap_envelope(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope">
  <env:Body>
    <m:markupvalidationresponse xmlns:m="http://www.w3.org/2005/10/markup-validator">
      {inner}
    </m:markupvalidationresponse>
  </env:Body>
</env:Envelope>"#
    )
}

/// A structured reply carrying only the validity verdict
pub fn soap_validity(is_valid: bool) -> String {
    soap_envelope(&format!("<m:validity>{}</m:validity>", is_valid))
}

/// A structured reply with one error entry and a false verdict
pub fn soap_single_error(line: u32, column: u32, message: &str, explanation: &str) -> String {
    soap_envelope(&format!(
        r#"<m:validity>false</m:validity>
      <m:errors>
        <m:errorcount>1</m:errorcount>
        <m:errorlist>
          <m:error>
            <m:line>{line}</m:line>
            <m:col>{column}</m:col>
            <m:message>{message}</m:message>
            <m:explanation>{explanation}</m:explanation>
          </m:error>
        </m:errorlist>
      </m:errors>"#
    ))
}

/// A structured reply with one warning entry and a true verdict
pub fn soap_single_warning(line: u32, column: u32, message: &str, explanation: &str) -> String {
    soap_envelope(&format!(
        r#"<m:validity>true</m:validity>
      <m:warnings>
        <m:warningcount>1</m:warningcount>
        <m:warninglist>
          <m:warning>
            <m:line>{line}</m:line>
            <m:col>{column}</m:col>
            <m:message>{message}</m:message>
            <m:explanation>{explanation}</m:explanation>
          </m:warning>
        </m:warninglist>
      </m:warnings>"#
    ))
}

/// A scraped report page with the given results class and message entries
pub fn report_page(results_class: &str, summary: &str, entries: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head><title>Markup Validation Service: Results</title></head>
  <body>
    <div id="results" class="{results_class}">{summary}</div>
    <ol id="error_loop">
      {entries}
    </ol>
  </body>
</html>"#
    )
}

pub fn report_error_entry(message: &str, snippet: &str) -> String {
    format!(r#"<li class="msg_err"><span class="msg">{message}</span><pre>{snippet}</pre></li>"#)
}

pub fn report_warning_entry(message: &str) -> String {
    format!(r#"<li class="msg_warn"><span class="msg">{message}</span></li>"#)
}

/// Assert that a duration is within expected bounds
pub fn assert_duration_within_bounds(actual: Duration, min: Duration, max: Duration) {
    assert!(
        actual >= min && actual <= max,
        "Duration {:?} not within bounds [{:?}, {:?}]",
        actual,
        min,
        max
    );
}
