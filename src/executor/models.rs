use std::time::Duration;

use reqwest::StatusCode;

use crate::parser::RequestDescription;

#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    pub timeout: Option<Duration>,
}

/// One request/response exchange, alive only while its report is written.
pub struct ReportRecord<'a> {
    pub request: &'a RequestDescription,
    pub status: StatusCode,
    /// Reason phrase sent by the server, when it differs from the canonical one.
    pub reason: Option<String>,
    pub body: Vec<u8>,
}

impl ReportRecord<'_> {
    /// Status code plus reason, e.g. `200 OK`.
    pub fn status_line(&self) -> String {
        match self.reason.as_deref().or(self.status.canonical_reason()) {
            Some(reason) => format!("{} {}", self.status.as_str(), reason),
            None => self.status.as_str().to_string(),
        }
    }
}
