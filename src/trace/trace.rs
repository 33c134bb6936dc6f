use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One JSONL trace line describing a handled page event.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    /// Page clock (virtual milliseconds since load)
    pub clock_ms: u64,

    pub event: String,

    pub form: Option<String>,
    pub field: Option<String>,

    /// Fingerprint of the value involved; typed text is never logged raw
    pub value_fingerprint: Option<String>,

    pub outcome: Option<String>,
    pub details: Vec<String>,
}

impl TraceEvent {
    pub fn now(event: &str, clock_ms: u64) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            clock_ms,
            event: event.to_string(),
            form: None,
            field: None,
            value_fingerprint: None,
            outcome: None,
            details: vec![],
        }
    }

    pub fn with_form(mut self, form: impl ToString) -> Self {
        self.form = Some(form.to_string());
        self
    }

    pub fn with_field(mut self, field: impl ToString) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value_fingerprint = Some(value_fingerprint(value));
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_details(mut self, details: &[String]) -> Self {
        self.details = details.to_vec();
        self
    }
}

/// Short SHA-1 fingerprint, enough to correlate values across trace lines.
pub fn value_fingerprint(value: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(value.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..12].to_string()
}
