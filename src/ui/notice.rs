use serde::{Deserialize, Serialize};

pub const ERROR_HEADING: &str = "Lütfen aşağıdaki hataları düzeltin:";
pub const ALERT_DISMISS_MS: u64 = 5000;
pub const ALERT_FADE_MS: u64 = 300;

/// One dismissible notice listing every current validation error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorNotice {
    pub heading: String,
    pub messages: Vec<String>,
    pub dismissible: bool,
}

impl ErrorNotice {
    pub fn new(messages: Vec<String>) -> Self {
        Self {
            heading: ERROR_HEADING.to_string(),
            messages,
            dismissible: true,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from(
            "<div class=\"alert alert-danger alert-dismissible fade show mt-3\" role=\"alert\">",
        );
        out.push_str(&format!("<strong>{}</strong><ul>", escape_html(&self.heading)));
        for message in &self.messages {
            out.push_str(&format!("<li>{}</li>", escape_html(message)));
        }
        out.push_str("</ul>");
        if self.dismissible {
            out.push_str(
                "<button type=\"button\" class=\"btn-close\" data-bs-dismiss=\"alert\" aria-label=\"Kapat\"></button>",
            );
        }
        out.push_str("</div>");
        out
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Info => "info",
            AlertKind::Warning => "warning",
            AlertKind::Danger => "danger",
        }
    }
}

/// Transient alert appended to the page's alert container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlashAlert {
    pub kind: AlertKind,
    pub message: String,
    pub dismiss_after_ms: u64,
}

impl FlashAlert {
    pub fn new(kind: AlertKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
            dismiss_after_ms: ALERT_DISMISS_MS,
        }
    }

    /// Time after creation when the element is removed (dismiss, then fade out).
    pub fn removed_after_ms(&self) -> u64 {
        self.dismiss_after_ms + ALERT_FADE_MS
    }

    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"alert alert-{} alert-dismissible fade show\" role=\"alert\">{}<button type=\"button\" class=\"btn-close\" data-bs-dismiss=\"alert\" aria-label=\"Kapat\"></button></div>",
            self.kind.as_str(),
            escape_html(&self.message)
        )
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
