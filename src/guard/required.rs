use std::fmt;

use serde::{Deserialize, Serialize};

use crate::page::snapshot::FormSnapshot;

/// Element id whose presence marks the root-cause analysis form.
pub const ROOT_CAUSE_TRIGGER: &str = "root_cause1";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldCheck {
    /// Missing when the trimmed value is empty
    #[default]
    Text,
    /// Missing when no date is selected
    Date,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequiredField {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub kind: FieldCheck,
}

impl RequiredField {
    pub fn text(id: &str, message: &str) -> Self {
        Self {
            id: id.to_string(),
            message: message.to_string(),
            kind: FieldCheck::Text,
        }
    }

    pub fn date(id: &str, message: &str) -> Self {
        Self {
            id: id.to_string(),
            message: message.to_string(),
            kind: FieldCheck::Date,
        }
    }

    fn is_missing(&self, snapshot: &FormSnapshot) -> bool {
        match snapshot.by_id(&self.id) {
            None => true,
            Some(field) => match self.kind {
                FieldCheck::Text => field.value.trim().is_empty(),
                FieldCheck::Date => field.value.is_empty(),
            },
        }
    }
}

/// The root-cause analysis form's required fields, in display order.
pub fn root_cause_fields() -> Vec<RequiredField> {
    vec![
        RequiredField::text("root_cause1", "1. Kök Neden alanı zorunludur."),
        RequiredField::text("root_cause2", "2. Kök Neden alanı zorunludur."),
        RequiredField::text("root_cause3", "3. Kök Neden alanı zorunludur."),
        RequiredField::text("action_plan", "Aksiyon Planı alanı zorunludur."),
        RequiredField::date("deadline", "Termin Tarihi alanı zorunludur."),
    ]
}

/// One message per missing field, in the order the fields are listed.
pub fn missing_required(snapshot: &FormSnapshot, fields: &[RequiredField]) -> Vec<String> {
    fields
        .iter()
        .filter(|f| f.is_missing(snapshot))
        .map(|f| f.message.clone())
        .collect()
}

/// Required fields left unfilled. Never leaves the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} required field(s) missing: {}", self.messages.len(), self.messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}
