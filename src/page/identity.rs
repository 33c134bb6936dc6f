use std::fmt;

use serde::Serialize;

use crate::page::page_model::FormElement;

/// Stable key distinguishing one form from another for caching purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FormIdentity(pub String);

impl FormIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Session cache key for one field of this form.
    pub fn key_for(&self, field_name: &str) -> String {
        format!("{}_{}", self.0, field_name)
    }

    /// Prefix shared by every cache key this form owns.
    pub fn prefix(&self) -> String {
        format!("{}_", self.0)
    }
}

impl fmt::Display for FormIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit id first, then the submission target. A form without an `action`
/// attribute submits to the page it lives on.
pub fn form_identity(form: &FormElement, page_url: &str) -> Option<FormIdentity> {
    [form.id.as_deref(), form.action.as_deref(), Some(page_url)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .map(|candidate| FormIdentity(candidate.to_string()))
}
