use serde::Serialize;

use crate::page::page_model::FormElement;

/// One control's state at capture time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotField {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: String,
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
    pub button_like: bool,
}

/// Value object describing a form's fields, decoupled from the live page.
///
/// Validation and caching read this instead of the page so they can be
/// exercised with hand-built snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub fields: Vec<SnapshotField>,
}

impl FormSnapshot {
    pub fn capture(form: &FormElement) -> Self {
        let fields = form
            .controls
            .iter()
            .map(|c| SnapshotField {
                id: c.id.clone(),
                name: c.name.clone(),
                kind: c.effective_type().to_string(),
                value: c.value.clone(),
                checked: c.checked,
                disabled: c.disabled,
                button_like: c.is_button_like(),
            })
            .collect();

        FormSnapshot { fields }
    }

    pub fn by_id(&self, id: &str) -> Option<&SnapshotField> {
        self.fields.iter().find(|f| f.id.as_deref() == Some(id))
    }

    /// The (name, value) pairs a native submit would send.
    pub fn payload(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .filter(|f| !f.disabled && !f.button_like && f.kind != "file")
            .filter(|f| !is_checkable(&f.kind) || f.checked)
            .filter_map(|f| {
                let name = f.name.clone().filter(|n| !n.is_empty())?;
                let value = if is_checkable(&f.kind) && f.value.is_empty() {
                    "on".to_string()
                } else {
                    f.value.clone()
                };
                Some((name, value))
            })
            .collect()
    }
}

fn is_checkable(kind: &str) -> bool {
    kind == "checkbox" || kind == "radio"
}
