use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::page::identity::{FormIdentity, form_identity};
use crate::ui::notice::ErrorNotice;

/// Marker class an enhanced select widget leaves on the native `<select>` it hides.
pub const ENHANCED_SELECT_MARKER: &str = "select2-hidden-accessible";

/// A server-rendered page as the front end sees it after load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// Content of `<meta name="csrf-token">`
    #[serde(default, rename = "csrfToken")]
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub forms: Vec<FormElement>,
    #[serde(default)]
    pub links: Vec<Link>,

    // ---- Rendered state (never part of a fixture) ----
    #[serde(default, skip_deserializing)]
    pub alerts: Vec<String>,
    #[serde(default, skip_deserializing)]
    pub scroll_target: Option<String>,
}

impl Page {
    /// Find a form by id, action or cache identity.
    pub fn find_form(&self, key: &str) -> Option<usize> {
        self.forms.iter().position(|f| {
            f.id.as_deref() == Some(key)
                || f.action.as_deref() == Some(key)
                || form_identity(f, &self.url).is_some_and(|id| id.as_str() == key)
        })
    }

    pub fn find_link(&self, href: &str) -> Option<usize> {
        self.links.iter().position(|l| l.href == href)
    }

    /// Index of the first form holding a control with this element id.
    pub fn form_with_control_id(&self, id: &str) -> Option<usize> {
        self.forms
            .iter()
            .position(|f| f.controls.iter().any(|c| c.id.as_deref() == Some(id)))
    }

    pub fn identity_of(&self, form_index: usize) -> Option<FormIdentity> {
        self.forms
            .get(form_index)
            .and_then(|f| form_identity(f, &self.url))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub novalidate: bool,
    #[serde(default)]
    pub controls: Vec<Control>,

    #[serde(default, skip_deserializing)]
    pub notices: Vec<ErrorNotice>,
}

impl FormElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Human-readable reference used in traces and reports.
    pub fn label(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.action.clone())
            .unwrap_or_else(|| "<anonymous>".to_string())
    }

    /// Find a control by name, falling back to element id.
    pub fn find_control(&self, key: &str) -> Option<usize> {
        self.controls
            .iter()
            .position(|c| c.name.as_deref() == Some(key))
            .or_else(|| {
                self.controls
                    .iter()
                    .position(|c| c.id.as_deref() == Some(key))
            })
    }

    /// Native constraint validation (`form.checkValidity()`).
    pub fn check_validity(&self) -> bool {
        self.controls.iter().all(|c| self.control_valid(c))
    }

    fn control_valid(&self, control: &Control) -> bool {
        if !control.required || control.disabled || control.is_button_like() {
            return true;
        }

        match control.effective_type() {
            "checkbox" => control.checked,
            "radio" => self.controls.iter().any(|other| {
                other.effective_type() == "radio" && other.name == control.name && other.checked
            }),
            "file" => !control.files.is_empty(),
            _ => !control.value.is_empty(),
        }
    }

    /// Set a checkable control's state. Checking a radio unchecks the rest of its group.
    pub fn set_checked(&mut self, index: usize, checked: bool) {
        let Some(control) = self.controls.get(index) else {
            return;
        };

        if checked && control.effective_type() == "radio" {
            let group = control.name.clone();
            for (i, other) in self.controls.iter_mut().enumerate() {
                if i != index && other.effective_type() == "radio" && other.name == group {
                    other.checked = false;
                }
            }
        }

        self.controls[index].checked = checked;
    }

    /// Disable every submit-type control. Returns how many changed state.
    pub fn disable_submit_controls(&mut self) -> usize {
        let mut changed = 0;
        for control in self.controls.iter_mut().filter(|c| c.is_submit()) {
            if !control.disabled {
                control.disabled = true;
                changed += 1;
            }
        }
        changed
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Control {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub classes: Vec<String>,
    /// `data-*` attributes, keyed without the prefix
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    /// Sizes in bytes of the currently selected files (file inputs only)
    #[serde(default)]
    pub files: Vec<u64>,
}

impl Control {
    /// The control's `type` as the DOM reports it.
    pub fn effective_type(&self) -> &str {
        match self.tag.as_str() {
            "textarea" => "textarea",
            "select" => "select-one",
            "button" => self.r#type.as_deref().unwrap_or("submit"),
            _ => self.r#type.as_deref().unwrap_or("text"),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn data_attr(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|v| v.as_str())
    }

    pub fn is_submit(&self) -> bool {
        matches!(self.tag.as_str(), "button" | "input") && self.effective_type() == "submit"
    }

    pub fn is_button_like(&self) -> bool {
        self.tag == "button"
            || matches!(self.effective_type(), "submit" | "button" | "reset" | "image")
    }

    pub fn is_checkable(&self) -> bool {
        matches!(self.effective_type(), "checkbox" | "radio")
    }

    /// Single-line text inputs and text areas.
    pub fn is_free_text(&self) -> bool {
        matches!(self.effective_type(), "text" | "textarea")
    }

    pub fn is_enhanced_select(&self) -> bool {
        self.tag == "select" && self.has_class(ENHANCED_SELECT_MARKER)
    }

    /// Whether this control may ever be read from or written to the session cache.
    pub fn is_cacheable(&self) -> bool {
        if self.is_button_like() {
            return false;
        }
        if matches!(self.effective_type(), "password" | "file") {
            return false;
        }
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// The string a cache entry stores for this control.
    pub fn cache_value(&self) -> String {
        if self.is_checkable() {
            self.checked.to_string()
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Link {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}
