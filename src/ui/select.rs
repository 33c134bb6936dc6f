use std::cell::RefCell;
use std::fmt;

use serde::Serialize;

use crate::page::page_model::Control;

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetError {
    /// No enhanced-select library on the page
    Unavailable,
    /// The control has no widget attached
    NotAttached(String),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::Unavailable => write!(f, "enhanced select widget is not available"),
            WidgetError::NotAttached(name) => {
                write!(f, "no enhanced select widget attached to '{}'", name)
            }
        }
    }
}

impl std::error::Error for WidgetError {}

/// Searchable dropdown replacing a native `<select>`.
///
/// After the underlying value is set programmatically the widget has to be
/// told to re-read it, otherwise its visible state goes stale.
pub trait EnhancedSelect {
    fn refresh(&self, control: &Control) -> Result<(), WidgetError>;
}

/// Page without any enhanced-select library loaded.
pub struct NoWidgets;

impl EnhancedSelect for NoWidgets {
    fn refresh(&self, _control: &Control) -> Result<(), WidgetError> {
        Err(WidgetError::Unavailable)
    }
}

/// Widgets attached to every enhanced select; remembers what it refreshed.
#[derive(Debug, Default)]
pub struct Select2Registry {
    refreshed: RefCell<Vec<(String, String)>>,
}

impl Select2Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// (field name, value shown) for every refresh, in order.
    pub fn refreshed(&self) -> Vec<(String, String)> {
        self.refreshed.borrow().clone()
    }
}

impl EnhancedSelect for Select2Registry {
    fn refresh(&self, control: &Control) -> Result<(), WidgetError> {
        let name = control.name.clone().unwrap_or_default();
        if !control.is_enhanced_select() {
            return Err(WidgetError::NotAttached(name));
        }
        self.refreshed.borrow_mut().push((name, control.value.clone()));
        Ok(())
    }
}

impl<T: EnhancedSelect + ?Sized> EnhancedSelect for std::rc::Rc<T> {
    fn refresh(&self, control: &Control) -> Result<(), WidgetError> {
        (**self).refresh(control)
    }
}

// ============================================================================
// Widget initialization options
// ============================================================================

/// Options the widget is initialized with for one `<select class="select2">`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectOptions {
    pub theme: String,
    pub language: String,
    pub width: String,
    pub minimum_results_for_search: u32,
    pub delay: u32,
    pub dropdown_css_class: String,
    pub placeholder: Option<String>,
}

pub const DEFAULT_MIN_ITEMS: u32 = 15;

impl SelectOptions {
    /// Search is only offered once the list has `data-min-items` entries.
    pub fn for_control(control: &Control) -> Self {
        let min_items = control
            .data_attr("min-items")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MIN_ITEMS);

        Self {
            theme: "bootstrap4".to_string(),
            language: "tr".to_string(),
            width: "100%".to_string(),
            minimum_results_for_search: min_items,
            delay: 250,
            dropdown_css_class: "select2-dropdown-optimize".to_string(),
            placeholder: control.data_attr("placeholder").map(str::to_string),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
