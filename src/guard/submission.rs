use serde::{Deserialize, Serialize};

use crate::guard::required::{
    ROOT_CAUSE_TRIGGER, RequiredField, ValidationError, missing_required, root_cause_fields,
};
use crate::page::page_model::{FormElement, Page};
use crate::page::snapshot::FormSnapshot;
use crate::ui::notice::ErrorNotice;
use crate::ui::services::Services;

// ============================================================================
// Submission state
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
}

impl SubmissionState {
    /// Enter `Submitting`. Returns false when already there.
    pub fn begin(&mut self) -> bool {
        match self {
            SubmissionState::Idle => {
                *self = SubmissionState::Submitting;
                true
            }
            SubmissionState::Submitting => false,
        }
    }

    pub fn reset(&mut self) {
        *self = SubmissionState::Idle;
    }
}

// ============================================================================
// Guard configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuardConfig {
    /// Forms carrying any of these classes never show the busy indicator
    #[serde(default = "default_opt_out_markers")]
    pub opt_out_markers: Vec<String>,

    /// Element id that designates the form the required-field check applies to
    #[serde(default = "default_trigger_field")]
    pub trigger_field: String,

    #[serde(default = "root_cause_fields")]
    pub required_fields: Vec<RequiredField>,

    /// Forms that cancel their own invalid submits
    #[serde(default = "default_validation_marker")]
    pub validation_marker: String,

    /// Class added to such a form once a submit was attempted
    #[serde(default = "default_validated_marker")]
    pub validated_marker: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            opt_out_markers: default_opt_out_markers(),
            trigger_field: default_trigger_field(),
            required_fields: root_cause_fields(),
            validation_marker: default_validation_marker(),
            validated_marker: default_validated_marker(),
        }
    }
}

fn default_opt_out_markers() -> Vec<String> {
    vec!["no-loader".to_string(), "search-form".to_string()]
}
fn default_trigger_field() -> String { ROOT_CAUSE_TRIGGER.to_string() }
fn default_validation_marker() -> String { "needs-validation".to_string() }
fn default_validated_marker() -> String { "was-validated".to_string() }

// ============================================================================
// Guard
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitDecision {
    /// Required fields missing: cancel and show the notice
    Blocked(ValidationError),
    /// Native constraint validation failed; the browser reports it
    NativeInvalid,
    /// Submission goes ahead; `busy` unless the form opted out
    Proceed { busy: bool },
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    pub config: GuardConfig,
}

impl SubmissionGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn is_opted_out(&self, form: &FormElement) -> bool {
        self.config.opt_out_markers.iter().any(|m| form.has_class(m))
    }

    /// Whether the required-field check applies to this form.
    pub fn is_designated(&self, form: &FormElement) -> bool {
        form.controls
            .iter()
            .any(|c| c.id.as_deref() == Some(self.config.trigger_field.as_str()))
    }

    pub fn self_validates(&self, form: &FormElement) -> bool {
        form.has_class(&self.config.validation_marker)
    }

    /// Required-field check run before any submit of the designated form.
    pub fn pre_submit_check(&self, form: &FormElement) -> Result<(), ValidationError> {
        if !self.is_designated(form) {
            return Ok(());
        }

        let snapshot = FormSnapshot::capture(form);
        let messages = missing_required(&snapshot, &self.config.required_fields);

        if messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { messages })
        }
    }

    pub fn evaluate(&self, form: &FormElement) -> SubmitDecision {
        if let Err(e) = self.pre_submit_check(form) {
            return SubmitDecision::Blocked(e);
        }

        if !form.check_validity() {
            return SubmitDecision::NativeInvalid;
        }

        SubmitDecision::Proceed {
            busy: !self.is_opted_out(form),
        }
    }
}

/// Replace the form's notices with one listing every error, scroll to it and
/// drop the busy indicator in case something already raised it.
pub fn display_errors(
    page: &mut Page,
    form_index: usize,
    error: &ValidationError,
    services: &Services,
) {
    if let Some(form) = page.forms.get_mut(form_index) {
        form.notices.clear();
        form.notices.insert(0, ErrorNotice::new(error.messages.clone()));
        page.scroll_target = Some(format!("{}#notice", form.label()));
    }

    services.hide_busy();
}
