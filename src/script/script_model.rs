use serde::{Deserialize, Serialize};

use crate::guard::links::ClickModifiers;

/// A scripted sequence of user interactions against one page, deserialized
/// from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplayScript {
    /// Human-readable name for this replay
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered interactions
    pub steps: Vec<ReplayStep>,
}

/// A single interaction or check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Page load (`DOMContentLoaded`)
    Load,

    /// Typing into a field
    Input {
        form: String,
        field: String,
        value: String,
    },

    /// Committed change of a field's value
    Change {
        form: String,
        field: String,
        value: String,
    },

    /// Checking or unchecking a checkbox / picking a radio
    Check {
        form: String,
        field: String,
        #[serde(default = "default_true")]
        checked: bool,
    },

    /// Choosing files (sizes in bytes) on a file input
    SelectFiles {
        form: String,
        field: String,
        sizes: Vec<u64>,
    },

    /// Clicking a submit control
    ClickSubmit {
        form: String,
        #[serde(default)]
        control: Option<String>,
    },

    /// Implicit submission (Enter key)
    Submit { form: String },

    ClickLink {
        href: String,
        #[serde(default)]
        modifiers: ClickModifiers,
    },

    /// Let the page clock run
    AdvanceTime { ms: u64 },

    /// Run every pending deferred task
    Flush,

    /// Navigate within the same session; without `page` the start page is
    /// rendered again
    Reload {
        #[serde(default)]
        page: Option<String>,
    },

    /// The browser session ends and session storage is dropped
    EndSession,

    /// Check page, cache and indicator state
    Assert { expectations: Vec<Expectation> },
}

fn default_true() -> bool { true }

impl ReplayStep {
    pub fn name(&self) -> &'static str {
        match self {
            ReplayStep::Load => "load",
            ReplayStep::Input { .. } => "input",
            ReplayStep::Change { .. } => "change",
            ReplayStep::Check { .. } => "check",
            ReplayStep::SelectFiles { .. } => "select_files",
            ReplayStep::ClickSubmit { .. } => "click_submit",
            ReplayStep::Submit { .. } => "submit",
            ReplayStep::ClickLink { .. } => "click_link",
            ReplayStep::AdvanceTime { .. } => "advance_time",
            ReplayStep::Flush => "flush",
            ReplayStep::Reload { .. } => "reload",
            ReplayStep::EndSession => "end_session",
            ReplayStep::Assert { .. } => "assert",
        }
    }
}

/// A check evaluated against the running page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    BusyVisible { expected: bool },

    FieldValue {
        form: String,
        field: String,
        expected: String,
    },

    FieldChecked {
        form: String,
        field: String,
        expected: bool,
    },

    /// A session cache entry holds this value
    CacheEntry { key: String, expected: String },

    /// No session cache entry under this key
    CacheAbsent { key: String },

    /// Messages of the form's error notice, in order; empty means no notice
    NoticeMessages { form: String, expected: Vec<String> },

    /// Whether the form's data was sent
    Submitted { form: String, expected: bool },

    ControlDisabled {
        form: String,
        control: String,
        expected: bool,
    },

    /// An alert containing this text was shown
    AlertPresent { expected: String },
}

/// Result of evaluating one expectation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectationResult {
    /// Step the expectation belongs to (0-indexed)
    pub step_index: usize,

    pub expectation: Expectation,

    pub passed: bool,

    /// Actual value found (for debugging failures)
    pub actual: Option<String>,

    pub message: Option<String>,
}

/// What one step did.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepRecord {
    pub index: usize,
    pub action: String,
    pub outcome: String,
}

/// Result of replaying a complete script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    pub script_name: String,

    /// Every step ran and every expectation held
    pub passed: bool,

    pub steps_run: usize,

    pub steps: Vec<StepRecord>,

    pub expectation_results: Vec<ExpectationResult>,

    /// Error that aborted the replay (not an expectation failure)
    pub error: Option<String>,
}
