use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::field_cache::{CacheConfig, FieldCache, RestoreReport};
use crate::cache::store::SessionStore;
use crate::error::FormsError;
use crate::guard::links::{ActionLinkMatcher, ClickModifiers, LinkConfig, PrefetchHint};
use crate::guard::submission::{
    GuardConfig, SubmissionGuard, SubmissionState, SubmitDecision, display_errors,
};
use crate::guard::upload::{DEFAULT_MAX_UPLOAD_BYTES, UploadError, check_upload};
use crate::page::identity::FormIdentity;
use crate::page::page_model::{ENHANCED_SELECT_MARKER, Page};
use crate::page::snapshot::FormSnapshot;
use crate::runtime::scheduler::{DeferredTask, PendingTask, Scheduler};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;
use crate::ui::select::SelectOptions;
use crate::ui::services::Services;

/// Delay before a submit click re-checks the form, so native validation runs first.
pub const SUBMIT_CHECK_DELAY_MS: u64 = 10;

/// Class marking selects that get an enhanced widget on load.
pub const ENHANCE_MARKER: &str = "select2";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub links: LinkConfig,
    #[serde(default = "default_upload_limit")]
    pub max_upload_bytes: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            guard: GuardConfig::default(),
            cache: CacheConfig::default(),
            links: LinkConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn default_upload_limit() -> u64 { DEFAULT_MAX_UPLOAD_BYTES }

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The submit went out and the page navigates away
    Sent {
        payload: Vec<(String, String)>,
        purged: usize,
    },
    /// Required fields missing; the submit was cancelled
    Blocked { messages: Vec<String> },
    /// Native constraint validation stopped the submit
    NativeInvalid,
    /// Disabled control, or the form is already submitting
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LinkOutcome {
    Navigating { busy: bool },
    /// Opened in a new tab or window; this page stays put
    NewContext,
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOutcome::Sent { payload, purged } => write!(
                f,
                "sent {} field(s), purged {} cache entr{}",
                payload.len(),
                purged,
                if *purged == 1 { "y" } else { "ies" }
            ),
            SubmitOutcome::Blocked { messages } => write!(f, "blocked: {}", messages.join(" | ")),
            SubmitOutcome::NativeInvalid => write!(f, "native validation failed"),
            SubmitOutcome::Ignored => write!(f, "ignored"),
        }
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOutcome::Navigating { busy: true } => write!(f, "navigating (busy)"),
            LinkOutcome::Navigating { busy: false } => write!(f, "navigating"),
            LinkOutcome::NewContext => write!(f, "opened in new context"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormRestore {
    pub form: String,
    pub identity: String,
    pub report: RestoreReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetInit {
    pub form: String,
    pub field: String,
    pub options: SelectOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub restored: Vec<FormRestore>,
    pub prefetch: Vec<PrefetchHint>,
    pub widgets: Vec<WidgetInit>,
    /// The form the required-field check attached to
    pub guarded_form: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentSubmission {
    pub form: String,
    pub payload: Vec<(String, String)>,
}

// ============================================================================
// Runtime
// ============================================================================

/// Drives one page: dispatches user events through the submission guard and
/// the field cache, one handler at a time, with deferred work on a virtual clock.
pub struct PageRuntime {
    page: Page,
    store: Box<dyn SessionStore>,
    services: Services,
    guard: SubmissionGuard,
    cache: FieldCache,
    links: ActionLinkMatcher,
    max_upload_bytes: u64,
    states: Vec<SubmissionState>,
    scheduler: Scheduler,
    tracer: TraceLogger,
    sent: Vec<SentSubmission>,
}

impl PageRuntime {
    pub fn new(page: Page, store: Box<dyn SessionStore>, services: Services) -> Self {
        Self::with_config(page, store, services, RuntimeConfig::default())
    }

    pub fn with_config(
        page: Page,
        store: Box<dyn SessionStore>,
        services: Services,
        config: RuntimeConfig,
    ) -> Self {
        let states = vec![SubmissionState::Idle; page.forms.len()];
        Self {
            page,
            store,
            services,
            guard: SubmissionGuard::new(config.guard),
            cache: FieldCache::new(config.cache),
            links: ActionLinkMatcher::new(config.links),
            max_upload_bytes: config.max_upload_bytes,
            states,
            scheduler: Scheduler::new(),
            tracer: TraceLogger::disabled(),
            sent: Vec::new(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    // ---- Accessors ----

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> Vec<PendingTask> {
        self.scheduler.pending()
    }

    pub fn sent(&self) -> &[SentSubmission] {
        &self.sent
    }

    pub fn state_of(&self, form: &str) -> Option<SubmissionState> {
        let index = self.page.find_form(form)?;
        self.states.get(index).copied()
    }

    // ---- Page lifecycle ----

    /// Page load: hide the overlay, restore cached fields, set up widgets.
    pub fn load(&mut self) -> LoadReport {
        self.services.hide_busy();
        self.states = vec![SubmissionState::Idle; self.page.forms.len()];
        self.scheduler.clear();

        let mut report = LoadReport {
            prefetch: self.links.prefetch_hints(&self.page),
            ..LoadReport::default()
        };

        if let Some(index) = self.page.form_with_control_id(&self.guard.config.trigger_field) {
            let label = self.page.forms[index].label();
            self.trace(TraceEvent::now("guard_attached", self.now_ms()).with_form(&label));
            report.guarded_form = Some(label);
        }

        for index in 0..self.page.forms.len() {
            // Widgets attach before the restore pass so restored values get re-synced.
            let label = self.page.forms[index].label();
            for control in self.page.forms[index]
                .controls
                .iter_mut()
                .filter(|c| c.tag == "select" && c.has_class(ENHANCE_MARKER))
            {
                report.widgets.push(WidgetInit {
                    form: label.clone(),
                    field: control.name.clone().unwrap_or_default(),
                    options: SelectOptions::for_control(control),
                });
                control.add_class(ENHANCED_SELECT_MARKER);
            }

            let form = &self.page.forms[index];
            if !self.cache.applies_to(form) {
                continue;
            }
            let Some(identity) = self.page.identity_of(index) else {
                continue;
            };

            let restore = self.cache.restore(
                &mut self.page.forms[index],
                &identity,
                self.store.as_ref(),
                &self.services,
            );

            if !restore.restored.is_empty() {
                self.trace(
                    TraceEvent::now("cache_restored", self.now_ms())
                        .with_form(&identity)
                        .with_details(&restore.restored),
                );
            }

            report.restored.push(FormRestore {
                form: self.page.forms[index].label(),
                identity: identity.to_string(),
                report: restore,
            });
        }

        report
    }

    /// Navigate to (or reload) a page within the same browsing session.
    pub fn reload(&mut self, page: Page) -> LoadReport {
        self.page = page;
        self.load()
    }

    /// Browser session ends: session storage goes with it.
    pub fn end_session(&mut self) {
        self.store.clear();
        self.trace(TraceEvent::now("session_ended", self.now_ms()));
    }

    // ---- Field events ----

    /// Keystroke in a field. Returns the cache key written, if any.
    pub fn input(&mut self, form: &str, field: &str, value: &str) -> Result<Option<String>, FormsError> {
        let (fi, ci) = self.locate(form, field)?;
        self.page.forms[fi].controls[ci].value = value.to_string();

        let key = match self.cache_identity(fi) {
            Some(identity) => self.cache.persist_input(
                &identity,
                &self.page.forms[fi].controls[ci],
                self.store.as_mut(),
            ),
            None => None,
        };

        self.trace_field("input", fi, field, value, key.as_deref());
        Ok(key)
    }

    /// Committed value change (`change` event).
    pub fn change(&mut self, form: &str, field: &str, value: &str) -> Result<Option<String>, FormsError> {
        let (fi, ci) = self.locate(form, field)?;
        self.page.forms[fi].controls[ci].value = value.to_string();
        Ok(self.commit_change(fi, ci, field))
    }

    /// Toggle a checkbox or pick a radio, then fire `change`.
    pub fn set_checked(&mut self, form: &str, field: &str, checked: bool) -> Result<Option<String>, FormsError> {
        let (fi, ci) = self.locate(form, field)?;
        self.page.forms[fi].set_checked(ci, checked);
        Ok(self.commit_change(fi, ci, field))
    }

    fn commit_change(&mut self, fi: usize, ci: usize, field: &str) -> Option<String> {
        let key = match self.cache_identity(fi) {
            Some(identity) => self.cache.persist_change(
                &identity,
                &self.page.forms[fi].controls[ci],
                self.store.as_mut(),
            ),
            None => None,
        };

        let value = self.page.forms[fi].controls[ci].cache_value();
        self.trace_field("change", fi, field, &value, key.as_deref());
        key
    }

    /// Choose files on a file input. An oversize selection is alerted and cleared.
    pub fn select_files(
        &mut self,
        form: &str,
        field: &str,
        sizes: &[u64],
    ) -> Result<Result<u64, UploadError>, FormsError> {
        let (fi, ci) = self.locate(form, field)?;
        let control = &mut self.page.forms[fi].controls[ci];
        control.files = sizes.to_vec();

        let checked = check_upload(control, self.max_upload_bytes);
        if let Err(e) = &checked {
            control.files.clear();
            control.value.clear();
            self.page.alerts.push(e.to_string());
            self.trace(
                TraceEvent::now("upload_rejected", self.scheduler.now())
                    .with_field(field)
                    .with_outcome(e.total_bytes),
            );
        }

        Ok(checked)
    }

    // ---- Submission ----

    /// Click a submit control. `control` names it; the form's first submit
    /// control is used otherwise.
    pub fn click_submit(&mut self, form: &str, control: Option<&str>) -> Result<SubmitOutcome, FormsError> {
        let fi = self.form_index(form)?;
        let target = &self.page.forms[fi];

        let ci = match control {
            Some(key) => target.find_control(key),
            None => target.controls.iter().position(|c| c.is_submit()),
        }
        .ok_or_else(|| FormsError::ControlNotFound {
            form: form.to_string(),
            control: control.unwrap_or("<submit>").to_string(),
        })?;

        // Disabled controls never see the click.
        if target.controls[ci].disabled || !target.controls[ci].is_submit() {
            return Ok(SubmitOutcome::Ignored);
        }

        if !self.guard.is_opted_out(target) {
            self.scheduler.schedule(
                SUBMIT_CHECK_DELAY_MS,
                DeferredTask::SubmitClickCheck { form: fi, control: ci },
            );
        }

        Ok(self.request_submit(fi))
    }

    /// Submit the form the way implicit submission (Enter) does.
    pub fn submit(&mut self, form: &str) -> Result<SubmitOutcome, FormsError> {
        let fi = self.form_index(form)?;
        Ok(self.request_submit(fi))
    }

    fn request_submit(&mut self, fi: usize) -> SubmitOutcome {
        if self.states[fi] == SubmissionState::Submitting {
            return SubmitOutcome::Ignored;
        }

        let form = &self.page.forms[fi];
        if !form.novalidate && !form.check_validity() {
            // Interactive validation: no submit event is dispatched.
            self.trace(
                TraceEvent::now("submit", self.now_ms())
                    .with_form(form.label())
                    .with_outcome("native_invalid"),
            );
            return SubmitOutcome::NativeInvalid;
        }

        self.dispatch_submit(fi)
    }

    /// The submit event, in two phases: cancellable validation first, then the
    /// handlers that only make sense once the submit really proceeds.
    fn dispatch_submit(&mut self, fi: usize) -> SubmitOutcome {
        let label = self.page.forms[fi].label();

        // ---- Phase 1: validation, may cancel ----
        if let Err(error) = self.guard.pre_submit_check(&self.page.forms[fi]) {
            display_errors(&mut self.page, fi, &error, &self.services);
            self.states[fi].reset();
            self.trace(
                TraceEvent::now("submit", self.now_ms())
                    .with_form(&label)
                    .with_outcome("blocked")
                    .with_details(&error.messages),
            );
            return SubmitOutcome::Blocked {
                messages: error.messages,
            };
        }

        if self.guard.self_validates(&self.page.forms[fi]) {
            let marker = self.guard.config.validated_marker.clone();
            self.page.forms[fi].add_class(&marker);
            if !self.page.forms[fi].check_validity() {
                self.states[fi].reset();
                self.trace(
                    TraceEvent::now("submit", self.now_ms())
                        .with_form(&label)
                        .with_outcome("native_invalid"),
                );
                return SubmitOutcome::NativeInvalid;
            }
        }

        // ---- Phase 2: the submit proceeds ----
        let payload = FormSnapshot::capture(&self.page.forms[fi]).payload();
        self.page.forms[fi].notices.clear();

        let form = &self.page.forms[fi];
        if !self.guard.is_opted_out(form) && form.check_validity() {
            self.enter_submitting(fi);
        }

        let mut purged = 0;
        if self.cache.should_purge(&self.page.forms[fi]) {
            if let Some(identity) = self.cache_identity(fi) {
                purged = self.cache.purge(&identity, self.store.as_mut());
            }
        }

        self.trace(
            TraceEvent::now("submit", self.now_ms())
                .with_form(&label)
                .with_outcome("sent")
                .with_details(&[format!("purged={}", purged)]),
        );

        self.sent.push(SentSubmission {
            form: label,
            payload: payload.clone(),
        });

        SubmitOutcome::Sent { payload, purged }
    }

    /// Idle → Submitting: overlay up, submit controls off. Only the first
    /// transition has any effect.
    fn enter_submitting(&mut self, fi: usize) -> bool {
        if !self.states[fi].begin() {
            return false;
        }

        self.services.show_busy();
        self.page.forms[fi].disable_submit_controls();
        true
    }

    // ---- Links ----

    pub fn click_link(&mut self, href: &str, modifiers: ClickModifiers) -> Result<LinkOutcome, FormsError> {
        let index = self
            .page
            .find_link(href)
            .ok_or_else(|| FormsError::LinkNotFound(href.to_string()))?;

        if modifiers.opens_new_context() {
            return Ok(LinkOutcome::NewContext);
        }

        let busy = self
            .links
            .should_show_busy(&self.page.links[index], modifiers);
        if busy {
            self.services.show_busy();
        }

        self.trace(
            TraceEvent::now("link", self.now_ms())
                .with_details(&[href.to_string()])
                .with_outcome(if busy { "busy" } else { "plain" }),
        );

        Ok(LinkOutcome::Navigating { busy })
    }

    // ---- Event loop ----

    /// Move the clock forward, running every task that falls due.
    pub fn advance_time(&mut self, delta_ms: u64) -> usize {
        let target = self.scheduler.now().saturating_add(delta_ms);
        let mut ran = 0;
        while let Some(task) = self.scheduler.pop_due(target) {
            self.run_task(task);
            ran += 1;
        }
        self.scheduler.advance_to(target);
        ran
    }

    /// Run everything pending.
    pub fn flush(&mut self) -> usize {
        match self.scheduler.last_due() {
            Some(last) => {
                let delta = last.saturating_sub(self.scheduler.now());
                self.advance_time(delta)
            }
            None => 0,
        }
    }

    fn run_task(&mut self, task: DeferredTask) {
        match task {
            DeferredTask::SubmitClickCheck { form, control } => {
                let Some(target) = self.page.forms.get(form) else {
                    return;
                };

                // The required-field check counts too, so a blocked form never ends up busy.
                if let SubmitDecision::Proceed { busy: true } = self.guard.evaluate(target) {
                    if let Some(c) = self.page.forms[form].controls.get_mut(control) {
                        c.disabled = true;
                    }
                    self.enter_submitting(form);
                }
            }
        }
    }

    // ---- Helpers ----

    fn form_index(&self, form: &str) -> Result<usize, FormsError> {
        self.page
            .find_form(form)
            .ok_or_else(|| FormsError::FormNotFound(form.to_string()))
    }

    fn locate(&self, form: &str, field: &str) -> Result<(usize, usize), FormsError> {
        let fi = self.form_index(form)?;
        let ci = self.page.forms[fi]
            .find_control(field)
            .ok_or_else(|| FormsError::ControlNotFound {
                form: form.to_string(),
                control: field.to_string(),
            })?;
        Ok((fi, ci))
    }

    fn cache_identity(&self, fi: usize) -> Option<FormIdentity> {
        if !self.cache.applies_to(&self.page.forms[fi]) {
            return None;
        }
        self.page.identity_of(fi)
    }

    fn trace_field(&self, event: &str, fi: usize, field: &str, value: &str, key: Option<&str>) {
        let outcome = if key.is_some() { "cached" } else { "not_cached" };
        self.trace(
            TraceEvent::now(event, self.now_ms())
                .with_form(self.page.forms[fi].label())
                .with_field(field)
                .with_value(value)
                .with_outcome(outcome),
        );
    }

    fn trace(&self, event: TraceEvent) {
        self.tracer.log(&event);
    }
}
