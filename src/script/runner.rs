use crate::error::FormsError;
use crate::page::page_model::{Control, Page};
use crate::runtime::page_runtime::{LoadReport, PageRuntime};
use crate::script::context::ReplayContext;
use crate::script::script_model::{
    Expectation, ExpectationResult, ReplayResult, ReplayScript, ReplayStep,
};

/// Resolves the page a `reload` step navigates to; `None` means the start page.
pub type PageLoader<'a> = dyn Fn(Option<&str>) -> Result<Page, FormsError> + 'a;

/// Executes a ReplayScript step-by-step against a PageRuntime.
pub struct ScriptRunner;

impl ScriptRunner {
    /// Replay a complete script.
    ///
    /// The runtime must already hold the start page; the script decides when
    /// it loads.
    pub fn run(
        script: &ReplayScript,
        runtime: &mut PageRuntime,
        load_page: &PageLoader,
    ) -> ReplayResult {
        let mut ctx = ReplayContext::new();

        for (i, step) in script.steps.iter().enumerate() {
            ctx.current_step = i;

            match Self::execute_step(step, i, runtime, load_page, &mut ctx) {
                Ok(outcome) => ctx.record_step(step.name(), outcome),
                Err(e) => {
                    return ReplayResult {
                        script_name: script.name.clone(),
                        passed: false,
                        steps_run: i + 1,
                        steps: ctx.steps,
                        expectation_results: ctx.expectation_results,
                        error: Some(format!("Step {} ({}) failed: {}", i, step.name(), e)),
                    };
                }
            }
        }

        let passed = ctx.all_passed();
        ReplayResult {
            script_name: script.name.clone(),
            passed,
            steps_run: script.steps.len(),
            steps: ctx.steps,
            expectation_results: ctx.expectation_results,
            error: None,
        }
    }

    /// Execute a single step and describe what happened.
    fn execute_step(
        step: &ReplayStep,
        step_index: usize,
        runtime: &mut PageRuntime,
        load_page: &PageLoader,
        ctx: &mut ReplayContext,
    ) -> Result<String, FormsError> {
        match step {
            ReplayStep::Load => Ok(describe_load(&runtime.load())),

            ReplayStep::Input { form, field, value } => {
                Ok(describe_cache_write(runtime.input(form, field, value)?))
            }

            ReplayStep::Change { form, field, value } => {
                Ok(describe_cache_write(runtime.change(form, field, value)?))
            }

            ReplayStep::Check {
                form,
                field,
                checked,
            } => Ok(describe_cache_write(runtime.set_checked(form, field, *checked)?)),

            ReplayStep::SelectFiles { form, field, sizes } => {
                match runtime.select_files(form, field, sizes)? {
                    Ok(total) => Ok(format!("accepted {} bytes", total)),
                    Err(e) => Ok(format!("rejected: {}", e)),
                }
            }

            ReplayStep::ClickSubmit { form, control } => {
                Ok(runtime.click_submit(form, control.as_deref())?.to_string())
            }

            ReplayStep::Submit { form } => Ok(runtime.submit(form)?.to_string()),

            ReplayStep::ClickLink { href, modifiers } => {
                Ok(runtime.click_link(href, *modifiers)?.to_string())
            }

            ReplayStep::AdvanceTime { ms } => {
                let ran = runtime.advance_time(*ms);
                Ok(format!("{} task(s) ran", ran))
            }

            ReplayStep::Flush => {
                let ran = runtime.flush();
                Ok(format!("{} task(s) ran", ran))
            }

            ReplayStep::Reload { page } => {
                let next = load_page(page.as_deref())?;
                Ok(describe_load(&runtime.reload(next)))
            }

            ReplayStep::EndSession => {
                runtime.end_session();
                Ok("session storage cleared".to_string())
            }

            ReplayStep::Assert { expectations } => {
                let results: Vec<ExpectationResult> = expectations
                    .iter()
                    .map(|e| Self::evaluate_one(e, step_index, runtime))
                    .collect();
                let passed = results.iter().filter(|r| r.passed).count();
                let total = results.len();
                ctx.record_expectations(results);
                Ok(format!("{}/{} expectations held", passed, total))
            }
        }
    }

    /// Evaluate a single expectation.
    fn evaluate_one(
        expectation: &Expectation,
        step_index: usize,
        runtime: &PageRuntime,
    ) -> ExpectationResult {
        let page = runtime.page();

        let (passed, actual, failure) = match expectation {
            Expectation::BusyVisible { expected } => {
                let visible = runtime.services().busy.is_visible();
                (
                    visible == *expected,
                    Some(visible.to_string()),
                    format!("busy indicator visible={}, expected {}", visible, expected),
                )
            }

            Expectation::FieldValue {
                form,
                field,
                expected,
            } => match find_control(page, form, field) {
                Some(c) => (
                    c.value == *expected,
                    Some(c.value.clone()),
                    format!("'{}' holds '{}', expected '{}'", field, c.value, expected),
                ),
                None => (false, None, format!("field '{}' not found in '{}'", field, form)),
            },

            Expectation::FieldChecked {
                form,
                field,
                expected,
            } => match find_control(page, form, field) {
                Some(c) => (
                    c.checked == *expected,
                    Some(c.checked.to_string()),
                    format!("'{}' checked={}, expected {}", field, c.checked, expected),
                ),
                None => (false, None, format!("field '{}' not found in '{}'", field, form)),
            },

            Expectation::CacheEntry { key, expected } => {
                let actual = runtime.store().get(key);
                (
                    actual.as_deref() == Some(expected.as_str()),
                    actual.clone(),
                    format!("cache '{}' holds {:?}, expected '{}'", key, actual, expected),
                )
            }

            Expectation::CacheAbsent { key } => {
                let actual = runtime.store().get(key);
                (
                    actual.is_none(),
                    actual.clone(),
                    format!("cache '{}' still holds {:?}", key, actual),
                )
            }

            Expectation::NoticeMessages { form, expected } => {
                match page.find_form(form).map(|i| &page.forms[i]) {
                    Some(f) => {
                        let shown = f
                            .notices
                            .first()
                            .map(|n| n.messages.clone())
                            .unwrap_or_default();
                        (
                            shown == *expected,
                            Some(shown.join(" | ")),
                            format!("notice shows {:?}, expected {:?}", shown, expected),
                        )
                    }
                    None => (false, None, format!("form '{}' not found", form)),
                }
            }

            Expectation::Submitted { form, expected } => {
                let label = page
                    .find_form(form)
                    .map(|i| page.forms[i].label())
                    .unwrap_or_else(|| form.clone());
                let sent = runtime.sent().iter().any(|s| s.form == label);
                (
                    sent == *expected,
                    Some(sent.to_string()),
                    format!("'{}' submitted={}, expected {}", form, sent, expected),
                )
            }

            Expectation::ControlDisabled {
                form,
                control,
                expected,
            } => match find_control(page, form, control) {
                Some(c) => (
                    c.disabled == *expected,
                    Some(c.disabled.to_string()),
                    format!("'{}' disabled={}, expected {}", control, c.disabled, expected),
                ),
                None => (false, None, format!("control '{}' not found in '{}'", control, form)),
            },

            Expectation::AlertPresent { expected } => {
                let found = page.alerts.iter().any(|a| a.contains(expected.as_str()));
                (
                    found,
                    Some(page.alerts.join(" | ")),
                    format!("no alert containing '{}'", expected),
                )
            }
        };

        ExpectationResult {
            step_index,
            expectation: expectation.clone(),
            passed,
            actual,
            message: if passed { None } else { Some(failure) },
        }
    }
}

fn find_control<'a>(
    page: &'a Page,
    form: &str,
    field: &str,
) -> Option<&'a Control> {
    let form = &page.forms[page.find_form(form)?];
    form.find_control(field).map(|i| &form.controls[i])
}

fn describe_cache_write(key: Option<String>) -> String {
    match key {
        Some(k) => format!("cached as {}", k),
        None => "not cached".to_string(),
    }
}

fn describe_load(report: &LoadReport) -> String {
    let restored: usize = report.restored.iter().map(|r| r.report.restored.len()).sum();
    format!(
        "{} field(s) restored across {} form(s), {} widget(s)",
        restored,
        report.restored.len(),
        report.widgets.len()
    )
}
