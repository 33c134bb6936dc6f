use crate::report::report_model::PageInspection;
use crate::script::script_model::{Expectation, ReplayResult};

// ============================================================================
// Console reporter
// ============================================================================

/// Format a replay result for terminal output.
///
/// Produces output like:
/// ```text
/// === Replay: Resolve form keeps draft ===
///
///   [0] load — 0 field(s) restored across 1 form(s), 0 widget(s)
///   [1] input — cached as resolve_root_cause1
///   [2] click_submit — blocked: 2. Kök Neden alanı zorunludur.
///       [FAIL] CacheEntry — cache 'resolve_root_cause1' holds None, expected 'x'
///
/// ✗ FAIL  Resolve form keeps draft (3 steps, 1 expectations)
/// ```
pub fn format_console_report(result: &ReplayResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Replay: {} ===\n\n", result.script_name));

    for step in &result.steps {
        out.push_str(&format!(
            "  [{}] {} — {}\n",
            step.index, step.action, step.outcome
        ));

        for er in result
            .expectation_results
            .iter()
            .filter(|r| r.step_index == step.index && !r.passed)
        {
            let detail = er.message.as_deref().unwrap_or("expectation failed");
            out.push_str(&format!(
                "      [FAIL] {} — {}\n",
                format_expectation_type(&er.expectation),
                detail
            ));
        }
    }

    if let Some(ref error) = result.error {
        out.push_str(&format!("  [ERROR] {}\n", error));
    }

    let marker = if result.passed {
        "\u{2713} PASS"
    } else {
        "\u{2717} FAIL"
    };

    out.push_str(&format!(
        "\n{}  {} ({} steps, {} expectations)\n",
        marker,
        result.script_name,
        result.steps_run,
        result.expectation_results.len()
    ));

    out
}

/// Format an Expectation variant name for display.
fn format_expectation_type(expectation: &Expectation) -> &'static str {
    match expectation {
        Expectation::BusyVisible { .. } => "BusyVisible",
        Expectation::FieldValue { .. } => "FieldValue",
        Expectation::FieldChecked { .. } => "FieldChecked",
        Expectation::CacheEntry { .. } => "CacheEntry",
        Expectation::CacheAbsent { .. } => "CacheAbsent",
        Expectation::NoticeMessages { .. } => "NoticeMessages",
        Expectation::Submitted { .. } => "Submitted",
        Expectation::ControlDisabled { .. } => "ControlDisabled",
        Expectation::AlertPresent { .. } => "AlertPresent",
    }
}

pub fn format_inspection(inspection: &PageInspection) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ({}) ===\n", inspection.title, inspection.url));

    for form in &inspection.forms {
        let mut flags = Vec::new();
        if form.guarded {
            flags.push("required-field check");
        }
        if form.busy_opt_out {
            flags.push("no busy indicator");
        }
        if form.identity.is_some() && !form.purge_on_submit {
            flags.push("keeps cache");
        }
        if form.shared_identity {
            flags.push("shares cache with another form");
        }

        out.push_str(&format!(
            "\nform {} — cache: {}",
            form.label,
            form.identity.as_deref().unwrap_or("off")
        ));
        if !flags.is_empty() {
            out.push_str(&format!(" [{}]", flags.join(", ")));
        }
        out.push('\n');

        if !form.cacheable_fields.is_empty() {
            out.push_str(&format!("  cached:  {}\n", form.cacheable_fields.join(", ")));
        }
        if !form.skipped_fields.is_empty() {
            out.push_str(&format!("  skipped: {}\n", form.skipped_fields.join(", ")));
        }
    }

    if !inspection.action_links.is_empty() {
        out.push_str("\naction links:\n");
        for href in &inspection.action_links {
            let prefetch = if inspection.prefetch.contains(href) {
                " (prefetch)"
            } else {
                ""
            };
            out.push_str(&format!("  {}{}\n", href, prefetch));
        }
    }

    out
}
