use dof_forms::guard::links::{ActionLinkMatcher, ClickModifiers, LinkConfig};
use dof_forms::guard::required::{
    FieldCheck, RequiredField, ValidationError, missing_required, root_cause_fields,
};
use dof_forms::guard::submission::{
    SubmissionGuard, SubmissionState, SubmitDecision, display_errors,
};
use dof_forms::guard::upload::{DEFAULT_MAX_UPLOAD_BYTES, UploadError, check_upload, max_upload_bytes};
use dof_forms::page::snapshot::{FormSnapshot, SnapshotField};
use dof_forms::ui::busy::{BusyCall, RecordingIndicator};
use dof_forms::ui::notice::ERROR_HEADING;
use dof_forms::ui::select::NoWidgets;
use dof_forms::ui::services::Services;

use crate::common::{
    draft_form, draft_page, input, link, required, root_cause_form, root_cause_page, search_form,
    with_data,
};

mod common;

const ALL_MISSING: [&str; 5] = [
    "1. Kök Neden alanı zorunludur.",
    "2. Kök Neden alanı zorunludur.",
    "3. Kök Neden alanı zorunludur.",
    "Aksiyon Planı alanı zorunludur.",
    "Termin Tarihi alanı zorunludur.",
];

fn fill(form: &mut dof_forms::page::page_model::FormElement, name: &str, value: &str) {
    let i = form.find_control(name).unwrap();
    form.controls[i].value = value.to_string();
}

fn filled_root_cause_form() -> dof_forms::page::page_model::FormElement {
    let mut form = root_cause_form();
    fill(&mut form, "root_cause1", "Kalibrasyon yapılmadı");
    fill(&mut form, "root_cause2", "Plan eksik");
    fill(&mut form, "root_cause3", "Eğitim yok");
    fill(&mut form, "action_plan", "Eğitim planla");
    fill(&mut form, "deadline", "2026-11-30");
    form
}

fn field(id: &str, value: &str) -> SnapshotField {
    SnapshotField {
        id: Some(id.into()),
        name: Some(id.into()),
        kind: "text".into(),
        value: value.into(),
        checked: false,
        disabled: false,
        button_like: false,
    }
}

// =========================================================================
// Required fields
// =========================================================================

#[test]
fn empty_root_cause_form_lists_every_message_in_order() {
    let guard = SubmissionGuard::default();
    match guard.evaluate(&root_cause_form()) {
        SubmitDecision::Blocked(e) => assert_eq!(e.messages, ALL_MISSING),
        other => panic!("Expected Blocked, got {:?}", other),
    }
}

#[test]
fn whitespace_only_text_counts_as_missing() {
    let mut form = filled_root_cause_form();
    fill(&mut form, "root_cause2", "   \n\t");

    let err = SubmissionGuard::default().pre_submit_check(&form).unwrap_err();
    assert_eq!(err.messages, vec!["2. Kök Neden alanı zorunludur."]);
}

#[test]
fn only_missing_fields_are_reported() {
    let mut form = filled_root_cause_form();
    fill(&mut form, "root_cause1", "");
    fill(&mut form, "deadline", "");

    let err = SubmissionGuard::default().pre_submit_check(&form).unwrap_err();
    assert_eq!(
        err.messages,
        vec!["1. Kök Neden alanı zorunludur.", "Termin Tarihi alanı zorunludur."]
    );
}

#[test]
fn complete_root_cause_form_proceeds_with_busy() {
    let guard = SubmissionGuard::default();
    assert_eq!(
        guard.evaluate(&filled_root_cause_form()),
        SubmitDecision::Proceed { busy: true }
    );
}

#[test]
fn forms_without_trigger_skip_required_check() {
    let guard = SubmissionGuard::default();
    let form = draft_form();
    assert!(!guard.is_designated(&form));
    assert!(guard.pre_submit_check(&form).is_ok());
}

#[test]
fn missing_field_element_counts_as_missing() {
    let snapshot = FormSnapshot {
        fields: vec![field("root_cause1", "a"), field("root_cause2", "b")],
    };
    let messages = missing_required(&snapshot, &root_cause_fields());
    assert_eq!(messages.len(), 3, "root_cause3, action_plan and deadline are absent");
    assert_eq!(messages[0], "3. Kök Neden alanı zorunludur.");
}

#[test]
fn custom_required_fields_from_snapshot() {
    let fields = vec![
        RequiredField::text("summary", "Özet zorunlu"),
        RequiredField::date("due", "Tarih zorunlu"),
    ];
    let snapshot = FormSnapshot {
        fields: vec![field("summary", "  x "), field("due", "")],
    };

    assert_eq!(missing_required(&snapshot, &fields), vec!["Tarih zorunlu"]);
    assert_eq!(fields[1].kind, FieldCheck::Date);
}

#[test]
fn validation_error_display_joins_messages() {
    let e = ValidationError {
        messages: vec!["a".into(), "b".into()],
    };
    assert_eq!(e.to_string(), "2 required field(s) missing: a; b");
}

// =========================================================================
// Busy opt-out and native validation
// =========================================================================

#[test]
fn search_form_proceeds_without_busy() {
    let guard = SubmissionGuard::default();
    let form = search_form();
    assert!(guard.is_opted_out(&form));
    assert_eq!(guard.evaluate(&form), SubmitDecision::Proceed { busy: false });
}

#[test]
fn no_loader_class_opts_out() {
    let mut form = draft_form();
    form.classes.push("no-loader".into());
    assert!(SubmissionGuard::default().is_opted_out(&form));
}

#[test]
fn native_invalid_when_required_control_empty() {
    let mut form = draft_form();
    form.controls.push(required(input("text", "reporter")));

    assert_eq!(SubmissionGuard::default().evaluate(&form), SubmitDecision::NativeInvalid);
}

#[test]
fn required_check_wins_over_native_validation() {
    let mut form = root_cause_form();
    form.controls.push(required(input("text", "reporter")));

    assert!(matches!(
        SubmissionGuard::default().evaluate(&form),
        SubmitDecision::Blocked(_)
    ));
}

#[test]
fn self_validating_forms_are_recognized() {
    let mut form = draft_form();
    let guard = SubmissionGuard::default();
    assert!(!guard.self_validates(&form));
    form.classes.push("needs-validation".into());
    assert!(guard.self_validates(&form));
}

// =========================================================================
// Error display
// =========================================================================

#[test]
fn display_errors_replaces_notice_and_hides_busy() {
    let busy = std::rc::Rc::new(RecordingIndicator::new());
    let services = Services::new(Box::new(busy.clone()), Box::new(NoWidgets));
    let mut page = root_cause_page();
    let error = ValidationError {
        messages: vec!["first".into()],
    };

    display_errors(&mut page, 0, &error, &services);
    let error = ValidationError {
        messages: vec!["second".into(), "third".into()],
    };
    display_errors(&mut page, 0, &error, &services);

    let notices = &page.forms[0].notices;
    assert_eq!(notices.len(), 1, "Old notice must be replaced, not stacked");
    assert_eq!(notices[0].heading, ERROR_HEADING);
    assert_eq!(notices[0].messages, vec!["second", "third"]);
    assert!(notices[0].dismissible);
    assert_eq!(page.scroll_target.as_deref(), Some("resolve-form#notice"));
    assert_eq!(busy.calls(), vec![BusyCall::Hide, BusyCall::Hide]);
}

// =========================================================================
// Submission state
// =========================================================================

#[test]
fn submission_state_begins_once() {
    let mut state = SubmissionState::default();
    assert_eq!(state, SubmissionState::Idle);
    assert!(state.begin());
    assert!(!state.begin(), "Second begin must be a no-op");
    assert_eq!(state, SubmissionState::Submitting);
    state.reset();
    assert!(state.begin());
}

// =========================================================================
// Action links
// =========================================================================

#[test]
fn action_links_need_button_class_namespace_and_route() {
    let matcher = ActionLinkMatcher::default();

    assert!(matcher.is_action_link(&link("/dof/12/review", &["btn"])));
    assert!(matcher.is_action_link(&link("/dof/12/edit?tab=2", &["btn", "btn-sm"])));
    assert!(!matcher.is_action_link(&link("/dof/12/review", &[])), "not a button");
    assert!(!matcher.is_action_link(&link("/dof/12/review", &["btn", "no-loader"])));
    assert!(!matcher.is_action_link(&link("/dof/12/print", &["btn"])), "unknown route");
    assert!(!matcher.is_action_link(&link("/users/12/review", &["btn"])), "other namespace");
}

#[test]
fn modifier_clicks_never_show_busy() {
    let matcher = ActionLinkMatcher::default();
    let action = link("/dof/3/close", &["btn"]);

    assert!(matcher.should_show_busy(&action, ClickModifiers::default()));
    for modifiers in [
        ClickModifiers { ctrl: true, ..Default::default() },
        ClickModifiers { meta: true, ..Default::default() },
        ClickModifiers { shift: true, ..Default::default() },
    ] {
        assert!(modifiers.opens_new_context());
        assert!(!matcher.should_show_busy(&action, modifiers));
    }
}

#[test]
fn prefetch_hints_only_for_marked_action_links() {
    let hints = ActionLinkMatcher::default().prefetch_hints(&draft_page());
    let hrefs: Vec<&str> = hints.iter().map(|h| h.href.as_str()).collect();
    assert_eq!(hrefs, vec!["/dof/12/review"]);
}

#[test]
fn link_routes_are_configurable() {
    let matcher = ActionLinkMatcher::new(LinkConfig {
        namespace: "/capa/".into(),
        routes: vec!["/approve".into()],
        ..LinkConfig::default()
    });
    assert!(matcher.is_action_link(&link("/capa/4/approve", &["btn"])));
    assert!(!matcher.is_action_link(&link("/dof/4/review", &["btn"])));
}

// =========================================================================
// Upload size
// =========================================================================

#[test]
fn upload_within_default_limit_is_accepted() {
    let mut control = input("file", "attachment");
    control.files = vec![8 * 1024 * 1024, 8 * 1024 * 1024];
    assert_eq!(check_upload(&control, DEFAULT_MAX_UPLOAD_BYTES), Ok(16 * 1024 * 1024));
}

#[test]
fn oversize_upload_reports_limit_in_megabytes() {
    let mut control = with_data(input("file", "attachment"), "max-size", "1048576");
    control.files = vec![600_000, 600_000];

    let err = check_upload(&control, DEFAULT_MAX_UPLOAD_BYTES).unwrap_err();
    assert_eq!(
        err,
        UploadError {
            max_bytes: 1_048_576,
            total_bytes: 1_200_000
        }
    );
    assert_eq!(err.to_string(), "Dosya boyutu çok büyük. En fazla 1MB olabilir.");
}

#[test]
fn unparseable_max_size_falls_back_to_default() {
    let control = with_data(input("file", "attachment"), "max-size", "lots");
    assert_eq!(max_upload_bytes(&control, DEFAULT_MAX_UPLOAD_BYTES), DEFAULT_MAX_UPLOAD_BYTES);
}
