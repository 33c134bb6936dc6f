#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use dof_forms::cache::store::MemoryStore;
use dof_forms::page::page_model::{Control, FormElement, Link, Page};
use dof_forms::runtime::page_runtime::PageRuntime;
use dof_forms::ui::busy::RecordingIndicator;
use dof_forms::ui::select::Select2Registry;
use dof_forms::ui::services::Services;

// =========================================================================
// Controls
// =========================================================================

pub fn input(kind: &str, name: &str) -> Control {
    Control {
        tag: "input".into(),
        r#type: Some(kind.into()),
        id: Some(name.into()),
        name: Some(name.into()),
        ..Control::default()
    }
}

pub fn textarea(name: &str) -> Control {
    Control {
        tag: "textarea".into(),
        id: Some(name.into()),
        name: Some(name.into()),
        ..Control::default()
    }
}

/// A `<select class="select2">` as the server renders it, before any widget attaches.
pub fn select2(name: &str) -> Control {
    Control {
        tag: "select".into(),
        id: Some(name.into()),
        name: Some(name.into()),
        classes: vec!["select2".into()],
        ..Control::default()
    }
}

/// The same select after the widget attached to it.
pub fn enhanced_select(name: &str) -> Control {
    let mut control = select2(name);
    control.add_class("select2-hidden-accessible");
    control
}

pub fn submit_button(name: &str) -> Control {
    Control {
        tag: "button".into(),
        r#type: Some("submit".into()),
        id: Some(name.into()),
        name: Some(name.into()),
        ..Control::default()
    }
}

pub fn with_data(mut control: Control, key: &str, value: &str) -> Control {
    control.data.insert(key.to_string(), value.to_string());
    control
}

pub fn required(mut control: Control) -> Control {
    control.required = true;
    control
}

pub fn link(href: &str, classes: &[&str]) -> Link {
    Link {
        href: href.into(),
        classes: classes.iter().map(|c| c.to_string()).collect(),
        text: None,
    }
}

// =========================================================================
// Pages
// =========================================================================

/// The root-cause analysis form: five required fields and a submit button.
pub fn root_cause_form() -> FormElement {
    FormElement {
        id: Some("resolve-form".into()),
        action: Some("/dof/7/resolve".into()),
        controls: vec![
            textarea("root_cause1"),
            textarea("root_cause2"),
            textarea("root_cause3"),
            textarea("action_plan"),
            input("date", "deadline"),
            submit_button("save"),
        ],
        ..FormElement::default()
    }
}

pub fn root_cause_page() -> Page {
    page("/dof/7/resolve", vec![root_cause_form()])
}

/// A record creation form with one control of every interesting kind.
pub fn draft_form() -> FormElement {
    let mut csrf = input("hidden", "csrf_token");
    csrf.value = "tok-123".into();

    FormElement {
        id: Some("dof-form".into()),
        action: Some("/dof/create".into()),
        controls: vec![
            csrf,
            input("text", "title"),
            textarea("description"),
            select2("department"),
            input("checkbox", "urgent"),
            input("password", "signature_pin"),
            input("file", "attachment"),
            submit_button("submit"),
        ],
        ..FormElement::default()
    }
}

pub fn search_form() -> FormElement {
    FormElement {
        id: Some("search".into()),
        action: Some("/dof/list".into()),
        classes: vec!["search-form".into()],
        controls: vec![input("text", "q"), submit_button("go")],
        ..FormElement::default()
    }
}

pub fn draft_page() -> Page {
    let mut page = page("/dof/create", vec![draft_form(), search_form()]);
    page.links = vec![
        link("/dof/12/review", &["btn", "btn-primary", "prefetch"]),
        link("/dof/12/close", &["btn", "no-loader"]),
        link("/dof/12/print", &["btn"]),
        link("/help", &[]),
    ];
    page
}

pub fn page(url: &str, forms: Vec<FormElement>) -> Page {
    Page {
        url: url.into(),
        title: "DÖF".into(),
        csrf_token: Some("tok-123".into()),
        forms,
        links: vec![],
        alerts: vec![],
        scroll_target: None,
    }
}

// =========================================================================
// Runtime harness
// =========================================================================

pub struct Harness {
    pub runtime: PageRuntime,
    pub busy: Rc<RecordingIndicator>,
    pub widgets: Rc<Select2Registry>,
}

pub fn harness(page: Page) -> Harness {
    harness_with_store(page, MemoryStore::new())
}

pub fn harness_with_store(page: Page, store: MemoryStore) -> Harness {
    let busy = Rc::new(RecordingIndicator::new());
    let widgets = Rc::new(Select2Registry::new());
    let services = Services::new(Box::new(busy.clone()), Box::new(widgets.clone()));

    Harness {
        runtime: PageRuntime::new(page, Box::new(store), services),
        busy,
        widgets,
    }
}

pub fn store_with(entries: &[(&str, &str)]) -> MemoryStore {
    use dof_forms::cache::store::SessionStore;

    let mut store = MemoryStore::new();
    for (k, v) in entries {
        store.set(k, v);
    }
    store
}

pub fn values_of(form: &FormElement) -> BTreeMap<String, String> {
    form.controls
        .iter()
        .filter_map(|c| Some((c.name.clone()?, c.value.clone())))
        .collect()
}

/// Fresh path under the system temp dir; any leftover file is removed first.
pub fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("dof-forms-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_file(&path);
    path
}
