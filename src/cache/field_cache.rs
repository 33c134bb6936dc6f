use serde::{Deserialize, Serialize};

use crate::cache::store::SessionStore;
use crate::page::identity::FormIdentity;
use crate::page::page_model::{Control, FormElement};
use crate::ui::services::Services;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Forms with this class are never cached
    #[serde(default = "default_no_cache_marker")]
    pub no_cache_marker: String,

    /// Forms with this class keep their entries after submit
    #[serde(default = "default_keep_cache_marker")]
    pub keep_cache_marker: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            no_cache_marker: default_no_cache_marker(),
            keep_cache_marker: default_keep_cache_marker(),
        }
    }
}

fn default_no_cache_marker() -> String { "no-cache".to_string() }
fn default_keep_cache_marker() -> String { "keep-cache".to_string() }

/// What a restore pass did to a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RestoreReport {
    /// Field names whose value or checked state came from the cache
    pub restored: Vec<String>,
    /// Enhanced selects whose widget was re-synced
    pub refreshed: Vec<String>,
    /// Enhanced selects left visually stale because the widget refused
    pub unsynced: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FieldCache {
    pub config: CacheConfig,
}

impl FieldCache {
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    pub fn applies_to(&self, form: &FormElement) -> bool {
        !form.has_class(&self.config.no_cache_marker)
    }

    pub fn should_purge(&self, form: &FormElement) -> bool {
        !form.has_class(&self.config.keep_cache_marker)
    }

    /// Apply every cached entry of `identity` to the form's cacheable controls.
    pub fn restore(
        &self,
        form: &mut FormElement,
        identity: &FormIdentity,
        store: &dyn SessionStore,
        services: &Services,
    ) -> RestoreReport {
        let mut report = RestoreReport::default();

        for index in 0..form.controls.len() {
            let control = &form.controls[index];
            let Some(name) = cache_name(control) else {
                continue;
            };
            let Some(raw) = store.get(&identity.key_for(&name)) else {
                continue;
            };

            if control.is_checkable() {
                form.set_checked(index, raw == "true");
                report.restored.push(name);
                continue;
            }

            form.controls[index].value = raw;
            let control = &form.controls[index];

            if control.is_enhanced_select() {
                match services.widgets.refresh(control) {
                    Ok(()) => report.refreshed.push(name.clone()),
                    Err(_) => report.unsynced.push(name.clone()),
                }
            }
            report.restored.push(name);
        }

        report
    }

    /// Record the control's current value. Returns the key written.
    pub fn persist_change(
        &self,
        identity: &FormIdentity,
        control: &Control,
        store: &mut dyn SessionStore,
    ) -> Option<String> {
        let name = cache_name(control)?;
        let key = identity.key_for(&name);
        store.set(&key, &control.cache_value());
        Some(key)
    }

    /// Keystroke-level persistence, for free text only.
    pub fn persist_input(
        &self,
        identity: &FormIdentity,
        control: &Control,
        store: &mut dyn SessionStore,
    ) -> Option<String> {
        if !control.is_free_text() {
            return None;
        }
        self.persist_change(identity, control, store)
    }

    /// Delete every entry owned by `identity`. Returns how many were removed.
    pub fn purge(&self, identity: &FormIdentity, store: &mut dyn SessionStore) -> usize {
        let prefix = identity.prefix();
        let doomed: Vec<String> = store
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect();

        for key in &doomed {
            store.remove(key);
        }

        doomed.len()
    }
}

fn cache_name(control: &Control) -> Option<String> {
    if !control.is_cacheable() {
        return None;
    }
    control.name.clone()
}
