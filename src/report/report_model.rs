use serde::Serialize;

use crate::cache::field_cache::FieldCache;
use crate::guard::links::ActionLinkMatcher;
use crate::guard::submission::SubmissionGuard;
use crate::page::page_model::Page;
use crate::runtime::page_runtime::RuntimeConfig;

// ============================================================================
// Page inspection: how the guard and the cache treat each form
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FormInspection {
    pub label: String,
    /// Cache identity; `None` when the form is not cached at all
    pub identity: Option<String>,
    pub purge_on_submit: bool,
    /// Another cached form on the page resolves to the same identity, so the
    /// two read, write and purge the same entries
    pub shared_identity: bool,
    /// Required-field check attached
    pub guarded: bool,
    pub busy_opt_out: bool,
    pub cacheable_fields: Vec<String>,
    pub skipped_fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageInspection {
    pub url: String,
    pub title: String,
    pub forms: Vec<FormInspection>,
    pub action_links: Vec<String>,
    pub prefetch: Vec<String>,
}

pub fn inspect_page(page: &Page, config: &RuntimeConfig) -> PageInspection {
    let guard = SubmissionGuard::new(config.guard.clone());
    let cache = FieldCache::new(config.cache.clone());
    let links = ActionLinkMatcher::new(config.links.clone());

    let identities: Vec<Option<String>> = page
        .forms
        .iter()
        .enumerate()
        .map(|(i, form)| {
            if cache.applies_to(form) {
                page.identity_of(i).map(|id| id.to_string())
            } else {
                None
            }
        })
        .collect();

    let forms = page
        .forms
        .iter()
        .enumerate()
        .map(|(i, form)| {
            let cached = cache.applies_to(form);
            let identity = identities[i].clone();
            let shared_identity = identity.is_some()
                && identities.iter().filter(|other| **other == identity).count() > 1;
            let (cacheable, skipped): (Vec<_>, Vec<_>) = form
                .controls
                .iter()
                .filter(|c| !c.is_button_like())
                .partition(|c| c.is_cacheable());

            FormInspection {
                label: form.label(),
                identity,
                purge_on_submit: cached && cache.should_purge(form),
                shared_identity,
                guarded: guard.is_designated(form),
                busy_opt_out: guard.is_opted_out(form),
                cacheable_fields: cacheable.iter().filter_map(|c| c.name.clone()).collect(),
                skipped_fields: skipped
                    .iter()
                    .map(|c| {
                        c.name
                            .clone()
                            .or_else(|| c.id.clone())
                            .unwrap_or_else(|| format!("<{}>", c.effective_type()))
                    })
                    .collect(),
            }
        })
        .collect();

    PageInspection {
        url: page.url.clone(),
        title: page.title.clone(),
        forms,
        action_links: page
            .links
            .iter()
            .filter(|l| links.is_action_link(l))
            .map(|l| l.href.clone())
            .collect(),
        prefetch: links
            .prefetch_hints(page)
            .into_iter()
            .map(|h| h.href)
            .collect(),
    }
}
