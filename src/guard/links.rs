use serde::{Deserialize, Serialize};

use crate::page::page_model::{Link, Page};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkConfig {
    /// Resource namespace the action routes live under
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_routes")]
    pub routes: Vec<String>,

    /// Only links styled as buttons act as pseudo-submits
    #[serde(default = "default_button_marker")]
    pub button_marker: String,

    #[serde(default = "default_no_loader_marker")]
    pub no_loader_marker: String,

    #[serde(default = "default_prefetch_marker")]
    pub prefetch_marker: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            routes: default_routes(),
            button_marker: default_button_marker(),
            no_loader_marker: default_no_loader_marker(),
            prefetch_marker: default_prefetch_marker(),
        }
    }
}

fn default_namespace() -> String { "/dof/".to_string() }
fn default_routes() -> Vec<String> {
    ["/review", "/resolve", "/close", "/detail", "/edit"]
        .iter()
        .map(|r| r.to_string())
        .collect()
}
fn default_button_marker() -> String { "btn".to_string() }
fn default_no_loader_marker() -> String { "no-loader".to_string() }
fn default_prefetch_marker() -> String { "prefetch".to_string() }

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClickModifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
}

impl ClickModifiers {
    /// The click opens a new tab or window; the current page stays.
    pub fn opens_new_context(&self) -> bool {
        self.ctrl || self.meta || self.shift
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefetchHint {
    pub href: String,
}

#[derive(Debug, Clone, Default)]
pub struct ActionLinkMatcher {
    pub config: LinkConfig,
}

impl ActionLinkMatcher {
    pub fn new(config: LinkConfig) -> Self {
        Self { config }
    }

    pub fn is_action_link(&self, link: &Link) -> bool {
        if !link.has_class(&self.config.button_marker)
            || link.has_class(&self.config.no_loader_marker)
        {
            return false;
        }

        link.href.contains(self.config.namespace.as_str())
            && self.config.routes.iter().any(|r| link.href.contains(r.as_str()))
    }

    pub fn should_show_busy(&self, link: &Link, modifiers: ClickModifiers) -> bool {
        self.is_action_link(link) && !modifiers.opens_new_context()
    }

    /// `<link rel="prefetch">` hints for action links marked for prefetching.
    pub fn prefetch_hints(&self, page: &Page) -> Vec<PrefetchHint> {
        page.links
            .iter()
            .filter(|l| self.is_action_link(l) && l.has_class(&self.config.prefetch_marker))
            .map(|l| PrefetchHint {
                href: l.href.clone(),
            })
            .collect()
    }
}
