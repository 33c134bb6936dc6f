use std::path::Path;
use std::time::Duration;

use crate::cache::field_cache::FieldCache;
use crate::cache::store::{FileStore, MemoryStore, SessionStore};
use crate::cli::config::AppConfig;
use crate::error::FormsError;
use crate::notifications::client::{NOTIFICATIONS_PATH, NotificationClient, NotificationSource};
use crate::notifications::feed::{FeedView, NotificationPoller, PollSchedule, render_feed};
use crate::page::identity::FormIdentity;
use crate::page::page_model::Page;
use crate::report::console::{format_console_report, format_inspection};
use crate::report::report_model::inspect_page;
use crate::runtime::page_runtime::PageRuntime;
use crate::script::runner::ScriptRunner;
use crate::script::script_model::ReplayScript;
use crate::trace::logger::TraceLogger;
use crate::ui::busy::LoaderOverlay;
use crate::ui::select::Select2Registry;
use crate::ui::services::Services;

// ============================================================================
// replay subcommand
// ============================================================================

/// Replay a script and return whether every expectation held.
pub fn cmd_replay(
    page_path: &str,
    script_path: &str,
    session_file: Option<&str>,
    format: &str,
    output: Option<&str>,
    config: &AppConfig,
    trace_path: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let page = load_page(page_path)?;
    let script = load_script(script_path)?;

    let store: Box<dyn SessionStore> = match session_file {
        Some(path) => Box::new(FileStore::open(path)),
        None => Box::new(MemoryStore::new()),
    };

    let services = Services::new(
        Box::new(LoaderOverlay::default()),
        Box::new(Select2Registry::new()),
    )
    .with_csrf_token(page.csrf_token.clone());

    let tracer = match trace_path.or(config.trace.path.as_deref()) {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    if verbose > 0 {
        eprintln!(
            "Replaying '{}' ({} steps) against {}...",
            script.name,
            script.steps.len(),
            page.url
        );
    }

    let mut runtime =
        PageRuntime::with_config(page, store, services, config.runtime.clone()).with_tracer(tracer);

    let loader = |name: Option<&str>| load_page(name.unwrap_or(page_path));
    let result = ScriptRunner::run(&script, &mut runtime, &loader);

    let output_content = match format {
        "json" => serde_json::to_string_pretty(&result)?,
        _ => format_console_report(&result),
    };

    match output {
        Some(path) => std::fs::write(path, &output_content)?,
        None => print!("{}", output_content),
    }

    Ok(result.passed)
}

// ============================================================================
// inspect subcommand
// ============================================================================

pub fn cmd_inspect(
    page_path: &str,
    format: &str,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_page(page_path)?;
    let inspection = inspect_page(&page, &config.runtime);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&inspection)?),
        _ => print!("{}", format_inspection(&inspection)),
    }

    Ok(())
}

// ============================================================================
// clear-cache subcommand
// ============================================================================

/// Returns how many entries were removed.
pub fn cmd_clear_cache(
    session_file: &str,
    form: Option<&str>,
    verbose: u8,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut store = FileStore::open(session_file);

    let removed = match form {
        Some(identity) => {
            FieldCache::default().purge(&FormIdentity(identity.to_string()), &mut store)
        }
        None => {
            let count = store.len();
            store.clear();
            count
        }
    };

    if verbose > 0 {
        eprintln!("Removed {} entries from {}", removed, session_file);
    }
    println!("Removed {} cached field(s)", removed);

    Ok(removed)
}

// ============================================================================
// notifications subcommand
// ============================================================================

/// List notifications once, or keep polling when `watch_rounds` is set.
pub fn cmd_notifications(
    base_url: Option<&str>,
    csrf_token: Option<&str>,
    page_path: Option<&str>,
    mark_read: Option<u64>,
    mark_all_read: bool,
    watch_rounds: Option<usize>,
    config: &AppConfig,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = base_url
        .or(config.notifications.base_url.as_deref())
        .ok_or("No backend URL: pass --base-url or set notifications.base_url")?;

    let page_token = match page_path {
        Some(path) => load_page(path)?.csrf_token,
        None => None,
    };
    let token = csrf_token.map(str::to_string).or(page_token);
    let services = Services::default().with_csrf_token(token);
    let client = NotificationClient::from_services(base_url, &services);

    let marking = mark_read.is_some() || mark_all_read;
    if verbose > 0 && marking && client.csrf_token().is_none() {
        eprintln!("No CSRF token; the backend may reject mark-read requests");
    }

    if let Some(id) = mark_read {
        client.mark_read(id)?;
        println!("Marked #{} read", id);
    }
    if mark_all_read {
        let alert = client.mark_all_read()?;
        println!("{}", alert.message);
    }

    if verbose > 0 {
        eprintln!("Fetching {}...", client.endpoint(NOTIFICATIONS_PATH));
    }

    match watch_rounds {
        Some(rounds) => {
            let schedule = PollSchedule::new(config.notifications.poll_interval_ms);
            let mut poller = NotificationPoller::new(client, schedule);
            poller.run(
                rounds,
                &mut |ms| std::thread::sleep(Duration::from_millis(ms)),
                &mut print_feed,
            );
        }
        None => print_feed(&render_feed(&client.fetch()?)),
    }

    Ok(())
}

fn print_feed(view: &FeedView) {
    match view.badge {
        Some(count) => println!("{} notification(s)", count),
        None => println!("{}", view.empty_message.as_deref().unwrap_or_default()),
    }
    for item in &view.items {
        println!("  #{} {} ({}) -> {}", item.id, item.message, item.created_at, item.href);
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Load a page fixture; `.json` files are read as JSON, anything else as YAML.
pub fn load_page(path: &str) -> Result<Page, FormsError> {
    let content = read_file(path)?;

    if Path::new(path).extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&content).map_err(|e| FormsError::Json {
            context: format!("page fixture {}", path),
            source: e,
        })
    } else {
        parse_page_yaml(&content, path)
    }
}

pub fn parse_page_yaml(content: &str, context: &str) -> Result<Page, FormsError> {
    serde_yaml::from_str(content).map_err(|e| FormsError::YamlParse {
        context: format!("page fixture {}", context),
        source: e,
    })
}

pub fn load_script(path: &str) -> Result<ReplayScript, FormsError> {
    let content = read_file(path)?;
    serde_yaml::from_str(&content).map_err(|e| FormsError::YamlParse {
        context: format!("replay script {}", path),
        source: e,
    })
}

fn read_file(path: &str) -> Result<String, FormsError> {
    std::fs::read_to_string(path).map_err(|e| FormsError::Io {
        path: path.to_string(),
        source: e,
    })
}
