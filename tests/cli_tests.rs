use clap::Parser;
use dof_forms::cache::store::{FileStore, SessionStore};
use dof_forms::cli::commands::{
    cmd_clear_cache, cmd_notifications, cmd_replay, load_page, load_script, parse_page_yaml,
};
use dof_forms::cli::config::{AppConfig, Cli, Commands, load_config};
use dof_forms::error::FormsError;
use dof_forms::notifications::feed::POLL_INTERVAL_MS;

use crate::common::temp_path;

mod common;

const PAGE_YAML: &str = r#"
url: /dof/create
title: Yeni DÖF
csrfToken: tok-9
forms:
  - id: dof-form
    action: /dof/create
    controls:
      - tag: input
        type: text
        id: title
        name: title
      - tag: input
        type: password
        name: pin
      - tag: button
        type: submit
        name: submit
links:
  - href: /dof/3/review
    classes: [btn, prefetch]
"#;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_replay_minimal() {
    let cli = Cli::parse_from(["dof-forms", "replay", "--page", "p.yaml", "--script", "s.yaml"]);
    match cli.command {
        Commands::Replay {
            page,
            script,
            session_file,
            format,
            output,
        } => {
            assert_eq!(page, "p.yaml");
            assert_eq!(script, "s.yaml");
            assert_eq!(session_file, None);
            assert_eq!(format, "console");
            assert_eq!(output, None);
        }
        _ => panic!("Expected Replay command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(cli.config.is_none());
    assert!(cli.trace.is_none());
}

#[test]
fn cli_parse_replay_all_args() {
    let cli = Cli::parse_from([
        "dof-forms",
        "-vv",
        "replay",
        "--page",
        "p.json",
        "--script",
        "s.yaml",
        "--session-file",
        "session.json",
        "--format",
        "json",
        "-o",
        "out.json",
        "--trace",
        "trace.jsonl",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.trace.as_deref(), Some("trace.jsonl"));
    match cli.command {
        Commands::Replay {
            session_file,
            format,
            output,
            ..
        } => {
            assert_eq!(session_file.as_deref(), Some("session.json"));
            assert_eq!(format, "json");
            assert_eq!(output.as_deref(), Some("out.json"));
        }
        _ => panic!("Expected Replay command"),
    }
}

#[test]
fn cli_parse_clear_cache() {
    let cli = Cli::parse_from([
        "dof-forms",
        "clear-cache",
        "--session-file",
        "s.json",
        "--form",
        "dof-form",
        "--config",
        "custom.yaml",
    ]);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    match cli.command {
        Commands::ClearCache { session_file, form } => {
            assert_eq!(session_file, "s.json");
            assert_eq!(form.as_deref(), Some("dof-form"));
        }
        _ => panic!("Expected ClearCache command"),
    }
}

#[test]
fn cli_parse_notifications() {
    let cli = Cli::parse_from([
        "dof-forms",
        "notifications",
        "--base-url",
        "http://localhost:5000",
        "--mark-all-read",
    ]);
    match cli.command {
        Commands::Notifications {
            base_url,
            csrf_token,
            page,
            mark_read,
            mark_all_read,
            watch,
            rounds,
        } => {
            assert_eq!(base_url.as_deref(), Some("http://localhost:5000"));
            assert_eq!(csrf_token, None);
            assert_eq!(page, None);
            assert_eq!(mark_read, None);
            assert!(mark_all_read);
            assert!(!watch);
            assert_eq!(rounds, None);
        }
        _ => panic!("Expected Notifications command"),
    }
}

#[test]
fn cli_parse_notifications_watch_and_mark_read() {
    let cli = Cli::parse_from([
        "dof-forms",
        "notifications",
        "--page",
        "page.yaml",
        "--mark-read",
        "12",
        "--watch",
        "--rounds",
        "3",
    ]);
    match cli.command {
        Commands::Notifications {
            page,
            mark_read,
            watch,
            rounds,
            ..
        } => {
            assert_eq!(page.as_deref(), Some("page.yaml"));
            assert_eq!(mark_read, Some(12));
            assert!(watch);
            assert_eq!(rounds, Some(3));
        }
        _ => panic!("Expected Notifications command"),
    }
}

#[test]
fn cli_rounds_requires_watch() {
    let result = Cli::try_parse_from(["dof-forms", "notifications", "--rounds", "3"]);
    assert!(result.is_err());
}

#[test]
fn notifications_without_backend_url_fail_early() {
    let err = cmd_notifications(None, None, None, None, false, None, &AppConfig::default(), 0)
        .unwrap_err();
    assert!(err.to_string().contains("No backend URL"));
}

#[test]
fn notifications_mark_read_reaches_the_backend() {
    let page_path = temp_path("notifications-page.yaml");
    std::fs::write(&page_path, PAGE_YAML).unwrap();

    // Port 9 (discard) on localhost is expected to refuse connections.
    let err = cmd_notifications(
        Some("http://127.0.0.1:9"),
        None,
        page_path.to_str(),
        Some(12),
        false,
        None,
        &AppConfig::default(),
        0,
    )
    .unwrap_err();
    assert!(err.to_string().contains("/api/notifications/mark-read"));

    let _ = std::fs::remove_file(&page_path);
}

#[test]
fn cli_replay_requires_page_and_script() {
    assert!(Cli::try_parse_from(["dof-forms", "replay", "--page", "p.yaml"]).is_err());
}

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
fn load_config_missing_file_returns_defaults() {
    let config = load_config(Some("/nonexistent/dof-forms.yaml"));
    assert_eq!(config.notifications.poll_interval_ms, POLL_INTERVAL_MS);
    assert!(config.notifications.base_url.is_none());
    assert!(config.trace.path.is_none());
    assert_eq!(config.runtime.guard.trigger_field, "root_cause1");
}

#[test]
fn load_config_partial_yaml_keeps_other_defaults() {
    let path = temp_path("partial-config.yaml");
    std::fs::write(
        &path,
        r#"
runtime:
  cache:
    keep_cache_marker: sticky
  max_upload_bytes: 1048576
notifications:
  base_url: http://dof.local
"#,
    )
    .unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.runtime.cache.keep_cache_marker, "sticky");
    assert_eq!(config.runtime.cache.no_cache_marker, "no-cache");
    assert_eq!(config.runtime.max_upload_bytes, 1_048_576);
    assert_eq!(config.runtime.guard.required_fields.len(), 5);
    assert_eq!(config.runtime.links.namespace, "/dof/");
    assert_eq!(config.notifications.base_url.as_deref(), Some("http://dof.local"));
    assert_eq!(config.notifications.poll_interval_ms, POLL_INTERVAL_MS);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_config_malformed_yaml_returns_defaults() {
    let path = temp_path("malformed-config.yaml");
    std::fs::write(&path, "runtime: [unterminated").unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.runtime.max_upload_bytes, AppConfig::default().runtime.max_upload_bytes);

    let _ = std::fs::remove_file(&path);
}

// ============================================================================
// Fixture Loading Tests
// ============================================================================

#[test]
fn parse_page_yaml_reads_controls_and_links() {
    let page = parse_page_yaml(PAGE_YAML, "inline").unwrap();

    assert_eq!(page.title, "Yeni DÖF");
    assert_eq!(page.csrf_token.as_deref(), Some("tok-9"));
    assert_eq!(page.forms[0].controls.len(), 3);
    assert_eq!(page.forms[0].controls[1].effective_type(), "password");
    assert!(page.forms[0].controls[2].is_submit());
    assert!(page.alerts.is_empty());
    assert_eq!(page.links[0].classes, vec!["btn", "prefetch"]);
}

#[test]
fn load_page_reads_json_by_extension() {
    let path = temp_path("page.json");
    let page = parse_page_yaml(PAGE_YAML, "inline").unwrap();
    std::fs::write(&path, serde_json::to_string(&page).unwrap()).unwrap();

    let loaded = load_page(path.to_str().unwrap()).unwrap();
    assert_eq!(loaded.forms, page.forms);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_page_missing_file_is_io_error() {
    let err = load_page("/nonexistent/page.yaml").unwrap_err();
    assert!(matches!(err, FormsError::Io { .. }));
}

#[test]
fn load_script_bad_yaml_is_parse_error() {
    let path = temp_path("bad-script.yaml");
    std::fs::write(&path, "name: x\nsteps: 12").unwrap();

    let err = load_script(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, FormsError::YamlParse { .. }));
    assert!(err.to_string().contains("replay script"));

    let _ = std::fs::remove_file(&path);
}

// ============================================================================
// Command Tests
// ============================================================================

#[test]
fn replay_with_session_file_carries_cache_between_runs() {
    let page = temp_path("session-page.yaml");
    let first = temp_path("session-first.yaml");
    let second = temp_path("session-second.yaml");
    let session = temp_path("session.json");
    let output = temp_path("session-report.json");

    std::fs::write(&page, PAGE_YAML).unwrap();
    std::fs::write(
        &first,
        r#"
name: type a draft
steps:
  - action: load
  - action: input
    form: dof-form
    field: title
    value: Taslak
"#,
    )
    .unwrap();
    std::fs::write(
        &second,
        r#"
name: draft is back
steps:
  - action: load
  - action: assert
    expectations:
      - type: field_value
        form: dof-form
        field: title
        expected: Taslak
"#,
    )
    .unwrap();

    let config = AppConfig::default();
    for script in [&first, &second] {
        let passed = cmd_replay(
            page.to_str().unwrap(),
            script.to_str().unwrap(),
            session.to_str(),
            "json",
            output.to_str(),
            &config,
            None,
            0,
        )
        .unwrap();
        assert!(passed, "{} should pass", script.display());
    }

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["script_name"], "draft is back");
    assert_eq!(report["passed"], true);

    for path in [&page, &first, &second, &session, &output] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn clear_cache_removes_one_form_or_everything() {
    let path = temp_path("clear-cache.json");
    {
        let mut store = FileStore::open(&path);
        store.set("dof-form_title", "a");
        store.set("dof-form_urgent", "true");
        store.set("dof-form-2_title", "c");
        store.set("search_q", "b");
    }

    let removed = cmd_clear_cache(path.to_str().unwrap(), Some("dof-form"), 0).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(
        FileStore::open(&path).keys(),
        vec!["dof-form-2_title", "search_q"],
        "Only keys under the form's own prefix go"
    );

    let removed = cmd_clear_cache(path.to_str().unwrap(), None, 0).unwrap();
    assert_eq!(removed, 2);
    assert!(FileStore::open(&path).is_empty());

    let _ = std::fs::remove_file(&path);
}
