use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::notifications::feed::POLL_INTERVAL_MS;
use crate::runtime::page_runtime::RuntimeConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "dof-forms",
    version,
    about = "Form submission guard and field cache for the DÖF tracking front end"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: dof-forms.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append JSONL trace events to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a scripted interaction against a page fixture
    Replay {
        /// Page fixture (YAML, or JSON with a .json extension)
        #[arg(long)]
        page: String,

        /// Replay script YAML
        #[arg(long)]
        script: String,

        /// Keep session storage in this JSON file across runs
        #[arg(long)]
        session_file: Option<String>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show how each form on a page is guarded and cached
    Inspect {
        #[arg(long)]
        page: String,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Remove cached fields from a session file
    ClearCache {
        #[arg(long)]
        session_file: String,

        /// Only entries of this form identity (default: everything)
        #[arg(long)]
        form: Option<String>,
    },

    /// Fetch the current user's notifications from the backend
    Notifications {
        /// Backend base URL, e.g. http://localhost:5000
        #[arg(long)]
        base_url: Option<String>,

        /// CSRF token sent with state-changing requests
        #[arg(long)]
        csrf_token: Option<String>,

        /// Take the CSRF token from this page fixture's meta tag
        #[arg(long)]
        page: Option<String>,

        /// Mark one notification read before listing
        #[arg(long, value_name = "ID")]
        mark_read: Option<u64>,

        /// Mark every notification read before listing
        #[arg(long, default_value_t = false)]
        mark_all_read: bool,

        /// Keep polling at notifications.poll_interval_ms
        #[arg(long, default_value_t = false)]
        watch: bool,

        /// Stop watching after this many polls (default: never)
        #[arg(long, requires = "watch")]
        rounds: Option<usize>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `dof-forms.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub base_url: Option<String>,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_poll_interval() -> u64 { POLL_INTERVAL_MS }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("dof-forms.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            eprintln!("Warning: ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}
