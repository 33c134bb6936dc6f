//! Submission guard and per-field session cache for the DÖF tracking forms.
//!
//! A [`runtime::page_runtime::PageRuntime`] owns one page model and routes
//! user events through the guard (`guard`) and the cache (`cache`). Every
//! page effect (busy overlay, enhanced selects) goes through the injectable
//! [`ui::services::Services`].

pub mod cache;
pub mod cli;
pub mod error;
pub mod guard;
pub mod notifications;
pub mod page;
pub mod report;
pub mod runtime;
pub mod script;
pub mod trace;
pub mod ui;
