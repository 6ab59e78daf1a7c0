//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `admin.rs` — settings/taxonomy/doctor command trees.
//! - `runtime.rs` — term/assign/parents/checklist/uidata/notices.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate policy decisions to `services/*`.
//! - Keep behavior and output schema stable.

pub mod admin;
pub mod runtime;

pub use admin::{handle_doctor_command, handle_settings_commands, handle_taxonomy_commands};
pub use runtime::handle_runtime_commands;
