//! Stable constants shared across command handlers and services.

/// Taxonomy addressed when `--tax` is not given. Present in the default
/// registry, so a fresh install works without any configuration.
pub const DEFAULT_TAXONOMY: &str = "category";

/// Directory under `$HOME` holding state, settings, notices and the audit log.
pub const CONFIG_DIR: &str = ".config/taxdepth";
