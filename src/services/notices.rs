//! Pending violation notices, one slot per acting user.
//!
//! A notice is written when an automatic correction happens (term moved to
//! root, assignment entries dropped) and surfaced exactly once: reading it
//! deletes it. A second correction before the first read overwrites the
//! slot. Last-write-wins, not a queue.

use crate::services::storage::config_base;
use std::path::PathBuf;

fn notice_path(user: &str) -> anyhow::Result<PathBuf> {
    Ok(config_base()?
        .join("notices")
        .join(format!("{}.txt", sanitize_user(user))))
}

/// Who a correction should be reported to: the explicit `--user` override,
/// else the invoking login.
pub fn acting_user(explicit: Option<&str>) -> String {
    match explicit {
        Some(u) => u.to_string(),
        None => std::env::var("USER").unwrap_or_else(|_| "unknown".to_string()),
    }
}

/// Acting-user keys become file names; anything unsafe collapses to '-'.
pub fn sanitize_user(user: &str) -> String {
    let cleaned: String = user
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.trim_matches('-').is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

pub fn record_notice(user: &str, message: &str) -> anyhow::Result<()> {
    let path = notice_path(user)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, message)?;
    Ok(())
}

pub fn take_notice(user: &str) -> anyhow::Result<Option<String>> {
    let path = notice_path(user)?;
    if !path.exists() {
        return Ok(None);
    }
    let message = std::fs::read_to_string(&path)?;
    std::fs::remove_file(path)?;
    let message = message.trim().to_string();
    if message.is_empty() {
        Ok(None)
    } else {
        Ok(Some(message))
    }
}
