use crate::domain::constants::CONFIG_DIR;
use crate::domain::models::{Assignment, SettingsFile, State};
use std::path::PathBuf;

/// Best-effort audit trail for mutating actions. Never fails the operation
/// it records.
pub fn audit(action: &str, data: serde_json::Value) {
    let home = match std::env::var("HOME") {
        Ok(h) => h,
        Err(_) => return,
    };
    let path = PathBuf::from(home).join(CONFIG_DIR).join("audit.jsonl");
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": epoch_seconds(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

fn epoch_seconds() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn config_base() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(CONFIG_DIR))
}

fn state_path() -> anyhow::Result<PathBuf> {
    Ok(config_base()?.join("state.json"))
}

fn settings_path() -> anyhow::Result<PathBuf> {
    Ok(config_base()?.join("settings.json"))
}

pub fn registry_path() -> anyhow::Result<PathBuf> {
    Ok(config_base()?.join("taxonomies.toml"))
}

pub fn load_state() -> anyhow::Result<State> {
    let p = state_path()?;
    if !p.exists() {
        return Ok(State::default());
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_state(s: &State) -> anyhow::Result<()> {
    let p = state_path()?;
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(s)?)?;
    Ok(())
}

pub fn load_settings() -> anyhow::Result<SettingsFile> {
    let p = settings_path()?;
    if !p.exists() {
        return Ok(SettingsFile::default());
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_settings(s: &SettingsFile) -> anyhow::Result<()> {
    let p = settings_path()?;
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(s)?)?;
    Ok(())
}

pub fn upsert_assignment(state: &mut State, entry: Assignment) {
    if let Some(existing) = state
        .assignments
        .iter_mut()
        .find(|a| a.object == entry.object && a.taxonomy == entry.taxonomy)
    {
        *existing = entry;
    } else {
        state.assignments.push(entry);
    }
}
