use crate::domain::models::{RegisteredTaxonomy, Registry, SettingsFile, TaxonomyPolicy};
use crate::services::storage::registry_path;

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("taxonomy not registered: {0}")]
    UnknownTaxonomy(String),
    #[error("taxonomy is not hierarchical: {0}")]
    NotHierarchical(String),
}

/// Operator-editable registry of known taxonomies. An absent file yields the
/// default registry so a fresh install works out of the box.
pub fn load_registry() -> anyhow::Result<Registry> {
    let path = registry_path()?;
    if !path.exists() {
        return Ok(Registry::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

pub fn require_registered<'a>(
    registry: &'a Registry,
    taxonomy: &str,
) -> Result<&'a RegisteredTaxonomy, RegistryError> {
    registry
        .taxonomies
        .iter()
        .find(|t| t.name == taxonomy)
        .ok_or_else(|| RegistryError::UnknownTaxonomy(taxonomy.to_string()))
}

pub fn require_hierarchical<'a>(
    registry: &'a Registry,
    taxonomy: &str,
) -> Result<&'a RegisteredTaxonomy, RegistryError> {
    let entry = require_registered(registry, taxonomy)?;
    if !entry.hierarchical {
        return Err(RegistryError::NotHierarchical(taxonomy.to_string()));
    }
    Ok(entry)
}

/// Configured ceiling for a taxonomy; 0 means no limit. Unconfigured and
/// non-positive values both read as unlimited.
pub fn get_max_depth(settings: &SettingsFile, taxonomy: &str) -> u32 {
    match settings.taxonomies.get(taxonomy) {
        Some(p) if p.depth > 0 => p.depth as u32,
        _ => 0,
    }
}

/// Ceiling actually enforced: flat taxonomies are never depth-limited.
pub fn effective_max_depth(registry: &Registry, settings: &SettingsFile, taxonomy: &str) -> u32 {
    let hierarchical = registry
        .taxonomies
        .iter()
        .find(|t| t.name == taxonomy)
        .map(|t| t.hierarchical)
        .unwrap_or(false);
    if hierarchical {
        get_max_depth(settings, taxonomy)
    } else {
        0
    }
}

pub fn get_policy(settings: &SettingsFile, taxonomy: &str) -> TaxonomyPolicy {
    settings.taxonomies.get(taxonomy).cloned().unwrap_or_default()
}

/// Total replace of one taxonomy's policy, normalized on the way in.
/// Applying the same policy twice is a no-op.
pub fn set_policy(settings: &mut SettingsFile, taxonomy: &str, policy: TaxonomyPolicy) {
    settings
        .taxonomies
        .insert(taxonomy.to_string(), sanitize_policy(policy));
}

pub fn sanitize_policy(mut policy: TaxonomyPolicy) -> TaxonomyPolicy {
    if policy.depth < 0 {
        policy.depth = 0;
    }
    policy.labels = policy
        .labels
        .iter()
        .map(|l| l.trim().to_string())
        .collect();
    policy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_taxonomy_is_unlimited() {
        let settings = SettingsFile::default();
        assert_eq!(get_max_depth(&settings, "category"), 0);
    }

    #[test]
    fn negative_depth_reads_as_unlimited() {
        let mut settings = SettingsFile::default();
        settings.taxonomies.insert(
            "category".to_string(),
            TaxonomyPolicy {
                depth: -3,
                ..Default::default()
            },
        );
        assert_eq!(get_max_depth(&settings, "category"), 0);
    }

    #[test]
    fn sanitize_clamps_depth_and_trims_labels() {
        let policy = sanitize_policy(TaxonomyPolicy {
            depth: -1,
            labels: vec!["  Top ".to_string(), "Child".to_string()],
            ..Default::default()
        });
        assert_eq!(policy.depth, 0);
        assert_eq!(policy.labels, vec!["Top", "Child"]);
    }

    #[test]
    fn set_policy_is_idempotent() {
        let mut settings = SettingsFile::default();
        let policy = TaxonomyPolicy {
            depth: 2,
            labels: vec!["Section".to_string()],
            show_labels: true,
            ..Default::default()
        };
        set_policy(&mut settings, "category", policy.clone());
        let first = serde_json::to_string(&settings).expect("serialize");
        set_policy(&mut settings, "category", policy);
        let second = serde_json::to_string(&settings).expect("serialize");
        assert_eq!(first, second);
    }

    #[test]
    fn flat_taxonomies_are_never_enforced() {
        let registry = Registry {
            taxonomies: vec![RegisteredTaxonomy {
                name: "tag".to_string(),
                hierarchical: false,
            }],
        };
        let mut settings = SettingsFile::default();
        settings.taxonomies.insert(
            "tag".to_string(),
            TaxonomyPolicy {
                depth: 2,
                ..Default::default()
            },
        );
        assert_eq!(effective_max_depth(&registry, &settings, "tag"), 0);
    }
}
