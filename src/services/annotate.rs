//! Depth annotations for renderers.
//!
//! Any surface that lists terms (checklists, term tables, client data blobs)
//! obtains depth, level label and eligibility through [`Annotations`] built
//! from one tree snapshot, instead of re-deriving policy locally. Keeps
//! renderers consistent with the engine without coupling them to it.

use crate::domain::models::{
    ChecklistItem, HideColumns, ParentChoice, Registry, SettingsFile, State, TaxonomyPolicy,
    TermView, UiData,
};
use crate::forest::{self, Term};
use crate::services::{policy, settings};
use std::collections::BTreeMap;

pub struct Annotations {
    depths: BTreeMap<u64, u32>,
    policy: TaxonomyPolicy,
    max: u32,
}

impl Annotations {
    pub fn build(terms: &[Term], policy: TaxonomyPolicy, max: u32) -> Self {
        Annotations {
            depths: forest::term_depths(terms),
            policy,
            max,
        }
    }

    pub fn depth_of(&self, id: u64) -> u32 {
        self.depths.get(&id).copied().unwrap_or(0)
    }

    pub fn label_for(&self, depth: u32) -> Option<String> {
        policy::label_for(&self.policy, depth)
    }

    /// True when the term may not be assigned (deeper than the ceiling);
    /// rendered as a disabled checkbox.
    pub fn disabled(&self, depth: u32) -> bool {
        !policy::assignable(self.max, depth)
    }
}

pub fn term_views(terms: &[Term], annotations: &Annotations) -> Vec<TermView> {
    terms
        .iter()
        .map(|t| {
            let depth = annotations.depth_of(t.id);
            TermView {
                id: t.id,
                name: t.name.clone(),
                slug: t.slug.clone(),
                parent: t.parent,
                depth,
                label: annotations.label_for(depth),
            }
        })
        .collect()
}

pub fn checklist(terms: &[Term], annotations: &Annotations) -> Vec<ChecklistItem> {
    terms
        .iter()
        .map(|t| {
            let depth = annotations.depth_of(t.id);
            ChecklistItem {
                id: t.id,
                name: t.name.clone(),
                depth,
                label: annotations.label_for(depth),
                disabled: annotations.disabled(depth),
            }
        })
        .collect()
}

pub fn parent_choices(terms: &[Term], max: u32) -> Vec<ParentChoice> {
    policy::eligible_parents(terms, max)
        .into_iter()
        .map(|t| ParentChoice {
            id: t.id,
            name: t.name.clone(),
            depth: forest::ancestor_chain(terms, t.id).len() as u32,
        })
        .collect()
}

/// Assemble the client data blob for one current taxonomy: configured
/// ceilings for every taxonomy, depths and labels for the current one, and
/// per-taxonomy column/label flags.
pub fn build_uidata(
    registry: &Registry,
    settings_file: &SettingsFile,
    state: &State,
    current_tax: &str,
) -> UiData {
    let mut max_depth_by_tax = BTreeMap::new();
    let mut hide_columns = BTreeMap::new();
    let mut show_labels = BTreeMap::new();
    for (tax, policy) in &settings_file.taxonomies {
        let max = settings::effective_max_depth(registry, settings_file, tax);
        if max > 0 {
            max_depth_by_tax.insert(tax.clone(), max);
        }
        hide_columns.insert(
            tax.clone(),
            HideColumns {
                description: policy.hide_description,
                slug: policy.hide_slug,
                count: policy.hide_count,
            },
        );
        show_labels.insert(tax.clone(), policy.show_labels);
    }

    let terms = state
        .terms
        .get(current_tax)
        .map(|v| v.as_slice())
        .unwrap_or(&[]);
    let current_policy = settings::get_policy(settings_file, current_tax);

    UiData {
        max_depth_by_tax,
        current_tax: current_tax.to_string(),
        term_depths: forest::term_depths(terms),
        labels: current_policy.labels,
        hide_columns,
        show_labels,
    }
}
