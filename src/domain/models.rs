use crate::domain::constants::DEFAULT_TAXONOMY;
use crate::forest::Term;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    /// Terms per taxonomy. The tree is parent-pointer shaped: each term
    /// carries at most one parent id and depth is always derived from the
    /// chain, never stored.
    #[serde(default)]
    pub terms: BTreeMap<String, Vec<Term>>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Assignment {
    pub object: String,
    pub taxonomy: String,
    /// Admitted entries. Resolved terms are stored as their decimal id;
    /// unresolved aliases keep their original token.
    pub terms: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SettingsFile {
    #[serde(default)]
    pub taxonomies: BTreeMap<String, TaxonomyPolicy>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TaxonomyPolicy {
    /// Max allowed depth; 0 or negative means no limit. Kept signed so a
    /// hand-edited settings file with a negative value still loads and
    /// reads back as unlimited.
    #[serde(default)]
    pub depth: i64,
    #[serde(default)]
    pub hide_description: bool,
    #[serde(default)]
    pub hide_slug: bool,
    #[serde(default)]
    pub hide_count: bool,
    /// Optional display name per level, index = depth.
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub show_labels: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Registry {
    #[serde(default, rename = "taxonomy")]
    pub taxonomies: Vec<RegisteredTaxonomy>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RegisteredTaxonomy {
    pub name: String,
    #[serde(default = "default_true")]
    pub hierarchical: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Registry {
    fn default() -> Self {
        Registry {
            taxonomies: vec![RegisteredTaxonomy {
                name: DEFAULT_TAXONOMY.to_string(),
                hierarchical: true,
            }],
        }
    }
}

#[derive(Serialize, Clone)]
pub struct TermView {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub parent: Option<u64>,
    pub depth: u32,
    pub label: Option<String>,
}

#[derive(Serialize)]
pub struct MoveReport {
    pub id: u64,
    pub parent: Option<u64>,
    pub depth: u32,
    pub corrected: bool,
}

#[derive(Serialize)]
pub struct AssignReport {
    pub object: String,
    pub taxonomy: String,
    pub admitted: Vec<String>,
    pub removed_count: usize,
}

#[derive(Serialize, Clone)]
pub struct ParentChoice {
    pub id: u64,
    pub name: String,
    pub depth: u32,
}

#[derive(Serialize, Clone)]
pub struct ChecklistItem {
    pub id: u64,
    pub name: String,
    pub depth: u32,
    pub label: Option<String>,
    pub disabled: bool,
}

#[derive(Serialize)]
pub struct SettingsView {
    pub taxonomy: String,
    pub max_depth: u32,
    pub hide_description: bool,
    pub hide_slug: bool,
    pub hide_count: bool,
    pub labels: Vec<String>,
    pub show_labels: bool,
}

#[derive(Serialize, Clone)]
pub struct HideColumns {
    pub description: bool,
    pub slug: bool,
    pub count: bool,
}

/// Everything a client-side renderer needs to mirror server-side policy:
/// configured limits, current-tree depths, level labels and column flags.
#[derive(Serialize)]
pub struct UiData {
    pub max_depth_by_tax: BTreeMap<String, u32>,
    pub current_tax: String,
    pub term_depths: BTreeMap<u64, u32>,
    pub labels: Vec<String>,
    pub hide_columns: BTreeMap<String, HideColumns>,
    pub show_labels: BTreeMap<String, bool>,
}

#[derive(Serialize)]
pub struct TaxonomyCheck {
    pub taxonomy: String,
    pub max_depth: u32,
    pub term_count: usize,
    pub offenders: Vec<u64>,
    pub repaired: usize,
    pub status: String,
}

#[derive(Serialize)]
pub struct DoctorReport {
    pub overall: String,
    pub checks: Vec<TaxonomyCheck>,
}
