//! Tree-wide violation scan.
//!
//! Enforcement is best-effort at the edges (a parent can change between the
//! policy read and the depth read), so `doctor` exists to find and repair
//! stragglers after the fact: any term sitting deeper than its taxonomy's
//! ceiling.

use crate::domain::models::{DoctorReport, Registry, SettingsFile, State, TaxonomyCheck};
use crate::forest;
use crate::services::settings;

pub fn run_doctor(
    registry: &Registry,
    settings_file: &SettingsFile,
    state: &mut State,
    fix: bool,
) -> DoctorReport {
    let mut checks = Vec::new();
    for entry in &registry.taxonomies {
        if !entry.hierarchical {
            continue;
        }
        let max = settings::get_max_depth(settings_file, &entry.name);
        let terms = state.terms.entry(entry.name.clone()).or_default();
        let term_count = terms.len();

        if max == 0 {
            checks.push(TaxonomyCheck {
                taxonomy: entry.name.clone(),
                max_depth: 0,
                term_count,
                offenders: vec![],
                repaired: 0,
                status: "unlimited".to_string(),
            });
            continue;
        }

        let offenders: Vec<u64> = forest::term_depths(terms)
            .into_iter()
            .filter(|(_, depth)| *depth > max)
            .map(|(id, _)| id)
            .collect();

        let mut repaired = 0;
        if fix {
            // Reparent the shallowest offender first; clearing a subtree
            // root also clears its descendants, so the repair set stays
            // minimal.
            loop {
                let next = forest::term_depths(terms)
                    .into_iter()
                    .filter(|(_, depth)| *depth > max)
                    .min_by_key(|(_, depth)| *depth)
                    .map(|(id, _)| id);
                let Some(id) = next else {
                    break;
                };
                if forest::reparent(terms, id, None).is_err() {
                    break;
                }
                repaired += 1;
            }
        }

        let status = if offenders.is_empty() {
            "ok"
        } else if fix {
            "repaired"
        } else {
            "violations"
        };
        checks.push(TaxonomyCheck {
            taxonomy: entry.name.clone(),
            max_depth: max,
            term_count,
            offenders,
            repaired,
            status: status.to_string(),
        });
    }

    let overall = if checks.iter().any(|c| c.status == "violations") {
        "needs_attention"
    } else {
        "ok"
    };
    DoctorReport {
        overall: overall.to_string(),
        checks,
    }
}
