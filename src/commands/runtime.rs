use crate::cli::{Cli, Commands, TermCommands};
use crate::domain::models::{
    AssignReport, Assignment, MoveReport, Registry, SettingsFile, State, TermView,
};
use crate::forest;
use crate::services::annotate::{self, Annotations};
use crate::services::depth;
use crate::services::notices;
use crate::services::output::{print_one, print_out};
use crate::services::policy::{self, DepthError, InsertDecision, MoveOutcome};
use crate::services::settings::{self, RegistryError};
use crate::services::storage::{audit, save_state, upsert_assignment};

pub fn handle_runtime_commands(
    cli: &Cli,
    registry: &Registry,
    state: &mut State,
    settings_file: &SettingsFile,
) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Term { command } => match command {
            TermCommands::Add { name, parent, slug } => {
                let entry = settings::require_registered(registry, &cli.tax)?;
                if parent.is_some() && !entry.hierarchical {
                    return Err(RegistryError::NotHierarchical(cli.tax.clone()).into());
                }
                let max = settings::effective_max_depth(registry, settings_file, &cli.tax);
                let terms = state.terms.entry(cli.tax.clone()).or_default();
                if let InsertDecision::Reject { max } = policy::evaluate_insert(terms, max, *parent)
                {
                    return Err(DepthError::TooDeep {
                        taxonomy: cli.tax.clone(),
                        max,
                    }
                    .into());
                }
                let term = forest::add_term(terms, name, slug.as_deref(), *parent)?;
                let term_depth = depth::depth_of(terms, term.id);
                save_state(state)?;
                audit(
                    "term.add",
                    serde_json::json!({
                        "taxonomy": cli.tax,
                        "id": term.id,
                        "parent": term.parent,
                        "depth": term_depth
                    }),
                );
                let record = settings::get_policy(settings_file, &cli.tax);
                let view = TermView {
                    id: term.id,
                    name: term.name.clone(),
                    slug: term.slug.clone(),
                    parent: term.parent,
                    depth: term_depth,
                    label: policy::label_for(&record, term_depth),
                };
                print_one(cli.json, view, |t| {
                    format!("added {} (id {}, depth {})", t.name, t.id, t.depth)
                })?;
            }
            TermCommands::Move { id, parent, root } => {
                settings::require_hierarchical(registry, &cli.tax)?;
                if parent.is_none() && !*root {
                    anyhow::bail!("specify --parent <id> or --root");
                }
                let max = settings::effective_max_depth(registry, settings_file, &cli.tax);
                let user = notices::acting_user(cli.user.as_deref());
                let new_parent = if *root { None } else { *parent };

                // The edit surface reparents freely; violations are detected
                // afterwards and repaired, not prevented.
                let terms = state.terms.entry(cli.tax.clone()).or_default();
                forest::reparent(terms, *id, new_parent)?;
                let mut corrected = false;
                if let MoveOutcome::Correct { max } = policy::evaluate_move(terms, max, *id) {
                    forest::reparent(terms, *id, None)?;
                    notices::record_notice(
                        &user,
                        &format!(
                            "term {} was moved to top-level because its parent would exceed max depth {} for {}",
                            id, max, cli.tax
                        ),
                    )?;
                    corrected = true;
                }
                let report = MoveReport {
                    id: *id,
                    parent: forest::get_term(terms, *id).and_then(|t| t.parent),
                    depth: depth::depth_of(terms, *id),
                    corrected,
                };
                save_state(state)?;
                audit(
                    "term.move",
                    serde_json::json!({
                        "taxonomy": cli.tax,
                        "id": id,
                        "parent": report.parent,
                        "corrected": report.corrected
                    }),
                );
                print_one(cli.json, report, |r| {
                    if r.corrected {
                        format!("term {} moved to top-level (max depth exceeded)", r.id)
                    } else {
                        format!("term {} moved (depth {})", r.id, r.depth)
                    }
                })?;
            }
            TermCommands::Remove { id } => {
                settings::require_registered(registry, &cli.tax)?;
                let terms = state.terms.entry(cli.tax.clone()).or_default();
                let removed = forest::remove_term(terms, *id)?;
                save_state(state)?;
                audit(
                    "term.remove",
                    serde_json::json!({"taxonomy": cli.tax, "id": removed.id}),
                );
                print_one(cli.json, removed.id, |i| format!("removed term {}", i))?;
            }
            TermCommands::List => {
                settings::require_registered(registry, &cli.tax)?;
                let max = settings::effective_max_depth(registry, settings_file, &cli.tax);
                let record = settings::get_policy(settings_file, &cli.tax);
                let terms = state
                    .terms
                    .get(&cli.tax)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let annotations = Annotations::build(terms, record, max);
                let views = annotate::term_views(terms, &annotations);
                print_out(cli.json, &views, |t| match &t.label {
                    Some(label) => format!("{}\t{} [{}]\tdepth {}", t.id, t.name, label, t.depth),
                    None => format!("{}\t{}\tdepth {}", t.id, t.name, t.depth),
                })?;
            }
        },
        Commands::Assign {
            object,
            terms: candidates,
        } => {
            settings::require_registered(registry, &cli.tax)?;
            let max = settings::effective_max_depth(registry, settings_file, &cli.tax);
            let user = notices::acting_user(cli.user.as_deref());
            let outcome = {
                let tree = state
                    .terms
                    .get(&cli.tax)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                policy::filter_assignable(tree, max, candidates)
            };
            if outcome.removed > 0 {
                notices::record_notice(
                    &user,
                    &format!(
                        "removed {} terms deeper than max depth ({}) for taxonomy {}",
                        outcome.removed, max, cli.tax
                    ),
                )?;
            }
            upsert_assignment(
                state,
                Assignment {
                    object: object.clone(),
                    taxonomy: cli.tax.clone(),
                    terms: outcome.admitted.clone(),
                },
            );
            save_state(state)?;
            audit(
                "assign",
                serde_json::json!({
                    "object": object,
                    "taxonomy": cli.tax,
                    "admitted": outcome.admitted.len(),
                    "removed": outcome.removed
                }),
            );
            let report = AssignReport {
                object: object.clone(),
                taxonomy: cli.tax.clone(),
                admitted: outcome.admitted,
                removed_count: outcome.removed,
            };
            print_one(cli.json, report, |r| {
                format!(
                    "assigned {} terms to {} ({} removed)",
                    r.admitted.len(),
                    r.object,
                    r.removed_count
                )
            })?;
        }
        Commands::Assignments { object } => {
            let items: Vec<Assignment> = state
                .assignments
                .iter()
                .filter(|a| object.as_deref().map(|o| o == a.object).unwrap_or(true))
                .cloned()
                .collect();
            print_out(cli.json, &items, |a| {
                format!("{}\t{}\t{}", a.object, a.taxonomy, a.terms.join(","))
            })?;
        }
        Commands::Parents => {
            settings::require_hierarchical(registry, &cli.tax)?;
            let max = settings::effective_max_depth(registry, settings_file, &cli.tax);
            let terms = state
                .terms
                .get(&cli.tax)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let choices = annotate::parent_choices(terms, max);
            print_out(cli.json, &choices, |c| {
                format!("{}\t{}\tdepth {}", c.id, c.name, c.depth)
            })?;
        }
        Commands::Checklist => {
            settings::require_registered(registry, &cli.tax)?;
            let max = settings::effective_max_depth(registry, settings_file, &cli.tax);
            let record = settings::get_policy(settings_file, &cli.tax);
            let terms = state
                .terms
                .get(&cli.tax)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let annotations = Annotations::build(terms, record, max);
            let items = annotate::checklist(terms, &annotations);
            print_out(cli.json, &items, |c| {
                format!(
                    "{}\t{}\tdepth {}{}",
                    c.id,
                    c.name,
                    c.depth,
                    if c.disabled { " (disabled)" } else { "" }
                )
            })?;
        }
        Commands::Uidata => {
            settings::require_registered(registry, &cli.tax)?;
            let data = annotate::build_uidata(registry, settings_file, state, &cli.tax);
            print_one(cli.json, data, |d| {
                format!(
                    "uidata for {}: {} terms, {} limited taxonomies",
                    d.current_tax,
                    d.term_depths.len(),
                    d.max_depth_by_tax.len()
                )
            })?;
        }
        Commands::Notices => {
            let user = notices::acting_user(cli.user.as_deref());
            let message = notices::take_notice(&user)?;
            print_one(cli.json, message, |m| {
                m.clone()
                    .unwrap_or_else(|| "no pending notices".to_string())
            })?;
        }
        Commands::Settings { .. } | Commands::Taxonomy { .. } | Commands::Doctor { .. } => {
            unreachable!("handled by the admin command layer")
        }
    }

    Ok(())
}
