use crate::cli::{Cli, Commands, SettingsCommands, TaxonomyCommands};
use crate::domain::models::{Registry, SettingsFile, SettingsView, State, TaxonomyPolicy};
use crate::services::doctor::run_doctor;
use crate::services::output::{print_one, print_out, print_report};
use crate::services::settings;
use crate::services::storage::{audit, save_settings, save_state};

fn settings_view(settings_file: &SettingsFile, taxonomy: &str) -> SettingsView {
    let record = settings::get_policy(settings_file, taxonomy);
    SettingsView {
        taxonomy: taxonomy.to_string(),
        max_depth: settings::get_max_depth(settings_file, taxonomy),
        hide_description: record.hide_description,
        hide_slug: record.hide_slug,
        hide_count: record.hide_count,
        labels: record.labels,
        show_labels: record.show_labels,
    }
}

pub fn handle_settings_commands(
    cli: &Cli,
    registry: &Registry,
    settings_file: &mut SettingsFile,
) -> anyhow::Result<bool> {
    let Commands::Settings { command } = &cli.command else {
        return Ok(false);
    };

    match command {
        SettingsCommands::Set {
            depth,
            hide_description,
            hide_slug,
            hide_count,
            labels,
            show_labels,
        } => {
            settings::require_hierarchical(registry, &cli.tax)?;
            settings::set_policy(
                settings_file,
                &cli.tax,
                TaxonomyPolicy {
                    depth: *depth,
                    hide_description: *hide_description,
                    hide_slug: *hide_slug,
                    hide_count: *hide_count,
                    labels: labels.clone(),
                    show_labels: *show_labels,
                },
            );
            save_settings(settings_file)?;
            audit(
                "settings.set",
                serde_json::json!({"taxonomy": cli.tax, "depth": depth}),
            );
            print_one(cli.json, settings_view(settings_file, &cli.tax), |s| {
                if s.max_depth == 0 {
                    format!("{}: no depth limit", s.taxonomy)
                } else {
                    format!("{}: max depth {}", s.taxonomy, s.max_depth)
                }
            })?;
        }
        SettingsCommands::Show { all } => {
            if *all {
                let views: Vec<SettingsView> = registry
                    .taxonomies
                    .iter()
                    .filter(|t| t.hierarchical)
                    .map(|t| settings_view(settings_file, &t.name))
                    .collect();
                print_out(cli.json, &views, |s| {
                    format!("{}\tmax depth {}", s.taxonomy, s.max_depth)
                })?;
            } else {
                settings::require_registered(registry, &cli.tax)?;
                print_one(cli.json, settings_view(settings_file, &cli.tax), |s| {
                    if s.max_depth == 0 {
                        format!("{}: no depth limit", s.taxonomy)
                    } else {
                        format!("{}: max depth {}", s.taxonomy, s.max_depth)
                    }
                })?;
            }
        }
    }

    Ok(true)
}

pub fn handle_taxonomy_commands(cli: &Cli, registry: &Registry) -> anyhow::Result<bool> {
    let Commands::Taxonomy { command } = &cli.command else {
        return Ok(false);
    };

    match command {
        TaxonomyCommands::List => {
            print_out(cli.json, &registry.taxonomies, |t| {
                format!(
                    "{}\t{}",
                    t.name,
                    if t.hierarchical { "hierarchical" } else { "flat" }
                )
            })?;
        }
    }

    Ok(true)
}

pub fn handle_doctor_command(
    cli: &Cli,
    registry: &Registry,
    settings_file: &SettingsFile,
    state: &mut State,
) -> anyhow::Result<bool> {
    let Commands::Doctor { fix } = &cli.command else {
        return Ok(false);
    };

    let report = run_doctor(registry, settings_file, state, *fix);
    if *fix {
        save_state(state)?;
        audit("doctor.fix", serde_json::json!({"overall": report.overall}));
    }
    let ok = report.overall == "ok";
    print_report(cli.json, ok, report, |r| {
        let mut lines = vec![format!("doctor: {}", r.overall)];
        for c in &r.checks {
            lines.push(format!(
                "{}\t{}\t{} offenders",
                c.taxonomy,
                c.status,
                c.offenders.len()
            ));
        }
        lines.join("\n")
    })?;
    if !ok {
        std::process::exit(1);
    }

    Ok(true)
}
