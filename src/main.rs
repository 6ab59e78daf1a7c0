use clap::Parser;

mod cli;
mod commands;
mod domain;
mod forest;
mod services;

use cli::Cli;
use commands::{
    handle_doctor_command, handle_runtime_commands, handle_settings_commands,
    handle_taxonomy_commands,
};
use services::output::print_error;
use services::settings::load_registry;
use services::storage::{load_settings, load_state};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        print_error(cli.json, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let registry = load_registry()?;
    let mut state = load_state()?;
    let mut settings_file = load_settings()?;

    if handle_settings_commands(cli, &registry, &mut settings_file)? {
        return Ok(());
    }
    if handle_taxonomy_commands(cli, &registry)? {
        return Ok(());
    }
    if handle_doctor_command(cli, &registry, &settings_file, &mut state)? {
        return Ok(());
    }
    handle_runtime_commands(cli, &registry, &mut state, &settings_file)
}
