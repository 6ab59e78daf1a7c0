use crate::domain::constants::DEFAULT_TAXONOMY;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "taxdepth", version, about = "Taxonomy depth control CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_TAXONOMY,
        help = "Taxonomy to operate on"
    )]
    pub tax: String,
    #[arg(
        long,
        global = true,
        help = "Acting user for violation notices (defaults to $USER)"
    )]
    pub user: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, move, remove and list terms
    Term {
        #[command(subcommand)]
        command: TermCommands,
    },
    /// Assign a set of terms to an object, dropping over-deep entries
    Assign {
        object: String,
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// List stored assignments
    Assignments { object: Option<String> },
    /// List terms eligible to parent a new child
    Parents,
    /// List all terms with depth, label and assignability
    Checklist,
    /// Emit the client data blob (limits, depths, labels, column flags)
    Uidata,
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    Taxonomy {
        #[command(subcommand)]
        command: TaxonomyCommands,
    },
    /// Consume the acting user's pending violation notice
    Notices,
    /// Scan registered taxonomies for terms beyond their ceiling
    Doctor {
        #[arg(long, help = "Reparent offending terms to root")]
        fix: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TermCommands {
    Add {
        name: String,
        #[arg(long)]
        parent: Option<u64>,
        #[arg(long)]
        slug: Option<String>,
    },
    Move {
        id: u64,
        #[arg(long, conflicts_with = "root")]
        parent: Option<u64>,
        #[arg(long, help = "Move the term to top level")]
        root: bool,
    },
    Remove {
        id: u64,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    Set {
        #[arg(long, default_value_t = 0, help = "Max allowed depth (0 = no limit)")]
        depth: i64,
        #[arg(long)]
        hide_description: bool,
        #[arg(long)]
        hide_slug: bool,
        #[arg(long)]
        hide_count: bool,
        #[arg(long = "label", help = "Level name, repeat per level (index = depth)")]
        labels: Vec<String>,
        #[arg(long, help = "Show level labels beside term names")]
        show_labels: bool,
    },
    Show {
        #[arg(long, help = "Show every registered hierarchical taxonomy")]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaxonomyCommands {
    List,
}
