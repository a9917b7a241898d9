//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Organization hierarchy flattening, member placement and design-token export
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect organization trees
    Org {
        #[command(subcommand)]
        command: OrgCommands,
    },

    /// Read and export design tokens
    Tokens {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum OrgCommands {
    /// Print members row by row, one row per depth
    Levels {
        /// Organization JSON (nested tree or record array)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show hierarchy as tree
    Tree {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show where a new member would be placed
    Place {
        /// Organization record array
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Sponsor node id
        #[arg(long)]
        sponsor: String,
        /// New node id
        #[arg(long)]
        id: String,
        /// Display name
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        rank: String,
        /// Use binary spillover regardless of settings
        #[arg(long)]
        binary: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// List token categories
    List,
    /// Print a single token by dotted path
    Get {
        category: String,
        path: String,
    },
    /// Write CSS variables and Tailwind fragment
    Export {
        /// Output directory (default: settings dist_dir)
        #[arg(long, value_hint = ValueHint::DirPath)]
        dist: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective settings
    Show,
    /// Print config file locations
    Path,
}
