pub mod commands;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};

use airenv::AssembleOptions;

/// Resolve startup environment from .air-env.toml and Secret Manager.
#[derive(Parser, Debug)]
#[command(name = "airenv", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to read (default: .air-env.toml)
    #[arg(long, short, global = true, env = "AIRENV_FILE", default_value = "")]
    pub file: String,

    /// Do nothing unless the file sets project_id
    #[arg(long, global = true)]
    pub require_project: bool,

    /// Do not export GOOGLE_CLOUD_PROJECT
    #[arg(long, global = true)]
    pub no_project_var: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            require_project_id: self.require_project,
            export_project_var: !self.no_project_var,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command with the resolved environment
    Run {
        /// Command and arguments (after --)
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Print the resolved environment
    Resolve {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Dotenv)]
        format: Format,

        /// Print secret values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Validate the config file without contacting the secret store
    Check,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Dotenv,
    Json,
}
