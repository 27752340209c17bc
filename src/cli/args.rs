//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{appearances, completions, convert, params, patch, templates};

#[derive(Parser, Debug)]
#[command(
    name = "partpatch",
    version,
    about = "Patch dimensional parameters in parametric part templates"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by all commands
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Config file (defaults to ./partpatch.yaml, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with styling
    #[default]
    Pretty,
    /// JSON for scripting
    Json,
    /// YAML for scripting
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Patch a part template and save the result
    Patch(patch::PatchArgs),

    /// List a template's parameters
    Params(params::ParamsArgs),

    /// Scan a directory for part templates
    Templates(templates::TemplatesArgs),

    /// List or resolve appearance assets
    Appearances(appearances::AppearancesArgs),

    /// Convert a length between inches and millimeters
    Convert(convert::ConvertArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
