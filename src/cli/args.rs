//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Partview view/partial renderer CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, default_value = "partview.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Components directory (overrides config)
    #[arg(long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub components: Option<PathBuf>,

    /// Views directory (overrides config)
    #[arg(long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub views: Option<PathBuf>,

    /// Template file extension (overrides config)
    #[arg(long, global = true)]
    pub ext: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a view or fragment (`view` or `view#fragment`) to stdout
    #[command(visible_alias = "r")]
    Render {
        address: String,

        #[command(flatten)]
        data: DataArgs,
    },

    /// List loaded view identifiers
    #[command(visible_alias = "l")]
    List,

    /// Load all templates once and report errors
    #[command(visible_alias = "c")]
    Check,

    /// Render, then re-render whenever templates change
    #[command(visible_alias = "w")]
    Watch {
        address: String,

        #[command(flatten)]
        data: DataArgs,
    },
}

/// Template data, as inline JSON or a JSON file
#[derive(clap::Args, Debug, Clone)]
#[group(multiple = false)]
pub struct DataArgs {
    /// Inline JSON data
    #[arg(short, long)]
    pub data: Option<String>,

    /// JSON data file
    #[arg(short = 'f', long, value_hint = clap::ValueHint::FilePath)]
    pub data_file: Option<PathBuf>,
}
