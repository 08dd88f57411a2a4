use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// CLI arguments for the mpp-check binary.
#[derive(Parser, Debug)]
#[command(
    name = "mpp-check",
    version,
    about = "Match actual declarations against their expected counterparts"
)]
pub struct CliArgs {
    /// Project description (JSON) listing modules and declarations.
    pub project: PathBuf,

    /// How unresolved types compare while matching signatures.
    #[arg(long = "error-types", value_enum, ignore_case = true)]
    pub error_types: Option<ErrorTypes>,

    /// Treat the project as single-platform; nothing is reported.
    #[arg(long = "no-multiplatform")]
    pub no_multiplatform: bool,

    /// Worker threads; more than one switches to a shared resolution cache.
    #[arg(short = 'j', long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Diagnostic output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// Disable colored output (also honoured through `NO_COLOR`).
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorTypes {
    /// Unresolved types are equal to anything.
    Lenient,
    /// Unresolved types never match.
    Strict,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
