//! Checker options from the project file and the command line.

use mpp_checker::CheckerOptions;
use mpp_solver::{CachePolicy, ErrorTypePolicy};
use serde::Deserialize;

use crate::args::{CliArgs, ErrorTypes};

/// The optional `"options"` object of a project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectOptions {
    #[serde(default)]
    pub error_types: Option<ErrorTypes>,
    #[serde(default)]
    pub multiplatform: Option<bool>,
}

/// Command-line flags override the project file, which overrides the
/// defaults.
pub fn resolve_checker_options(project: &ProjectOptions, args: &CliArgs) -> CheckerOptions {
    let error_types = args
        .error_types
        .or(project.error_types)
        .map(error_type_policy)
        .unwrap_or_default();
    let multiplatform = !args.no_multiplatform && project.multiplatform.unwrap_or(true);
    let cache_policy = if args.jobs > 1 {
        CachePolicy::ThreadSafe
    } else {
        CachePolicy::ThreadUnsafe
    };

    CheckerOptions::default()
        .with_error_types(error_types)
        .with_multiplatform(multiplatform)
        .with_cache_policy(cache_policy)
}

pub const fn error_type_policy(error_types: ErrorTypes) -> ErrorTypePolicy {
    match error_types {
        ErrorTypes::Lenient => ErrorTypePolicy::EqualToAnything,
        ErrorTypes::Strict => ErrorTypePolicy::NeverEqual,
    }
}
