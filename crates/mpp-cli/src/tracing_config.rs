//! Tracing configuration for debugging resolution results.
//!
//! Three output formats, selected with `MPP_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: hierarchical indented output via `tracing-tree`
//! - `json`: one JSON object per span/event
//!
//! ```bash
//! MPP_LOG=debug MPP_LOG_FORMAT=tree mpp-check project.json
//! MPP_LOG="mpp_checker::class_scopes=trace" mpp-check project.json
//! ```
//!
//! The subscriber is only installed when `MPP_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "MPP_LOG";
const FORMAT_VAR: &str = "MPP_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(FORMAT_VAR).unwrap_or_default())
    }
}

/// `MPP_LOG` takes precedence over `RUST_LOG`; both use `RUST_LOG` syntax.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_VAR) {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber. Output goes to stderr so it never mixes
/// with diagnostics printed on stdout.
pub fn init_tracing() {
    if std::env::var(LOG_VAR).is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            // `HierarchicalLayer` writes to stderr by default.
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
