#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use mpp_cli::args::{CliArgs, OutputFormat};
use mpp_cli::reporter::{Reporter, render_json};
use mpp_cli::{driver, tracing_config};

const EXIT_DIAGNOSTICS: i32 = 1;

fn main() -> Result<()> {
    // Installed only when MPP_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let outcome = driver::run(&args)?;

    match args.format {
        OutputFormat::Json => println!("{}", render_json(&outcome.diagnostics)?),
        OutputFormat::Text => {
            let color = !args.no_color
                && std::env::var_os("NO_COLOR").is_none()
                && std::io::stdout().is_terminal();
            if !outcome.diagnostics.is_empty() {
                println!("{}", Reporter::new(color).render(&outcome.diagnostics));
            }
            if outcome.has_errors {
                eprintln!("\nFound {} error(s).", outcome.diagnostics.len());
            }
        }
    }

    if outcome.has_errors {
        std::process::exit(EXIT_DIAGNOSTICS);
    }
    Ok(())
}
