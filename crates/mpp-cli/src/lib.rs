//! Command-line front end for the expect/actual checker.
//!
//! Reads a JSON project description (modules, dependencies and
//! declarations), runs the checker over every actual declaration and
//! renders the diagnostics.

pub mod args;
pub mod config;
pub mod driver;
pub mod fixture;
pub mod reporter;
pub mod tracing_config;

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
#[cfg(test)]
#[path = "tests/fixture_tests.rs"]
mod fixture_tests;
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
