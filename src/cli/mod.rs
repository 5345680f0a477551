//! Command-line inspection of population manifests.

pub mod args;
pub mod commands;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
