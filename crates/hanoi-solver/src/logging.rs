//! Diagnostic tracing for the solver.
//!
//! Tracing output goes to stderr so stdout carries only the report. In
//! verbose mode every created node is logged with its state and brood.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How much the search narrates while it runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Warnings only
    #[default]
    Silent,
    /// Log every node created
    Verbose,
}

impl Verbosity {
    /// Filter directive used when `RUST_LOG` is unset
    pub fn default_directive(self) -> &'static str {
        match self {
            Verbosity::Silent => "warn",
            Verbosity::Verbose => "warn,hanoi_solver=debug",
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity`.
///
/// # Example
/// ```bash
/// RUST_LOG=hanoi_solver=info hanoi-solver solve --disks 3
/// ```
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
