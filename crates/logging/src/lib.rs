#![warn(missing_docs)]

//! Log setup for the survey tools.
//!
//! The model crates only emit `tracing` events. Binaries flatten [`LogArgs`] into their CLI and
//! call [`LogArgs::init`], which installs a filter scoped to the survey crates and one of two
//! output formats: the compact human format, or logfmt lines rendered by [`fmt`].

use std::{env, io};

use clap::{Args, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt::layer as compact_layer, prelude::*};

pub mod fmt;

#[cfg(test)]
mod test_spec;

/// How log lines are written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// `tracing_subscriber`'s compact format, without timestamps.
    #[default]
    Compact,
    /// `level=… target=… msg=…` lines.
    Logfmt,
}

/// Logging flags shared by the survey binaries.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Log everything from the survey crates
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Log debug events from the survey crates (question checks, loaded documents)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// One level for the survey crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Raw tracing filter directive, overriding the other flags,
    /// e.g. "survey_model=trace,survey_expr=debug"
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl LogArgs {
    /// The filter spec these flags select; see [`compute_spec`].
    pub fn spec(&self) -> String {
        compute_spec(
            self.trace,
            self.debug,
            self.log_level.as_deref(),
            self.log_filter.as_deref(),
        )
    }

    /// Install the global subscriber. Returns `false` if one was already installed.
    pub fn init(&self) -> bool {
        let registry = tracing_subscriber::registry().with(env_filter_from_spec(&self.spec()));
        let installed = match self.log_format {
            LogFormat::Compact => registry
                .with(compact_layer().without_time().with_writer(io::stderr))
                .try_init(),
            LogFormat::Logfmt => registry.with(fmt::layer()).try_init(),
        };
        installed.is_ok()
    }
}

/// Targets the level flags apply to.
pub fn our_crates() -> &'static [&'static str] {
    &["survey_check", "survey_model", "survey_expr", "logging"]
}

/// Directive string giving every survey crate the same `level`.
pub fn level_spec_for(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    our_crates()
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Pick the filter spec: an explicit filter, then `--trace`, `--debug`, `--log-level`, then
/// `RUST_LOG`, and finally `info` for the survey crates.
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    let level = if trace {
        Some("trace")
    } else if debug {
        Some("debug")
    } else {
        log_level
    };
    match level {
        Some(level) => level_spec_for(level),
        None => env::var("RUST_LOG").unwrap_or_else(|_| level_spec_for("info")),
    }
}

/// Build an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}
