//! release-audit-core
//!
//! Core library for auditing Go command-runner releases before they ship.
//!
//! This crate defines the shared data model, the printable-string extractor,
//! the artifact classifier that decides whether a release binary carries test
//! code, the source-tree pattern scanner, the permission auditor, and the
//! orchestration service that folds every check into a single summary.
//!
//! External commands are reached through `environment::CommandRunner`, so
//! every check can run against a scripted toolchain.

pub mod model;
pub mod strings;
pub mod analysis;
pub mod source;
pub mod permissions;
pub mod environment;
pub mod config;
pub mod report;
pub mod services;

/// Crate version reported by `release-audit --version`.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
