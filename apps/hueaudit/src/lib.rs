//! hueaudit core library.
//!
//! This crate exposes programmatic APIs for auditing design document trees
//! against WCAG accessibility criteria.
//!
//! High-level modules:
//! - `color`: Color parsing, luminance, contrast, and dichromacy simulation.
//! - `wcag`: WCAG reference table and derived thresholds.
//! - `node`: The read-only node interface hosts implement.
//! - `traversal`: Fail-soft tree walks (descendants, ancestors, z-order).
//! - `analyzers`: The six independent accessibility checks.
//! - `scanner`: Parallel fan-out over analyzers with severity ordering.
//! - `models`: Issue, summary, filter, and fix data models.
//! - `document`: JSON design documents as a node tree.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `output`: Human/JSON printers.
//! - `logging`: Diagnostic logging setup.
//! - `error`: Boundary error type.
//! - `utils`: Supporting helpers.
pub mod analyzers;
pub mod cli;
pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod models;
pub mod node;
pub mod output;
pub mod scanner;
pub mod traversal;
pub mod utils;
pub mod wcag;

pub use models::{Issue, IssueType, ScanReport, Severity};
pub use node::{Node, NodeRef};
pub use scanner::{run_accessibility_check, ScanOptions};
