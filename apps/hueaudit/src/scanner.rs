//! Scan runner: fans the analyzers out over a node set and merges results.
//!
//! Analyzers run in parallel on the rayon pool. Their lists are concatenated
//! in analyzer order and stable-sorted by severity, so critical issues come
//! first and ties keep the order each analyzer produced.
//!
//! An analyzer that panics contributes no issues; the scan still completes
//! with whatever the others found.

use crate::analyzers::{
    Analyzer, ColorBlindnessAnalyzer, ContrastAnalyzer, ImageAccessibilityAnalyzer,
    NavigationAnalyzer, TextSizeAnalyzer, TouchTargetAnalyzer,
};
use crate::document::Document;
use crate::models::{Issue, IssueFilter, ScanReport};
use crate::node::NodeRef;
use crate::wcag::{Level, Platform};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// One thread per analyzer for time-limited scans.
const SCAN_POOL_THREADS: usize = 6;

/// Knobs for a single scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanOptions {
    /// Run the color-blindness analyzer (the most expensive one).
    pub include_color_blindness: bool,
    pub level: Level,
    pub platform: Platform,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_color_blindness: true,
            level: Level::AA,
            platform: Platform::Web,
        }
    }
}

/// The analyzers enabled by `opts`, in report order.
pub fn analyzers_for(opts: &ScanOptions) -> Vec<Box<dyn Analyzer>> {
    let mut list: Vec<Box<dyn Analyzer>> = vec![
        Box::new(ContrastAnalyzer::new(opts.level)),
        Box::new(TextSizeAnalyzer::new(opts.platform)),
        Box::new(TouchTargetAnalyzer::new(opts.platform)),
        Box::new(ImageAccessibilityAnalyzer),
    ];
    if opts.include_color_blindness {
        list.push(Box::new(ColorBlindnessAnalyzer));
    }
    list.push(Box::new(NavigationAnalyzer));
    list
}

/// Run every enabled analyzer over `nodes` and return the combined,
/// severity-sorted issue list. Empty input yields an empty list.
pub fn run_accessibility_check(nodes: &[NodeRef], opts: &ScanOptions) -> Vec<Issue> {
    if nodes.is_empty() {
        return Vec::new();
    }
    run_with_analyzers(nodes, &analyzers_for(opts))
}

/// Run an explicit analyzer set. Panics inside an analyzer are contained.
pub fn run_with_analyzers(nodes: &[NodeRef], analyzers: &[Box<dyn Analyzer>]) -> Vec<Issue> {
    let per_analyzer: Vec<Vec<Issue>> = analyzers
        .par_iter()
        .map(|a| match catch_unwind(AssertUnwindSafe(|| a.analyze(nodes))) {
            Ok(found) => found,
            Err(payload) => {
                tracing::error!(
                    analyzer = a.name(),
                    reason = %panic_message(payload.as_ref()),
                    "analyzer failed; its findings are dropped"
                );
                Vec::new()
            }
        })
        .collect();
    let mut issues: Vec<Issue> = per_analyzer.into_iter().flatten().collect();
    issues.sort_by_key(|i| i.severity.rank());
    issues
}

/// Scan a loaded document and apply `filter` to the result.
pub fn scan_document(doc: &Document, opts: &ScanOptions, filter: &IssueFilter) -> ScanReport {
    let issues = filter.apply(run_accessibility_check(doc.roots(), opts));
    ScanReport::new(issues, doc.len())
}

/// Like [`scan_document`], but gives up after `limit`. `None` means the
/// scan did not finish in time.
pub fn scan_document_within(
    doc: Document,
    opts: ScanOptions,
    filter: IssueFilter,
    limit: Option<Duration>,
) -> Option<ScanReport> {
    let nodes = doc.len();
    let issues = run_within(doc.roots().to_vec(), opts, limit)?;
    Some(ScanReport::new(filter.apply(issues), nodes))
}

/// [`run_accessibility_check`] raced against `limit`.
///
/// The scan runs on its own thread and its own rayon pool, so a caller that
/// is itself a rayon worker can block here without starving the analyzers.
/// On timeout the thread is left to finish and its result is discarded.
pub fn run_within(nodes: Vec<NodeRef>, opts: ScanOptions, limit: Option<Duration>) -> Option<Vec<Issue>> {
    let Some(limit) = limit else {
        return Some(run_accessibility_check(&nodes, &opts));
    };
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let issues = match rayon::ThreadPoolBuilder::new()
            .num_threads(SCAN_POOL_THREADS)
            .thread_name(|i| format!("hueaudit-scan-{}", i))
            .build()
        {
            Ok(pool) => pool.install(|| run_accessibility_check(&nodes, &opts)),
            Err(e) => {
                tracing::warn!(error = %e, "private scan pool unavailable; using the global pool");
                run_accessibility_check(&nodes, &opts)
            }
        };
        let _ = tx.send(issues);
    });
    match rx.recv_timeout(limit) {
        Ok(issues) => Some(issues),
        Err(e) => {
            tracing::warn!(limit = ?limit, error = %e, "scan abandoned");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
