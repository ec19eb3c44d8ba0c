//! hueaudit CLI binary entry point.
//! Delegates to the library for scanning and prints results.

use clap::Parser;
use hueaudit::cli::{Cli, Commands};
use hueaudit::color::try_parse_color;
use hueaudit::config::{self, CliOverrides, Effective};
use hueaudit::document::Document;
use hueaudit::error::{AuditError, Result};
use hueaudit::output::{self, DocumentReport};
use hueaudit::utils::{display_path, error_prefix, info_prefix, note_prefix};
use hueaudit::wcag::{self, Level};
use hueaudit::{logging, scanner};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", error_prefix(), msg);
    std::process::exit(2);
}

fn output_mode(output: Option<String>) -> String {
    let o = output.unwrap_or_else(|| "human".to_string());
    if o != "human" && o != "json" {
        fail(format!("unknown output '{}' (expected human|json)", o));
    }
    o
}

fn parse_level(level: Option<&str>) -> Level {
    match level {
        Some(s) => s.parse().unwrap_or_else(|e: String| fail(e)),
        None => Level::default(),
    }
}

/// Expand glob patterns relative to `root` into a sorted, deduplicated file list.
fn collect_inputs(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();
    for pat in patterns {
        let abs = if Path::new(pat).is_absolute() {
            PathBuf::from(pat)
        } else {
            root.join(pat)
        };
        for entry in glob::glob(&abs.to_string_lossy())? {
            match entry {
                Ok(p) if p.is_file() => {
                    files.insert(p);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping unreadable path"),
            }
        }
    }
    Ok(files.into_iter().collect())
}

fn scan_file(path: &Path, eff: &Effective) -> Result<DocumentReport> {
    let doc = Document::from_path(path)?;
    tracing::debug!(file = %path.display(), nodes = doc.len(), "document loaded");
    let report = scanner::scan_document_within(doc, eff.scan_options(), eff.filter.clone(), eff.timeout)
        .ok_or_else(|| AuditError::Timeout {
            path: path.to_path_buf(),
            limit: eff.timeout.unwrap_or_default(),
        })?;
    Ok(DocumentReport {
        file: display_path(path, &eff.repo_root),
        report,
    })
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Scan {
            patterns,
            repo_root,
            output,
            level,
            platform,
            no_color_blindness,
            severity,
            types,
            timeout_secs,
            verbose,
        } => {
            logging::init_logging(verbose);
            let overrides = CliOverrides {
                repo_root,
                output,
                level,
                platform,
                no_color_blindness,
                severity,
                types,
                timeout_secs,
            };
            let eff = config::resolve_effective(&overrides).unwrap_or_else(|e| fail(e));
            // Friendly note if no config was found
            if eff.config_path.is_none() && eff.output != "json" {
                eprintln!("{} No hueaudit.toml found; using defaults.", note_prefix());
            }
            let files = collect_inputs(&eff.repo_root, &patterns).unwrap_or_else(|e| fail(e));
            if files.is_empty() {
                fail(format!(
                    "No documents matched [{}] under {}",
                    patterns.join(", "),
                    eff.repo_root.display()
                ));
            }
            if eff.output != "json" {
                eprintln!(
                    "{} Scanning {} document(s) at WCAG {} for {}",
                    info_prefix(),
                    files.len(),
                    eff.level,
                    eff.platform
                );
            }

            let outcomes: Vec<Result<DocumentReport>> =
                files.par_iter().map(|p| scan_file(p, &eff)).collect();
            let mut reports = Vec::with_capacity(outcomes.len());
            let mut load_failed = false;
            for o in outcomes {
                match o {
                    Ok(r) => reports.push(r),
                    Err(e) => {
                        eprintln!("{} {}", error_prefix(), e);
                        load_failed = true;
                    }
                }
            }
            output::print_scan(&reports, &eff.output);
            if load_failed {
                std::process::exit(2);
            }
            if reports.iter().any(|r| r.report.has_critical()) {
                std::process::exit(1);
            }
        }
        Commands::Contrast {
            foreground,
            background,
            size,
            bold,
            level,
            output,
        } => {
            let output = output_mode(output);
            let level = parse_level(level.as_deref());
            let fg = try_parse_color(&foreground)
                .unwrap_or_else(|| fail(format!("unrecognized color '{}'", foreground)));
            let bg = try_parse_color(&background)
                .unwrap_or_else(|| fail(format!("unrecognized color '{}'", background)));
            // backgrounds are treated as opaque
            let bg = bg.over(&hueaudit::color::Rgba::WHITE);
            output::print_contrast(&fg, &bg, size, bold, level, &output);
        }
        Commands::Simulate { color, output } => {
            let output = output_mode(output);
            let c = try_parse_color(&color)
                .unwrap_or_else(|| fail(format!("unrecognized color '{}'", color)));
            output::print_simulate(&c, &output);
        }
        Commands::Guidelines { level, output } => {
            let output = output_mode(output);
            let list: Vec<&wcag::Guideline> = match level.as_deref() {
                Some(_) => {
                    let max = parse_level(level.as_deref());
                    [Level::A, Level::AA, Level::AAA]
                        .into_iter()
                        .filter(|l| *l <= max)
                        .flat_map(wcag::guidelines_by_level)
                        .collect()
                }
                None => wcag::GUIDELINES.iter().collect(),
            };
            output::print_guidelines(&list, &output);
        }
    }
}
