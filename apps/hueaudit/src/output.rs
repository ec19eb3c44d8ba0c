//! Output rendering for scan, contrast, simulate, and guidelines commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-document issue lists and a top-level summary.

use crate::color::{contrast_ratio, format_ratio, simulate_rgba, Dichromacy, Rgba};
use crate::models::{Issue, ScanReport, Severity, Summary};
use crate::wcag::{self, Guideline, Level};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

/// Scan results for one input document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// Display path of the document.
    pub file: String,
    pub report: ScanReport,
}

fn use_colors(output: &str) -> bool {
    output != "json" && crate::utils::colors_enabled()
}

fn print_json(v: &JsonVal) {
    match serde_json::to_string_pretty(v) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
    }
}

fn severity_tag(sev: Severity, color: bool) -> (String, String) {
    let (tag, icon) = match sev {
        Severity::Critical => ("⟦critical⟧", "✖"),
        Severity::Warning => ("⟦warn⟧", "▲"),
        Severity::Info => ("⟦info⟧", "◆"),
    };
    if !color {
        return (tag.to_string(), icon.to_string());
    }
    match sev {
        Severity::Critical => (tag.red().bold().to_string(), icon.red().to_string()),
        Severity::Warning => (tag.yellow().bold().to_string(), icon.yellow().to_string()),
        Severity::Info => (tag.blue().bold().to_string(), icon.blue().to_string()),
    }
}

/// One human-readable line (plus optional hint line) for an issue.
fn render_issue(file: &str, is: &Issue, color: bool) -> String {
    let (sev, icon) = severity_tag(is.severity, color);
    let location = format!("{}:{}", file, is.location.node_path);
    let location = if color {
        location.bold().to_string()
    } else {
        location
    };
    let mut line = format!("{} {} {} ❲{}❳ — {}", icon, sev, location, is.kind, is.title);
    if let (Some(cur), Some(req)) = (&is.current_value, &is.required_value) {
        line.push_str(&format!(" (current: {}, required: {})", cur, req));
    }
    if let Some(g) = &is.wcag_guideline {
        line.push_str(&format!(" [WCAG {}]", g));
    }
    if let Some(fix) = is.fix_suggestions.first() {
        let hint = format!("    ↳ {}", fix.description);
        line.push('\n');
        if color {
            line.push_str(&hint.bright_black().to_string());
        } else {
            line.push_str(&hint);
        }
    }
    line
}

/// Totals across documents.
pub fn aggregate_summary(results: &[DocumentReport]) -> Summary {
    let mut total = Summary::from_issues(&[], 0);
    for r in results {
        let s = &r.report.summary;
        total.critical += s.critical;
        total.warning += s.warning;
        total.info += s.info;
        total.nodes += s.nodes;
        for (k, v) in &s.by_type {
            *total.by_type.entry(*k).or_insert(0) += v;
        }
    }
    total
}

/// Print scan results in the requested format.
pub fn print_scan(results: &[DocumentReport], output: &str) {
    match output {
        "json" => print_json(&compose_scan_json(results)),
        _ => {
            let color = use_colors(output);
            for r in results {
                for is in &r.report.issues {
                    println!("{}", render_issue(&r.file, is, color));
                }
            }
            let s = aggregate_summary(results);
            let summary = format!(
                "— Summary — critical={} warnings={} infos={} nodes={} files={}",
                s.critical,
                s.warning,
                s.info,
                s.nodes,
                results.len()
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose scan JSON object (pure) for testing/snapshot purposes.
pub fn compose_scan_json(results: &[DocumentReport]) -> JsonVal {
    let documents: Vec<JsonVal> = results
        .iter()
        .map(|r| {
            json!({
                "file": r.file,
                "issues": r.report.issues,
                "summary": r.report.summary,
            })
        })
        .collect();
    let mut summary = serde_json::to_value(aggregate_summary(results)).unwrap_or(JsonVal::Null);
    if let JsonVal::Object(map) = &mut summary {
        map.insert("files".into(), json!(results.len()));
    }
    json!({ "documents": documents, "summary": summary })
}

/// Compose the contrast check for a color pair.
pub fn compose_contrast_json(
    fg: &Rgba,
    bg: &Rgba,
    font_size: f64,
    bold: bool,
    level: Level,
) -> JsonVal {
    let fg_eff = fg.over(bg);
    let ratio = contrast_ratio(&fg_eff, bg);
    let required = wcag::required_contrast_ratio(font_size, bold, level);
    json!({
        "foreground": fg.to_hex(),
        "background": bg.to_hex(),
        "ratio": format_ratio(ratio),
        "required": format_ratio(required),
        "level": level.as_str(),
        "largeText": wcag::is_large_text(font_size, bold),
        "passes": ratio >= required,
    })
}

pub fn print_contrast(fg: &Rgba, bg: &Rgba, font_size: f64, bold: bool, level: Level, output: &str) {
    let v = compose_contrast_json(fg, bg, font_size, bold, level);
    if output == "json" {
        print_json(&v);
        return;
    }
    let color = use_colors(output);
    let passes = v["passes"].as_bool().unwrap_or(false);
    let verdict = match (passes, color) {
        (true, true) => "pass".green().bold().to_string(),
        (true, false) => "pass".to_string(),
        (false, true) => "fail".red().bold().to_string(),
        (false, false) => "fail".to_string(),
    };
    println!(
        "{} on {}: {} (WCAG {} requires {} for {} text) {}",
        fg,
        bg,
        v["ratio"].as_str().unwrap_or_default(),
        level,
        v["required"].as_str().unwrap_or_default(),
        if v["largeText"].as_bool().unwrap_or(false) {
            "large"
        } else {
            "normal"
        },
        verdict
    );
}

/// Compose the dichromacy simulations for a color.
pub fn compose_simulate_json(color: &Rgba) -> JsonVal {
    let mut out = serde_json::Map::new();
    out.insert("input".into(), json!(color.to_css()));
    for kind in Dichromacy::ALL {
        out.insert(kind.as_str().into(), json!(simulate_rgba(color, kind).to_css()));
    }
    JsonVal::Object(out)
}

pub fn print_simulate(color: &Rgba, output: &str) {
    if output == "json" {
        print_json(&compose_simulate_json(color));
        return;
    }
    println!("{:<13} {}", "input", color.to_css());
    for kind in Dichromacy::ALL {
        let sim = simulate_rgba(color, kind);
        println!("{:<13} {} ({})", kind.as_str(), sim.to_css(), sim.to_hex());
    }
}

pub fn print_guidelines(list: &[&Guideline], output: &str) {
    if output == "json" {
        print_json(&json!(list));
        return;
    }
    let color = use_colors(output);
    for g in list {
        let head = format!("{} {} ({})", g.id, g.name, g.level);
        if color {
            println!("{}", head.bold());
        } else {
            println!("{}", head);
        }
        println!("    {}", g.summary);
        println!("    {}", g.url);
    }
}
