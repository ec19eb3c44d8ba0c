//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hueaudit",
    version,
    about = "hueaudit — accessibility audits for design documents",
    long_about = "hueaudit — checks design document trees for WCAG problems: text contrast, text size, touch targets, alt text, color-only information, and navigation structure.\n\nConfiguration precedence: CLI > hueaudit.toml > defaults.",
    after_help = "Examples:\n  hueaudit scan 'designs/**/*.json'\n  hueaudit scan home.json --level AAA --output json\n  hueaudit contrast '#767676' '#ffffff'\n  hueaudit simulate '#ff0000'\n  hueaudit guidelines --level AA",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current hueaudit version.")]
    Version,
    /// Scan design documents
    #[command(
        about = "Scan design documents",
        long_about = "Run every analyzer over the JSON design documents matched by the given glob patterns. Exits 1 when any critical issue is found.",
        after_help = "Examples:\n  hueaudit scan 'designs/*.json'\n  hueaudit scan app.json --severity critical,warning --type contrast,touch-target"
    )]
    Scan {
        #[arg(required = true, help = "Glob patterns of design documents (relative to the repo root)")]
        patterns: Vec<String>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "WCAG level: A|AA|AAA (default: AA)")]
        level: Option<String>,
        #[arg(long, help = "Target platform: web|ios|android|windows (default: web)")]
        platform: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip the color-blindness analyzer")]
        no_color_blindness: bool,
        #[arg(long, value_delimiter = ',', help = "Only report these severities (critical,warning,info)")]
        severity: Vec<String>,
        #[arg(long = "type", value_delimiter = ',', help = "Only report these issue types (e.g. contrast,alt-text)")]
        types: Vec<String>,
        #[arg(long, help = "Give up on a document after this many seconds")]
        timeout_secs: Option<u64>,
        #[arg(long, short, action = clap::ArgAction::SetTrue, help = "Log analyzer activity to stderr")]
        verbose: bool,
    },
    /// Check one color pair
    #[command(
        about = "Check contrast of a color pair",
        long_about = "Compute the WCAG contrast ratio of a foreground over a background and compare it with the required minimum.",
        after_help = "Examples:\n  hueaudit contrast '#999999' '#ffffff'\n  hueaudit contrast 'rgb(0, 0, 0)' '#ffcc00' --size 24 --bold"
    )]
    Contrast {
        #[arg(help = "Foreground color (#rgb, #rrggbb, #rrggbbaa, rgb(), rgba())")]
        foreground: String,
        #[arg(help = "Background color")]
        background: String,
        #[arg(long, default_value_t = 16.0, help = "Font size in px")]
        size: f64,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Text is bold (weight >= 700)")]
        bold: bool,
        #[arg(long, help = "WCAG level: A|AA|AAA (default: AA)")]
        level: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Simulate color vision deficiencies
    #[command(
        about = "Simulate color blindness",
        long_about = "Show how a color appears with protanopia, deuteranopia, and tritanopia."
    )]
    Simulate {
        #[arg(help = "Color to simulate")]
        color: String,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// List WCAG criteria
    #[command(
        about = "List WCAG guidelines",
        long_about = "List the WCAG success criteria hueaudit cites, optionally limited to those required at a level."
    )]
    Guidelines {
        #[arg(long, help = "Only criteria required at this level: A|AA|AAA")]
        level: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_flags() {
        let cli = Cli::try_parse_from([
            "hueaudit",
            "scan",
            "a.json",
            "designs/*.json",
            "--severity",
            "critical,warning",
            "--type",
            "contrast",
            "--no-color-blindness",
            "--timeout-secs",
            "3",
        ])
        .unwrap();
        match cli.cmd {
            Commands::Scan {
                patterns,
                severity,
                types,
                no_color_blindness,
                timeout_secs,
                ..
            } => {
                assert_eq!(patterns, vec!["a.json", "designs/*.json"]);
                assert_eq!(severity, vec!["critical", "warning"]);
                assert_eq!(types, vec!["contrast"]);
                assert!(no_color_blindness);
                assert_eq!(timeout_secs, Some(3));
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_requires_pattern() {
        assert!(Cli::try_parse_from(["hueaudit", "scan"]).is_err());
    }

    #[test]
    fn test_contrast_examples_use_parseable_colors() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let help = cmd
            .find_subcommand("contrast")
            .and_then(|c| c.get_after_help())
            .unwrap()
            .to_string();
        let mut seen = 0;
        for line in help.lines().filter(|l| l.trim_start().starts_with("hueaudit contrast")) {
            let quoted: Vec<&str> = line.split('\'').skip(1).step_by(2).collect();
            assert_eq!(quoted.len(), 2, "{}", line);
            for c in quoted {
                assert!(crate::color::try_parse_color(c).is_some(), "{}", c);
                seen += 1;
            }
        }
        assert_eq!(seen, 4);
    }

    #[test]
    fn test_parse_contrast_defaults() {
        let cli = Cli::try_parse_from(["hueaudit", "contrast", "#000", "#fff"]).unwrap();
        match cli.cmd {
            Commands::Contrast { size, bold, .. } => {
                assert_eq!(size, 16.0);
                assert!(!bold);
            }
            _ => panic!("expected contrast"),
        }
    }
}
