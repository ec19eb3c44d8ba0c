//! Configuration discovery and effective settings resolution.
//!
//! hueaudit reads `hueaudit.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `output`: `human`
//! - `level`: `AA`
//! - `platform`: `web`
//! - `color_blindness`: true
//! - `timeout_secs`: none
//! - `[filter] severity|types`: empty (everything)
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{AuditError, Result};
use crate::models::IssueFilter;
use crate::scanner::ScanOptions;
use crate::wcag::{Level, Platform};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_NAMES: [&str; 3] = ["hueaudit.toml", "hueaudit.yaml", "hueaudit.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Result filter section under `[filter]`.
pub struct FilterCfg {
    #[serde(default)]
    pub severity: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `hueaudit.toml|yaml`.
pub struct HueauditConfig {
    pub output: Option<String>,
    pub level: Option<String>,
    pub platform: Option<String>,
    pub color_blindness: Option<bool>,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub filter: Option<FilterCfg>,
}

/// Values given on the command line; `None`/empty means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub repo_root: Option<String>,
    pub output: Option<String>,
    pub level: Option<String>,
    pub platform: Option<String>,
    pub no_color_blindness: bool,
    pub severity: Vec<String>,
    pub types: Vec<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    /// Path of the config file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    pub output: String,
    pub level: Level,
    pub platform: Platform,
    pub color_blindness: bool,
    pub timeout: Option<Duration>,
    pub filter: IssueFilter,
}

impl Effective {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include_color_blindness: self.color_blindness,
            level: self.level,
            platform: self.platform,
        }
    }
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `hueaudit.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load the config file under `root`, if one exists. A file that exists but
/// cannot be read or parsed is an error.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, HueauditConfig)>> {
    for name in CONFIG_NAMES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|source| AuditError::Io {
            path: path.clone(),
            source,
        })?;
        let cfg: HueauditConfig = if name.ends_with(".toml") {
            toml::from_str(&s)
                .map_err(|e| AuditError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            serde_yaml::from_str(&s)
                .map_err(|e| AuditError::Config(format!("{}: {}", path.display(), e)))?
        };
        return Ok(Some((path, cfg)));
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &CliOverrides) -> Result<Effective> {
    let start = PathBuf::from(cli.repo_root.as_deref().unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let (config_path, cfg) = match load_config(&repo_root)? {
        Some((p, c)) => (Some(p), c),
        None => (None, HueauditConfig::default()),
    };

    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    if output != "human" && output != "json" {
        return Err(AuditError::Config(format!(
            "unknown output '{}' (expected human|json)",
            output
        )));
    }

    let level = match cli.level.as_deref().or(cfg.level.as_deref()) {
        Some(s) => s.parse::<Level>().map_err(AuditError::Config)?,
        None => Level::default(),
    };
    let platform = match cli.platform.as_deref().or(cfg.platform.as_deref()) {
        Some(s) => s.parse::<Platform>().map_err(AuditError::Config)?,
        None => Platform::default(),
    };

    let color_blindness = if cli.no_color_blindness {
        false
    } else {
        cfg.color_blindness.unwrap_or(true)
    };

    let timeout = cli
        .timeout_secs
        .or(cfg.timeout_secs)
        .filter(|s| *s > 0)
        .map(Duration::from_secs);

    // CLI filter lists replace the config lists per dimension
    let cfg_filter = cfg.filter.unwrap_or_default();
    let severity = if cli.severity.is_empty() {
        cfg_filter.severity
    } else {
        cli.severity.clone()
    };
    let types = if cli.types.is_empty() {
        cfg_filter.types
    } else {
        cli.types.clone()
    };
    let filter = IssueFilter::parse(&severity, &types).map_err(AuditError::Config)?;

    Ok(Effective {
        repo_root,
        config_path,
        output,
        level,
        platform,
        color_blindness,
        timeout,
        filter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueType, Severity};
    use std::io::Write;
    use tempfile::tempdir;

    fn overrides(root: &Path) -> CliOverrides {
        CliOverrides {
            repo_root: root.to_str().map(String::from),
            ..CliOverrides::default()
        }
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("hueaudit.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"
level = "AAA"
platform = "android"
color_blindness = false
timeout_secs = 5
[filter]
severity = ["critical", "warning"]
types = ["contrast"]
    "#
        )
        .unwrap();

        // Resolve using explicit repo_root to avoid global CWD races
        let eff = resolve_effective(&overrides(root)).unwrap();
        assert_eq!(eff.output, "json");
        assert_eq!(eff.level, Level::AAA);
        assert_eq!(eff.platform, Platform::Android);
        assert!(!eff.color_blindness);
        assert_eq!(eff.timeout, Some(Duration::from_secs(5)));
        assert!(eff.filter.severities.contains(&Severity::Warning));
        assert!(eff.filter.types.contains(&IssueType::Contrast));
        assert_eq!(eff.config_path, Some(root.join("hueaudit.toml")));
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("hueaudit.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
platform: ios
            "#
        )
        .unwrap();

        let eff = resolve_effective(&overrides(root)).unwrap();
        assert_eq!(eff.platform, Platform::Ios);
        assert_eq!(eff.output, "human");
        assert_eq!(eff.level, Level::AA);
        assert!(eff.color_blindness);
        assert!(eff.timeout.is_none());
        assert!(eff.filter.is_empty());
        assert_eq!(eff.scan_options().platform, Platform::Ios);
    }

    #[test]
    fn test_cli_takes_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("hueaudit.toml"),
            "level = \"AAA\"\noutput = \"json\"\n[filter]\ntypes = [\"contrast\"]\n",
        )
        .unwrap();
        let cli = CliOverrides {
            level: Some("A".into()),
            output: Some("human".into()),
            types: vec!["alt-text".into()],
            no_color_blindness: true,
            ..overrides(root)
        };
        let eff = resolve_effective(&cli).unwrap();
        assert_eq!(eff.level, Level::A);
        assert_eq!(eff.output, "human");
        assert!(eff.filter.types.contains(&IssueType::AltText));
        assert!(!eff.filter.types.contains(&IssueType::Contrast));
        assert!(!eff.scan_options().include_color_blindness);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("hueaudit.toml"), "platform = \"tv\"\n").unwrap();
        assert!(matches!(
            resolve_effective(&overrides(root)),
            Err(AuditError::Config(_))
        ));

        fs::write(root.join("hueaudit.toml"), "level = [1, 2\n").unwrap();
        assert!(resolve_effective(&overrides(root)).is_err());

        fs::remove_file(root.join("hueaudit.toml")).unwrap();
        let cli = CliOverrides {
            output: Some("xml".into()),
            ..overrides(root)
        };
        assert!(resolve_effective(&cli).is_err());
    }

    #[test]
    fn test_detect_walks_up_to_git() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        let nested = root.join("designs/mobile");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(detect_repo_root(&nested), root.to_path_buf());
    }
}
