//! Shared data models for scan output.
//!
//! `Issue` is the unit every analyzer emits; `ScanReport` bundles the sorted
//! issue list with a `Summary` for printers.

pub mod filter;
pub mod fix;

pub use filter::IssueFilter;
pub use fix::{FixAction, FixHost, FixSuggestion};

use crate::node::Node;
use crate::traversal;
use crate::wcag::Guideline;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How urgent an issue is. Declaration order is display and sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Warning, Severity::Info];

    /// Sort rank: critical=0, warning=1, info=2.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!(
                "unknown severity '{}' (expected critical|warning|info)",
                other
            )),
        }
    }
}

/// Category of an issue; one per analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueType {
    Contrast,
    TextSize,
    TouchTarget,
    AltText,
    ColorBlindness,
    Navigation,
}

impl IssueType {
    pub const ALL: [IssueType; 6] = [
        IssueType::Contrast,
        IssueType::TextSize,
        IssueType::TouchTarget,
        IssueType::AltText,
        IssueType::ColorBlindness,
        IssueType::Navigation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::Contrast => "contrast",
            IssueType::TextSize => "textSize",
            IssueType::TouchTarget => "touchTarget",
            IssueType::AltText => "altText",
            IssueType::ColorBlindness => "colorBlindness",
            IssueType::Navigation => "navigation",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        IssueType::ALL
            .into_iter()
            .find(|t| t.as_str().to_ascii_lowercase() == norm)
            .ok_or_else(|| format!("unknown issue type '{}'", s.trim()))
    }
}

/// Where an issue was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub node_id: String,
    pub node_name: String,
    pub node_path: String,
}

impl Location {
    pub fn of(node: &dyn Node) -> Self {
        Self {
            node_id: node.id().to_string(),
            node_name: node.label().to_string(),
            node_path: traversal::path(node),
        }
    }
}

/// A single accessibility finding.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IssueType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wcag_guideline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wcag_link: Option<String>,
    pub fix_suggestions: Vec<FixSuggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl Issue {
    /// New issue with a fresh random id.
    pub fn new(
        kind: IssueType,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            severity,
            title: title.into(),
            description: description.into(),
            location,
            current_value: None,
            required_value: None,
            wcag_guideline: None,
            wcag_link: None,
            fix_suggestions: Vec::new(),
            screenshot: None,
        }
    }

    pub fn with_values(mut self, current: impl Into<String>, required: impl Into<String>) -> Self {
        self.current_value = Some(current.into());
        self.required_value = Some(required.into());
        self
    }

    /// Cite a guideline from the WCAG table; unknown ids leave the citation empty.
    pub fn with_guideline(mut self, guideline: Option<&Guideline>) -> Self {
        if let Some(g) = guideline {
            self.wcag_guideline = Some(g.citation());
            self.wcag_link = Some(g.url.to_string());
        }
        self
    }

    pub fn with_fix(mut self, fix: FixSuggestion) -> Self {
        self.fix_suggestions.push(fix);
        self
    }
}

/// Issue counts by severity and type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub nodes: usize,
    pub by_type: BTreeMap<IssueType, usize>,
}

impl Summary {
    pub fn from_issues(issues: &[Issue], nodes: usize) -> Self {
        let mut s = Summary {
            nodes,
            by_type: IssueType::ALL.into_iter().map(|t| (t, 0)).collect(),
            ..Summary::default()
        };
        for is in issues {
            match is.severity {
                Severity::Critical => s.critical += 1,
                Severity::Warning => s.warning += 1,
                Severity::Info => s.info += 1,
            }
            *s.by_type.entry(is.kind).or_insert(0) += 1;
        }
        s
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info
    }
}

/// Scan results container.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub issues: Vec<Issue>,
    pub summary: Summary,
}

impl ScanReport {
    pub fn new(issues: Vec<Issue>, nodes: usize) -> Self {
        let summary = Summary::from_issues(&issues, nodes);
        Self { issues, summary }
    }

    pub fn has_critical(&self) -> bool {
        self.summary.critical > 0
    }
}


#[cfg(test)]
mod tests {
    use super::testing::issue;
    use super::*;
    use crate::wcag;

    #[test]
    fn test_severity_rank_and_parse() {
        assert_eq!(Severity::Critical.rank(), 0);
        assert_eq!(Severity::Warning.rank(), 1);
        assert_eq!(Severity::Info.rank(), 2);
        assert!(Severity::Critical < Severity::Info);
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_issue_type_parse_variants() {
        assert_eq!("textSize".parse::<IssueType>().unwrap(), IssueType::TextSize);
        assert_eq!("text-size".parse::<IssueType>().unwrap(), IssueType::TextSize);
        assert_eq!("ALT_TEXT".parse::<IssueType>().unwrap(), IssueType::AltText);
        assert!("layout".parse::<IssueType>().is_err());
    }

    #[test]
    fn test_issue_ids_are_unique() {
        let a = issue(IssueType::Contrast, Severity::Info, "n");
        let b = issue(IssueType::Contrast, Severity::Info, "n");
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_issue_json_shape() {
        let is = issue(IssueType::TouchTarget, Severity::Warning, "btn")
            .with_values("30x30px", "44x44px")
            .with_guideline(wcag::guideline(wcag::TARGET_SIZE));
        let v = serde_json::to_value(&is).unwrap();
        assert_eq!(v["type"], "touchTarget");
        assert_eq!(v["severity"], "warning");
        assert_eq!(v["location"]["nodeId"], "btn");
        assert_eq!(v["requiredValue"], "44x44px");
        assert_eq!(v["wcagGuideline"], "2.5.5 Target Size");
        assert!(v.get("screenshot").is_none());
    }

    #[test]
    fn test_summary_counts() {
        let issues = vec![
            issue(IssueType::Contrast, Severity::Critical, "a"),
            issue(IssueType::Contrast, Severity::Warning, "b"),
            issue(IssueType::AltText, Severity::Info, "c"),
        ];
        let r = ScanReport::new(issues, 7);
        assert_eq!(r.summary.critical, 1);
        assert_eq!(r.summary.warning, 1);
        assert_eq!(r.summary.info, 1);
        assert_eq!(r.summary.total(), 3);
        assert_eq!(r.summary.nodes, 7);
        assert_eq!(r.summary.by_type[&IssueType::Contrast], 2);
        assert_eq!(r.summary.by_type[&IssueType::Navigation], 0);
        assert!(r.has_critical());
    }
}
