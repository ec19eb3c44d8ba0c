//! Severity/type filtering of scan results.

use super::{Issue, IssueType, Severity};
use std::collections::HashSet;

/// Keeps issues whose severity and type are selected. An empty set selects
/// everything for that dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub severities: HashSet<Severity>,
    pub types: HashSet<IssueType>,
}

impl IssueFilter {
    /// Build from string tokens (as given on the CLI or in config).
    pub fn parse<S: AsRef<str>>(severities: &[S], types: &[S]) -> Result<Self, String> {
        Ok(Self {
            severities: severities
                .iter()
                .map(|s| s.as_ref().parse())
                .collect::<Result<_, _>>()?,
            types: types
                .iter()
                .map(|s| s.as_ref().parse())
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.severities.is_empty() && self.types.is_empty()
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        (self.severities.is_empty() || self.severities.contains(&issue.severity))
            && (self.types.is_empty() || self.types.contains(&issue.kind))
    }

    /// Retain matching issues, preserving order.
    pub fn apply(&self, issues: Vec<Issue>) -> Vec<Issue> {
        if self.is_empty() {
            return issues;
        }
        issues.into_iter().filter(|i| self.matches(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::issue;

    #[test]
    fn test_filter_by_severity_and_type() {
        let issues = vec![
            issue(IssueType::Contrast, Severity::Critical, "a"),
            issue(IssueType::AltText, Severity::Critical, "b"),
            issue(IssueType::Contrast, Severity::Info, "c"),
        ];
        let f = IssueFilter::parse(&["critical"], &["contrast"]).unwrap();
        let kept = f.apply(issues.clone());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].location.node_id, "a");

        let all = IssueFilter::default().apply(issues);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        assert!(IssueFilter::parse(&["severe"], &[]).is_err());
        assert!(IssueFilter::parse::<&str>(&[], &["spacing"]).is_err());
    }
}
