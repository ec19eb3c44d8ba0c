//! Touch target size and spacing (WCAG 2.5.5).

use super::{bounds_of, group_by_parent, is_interactive, visible_scope, Analyzer};
use crate::models::{FixAction, FixSuggestion, Issue, IssueType, Location, Severity};
use crate::node::{Bounds, Node, NodeRef};
use crate::traversal;
use crate::wcag::{self, Platform};

/// Minimum clear space between adjacent targets, in px.
const MIN_SPACING: f64 = 8.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct TouchTargetAnalyzer {
    pub platform: Platform,
}

impl TouchTargetAnalyzer {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    fn check_size(&self, node: &dyn Node, b: &Bounds) -> Option<Issue> {
        let min = wcag::required_touch_target_size(self.platform);
        if b.width >= min && b.height >= min {
            return None;
        }
        let severity = if b.width < min / 2.0 || b.height < min / 2.0 {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let (w, h) = (b.width.max(min), b.height.max(min));
        Some(
            Issue::new(
                IssueType::TouchTarget,
                severity,
                "Touch target too small",
                format!(
                    "\"{}\" is {}; {} targets need at least {}.",
                    node.label(),
                    dims(b.width, b.height),
                    self.platform,
                    dims(min, min)
                ),
                Location::of(node),
            )
            .with_values(dims(b.width, b.height), dims(min, min))
            .with_guideline(wcag::guideline(wcag::TARGET_SIZE))
            .with_fix(FixSuggestion::action(
                format!("Resize to {}", dims(w, h)),
                FixAction::Resize {
                    node_id: node.id().to_string(),
                    width: w,
                    height: h,
                },
            ))
            .with_fix(FixSuggestion::advice(
                "Or keep the visual size and extend the hit area with padding",
            )),
        )
    }

    fn check_spacing(&self, targets: &[(NodeRef, Bounds)]) -> Vec<Issue> {
        let mut issues = Vec::new();
        for (j, (later, lb)) in targets.iter().enumerate() {
            for (earlier, eb) in &targets[..j] {
                let gap = eb.gap(lb);
                if gap <= 0.0 || gap >= MIN_SPACING {
                    continue;
                }
                issues.push(
                    Issue::new(
                        IssueType::TouchTarget,
                        Severity::Warning,
                        "Touch targets too close",
                        format!(
                            "\"{}\" sits {:.0}px from \"{}\"; keep at least {:.0}px between targets.",
                            later.label(),
                            gap,
                            earlier.label(),
                            MIN_SPACING
                        ),
                        Location::of(later.as_ref()),
                    )
                    .with_values(format!("{:.0}px", gap), format!("{:.0}px", MIN_SPACING))
                    .with_guideline(wcag::guideline(wcag::TARGET_SIZE))
                    .with_fix(FixSuggestion::advice(format!(
                        "Increase the spacing between \"{}\" and \"{}\"",
                        earlier.label(),
                        later.label()
                    ))),
                );
            }
        }
        issues
    }
}

fn dims(w: f64, h: f64) -> String {
    format!("{:.0}x{:.0}px", w, h)
}

/// A control nested in another control shares its parent's hit area.
fn inside_control(node: &dyn Node) -> bool {
    traversal::ancestors(node)
        .iter()
        .any(|a| is_interactive(a.as_ref()))
}

impl Analyzer for TouchTargetAnalyzer {
    fn name(&self) -> &'static str {
        "touch-target"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::TouchTarget
    }

    fn analyze(&self, nodes: &[NodeRef]) -> Vec<Issue> {
        let targets: Vec<NodeRef> = visible_scope(nodes)
            .into_iter()
            .filter(|n| is_interactive(n.as_ref()) && !inside_control(n.as_ref()))
            .collect();

        let mut issues = Vec::new();
        for (_, siblings) in group_by_parent(&targets) {
            let sized: Vec<(NodeRef, Bounds)> = siblings
                .into_iter()
                .filter_map(|n| {
                    let b = bounds_of(n.as_ref())?;
                    (b.width > 0.0 || b.height > 0.0).then_some((n, b))
                })
                .collect();
            issues.extend(
                sized
                    .iter()
                    .filter_map(|(n, b)| self.check_size(n.as_ref(), b)),
            );
            issues.extend(self.check_spacing(&sized));
        }
        tracing::debug!(analyzer = self.name(), issues = issues.len(), "analyzer finished");
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_small_tappable_node_flagged() {
        let d = Document::from_json(
            r#"{ "id": "page", "width": 390, "height": 844, "children": [
                { "id": "cta", "name": "Buy", "onTap": true, "width": 30, "height": 30 }
            ]}"#,
        )
        .unwrap();
        let issues = TouchTargetAnalyzer::default().analyze(d.roots());
        assert_eq!(issues.len(), 1);
        let is = &issues[0];
        assert_eq!(is.kind, IssueType::TouchTarget);
        assert_eq!(is.severity, Severity::Warning);
        assert_eq!(is.location.node_id, "cta");
        assert_eq!(is.current_value.as_deref(), Some("30x30px"));
        assert_eq!(is.required_value.as_deref(), Some("44x44px"));
        assert_eq!(
            is.fix_suggestions[0].action,
            Some(FixAction::Resize {
                node_id: "cta".into(),
                width: 44.0,
                height: 44.0
            })
        );
    }

    #[test]
    fn test_thresholds_by_platform_and_margin() {
        let d = Document::from_json(
            r#"{ "id": "page", "children": [
                { "id": "a", "name": "Close icon", "width": 20, "height": 44 },
                { "id": "b", "name": "Next button", "x": 200, "width": 46, "height": 46 }
            ]}"#,
        )
        .unwrap();
        let web = TouchTargetAnalyzer::default().analyze(d.roots());
        assert_eq!(web.len(), 1);
        assert_eq!(web[0].location.node_id, "a");
        assert_eq!(web[0].severity, Severity::Critical);

        let android = TouchTargetAnalyzer::new(Platform::Android).analyze(d.roots());
        assert_eq!(android.len(), 2);
    }

    #[test]
    fn test_crowded_siblings_flagged_once_on_later() {
        let d = Document::from_json(
            r#"{ "id": "bar", "children": [
                { "id": "one", "name": "Tab 1", "x": 0, "width": 48, "height": 48 },
                { "id": "two", "name": "Tab 2", "x": 52, "width": 48, "height": 48 },
                { "id": "three", "name": "Tab 3", "x": 120, "width": 48, "height": 48 }
            ]}"#,
        )
        .unwrap();
        let issues = TouchTargetAnalyzer::default().analyze(d.roots());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location.node_id, "two");
        assert_eq!(issues[0].current_value.as_deref(), Some("4px"));
    }

    #[test]
    fn test_non_interactive_and_nested_ignored() {
        let d = Document::from_json(
            r#"{ "id": "page", "children": [
                { "id": "dot", "name": "Decoration", "width": 4, "height": 4 },
                { "id": "btn", "name": "Submit button", "width": 120, "height": 48, "children": [
                    { "id": "glyph", "name": "Arrow icon", "width": 16, "height": 16 }
                ]},
                { "id": "ghost", "name": "Hidden link", "visible": false, "width": 10, "height": 10 }
            ]}"#,
        )
        .unwrap();
        assert!(TouchTargetAnalyzer::default().analyze(d.roots()).is_empty());
    }
}
