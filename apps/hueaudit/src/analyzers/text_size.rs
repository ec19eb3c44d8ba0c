//! Minimum legible text size per platform.

use super::{excerpt, visible_scope, Analyzer};
use crate::models::{FixAction, FixSuggestion, Issue, IssueType, Location, Severity};
use crate::node::{soft, Node, NodeRef};
use crate::wcag::{self, Platform};

/// Text at least this long is treated as body copy.
const LONG_FORM_CHARS: usize = 120;
const BODY_TEXT_PX: f64 = 16.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextSizeAnalyzer {
    pub platform: Platform,
}

impl TextSizeAnalyzer {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    fn check(&self, node: &dyn Node) -> Option<Issue> {
        let text = soft(node.text(), "text", node.id())?;
        let size = text.font_size;
        if text.content.trim().is_empty() || size.is_nan() || size <= 0.0 {
            return None;
        }
        let minimum = wcag::minimum_text_size(self.platform);

        if size < minimum {
            let severity = if size < minimum * 0.75 {
                Severity::Critical
            } else {
                Severity::Warning
            };
            let issue = Issue::new(
                IssueType::TextSize,
                severity,
                "Text too small",
                format!(
                    "Text \"{}\" is {}px; {} needs at least {}px to stay legible.",
                    excerpt(&text.content),
                    px(size),
                    self.platform,
                    px(minimum)
                ),
                Location::of(node),
            )
            .with_values(format!("{}px", px(size)), format!("{}px", px(minimum)))
            .with_guideline(wcag::guideline(wcag::RESIZE_TEXT))
            .with_fix(FixSuggestion::action(
                format!("Increase the font size to {}px", px(minimum)),
                FixAction::SetFontSize {
                    node_id: node.id().to_string(),
                    font_size: minimum,
                },
            ));
            return Some(issue);
        }

        let len = text.content.trim().chars().count();
        if len >= LONG_FORM_CHARS && size < BODY_TEXT_PX {
            return Some(
                Issue::new(
                    IssueType::TextSize,
                    Severity::Info,
                    "Small body text",
                    format!(
                        "A {}-character block is set at {}px; long passages read better at {}px or more.",
                        len,
                        px(size),
                        px(BODY_TEXT_PX)
                    ),
                    Location::of(node),
                )
                .with_values(format!("{}px", px(size)), format!("{}px", px(BODY_TEXT_PX)))
                .with_guideline(wcag::guideline(wcag::VISUAL_PRESENTATION))
                .with_fix(FixSuggestion::action(
                    format!("Use {}px for body copy", px(BODY_TEXT_PX)),
                    FixAction::SetFontSize {
                        node_id: node.id().to_string(),
                        font_size: BODY_TEXT_PX,
                    },
                )),
            );
        }
        None
    }
}

/// `12` for whole sizes, `10.5` otherwise.
fn px(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.1}", v)
    }
}

impl Analyzer for TextSizeAnalyzer {
    fn name(&self) -> &'static str {
        "text-size"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::TextSize
    }

    fn analyze(&self, nodes: &[NodeRef]) -> Vec<Issue> {
        let issues: Vec<Issue> = visible_scope(nodes)
            .iter()
            .filter_map(|n| self.check(n.as_ref()))
            .collect();
        tracing::debug!(analyzer = self.name(), issues = issues.len(), "analyzer finished");
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn doc(size: f64, content: &str) -> Document {
        Document::from_json(&format!(
            r#"{{ "id": "page", "children": [
                {{ "id": "t", "text": {{ "content": "{}", "fontSize": {} }} }}
            ]}}"#,
            content, size
        ))
        .unwrap()
    }

    #[test]
    fn test_severity_scales_with_shortfall() {
        let a = TextSizeAnalyzer::default();
        assert!(a.analyze(doc(12.0, "Caption").roots()).is_empty());

        let warn = a.analyze(doc(10.0, "Caption").roots());
        assert_eq!(warn.len(), 1);
        assert_eq!(warn[0].severity, Severity::Warning);
        assert_eq!(warn[0].current_value.as_deref(), Some("10px"));
        assert_eq!(warn[0].required_value.as_deref(), Some("12px"));

        let crit = a.analyze(doc(8.0, "Caption").roots());
        assert_eq!(crit[0].severity, Severity::Critical);
        assert_eq!(
            crit[0].fix_suggestions[0].action,
            Some(FixAction::SetFontSize {
                node_id: "t".into(),
                font_size: 12.0
            })
        );
    }

    #[test]
    fn test_platform_minimum() {
        let d = doc(11.0, "Caption");
        assert!(TextSizeAnalyzer::new(Platform::Ios).analyze(d.roots()).is_empty());
        assert_eq!(TextSizeAnalyzer::new(Platform::Android).analyze(d.roots()).len(), 1);
    }

    #[test]
    fn test_long_form_small_text_is_info() {
        let body = "lorem ipsum ".repeat(12);
        let issues = TextSizeAnalyzer::default().analyze(doc(13.5, &body).roots());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(issues[0].current_value.as_deref(), Some("13.5px"));
        assert!(TextSizeAnalyzer::default()
            .analyze(doc(16.0, &body).roots())
            .is_empty());
    }

    #[test]
    fn test_zero_size_ignored() {
        assert!(TextSizeAnalyzer::default()
            .analyze(doc(0.0, "x").roots())
            .is_empty());
    }
}
