//! Text contrast against the effective background (WCAG 1.4.3 / 1.4.6).

use super::{backdrop, excerpt, visible_scope, Analyzer};
use crate::color::{contrast_ratio, contrasting_shade, format_ratio, parse_color, shift_rgba, Rgba};
use crate::models::{FixAction, FixSuggestion, Issue, IssueType, Location, Severity};
use crate::node::{soft, Node, NodeRef};
use crate::wcag::{self, Level, BOLD_WEIGHT, LARGE_TEXT_PX};

/// Below `required * CRITICAL_FACTOR` a failure is critical rather than a warning.
const CRITICAL_FACTOR: f64 = 0.7;

#[derive(Debug, Clone, Copy, Default)]
pub struct ContrastAnalyzer {
    pub level: Level,
}

impl ContrastAnalyzer {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    fn check(&self, node: &dyn Node) -> Option<Issue> {
        let text = soft(node.text(), "text", node.id())?;
        if text.content.trim().is_empty() || text.font_size.is_nan() || text.font_size <= 0.0 {
            return None;
        }
        let bg = backdrop(node);
        let fg = text
            .color
            .as_deref()
            .map(parse_color)
            .unwrap_or(Rgba::BLACK)
            .over(&bg);
        let ratio = contrast_ratio(&fg, &bg);
        let bold = text.font_weight >= BOLD_WEIGHT;
        let required = wcag::required_contrast_ratio(text.font_size, bold, self.level);
        if ratio >= required {
            return None;
        }

        let severity = if ratio < required * CRITICAL_FACTOR {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let large = wcag::is_large_text(text.font_size, bold);
        let mut issue = Issue::new(
            IssueType::Contrast,
            severity,
            "Insufficient text contrast",
            format!(
                "Text \"{}\" ({} on {}) has a contrast ratio of {}; WCAG {} requires {} for {} text.",
                excerpt(&text.content),
                fg,
                bg,
                format_ratio(ratio),
                self.level,
                format_ratio(required),
                if large { "large" } else { "normal" }
            ),
            Location::of(node),
        )
        .with_values(format_ratio(ratio), format_ratio(required))
        .with_guideline(wcag::guideline(wcag::contrast_guideline(self.level)));

        for fix in suggest_fixes(node.id(), &fg, &bg, required) {
            issue = issue.with_fix(fix);
        }
        if !large {
            let large_required = wcag::required_contrast_ratio(LARGE_TEXT_PX, false, self.level);
            if ratio >= large_required {
                issue = issue.with_fix(FixSuggestion::action(
                    format!(
                        "Increase the font size to {}px so the {} large-text threshold applies",
                        LARGE_TEXT_PX,
                        format_ratio(large_required)
                    ),
                    FixAction::SetFontSize {
                        node_id: node.id().to_string(),
                        font_size: LARGE_TEXT_PX,
                    },
                ));
            }
        }
        Some(issue)
    }
}

/// Color changes that reach `required`: first a neutral gray, then the
/// current hue pushed toward black or white.
fn suggest_fixes(node_id: &str, fg: &Rgba, bg: &Rgba, required: f64) -> Vec<FixSuggestion> {
    let mut fixes = Vec::new();
    let gray = contrasting_shade(bg, required);
    if contrast_ratio(&gray, bg) >= required {
        fixes.push(FixSuggestion::action(
            format!(
                "Change the text color to {} ({})",
                gray,
                format_ratio(contrast_ratio(&gray, bg))
            ),
            FixAction::SetTextColor {
                node_id: node_id.to_string(),
                color: gray.to_hex(),
            },
        ));
    }

    let lighten = bg.luminance() <= 0.5;
    let shifted = (1..=10)
        .map(|step| shift_rgba(fg, step as f64 / 10.0, lighten))
        .find(|c| contrast_ratio(c, bg) >= required);
    if let Some(c) = shifted {
        if c != gray {
            fixes.push(FixSuggestion::action(
                format!(
                    "{} the current text color to {} ({})",
                    if lighten { "Lighten" } else { "Darken" },
                    c,
                    format_ratio(contrast_ratio(&c, bg))
                ),
                FixAction::SetTextColor {
                    node_id: node_id.to_string(),
                    color: c.to_hex(),
                },
            ));
        }
    }
    fixes
}

impl Analyzer for ContrastAnalyzer {
    fn name(&self) -> &'static str {
        "contrast"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Contrast
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
