//! Alternative text on images (WCAG 1.1.1).

use super::{excerpt, has_default_name, visible_scope, Analyzer};
use crate::models::{FixAction, FixSuggestion, Issue, IssueType, Location, Severity};
use crate::node::{soft, ImageAttrs, Node, NodeKind, NodeRef};
use crate::wcag;
use once_cell::sync::Lazy;
use regex::Regex;

/// Alt text longer than this belongs in a caption or long description.
const MAX_ALT_CHARS: usize = 150;

static DECORATIVE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(decor(ative)?|divider|separator|spacer|background|bg|ornament|pattern|texture|shadow|flourish)\b")
        .expect("static decorative pattern")
});

static REDUNDANT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(an?\s+)?(image|picture|photo|photograph|graphic|icon)\s+(of|showing)\s+")
        .expect("static redundant-prefix pattern")
});

static FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\w\-. ]+\.(png|jpe?g|gif|svg|webp|avif|bmp|tiff?)$")
        .expect("static file-name pattern")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageAccessibilityAnalyzer;

impl ImageAccessibilityAnalyzer {
    fn check(&self, node: &dyn Node) -> Option<Issue> {
        let attrs = match soft(node.image(), "image", node.id()) {
            Some(a) => a,
            None if node.kind() == NodeKind::Image => ImageAttrs::default(),
            None => return None,
        };
        let alt = attrs.alt.as_deref().map(str::trim).unwrap_or("");
        let decorative =
            attrs.decorative || node.name().is_some_and(|n| DECORATIVE_NAME.is_match(n));

        if decorative {
            if alt.is_empty() {
                return None;
            }
            return Some(
                issue(
                    node,
                    Severity::Info,
                    "Decorative image has alt text",
                    format!(
                        "\"{}\" looks decorative but announces \"{}\"; screen readers should skip it.",
                        node.label(),
                        excerpt(alt)
                    ),
                )
                .with_fix(FixSuggestion::action(
                    "Clear the alt text so assistive technology ignores the image",
                    FixAction::ClearAltText {
                        node_id: node.id().to_string(),
                    },
                )),
            );
        }

        if alt.is_empty() {
            let mut is = issue(
                node,
                Severity::Critical,
                "Image missing alt text",
                format!(
                    "\"{}\" has no text alternative; screen reader users get no information from it.",
                    node.label()
                ),
            );
            if let Some(guess) = suggested_alt(node) {
                is = is.with_fix(FixSuggestion::action(
                    format!("Add alt text, e.g. \"{}\"", guess),
                    FixAction::SetAltText {
                        node_id: node.id().to_string(),
                        alt: guess,
                    },
                ));
            } else {
                is = is.with_fix(FixSuggestion::advice(
                    "Add alt text describing what the image conveys",
                ));
            }
            return Some(is.with_fix(FixSuggestion::advice(
                "If the image is purely decorative, mark it decorative instead",
            )));
        }

        if let Some(m) = REDUNDANT_PREFIX.find(alt) {
            let rest = alt[m.end()..].trim();
            let mut is = issue(
                node,
                Severity::Info,
                "Redundant alt text",
                format!(
                    "Alt text \"{}\" starts with \"{}\"; screen readers already announce images.",
                    excerpt(alt),
                    m.as_str().trim()
                ),
            );
            if !rest.is_empty() {
                is = is.with_fix(FixSuggestion::action(
                    format!("Shorten to \"{}\"", excerpt(rest)),
                    FixAction::SetAltText {
                        node_id: node.id().to_string(),
                        alt: capitalize(rest),
                    },
                ));
            }
            return Some(is);
        }

        if is_file_name(alt, attrs.src.as_deref()) {
            return Some(
                issue(
                    node,
                    Severity::Info,
                    "Alt text is a file name",
                    format!("Alt text \"{}\" is a file name, not a description.", excerpt(alt)),
                )
                .with_fix(FixSuggestion::advice(
                    "Replace the file name with a description of the image",
                )),
            );
        }

        let len = alt.chars().count();
        if len > MAX_ALT_CHARS {
            return Some(
                issue(
                    node,
                    Severity::Info,
                    "Alt text too long",
                    format!(
                        "Alt text is {} characters; keep it under {} and move detail to a caption.",
                        len, MAX_ALT_CHARS
                    ),
                )
                .with_values(format!("{} chars", len), format!("<= {} chars", MAX_ALT_CHARS))
                .with_fix(FixSuggestion::advice(
                    "Summarize the image and put the full description in visible text",
                )),
            );
        }
        None
    }
}

fn issue(node: &dyn Node, severity: Severity, title: &str, description: String) -> Issue {
    Issue::new(
        IssueType::AltText,
        severity,
        title,
        description,
        Location::of(node),
    )
    .with_guideline(wcag::guideline(wcag::NON_TEXT_CONTENT))
}

fn is_file_name(alt: &str, src: Option<&str>) -> bool {
    if FILE_NAME.is_match(alt) {
        return true;
    }
    src.and_then(|s| s.rsplit(['/', '\\']).next())
        .is_some_and(|base| !base.is_empty() && base.eq_ignore_ascii_case(alt))
}

/// Alt text guessed from a meaningful layer name.
fn suggested_alt(node: &dyn Node) -> Option<String> {
    if has_default_name(node) {
        return None;
    }
    let name = node.name()?.trim();
    let cleaned = name.replace(['_', '-'], " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    (!cleaned.is_empty()).then(|| capitalize(&cleaned))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Analyzer for ImageAccessibilityAnalyzer {
    fn name(&self) -> &'static str {
        "image"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::AltText
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

    fn run(json: &str) -> Vec<Issue> {
        let d = Document::from_json(json).unwrap();
        ImageAccessibilityAnalyzer.analyze(d.roots())
    }

    #[test]
    fn test_missing_alt_is_critical() {
        let issues = run(
            r#"{ "id": "page", "children": [
                { "id": "hero", "name": "team_photo", "type": "image", "image": { "src": "team.jpg" } }
            ]}"#,
        );
        assert_eq!(issues.len(), 1);
        let is = &issues[0];
        assert_eq!(is.kind, IssueType::AltText);
        assert_eq!(is.severity, Severity::Critical);
        assert_eq!(is.location.node_id, "hero");
        assert_eq!(is.wcag_guideline.as_deref(), Some("1.1.1 Non-text Content"));
        assert_eq!(
            is.fix_suggestions[0].action,
            Some(FixAction::SetAltText {
                node_id: "hero".into(),
                alt: "Team photo".into()
            })
        );
    }

    #[test]
    fn test_image_kind_without_attrs_and_default_name() {
        let issues = run(r#"{ "id": "page", "children": [{ "id": "i", "name": "Image 3", "type": "image" }] }"#);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].fix_suggestions[0].action.is_none());
    }

    #[test]
    fn test_decorative_images() {
        let issues = run(
            r#"{ "id": "page", "children": [
                { "id": "a", "name": "Divider", "image": { "src": "line.svg" } },
                { "id": "b", "name": "Hero background", "image": { "alt": "Blue gradient swirl" } },
                { "id": "c", "name": "Badge", "image": { "alt": "Verified", "decorative": true } }
            ]}"#,
        );
        let ids: Vec<&str> = issues.iter().map(|i| i.location.node_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert!(issues.iter().all(|i| i.severity == Severity::Info));
        assert!(matches!(
            issues[0].fix_suggestions[0].action,
            Some(FixAction::ClearAltText { .. })
        ));
    }

    #[test]
    fn test_redundant_and_verbose_alt() {
        let long = "word ".repeat(40);
        let issues = run(&format!(
            r#"{{ "id": "page", "children": [
                {{ "id": "a", "name": "Photo", "image": {{ "alt": "Image of a red bicycle" }} }},
                {{ "id": "b", "name": "Shot", "image": {{ "src": "img/IMG_0042.JPG", "alt": "IMG_0042.JPG" }} }},
                {{ "id": "c", "name": "Chart", "image": {{ "alt": "{}" }} }},
                {{ "id": "d", "name": "Logo", "image": {{ "alt": "Acme" }} }}
            ]}}"#,
            long
        ));
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].title, "Redundant alt text");
        assert_eq!(
            issues[0].fix_suggestions[0].action,
            Some(FixAction::SetAltText {
                node_id: "a".into(),
                alt: "A red bicycle".into()
            })
        );
        assert_eq!(issues[1].title, "Alt text is a file name");
        assert_eq!(issues[2].title, "Alt text too long");
    }
}
