//! Structure and reachability: headings, hidden or covered controls,
//! focus order and accessible names.

use super::{bounds_of, fill_color, group_by_parent, has_default_name, is_interactive, visible_scope, Analyzer};
use crate::models::{FixAction, FixSuggestion, Issue, IssueType, Location, Severity};
use crate::node::{soft, Bounds, Node, NodeRef};
use crate::traversal;
use crate::wcag;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:h|heading\s*)([1-6])\b").expect("static heading pattern")
});

static GENERIC_LINK_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(click here|here|read more|learn more|more|link|this|go)\s*[.!>»]?\s*$")
        .expect("static link-text pattern")
});

/// Rows closer than this are read as the same line.
const ROW_TOLERANCE: f64 = 4.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationAnalyzer;

fn issue(node: &dyn Node, severity: Severity, title: &str, description: String, guideline: &str) -> Issue {
    Issue::new(
        IssueType::Navigation,
        severity,
        title,
        description,
        Location::of(node),
    )
    .with_guideline(wcag::guideline(guideline))
}

/// Heading level from host semantics or a layer name like "H2".
fn heading_level(node: &dyn Node) -> Option<u8> {
    let text = soft(node.text(), "text", node.id())?;
    if text.content.trim().is_empty() {
        return None;
    }
    if let Some(level) = text.heading_level.filter(|l| (1..=6).contains(l)) {
        return Some(level);
    }
    let caps = HEADING_NAME.captures(node.name()?)?;
    caps[1].parse().ok()
}

fn check_headings(scope: &[NodeRef]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut previous: Option<u8> = None;
    let mut h1_seen = false;
    for node in scope {
        let Some(level) = heading_level(node.as_ref()) else {
            continue;
        };
        let n = node.as_ref();
        match previous {
            None if level != 1 => issues.push(
                issue(
                    n,
                    Severity::Info,
                    "First heading is not H1",
                    format!("The first heading \"{}\" is H{}; start the outline with H1.", n.label(), level),
                    wcag::INFO_AND_RELATIONSHIPS,
                )
                .with_values(format!("H{}", level), "H1"),
            ),
            Some(prev) if level > prev + 1 => issues.push(
                issue(
                    n,
                    Severity::Warning,
                    "Skipped heading level",
                    format!(
                        "\"{}\" jumps from H{} to H{}; screen reader users navigate by heading level.",
                        n.label(),
                        prev,
                        level
                    ),
                    wcag::INFO_AND_RELATIONSHIPS,
                )
                .with_values(format!("H{}", level), format!("H{}", prev + 1))
                .with_fix(FixSuggestion::advice(format!(
                    "Use H{} here or add the missing intermediate heading",
                    prev + 1
                ))),
            ),
            _ => {}
        }
        if level == 1 {
            if h1_seen {
                issues.push(issue(
                    n,
                    Severity::Info,
                    "Multiple H1 headings",
                    format!("\"{}\" is another H1; a screen should have a single top-level heading.", n.label()),
                    wcag::INFO_AND_RELATIONSHIPS,
                ));
            }
            h1_seen = true;
        }
        previous = Some(level);
    }
    issues
}

/// Controls whose own flag is visible but an ancestor hides them.
fn check_hidden(all: &[NodeRef]) -> Vec<Issue> {
    all.iter()
        .filter(|n| n.visible() != Some(false) && !traversal::is_visible(n.as_ref()))
        .filter(|n| is_interactive(n.as_ref()))
        .map(|n| {
            let hider = traversal::ancestors(n.as_ref())
                .into_iter()
                .find(|a| a.visible() == Some(false));
            let by = hider.map(|h| h.label().to_string()).unwrap_or_default();
            issue(
                n.as_ref(),
                Severity::Warning,
                "Interactive element unreachable",
                format!(
                    "\"{}\" is interactive but hidden by \"{}\"; keyboard and screen reader users cannot reach it.",
                    n.label(),
                    by
                ),
                wcag::KEYBOARD,
            )
            .with_fix(FixSuggestion::advice(
                "Show the container or remove the hidden control",
            ))
        })
        .collect()
}

/// Controls fully covered by an opaque, non-interactive sibling painted on top.
fn check_obscured(node: &NodeRef) -> Option<Issue> {
    let b = bounds_of(node.as_ref()).filter(|b| b.width > 0.0 && b.height > 0.0)?;
    let parent = soft(node.parent(), "parent", node.id())?;
    let siblings = soft(parent.children(), "children", parent.id());
    let front_to_back = traversal::z_order(&siblings);
    let cover = front_to_back
        .iter()
        .take_while(|s| s.id() != node.id())
        .find(|s| {
            traversal::is_visible(s.as_ref())
                && !is_interactive(s.as_ref())
                && fill_color(s.as_ref()).is_some_and(|c| c.a >= 1.0)
                && bounds_of(s.as_ref()).is_some_and(|sb| sb.contains(&b))
        })?;
    Some(
        issue(
            node.as_ref(),
            Severity::Warning,
            "Interactive element covered",
            format!(
                "\"{}\" is painted over by \"{}\" and cannot be seen or tapped.",
                node.label(),
                cover.label()
            ),
            wcag::KEYBOARD,
        )
        .with_fix(FixSuggestion::advice(format!(
            "Move \"{}\" above \"{}\" in the layer order",
            node.label(),
            cover.label()
        ))),
    )
}

/// Layer order of sibling controls against top-to-bottom, left-to-right reading.
fn check_focus_order(parent: &dyn Node, controls: &[NodeRef]) -> Option<Issue> {
    let placed: Vec<(&NodeRef, Bounds)> = controls
        .iter()
        .filter_map(|n| Some((n, bounds_of(n.as_ref())?)))
        .collect();
    if placed.len() < 2 {
        return None;
    }
    let mut visual = placed.clone();
    visual.sort_by(|(_, a), (_, b)| a.y.total_cmp(&b.y));
    let mut rows: Vec<usize> = Vec::with_capacity(visual.len());
    let mut row_top = f64::NEG_INFINITY;
    for (_, b) in &visual {
        if b.y - row_top >= ROW_TOLERANCE {
            row_top = b.y;
            rows.push(rows.last().map_or(0, |r| r + 1));
        } else {
            rows.push(rows.last().copied().unwrap_or(0));
        }
    }
    let mut keyed: Vec<(usize, (&NodeRef, Bounds))> = rows.into_iter().zip(visual).collect();
    keyed.sort_by(|(ra, (_, a)), (rb, (_, b))| ra.cmp(rb).then(a.x.total_cmp(&b.x)));
    let visual: Vec<(&NodeRef, Bounds)> = keyed.into_iter().map(|(_, p)| p).collect();
    let in_layers = placed.iter().map(|(n, _)| n.id());
    if in_layers.eq(visual.iter().map(|(n, _)| n.id())) {
        return None;
    }
    Some(
        issue(
            parent,
            Severity::Info,
            "Focus order differs from visual order",
            format!(
                "Controls in \"{}\" are layered {} but read {}.",
                parent.label(),
                join_labels(&placed),
                join_labels(&visual)
            ),
            wcag::FOCUS_ORDER,
        )
        .with_fix(FixSuggestion::advice(
            "Reorder the layers to match the visual reading order",
        )),
    )
}

fn join_labels(v: &[(&NodeRef, Bounds)]) -> String {
    v.iter()
        .map(|(n, _)| n.label().to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

fn has_text(node: &NodeRef) -> bool {
    std::iter::once(node.clone())
        .chain(traversal::descendants(node))
        .any(|n| {
            soft(n.text(), "text", n.id()).is_some_and(|t| !t.content.trim().is_empty())
        })
}

/// Controls with a tool-generated name and no text to announce.
fn check_unnamed(node: &NodeRef) -> Option<Issue> {
    if !has_default_name(node.as_ref()) || has_text(node) {
        return None;
    }
    let mut is = issue(
        node.as_ref(),
        Severity::Info,
        "Interactive element has no accessible name",
        format!(
            "\"{}\" has a default layer name and no text; assistive technology cannot announce its purpose.",
            node.label()
        ),
        wcag::NAME_ROLE_VALUE,
    );
    let link = soft(node.interaction(), "interaction", node.id()).and_then(|i| i.link);
    if let Some(name) = link.as_deref().and_then(name_from_link) {
        is = is.with_fix(FixSuggestion::action(
            format!("Rename the layer to \"{}\"", name),
            FixAction::Rename {
                node_id: node.id().to_string(),
                name,
            },
        ));
    }
    Some(is.with_fix(FixSuggestion::advice(
        "Give the layer a descriptive name or add a visible label",
    )))
}

/// "https://x.test/account/settings?tab=1" -> "Settings link".
fn name_from_link(link: &str) -> Option<String> {
    let path = link.split(['?', '#']).next()?;
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':') && !s.contains('.'))?;
    let words = segment.replace(['-', '_'], " ");
    let mut chars = words.trim().chars();
    let first = chars.next()?;
    Some(format!("{}{} link", first.to_uppercase(), chars.as_str()))
}

/// Generic link text ("click here") inside a control.
fn check_link_text(node: &NodeRef) -> Option<Issue> {
    let text = soft(node.text(), "text", node.id())?;
    if !GENERIC_LINK_TEXT.is_match(&text.content) {
        return None;
    }
    let in_control = is_interactive(node.as_ref())
        || traversal::ancestors(node.as_ref())
            .iter()
            .any(|a| is_interactive(a.as_ref()));
    if !in_control {
        return None;
    }
    Some(
        issue(
            node.as_ref(),
            Severity::Info,
            "Link text does not describe its purpose",
            format!(
                "\"{}\" does not say where it leads when read out of context.",
                text.content.trim()
            ),
            wcag::LINK_PURPOSE,
        )
        .with_fix(FixSuggestion::advice(
            "Use text that names the destination, e.g. \"Read the pricing guide\"",
        )),
    )
}

impl Analyzer for NavigationAnalyzer {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Navigation
    }

    fn analyze(&self, nodes: &[NodeRef]) -> Vec<Issue> {
        let all = traversal::collect_scope(nodes);
        let visible = visible_scope(nodes);
        let controls: Vec<NodeRef> = visible
            .iter()
            .filter(|n| is_interactive(n.as_ref()))
            .cloned()
            .collect();

        let mut issues = check_headings(&visible);
        issues.extend(check_hidden(&all));
        issues.extend(controls.iter().filter_map(check_obscured));
        for (parent, siblings) in group_by_parent(&controls) {
            if let Some(p) = parent {
                issues.extend(check_focus_order(p.as_ref(), &siblings));
            }
        }
        issues.extend(controls.iter().filter_map(check_unnamed));
        issues.extend(visible.iter().filter_map(check_link_text));
        tracing::debug!(analyzer = self.name(), issues = issues.len(), "analyzer finished");
        issues
    }
}
