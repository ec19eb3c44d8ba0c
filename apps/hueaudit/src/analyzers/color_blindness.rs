//! Information carried by hue alone (WCAG 1.4.1).
//!
//! Neighboring colored elements that differ only in hue (low luminance
//! contrast, high RGB distance) are simulated under each dichromacy. A pair
//! that collapses to near-identical colors is reported once, listing the
//! affected vision types.

use super::{backdrop, bounds_of, fill_color, group_by_parent, visible_scope, Analyzer};
use crate::color::{
    color_distance, contrast_ratio, format_ratio, shift_rgba, simulate_rgba, Dichromacy, Rgba,
};
use crate::models::{FixAction, FixSuggestion, Issue, IssueType, Location, Severity};
use crate::node::{Node, NodeRef};
use crate::traversal;
use crate::wcag;
use std::collections::HashSet;

/// Below this RGB distance two colors read as the same.
pub const DISTINGUISHABLE: f64 = 60.0;
/// At or above this contrast the pair differs in lightness, not just hue.
pub const LUMINANCE_CUE: f64 = 3.0;
/// Siblings further apart than this are not compared.
const NEIGHBOR_GAP: f64 = 16.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorBlindnessAnalyzer;

#[derive(Clone)]
struct Colored {
    node: NodeRef,
    color: Rgba,
}

impl ColorBlindnessAnalyzer {
    fn check(&self, front: &Colored, back: &Colored) -> Option<Issue> {
        let (a, b) = (&back.color, &front.color);
        let ratio = contrast_ratio(a, b);
        if ratio >= LUMINANCE_CUE || color_distance(a, b) < DISTINGUISHABLE {
            return None;
        }
        let affected: Vec<Dichromacy> = Dichromacy::ALL
            .into_iter()
            .filter(|k| color_distance(&simulate_rgba(a, *k), &simulate_rgba(b, *k)) < DISTINGUISHABLE)
            .collect();
        if affected.is_empty() {
            return None;
        }
        let severity = if affected
            .iter()
            .any(|k| matches!(k, Dichromacy::Protanopia | Dichromacy::Deuteranopia))
        {
            Severity::Warning
        } else {
            Severity::Info
        };
        let names: Vec<&str> = affected.iter().map(|k| k.as_str()).collect();

        let node = front.node.as_ref();
        let mut issue = Issue::new(
            IssueType::ColorBlindness,
            severity,
            "Colors indistinguishable with color blindness",
            format!(
                "\"{}\" ({}) and \"{}\" ({}) differ only by hue and look alike with {}.",
                node.label(),
                b,
                back.node.label(),
                a,
                names.join(", ")
            ),
            Location::of(node),
        )
        .with_values(format_ratio(ratio), format_ratio(LUMINANCE_CUE))
        .with_guideline(wcag::guideline(wcag::USE_OF_COLOR))
        .with_fix(FixSuggestion::advice(
            "Add a non-color cue such as an icon, label or pattern",
        ));
        if let Some(c) = separated_fill(b, a) {
            issue = issue.with_fix(FixSuggestion::action(
                format!(
                    "Change the fill of \"{}\" to {} ({} against {})",
                    node.label(),
                    c,
                    format_ratio(contrast_ratio(&c, a)),
                    a
                ),
                FixAction::SetFill {
                    node_id: node.id().to_string(),
                    color: c.to_hex(),
                },
            ));
        }
        Some(issue)
    }
}

/// Shift `color` away from `other` in lightness until they differ by
/// `LUMINANCE_CUE`.
fn separated_fill(color: &Rgba, other: &Rgba) -> Option<Rgba> {
    let lighten = color.luminance() >= other.luminance();
    (1..=20)
        .map(|step| shift_rgba(color, step as f64 * 0.05, lighten))
        .find(|c| contrast_ratio(c, other) >= LUMINANCE_CUE)
}

/// Effective fill of a visible node, composited over what is behind it.
fn colored(node: &NodeRef) -> Option<Colored> {
    let color = fill_color(node.as_ref())?.over(&backdrop(node.as_ref()));
    Some(Colored {
        node: node.clone(),
        color,
    })
}

fn pair_key(a: &dyn Node, b: &dyn Node) -> (String, String) {
    let (x, y) = (a.id().to_string(), b.id().to_string());
    if x <= y {
        (x, y)
    } else {
        (y, x)
    }
}

impl Analyzer for ColorBlindnessAnalyzer {
    fn name(&self) -> &'static str {
        "color-blindness"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::ColorBlindness
    }

    fn analyze(&self, nodes: &[NodeRef]) -> Vec<Issue> {
        let scope: Vec<NodeRef> = visible_scope(nodes)
            .into_iter()
            .filter(|n| fill_color(n.as_ref()).is_some())
            .collect();

        // (back, front): for siblings the later one paints on top
        let mut pairs: Vec<(Colored, Colored)> = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for (_, siblings) in group_by_parent(&scope) {
            let placed: Vec<_> = siblings
                .iter()
                .filter_map(|n| Some((colored(n)?, bounds_of(n.as_ref())?)))
                .collect();
            for (j, (front, fb)) in placed.iter().enumerate() {
                for (back, bb) in &placed[..j] {
                    if !(bb.overlaps(fb) || bb.gap(fb) <= NEIGHBOR_GAP) {
                        continue;
                    }
                    if seen.insert(pair_key(back.node.as_ref(), front.node.as_ref())) {
                        pairs.push((back.clone(), front.clone()));
                    }
                }
            }
        }

        for n in &scope {
            let parent = traversal::ancestors(n.as_ref())
                .into_iter()
                .find(|a| fill_color(a.as_ref()).is_some());
            let (Some(parent), Some(child)) = (parent.as_ref().and_then(colored), colored(n)) else {
                continue;
            };
            if seen.insert(pair_key(parent.node.as_ref(), n.as_ref())) {
                pairs.push((parent, child));
            }
        }

        let issues: Vec<Issue> = pairs
            .iter()
            .filter_map(|(back, front)| self.check(front, back))
            .collect();
        tracing::debug!(
            analyzer = self.name(),
            pairs = pairs.len(),
            issues = issues.len(),
            "analyzer finished"
        );
        issues
    }
}
