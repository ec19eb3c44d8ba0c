//! Accessibility analyzers.
//!
//! Each analyzer is stateless apart from its thresholds, reads nodes only,
//! and returns its own issue list. None depends on another's output, so the
//! scanner runs them in parallel.
//!
//! Per-node failures never abort an analyzer: host calls go through
//! `node::soft`, and a node that cannot be inspected is skipped.

pub mod color_blindness;
pub mod contrast;
pub mod image;
pub mod navigation;
pub mod text_size;
pub mod touch_target;

pub use color_blindness::ColorBlindnessAnalyzer;
pub use contrast::ContrastAnalyzer;
pub use image::ImageAccessibilityAnalyzer;
pub use navigation::NavigationAnalyzer;
pub use text_size::TextSizeAnalyzer;
pub use touch_target::TouchTargetAnalyzer;

use crate::color::{try_parse_color, Rgba};
use crate::models::{Issue, IssueType};
use crate::node::{soft, Bounds, Node, NodeRef};
use crate::traversal;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A single accessibility check over a node set.
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;

    fn issue_type(&self) -> IssueType;

    /// Inspect `nodes` (and their descendants) and report findings.
    fn analyze(&self, nodes: &[NodeRef]) -> Vec<Issue>;
}

static INTERACTIVE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(button|btn|link|toggle|checkbox|radio|switch|\bicon\b|\bcta\b|\btab\b)")
        .expect("static interactive pattern")
});

// Names design tools assign automatically, e.g. "Frame 12".
static DEFAULT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(frame|group|rectangle|rect|ellipse|vector|image|component|instance|layer|shape)(\s*\d+)?\s*$")
        .expect("static default-name pattern")
});

/// True when the node has no name or a tool-generated one.
pub(crate) fn has_default_name(node: &dyn Node) -> bool {
    match node.name() {
        Some(n) => n.trim().is_empty() || DEFAULT_NAME.is_match(n),
        None => true,
    }
}

/// Nodes in scope that are visible, pre-order.
pub(crate) fn visible_scope(nodes: &[NodeRef]) -> Vec<NodeRef> {
    traversal::collect_scope(nodes)
        .into_iter()
        .filter(|n| traversal::is_visible(n.as_ref()))
        .collect()
}

/// Heuristic: the node reacts to taps or is named like a control.
pub(crate) fn is_interactive(node: &dyn Node) -> bool {
    if soft(node.interaction(), "interaction", node.id()).is_some() {
        return true;
    }
    // text layers inside a control often repeat its name
    if soft(node.text(), "text", node.id()).is_some() {
        return false;
    }
    node.name().is_some_and(|n| INTERACTIVE_NAME.is_match(n))
}

pub(crate) fn bounds_of(node: &dyn Node) -> Option<Bounds> {
    soft(node.bounds().map(Some), "bounds", node.id())
}

/// Parsed fill of a node; unparseable or fully transparent fills are `None`.
pub(crate) fn fill_color(node: &dyn Node) -> Option<Rgba> {
    let raw = soft(node.fill(), "fill", node.id())?;
    try_parse_color(&raw).filter(|c| c.a > 0.0)
}

/// Effective color painted behind `node`: ancestor fills composited up to
/// the first opaque one, over white.
pub(crate) fn backdrop(node: &dyn Node) -> Rgba {
    let mut layers: Vec<Rgba> = Vec::new();
    for ancestor in traversal::ancestors(node) {
        if let Some(c) = fill_color(ancestor.as_ref()) {
            layers.push(c);
            if c.a >= 1.0 {
                break;
            }
        }
    }
    layers.iter().rev().fold(Rgba::WHITE, |acc, c| c.over(&acc))
}

/// Group nodes by parent id, keeping first-seen order of groups and members.
pub(crate) fn group_by_parent(nodes: &[NodeRef]) -> Vec<(Option<NodeRef>, Vec<NodeRef>)> {
    let mut order: Vec<(Option<NodeRef>, Vec<NodeRef>)> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();
    for n in nodes {
        let parent = soft(n.parent(), "parent", n.id());
        let key = parent.as_ref().map(|p| p.id().to_string()).unwrap_or_default();
        match slot.get(&key) {
            Some(&i) => order[i].1.push(n.clone()),
            None => {
                slot.insert(key, order.len());
                order.push((parent, vec![n.clone()]));
            }
        }
    }
    order
}

/// Short quoted excerpt of text content for messages.
pub(crate) fn excerpt(s: &str) -> String {
    let s = s.trim();
    let mut out: String = s.chars().take(40).collect();
    if s.chars().count() > 40 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_backdrop_composites_translucent_fills() {
        let d = Document::from_json(
            r##"{ "id": "page", "fill": "#000000", "children": [
                { "id": "veil", "fill": "rgba(255, 255, 255, 0.5)", "children": [
                    { "id": "t", "text": { "content": "x" } }
                ]}
            ]}"##,
        )
        .unwrap();
        let bg = backdrop(d.find("t").unwrap().as_ref());
        assert_eq!(bg, Rgba::opaque(128, 128, 128));
    }

    #[test]
    fn test_backdrop_defaults_to_white() {
        let d = Document::from_json(
            r#"{ "id": "page", "fill": "linear-gradient(red, blue)", "children": [{ "id": "t" }] }"#,
        )
        .unwrap();
        assert_eq!(backdrop(d.find("t").unwrap().as_ref()), Rgba::WHITE);
    }

    #[test]
    fn test_interactive_heuristics() {
        let d = Document::from_json(
            r#"{ "id": "page", "children": [
                { "id": "a", "name": "Primary Button" },
                { "id": "b", "name": "Card", "onTap": true },
                { "id": "c", "name": "Button label", "text": { "content": "Go" } },
                { "id": "d", "name": "Hero" }
            ]}"#,
        )
        .unwrap();
        let check = |id: &str| is_interactive(d.find(id).unwrap().as_ref());
        assert!(check("a"));
        assert!(check("b"));
        assert!(!check("c"));
        assert!(!check("d"));
    }

    #[test]
    fn test_default_names() {
        let d = Document::from_json(
            r#"{ "id": "page", "children": [
                { "id": "a", "name": "Frame 12" },
                { "id": "b", "name": "Rectangle" },
                { "id": "c" },
                { "id": "d", "name": "Framework logo" }
            ]}"#,
        )
        .unwrap();
        let check = |id: &str| has_default_name(d.find(id).unwrap().as_ref());
        assert!(check("a"));
        assert!(check("b"));
        assert!(check("c"));
        assert!(!check("d"));
    }

    #[test]
    fn test_excerpt_truncates() {
        assert_eq!(excerpt("  short "), "short");
        let long = "x".repeat(50);
        assert_eq!(excerpt(&long).chars().count(), 41);
    }
}
