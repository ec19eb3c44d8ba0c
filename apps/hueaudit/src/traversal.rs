//! Tree-walking helpers over [`Node`] handles.
//!
//! All walks are fail-soft: a host error while reading children or parents
//! ends that branch of the walk and is logged; callers always get a (possibly
//! partial) result.

use crate::node::{soft, Node, NodeError, NodeRef};
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Upper bound on ancestor chain length; guards against cyclic host data.
const MAX_DEPTH: usize = 512;

/// Every descendant of `node` in pre-order (node itself excluded).
pub fn descendants(node: &NodeRef) -> Vec<NodeRef> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    seen.insert(node.id().to_string());
    walk(node, &mut out, &mut seen, 0);
    out
}

fn walk(node: &NodeRef, out: &mut Vec<NodeRef>, seen: &mut HashSet<String>, depth: usize) {
    if depth >= MAX_DEPTH {
        tracing::warn!(node = node.id(), "tree deeper than {} levels; truncated", MAX_DEPTH);
        return;
    }
    for child in soft(node.children(), "children", node.id()) {
        if !seen.insert(child.id().to_string()) {
            continue;
        }
        out.push(child.clone());
        walk(&child, out, seen, depth + 1);
    }
}

/// Ancestors of `node`, nearest parent first.
pub fn ancestors(node: &dyn Node) -> Vec<NodeRef> {
    let mut out: Vec<NodeRef> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(node.id().to_string());
    let mut current = soft(node.parent(), "parent", node.id());
    while let Some(parent) = current {
        if !seen.insert(parent.id().to_string()) || out.len() >= MAX_DEPTH {
            tracing::warn!(node = node.id(), "ancestor chain loops or is too deep; truncated");
            break;
        }
        current = soft(parent.parent(), "parent", parent.id());
        out.push(parent);
    }
    out
}

/// Root-first path of names (ids when unnamed) joined by `/`.
pub fn path(node: &dyn Node) -> String {
    let mut parts: Vec<String> = ancestors(node)
        .iter()
        .rev()
        .map(|a| a.label().to_string())
        .collect();
    parts.push(node.label().to_string());
    parts.join("/")
}

/// False when the node or any ancestor is explicitly hidden.
pub fn is_visible(node: &dyn Node) -> bool {
    if node.visible() == Some(false) {
        return false;
    }
    ancestors(node).iter().all(|a| a.visible() != Some(false))
}

/// `root` and its descendants whose name matches `pattern`.
pub fn find_by_name(root: &NodeRef, pattern: &Regex) -> Vec<NodeRef> {
    std::iter::once(root.clone())
        .chain(descendants(root))
        .filter(|n| n.name().is_some_and(|name| pattern.is_match(name)))
        .collect()
}

/// The given nodes plus all their descendants, deduplicated by id, pre-order.
pub fn collect_scope(nodes: &[NodeRef]) -> Vec<NodeRef> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id().to_string()) {
            continue;
        }
        out.push(node.clone());
        walk(node, &mut out, &mut seen, 0);
    }
    out
}

/// Approximate paint order, front to back.
///
/// Nodes are grouped by parent; within a group a later input index is in
/// front. The result is a parent-before-children walk. Falls back to the
/// input order when a parent lookup fails.
pub fn z_order(nodes: &[NodeRef]) -> Vec<NodeRef> {
    match try_z_order(nodes) {
        Ok(ordered) => ordered,
        Err(e) => {
            tracing::warn!(error = %e, "z-order failed; keeping input order");
            nodes.to_vec()
        }
    }
}

fn try_z_order(nodes: &[NodeRef]) -> Result<Vec<NodeRef>, NodeError> {
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id()).collect();
    // parent id -> child indices; roots keyed by their (absent) parent
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    let mut root_groups: Vec<String> = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        let parent_id = node.parent()?.map(|p| p.id().to_string());
        let key = parent_id.clone().unwrap_or_default();
        let is_root = parent_id.map_or(true, |p| !ids.contains(p.as_str()));
        let entry = groups.entry(key.clone()).or_default();
        if entry.is_empty() && is_root {
            root_groups.push(key);
        }
        entry.push(i);
    }
    for members in groups.values_mut() {
        members.sort_by(|a, b| b.cmp(a));
    }

    let mut out = Vec::with_capacity(nodes.len());
    let mut seen: HashSet<String> = HashSet::new();
    for key in &root_groups {
        for &i in &groups[key] {
            emit(i, nodes, &groups, &mut seen, &mut out);
        }
    }
    // anything unreachable from a root (e.g. a parent cycle) keeps input order
    for i in 0..nodes.len() {
        emit(i, nodes, &groups, &mut seen, &mut out);
    }
    Ok(out)
}

fn emit(
    i: usize,
    nodes: &[NodeRef],
    groups: &HashMap<String, Vec<usize>>,
    seen: &mut HashSet<String>,
    out: &mut Vec<NodeRef>,
) {
    let node = &nodes[i];
    if !seen.insert(node.id().to_string()) {
        return;
    }
    out.push(node.clone());
    if let Some(children) = groups.get(node.id()) {
        for &c in children {
            emit(c, nodes, groups, seen, out);
        }
    }
}
