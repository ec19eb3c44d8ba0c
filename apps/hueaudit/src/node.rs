//! Node capability interface consumed by the analysis engine.
//!
//! Hosts (design tools, document loaders) implement [`Node`]. Identity and
//! cheap flags are plain accessors; everything that may need a round trip to
//! the host is fallible. The engine never mutates a node.
//!
//! Every fallible call inside traversal and the analyzers goes through
//! [`soft`] / [`soft_or`], which log the failure and substitute a default.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Shared handle to a host node.
pub type NodeRef = Arc<dyn Node>;

/// Failure reported by a host accessor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NodeError {
    #[error("host unavailable: {0}")]
    Unavailable(String),
    #[error("node '{0}' is no longer attached to the document")]
    Detached(String),
    #[error("cannot read {attr}: {reason}")]
    Attribute { attr: &'static str, reason: String },
}

/// Structural category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Frame,
    Text,
    Image,
    Shape,
    Group,
    Component,
}

/// Position (relative to the parent) and size, in px.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Shortest edge-to-edge distance; 0 when the boxes touch or overlap.
    pub fn gap(&self, other: &Bounds) -> f64 {
        let dx = (other.x - self.right()).max(self.x - other.right()).max(0.0);
        let dy = (other.y - self.bottom()).max(self.y - other.bottom()).max(0.0);
        dx.max(dy)
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Text styling of a text node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAttrs {
    pub content: String,
    pub font_size: f64,
    pub font_weight: u16,
    /// Foreground color string; `None` means the host default (black).
    pub color: Option<String>,
    /// Semantic heading level (1-6) when the host knows it.
    pub heading_level: Option<u8>,
}

/// Image metadata of an image-bearing node.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImageAttrs {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub decorative: bool,
}

/// Tap/navigation behavior attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    pub link: Option<String>,
    pub on_tap: bool,
}

/// Read-only view of a host node.
pub trait Node: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> Option<&str>;

    /// Own visibility flag; `None` when the host does not say.
    fn visible(&self) -> Option<bool>;

    fn kind(&self) -> NodeKind;

    fn bounds(&self) -> Result<Bounds, NodeError>;

    /// Fill/background color string, if the node paints one.
    fn fill(&self) -> Result<Option<String>, NodeError>;

    fn text(&self) -> Result<Option<TextAttrs>, NodeError>;

    fn image(&self) -> Result<Option<ImageAttrs>, NodeError>;

    fn interaction(&self) -> Result<Option<Interaction>, NodeError>;

    fn parent(&self) -> Result<Option<NodeRef>, NodeError>;

    fn children(&self) -> Result<Vec<NodeRef>, NodeError>;

    /// Display label: name, falling back to id.
    fn label(&self) -> &str {
        match self.name() {
            Some(n) if !n.trim().is_empty() => n,
            _ => self.id(),
        }
    }
}

/// Unwrap a host call, logging and substituting `T::default()` on failure.
pub fn soft<T: Default>(res: Result<T, NodeError>, op: &'static str, node_id: &str) -> T {
    soft_or(res, op, node_id, T::default())
}

/// Unwrap a host call, logging and substituting `fallback` on failure.
pub fn soft_or<T>(res: Result<T, NodeError>, op: &'static str, node_id: &str, fallback: T) -> T {
    match res {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(node = node_id, op, error = %e, "host call failed; using default");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_substitutes_default() {
        let ok: Result<Vec<u8>, NodeError> = Ok(vec![1]);
        assert_eq!(soft(ok, "children", "n1"), vec![1]);
        let err: Result<Vec<u8>, NodeError> = Err(NodeError::Unavailable("offline".into()));
        assert!(soft(err, "children", "n1").is_empty());
        let err: Result<bool, NodeError> = Err(NodeError::Detached("n1".into()));
        assert!(soft_or(err, "visible", "n1", true));
    }

    #[test]
    fn test_bounds_geometry() {
        let a = Bounds::new(0.0, 0.0, 40.0, 40.0);
        let b = Bounds::new(44.0, 0.0, 40.0, 40.0);
        assert_eq!(a.gap(&b), 4.0);
        assert!(!a.overlaps(&b));
        let c = Bounds::new(10.0, 10.0, 10.0, 10.0);
        assert!(a.overlaps(&c));
        assert!(a.contains(&c));
        assert_eq!(a.gap(&c), 0.0);
        let below = Bounds::new(0.0, 50.0, 10.0, 10.0);
        assert_eq!(a.gap(&below), 10.0);
    }

    #[test]
    fn test_error_messages() {
        let e = NodeError::Attribute {
            attr: "fill",
            reason: "gradient".into(),
        };
        assert_eq!(e.to_string(), "cannot read fill: gradient");
    }
}
