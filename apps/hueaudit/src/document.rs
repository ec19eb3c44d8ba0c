//! In-memory design documents loaded from JSON.
//!
//! This is the host adapter the CLI scans. A document is either a single
//! root node or an array of roots:
//!
//! ```json
//! { "id": "page", "name": "Page", "type": "frame", "fill": "#ffffff",
//!   "width": 390, "height": 844,
//!   "children": [
//!     { "id": "t1", "type": "text", "x": 16, "y": 24, "width": 200, "height": 20,
//!       "text": { "content": "Hello", "fontSize": 14, "fontWeight": 400, "color": "#767676" } },
//!     { "id": "img", "type": "image", "image": { "src": "hero.png", "alt": "Team photo" } },
//!     { "id": "cta", "name": "Buy", "onTap": true, "width": 30, "height": 30 }
//!   ] }
//! ```
//!
//! Parents are held as weak links so the tree has no reference cycles.

use crate::error::{AuditError, Result};
use crate::node::{Bounds, ImageAttrs, Interaction, Node, NodeError, NodeKind, NodeRef, TextAttrs};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Weak};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Many(Vec<RawNode>),
    One(Box<RawNode>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<NodeKind>,
    #[serde(default)]
    visible: Option<bool>,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    fill: Option<String>,
    #[serde(default)]
    text: Option<RawText>,
    #[serde(default)]
    image: Option<RawImage>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    on_tap: bool,
    #[serde(default)]
    children: Vec<RawNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawText {
    #[serde(default)]
    content: String,
    #[serde(default = "default_font_size")]
    font_size: f64,
    #[serde(default = "default_font_weight")]
    font_weight: u16,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    heading_level: Option<u8>,
}

fn default_font_size() -> f64 {
    16.0
}

fn default_font_weight() -> u16 {
    400
}

#[derive(Deserialize)]
struct RawImage {
    #[serde(default)]
    src: Option<String>,
    #[serde(default)]
    alt: Option<String>,
    #[serde(default)]
    decorative: bool,
}

/// A node of a loaded document.
#[derive(Debug)]
pub struct DocNode {
    id: String,
    name: Option<String>,
    kind: NodeKind,
    visible: Option<bool>,
    bounds: Bounds,
    fill: Option<String>,
    text: Option<TextAttrs>,
    image: Option<ImageAttrs>,
    interaction: Option<Interaction>,
    parent: Option<Weak<DocNode>>,
    children: Vec<Arc<DocNode>>,
}

impl DocNode {
    fn build(raw: RawNode, parent: Option<Weak<DocNode>>) -> Arc<DocNode> {
        let kind = raw.kind.unwrap_or(if raw.text.is_some() {
            NodeKind::Text
        } else if raw.image.is_some() {
            NodeKind::Image
        } else {
            NodeKind::Frame
        });
        let interaction = (raw.link.is_some() || raw.on_tap).then(|| Interaction {
            link: raw.link.clone(),
            on_tap: raw.on_tap,
        });
        Arc::new_cyclic(|me: &Weak<DocNode>| DocNode {
            id: raw.id,
            name: raw.name,
            kind,
            visible: raw.visible,
            bounds: Bounds::new(raw.x, raw.y, raw.width, raw.height),
            fill: raw.fill,
            text: raw.text.map(|t| TextAttrs {
                content: t.content,
                font_size: t.font_size,
                font_weight: t.font_weight,
                color: t.color,
                heading_level: t.heading_level,
            }),
            image: raw.image.map(|i| ImageAttrs {
                src: i.src,
                alt: i.alt,
                decorative: i.decorative,
            }),
            interaction,
            parent,
            children: raw
                .children
                .into_iter()
                .map(|c| DocNode::build(c, Some(me.clone())))
                .collect(),
        })
    }
}

impl Node for DocNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn visible(&self) -> Option<bool> {
        self.visible
    }

    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn bounds(&self) -> std::result::Result<Bounds, NodeError> {
        Ok(self.bounds)
    }

    fn fill(&self) -> std::result::Result<Option<String>, NodeError> {
        Ok(self.fill.clone())
    }

    fn text(&self) -> std::result::Result<Option<TextAttrs>, NodeError> {
        Ok(self.text.clone())
    }

    fn image(&self) -> std::result::Result<Option<ImageAttrs>, NodeError> {
        Ok(self.image.clone())
    }

    fn interaction(&self) -> std::result::Result<Option<Interaction>, NodeError> {
        Ok(self.interaction.clone())
    }

    fn parent(&self) -> std::result::Result<Option<NodeRef>, NodeError> {
        match &self.parent {
            None => Ok(None),
            Some(weak) => match weak.upgrade() {
                Some(p) => Ok(Some(p as NodeRef)),
                None => Err(NodeError::Detached(self.id.clone())),
            },
        }
    }

    fn children(&self) -> std::result::Result<Vec<NodeRef>, NodeError> {
        Ok(self.children.iter().map(|c| c.clone() as NodeRef).collect())
    }
}

/// A parsed design document.
pub struct Document {
    roots: Vec<NodeRef>,
    index: HashMap<String, NodeRef>,
}

impl Document {
    /// Parse a document from JSON text.
    pub fn from_json(s: &str) -> Result<Document> {
        let raw: RawDocument = serde_json::from_str(s)?;
        let raws = match raw {
            RawDocument::Many(v) => v,
            RawDocument::One(n) => vec![*n],
        };
        if raws.is_empty() {
            return Err(AuditError::Document("document has no nodes".into()));
        }
        let roots: Vec<Arc<DocNode>> = raws.into_iter().map(|r| DocNode::build(r, None)).collect();
        let mut index = HashMap::new();
        let mut stack: Vec<Arc<DocNode>> = roots.iter().rev().cloned().collect();
        while let Some(n) = stack.pop() {
            if n.id.trim().is_empty() {
                return Err(AuditError::Document("node with empty id".into()));
            }
            if index.insert(n.id.clone(), n.clone() as NodeRef).is_some() {
                return Err(AuditError::Document(format!("duplicate node id '{}'", n.id)));
            }
            stack.extend(n.children.iter().rev().cloned());
        }
        Ok(Document {
            roots: roots.into_iter().map(|r| r as NodeRef).collect(),
            index,
        })
    }

    /// Read and parse a document file.
    pub fn from_path(path: &Path) -> Result<Document> {
        let s = fs::read_to_string(path).map_err(|source| AuditError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Document::from_json(&s)
    }

    pub fn roots(&self) -> &[NodeRef] {
        &self.roots
    }

    pub fn find(&self, id: &str) -> Option<NodeRef> {
        self.index.get(id).cloned()
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_root_and_infer_kinds() {
        let d = Document::from_json(
            r##"{ "id": "p", "children": [
                { "id": "t", "text": { "content": "Hi" } },
                { "id": "i", "image": { "alt": "x" } },
                { "id": "b", "link": "/next", "width": 20, "height": 10 }
            ]}"##,
        )
        .unwrap();
        assert_eq!(d.len(), 4);
        assert_eq!(d.find("t").unwrap().kind(), NodeKind::Text);
        assert_eq!(d.find("i").unwrap().kind(), NodeKind::Image);
        let b = d.find("b").unwrap();
        assert_eq!(b.kind(), NodeKind::Frame);
        assert_eq!(b.bounds().unwrap().width, 20.0);
        assert_eq!(
            b.interaction().unwrap().unwrap().link.as_deref(),
            Some("/next")
        );
        let t = d.find("t").unwrap().text().unwrap().unwrap();
        assert_eq!(t.font_size, 16.0);
        assert_eq!(t.font_weight, 400);
    }

    #[test]
    fn test_parent_links() {
        let d = Document::from_json(r#"[{ "id": "a", "children": [{ "id": "b" }] }, { "id": "c" }]"#)
            .unwrap();
        assert_eq!(d.roots().len(), 2);
        let b = d.find("b").unwrap();
        assert_eq!(b.parent().unwrap().unwrap().id(), "a");
        assert!(d.find("c").unwrap().parent().unwrap().is_none());
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(
            Document::from_json("[]"),
            Err(AuditError::Document(_))
        ));
        assert!(matches!(
            Document::from_json(r#"[{ "id": "a" }, { "id": "a" }]"#),
            Err(AuditError::Document(_))
        ));
        assert!(Document::from_json("{ not json").is_err());
    }

    #[test]
    fn test_detached_parent_is_an_error() {
        let d = Document::from_json(r#"{ "id": "a", "children": [{ "id": "b" }] }"#).unwrap();
        let b = d.find("b").unwrap();
        drop(d);
        assert!(matches!(b.parent(), Err(NodeError::Detached(_))));
    }
}
