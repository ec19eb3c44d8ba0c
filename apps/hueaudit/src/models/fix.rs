//! Remediation hints attached to issues.
//!
//! Analyzers describe a fix as data (`FixAction`); the UI layer owns the
//! side effect and applies it through a [`FixHost`].

use crate::node::NodeError;
use serde::Serialize;

/// A concrete change to a node that would resolve (part of) an issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FixAction {
    #[serde(rename_all = "camelCase")]
    SetTextColor { node_id: String, color: String },
    #[serde(rename_all = "camelCase")]
    SetFontSize { node_id: String, font_size: f64 },
    #[serde(rename_all = "camelCase")]
    Resize { node_id: String, width: f64, height: f64 },
    #[serde(rename_all = "camelCase")]
    SetAltText { node_id: String, alt: String },
    #[serde(rename_all = "camelCase")]
    ClearAltText { node_id: String },
    #[serde(rename_all = "camelCase")]
    SetFill { node_id: String, color: String },
    #[serde(rename_all = "camelCase")]
    Rename { node_id: String, name: String },
}

impl FixAction {
    pub fn node_id(&self) -> &str {
        match self {
            FixAction::SetTextColor { node_id, .. }
            | FixAction::SetFontSize { node_id, .. }
            | FixAction::Resize { node_id, .. }
            | FixAction::SetAltText { node_id, .. }
            | FixAction::ClearAltText { node_id }
            | FixAction::SetFill { node_id, .. }
            | FixAction::Rename { node_id, .. } => node_id,
        }
    }
}

/// Applies fix actions to the host document.
pub trait FixHost {
    fn apply(&self, action: &FixAction) -> Result<(), NodeError>;
}

/// Human-readable remediation, optionally backed by an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixSuggestion {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<FixAction>,
}

impl FixSuggestion {
    /// Advice with nothing to apply automatically.
    pub fn advice(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            action: None,
        }
    }

    pub fn action(description: impl Into<String>, action: FixAction) -> Self {
        Self {
            description: description.into(),
            action: Some(action),
        }
    }

    /// Apply through `host`. Returns false when there is nothing to apply.
    pub fn apply(&self, host: &dyn FixHost) -> Result<bool, NodeError> {
        match &self.action {
            Some(a) => host.apply(a).map(|_| true),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        applied: RefCell<Vec<FixAction>>,
    }

    impl FixHost for Recorder {
        fn apply(&self, action: &FixAction) -> Result<(), NodeError> {
            if action.node_id() == "locked" {
                return Err(NodeError::Unavailable("read-only".into()));
            }
            self.applied.borrow_mut().push(action.clone());
            Ok(())
        }
    }

    #[test]
    fn test_apply_through_host() {
        let host = Recorder::default();
        let fix = FixSuggestion::action(
            "Use darker text",
            FixAction::SetTextColor {
                node_id: "t1".into(),
                color: "#595959".into(),
            },
        );
        assert!(fix.apply(&host).unwrap());
        assert!(!FixSuggestion::advice("Add a label").apply(&host).unwrap());
        assert_eq!(host.applied.borrow().len(), 1);

        let locked = FixSuggestion::action(
            "Rename",
            FixAction::Rename {
                node_id: "locked".into(),
                name: "Submit".into(),
            },
        );
        assert!(locked.apply(&host).is_err());
    }

    #[test]
    fn test_action_json_shape() {
        let v = serde_json::to_value(FixAction::SetFontSize {
            node_id: "t".into(),
            font_size: 12.0,
        })
        .unwrap();
        assert_eq!(v["kind"], "setFontSize");
        assert_eq!(v["nodeId"], "t");
        assert_eq!(v["fontSize"], 12.0);
    }
}
