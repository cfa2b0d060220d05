//! Sensitivity labels and their application to content.

use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActionSource, AssignmentMethod};

/// Plain description of a label, used to build a [`Label`] tree.
///
/// This is what a policy payload deserializes into; the tree form with
/// parent back-links is derived from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub sensitivity: i32,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub auto_tooltip: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub custom_settings: Vec<(String, String)>,
    #[serde(default)]
    pub content_formats: Vec<String>,
    #[serde(default)]
    pub double_key_url: String,
    #[serde(default)]
    pub children: Vec<LabelSpec>,
}

fn default_active() -> bool {
    true
}

/// A sensitivity label node.
///
/// Labels form a two-level tree in practice (parents with sublabels);
/// children hold weak back-links so a label taken out of the tree can
/// still name its parent without keeping the whole tree alive.
#[derive(Debug)]
pub struct Label {
    id: String,
    name: String,
    description: String,
    color: String,
    sensitivity: i32,
    tooltip: String,
    auto_tooltip: String,
    is_active: bool,
    custom_settings: Vec<(String, String)>,
    content_formats: Vec<String>,
    double_key_url: String,
    parent: Weak<Label>,
    children: Vec<Arc<Label>>,
}

impl Label {
    /// Build a label tree from its spec, wiring parent links.
    pub fn build(spec: LabelSpec) -> Arc<Label> {
        Self::build_with_parent(spec, Weak::new())
    }

    fn build_with_parent(spec: LabelSpec, parent: Weak<Label>) -> Arc<Label> {
        Arc::new_cyclic(|me| Label {
            id: spec.id,
            name: spec.name,
            description: spec.description,
            color: spec.color,
            sensitivity: spec.sensitivity,
            tooltip: spec.tooltip,
            auto_tooltip: spec.auto_tooltip,
            is_active: spec.is_active,
            custom_settings: spec.custom_settings,
            content_formats: spec.content_formats,
            double_key_url: spec.double_key_url,
            parent,
            children: spec
                .children
                .into_iter()
                .map(|child| Self::build_with_parent(child, me.clone()))
                .collect(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn sensitivity(&self) -> i32 {
        self.sensitivity
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Tooltip shown when the label was applied automatically.
    pub fn auto_tooltip(&self) -> &str {
        &self.auto_tooltip
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn parent(&self) -> Option<Arc<Label>> {
        self.parent.upgrade()
    }

    pub fn children(&self) -> &[Arc<Label>] {
        &self.children
    }

    pub fn custom_settings(&self) -> &[(String, String)] {
        &self.custom_settings
    }

    pub fn content_formats(&self) -> &[String] {
        &self.content_formats
    }

    pub fn double_key_url(&self) -> &str {
        &self.double_key_url
    }
}

/// A key/value property stored with the label metadata on content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedProperty {
    pub key: String,
    pub value: String,
}

/// A label as applied to a specific piece of content.
#[derive(Debug, Clone)]
pub struct ContentLabel {
    label: Arc<Label>,
    assignment_method: AssignmentMethod,
    action_source: ActionSource,
    creation_time: DateTime<Utc>,
    extended_properties: Vec<ExtendedProperty>,
}

impl ContentLabel {
    pub fn new(
        label: Arc<Label>,
        assignment_method: AssignmentMethod,
        action_source: ActionSource,
        creation_time: DateTime<Utc>,
        extended_properties: Vec<ExtendedProperty>,
    ) -> Self {
        Self {
            label,
            assignment_method,
            action_source,
            creation_time,
            extended_properties,
        }
    }

    pub fn label(&self) -> &Arc<Label> {
        &self.label
    }

    pub fn assignment_method(&self) -> AssignmentMethod {
        self.assignment_method
    }

    pub fn action_source(&self) -> ActionSource {
        self.action_source
    }

    /// When the label was set on the content.
    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    pub fn extended_properties(&self) -> &[ExtendedProperty] {
        &self.extended_properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Arc<Label> {
        Label::build(LabelSpec {
            id: "parent-id".into(),
            name: "Confidential".into(),
            sensitivity: 3,
            children: vec![
                LabelSpec {
                    id: "child-a".into(),
                    name: "All Employees".into(),
                    sensitivity: 3,
                    ..Default::default()
                },
                LabelSpec {
                    id: "child-b".into(),
                    name: "Recipients Only".into(),
                    sensitivity: 3,
                    is_active: false,
                    ..Default::default()
                },
            ],
            ..Default::default()
        })
    }

    #[test]
    fn parent_links_are_wired() {
        let root = tree();
        assert_eq!(root.children().len(), 2);
        let child = root.children()[0].clone();
        let parent = child.parent().expect("child has parent");
        assert_eq!(parent.id(), "parent-id");
        assert!(root.parent().is_none());
    }

    #[test]
    fn child_outlives_dropped_tree() {
        let child = tree().children()[0].clone();
        // the tree root is gone now, so the weak link is dead
        assert!(child.parent().is_none());
        assert_eq!(child.name(), "All Employees");
    }

    #[test]
    fn spec_deserializes_with_defaults() {
        let spec: LabelSpec =
            serde_json::from_str(r#"{"id":"x","name":"Public"}"#).unwrap();
        assert!(spec.is_active);
        assert_eq!(spec.sensitivity, 0);
        let label = Label::build(spec);
        assert!(label.children().is_empty());
    }
}
