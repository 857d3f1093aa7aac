//! Retained document tree
//!
//! The document is the headless stand-in for the browser DOM: a tree of
//! element nodes with ids, classes, attributes, inline style properties,
//! text/HTML content and an opacity value driven by transitions.

use indexmap::IndexMap;
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{CoreError, Result};
use crate::selector::Selector;

new_key_type! {
    pub struct NodeId;
}

/// Element tag of a node
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Div,
    Svg,
    Group,
    Rect,
    Line,
    Path,
    Text,
    Other(String),
}

impl ElementKind {
    pub fn tag(&self) -> &str {
        match self {
            ElementKind::Div => "div",
            ElementKind::Svg => "svg",
            ElementKind::Group => "g",
            ElementKind::Rect => "rect",
            ElementKind::Line => "line",
            ElementKind::Path => "path",
            ElementKind::Text => "text",
            ElementKind::Other(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "div" => ElementKind::Div,
            "svg" => ElementKind::Svg,
            "g" => ElementKind::Group,
            "rect" => ElementKind::Rect,
            "line" => ElementKind::Line,
            "path" => ElementKind::Path,
            "text" => ElementKind::Text,
            other => ElementKind::Other(other.to_string()),
        }
    }
}

/// A single element in the document
#[derive(Clone, Debug)]
pub struct Node {
    kind: ElementKind,
    dom_id: Option<String>,
    classes: SmallVec<[String; 2]>,
    attrs: IndexMap<String, String>,
    style: IndexMap<String, String>,
    text: Option<String>,
    html: Option<String>,
    opacity: f32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: ElementKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            dom_id: None,
            classes: SmallVec::new(),
            attrs: IndexMap::new(),
            style: IndexMap::new(),
            text: None,
            html: None,
            opacity: 1.0,
            parent,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn dom_id(&self) -> Option<&str> {
        self.dom_id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Serializable view of a subtree, used for dumps
#[derive(Clone, Debug, Serialize)]
pub struct NodeSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attrs: IndexMap<String, String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub style: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    pub opacity: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// The document tree. Always has a `body` root.
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
    rules: IndexMap<String, String>,
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node::new(ElementKind::Other("body".to_string()), None));
        Self {
            nodes,
            body,
            rules: IndexMap::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(CoreError::UnknownNode(id))
    }

    /// Create a node and append it to `parent`
    pub fn create(&mut self, kind: ElementKind, parent: NodeId) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(CoreError::UnknownNode(parent));
        }
        let id = self.nodes.insert(Node::new(kind, Some(parent)));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Detach a node and drop its whole subtree. Returns the dropped ids.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        if id == self.body {
            return Err(CoreError::UnknownNode(id));
        }
        let parent = self.nodes.get(id).ok_or(CoreError::UnknownNode(id))?.parent;
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|c| *c != id);
        }

        let mut dropped = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                dropped.push(next);
            }
        }
        Ok(dropped)
    }

    /// Remove every child of `id`, keeping the node itself
    pub fn clear_children(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let children = self
            .nodes
            .get(id)
            .ok_or(CoreError::UnknownNode(id))?
            .children
            .clone();
        let mut dropped = Vec::new();
        for child in children {
            dropped.extend(self.remove(child)?);
        }
        Ok(dropped)
    }

    pub fn set_dom_id(&mut self, id: NodeId, dom_id: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.dom_id = Some(dom_id.into());
        Ok(())
    }

    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.dom_id.as_deref() == Some(dom_id))
            .map(|(id, _)| id)
    }

    pub fn add_class(&mut self, id: NodeId, class: impl Into<String>) -> Result<()> {
        let class = class.into();
        let node = self.node_mut(id)?;
        if !node.has_class(&class) {
            node.classes.push(class);
        }
        Ok(())
    }

    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.node_mut(id)?.attrs.insert(name.into(), value.into());
        Ok(())
    }

    pub fn set_style(
        &mut self,
        id: NodeId,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.node_mut(id)?.style.insert(property.into(), value.into());
        Ok(())
    }

    pub fn remove_style(&mut self, id: NodeId, property: &str) -> Result<()> {
        self.node_mut(id)?.style.shift_remove(property);
        Ok(())
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.text = Some(text.into());
        Ok(())
    }

    pub fn set_html(&mut self, id: NodeId, html: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.html = Some(html.into());
        Ok(())
    }

    pub fn set_opacity(&mut self, id: NodeId, opacity: f32) -> Result<()> {
        self.node_mut(id)?.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }

    /// Whether `id` is still reachable from the body
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.body {
                return true;
            }
            cursor = self.nodes.get(current).and_then(|n| n.parent);
        }
        false
    }

    /// Descendants of `root` (excluding `root`) matching `selector`, in
    /// document order.
    pub fn select_all(&self, root: NodeId, selector: &Selector) -> Result<Vec<NodeId>> {
        let root_node = self.nodes.get(root).ok_or(CoreError::UnknownNode(root))?;
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = root_node.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if selector.matches(node) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(out)
    }

    /// Insert a shared style rule once. Returns `true` on first insertion.
    pub fn ensure_rule(&mut self, key: &str, css: impl Into<String>) -> bool {
        if self.rules.contains_key(key) {
            return false;
        }
        self.rules.insert(key.to_string(), css.into());
        true
    }

    pub fn rule(&self, key: &str) -> Option<&str> {
        self.rules.get(key).map(String::as_str)
    }

    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.nodes.get(id)?;
        Some(NodeSnapshot {
            tag: node.kind.tag().to_string(),
            id: node.dom_id.clone(),
            classes: node.classes.to_vec(),
            attrs: node.attrs.clone(),
            style: node.style.clone(),
            text: node.text.clone(),
            html: node.html.clone(),
            opacity: node.opacity,
            children: node
                .children
                .iter()
                .filter_map(|c| self.snapshot(*c))
                .collect(),
        })
    }

    /// Indented one-line-per-node rendering of a subtree
    pub fn outline(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.outline_into(id, 0, &mut out);
        out
    }

    fn outline_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        out.push_str(&"  ".repeat(depth));
        out.push('<');
        out.push_str(node.kind.tag());
        if let Some(dom_id) = &node.dom_id {
            out.push_str(&format!(" id=\"{dom_id}\""));
        }
        if !node.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", node.classes.join(" ")));
        }
        for (k, v) in &node.attrs {
            out.push_str(&format!(" {k}=\"{v}\""));
        }
        if !node.style.is_empty() {
            let css: Vec<String> = node.style.iter().map(|(k, v)| format!("{k}:{v}")).collect();
            out.push_str(&format!(" style=\"{}\"", css.join(";")));
        }
        if node.opacity < 1.0 {
            out.push_str(&format!(" opacity=\"{:.2}\"", node.opacity));
        }
        out.push('>');
        if let Some(text) = node.text.as_ref().or(node.html.as_ref()) {
            out.push_str(text);
        }
        out.push('\n');
        for child in &node.children {
            self.outline_into(*child, depth + 1, out);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
