//! Platform-neutral UI tree produced by rendering a card.
//!
//! The tree is a small virtual DOM: elements carry a tag, class names, attributes and
//! inline styles. It can be serialized to HTML, walked by tests, or shipped as JSON.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A node of the rendered UI tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiNode {
    Element(UiElement),
    Text { text: String },
}

/// An element node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UiElement {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline_styles: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<UiNode>,
}

impl UiElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_style(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_style(key, value);
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<UiNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(UiNode::text(text))
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !class.is_empty() && !self.has_class(&class) {
            self.class_names.push(class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_names.iter().any(|existing| existing == class)
    }

    /// Sets an inline style, replacing any previous value for the same property.
    pub fn set_style(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.inline_styles.iter_mut().find(|(name, _)| name == key) {
            Some(entry) => entry.1 = value,
            None => self.inline_styles.push((key.to_string(), value)),
        }
    }

    pub fn remove_style(&mut self, key: &str) {
        self.inline_styles.retain(|(name, _)| name != key);
    }

    pub fn style(&self, key: &str) -> Option<&str> {
        self.inline_styles
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(name, _)| name == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn push_child(&mut self, child: impl Into<UiNode>) {
        self.children.push(child.into());
    }

    pub fn first_element_child_mut(&mut self) -> Option<&mut UiElement> {
        self.children.iter_mut().find_map(UiNode::as_element_mut)
    }

    pub fn last_element_child_mut(&mut self) -> Option<&mut UiElement> {
        self.children.iter_mut().rev().find_map(UiNode::as_element_mut)
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(UiNode::text_content).collect()
    }

    /// Element children only, skipping text nodes.
    pub fn element_children(&self) -> impl Iterator<Item = &UiElement> {
        self.children.iter().filter_map(UiNode::as_element)
    }
}

impl From<UiElement> for UiNode {
    fn from(element: UiElement) -> Self {
        UiNode::Element(element)
    }
}

impl UiNode {
    pub fn text(text: impl Into<String>) -> Self {
        UiNode::Text { text: text.into() }
    }

    pub fn as_element(&self) -> Option<&UiElement> {
        match self {
            UiNode::Element(element) => Some(element),
            UiNode::Text { .. } => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut UiElement> {
        match self {
            UiNode::Element(element) => Some(element),
            UiNode::Text { .. } => None,
        }
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            UiNode::Text { text } => out.push_str(text),
            UiNode::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Depth-first search over element nodes, including this one.
    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&UiElement) -> bool) -> Vec<&'a UiElement> {
        let mut found = Vec::new();
        self.walk(predicate, &mut found);
        found
    }

    fn walk<'a>(&'a self, predicate: &dyn Fn(&UiElement) -> bool, found: &mut Vec<&'a UiElement>) {
        if let UiNode::Element(element) = self {
            if predicate(element) {
                found.push(element);
            }
            for child in &element.children {
                child.walk(predicate, found);
            }
        }
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<&UiElement> {
        self.find_all(&|element| element.tag == tag)
    }

    pub fn find_by_class(&self, class: &str) -> Vec<&UiElement> {
        self.find_all(&|element| element.has_class(class))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_html(self, &mut out);
        out
    }
}

const VOID_TAGS: &[&str] = &["img", "input", "br", "hr"];

fn write_html(node: &UiNode, out: &mut String) {
    match node {
        UiNode::Text { text } => out.push_str(&escape(text)),
        UiNode::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            if !element.class_names.is_empty() {
                out.push_str(&format!(
                    " class=\"{}\"",
                    escape(&element.class_names.join(" "))
                ));
            }
            for (name, value) in &element.attributes {
                out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
            }
            if !element.inline_styles.is_empty() {
                let style = element
                    .inline_styles
                    .iter()
                    .map(|(name, value)| format!("{}: {}", name, value))
                    .collect::<Vec<_>>()
                    .join("; ");
                out.push_str(&format!(" style=\"{}\"", escape(&style)));
            }
            out.push('>');
            if VOID_TAGS.contains(&element.tag.as_str()) {
                return;
            }
            for child in &element.children {
                write_html(child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
