//! Render context and the plain-text outline of a rendered tree.

use crate::action::InteractionState;
use crate::layout::ActionButtonStyle;
use crate::ui::{UiElement, UiNode};

/// State threaded through one render pass.
#[derive(Debug)]
pub struct RenderContext<'s> {
    button_style: ActionButtonStyle,
    state: &'s mut InteractionState,
}

impl<'s> RenderContext<'s> {
    pub fn new(button_style: ActionButtonStyle, state: &'s mut InteractionState) -> Self {
        Self {
            button_style,
            state,
        }
    }

    pub fn button_style(&self) -> ActionButtonStyle {
        self.button_style
    }

    pub fn state(&self) -> &InteractionState {
        &*self.state
    }

    pub fn state_mut(&mut self) -> &mut InteractionState {
        &mut *self.state
    }
}

/// One line per visible item: text, facts, pictures, inputs and buttons.
pub fn render_text(node: &UiNode) -> String {
    let mut lines = Vec::new();
    outline(node, &mut lines);
    lines.join("\n")
}

fn outline(node: &UiNode, lines: &mut Vec<String>) {
    let Some(element) = node.as_element() else {
        return;
    };
    if let Some(line) = describe(node, element) {
        if !line.is_empty() {
            lines.push(line);
        }
        return;
    }
    for child in &element.children {
        outline(child, lines);
    }
}

fn describe(node: &UiNode, element: &UiElement) -> Option<String> {
    if let Some(id) = element.attr("data-button") {
        let state = if element.has_class("expanded") {
            " (expanded)"
        } else if element.has_class("subdued") {
            " (subdued)"
        } else {
            ""
        };
        return Some(format!("[{}] {}{}", id, node.text_content(), state));
    }
    if element.has_class("text") {
        return Some(node.text_content().trim().to_string());
    }
    if element.has_class("separator") {
        return Some("----".to_string());
    }
    match element.tag.as_str() {
        "table" => Some(
            element
                .element_children()
                .map(|row| {
                    row.element_children()
                        .map(|cell| cell.text_content())
                        .collect::<Vec<_>>()
                        .join(": ")
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        "img" => Some(format!(
            "[image: {}]",
            element
                .attr("alt")
                .or_else(|| element.attr("src"))
                .unwrap_or_default()
        )),
        "textarea" => Some(format!(
            "[text {}] {} = {}",
            element.attr("data-input").unwrap_or("?"),
            element.attr("placeholder").unwrap_or_default(),
            node.text_content()
        )),
        "select" => {
            let mut options = element.element_children();
            let title = options
                .next()
                .map(|placeholder| placeholder.text_content())
                .unwrap_or_default();
            let choices = options
                .map(|option| {
                    let text = option.text_content();
                    if option.attr("selected").is_some() {
                        format!("*{}", text)
                    } else {
                        text
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ");
            Some(format!(
                "[choice {}] {}: {}",
                element.attr("data-input").unwrap_or("?"),
                title,
                choices
            ))
        }
        "input" => {
            let id = element.attr("data-input").unwrap_or("?");
            let value = element.attr("value").unwrap_or_default();
            match element.attr("type") {
                Some("checkbox") => Some(format!(
                    "[{}] {} ({})",
                    if element.attr("checked").is_some() { "x" } else { " " },
                    element.attr("aria-label").unwrap_or_default(),
                    id
                )),
                Some("time") => Some(format!("[time] {}", value)),
                _ => Some(format!(
                    "[date {}] {} = {}",
                    id,
                    element.attr("placeholder").unwrap_or_default(),
                    value
                )),
            }
        }
        _ if element.has_class("toggleInputLabel") => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_and_text_are_listed_in_order() {
        let tree: UiNode = UiElement::new("div")
            .with_child(UiElement::new("div").with_class("text").with_text(" Hello "))
            .with_child(
                UiElement::new("div")
                    .with_class("linkButton")
                    .with_class("expanded")
                    .with_attr("data-button", "g0.1")
                    .with_text("Comment"),
            )
            .with_child(UiElement::new("div").with_class("separator"))
            .into();
        assert_eq!(render_text(&tree), "Hello\n[g0.1] Comment (expanded)\n----");
    }
}
