//! Lightweight markup for text blocks.
//!
//! Text is run through a CommonMark parser and turned into UI nodes. Raw HTML is kept
//! as literal text and every link opens in a new browsing context.

use std::sync::OnceLock;

use pulldown_cmark::{Event, Options, Parser, Tag};
use regex::Regex;

use crate::ui::{UiElement, UiNode};

fn unsafe_url() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(javascript|vbscript|data):").expect("static pattern compiles")
    })
}

/// Converts markup into a list of block nodes (usually paragraphs).
pub fn render_markup(text: &str) -> Vec<UiNode> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(text, options);

    let mut stack: Vec<UiElement> = vec![UiElement::new("root")];

    for event in parser {
        match event {
            Event::Start(tag) => stack.push(open_tag(&tag)),
            Event::End(_) => {
                if stack.len() > 1
                    && let Some(finished) = stack.pop()
                {
                    push_node(&mut stack, finished.into());
                }
            }
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                push_node(&mut stack, UiNode::text(text.to_string()));
            }
            Event::Code(code) => {
                push_node(&mut stack, UiElement::new("code").with_text(code.to_string()).into());
            }
            Event::SoftBreak => push_node(&mut stack, UiNode::text(" ")),
            Event::HardBreak => push_node(&mut stack, UiElement::new("br").into()),
            Event::Rule => push_node(&mut stack, UiElement::new("hr").into()),
            _ => {}
        }
    }

    // Unbalanced input cannot come out of the parser, but fold any leftovers anyway.
    while stack.len() > 1 {
        if let Some(finished) = stack.pop() {
            push_node(&mut stack, finished.into());
        }
    }

    stack.pop().map(|root| root.children).unwrap_or_default()
}

fn push_node(stack: &mut [UiElement], node: UiNode) {
    if let Some(top) = stack.last_mut() {
        top.push_child(node);
    }
}

fn open_tag(tag: &Tag<'_>) -> UiElement {
    match tag {
        Tag::Paragraph => UiElement::new("p"),
        Tag::Heading { level, .. } => UiElement::new(format!("h{}", *level as usize)),
        Tag::CodeBlock(_) => UiElement::new("pre"),
        Tag::List(Some(_)) => UiElement::new("ol"),
        Tag::List(None) => UiElement::new("ul"),
        Tag::Item => UiElement::new("li"),
        Tag::Emphasis => UiElement::new("em"),
        Tag::Strong => UiElement::new("strong"),
        Tag::Strikethrough => UiElement::new("del"),
        Tag::Link { dest_url, .. } => {
            if unsafe_url().is_match(dest_url) {
                log::warn!("dropping unsafe link target {}", dest_url);
                UiElement::new("span")
            } else {
                UiElement::new("a")
                    .with_attr("href", dest_url.to_string())
                    .with_attr("target", "_blank")
            }
        }
        _ => UiElement::new("span"),
    }
}
