use serde_json::Value;

use crate::layout::{TextColor, TextSize, TextWeight};
use crate::markdown::render_markup;
use crate::scope::ContainerScope;
use crate::ui::UiElement;
use crate::wire;

/// A block of lightly formatted text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: Option<String>,
    pub text_size: TextSize,
    pub text_weight: TextWeight,
    pub text_color: TextColor,
    pub is_subtle: bool,
    pub wrap: bool,
}

impl Default for TextBlock {
    fn default() -> Self {
        Self {
            text: None,
            text_size: TextSize::Normal,
            text_weight: TextWeight::Normal,
            text_color: TextColor::Default,
            is_subtle: false,
            wrap: true,
        }
    }
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_text_size(mut self, size: TextSize) -> Self {
        self.text_size = size;
        self
    }

    pub fn with_text_weight(mut self, weight: TextWeight) -> Self {
        self.text_weight = weight;
        self
    }

    pub fn subtle(mut self) -> Self {
        self.is_subtle = true;
        self
    }

    pub(crate) fn parse(&mut self, json: &Value) {
        self.text = wire::string(json, "text");
        self.text_size = wire::str_field(json, "textSize")
            .and_then(TextSize::parse)
            .unwrap_or_default();
        self.text_weight = wire::str_field(json, "textWeight")
            .and_then(TextWeight::parse)
            .unwrap_or_default();
        self.text_color = wire::str_field(json, "textColor")
            .and_then(TextColor::parse)
            .unwrap_or_default();
        self.is_subtle = wire::flag(json, "isSubtle");
        self.wrap = json.get("wrap").and_then(Value::as_bool).unwrap_or(true);
    }

    pub(crate) fn render(&self, scope: &ContainerScope<'_>) -> Option<UiElement> {
        let text = self.text.as_deref().filter(|text| !text.is_empty())?;

        let color = match self.text_color {
            TextColor::Default => scope.text_color(),
            explicit => explicit,
        };
        let mut element = UiElement::new("div")
            .with_class("text")
            .with_class(self.text_size.css_class())
            .with_class(color.css_class());
        if self.is_subtle {
            element.add_class("subtle");
        }
        element.add_class(self.text_weight.css_class());

        element.children = render_markup(text);
        if let Some(first) = element.first_element_child_mut() {
            first.set_style("margin-top", "0px");
        }
        if let Some(last) = element.last_element_child_mut() {
            last.set_style("margin-bottom", "0px");
        }

        if !self.wrap {
            element.set_style("white-space", "nowrap");
            element.set_style("text-overflow", "ellipsis");
        }
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_text_renders_nothing() {
        let scope = ContainerScope::root();
        assert!(TextBlock::default().render(&scope).is_none());
        assert!(TextBlock::new("").render(&scope).is_none());
    }

    #[test]
    fn classes_encode_size_color_subtlety_and_weight() {
        let scope = ContainerScope::root();
        let mut block = TextBlock::default();
        block.parse(&json!({
            "text": "Hello",
            "textSize": "extraLarge",
            "textWeight": "bolder",
            "isSubtle": true
        }));
        let rendered = block.render(&scope).unwrap();
        assert_eq!(
            rendered.class_names,
            vec!["text", "extraLarge", "darkColor", "subtle", "bolder"]
        );
    }

    #[test]
    fn explicit_color_wins_over_inherited() {
        let root = ContainerScope::root();
        let light = root.child(&[], TextColor::Light);
        let inherited = TextBlock::new("a").render(&light).unwrap();
        assert!(inherited.has_class("lightColor"));
        let mut accent = TextBlock::new("a");
        accent.text_color = TextColor::Accent;
        assert!(accent.render(&light).unwrap().has_class("accentColor"));
    }

    #[test]
    fn wrap_defaults_on_and_can_be_disabled() {
        let scope = ContainerScope::root();
        let mut block = TextBlock::default();
        block.parse(&json!({"text": "long line"}));
        assert!(block.wrap);
        assert_eq!(block.render(&scope).unwrap().style("white-space"), None);

        block.parse(&json!({"text": "long line", "wrap": false}));
        let rendered = block.render(&scope).unwrap();
        assert_eq!(rendered.style("white-space"), Some("nowrap"));
        assert_eq!(rendered.style("text-overflow"), Some("ellipsis"));
    }

    #[test]
    fn paragraph_margins_are_trimmed() {
        let scope = ContainerScope::root();
        let rendered = TextBlock::new("first\n\nsecond").render(&scope).unwrap();
        let paragraphs: Vec<_> = rendered.element_children().collect();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].style("margin-top"), Some("0px"));
        assert_eq!(paragraphs[1].style("margin-bottom"), Some("0px"));
    }
}
