use serde_json::Value;

use super::{Element, ElementKind};
use crate::layout::{PictureStyle, Size};
use crate::render::RenderContext;
use crate::scope::ContainerScope;
use crate::ui::UiElement;
use crate::wire;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Picture {
    pub url: Option<String>,
    pub alt_text: Option<String>,
    pub style: PictureStyle,
    /// Fixed pixel height; zero keeps size-based sizing.
    pub height: u32,
}

impl Picture {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub(crate) fn parse(&mut self, json: &Value) {
        self.url = wire::string(json, "url");
        self.alt_text = wire::string(json, "altText");
        self.style = wire::str_field(json, "style")
            .and_then(PictureStyle::parse)
            .unwrap_or_default();
        self.height = json
            .get("height")
            .and_then(Value::as_u64)
            .and_then(|height| u32::try_from(height).ok())
            .unwrap_or(0);
    }

    pub(crate) fn render(&self, size: Size) -> Option<UiElement> {
        let url = self.url.as_deref().filter(|url| !url.is_empty())?;

        let mut element = UiElement::new("img").with_class("picture");
        if self.style == PictureStyle::Person {
            element.add_class("person");
        }
        if self.height == 0 {
            element.add_class(match size {
                Size::Auto => "autoSize",
                Size::Stretch => "stretch",
                Size::Small => "small",
                Size::Medium => "medium",
                Size::Large => "large",
            });
        } else {
            element.set_style("height", format!("{}px", self.height));
        }
        if let Some(alt) = &self.alt_text {
            element.set_attr("alt", alt.clone());
        }
        element.set_attr("src", url);
        Some(element)
    }
}

/// A row of pictures sharing one size.
#[derive(Debug)]
pub struct PictureGallery {
    pub picture_size: Size,
    /// Picture elements, in display order.
    pub items: Vec<Element>,
}

impl Default for PictureGallery {
    fn default() -> Self {
        Self {
            picture_size: Size::Medium,
            items: Vec::new(),
        }
    }
}

impl PictureGallery {
    pub fn from_pictures(pictures: Vec<Element>) -> Self {
        Self {
            items: pictures,
            ..Self::default()
        }
    }

    pub(crate) fn parse(&mut self, json: &Value) {
        self.picture_size = wire::str_field(json, "imageSize")
            .and_then(Size::parse)
            .unwrap_or(Size::Medium);
        for url in wire::array(json, "items").iter().filter_map(Value::as_str) {
            let picture = Element::new(ElementKind::Picture(Picture::new(url)));
            self.items.push(picture.with_size(self.picture_size));
        }
    }

    pub(crate) fn render(
        &self,
        scope: &ContainerScope<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Option<UiElement> {
        let mut element = UiElement::new("div").with_class("pictureGallery");
        for item in &self.items {
            // Pictures without a URL are skipped rather than leaving a gap.
            if let Some(mut picture) = item.internal_render(scope, ctx) {
                picture.set_style("margin", "0px");
                picture.set_style("margin-right", "10px");
                element.push_child(picture);
            }
        }
        if element.children.is_empty() {
            return None;
        }
        Some(element)
    }
}
