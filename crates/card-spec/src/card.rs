//! Card roots: the two document shapes and the operations a host performs on them.

use std::sync::OnceLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{ActionGroup, ButtonId, ClickOutcome, GroupId, InteractionState};
use crate::element::{
    Column, ColumnGroup, Container, Element, ElementKind, FactGroup, Picture, PictureGallery,
    TextBlock, parse_background_image,
};
use crate::error::{CardError, CardResult};
use crate::input::{Input, InputValues};
use crate::layout::{
    ActionButtonStyle, ContainerStyle, PictureStyle, Size, Spacing, TextColor, TextSize,
    TextWeight,
};
use crate::render::RenderContext;
use crate::scope::{ContainerScope, ParseContext};
use crate::ui::{UiElement, UiNode};
use crate::wire;

const BORDER: &str = "1px solid #F1F1F1";

fn theme_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^#?([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$")
            .expect("static pattern compiles")
    })
}

/// Hex digits of a usable theme color, without the leading `#`.
pub fn normalize_theme_color(value: &str) -> Option<&str> {
    let value = value.trim();
    if theme_color_pattern().is_match(value) {
        Some(value.trim_start_matches('#'))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CardShape {
    AdaptiveCard,
    MessageCard,
}

impl CardShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardShape::AdaptiveCard => "AdaptiveCard",
            CardShape::MessageCard => "MessageCard",
        }
    }

    pub fn default_button_style(&self) -> ActionButtonStyle {
        match self {
            CardShape::AdaptiveCard => ActionButtonStyle::Push,
            CardShape::MessageCard => ActionButtonStyle::Link,
        }
    }
}

/// A parsed card document.
#[derive(Debug)]
pub struct Card {
    shape: CardShape,
    summary: Option<String>,
    theme_color: Option<String>,
    root: Container,
    root_top_spacing: Spacing,
    group_count: usize,
}

/// Parses card text, dispatching on the document's `@type`.
pub fn parse_card(text: &str) -> CardResult<Card> {
    let json: Value = serde_json::from_str(text).map_err(CardError::InvalidJson)?;
    Card::parse(&json)
}

impl Card {
    pub fn parse(json: &Value) -> CardResult<Self> {
        match wire::type_name(json) {
            Some("AdaptiveCard") => Self::parse_adaptive(json),
            _ => Self::parse_message(json),
        }
    }

    /// Free-form shape: a background image and a list of generic sections.
    pub fn parse_adaptive(json: &Value) -> CardResult<Self> {
        let mut ctx = ParseContext::new();
        let mut root = Container::new(Vec::new());
        root.text_color = TextColor::Dark;
        root.background_image = parse_background_image(json);

        let outer = ContainerScope::root();
        let scope = outer.child(&root.forbidden, root.text_color);
        for section_json in wire::array(json, "sections") {
            let mut section = Element::from(Container::section());
            section.parse(section_json, &scope, &mut ctx)?;
            root.items.push(section);
        }
        log::debug!(
            "parsed AdaptiveCard with {} sections and {} action groups",
            root.items.len(),
            ctx.group_count()
        );

        Ok(Self {
            shape: CardShape::AdaptiveCard,
            summary: wire::string(json, "summary"),
            theme_color: None,
            root,
            root_top_spacing: Spacing::Default,
            group_count: ctx.group_count(),
        })
    }

    /// Connector-style shape: title, text, sections and top-level actions.
    pub fn parse_message(json: &Value) -> CardResult<Self> {
        let mut ctx = ParseContext::new();
        let mut root = Container::new(Vec::new());

        let outer = ContainerScope::root();
        let scope = outer.child(&root.forbidden, root.text_color);
        if let Some(title) = wire::string(json, "title") {
            root.items
                .push(TextBlock::new(title).with_text_size(TextSize::Large).into());
        }
        if let Some(text) = wire::string(json, "text") {
            root.items.push(TextBlock::new(text).into());
        }
        for (index, section_json) in wire::array(json, "sections").iter().enumerate() {
            let mut section = parse_section(section_json, &scope, &mut ctx)?;
            if index == 0 && root.items.is_empty() {
                section.base.top_spacing = Spacing::None;
            }
            root.items.push(section);
        }
        let actions = wire::array(json, "potentialAction");
        if !actions.is_empty() {
            let group = ActionGroup::from_actions(actions, &scope, &mut ctx)?;
            root.items.push(Element::new(ElementKind::ActionGroup(group)));
        }

        let theme_color = wire::string(json, "themeColor");
        log::debug!(
            "parsed MessageCard with {} root elements and {} action groups",
            root.items.len(),
            ctx.group_count()
        );
        Ok(Self {
            shape: CardShape::MessageCard,
            summary: wire::string(json, "summary"),
            theme_color,
            root,
            root_top_spacing: Spacing::None,
            group_count: ctx.group_count(),
        })
    }

    pub fn shape(&self) -> CardShape {
        self.shape
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn theme_color(&self) -> Option<&str> {
        self.theme_color.as_deref()
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn sections(&self) -> impl Iterator<Item = &Container> {
        self.root
            .items
            .iter()
            .filter_map(Element::as_container)
            .filter(|container| container.is_section())
    }

    pub fn visit<'a>(&'a self, visitor: &mut dyn FnMut(&'a Element)) {
        self.root.visit_elements(visitor);
    }

    pub fn find_group(&self, id: GroupId) -> Option<&ActionGroup> {
        let mut found = None;
        self.visit(&mut |element| {
            if let Some(group) = element.as_action_group()
                && group.id() == id
            {
                found = Some(group);
            }
        });
        found
    }

    /// Every input in document order, including those inside action cards.
    pub fn inputs(&self) -> Vec<&Input> {
        let mut inputs = Vec::new();
        self.visit(&mut |element| {
            if let Some(input) = element.as_input() {
                inputs.push(input);
            }
        });
        inputs
    }

    /// Current values of every input with an id; unset inputs read as empty.
    pub fn input_values(&self) -> InputValues {
        self.inputs()
            .into_iter()
            .filter_map(|input| {
                let id = input.id.clone()?;
                Some((id, input.value.clone().unwrap_or_default()))
            })
            .collect()
    }

    /// Returns false when no input has the given id.
    pub fn set_input_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let mut updated = false;
        self.root.visit_elements_mut(&mut |element| {
            if let ElementKind::Input(input) = &mut element.kind
                && input.id.as_deref() == Some(id)
            {
                input.value = Some(value.clone());
                updated = true;
            }
        });
        if !updated {
            log::warn!("no input with id '{}'", id);
        }
        updated
    }

    /// Renders with the shape's default button style.
    pub fn render(&self, state: &mut InteractionState) -> UiNode {
        self.render_with_style(state, self.shape.default_button_style())
    }

    pub fn render_with_style(
        &self,
        state: &mut InteractionState,
        button_style: ActionButtonStyle,
    ) -> UiNode {
        let mut ctx = RenderContext::new(button_style, state);
        let outer = ContainerScope::root();
        let mut root = self
            .root
            .render(&outer, &mut ctx)
            .unwrap_or_else(|| UiElement::new("div"));
        if self.root_top_spacing == Spacing::None {
            root.set_style("margin-top", "0px");
        }
        root.class_names = vec!["rootContainer".to_string()];

        match self.shape {
            CardShape::AdaptiveCard => root.into(),
            CardShape::MessageCard => {
                let mut frame = UiElement::new("div").with_class("messageCard");
                match self.theme_color.as_deref().map(|color| (color, normalize_theme_color(color))) {
                    Some((_, Some(hex))) => {
                        frame.set_style("border-top", BORDER);
                        frame.set_style("border-right", BORDER);
                        frame.set_style("border-bottom", BORDER);
                        frame.set_style("border-left", format!("3px solid #{}", hex));
                    }
                    Some((raw, None)) => {
                        log::warn!("ignoring invalid theme color '{}'", raw);
                        frame.set_style("border", BORDER);
                    }
                    None => frame.set_style("border", BORDER),
                }
                frame.with_child(root).into()
            }
        }
    }

    /// Routes a click to the group that owns the button.
    pub fn click(
        &self,
        state: &mut InteractionState,
        button: ButtonId,
    ) -> CardResult<ClickOutcome<'_>> {
        let group = self
            .find_group(button.group())
            .ok_or_else(|| CardError::UnknownButton(button.to_string()))?;
        group.click(state, button)
    }
}

/// Builds one connector-style section.
fn parse_section(
    json: &Value,
    parent: &ContainerScope<'_>,
    ctx: &mut ParseContext,
) -> CardResult<Element> {
    let mut section = Container::section();
    section.start_group = wire::flag(json, "startGroup");
    if wire::str_field(json, "style") == Some("emphasis") {
        section.style = ContainerStyle::Emphasis;
    }

    {
        let scope = parent.child(&section.forbidden, section.text_color);
        let items = &mut section.items;

        if let Some(title) = wire::string(json, "title") {
            items.push(TextBlock::new(title).with_text_size(TextSize::Medium).into());
        }
        if let Some(activity) = parse_activity(json) {
            items.push(Element::new(ElementKind::ColumnGroup(activity)));
        }
        if let Some(hero) = json.get("heroImage").filter(|hero| hero.is_object()) {
            items.push(Element::from(section_picture(hero)).with_size(Size::Auto));
        }
        if let Some(text) = wire::string(json, "text") {
            items.push(TextBlock::new(text).into());
        }
        if wire::has_value(json, "facts") {
            let facts = FactGroup::from_facts(wire::array(json, "facts"));
            items.push(Element::new(ElementKind::FactGroup(facts)));
        }
        if wire::has_value(json, "images") {
            let pictures = wire::array(json, "images")
                .iter()
                .map(|image| {
                    let mut picture = section_picture(image);
                    picture.height = 100;
                    let size = wire::str_field(image, "size")
                        .and_then(Size::parse)
                        .unwrap_or(Size::Large);
                    Element::from(picture).with_size(size)
                })
                .collect();
            items.push(Element::new(ElementKind::PictureGallery(
                PictureGallery::from_pictures(pictures),
            )));
        }
        let actions = wire::array(json, "potentialAction");
        if !actions.is_empty() {
            let group = ActionGroup::from_actions(actions, &scope, ctx)?;
            items.push(Element::new(ElementKind::ActionGroup(group)));
        }
    }

    // Generic container fields and free-form items follow the connector fields.
    let mut element = Element::from(section);
    element.parse(json, parent, ctx)?;
    Ok(element)
}

fn section_picture(json: &Value) -> Picture {
    Picture {
        url: wire::string(json, "image"),
        alt_text: wire::string(json, "title"),
        ..Picture::default()
    }
}

/// The activity header: optional person picture beside title, subtitle and text.
fn parse_activity(json: &Value) -> Option<ColumnGroup> {
    let keys = ["activityTitle", "activitySubtitle", "activityText", "activityImage"];
    if !keys.iter().any(|key| wire::has_value(json, key)) {
        return None;
    }

    let mut group = ColumnGroup::default();
    if let Some(url) = wire::string(json, "activityImage") {
        let mut picture = Picture::new(url);
        picture.style = wire::str_field(json, "activityImageStyle")
            .and_then(PictureStyle::parse)
            .unwrap_or(PictureStyle::Person);
        let size = wire::str_field(json, "activityImageSize")
            .and_then(Size::parse)
            .unwrap_or(Size::Small);
        let mut column = Column::new(Size::Auto);
        column.add_element(Element::from(picture).with_size(size));
        group.add_column(column);
    }

    let mut column = Column::new(Size::Stretch);
    if let Some(title) = wire::string(json, "activityTitle") {
        column.add_element(TextBlock::new(title).into());
    }
    if let Some(subtitle) = wire::string(json, "activitySubtitle") {
        let block = TextBlock::new(subtitle)
            .with_text_weight(TextWeight::Lighter)
            .subtle();
        column.add_element(Element::from(block).with_top_spacing(Spacing::None));
    }
    if let Some(text) = wire::string(json, "activityText") {
        column.add_element(Element::from(TextBlock::new(text)).with_top_spacing(Spacing::None));
    }
    group.add_column(column);
    Some(group)
}
