use serde_json::Value;

use super::{Element, ElementKind};
use crate::action::InteractionState;
use crate::card::normalize_theme_color;
use crate::error::{CardError, CardResult};
use crate::layout::{ContainerStyle, Size, TextColor};
use crate::render::RenderContext;
use crate::scope::{ContainerScope, ParseContext};
use crate::ui::UiElement;
use crate::wire;

/// An ordered stack of child elements with an optional containment policy.
#[derive(Debug, Default)]
pub struct Container {
    pub items: Vec<Element>,
    pub(crate) forbidden: Vec<String>,
    pub background_image: Option<String>,
    pub background_color: Option<String>,
    pub text_color: TextColor,
    pub style: ContainerStyle,
    pub start_group: bool,
}

impl Container {
    pub fn new(forbidden: Vec<String>) -> Self {
        Self {
            forbidden,
            ..Self::default()
        }
    }

    /// A container that may not hold nested sections.
    pub fn section() -> Self {
        Self::new(vec!["Section".to_string()])
    }

    pub fn is_section(&self) -> bool {
        self.forbids("Section")
    }

    pub fn forbids(&self, element_type: &str) -> bool {
        self.forbidden.iter().any(|name| name == element_type)
    }

    pub fn forbidden_item_types(&self) -> &[String] {
        &self.forbidden
    }

    /// Scope seen by this container's children.
    pub fn scope<'b>(&'b self, parent: &'b ContainerScope<'_>) -> ContainerScope<'b> {
        parent.child(&self.forbidden, self.text_color)
    }

    pub fn add_element(&mut self, element: Element) {
        self.items.push(element);
    }

    pub(crate) fn parse(
        &mut self,
        json: &Value,
        parent: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<()> {
        if let Some(url) = parse_background_image(json) {
            self.background_image = Some(url);
        }
        if let Some(color) = parse_background_color(json) {
            self.background_color = Some(color);
        }
        self.text_color = wire::str_field(json, "textColor")
            .and_then(TextColor::parse)
            .unwrap_or_default();
        if let Some(style) = wire::str_field(json, "style").and_then(ContainerStyle::parse) {
            self.style = style;
        }
        if wire::flag(json, "startGroup") {
            self.start_group = true;
        }

        let scope = parent.child(&self.forbidden, self.text_color);
        for item in wire::array(json, "items") {
            let type_name = wire::type_name(item).unwrap_or(wire::MISSING_TYPE);
            if !scope.is_allowed_item_type(type_name) {
                return Err(CardError::ContainmentViolation {
                    element_type: type_name.to_string(),
                });
            }
            let mut element = Element::create(type_name)?;
            element.parse(item, &scope, ctx)?;
            log::debug!(
                "parsed {} at depth {}",
                element.type_name(),
                scope.depth()
            );
            self.items.push(element);
        }
        Ok(())
    }

    pub(crate) fn render(
        &self,
        parent: &ContainerScope<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Option<UiElement> {
        let scope = self.scope(parent);
        let mut element = UiElement::new("div").with_class("card-container");
        if self.start_group {
            element.add_class("startGroup");
        }
        if self.style == ContainerStyle::Emphasis {
            element.add_class("emphasis");
        }
        if let Some(color) = self.background_color.as_deref().and_then(css_color) {
            element.set_style("background-color", color);
        }

        let mut previous: Option<&Element> = None;
        for item in &self.items {
            if let Some(mut rendered) = item.internal_render(&scope, ctx) {
                if element.children.is_empty() || item.should_remove_top_spacing_after(previous) {
                    item.remove_top_spacing(&mut rendered);
                }
                element.push_child(rendered);
            }
            previous = Some(item);
        }
        if element.children.is_empty() {
            return None;
        }

        if let Some(url) = self.background_image.as_deref().and_then(css_url) {
            element.set_style("background-image", format!("url(\"{}\")", url));
            element.set_style("background-repeat", "no-repeat");
            element.set_style("background-size", "cover");
        }
        if self.hides_bottom_spacer(ctx.state()) {
            element.set_style("padding-bottom", "0px");
        }
        Some(element)
    }

    /// True when the last child is an open action pane, directly or through a
    /// normal-style nested container.
    pub(crate) fn hides_bottom_spacer(&self, state: &InteractionState) -> bool {
        match self.items.last().map(|item| &item.kind) {
            Some(ElementKind::ActionGroup(group)) => group.is_pane_open(state),
            Some(ElementKind::Container(inner)) => {
                inner.style == ContainerStyle::Normal && inner.hides_bottom_spacer(state)
            }
            _ => false,
        }
    }

    pub(crate) fn visit_elements<'a>(&'a self, visitor: &mut dyn FnMut(&'a Element)) {
        for item in &self.items {
            item.visit(visitor);
        }
    }

    pub(crate) fn visit_elements_mut(&mut self, visitor: &mut dyn FnMut(&mut Element)) {
        for item in &mut self.items {
            item.visit_mut(visitor);
        }
    }
}

/// Hex colors only, always with a leading `#`.
fn css_color(value: &str) -> Option<String> {
    normalize_theme_color(value).map(|hex| format!("#{}", hex))
}

/// URLs that cannot escape the `url("...")` wrapper.
fn css_url(value: &str) -> Option<&str> {
    let value = value.trim();
    let breaks_out = value
        .chars()
        .any(|c| matches!(c, '"' | '\'' | '(' | ')' | ';' | '\\') || c.is_control());
    (!value.is_empty() && !breaks_out).then_some(value)
}

pub(crate) fn parse_background_image(json: &Value) -> Option<String> {
    let raw = wire::str_field(json, "backgroundImage").filter(|v| !v.trim().is_empty())?;
    let url = css_url(raw);
    if url.is_none() {
        log::warn!("dropping backgroundImage '{}': not a plain URL", raw);
    }
    url.map(str::to_string)
}

pub(crate) fn parse_background_color(json: &Value) -> Option<String> {
    let raw = wire::str_field(json, "backgroundColor").filter(|v| !v.trim().is_empty())?;
    let color = css_color(raw);
    if color.is_none() {
        log::warn!("dropping backgroundColor '{}': not a hex color", raw);
    }
    color
}

/// Width policy of a column. A numeric weight wins over a named size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnSize {
    Named(Size),
    Weight(f64),
}

impl ColumnSize {
    fn parse(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::Number(number) => number.as_f64().and_then(Self::weight),
            Value::String(text) => Size::parse(text)
                .map(ColumnSize::Named)
                .or_else(|| text.trim().parse().ok().and_then(Self::weight)),
            _ => None,
        }
    }

    fn weight(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(ColumnSize::Weight(value))
    }

    fn flex(self) -> String {
        match self {
            ColumnSize::Weight(weight) => format!("1 1 {}%", weight),
            ColumnSize::Named(Size::Stretch) => "1 1 auto".to_string(),
            ColumnSize::Named(_) => "0 0 auto".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Column {
    pub size: ColumnSize,
    pub container: Container,
}

impl Column {
    pub fn new(size: Size) -> Self {
        Self {
            size: ColumnSize::Named(size),
            container: Container::new(vec!["ColumnGroup".to_string(), "ActionGroup".to_string()]),
        }
    }

    pub fn add_element(&mut self, element: Element) {
        self.container.add_element(element);
    }

    pub(crate) fn parse(
        &mut self,
        json: &Value,
        scope: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<()> {
        self.container.parse(json, scope, ctx)?;
        if let Some(size) = ColumnSize::parse(json.get("size")) {
            self.size = size;
        }
        Ok(())
    }

    /// Columns never carry top spacing and use a flex rule instead of size classes.
    pub(crate) fn internal_render(
        &self,
        scope: &ContainerScope<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Option<UiElement> {
        let mut element = self.container.render(scope, ctx)?;
        element.set_style("flex", self.size.flex());
        element.set_style("margin-top", "0px");
        Some(element)
    }
}

/// Columns laid out left to right.
#[derive(Debug, Default)]
pub struct ColumnGroup {
    pub columns: Vec<Column>,
}

impl ColumnGroup {
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub(crate) fn parse(
        &mut self,
        json: &Value,
        scope: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<()> {
        for item in wire::array(json, "items") {
            let mut column = Column::new(Size::Auto);
            column.parse(item, scope, ctx)?;
            self.columns.push(column);
        }
        Ok(())
    }

    pub(crate) fn render(
        &self,
        scope: &ContainerScope<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Option<UiElement> {
        let mut element = UiElement::new("div")
            .with_class("columnGroup")
            .with_style("display", "flex");
        for column in &self.columns {
            let Some(rendered) = column.internal_render(scope, ctx) else {
                continue;
            };
            if !element.children.is_empty() {
                element.push_child(
                    UiElement::new("div")
                        .with_class("columnSpacer")
                        .with_style("flex", "0 0 auto"),
                );
            }
            element.push_child(rendered);
        }
        if element.children.is_empty() {
            return None;
        }
        Some(element)
    }
}
