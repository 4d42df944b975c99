//! Card elements: the polymorphic nodes of the visual tree.
//!
//! Every node shares an [`ElementBase`] (size, alignment, top spacing) and carries one
//! [`ElementKind`]. Nodes are created empty by [`Element::create`], populated once by
//! [`Element::parse`] and rendered on demand by [`Element::internal_render`].

mod container;
mod fact;
mod picture;
mod text;

pub use container::{Column, ColumnGroup, ColumnSize, Container};
pub(crate) use container::parse_background_image;
pub use fact::{Fact, FactGroup};
pub use picture::{Picture, PictureGallery};
pub use text::TextBlock;

use serde_json::Value;

use crate::action::ActionGroup;
use crate::error::{CardError, CardResult};
use crate::input::Input;
use crate::layout::{ContainerStyle, HorizontalAlignment, Size, Spacing};
use crate::render::RenderContext;
use crate::scope::{ContainerScope, ParseContext};
use crate::ui::UiElement;
use crate::wire;

/// Attributes shared by every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementBase {
    pub size: Size,
    pub horizontal_alignment: HorizontalAlignment,
    pub top_spacing: Spacing,
}

impl ElementBase {
    pub(crate) fn parse(&mut self, json: &Value) {
        if let Some(size) = wire::str_field(json, "size").and_then(Size::parse) {
            self.size = size;
        }
        if let Some(alignment) =
            wire::str_field(json, "horizontalAlignment").and_then(HorizontalAlignment::parse)
        {
            self.horizontal_alignment = alignment;
        }
        if wire::str_field(json, "topSpacing") == Some("none") {
            self.top_spacing = Spacing::None;
        }
    }
}

#[derive(Debug)]
pub enum ElementKind {
    TextBlock(TextBlock),
    Picture(Picture),
    PictureGallery(PictureGallery),
    FactGroup(FactGroup),
    Separator,
    Container(Container),
    ColumnGroup(ColumnGroup),
    ActionGroup(ActionGroup),
    Input(Input),
}

#[derive(Debug)]
pub struct Element {
    pub base: ElementBase,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            base: ElementBase::default(),
            kind,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.base.size = size;
        self
    }

    pub fn with_top_spacing(mut self, spacing: Spacing) -> Self {
        self.base.top_spacing = spacing;
        self
    }

    /// Element factory keyed by the `@type` discriminator.
    pub fn create(type_name: &str) -> CardResult<Self> {
        let element = match type_name {
            "TextBlock" => Element::new(ElementKind::TextBlock(TextBlock::default())),
            "Picture" => Element::new(ElementKind::Picture(Picture::default())),
            "PictureGallery" => Element::new(ElementKind::PictureGallery(PictureGallery::default())),
            "ActionGroup" => Element::new(ElementKind::ActionGroup(ActionGroup::default())),
            "FactGroup" => Element::new(ElementKind::FactGroup(FactGroup::default())),
            "Separator" => Element::new(ElementKind::Separator),
            "ColumnGroup" => Element::new(ElementKind::ColumnGroup(ColumnGroup::default())),
            "Container" => Element::new(ElementKind::Container(Container::new(Vec::new()))),
            "Section" => Element::new(ElementKind::Container(Container::section())),
            "TextInput" | "DateInput" | "MultichoiceInput" | "ToggleInput" => {
                Input::create(type_name)?
            }
            other => return Err(CardError::UnknownElementType(other.to_string())),
        };
        Ok(element)
    }

    /// Creates and parses the element described by `json`.
    pub fn from_json(
        json: &Value,
        scope: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<Self> {
        let type_name = wire::type_name(json).unwrap_or(wire::MISSING_TYPE);
        let mut element = Element::create(type_name)?;
        element.parse(json, scope, ctx)?;
        Ok(element)
    }

    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::TextBlock(_) => "TextBlock",
            ElementKind::Picture(_) => "Picture",
            ElementKind::PictureGallery(_) => "PictureGallery",
            ElementKind::FactGroup(_) => "FactGroup",
            ElementKind::Separator => "Separator",
            ElementKind::Container(container) if container.is_section() => "Section",
            ElementKind::Container(_) => "Container",
            ElementKind::ColumnGroup(_) => "ColumnGroup",
            ElementKind::ActionGroup(_) => "ActionGroup",
            ElementKind::Input(input) => input.type_name(),
        }
    }

    pub fn parse(
        &mut self,
        json: &Value,
        scope: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<()> {
        self.base.parse(json);
        match &mut self.kind {
            ElementKind::TextBlock(text) => text.parse(json),
            ElementKind::Picture(picture) => picture.parse(json),
            ElementKind::PictureGallery(gallery) => gallery.parse(json),
            ElementKind::FactGroup(facts) => facts.parse(json),
            ElementKind::Separator => {}
            ElementKind::Container(container) => container.parse(json, scope, ctx)?,
            ElementKind::ColumnGroup(columns) => columns.parse(json, scope, ctx)?,
            ElementKind::ActionGroup(group) => group.parse(json, scope, ctx)?,
            ElementKind::Input(input) => input.parse(json),
        }
        Ok(())
    }

    /// The bare UI node for this element, or nothing when there is no visible content.
    pub fn render(
        &self,
        scope: &ContainerScope<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Option<UiElement> {
        match &self.kind {
            ElementKind::TextBlock(text) => text.render(scope),
            ElementKind::Picture(picture) => picture.render(self.base.size),
            ElementKind::PictureGallery(gallery) => gallery.render(scope, ctx),
            ElementKind::FactGroup(facts) => facts.render(scope, ctx),
            ElementKind::Separator => Some(UiElement::new("div").with_class("separator")),
            ElementKind::Container(container) => container.render(scope, ctx),
            ElementKind::ColumnGroup(columns) => columns.render(scope, ctx),
            ElementKind::ActionGroup(group) => Some(group.render(scope, ctx)),
            ElementKind::Input(input) => Some(input.render()),
        }
    }

    /// Renders and applies the shared layout rules.
    pub fn internal_render(
        &self,
        scope: &ContainerScope<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Option<UiElement> {
        let mut element = self.render(scope, ctx)?;
        self.adjust_layout(&mut element);
        if self.base.top_spacing == Spacing::None {
            self.remove_top_spacing(&mut element);
        }
        Some(element)
    }

    fn adjust_layout(&self, element: &mut UiElement) {
        if self.uses_default_sizing() {
            match self.base.size {
                Size::Stretch => element.add_class("stretch"),
                Size::Small => element.add_class("smallSize"),
                Size::Medium => element.add_class("mediumSize"),
                Size::Large => element.add_class("largeSize"),
                Size::Auto => {}
            }
        }
        match self.base.horizontal_alignment {
            HorizontalAlignment::Center => element.set_style("text-align", "center"),
            HorizontalAlignment::Right => element.set_style("text-align", "right"),
            HorizontalAlignment::Left => {}
        }
        if self.hides_overflow() {
            element.set_style("overflow", "hidden");
        }
    }

    fn uses_default_sizing(&self) -> bool {
        !matches!(self.kind, ElementKind::Picture(_))
    }

    fn hides_overflow(&self) -> bool {
        !matches!(
            self.kind,
            ElementKind::Container(_) | ElementKind::ActionGroup(_)
        )
    }

    pub(crate) fn remove_top_spacing(&self, element: &mut UiElement) {
        match self.kind {
            ElementKind::TextBlock(_) => element.set_style("padding-top", "0px"),
            _ => element.set_style("margin-top", "0px"),
        }
    }

    /// Two adjacent emphasis containers share their spacing.
    pub(crate) fn should_remove_top_spacing_after(&self, previous: Option<&Element>) -> bool {
        match (&self.kind, previous.map(|element| &element.kind)) {
            (ElementKind::Container(current), Some(ElementKind::Container(previous))) => {
                current.style == ContainerStyle::Emphasis
                    && previous.style == ContainerStyle::Emphasis
            }
            _ => false,
        }
    }

    /// Depth-first walk over this element and everything nested in it, including the
    /// content of action cards.
    pub fn visit<'a>(&'a self, visitor: &mut dyn FnMut(&'a Element)) {
        visitor(self);
        match &self.kind {
            ElementKind::Container(container) => container.visit_elements(visitor),
            ElementKind::ColumnGroup(columns) => {
                for column in &columns.columns {
                    column.container.visit_elements(visitor);
                }
            }
            ElementKind::PictureGallery(gallery) => {
                for item in &gallery.items {
                    item.visit(visitor);
                }
            }
            ElementKind::ActionGroup(group) => {
                for action in &group.actions {
                    action.visit_elements(visitor);
                }
            }
            _ => {}
        }
    }

    pub fn visit_mut(&mut self, visitor: &mut dyn FnMut(&mut Element)) {
        visitor(self);
        match &mut self.kind {
            ElementKind::Container(container) => container.visit_elements_mut(visitor),
            ElementKind::ColumnGroup(columns) => {
                for column in &mut columns.columns {
                    column.container.visit_elements_mut(visitor);
                }
            }
            ElementKind::PictureGallery(gallery) => {
                for item in &mut gallery.items {
                    item.visit_mut(visitor);
                }
            }
            ElementKind::ActionGroup(group) => {
                for action in &mut group.actions {
                    action.visit_elements_mut(visitor);
                }
            }
            _ => {}
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match &self.kind {
            ElementKind::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn as_action_group(&self) -> Option<&ActionGroup> {
        match &self.kind {
            ElementKind::ActionGroup(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_input(&self) -> Option<&Input> {
        match &self.kind {
            ElementKind::Input(input) => Some(input),
            _ => None,
        }
    }
}

impl From<TextBlock> for Element {
    fn from(text: TextBlock) -> Self {
        Element::new(ElementKind::TextBlock(text))
    }
}

impl From<Picture> for Element {
    fn from(picture: Picture) -> Self {
        Element::new(ElementKind::Picture(picture))
    }
}

impl From<Container> for Element {
    fn from(container: Container) -> Self {
        Element::new(ElementKind::Container(container))
    }
}
