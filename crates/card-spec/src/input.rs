//! Input elements: editable controls whose values the host reads back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::{Element, ElementKind};
use crate::error::{CardError, CardResult};
use crate::layout::Size;
use crate::ui::UiElement;
use crate::wire;

/// Current input values keyed by input id.
pub type InputValues = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub display: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Text {
        is_multiline: bool,
        max_length: Option<u32>,
    },
    Multichoice {
        choices: Vec<Choice>,
    },
    Date {
        include_time: bool,
    },
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub id: Option<String>,
    pub title: Option<String>,
    pub value: Option<String>,
    pub is_required: bool,
    pub kind: InputKind,
}

impl Input {
    pub fn new(kind: InputKind) -> Self {
        Self {
            id: None,
            title: None,
            value: None,
            is_required: false,
            kind,
        }
    }

    /// Input factory. Returns the element wrapper with the type's default size.
    pub fn create(type_name: &str) -> CardResult<Element> {
        let (kind, size) = match type_name {
            "TextInput" => (
                InputKind::Text {
                    is_multiline: false,
                    max_length: None,
                },
                Size::Stretch,
            ),
            "MultichoiceInput" => (
                InputKind::Multichoice {
                    choices: Vec::new(),
                },
                Size::Medium,
            ),
            "DateInput" => (InputKind::Date { include_time: false }, Size::Medium),
            "ToggleInput" => (InputKind::Toggle, Size::Auto),
            other => return Err(CardError::UnknownInputType(other.to_string())),
        };
        Ok(Element::new(ElementKind::Input(Input::new(kind))).with_size(size))
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            InputKind::Text { .. } => "TextInput",
            InputKind::Multichoice { .. } => "MultichoiceInput",
            InputKind::Date { .. } => "DateInput",
            InputKind::Toggle => "ToggleInput",
        }
    }

    pub(crate) fn parse(&mut self, json: &Value) {
        self.id = wire::string(json, "id");
        self.title = wire::string(json, "title");
        self.value = match json.get("value") {
            Some(Value::String(value)) => Some(value.clone()),
            Some(Value::Bool(flag)) => Some(flag.to_string()),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        };
        self.is_required = wire::flag(json, "isRequired");

        match &mut self.kind {
            InputKind::Text {
                is_multiline,
                max_length,
            } => {
                *is_multiline = wire::flag(json, "isMultiline");
                *max_length = json
                    .get("maxLength")
                    .and_then(Value::as_u64)
                    .and_then(|length| u32::try_from(length).ok());
            }
            InputKind::Multichoice { choices } => {
                choices.extend(wire::array(json, "choices").iter().map(|choice| Choice {
                    display: wire::string(choice, "display").unwrap_or_default(),
                    value: wire::string(choice, "value").unwrap_or_default(),
                }));
            }
            InputKind::Date { include_time } => {
                *include_time = wire::flag(json, "includeTime");
            }
            InputKind::Toggle => {}
        }
    }

    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    fn bind(&self, control: &mut UiElement) {
        if let Some(id) = &self.id {
            control.set_attr("data-input", id.clone());
        }
        if self.is_required {
            control.set_attr("required", "required");
        }
    }

    /// Renders the control for the current value. Never mutates the value.
    pub(crate) fn render(&self) -> UiElement {
        match &self.kind {
            InputKind::Text {
                is_multiline,
                max_length,
            } => {
                let mut element = UiElement::new("textarea")
                    .with_class("input")
                    .with_class("textInput")
                    .with_attr("placeholder", self.title());
                if *is_multiline {
                    element.add_class("multiline");
                }
                if let Some(max) = max_length {
                    element.set_attr("maxlength", max.to_string());
                }
                self.bind(&mut element);
                if let Some(value) = self.value.as_deref().filter(|v| !v.is_empty()) {
                    element.push_child(crate::ui::UiNode::text(value));
                }
                element
            }
            InputKind::Multichoice { choices } => {
                let selected = self
                    .value
                    .as_deref()
                    .filter(|value| choices.iter().any(|choice| choice.value == *value));
                let mut placeholder = UiElement::new("option")
                    .with_attr("disabled", "disabled")
                    .with_attr("hidden", "hidden")
                    .with_text(self.title());
                if selected.is_none() {
                    placeholder.set_attr("selected", "selected");
                }
                let mut element = UiElement::new("select")
                    .with_class("input")
                    .with_class("multichoiceInput")
                    .with_child(placeholder);
                self.bind(&mut element);
                for choice in choices {
                    let mut option = UiElement::new("option")
                        .with_attr("value", choice.value.clone())
                        .with_text(choice.display.clone());
                    if selected == Some(choice.value.as_str()) {
                        option.set_attr("selected", "selected");
                    }
                    element.push_child(option);
                }
                element
            }
            InputKind::Date { include_time } => {
                let (date, time) = match self.value.as_deref() {
                    Some(value) => match value.split_once('T') {
                        Some((date, time)) => (date, time),
                        None => (value, ""),
                    },
                    None => ("", ""),
                };
                let mut picker = UiElement::new("input")
                    .with_class("dateInput")
                    .with_attr("type", "date")
                    .with_attr("placeholder", self.title());
                self.bind(&mut picker);
                if !date.is_empty() {
                    picker.set_attr("value", date);
                }
                let mut element = UiElement::new("div")
                    .with_class("input")
                    .with_style("display", "flex");
                if *include_time {
                    picker.set_style("flex", "1 1 67%");
                    let mut time_picker = UiElement::new("input")
                        .with_class("timeInput")
                        .with_attr("type", "time")
                        .with_style("flex", "1 1 33%");
                    if !time.is_empty() {
                        time_picker.set_attr("value", time);
                    }
                    element.push_child(picker);
                    element.push_child(time_picker);
                } else {
                    picker.set_style("flex", "1 1 100%");
                    element.push_child(picker);
                }
                element
            }
            InputKind::Toggle => {
                let mut checkbox = UiElement::new("input")
                    .with_class("input")
                    .with_class("toggleInput")
                    .with_attr("type", "checkbox")
                    .with_attr("aria-label", self.title());
                self.bind(&mut checkbox);
                if self.value.as_deref() == Some("true") {
                    checkbox.set_attr("checked", "checked");
                }
                UiElement::new("div").with_child(checkbox).with_child(
                    UiElement::new("div")
                        .with_class("toggleInputLabel")
                        .with_text(self.title()),
                )
            }
        }
    }
}
