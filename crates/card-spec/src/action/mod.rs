//! Actions: what a card lets the user do, and the requests the host performs for them.

mod group;

pub use group::{
    ActionButton, ActionGroup, ActionGroupState, ButtonId, ClickOutcome, GroupId,
    InteractionState, Transition,
};

use handlebars::Handlebars;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::element::{Container, Element};
use crate::error::{CardError, CardResult};
use crate::input::{Input, InputValues};
use crate::layout::{ActionButtonState, ActionButtonStyle, Spacing};
use crate::render::RenderContext;
use crate::scope::{ContainerScope, ParseContext};
use crate::ui::UiElement;
use crate::wire;

/// Action types an action card may nest; anything else is dropped.
const ACTION_CARD_ALLOWED_TYPES: &[&str] = &["OpenUri", "HttpPOST"];

/// Target os used for legacy single-target actions.
pub const DEFAULT_OS: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetUri {
    pub os: String,
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenUri {
    pub targets: Vec<TargetUri>,
}

impl OpenUri {
    fn parse(&mut self, json: &Value) {
        let targets = wire::array(json, "targets");
        if !targets.is_empty() {
            self.targets.extend(targets.iter().map(|target| TargetUri {
                os: wire::string(target, "os").unwrap_or_else(|| DEFAULT_OS.to_string()),
                uri: wire::string(target, "uri").unwrap_or_default(),
            }));
            return;
        }
        let legacy = match json.get("target") {
            Some(Value::String(uri)) => vec![uri.as_str()],
            Some(Value::Array(uris)) => uris.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        self.targets.extend(legacy.into_iter().map(|uri| TargetUri {
            os: DEFAULT_OS.to_string(),
            uri: uri.to_string(),
        }));
    }

    /// Target for `os`, then the default target, then the first one.
    pub fn target_for(&self, os: &str) -> Option<&TargetUri> {
        self.targets
            .iter()
            .find(|target| target.os == os)
            .or_else(|| self.targets.iter().find(|target| target.os == DEFAULT_OS))
            .or_else(|| self.targets.first())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpPost {
    pub target: Option<String>,
    pub body: Option<String>,
    pub body_content_type: Option<String>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

impl HttpPost {
    fn parse(&mut self, json: &Value) {
        self.target = wire::string(json, "target");
        self.body = wire::string(json, "body");
        self.body_content_type = wire::string(json, "bodyContentType");
        self.success_message = wire::string(json, "successMessage");
        self.error_message = wire::string(json, "errorMessage");
    }

    /// Resolves `{{<id>.value}}` placeholders in the body from the current inputs.
    pub fn resolve_body(&self, inputs: &InputValues) -> CardResult<String> {
        let Some(template) = self.body.as_deref() else {
            return Ok(String::new());
        };
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        let data: Map<String, Value> = inputs
            .iter()
            .map(|(id, value)| (id.clone(), json!({ "value": value })))
            .collect();
        Ok(registry.render_template(template, &Value::Object(data))?)
    }
}

/// An action that shows its own UI (a nested card or a list of inputs) in the pane.
#[derive(Debug, Default)]
pub struct ActionCard {
    pub card: Option<Box<Element>>,
    pub inputs: Vec<Element>,
    pub actions: Vec<Action>,
}

impl ActionCard {
    fn parse(
        &mut self,
        json: &Value,
        scope: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<()> {
        if let Some(card_json) = json.get("card").filter(|card| !card.is_null()) {
            let mut card = Element::from(Container::new(vec!["ActionGroup".to_string()]))
                .with_top_spacing(Spacing::None);
            card.parse(card_json, scope, ctx)?;
            self.card = Some(Box::new(card));
        }

        for (index, input_json) in wire::array(json, "inputs").iter().enumerate() {
            let type_name = wire::type_name(input_json).unwrap_or(wire::MISSING_TYPE);
            let mut input = Input::create(type_name)?;
            if index == 0 {
                input.base.top_spacing = Spacing::None;
            }
            input.parse(input_json, scope, ctx)?;
            self.inputs.push(input);
        }

        for action_json in wire::array(json, "actions") {
            let type_name = wire::type_name(action_json).unwrap_or(wire::MISSING_TYPE);
            if !ACTION_CARD_ALLOWED_TYPES.contains(&type_name) {
                log::debug!("dropping {} nested in an action card", type_name);
                continue;
            }
            self.actions.push(Action::from_json(action_json, scope, ctx)?);
        }
        Ok(())
    }

    /// Pane content plus the sub-action buttons it shows, in display order.
    pub(crate) fn render_ui(
        &self,
        scope: &ContainerScope<'_>,
        ctx: &mut RenderContext<'_>,
        group: GroupId,
    ) -> (UiElement, Vec<ActionButton>) {
        let mut element = UiElement::new("div").with_class("actionCard");
        if let Some(card) = &self.card {
            if let Some(rendered) = card.internal_render(scope, ctx) {
                element.push_child(rendered);
            }
        } else {
            for (index, input) in self.inputs.iter().enumerate() {
                if let Some(mut rendered) = input.internal_render(scope, ctx) {
                    if index > 0 {
                        rendered.set_style("margin-top", "10px");
                    }
                    element.push_child(rendered);
                }
            }
        }

        let mut strip = UiElement::new("div").with_style("display", "flex");
        if !self.inputs.is_empty() {
            strip.set_style("margin-top", "16px");
        }
        let count = self.actions.len();
        let mut buttons = Vec::with_capacity(count);
        for (index, action) in self.actions.iter().enumerate() {
            let mut button = ActionButton::new(
                ButtonId::Pane { group, index },
                action.name.clone(),
                ActionButtonStyle::Push,
            );
            button.set_state(if action.is_primary {
                ActionButtonState::Expanded
            } else if count == 1 {
                ActionButtonState::Normal
            } else {
                ActionButtonState::Subdued
            });
            let mut rendered = button.render();
            if count > 1 && index < count - 1 {
                rendered.set_style("margin-right", "16px");
            }
            strip.push_child(rendered);
            buttons.push(button);
        }
        element.push_child(strip);
        (element, buttons)
    }
}

#[derive(Debug)]
pub enum ActionKind {
    OpenUri(OpenUri),
    HttpPost(HttpPost),
    ActionCard(ActionCard),
}

#[derive(Debug)]
pub struct Action {
    pub name: String,
    pub is_primary: bool,
    pub kind: ActionKind,
}

/// What the host should do for an executed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionRequest {
    OpenUri {
        uri: String,
    },
    HttpPost {
        target: String,
        body: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
}

impl Action {
    pub fn new(name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            is_primary: false,
            kind,
        }
    }

    /// Action factory keyed by the `@type` discriminator.
    pub fn create(type_name: &str) -> CardResult<Self> {
        let kind = match type_name {
            "OpenUri" | "ViewAction" => ActionKind::OpenUri(OpenUri::default()),
            "HttpPOST" => ActionKind::HttpPost(HttpPost::default()),
            "ActionCard" => ActionKind::ActionCard(ActionCard::default()),
            other => return Err(CardError::UnknownActionType(other.to_string())),
        };
        Ok(Action::new(String::new(), kind))
    }

    pub fn from_json(
        json: &Value,
        scope: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<Self> {
        let type_name = wire::type_name(json).unwrap_or(wire::MISSING_TYPE);
        let mut action = Action::create(type_name)?;
        action.parse(json, scope, ctx)?;
        Ok(action)
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ActionKind::OpenUri(_) => "OpenUri",
            ActionKind::HttpPost(_) => "HttpPOST",
            ActionKind::ActionCard(_) => "ActionCard",
        }
    }

    /// Only action cards open a pane.
    pub fn has_ui(&self) -> bool {
        matches!(self.kind, ActionKind::ActionCard(_))
    }

    pub fn as_action_card(&self) -> Option<&ActionCard> {
        match &self.kind {
            ActionKind::ActionCard(card) => Some(card),
            _ => None,
        }
    }

    pub(crate) fn parse(
        &mut self,
        json: &Value,
        scope: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<()> {
        self.name = wire::string(json, "name").unwrap_or_default();
        self.is_primary = wire::flag(json, "isPrimary");
        match &mut self.kind {
            ActionKind::OpenUri(open) => open.parse(json),
            ActionKind::HttpPost(post) => post.parse(json),
            ActionKind::ActionCard(card) => card.parse(json, scope, ctx)?,
        }
        Ok(())
    }

    /// Describes what the host should do when this action executes. Action cards have
    /// nothing to execute and yield `None`, as do actions without a usable target.
    pub fn request(&self, os: &str, inputs: &InputValues) -> CardResult<Option<ActionRequest>> {
        match &self.kind {
            ActionKind::OpenUri(open) => Ok(open.target_for(os).map(|target| {
                ActionRequest::OpenUri {
                    uri: target.uri.clone(),
                }
            })),
            ActionKind::HttpPost(post) => {
                let Some(target) = post.target.clone() else {
                    log::warn!("HttpPOST action '{}' has no target", self.name);
                    return Ok(None);
                };
                Ok(Some(ActionRequest::HttpPost {
                    target,
                    body: post.resolve_body(inputs)?,
                    content_type: post.body_content_type.clone(),
                }))
            }
            ActionKind::ActionCard(_) => Ok(None),
        }
    }

    pub(crate) fn visit_elements<'a>(&'a self, visitor: &mut dyn FnMut(&'a Element)) {
        if let ActionKind::ActionCard(card) = &self.kind {
            if let Some(nested) = &card.card {
                nested.visit(visitor);
            }
            for input in &card.inputs {
                input.visit(visitor);
            }
        }
    }

    pub(crate) fn visit_elements_mut(&mut self, visitor: &mut dyn FnMut(&mut Element)) {
        if let ActionKind::ActionCard(card) = &mut self.kind {
            if let Some(nested) = &mut card.card {
                nested.visit_mut(visitor);
            }
            for input in &mut card.inputs {
                input.visit_mut(visitor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: Value) -> CardResult<Action> {
        let mut ctx = ParseContext::new();
        Action::from_json(&json, &ContainerScope::root(), &mut ctx)
    }

    #[test]
    fn unknown_action_type_is_fatal() {
        let err = parse(json!({"@type": "InvokeAddInCommand"})).unwrap_err();
        assert!(matches!(err, CardError::UnknownActionType(name) if name == "InvokeAddInCommand"));
    }

    #[test]
    fn legacy_and_modern_targets_are_equivalent() {
        let modern = parse(json!({
            "@type": "OpenUri",
            "name": "Open",
            "targets": [{"os": "default", "uri": "https://example.com"}]
        }))
        .unwrap();
        let legacy_string = parse(json!({
            "@type": "OpenUri", "name": "Open", "target": "https://example.com"
        }))
        .unwrap();
        let legacy_array = parse(json!({
            "@type": "ViewAction", "name": "Open", "target": ["https://example.com"]
        }))
        .unwrap();
        let targets = |action: &Action| match &action.kind {
            ActionKind::OpenUri(open) => open.targets.clone(),
            _ => Vec::new(),
        };
        assert_eq!(targets(&modern), targets(&legacy_string));
        assert_eq!(targets(&modern), targets(&legacy_array));
        assert_eq!(legacy_array.type_name(), "OpenUri");
    }

    #[test]
    fn open_uri_prefers_matching_os_then_default() {
        let action = parse(json!({
            "@type": "OpenUri",
            "targets": [
                {"os": "iOS", "uri": "ios://x"},
                {"os": "default", "uri": "https://x"}
            ]
        }))
        .unwrap();
        let inputs = InputValues::new();
        let request = |os: &str| action.request(os, &inputs).unwrap();
        assert_eq!(request("iOS"), Some(ActionRequest::OpenUri { uri: "ios://x".into() }));
        assert_eq!(request("android"), Some(ActionRequest::OpenUri { uri: "https://x".into() }));
    }

    #[test]
    fn http_post_body_is_resolved_from_inputs() {
        let action = parse(json!({
            "@type": "HttpPOST",
            "name": "Submit",
            "target": "https://example.com/api",
            "body": "{\"answer\": \"{{rating.value}}\", \"note\": \"{{note.value}}\"}",
            "bodyContentType": "application/json"
        }))
        .unwrap();
        let mut inputs = InputValues::new();
        inputs.insert("rating".into(), "<great>".into());
        let request = action.request(DEFAULT_OS, &inputs).unwrap();
        assert_eq!(
            request,
            Some(ActionRequest::HttpPost {
                target: "https://example.com/api".into(),
                body: "{\"answer\": \"<great>\", \"note\": \"\"}".into(),
                content_type: Some("application/json".into()),
            })
        );
    }

    #[test]
    fn action_card_keeps_only_allowed_nested_actions() {
        let action = parse(json!({
            "@type": "ActionCard",
            "name": "Respond",
            "inputs": [
                {"@type": "TextInput", "id": "comment"},
                {"@type": "DateInput", "id": "when"}
            ],
            "actions": [
                {"@type": "HttpPOST", "name": "Send", "target": "https://x"},
                {"@type": "ActionCard", "name": "Nested"},
                {"@type": "ViewAction", "name": "Legacy", "target": ["https://y"]},
                {"@type": "OpenUri", "name": "Open", "targets": []}
            ]
        }))
        .unwrap();
        assert!(action.has_ui());
        let card = action.as_action_card().unwrap();
        let names: Vec<_> = card.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Send", "Open"]);
        assert_eq!(card.inputs[0].base.top_spacing, Spacing::None);
        assert_eq!(card.inputs[1].base.top_spacing, Spacing::Default);
    }

    #[test]
    fn action_card_rejects_unknown_inputs() {
        let err = parse(json!({
            "@type": "ActionCard",
            "inputs": [{"@type": "ColorInput"}]
        }))
        .unwrap_err();
        assert!(matches!(err, CardError::UnknownInputType(_)));
    }

    #[test]
    fn nested_card_forbids_action_groups() {
        let err = parse(json!({
            "@type": "ActionCard",
            "card": {"items": [{"@type": "ActionGroup", "items": []}]}
        }))
        .unwrap_err();
        assert!(matches!(err, CardError::ContainmentViolation { .. }));
    }
}
