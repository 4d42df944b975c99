use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use card_spec::{
    ActionButton, ActionButtonStyle, ActionRequest, ButtonId, Card, CardError, DEFAULT_OS,
    InputValues, InteractionState, Transition, UiNode, parse_card,
    render_text as card_render_text,
};

const DEFAULT_CARD: &str = include_str!("../../card-spec/tests/fixtures/survey_card.json");

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("unknown button style '{0}'")]
    ButtonStyle(String),
    #[error("malformed card: {0}")]
    MalformedCard(#[source] CardError),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error(transparent)]
    Interaction(#[from] CardError),
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    card_json: Option<String>,
    #[serde(default)]
    button_style: Option<String>,
}

fn load_config(config_json: &str) -> Result<ComponentConfig, ComponentError> {
    if config_json.trim().is_empty() {
        Ok(ComponentConfig::default())
    } else {
        serde_json::from_str(config_json).map_err(ComponentError::ConfigParse)
    }
}

fn load_card(config: &ComponentConfig) -> Result<Card, ComponentError> {
    let card_json = config.card_json.as_deref().unwrap_or(DEFAULT_CARD);
    parse_card(card_json).map_err(ComponentError::MalformedCard)
}

fn button_style(config: &ComponentConfig, card: &Card) -> Result<ActionButtonStyle, ComponentError> {
    match config.button_style.as_deref() {
        Some(style) => ActionButtonStyle::parse(style)
            .ok_or_else(|| ComponentError::ButtonStyle(style.to_string())),
        None => Ok(card.shape().default_button_style()),
    }
}

fn render_tree(config_json: &str) -> Result<UiNode, ComponentError> {
    let config = load_config(config_json)?;
    let card = load_card(&config)?;
    let style = button_style(&config, &card)?;
    let mut state = InteractionState::new();
    Ok(card.render_with_style(&mut state, style))
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn respond_string(result: Result<String, ComponentError>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

pub fn describe(config_json: &str) -> String {
    respond(load_config(config_json).and_then(|config| {
        let card = load_card(&config)?;
        let inputs: Vec<&str> = card
            .inputs()
            .into_iter()
            .filter_map(|input| input.id.as_deref())
            .collect();
        Ok(json!({
            "shape": card.shape().as_str(),
            "summary": card.summary(),
            "themeColor": card.theme_color(),
            "sections": card.sections().count(),
            "groups": card.group_count(),
            "inputs": inputs,
        }))
    }))
}

pub fn render_html(config_json: &str) -> String {
    respond_string(render_tree(config_json).map(|tree| tree.to_html()))
}

pub fn render_text(config_json: &str) -> String {
    respond_string(render_tree(config_json).map(|tree| card_render_text(&tree)))
}

pub fn render_json_ui(config_json: &str) -> String {
    respond(render_tree(config_json).and_then(|tree| {
        serde_json::to_value(tree).map_err(ComponentError::JsonEncode)
    }))
}

/// Reports whether the configured card parses. Only config errors use the error envelope.
pub fn check(config_json: &str) -> String {
    respond(load_config(config_json).map(|config| match load_card(&config) {
        Ok(_) => json!({ "valid": true }),
        Err(err) => {
            log::debug!("card rejected: {}", err);
            json!({ "valid": false, "error": err.to_string() })
        }
    }))
}

/// Result of one click, as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClickReport {
    pub button: ButtonId,
    pub action: String,
    pub transition: Transition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<ActionRequest>,
}

/// A parsed card plus the interaction state of its last render.
///
/// The session stands in for the host: it owns the input values, receives clicks and
/// turns executed actions into [`ActionRequest`]s.
#[derive(Debug)]
pub struct CardSession {
    card: Card,
    state: InteractionState,
    button_style: ActionButtonStyle,
    os: String,
}

impl CardSession {
    pub fn new(card_json: &str) -> Result<Self, ComponentError> {
        let card = parse_card(card_json).map_err(ComponentError::MalformedCard)?;
        let button_style = card.shape().default_button_style();
        Ok(Self {
            card,
            state: InteractionState::new(),
            button_style,
            os: DEFAULT_OS.to_string(),
        })
    }

    pub fn with_button_style(mut self, style: ActionButtonStyle) -> Self {
        self.button_style = style;
        self
    }

    /// Platform used to pick OpenUri targets.
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn render(&mut self) -> UiNode {
        self.card.render_with_style(&mut self.state, self.button_style)
    }

    /// Buttons of the last render.
    pub fn buttons(&self) -> impl Iterator<Item = &ActionButton> {
        self.state.buttons()
    }

    /// Clicks the button with the given id (`g0.1`, `g0.pane.0`). Call [`render`] again
    /// to see the new state.
    ///
    /// [`render`]: CardSession::render
    pub fn click(&mut self, button: &str) -> Result<ClickReport, ComponentError> {
        let id: ButtonId = button.parse()?;
        let outcome = self.card.click(&mut self.state, id)?;
        let request = if outcome.transition == Transition::Executed {
            outcome
                .action
                .request(&self.os, &self.card.input_values())?
        } else {
            None
        };
        Ok(ClickReport {
            button: outcome.button,
            action: outcome.action.name.clone(),
            transition: outcome.transition,
            request,
        })
    }

    pub fn set_input_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        self.card.set_input_value(id, value)
    }

    pub fn input_values(&self) -> InputValues {
        self.card.input_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(card: Value) -> String {
        json!({ "card_json": card.to_string() }).to_string()
    }

    #[test]
    fn describe_reports_bundled_card() {
        let payload = describe("");
        let value: Value = serde_json::from_str(&payload).expect("valid json");
        assert_eq!(value["shape"], "MessageCard");
        assert_eq!(value["summary"], "Lunch survey");
        assert_eq!(value["themeColor"], "00B200");
        assert_eq!(value["sections"], 1);
        assert_eq!(value["groups"], 1);
        assert_eq!(value["inputs"], json!(["input"]));
    }

    #[test]
    fn check_flags_malformed_cards() {
        let ok: Value = serde_json::from_str(&check("")).expect("json");
        assert_eq!(ok["valid"], true);

        let nested = config(json!({
            "@type": "AdaptiveCard",
            "sections": [{ "items": [{ "@type": "Section" }] }]
        }));
        let bad: Value = serde_json::from_str(&check(&nested)).expect("json");
        assert_eq!(bad["valid"], false);
        assert!(
            bad["error"]
                .as_str()
                .unwrap()
                .starts_with("malformed card:")
        );
    }

    #[test]
    fn bad_config_uses_error_envelope() {
        let payload: Value = serde_json::from_str(&check("{not json")).expect("json");
        assert!(payload["error"].as_str().unwrap().contains("failed to parse config"));

        let style = json!({ "button_style": "fancy" }).to_string();
        let payload: Value = serde_json::from_str(&render_json_ui(&style)).expect("json");
        assert_eq!(payload["error"], "unknown button style 'fancy'");
    }

    #[test]
    fn render_html_outputs_markup() {
        let html = render_html("");
        assert!(html.starts_with("<div class=\"messageCard\""));
        assert!(html.contains("<select"));
        assert!(html.contains("data-button=\"g0.pane.0\""));
    }

    #[test]
    fn render_text_outputs_outline() {
        let text = render_text("");
        assert!(text.starts_with("Team lunch"));
        assert!(text.contains("[g0.pane.0] Submit"));
    }

    #[test]
    fn render_json_ui_honours_button_style() {
        let card = json!({
            "potentialAction": [
                { "@type": "OpenUri", "name": "One", "target": ["https://example.com/1"] },
                { "@type": "OpenUri", "name": "Two", "target": ["https://example.com/2"] }
            ]
        });
        let strip_buttons = |style: Option<&str>| {
            let config = json!({ "card_json": card.to_string(), "button_style": style });
            let payload = render_json_ui(&config.to_string());
            let tree: UiNode = serde_json::from_str(&payload).expect("ui tree");
            tree.find_all(&|e| e.attr("data-button").is_some())
                .iter()
                .map(|b| b.class_names.clone())
                .collect::<Vec<_>>()
        };

        let default = strip_buttons(None);
        assert_eq!(default.len(), 2);
        assert!(default.iter().all(|c| c.contains(&"linkButton".to_string())));
        let pushed = strip_buttons(Some("push"));
        assert!(pushed.iter().all(|c| c.contains(&"pushButton".to_string())));
    }

    #[test]
    fn session_expands_and_executes() {
        let card = json!({
            "potentialAction": [
                { "@type": "OpenUri", "name": "Open", "targets": [
                    { "os": "default", "uri": "https://example.com" },
                    { "os": "iOS", "uri": "app://example" }
                ]},
                { "@type": "ActionCard", "name": "Reply",
                  "inputs": [{ "@type": "TextInput", "id": "reply" }],
                  "actions": [{ "@type": "HttpPOST", "name": "Send",
                                "target": "https://example.com/reply",
                                "body": "{{reply.value}}" }] }
            ]
        });
        let mut session = CardSession::new(&card.to_string()).unwrap().with_os("iOS");
        session.render();
        assert_eq!(session.buttons().count(), 2);

        let expanded = session.click("g0.1").unwrap();
        assert_eq!(expanded.transition, Transition::Expanded);
        assert_eq!(expanded.request, None);

        session.render();
        assert!(session.set_input_value("reply", "on my way"));
        let sent = session.click("g0.pane.0").unwrap();
        assert_eq!(sent.action, "Send");
        assert_eq!(
            sent.request,
            Some(ActionRequest::HttpPost {
                target: "https://example.com/reply".to_string(),
                body: "on my way".to_string(),
                content_type: None,
            })
        );

        let opened = session.click("g0.0").unwrap();
        assert_eq!(
            serde_json::to_value(&opened).unwrap(),
            json!({
                "button": "g0.0",
                "action": "Open",
                "transition": "executed",
                "request": { "type": "open_uri", "uri": "app://example" }
            })
        );
    }

    #[test]
    fn session_rejects_bad_button_ids() {
        let mut session = CardSession::new(DEFAULT_CARD).unwrap();
        session.render();
        assert!(matches!(
            session.click("submit"),
            Err(ComponentError::Interaction(CardError::InvalidButtonId(_)))
        ));
        assert!(matches!(
            session.click("g0.4"),
            Err(ComponentError::Interaction(CardError::UnknownButton(_)))
        ));
    }
}
