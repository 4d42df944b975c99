//! Action groups and their expand/collapse state machine.
//!
//! An [`ActionGroup`] is immutable once parsed. What changes while the user clicks lives
//! in [`InteractionState`]: one expanded slot per group plus the buttons produced by the
//! most recent render.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Action;
use crate::dispatch::EventDispatcher;
use crate::error::{CardError, CardResult};
use crate::layout::{ActionButtonState, ActionButtonStyle};
use crate::render::RenderContext;
use crate::scope::{ContainerScope, ParseContext};
use crate::ui::UiElement;
use crate::wire;

/// Document-order index of an action group within its card.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct GroupId(pub usize);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Address of an on-screen button: `g<group>.<index>` for the button strip,
/// `g<group>.pane.<index>` for buttons inside an expanded action card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Strip { group: GroupId, index: usize },
    Pane { group: GroupId, index: usize },
}

impl ButtonId {
    pub fn group(&self) -> GroupId {
        match self {
            ButtonId::Strip { group, .. } | ButtonId::Pane { group, .. } => *group,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ButtonId::Strip { index, .. } | ButtonId::Pane { index, .. } => *index,
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonId::Strip { group, index } => write!(f, "{}.{}", group, index),
            ButtonId::Pane { group, index } => write!(f, "{}.pane.{}", group, index),
        }
    }
}

impl FromStr for ButtonId {
    type Err = CardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || CardError::InvalidButtonId(value.to_string());
        let rest = value.trim().strip_prefix('g').ok_or_else(invalid)?;
        let parts: Vec<&str> = rest.split('.').collect();
        let number = |text: &str| -> CardResult<usize> {
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            text.parse().map_err(|_| invalid())
        };
        match parts.as_slice() {
            [group, index] => Ok(ButtonId::Strip {
                group: GroupId(number(group)?),
                index: number(index)?,
            }),
            [group, "pane", index] => Ok(ButtonId::Pane {
                group: GroupId(number(group)?),
                index: number(index)?,
            }),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for ButtonId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A clickable button bound to one action for the lifetime of a render.
#[derive(Debug)]
pub struct ActionButton {
    id: ButtonId,
    text: String,
    style: ActionButtonStyle,
    state: ActionButtonState,
    on_click: EventDispatcher<ActionButton>,
}

impl ActionButton {
    pub fn new(id: ButtonId, text: impl Into<String>, style: ActionButtonStyle) -> Self {
        Self {
            id,
            text: text.into(),
            style,
            state: ActionButtonState::Normal,
            on_click: EventDispatcher::new(),
        }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> ActionButtonStyle {
        self.style
    }

    pub fn state(&self) -> ActionButtonState {
        self.state
    }

    pub fn set_state(&mut self, state: ActionButtonState) {
        self.state = state;
    }

    /// Click notification channel. Subscribers see the button after the group has
    /// applied the click.
    pub fn on_click(&mut self) -> &mut EventDispatcher<ActionButton> {
        &mut self.on_click
    }

    pub fn click(&self) {
        self.on_click.dispatch(self);
    }

    pub fn render(&self) -> UiElement {
        let mut element = UiElement::new("div")
            .with_class(self.style.css_class())
            .with_attr("role", "button")
            .with_attr("data-button", self.id.to_string());
        match self.state {
            ActionButtonState::Expanded => element.add_class("expanded"),
            ActionButtonState::Subdued => element.add_class("subdued"),
            ActionButtonState::Normal => {}
        }
        element.with_text(self.text.clone())
    }
}

/// Per-group interaction state.
#[derive(Debug, Default)]
pub struct ActionGroupState {
    expanded: Option<usize>,
    buttons: Vec<ActionButton>,
    pane_buttons: Vec<ActionButton>,
}

impl ActionGroupState {
    /// Index of the expanded action, if any.
    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn buttons(&self) -> &[ActionButton] {
        &self.buttons
    }

    pub fn pane_buttons(&self) -> &[ActionButton] {
        &self.pane_buttons
    }

    fn apply_button_states(&mut self) {
        for (index, button) in self.buttons.iter_mut().enumerate() {
            button.set_state(match self.expanded {
                None => ActionButtonState::Normal,
                Some(expanded) if expanded == index => ActionButtonState::Expanded,
                Some(_) => ActionButtonState::Subdued,
            });
        }
    }
}

/// Everything that changes while a user interacts with a rendered card.
#[derive(Debug, Default)]
pub struct InteractionState {
    groups: BTreeMap<GroupId, ActionGroupState>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self, id: GroupId) -> Option<&ActionGroupState> {
        self.groups.get(&id)
    }

    pub fn expanded(&self, id: GroupId) -> Option<usize> {
        self.groups.get(&id).and_then(|group| group.expanded)
    }

    pub fn button(&self, id: ButtonId) -> Option<&ActionButton> {
        let group = self.groups.get(&id.group())?;
        match id {
            ButtonId::Strip { index, .. } => group.buttons.get(index),
            ButtonId::Pane { index, .. } => group.pane_buttons.get(index),
        }
    }

    pub fn button_mut(&mut self, id: ButtonId) -> Option<&mut ActionButton> {
        let group = self.groups.get_mut(&id.group())?;
        match id {
            ButtonId::Strip { index, .. } => group.buttons.get_mut(index),
            ButtonId::Pane { index, .. } => group.pane_buttons.get_mut(index),
        }
    }

    /// Every button of the last render, strip buttons before pane buttons, groups in
    /// document order.
    pub fn buttons(&self) -> impl Iterator<Item = &ActionButton> {
        self.groups
            .values()
            .flat_map(|group| group.buttons.iter().chain(group.pane_buttons.iter()))
    }

    /// Collapses every group.
    pub fn reset(&mut self) {
        for group in self.groups.values_mut() {
            group.expanded = None;
            group.pane_buttons.clear();
            group.apply_button_states();
        }
    }

    fn entry(&mut self, id: GroupId) -> &mut ActionGroupState {
        self.groups.entry(id).or_default()
    }
}

/// How a click changed its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// The action has no UI; the host should perform it.
    Executed,
    Expanded,
    Collapsed,
}

#[derive(Debug)]
pub struct ClickOutcome<'a> {
    pub button: ButtonId,
    pub transition: Transition,
    pub action: &'a Action,
}

/// A strip of action buttons plus the pane that shows an expanded action card.
#[derive(Debug, Default)]
pub struct ActionGroup {
    id: GroupId,
    pub actions: Vec<Action>,
}

impl ActionGroup {
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            actions: Vec::new(),
        }
    }

    /// Builds a group from a bare array of action documents.
    pub fn from_actions(
        actions: &[Value],
        scope: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<Self> {
        let mut group = ActionGroup::new(GroupId(ctx.next_group_id()));
        group.parse_actions(actions, scope, ctx)?;
        Ok(group)
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub(crate) fn parse(
        &mut self,
        json: &Value,
        scope: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<()> {
        self.id = GroupId(ctx.next_group_id());
        self.parse_actions(wire::array(json, "items"), scope, ctx)
    }

    fn parse_actions(
        &mut self,
        actions: &[Value],
        scope: &ContainerScope<'_>,
        ctx: &mut ParseContext,
    ) -> CardResult<()> {
        for json in actions {
            self.actions.push(Action::from_json(json, scope, ctx)?);
        }
        log::debug!("group {} holds {} actions", self.id, self.actions.len());
        Ok(())
    }

    /// A lone action card opens by itself and shows no buttons.
    pub fn auto_expands(&self) -> bool {
        self.actions.len() == 1 && self.actions[0].has_ui()
    }

    /// Index of the action whose UI is in the pane.
    pub fn open_action(&self, state: &InteractionState) -> Option<usize> {
        if self.auto_expands() {
            return Some(0);
        }
        state
            .expanded(self.id)
            .filter(|index| self.actions.get(*index).is_some_and(Action::has_ui))
    }

    pub fn is_pane_open(&self, state: &InteractionState) -> bool {
        self.open_action(state).is_some()
    }

    pub(crate) fn render(&self, scope: &ContainerScope<'_>, ctx: &mut RenderContext<'_>) -> UiElement {
        let style = ctx.button_style();
        let open = self.open_action(ctx.state());

        let mut strip = UiElement::new("div").with_class("buttonStrip");
        let mut buttons = Vec::new();
        if !self.auto_expands() {
            let count = self.actions.len();
            for (index, action) in self.actions.iter().enumerate() {
                let mut button = ActionButton::new(
                    ButtonId::Strip {
                        group: self.id,
                        index,
                    },
                    action.name.clone(),
                    style,
                );
                button.set_state(match open {
                    None => ActionButtonState::Normal,
                    Some(expanded) if expanded == index => ActionButtonState::Expanded,
                    Some(_) => ActionButtonState::Subdued,
                });
                strip.push_child(
                    UiElement::new("div")
                        .with_class("buttonStripItem")
                        .with_child(button.render()),
                );
                if index + 1 < count {
                    strip.push_child(UiElement::new("div").with_class(style.spacer_class()));
                }
                buttons.push(button);
            }
        }

        let mut pane = UiElement::new("div").with_class("actionCardContainer");
        let mut pane_buttons = Vec::new();
        match open.and_then(|index| self.actions[index].as_action_card()) {
            Some(card) => {
                if self.actions.len() <= 1 {
                    pane.set_style("margin-top", "0px");
                }
                let (content, card_buttons) = card.render_ui(scope, ctx, self.id);
                pane.push_child(content);
                pane_buttons = card_buttons;
            }
            None => {
                pane.set_style("padding", "0px");
                pane.set_style("margin-top", "0px");
            }
        }

        let group_state = ctx.state_mut().entry(self.id);
        group_state.buttons = buttons;
        group_state.pane_buttons = pane_buttons;

        UiElement::new("div")
            .with_class("actionGroup")
            .with_child(strip)
            .with_child(pane)
    }

    /// Applies a click on one of this group's buttons and notifies the button's
    /// subscribers.
    pub fn click<'a>(
        &'a self,
        state: &mut InteractionState,
        button: ButtonId,
    ) -> CardResult<ClickOutcome<'a>> {
        let unknown = || CardError::UnknownButton(button.to_string());
        if button.group() != self.id {
            return Err(unknown());
        }
        let auto_expands = self.auto_expands();
        let group_state = state.groups.get_mut(&self.id).ok_or_else(unknown)?;

        match button {
            ButtonId::Strip { index, .. } => {
                if index >= group_state.buttons.len() {
                    return Err(unknown());
                }
                let action = self.actions.get(index).ok_or_else(unknown)?;
                let transition = if !action.has_ui() {
                    group_state.expanded = None;
                    Transition::Executed
                } else if group_state.expanded == Some(index) {
                    group_state.expanded = None;
                    Transition::Collapsed
                } else {
                    group_state.expanded = Some(index);
                    Transition::Expanded
                };
                // The pane is rebuilt on the next render.
                group_state.pane_buttons.clear();
                group_state.apply_button_states();
                log::debug!("{} '{}' -> {:?}", button, action.name, transition);

                group_state.buttons[index].click();
                Ok(ClickOutcome {
                    button,
                    transition,
                    action,
                })
            }
            ButtonId::Pane { index, .. } => {
                let open = if auto_expands {
                    Some(0)
                } else {
                    group_state.expanded
                };
                let card = open
                    .and_then(|open| self.actions.get(open))
                    .and_then(Action::as_action_card)
                    .ok_or_else(unknown)?;
                let action = card.actions.get(index).ok_or_else(unknown)?;
                let pane_button = group_state.pane_buttons.get(index).ok_or_else(unknown)?;
                log::debug!("{} '{}' executed", button, action.name);

                pane_button.click();
                Ok(ClickOutcome {
                    button,
                    transition: Transition::Executed,
                    action,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn group(actions: Value) -> ActionGroup {
        let mut ctx = ParseContext::new();
        let actions = actions.as_array().cloned().unwrap_or_default();
        ActionGroup::from_actions(&actions, &ContainerScope::root(), &mut ctx).unwrap()
    }

    fn render(group: &ActionGroup, state: &mut InteractionState) -> UiElement {
        let mut ctx = RenderContext::new(ActionButtonStyle::Link, state);
        group.render(&ContainerScope::root(), &mut ctx)
    }

    fn strip_states(state: &InteractionState, id: GroupId) -> Vec<ActionButtonState> {
        state
            .group(id)
            .map(|group| group.buttons().iter().map(ActionButton::state).collect())
            .unwrap_or_default()
    }

    fn two_cards_and_a_link() -> ActionGroup {
        group(json!([
            {"@type": "ActionCard", "name": "Comment",
             "inputs": [{"@type": "TextInput", "id": "comment"}],
             "actions": [{"@type": "HttpPOST", "name": "Send", "target": "https://x"}]},
            {"@type": "ActionCard", "name": "Rate",
             "inputs": [{"@type": "MultichoiceInput", "id": "rating"}],
             "actions": [{"@type": "HttpPOST", "name": "Rate it", "target": "https://x"}]},
            {"@type": "OpenUri", "name": "Open", "target": "https://example.com"}
        ]))
    }

    #[test]
    fn button_ids_round_trip_through_text() {
        let strip = ButtonId::Strip { group: GroupId(2), index: 1 };
        let pane = ButtonId::Pane { group: GroupId(0), index: 3 };
        assert_eq!(strip.to_string(), "g2.1");
        assert_eq!(pane.to_string(), "g0.pane.3");
        assert_eq!("g2.1".parse::<ButtonId>().unwrap(), strip);
        assert_eq!("g0.pane.3".parse::<ButtonId>().unwrap(), pane);
        for bad in ["", "2.1", "g2", "g2.x", "g2.pane", "g2.tab.1", "g-1.0", "g1.+2"] {
            assert!(
                matches!(bad.parse::<ButtonId>(), Err(CardError::InvalidButtonId(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn collapsed_group_shows_strip_and_empty_pane() {
        let group = two_cards_and_a_link();
        let mut state = InteractionState::new();
        let rendered = render(&group, &mut state);

        let children: Vec<_> = rendered.element_children().collect();
        let strip = children[0];
        let pane = children[1];
        assert_eq!(strip.element_children().filter(|c| c.has_class("buttonStripItem")).count(), 3);
        assert_eq!(strip.element_children().filter(|c| c.has_class("linkButtonSpacer")).count(), 2);
        assert_eq!(pane.style("padding"), Some("0px"));
        assert_eq!(pane.style("margin-top"), Some("0px"));
        assert!(pane.children.is_empty());
        assert_eq!(strip_states(&state, group.id()), vec![ActionButtonState::Normal; 3]);
    }

    #[test]
    fn expand_switch_and_collapse() {
        let group = two_cards_and_a_link();
        let id = group.id();
        let mut state = InteractionState::new();
        render(&group, &mut state);

        let first = ButtonId::Strip { group: id, index: 0 };
        let second = ButtonId::Strip { group: id, index: 1 };

        let outcome = group.click(&mut state, first).unwrap();
        assert_eq!(outcome.transition, Transition::Expanded);
        use ActionButtonState::*;
        assert_eq!(strip_states(&state, id), vec![Expanded, Subdued, Subdued]);

        let rendered = render(&group, &mut state);
        let pane = rendered.element_children().nth(1).unwrap();
        assert_eq!(pane.style("padding"), None);
        assert_eq!(pane.style("margin-top"), None);
        assert_eq!(state.group(id).unwrap().pane_buttons().len(), 1);

        let outcome = group.click(&mut state, second).unwrap();
        assert_eq!(outcome.transition, Transition::Expanded);
        assert_eq!(outcome.action.name, "Rate");
        assert_eq!(strip_states(&state, id), vec![Subdued, Expanded, Subdued]);

        let outcome = group.click(&mut state, second).unwrap();
        assert_eq!(outcome.transition, Transition::Collapsed);
        assert_eq!(strip_states(&state, id), vec![Normal, Normal, Normal]);
        assert_eq!(state.expanded(id), None);
    }

    #[test]
    fn action_without_ui_executes_and_collapses() {
        let group = two_cards_and_a_link();
        let id = group.id();
        let mut state = InteractionState::new();
        render(&group, &mut state);
        group.click(&mut state, ButtonId::Strip { group: id, index: 0 }).unwrap();

        let outcome = group
            .click(&mut state, ButtonId::Strip { group: id, index: 2 })
            .unwrap();
        assert_eq!(outcome.transition, Transition::Executed);
        assert_eq!(outcome.action.type_name(), "OpenUri");
        assert_eq!(state.expanded(id), None);
        assert_eq!(strip_states(&state, id), vec![ActionButtonState::Normal; 3]);
    }

    #[test]
    fn subscribers_see_the_updated_button() {
        let group = two_cards_and_a_link();
        let id = group.id();
        let mut state = InteractionState::new();
        render(&group, &mut state);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let button = ButtonId::Strip { group: id, index: 1 };
        state
            .button_mut(button)
            .unwrap()
            .on_click()
            .subscribe(move |clicked| sink.borrow_mut().push((clicked.id(), clicked.state())));

        group.click(&mut state, button).unwrap();
        assert_eq!(*seen.borrow(), vec![(button, ActionButtonState::Expanded)]);
    }

    #[test]
    fn lone_action_card_opens_without_buttons() {
        let group = group(json!([
            {"@type": "ActionCard", "name": "Answer",
             "inputs": [{"@type": "TextInput", "id": "a"}],
             "actions": [
                {"@type": "HttpPOST", "name": "Save", "target": "https://x"},
                {"@type": "HttpPOST", "name": "Submit", "isPrimary": true, "target": "https://x"}
             ]}
        ]));
        let mut state = InteractionState::new();
        let rendered = render(&group, &mut state);
        let strip = rendered.element_children().next().unwrap();
        assert!(strip.children.is_empty());
        assert!(group.is_pane_open(&state));

        let pane_buttons: Vec<_> = state
            .group(group.id())
            .unwrap()
            .pane_buttons()
            .iter()
            .map(|b| (b.text().to_string(), b.style(), b.state()))
            .collect();
        assert_eq!(
            pane_buttons,
            vec![
                ("Save".to_string(), ActionButtonStyle::Push, ActionButtonState::Subdued),
                ("Submit".to_string(), ActionButtonStyle::Push, ActionButtonState::Expanded),
            ]
        );

        let outcome = group
            .click(&mut state, ButtonId::Pane { group: group.id(), index: 1 })
            .unwrap();
        assert_eq!(outcome.transition, Transition::Executed);
        assert_eq!(outcome.action.name, "Submit");
    }

    #[test]
    fn clicks_on_missing_buttons_are_rejected() {
        let group = two_cards_and_a_link();
        let mut state = InteractionState::new();
        let button = ButtonId::Strip { group: group.id(), index: 0 };
        assert!(matches!(group.click(&mut state, button), Err(CardError::UnknownButton(_))));

        render(&group, &mut state);
        let missing = ButtonId::Strip { group: group.id(), index: 7 };
        assert!(matches!(group.click(&mut state, missing), Err(CardError::UnknownButton(_))));
        let pane = ButtonId::Pane { group: group.id(), index: 0 };
        assert!(matches!(group.click(&mut state, pane), Err(CardError::UnknownButton(_))));
    }
}
