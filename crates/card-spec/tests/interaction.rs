use std::cell::RefCell;
use std::rc::Rc;

use card_spec::{
    ActionButtonState, ActionRequest, ButtonId, Card, CardError, DEFAULT_OS, GroupId,
    InteractionState, Transition, parse_card,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "survey_card" => include_str!("../tests/fixtures/survey_card.json"),
        "project_update" => include_str!("../tests/fixtures/project_update.json"),
        "adaptive_card" => include_str!("../tests/fixtures/adaptive_card.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn load(name: &str) -> Card {
    parse_card(fixture(name)).expect("fixture parses")
}

fn button(id: &str) -> ButtonId {
    id.parse().expect("valid button id")
}

fn strip_states(state: &InteractionState, group: GroupId) -> Vec<ActionButtonState> {
    state
        .group(group)
        .map(|g| g.buttons().iter().map(|b| b.state()).collect())
        .unwrap_or_default()
}

#[test]
fn survey_submit_resolves_the_selected_choice() {
    let mut card = load("survey_card");
    let mut state = InteractionState::new();
    card.render(&mut state);

    assert!(card.set_input_value("input", "2"));
    card.render(&mut state);

    let outcome = card.click(&mut state, button("g0.pane.0")).unwrap();
    assert_eq!(outcome.transition, Transition::Executed);
    assert_eq!(outcome.action.name, "Submit");
    let request = outcome
        .action
        .request(DEFAULT_OS, &card.input_values())
        .unwrap();
    assert_eq!(
        request,
        Some(ActionRequest::HttpPost {
            target: "https://surveys.example.com/api/responses".to_string(),
            body: "{ \"SurveyId\": \"42\", \"Response\": \"2\" }".to_string(),
            content_type: Some("application/json".to_string()),
        })
    );
}

#[test]
fn selected_choice_is_shown_after_rerender() {
    let mut card = load("survey_card");
    let mut state = InteractionState::new();
    card.set_input_value("input", "1");
    let tree = card.render(&mut state);
    let select = tree.find_by_tag("select")[0];
    let options: Vec<_> = select.element_children().collect();
    assert_eq!(options[0].attr("selected"), None);
    assert_eq!(options[1].attr("selected"), Some("selected"));
}

#[test]
fn expanding_renders_the_action_card_into_the_pane() {
    let card = load("project_update");
    let mut state = InteractionState::new();
    card.render(&mut state);
    let group = GroupId(0);

    let outcome = card.click(&mut state, button("g0.1")).unwrap();
    assert_eq!(outcome.transition, Transition::Expanded);
    assert_eq!(outcome.action.name, "Schedule");
    assert_eq!(
        strip_states(&state, group),
        vec![
            ActionButtonState::Subdued,
            ActionButtonState::Expanded,
            ActionButtonState::Subdued
        ]
    );

    let tree = card.render(&mut state);
    let pane = tree.find_by_class("actionCardContainer")[0];
    assert_eq!(pane.style("padding"), None);
    let controls = tree.find_by_tag("input");
    assert!(controls.iter().any(|c| c.attr("type") == Some("date")));
    assert!(controls.iter().any(|c| c.attr("type") == Some("checkbox")));

    let pane_buttons: Vec<_> = state
        .group(group)
        .unwrap()
        .pane_buttons()
        .iter()
        .map(|b| (b.text().to_string(), b.state()))
        .collect();
    assert_eq!(
        pane_buttons,
        vec![
            ("Later".to_string(), ActionButtonState::Subdued),
            ("Schedule".to_string(), ActionButtonState::Expanded),
        ]
    );

    let root = tree.find_by_class("rootContainer")[0];
    assert_eq!(root.style("padding-bottom"), Some("0px"));
}

#[test]
fn collapsing_restores_the_empty_pane() {
    let card = load("project_update");
    let mut state = InteractionState::new();
    card.render(&mut state);

    card.click(&mut state, button("g0.0")).unwrap();
    card.render(&mut state);
    let outcome = card.click(&mut state, button("g0.0")).unwrap();
    assert_eq!(outcome.transition, Transition::Collapsed);

    let tree = card.render(&mut state);
    let pane = tree.find_by_class("actionCardContainer")[0];
    assert!(pane.children.is_empty());
    assert_eq!(pane.style("padding"), Some("0px"));
    let root = tree.find_by_class("rootContainer")[0];
    assert_eq!(root.style("padding-bottom"), None);
}

#[test]
fn view_action_executes_and_opens_its_target() {
    let card = load("project_update");
    let mut state = InteractionState::new();
    card.render(&mut state);
    card.click(&mut state, button("g0.0")).unwrap();

    let outcome = card.click(&mut state, button("g0.2")).unwrap();
    assert_eq!(outcome.transition, Transition::Executed);
    assert_eq!(state.expanded(GroupId(0)), None);
    assert_eq!(
        outcome.action.request("android", &Default::default()).unwrap(),
        Some(ActionRequest::OpenUri {
            uri: "https://example.com/builds/4.2".to_string()
        })
    );
}

#[test]
fn at_most_one_action_is_ever_expanded() {
    let card = load("project_update");
    let mut state = InteractionState::new();
    let group = GroupId(0);
    let clicks = ["g0.0", "g0.1", "g0.1", "g0.0", "g0.2", "g0.1", "g0.0", "g0.0", "g0.2"];

    card.render(&mut state);
    for id in clicks {
        card.click(&mut state, button(id)).unwrap();
        card.render(&mut state);

        let states = strip_states(&state, group);
        let expanded = states
            .iter()
            .filter(|s| **s == ActionButtonState::Expanded)
            .count();
        let subdued = states
            .iter()
            .filter(|s| **s == ActionButtonState::Subdued)
            .count();
        match expanded {
            0 => assert!(states.iter().all(|s| *s == ActionButtonState::Normal)),
            1 => assert_eq!(subdued, states.len() - 1),
            n => panic!("{n} actions expanded after {id}"),
        }
        assert_eq!(state.expanded(group).is_some(), expanded == 1);
    }
}

#[test]
fn click_notifications_reach_subscribers() {
    let card = load("adaptive_card");
    let mut state = InteractionState::new();
    card.render(&mut state);

    let clicks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicks);
    state
        .button_mut(button("g0.1"))
        .expect("button on screen")
        .on_click()
        .subscribe(move |clicked| sink.borrow_mut().push(clicked.text().to_string()));

    card.click(&mut state, button("g0.1")).unwrap();
    assert_eq!(*clicks.borrow(), vec!["Feedback".to_string()]);
}

#[test]
fn nested_card_pane_feeds_http_post() {
    let mut card = load("adaptive_card");
    let mut state = InteractionState::new();
    card.render(&mut state);
    card.click(&mut state, button("g0.1")).unwrap();
    card.set_input_value("feedback", "more dark mode");
    let tree = card.render(&mut state);

    let textarea = tree.find_by_tag("textarea")[0];
    assert_eq!(textarea.attr("data-input"), Some("feedback"));
    assert_eq!(textarea.text_content(), "more dark mode");

    let outcome = card.click(&mut state, button("g0.pane.0")).unwrap();
    let request = outcome
        .action
        .request(DEFAULT_OS, &card.input_values())
        .unwrap();
    assert_eq!(
        request,
        Some(ActionRequest::HttpPost {
            target: "https://example.com/feedback".to_string(),
            body: "text=more dark mode".to_string(),
            content_type: None,
        })
    );
}

#[test]
fn clicks_on_buttons_that_are_not_on_screen_fail() {
    let card = load("project_update");
    let mut state = InteractionState::new();
    let err = card.click(&mut state, button("g0.0")).unwrap_err();
    assert!(matches!(err, CardError::UnknownButton(_)));

    card.render(&mut state);
    let err = card.click(&mut state, button("g9.0")).unwrap_err();
    assert!(matches!(err, CardError::UnknownButton(_)));
    assert!(!err.is_malformed_card());
}
