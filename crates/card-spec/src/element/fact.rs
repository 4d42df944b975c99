use serde_json::Value;

use super::{Element, TextBlock};
use crate::layout::{Spacing, TextWeight};
use crate::render::RenderContext;
use crate::scope::ContainerScope;
use crate::ui::UiElement;
use crate::wire;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fact {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl Fact {
    fn parse(json: &Value) -> Self {
        Self {
            name: wire::string(json, "name"),
            value: wire::string(json, "value"),
        }
    }
}

/// Name/value pairs shown as a two column table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactGroup {
    pub items: Vec<Fact>,
}

const NAME_CELL_STYLE: &[(&str, &str)] = &[
    ("border-width", "0px"),
    ("padding", "0px"),
    ("border-style", "none"),
    ("min-width", "100px"),
    ("vertical-align", "top"),
];

const VALUE_CELL_STYLE: &[(&str, &str)] = &[
    ("border-width", "0px"),
    ("border-style", "none"),
    ("vertical-align", "top"),
    ("padding", "0px 0px 0px 10px"),
];

impl FactGroup {
    pub fn from_facts(facts: &[Value]) -> Self {
        Self {
            items: facts.iter().map(Fact::parse).collect(),
        }
    }

    pub(crate) fn parse(&mut self, json: &Value) {
        self.items
            .extend(wire::array(json, "items").iter().map(Fact::parse));
    }

    pub(crate) fn render(
        &self,
        scope: &ContainerScope<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Option<UiElement> {
        if self.items.is_empty() {
            return None;
        }
        let mut table = UiElement::new("table").with_class("factGroup");
        for fact in &self.items {
            let row = UiElement::new("tr")
                .with_child(cell(
                    NAME_CELL_STYLE,
                    fact.name.as_deref(),
                    TextWeight::Bolder,
                    scope,
                    ctx,
                ))
                .with_child(cell(
                    VALUE_CELL_STYLE,
                    fact.value.as_deref(),
                    TextWeight::Lighter,
                    scope,
                    ctx,
                ));
            table.push_child(row);
        }
        Some(table)
    }
}

fn cell(
    styles: &[(&str, &str)],
    text: Option<&str>,
    weight: TextWeight,
    scope: &ContainerScope<'_>,
    ctx: &mut RenderContext<'_>,
) -> UiElement {
    let mut cell = UiElement::new("td");
    for (key, value) in styles {
        cell.set_style(key, *value);
    }
    if let Some(text) = text {
        let block = Element::from(TextBlock::new(text).with_text_weight(weight))
            .with_top_spacing(Spacing::None);
        if let Some(rendered) = block.internal_render(scope, ctx) {
            cell.push_child(rendered);
        }
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::InteractionState;
    use crate::layout::ActionButtonStyle;
    use serde_json::json;

    #[test]
    fn facts_become_table_rows_in_order() {
        let group = FactGroup::from_facts(&[
            json!({"name": "Due", "value": "Friday"}),
            json!({"name": "Owner", "value": "Ops"}),
        ]);
        let mut state = InteractionState::new();
        let mut ctx = RenderContext::new(ActionButtonStyle::Push, &mut state);
        let table = group.render(&ContainerScope::root(), &mut ctx).unwrap();
        assert!(table.has_class("factGroup"));

        let rows: Vec<_> = table.element_children().collect();
        assert_eq!(rows.len(), 2);
        let cells: Vec<_> = rows[0].element_children().collect();
        let name = cells[0].element_children().next().unwrap();
        let value = cells[1].element_children().next().unwrap();
        assert!(name.has_class("bolder"));
        assert!(value.has_class("lighter"));
        assert_eq!(cells[1].style("padding"), Some("0px 0px 0px 10px"));

        assert_eq!(table.text_content(), "DueFridayOwnerOps");
    }

    #[test]
    fn empty_group_renders_nothing() {
        let mut group = FactGroup::default();
        group.parse(&json!({"items": []}));
        let mut state = InteractionState::new();
        let mut ctx = RenderContext::new(ActionButtonStyle::Push, &mut state);
        assert!(group.render(&ContainerScope::root(), &mut ctx).is_none());
    }
}
