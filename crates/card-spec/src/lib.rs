#![allow(missing_docs)]

pub mod action;
pub mod card;
pub mod dispatch;
pub mod element;
pub mod error;
pub mod input;
pub mod layout;
pub mod markdown;
pub mod render;
pub mod scope;
pub mod ui;

mod wire;

pub use action::{
    Action, ActionButton, ActionCard, ActionGroup, ActionGroupState, ActionKind, ActionRequest,
    ButtonId, ClickOutcome, DEFAULT_OS, GroupId, HttpPost, InteractionState, OpenUri, TargetUri,
    Transition,
};
pub use card::{Card, CardShape, normalize_theme_color, parse_card};
pub use dispatch::{EventDispatcher, SubscriptionId};
pub use element::{
    Column, ColumnGroup, ColumnSize, Container, Element, ElementBase, ElementKind, Fact, FactGroup,
    Picture, PictureGallery, TextBlock,
};
pub use error::{CardError, CardResult};
pub use input::{Choice, Input, InputKind, InputValues};
pub use layout::{
    ActionButtonState, ActionButtonStyle, ContainerStyle, HorizontalAlignment, PictureStyle, Size,
    Spacing, TextColor, TextSize, TextWeight,
};
pub use render::{RenderContext, render_text};
pub use scope::{ContainerScope, ParseContext};
pub use ui::{UiElement, UiNode};
