//! Layout primitives shared by every card element.
//!
//! Each enum parses from the lower camel case spelling used on the wire and falls back to
//! a caller supplied default for anything it does not recognise.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Named element size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Size {
    #[default]
    Auto,
    Stretch,
    Small,
    Medium,
    Large,
}

impl Size {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(Self::Auto),
            "stretch" => Some(Self::Stretch),
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Spacing above an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Spacing {
    None,
    #[default]
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TextSize {
    Small,
    #[default]
    Normal,
    Medium,
    Large,
    ExtraLarge,
}

impl TextSize {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "small" => Some(Self::Small),
            "normal" => Some(Self::Normal),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            "extraLarge" => Some(Self::ExtraLarge),
            _ => None,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extraLarge",
            Self::Normal => "defaultSize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TextWeight {
    Lighter,
    #[default]
    Normal,
    Bolder,
}

impl TextWeight {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "lighter" => Some(Self::Lighter),
            "normal" => Some(Self::Normal),
            "bolder" => Some(Self::Bolder),
            _ => None,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Lighter => "lighter",
            Self::Bolder => "bolder",
            Self::Normal => "defaultWeight",
        }
    }
}

/// Text color. `Default` means "inherit from the enclosing container".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TextColor {
    #[default]
    Default,
    Dark,
    Light,
    Accent,
}

impl TextColor {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "default" => Some(Self::Default),
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "accent" => Some(Self::Accent),
            _ => None,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Dark => "darkColor",
            Self::Light => "lightColor",
            Self::Accent => "accentColor",
            Self::Default => "defaultColor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlignment {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum PictureStyle {
    #[default]
    Normal,
    Person,
}

impl PictureStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "person" => Some(Self::Person),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ContainerStyle {
    #[default]
    Normal,
    Emphasis,
}

impl ContainerStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "emphasis" => Some(Self::Emphasis),
            _ => None,
        }
    }
}

/// Visual style of action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ActionButtonStyle {
    Link,
    #[default]
    Push,
}

impl ActionButtonStyle {
    /// Parse a button style string (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "link" => Some(Self::Link),
            "push" => Some(Self::Push),
            _ => None,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Link => "linkButton",
            Self::Push => "pushButton",
        }
    }

    pub fn spacer_class(self) -> &'static str {
        match self {
            Self::Link => "linkButtonSpacer",
            Self::Push => "pushButtonSpacer",
        }
    }
}

/// Interaction state of a single action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ActionButtonState {
    #[default]
    Normal,
    Expanded,
    Subdued,
}

impl ActionButtonState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Expanded => "expanded",
            Self::Subdued => "subdued",
        }
    }
}
