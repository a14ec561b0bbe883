use serde::{Deserialize, Serialize};

/// Grouping tag for tokens. Carries no assembly behavior, it only drives
/// catalog filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenCategory {
    Cinematography,
    Content,
    VisualLook,
    Motion,
    Audio,
    Style,
    MusicLab,
    Storybook,
}

/// Governs whether a slot referencing this token contributes to the
/// assembled base prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InclusionRule {
    /// Included unconditionally.
    Always,
    /// Included only when no style is active for the build.
    ConditionalOnNoStyle,
    /// Never part of the base prompt, routed through the style channel.
    Separate,
    /// Never part of the base prompt, routed through the motion/audio channels.
    Additive,
    /// Included only when the resolved value is non-empty and not "none".
    Optional,
}

/// One selectable value of a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TokenOption {
    pub fn new(value: &str, label: &str) -> TokenOption {
        TokenOption {
            value: value.to_string(),
            label: label.to_string(),
            description: None,
        }
    }
}

/// A reusable prompt fragment definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    /// Internal key, also the name used in format-string placeholders.
    pub name: String,
    /// Display name shown to users and in validation messages.
    pub label: String,
    pub category: TokenCategory,
    pub inclusion_rule: InclusionRule,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub allow_custom: bool,
    #[serde(default)]
    pub required: bool,
    /// Textual marker (`{name}`) used for format-string previews only.
    pub placeholder: String,
    #[serde(default)]
    pub options: Vec<TokenOption>,
}

impl Token {
    pub fn new(
        id: &str,
        label: &str,
        category: TokenCategory,
        inclusion_rule: InclusionRule,
    ) -> Token {
        Token {
            id: id.to_string(),
            name: id.to_string(),
            label: label.to_string(),
            category,
            inclusion_rule,
            default_value: String::new(),
            allow_custom: false,
            required: false,
            placeholder: format!("{{{}}}", id),
            options: Vec::new(),
        }
    }

    /// Looks up an option by its value.
    pub fn option(&self, value: &str) -> Option<&TokenOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// Ephemeral per-token input to one assembly call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSelection {
    pub token_id: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_value: Option<String>,
}

impl TokenSelection {
    pub fn new(token_id: &str, value: &str) -> TokenSelection {
        TokenSelection {
            token_id: token_id.to_string(),
            value: value.to_string(),
            custom_value: None,
        }
    }

    pub fn custom(token_id: &str, custom_value: &str) -> TokenSelection {
        TokenSelection {
            token_id: token_id.to_string(),
            value: String::new(),
            custom_value: Some(custom_value.to_string()),
        }
    }

    /// Resolves the effective value: custom value, then selected value, then
    /// the token's default, then empty.
    pub fn effective_value<'a>(&'a self, token: Option<&'a Token>) -> &'a str {
        if let Some(custom) = self.custom_value.as_deref() {
            if !custom.is_empty() {
                return custom;
            }
        }
        if !self.value.is_empty() {
            return &self.value;
        }
        match token {
            Some(t) => &t.default_value,
            None => "",
        }
    }
}

/// Display metadata for a token category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMeta {
    pub id: TokenCategory,
    pub label: String,
    pub description: String,
}
