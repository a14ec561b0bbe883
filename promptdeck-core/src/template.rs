use crate::parser::{parse_format_string, FormatPart, ParseFormatError};
use crate::token::Token;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owning feature area of a template. Opaque to the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleId {
    Storyboard,
    MusicLab,
    ShotCreator,
    Storybook,
}

/// One position in a template: a token reference plus surrounding literal text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSlot {
    pub id: String,
    pub token_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Used instead of `prefix` when the slot's resolved value is non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_prefix: Option<String>,
}

impl TemplateSlot {
    pub fn new(id: &str, token_id: &str) -> TemplateSlot {
        TemplateSlot {
            id: id.to_string(),
            token_id: token_id.to_string(),
            prefix: None,
            suffix: None,
            conditional_prefix: None,
        }
    }

    pub fn with_suffix(mut self, suffix: &str) -> TemplateSlot {
        self.suffix = Some(suffix.to_string());
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> TemplateSlot {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_conditional_prefix(mut self, prefix: &str) -> TemplateSlot {
        self.conditional_prefix = Some(prefix.to_string());
        self
    }
}

/// An ordered list of slots belonging to a module. Slot order is the sole
/// determinant of concatenation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub id: String,
    pub module_id: ModuleId,
    pub name: String,
    #[serde(default)]
    pub banned_terms: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub slots: Vec<TemplateSlot>,
}

impl PromptTemplate {
    pub fn new(id: &str, module_id: ModuleId, name: &str) -> PromptTemplate {
        let now = Utc::now();
        PromptTemplate {
            id: id.to_string(),
            module_id,
            name: name.to_string(),
            banned_terms: Vec::new(),
            created_at: now,
            updated_at: now,
            slots: Vec::new(),
        }
    }

    pub fn slot(&self, slot_id: &str) -> Option<&TemplateSlot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    /// Derives the human-readable format string: each slot rendered as
    /// `prefix{tokenName}suffix`, concatenated in slot order. Informational
    /// only; slots whose token is missing from `tokens` are skipped.
    pub fn format_string(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for slot in &self.slots {
            let Some(token) = tokens.iter().find(|t| t.id == slot.token_id) else {
                continue;
            };
            if let Some(prefix) = slot.prefix.as_deref() {
                out.push_str(prefix);
            }
            out.push_str(&token.placeholder);
            if let Some(suffix) = slot.suffix.as_deref() {
                out.push_str(suffix);
            }
        }
        out
    }

    /// Builds a template from a format string such as
    /// `"{shotSize}, {subject} in {location}"`.
    ///
    /// Placeholder names are resolved against `tokens` by token name. The
    /// literal run before the first placeholder becomes the first slot's
    /// prefix; every literal run after a placeholder becomes that slot's
    /// suffix. Round-trips with [`PromptTemplate::format_string`] for
    /// templates without conditional prefixes.
    pub fn from_format_string(
        id: &str,
        module_id: ModuleId,
        name: &str,
        format: &str,
        tokens: &[Token],
    ) -> Result<PromptTemplate, ParseFormatError> {
        let parts = parse_format_string(format)?;
        if !format.is_empty() && !parts.iter().any(|p| matches!(p, FormatPart::Placeholder(_))) {
            return Err(ParseFormatError::Syntax(
                "format string contains no token placeholders".to_string(),
            ));
        }

        let mut template = PromptTemplate::new(id, module_id, name);
        let mut pending_prefix: Option<String> = None;
        for part in parts {
            match part {
                FormatPart::Literal(text) => {
                    if let Some(last) = template.slots.last_mut() {
                        last.suffix = Some(text);
                    } else {
                        pending_prefix = Some(text);
                    }
                }
                FormatPart::Placeholder(token_name) => {
                    let Some(token) = tokens.iter().find(|t| t.name == token_name) else {
                        return Err(ParseFormatError::UnknownToken(token_name));
                    };
                    let mut slot =
                        TemplateSlot::new(&Uuid::new_v4().to_string(), &token.id);
                    slot.prefix = pending_prefix.take();
                    template.slots.push(slot);
                }
            }
        }
        Ok(template)
    }
}

/// Moves the element at `from` to position `to`. Out-of-range indices leave
/// the list untouched and return false.
pub fn move_element<T>(list: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= list.len() || to >= list.len() {
        return false;
    }
    let element = list.remove(from);
    list.insert(to, element);
    true
}
