//! # Prompt Assembler
//!
//! Turns a template plus a set of per-token selections into a final prompt
//! string, with conditional inclusion, style/motion/audio channel
//! separation, and banned-term filtering.
//!
//! The assembler is constructed from an explicit snapshot of tokens and
//! banned terms and never mutates them; every build call derives a fresh
//! [`BuiltPrompt`].

use crate::defaults::{expand_shot_abbreviation, SHOT_FRAMING_TOKEN_IDS};
use crate::filter::{clean_prompt, BannedTermFilter};
use crate::template::PromptTemplate;
use crate::token::{InclusionRule, Token, TokenSelection};
use std::collections::HashMap;
use tracing::debug;

/// Token ids handled through the style channel, never as ordinary slots.
pub const STYLE_CHANNEL_IDS: [&str; 3] = ["stylePrefix", "stylePrompt", "styleSuffix"];
/// Token ids handled through the motion channel.
pub const MOTION_CHANNEL_IDS: [&str; 2] = ["cameraMovement", "subjectMotion"];
/// Token ids handled through the audio channel.
pub const AUDIO_CHANNEL_IDS: [&str; 4] = ["dialog", "voiceover", "ambient", "music"];

/// Prompts longer than this are shortened before being handed to the
/// generation backend.
pub const MAX_DELIVERY_LENGTH: usize = 1000;

fn is_reserved_channel(token_id: &str) -> bool {
    STYLE_CHANNEL_IDS.contains(&token_id)
        || MOTION_CHANNEL_IDS.contains(&token_id)
        || AUDIO_CHANNEL_IDS.contains(&token_id)
}

/// Shortens `prompt` to 997 characters plus an ellipsis when it exceeds
/// [`MAX_DELIVERY_LENGTH`].
pub fn truncate_for_delivery(prompt: &str) -> String {
    if prompt.chars().count() > MAX_DELIVERY_LENGTH {
        let mut truncated: String = prompt.chars().take(MAX_DELIVERY_LENGTH - 3).collect();
        truncated.push_str("...");
        truncated
    } else {
        prompt.to_string()
    }
}

/// Style channel values pulled out of the selection set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleChannel {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub style_prompt: Option<String>,
}

/// Motion channel; present only when a non-static camera movement is set.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionChannel {
    pub camera_movement: String,
    pub subject_motion: Option<String>,
}

/// Audio channel; present when any audio value is selected. Fields carry
/// `None` instead of their per-field "absent" sentinels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioChannel {
    pub dialog: Option<String>,
    pub voiceover: Option<String>,
    pub ambient: Option<String>,
    pub music: Option<String>,
}

/// The full output of one assembly call. Derived state, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPrompt {
    pub full: String,
    pub base: String,
    pub style: StyleChannel,
    pub motion: Option<MotionChannel>,
    pub audio: Option<AudioChannel>,
    pub warnings: Vec<String>,
}

/// Result of validating selections against a template's required tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

pub struct PromptAssembler {
    tokens: HashMap<String, Token>,
    filter: BannedTermFilter,
}

impl PromptAssembler {
    pub fn new(tokens: &[Token], banned_terms: &[String]) -> PromptAssembler {
        PromptAssembler {
            tokens: tokens.iter().map(|t| (t.id.clone(), t.clone())).collect(),
            filter: BannedTermFilter::new(banned_terms),
        }
    }

    pub fn get_token(&self, token_id: &str) -> Option<&Token> {
        self.tokens.get(token_id)
    }

    /// All known tokens, ordered by id.
    pub fn all_tokens(&self) -> Vec<&Token> {
        let mut tokens: Vec<&Token> = self.tokens.values().collect();
        tokens.sort_by(|a, b| a.id.cmp(&b.id));
        tokens
    }

    /// Replaces the banned-term list; terms are re-normalized to lowercase.
    pub fn set_banned_terms(&mut self, terms: &[String]) {
        self.filter.set_terms(terms);
    }

    /// Builds a complete prompt from a template and selections.
    pub fn build_prompt(
        &self,
        template: &PromptTemplate,
        selections: &[TokenSelection],
        has_style: bool,
    ) -> BuiltPrompt {
        let by_token: HashMap<&str, &TokenSelection> = selections
            .iter()
            .map(|s| (s.token_id.as_str(), s))
            .collect();
        let mut warnings = Vec::new();

        let style = StyleChannel {
            prefix: channel_value(&by_token, "stylePrefix"),
            suffix: channel_value(&by_token, "styleSuffix"),
            style_prompt: channel_value(&by_token, "stylePrompt"),
        };

        let camera_movement = channel_value(&by_token, "cameraMovement");
        let subject_motion = channel_value(&by_token, "subjectMotion");

        let dialog = channel_value(&by_token, "dialog");
        let voiceover = channel_value(&by_token, "voiceover");
        let ambient = channel_value(&by_token, "ambient");
        let music = channel_value(&by_token, "music");

        let mut parts: Vec<String> = Vec::new();
        for slot in &template.slots {
            if is_reserved_channel(&slot.token_id) {
                continue;
            }
            let Some(token) = self.tokens.get(&slot.token_id) else {
                debug!(token_id = %slot.token_id, "skipping slot for unknown token");
                continue;
            };

            let value = match by_token.get(slot.token_id.as_str()) {
                Some(selection) => selection.effective_value(Some(token)).to_string(),
                None => token.default_value.clone(),
            };

            if !should_include(token.inclusion_rule, has_style, &value) {
                continue;
            }
            if value.is_empty() || value == "none" {
                continue;
            }

            let display_value = self.display_value(token, &value);

            let mut slot_text = String::new();
            if let Some(conditional) = slot.conditional_prefix.as_deref() {
                slot_text.push_str(conditional);
            } else if let Some(prefix) = slot.prefix.as_deref() {
                slot_text.push_str(prefix);
            }
            slot_text.push_str(&display_value);
            if let Some(suffix) = slot.suffix.as_deref() {
                slot_text.push_str(suffix);
            }
            parts.push(slot_text);
        }

        let mut base = clean_prompt(parts.concat().trim());

        let outcome = if template.banned_terms.is_empty() {
            self.filter.filter(&base)
        } else {
            let mut combined: Vec<String> =
                self.filter.terms().iter().map(|t| t.to_string()).collect();
            combined.extend(template.banned_terms.iter().cloned());
            BannedTermFilter::new(&combined).filter(&base)
        };
        base = outcome.cleaned;
        if !outcome.removed.is_empty() {
            debug!(removed = ?outcome.removed, "banned terms removed from prompt");
            warnings.push(format!(
                "Removed banned terms: {}",
                outcome.removed.join(", ")
            ));
        }

        let full = if has_style
            && (style.prefix.is_some() || style.style_prompt.is_some() || style.suffix.is_some())
        {
            let mut style_parts: Vec<&str> = Vec::new();
            if let Some(prefix) = style.prefix.as_deref() {
                style_parts.push(prefix);
            }
            if !base.is_empty() {
                style_parts.push(&base);
            }
            if let Some(style_prompt) = style.style_prompt.as_deref() {
                style_parts.push(style_prompt);
            }
            if let Some(suffix) = style.suffix.as_deref() {
                style_parts.push(suffix);
            }
            style_parts.join(" ").trim().to_string()
        } else {
            base.clone()
        };

        let motion = camera_movement
            .filter(|movement| movement != "static")
            .map(|camera_movement| MotionChannel {
                camera_movement,
                subject_motion: subject_motion.filter(|m| m != "static"),
            });

        let audio = if dialog.is_some() || voiceover.is_some() || ambient.is_some() || music.is_some()
        {
            Some(AudioChannel {
                dialog: dialog.filter(|v| v != "none"),
                voiceover: voiceover.filter(|v| v != "none"),
                ambient: ambient.filter(|v| v != "silence"),
                music: music.filter(|v| v != "none"),
            })
        } else {
            None
        };

        BuiltPrompt {
            full,
            base,
            style,
            motion,
            audio,
            warnings,
        }
    }

    /// Layers the motion channel over a base prompt for animation backends.
    pub fn build_motion_prompt(&self, base: &str, motion: Option<&MotionChannel>) -> String {
        let Some(motion) = motion else {
            return base.to_string();
        };
        if motion.camera_movement.is_empty() || motion.camera_movement == "static" {
            return base.to_string();
        }

        let mut prompt = format!("{}: {}", motion.camera_movement, base);
        if let Some(subject_motion) = motion
            .subject_motion
            .as_deref()
            .filter(|m| !m.is_empty() && *m != "static")
        {
            prompt.push_str(", ");
            prompt.push_str(subject_motion);
        }
        prompt
    }

    /// Builds a preview using each token's default value or first option.
    pub fn build_preview(&self, template: &PromptTemplate, has_style: bool) -> String {
        let sample_selections: Vec<TokenSelection> = template
            .slots
            .iter()
            .map(|slot| {
                let Some(token) = self.tokens.get(&slot.token_id) else {
                    return TokenSelection::new(&slot.token_id, "");
                };
                let sample = if !token.default_value.is_empty() {
                    token.default_value.clone()
                } else {
                    token
                        .options
                        .first()
                        .map(|o| o.value.clone())
                        .unwrap_or_default()
                };
                TokenSelection::new(&slot.token_id, &sample)
            })
            .collect();

        self.build_prompt(template, &sample_selections, has_style)
            .full
    }

    /// Checks that every required token in the template has a selection with
    /// a non-empty value. Never fails the build; assembly and validation are
    /// independent.
    pub fn validate_selections(
        &self,
        template: &PromptTemplate,
        selections: &[TokenSelection],
    ) -> ValidationReport {
        let by_token: HashMap<&str, &TokenSelection> = selections
            .iter()
            .map(|s| (s.token_id.as_str(), s))
            .collect();
        let mut errors = Vec::new();

        for slot in &template.slots {
            let Some(token) = self.tokens.get(&slot.token_id) else {
                continue;
            };
            if !token.required {
                continue;
            }
            let satisfied = by_token.get(slot.token_id.as_str()).is_some_and(|s| {
                !s.value.is_empty() || s.custom_value.as_deref().is_some_and(|c| !c.is_empty())
            });
            if !satisfied {
                errors.push(format!("{} is required", token.label));
            }
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    fn display_value(&self, token: &Token, value: &str) -> String {
        if token.option(value).is_some() {
            if SHOT_FRAMING_TOKEN_IDS.contains(&token.id.as_str()) {
                return expand_shot_abbreviation(value);
            }
            return value.replace('-', " ");
        }
        value.to_string()
    }
}

fn should_include(rule: InclusionRule, has_style: bool, value: &str) -> bool {
    match rule {
        InclusionRule::Always => true,
        InclusionRule::ConditionalOnNoStyle => !has_style,
        InclusionRule::Separate => false,
        InclusionRule::Additive => false,
        InclusionRule::Optional => !value.is_empty() && value != "none",
    }
}

/// Resolves a reserved channel value: custom value, then selected value,
/// `None` when absent or empty. Token defaults do not apply to channels.
fn channel_value(
    by_token: &HashMap<&str, &TokenSelection>,
    token_id: &str,
) -> Option<String> {
    let selection = by_token.get(token_id)?;
    let value = selection.effective_value(None);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ModuleId, TemplateSlot};
    use crate::token::{TokenCategory, TokenOption};

    fn token(id: &str, rule: InclusionRule) -> Token {
        Token::new(id, id, TokenCategory::Content, rule)
    }

    fn template(slots: Vec<TemplateSlot>) -> PromptTemplate {
        let mut template = PromptTemplate::new("tpl", ModuleId::Storyboard, "Test");
        template.slots = slots;
        template
    }

    fn assembler_with(tokens: Vec<Token>, banned: &[&str]) -> PromptAssembler {
        let banned: Vec<String> = banned.iter().map(|t| t.to_string()).collect();
        PromptAssembler::new(&tokens, &banned)
    }

    #[test]
    fn test_trailing_separator_cleaned() {
        let assembler = assembler_with(
            vec![token("color", InclusionRule::Always), token("extra", InclusionRule::Optional)],
            &[],
        );
        let tpl = template(vec![
            TemplateSlot::new("s1", "color").with_suffix(", "),
            TemplateSlot::new("s2", "extra"),
        ]);
        let selections = vec![
            TokenSelection::new("color", "red"),
            TokenSelection::new("extra", ""),
        ];
        let built = assembler.build_prompt(&tpl, &selections, false);
        assert_eq!(built.base, "red");
        assert_eq!(built.full, "red");
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_inclusion_rule_table() {
        let cases = [
            (InclusionRule::Always, false, true),
            (InclusionRule::Always, true, true),
            (InclusionRule::ConditionalOnNoStyle, false, true),
            (InclusionRule::ConditionalOnNoStyle, true, false),
            (InclusionRule::Separate, false, false),
            (InclusionRule::Separate, true, false),
            (InclusionRule::Additive, false, false),
            (InclusionRule::Additive, true, false),
            (InclusionRule::Optional, false, true),
            (InclusionRule::Optional, true, true),
        ];
        for (rule, has_style, expected) in cases {
            let assembler = assembler_with(vec![token("x", rule)], &[]);
            let tpl = template(vec![TemplateSlot::new("s1", "x")]);
            let selections = vec![TokenSelection::new("x", "value")];
            let built = assembler.build_prompt(&tpl, &selections, has_style);
            assert_eq!(
                !built.base.is_empty(),
                expected,
                "rule {:?} with has_style={}",
                rule,
                has_style
            );
        }
    }

    #[test]
    fn test_optional_excludes_none_and_empty() {
        let assembler = assembler_with(vec![token("x", InclusionRule::Optional)], &[]);
        let tpl = template(vec![TemplateSlot::new("s1", "x")]);
        for value in ["", "none"] {
            let built =
                assembler.build_prompt(&tpl, &[TokenSelection::new("x", value)], false);
            assert_eq!(built.base, "");
        }
    }

    #[test]
    fn test_always_rule_still_skips_none_value() {
        let assembler = assembler_with(vec![token("x", InclusionRule::Always)], &[]);
        let tpl = template(vec![TemplateSlot::new("s1", "x")]);
        let built = assembler.build_prompt(&tpl, &[TokenSelection::new("x", "none")], false);
        assert_eq!(built.base, "");
    }

    #[test]
    fn test_missing_token_skipped_without_warning() {
        let assembler = assembler_with(vec![token("known", InclusionRule::Always)], &[]);
        let tpl = template(vec![
            TemplateSlot::new("s1", "ghost"),
            TemplateSlot::new("s2", "known"),
        ]);
        let built = assembler.build_prompt(
            &tpl,
            &[TokenSelection::new("known", "cat")],
            false,
        );
        assert_eq!(built.base, "cat");
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_conditional_prefix_used_over_prefix() {
        let assembler = assembler_with(vec![token("loc", InclusionRule::Optional)], &[]);
        let tpl = template(vec![
            TemplateSlot::new("s1", "loc")
                .with_prefix("at ")
                .with_conditional_prefix(" in "),
        ]);
        let built =
            assembler.build_prompt(&tpl, &[TokenSelection::new("loc", "paris")], false);
        assert_eq!(built.base, "in paris");
    }

    #[test]
    fn test_default_value_used_when_no_selection() {
        let mut t = token("lighting", InclusionRule::Optional);
        t.default_value = "golden-hour".to_string();
        t.options = vec![TokenOption::new("golden-hour", "Golden Hour")];
        let assembler = assembler_with(vec![t], &[]);
        let tpl = template(vec![TemplateSlot::new("s1", "lighting")]);
        let built = assembler.build_prompt(&tpl, &[], false);
        assert_eq!(built.base, "golden hour");
    }

    #[test]
    fn test_custom_value_overrides_and_keeps_hyphens() {
        let mut t = token("lighting", InclusionRule::Always);
        t.options = vec![TokenOption::new("high-key", "High Key")];
        let assembler = assembler_with(vec![t], &[]);
        let tpl = template(vec![TemplateSlot::new("s1", "lighting")]);
        let built = assembler.build_prompt(
            &tpl,
            &[TokenSelection::custom("lighting", "rim-lit silhouette")],
            false,
        );
        assert_eq!(built.base, "rim-lit silhouette");
    }

    #[test]
    fn test_shot_size_abbreviation_expanded() {
        let mut t = token("shotSize", InclusionRule::Always);
        t.options = vec![TokenOption::new("CU", "Close-Up")];
        let assembler = assembler_with(vec![t], &[]);
        let tpl = template(vec![TemplateSlot::new("s1", "shotSize")]);
        let built = assembler.build_prompt(&tpl, &[TokenSelection::new("shotSize", "CU")], false);
        assert_eq!(built.base, "close-up");
    }

    #[test]
    fn test_banned_terms_removed_with_warning() {
        let assembler = assembler_with(vec![token("desc", InclusionRule::Always)], &["ugly"]);
        let tpl = template(vec![TemplateSlot::new("s1", "desc")]);
        let built = assembler.build_prompt(
            &tpl,
            &[TokenSelection::new("desc", "an ugly dog")],
            false,
        );
        assert_eq!(built.base, "an dog");
        assert_eq!(
            built.warnings,
            vec!["Removed banned terms: ugly".to_string()]
        );
    }

    #[test]
    fn test_template_local_banned_terms_combined() {
        let assembler = assembler_with(vec![token("desc", InclusionRule::Always)], &["ugly"]);
        let mut tpl = template(vec![TemplateSlot::new("s1", "desc")]);
        tpl.banned_terms = vec!["crooked".to_string()];
        let built = assembler.build_prompt(
            &tpl,
            &[TokenSelection::new("desc", "an ugly crooked fence")],
            false,
        );
        assert_eq!(built.base, "an fence");
        assert_eq!(
            built.warnings,
            vec!["Removed banned terms: ugly, crooked".to_string()]
        );
    }

    #[test]
    fn test_style_wraps_base() {
        let assembler = assembler_with(vec![token("desc", InclusionRule::Always)], &[]);
        let tpl = template(vec![TemplateSlot::new("s1", "desc")]);
        let selections = vec![
            TokenSelection::new("desc", "red car"),
            TokenSelection::new("stylePrefix", "cinematic"),
            TokenSelection::new("stylePrompt", "in the style of X"),
        ];
        let built = assembler.build_prompt(&tpl, &selections, true);
        assert_eq!(built.base, "red car");
        assert_eq!(built.full, "cinematic red car in the style of X");
        assert_eq!(built.style.prefix.as_deref(), Some("cinematic"));
        assert_eq!(built.style.suffix, None);
    }

    #[test]
    fn test_style_selections_ignored_without_style_flag() {
        let assembler = assembler_with(vec![token("desc", InclusionRule::Always)], &[]);
        let tpl = template(vec![TemplateSlot::new("s1", "desc")]);
        let selections = vec![
            TokenSelection::new("desc", "red car"),
            TokenSelection::new("stylePrompt", "in the style of X"),
        ];
        let built = assembler.build_prompt(&tpl, &selections, false);
        assert_eq!(built.full, "red car");
    }

    #[test]
    fn test_reserved_channel_slot_never_assembled() {
        let assembler = assembler_with(vec![token("desc", InclusionRule::Always)], &[]);
        let tpl = template(vec![
            TemplateSlot::new("s1", "desc"),
            TemplateSlot::new("s2", "stylePrompt"),
        ]);
        let selections = vec![
            TokenSelection::new("desc", "red car"),
            TokenSelection::new("stylePrompt", "oil painting"),
        ];
        let built = assembler.build_prompt(&tpl, &selections, false);
        assert_eq!(built.base, "red car");
    }

    #[test]
    fn test_static_camera_movement_omits_motion() {
        let assembler = assembler_with(vec![], &[]);
        let tpl = template(vec![]);
        let selections = vec![
            TokenSelection::new("cameraMovement", "static"),
            TokenSelection::new("subjectMotion", "walking"),
        ];
        let built = assembler.build_prompt(&tpl, &selections, false);
        assert_eq!(built.motion, None);
    }

    #[test]
    fn test_motion_channel_filters_static_subject() {
        let assembler = assembler_with(vec![], &[]);
        let tpl = template(vec![]);
        let selections = vec![
            TokenSelection::new("cameraMovement", "dolly-in"),
            TokenSelection::new("subjectMotion", "static"),
        ];
        let built = assembler.build_prompt(&tpl, &selections, false);
        let motion = built.motion.unwrap();
        assert_eq!(motion.camera_movement, "dolly-in");
        assert_eq!(motion.subject_motion, None);
    }

    #[test]
    fn test_audio_sentinels_normalized_per_field() {
        let assembler = assembler_with(vec![], &[]);
        let tpl = template(vec![]);
        let selections = vec![
            TokenSelection::new("dialog", "none"),
            TokenSelection::new("ambient", "rain"),
            TokenSelection::new("music", "jazz"),
        ];
        let built = assembler.build_prompt(&tpl, &selections, false);
        let audio = built.audio.unwrap();
        assert_eq!(audio.dialog, None);
        assert_eq!(audio.ambient.as_deref(), Some("rain"));
        assert_eq!(audio.music.as_deref(), Some("jazz"));
        assert_eq!(audio.voiceover, None);
    }

    #[test]
    fn test_ambient_silence_sentinel() {
        let assembler = assembler_with(vec![], &[]);
        let tpl = template(vec![]);
        let selections = vec![TokenSelection::new("ambient", "silence")];
        let built = assembler.build_prompt(&tpl, &selections, false);
        // The channel is present (a value was selected) but the field is absent.
        let audio = built.audio.unwrap();
        assert_eq!(audio.ambient, None);
    }

    #[test]
    fn test_no_audio_selections_means_no_audio_channel() {
        let assembler = assembler_with(vec![], &[]);
        let tpl = template(vec![]);
        let built = assembler.build_prompt(&tpl, &[], false);
        assert_eq!(built.audio, None);
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        let assembler = assembler_with(
            vec![token("a", InclusionRule::Always), token("b", InclusionRule::Always)],
            &["ugly"],
        );
        let tpl = template(vec![
            TemplateSlot::new("s1", "a").with_suffix(", "),
            TemplateSlot::new("s2", "b"),
        ]);
        let selections = vec![
            TokenSelection::new("a", "an ugly cat"),
            TokenSelection::new("b", "on a roof"),
        ];
        let first = assembler.build_prompt(&tpl, &selections, true);
        for _ in 0..5 {
            assert_eq!(assembler.build_prompt(&tpl, &selections, true), first);
        }
    }

    #[test]
    fn test_build_motion_prompt() {
        let assembler = assembler_with(vec![], &[]);
        let motion = MotionChannel {
            camera_movement: "dolly-in".to_string(),
            subject_motion: Some("walking".to_string()),
        };
        assert_eq!(
            assembler.build_motion_prompt("red car", Some(&motion)),
            "dolly-in: red car, walking"
        );
        assert_eq!(assembler.build_motion_prompt("red car", None), "red car");

        let static_motion = MotionChannel {
            camera_movement: "static".to_string(),
            subject_motion: Some("walking".to_string()),
        };
        assert_eq!(
            assembler.build_motion_prompt("red car", Some(&static_motion)),
            "red car"
        );
    }

    #[test]
    fn test_build_preview_uses_defaults_and_first_options() {
        let mut shot = token("shot", InclusionRule::Always);
        shot.options = vec![TokenOption::new("wide", "Wide")];
        let mut subject = token("subject", InclusionRule::Always);
        subject.default_value = "a lighthouse".to_string();
        let assembler = assembler_with(vec![shot, subject], &[]);
        let tpl = template(vec![
            TemplateSlot::new("s1", "shot").with_suffix(" of "),
            TemplateSlot::new("s2", "subject"),
        ]);
        assert_eq!(assembler.build_preview(&tpl, false), "wide of a lighthouse");
    }

    #[test]
    fn test_validate_selections_reports_missing_required() {
        let mut subject = token("subject", InclusionRule::Always);
        subject.label = "Subject".to_string();
        subject.required = true;
        let assembler = assembler_with(vec![subject], &[]);
        let tpl = template(vec![TemplateSlot::new("s1", "subject")]);

        let report = assembler.validate_selections(&tpl, &[]);
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Subject is required".to_string()]);

        let report = assembler
            .validate_selections(&tpl, &[TokenSelection::new("subject", "a fox")]);
        assert!(report.valid);
        assert!(report.errors.is_empty());

        let report = assembler
            .validate_selections(&tpl, &[TokenSelection::custom("subject", "a vixen")]);
        assert!(report.valid);
    }

    #[test]
    fn test_validate_ignores_slots_with_missing_tokens() {
        let assembler = assembler_with(vec![], &[]);
        let tpl = template(vec![TemplateSlot::new("s1", "ghost")]);
        let report = assembler.validate_selections(&tpl, &[]);
        assert!(report.valid);
    }

    #[test]
    fn test_truncate_for_delivery() {
        let short = "a".repeat(1000);
        assert_eq!(truncate_for_delivery(&short), short);

        let long = "a".repeat(1001);
        let truncated = truncate_for_delivery(&long);
        assert_eq!(truncated.chars().count(), 1000);
        assert!(truncated.ends_with("..."));
        assert!(truncated.starts_with("aaa"));
    }

    #[test]
    fn test_all_tokens_sorted_by_id() {
        let assembler = assembler_with(
            vec![token("zebra", InclusionRule::Always), token("apple", InclusionRule::Always)],
            &[],
        );
        let ids: Vec<&str> = assembler.all_tokens().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["apple", "zebra"]);
    }

    #[test]
    fn test_set_banned_terms_renormalizes() {
        let mut assembler =
            assembler_with(vec![token("desc", InclusionRule::Always)], &[]);
        assembler.set_banned_terms(&["UGLY".to_string()]);
        let tpl = template(vec![TemplateSlot::new("s1", "desc")]);
        let built = assembler.build_prompt(
            &tpl,
            &[TokenSelection::new("desc", "an ugly dog")],
            false,
        );
        assert_eq!(built.base, "an dog");
        assert_eq!(built.warnings, vec!["Removed banned terms: ugly".to_string()]);
    }
}
