//! # Template Editing State Manager
//!
//! Owns the live token registry and template list, mutated through a closed
//! set of [`EditorAction`]s so every change is auditable and independently
//! testable. Persistence goes through the [`ConfigStore`] interface;
//! load/save failures surface as a string error in state and never crash
//! the caller.

use crate::assembler::PromptAssembler;
use crate::defaults::{
    default_banned_terms, default_categories, default_templates, default_tokens, CONFIG_VERSION,
};
use crate::store::{ConfigStore, TemplateConfig};
use crate::template::{move_element, PromptTemplate, TemplateSlot};
use crate::token::{CategoryMeta, Token};
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

/// One mutation of the editing state.
#[derive(Debug, Clone)]
pub enum EditorAction {
    AddToken(Token),
    /// Replaces the token with the same id; unknown ids change nothing.
    UpdateToken(Token),
    /// Removes the token and every slot referencing it from every template.
    DeleteToken { token_id: String },
    AddTemplate(PromptTemplate),
    /// Replaces the template with the same id and touches `updated_at`.
    UpdateTemplate(PromptTemplate),
    DeleteTemplate { template_id: String },
    /// Deep-copies the template under a new id with a " (Copy)" name suffix.
    DuplicateTemplate { template_id: String },
    AddSlot {
        template_id: String,
        slot: TemplateSlot,
    },
    RemoveSlot {
        template_id: String,
        slot_id: String,
    },
    /// Moves a slot within a template. Out-of-range indices are a no-op.
    ReorderSlots {
        template_id: String,
        from: usize,
        to: usize,
    },
    UpdateSlot {
        template_id: String,
        slot: TemplateSlot,
    },
    AddBannedTerm(String),
    RemoveBannedTerm(String),
}

/// In-memory editing state. Single-writer; assembly reads snapshots.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub tokens: Vec<Token>,
    pub templates: Vec<PromptTemplate>,
    pub categories: Vec<CategoryMeta>,
    pub banned_terms: Vec<String>,
    pub has_unsaved_changes: bool,
    pub error: Option<String>,
}

impl Default for EditorState {
    fn default() -> Self {
        EditorState {
            tokens: default_tokens(),
            templates: default_templates(),
            categories: default_categories(),
            banned_terms: default_banned_terms(),
            has_unsaved_changes: false,
            error: None,
        }
    }
}

impl EditorState {
    /// Applies one action. Every applied action marks the state as having
    /// unsaved changes, whether or not it found its target.
    pub fn apply(&mut self, action: EditorAction) {
        match action {
            EditorAction::AddToken(token) => {
                self.tokens.push(token);
            }
            EditorAction::UpdateToken(token) => {
                if let Some(existing) = self.tokens.iter_mut().find(|t| t.id == token.id) {
                    *existing = token;
                }
            }
            EditorAction::DeleteToken { token_id } => {
                self.tokens.retain(|t| t.id != token_id);
                for template in &mut self.templates {
                    template.slots.retain(|s| s.token_id != token_id);
                }
            }
            EditorAction::AddTemplate(template) => {
                self.templates.push(template);
            }
            EditorAction::UpdateTemplate(mut template) => {
                template.updated_at = Utc::now();
                if let Some(existing) =
                    self.templates.iter_mut().find(|t| t.id == template.id)
                {
                    *existing = template;
                }
            }
            EditorAction::DeleteTemplate { template_id } => {
                self.templates.retain(|t| t.id != template_id);
            }
            EditorAction::DuplicateTemplate { template_id } => {
                if let Some(template) = self.templates.iter().find(|t| t.id == template_id) {
                    let mut copy = template.clone();
                    copy.id = Uuid::new_v4().to_string();
                    copy.name = format!("{} (Copy)", copy.name);
                    let now = Utc::now();
                    copy.created_at = now;
                    copy.updated_at = now;
                    self.templates.push(copy);
                }
            }
            EditorAction::AddSlot { template_id, slot } => {
                if let Some(template) = self.template_mut(&template_id) {
                    template.slots.push(slot);
                    template.updated_at = Utc::now();
                }
            }
            EditorAction::RemoveSlot {
                template_id,
                slot_id,
            } => {
                if let Some(template) = self.template_mut(&template_id) {
                    template.slots.retain(|s| s.id != slot_id);
                    template.updated_at = Utc::now();
                }
            }
            EditorAction::ReorderSlots {
                template_id,
                from,
                to,
            } => {
                if let Some(template) = self.template_mut(&template_id) {
                    if move_element(&mut template.slots, from, to) {
                        template.updated_at = Utc::now();
                    }
                }
            }
            EditorAction::UpdateSlot { template_id, slot } => {
                if let Some(template) = self.template_mut(&template_id) {
                    if let Some(existing) =
                        template.slots.iter_mut().find(|s| s.id == slot.id)
                    {
                        *existing = slot;
                        template.updated_at = Utc::now();
                    }
                }
            }
            EditorAction::AddBannedTerm(term) => {
                let term = term.trim().to_lowercase();
                if term.is_empty() {
                    return;
                }
                self.banned_terms.push(term);
            }
            EditorAction::RemoveBannedTerm(term) => {
                self.banned_terms.retain(|t| t != &term);
            }
        }
        self.has_unsaved_changes = true;
    }

    pub fn template(&self, template_id: &str) -> Option<&PromptTemplate> {
        self.templates.iter().find(|t| t.id == template_id)
    }

    pub fn token(&self, token_id: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == token_id)
    }

    /// Builds an assembler over a snapshot of the current tokens and
    /// banned terms.
    pub fn assembler(&self) -> PromptAssembler {
        PromptAssembler::new(&self.tokens, &self.banned_terms)
    }

    /// Persists the current state under `key`. On success the unsaved-changes
    /// flag is cleared; on failure the error is captured in state.
    pub fn save_config<S: ConfigStore>(&mut self, store: &S, key: &str) {
        self.error = None;
        let config = TemplateConfig {
            version: CONFIG_VERSION,
            tokens: self.tokens.clone(),
            templates: self.templates.clone(),
            categories: self.categories.clone(),
        };
        match store.save(key, &config) {
            Ok(()) => {
                self.has_unsaved_changes = false;
            }
            Err(e) => {
                warn!(error = %e, "failed to save template config");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Restores state from the document stored under `key`. A missing
    /// document leaves the current state in place; a failed read captures
    /// the error in state without touching tokens or templates.
    pub fn load_config<S: ConfigStore>(&mut self, store: &S, key: &str) {
        self.error = None;
        match store.load(key) {
            Ok(Some(config)) => {
                self.tokens = config.tokens;
                self.templates = config.templates;
                self.categories = config.categories;
                self.has_unsaved_changes = false;
            }
            Ok(None) => {
                self.has_unsaved_changes = false;
            }
            Err(e) => {
                warn!(error = %e, "failed to load template config");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Clears the persisted document and restores the built-in defaults.
    pub fn reset_to_defaults<S: ConfigStore>(&mut self, store: &S, key: &str) {
        let clear_error = store.clear(key).err().map(|e| e.to_string());
        *self = EditorState::default();
        if let Some(message) = clear_error {
            warn!(error = %message, "failed to clear persisted template config");
            self.error = Some(message);
        }
    }

    fn template_mut(&mut self, template_id: &str) -> Option<&mut PromptTemplate> {
        self.templates.iter_mut().find(|t| t.id == template_id)
    }
}
