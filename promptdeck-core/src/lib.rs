//! # promptdeck Core
//!
//! This crate provides the core functionality for promptdeck, a system for
//! assembling free-text generation prompts (for image/video/audio models)
//! from structured, reusable templates instead of hand-typed prose.
//!
//! A template is an ordered sequence of slots, each referencing a reusable
//! "token" (a typed prompt fragment with options and an inclusion rule).
//! The assembler turns a template plus per-token selections into a final
//! prompt, separating style, motion, and audio channels and stripping
//! banned terms.
//!
//! # Modules
//!
//! - [`assembler`] - The prompt assembly engine and its built-prompt output
//! - [`defaults`] - Built-in token catalog, templates, and banned terms
//! - [`editor`] - Editing state manager with a closed action set
//! - [`filter`] - Banned-term filtering and prompt cleanup
//! - [`parser`] - Format-string parsing for template import
//! - [`store`] - Config persistence traits and the file-backed store
//! - [`template`] - Templates, slots, and slot ordering
//! - [`token`] - Token definitions, categories, and selections
//!
//! # Examples
//!
//! ```rust
//! use promptdeck_core::editor::EditorState;
//! use promptdeck_core::token::TokenSelection;
//!
//! let state = EditorState::default();
//! let assembler = state.assembler();
//! let template = state.template("tpl-shot-creator-quick").unwrap();
//!
//! let selections = vec![
//!     TokenSelection::new("shotSize", "CU"),
//!     TokenSelection::new("subject", "a lighthouse keeper"),
//! ];
//! let built = assembler.build_prompt(template, &selections, false);
//! assert_eq!(built.base, "close-up of a lighthouse keeper");
//! ```

pub mod assembler;
pub mod defaults;
pub mod editor;
pub mod filter;
pub mod parser;
pub mod store;
pub mod template;
pub mod token;
