//! Domain layer for widgetdesk
//!
//! This crate contains the widget configuration document, its validation
//! rules, and the undo/redo history. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Document
//!
//! A [`WidgetConfig`] is always fully populated. Edits arrive as a
//! [`WidgetConfigPatch`] and are overlaid on the current document, so
//! undefined values can never enter the history.
//!
//! ## Validation
//!
//! - **Field-level**: one rule per [`Field`], run on every mutation
//! - **Document-level**: every rule, run before persistence; failures are
//!   ranked by field declaration order and mapped to a [`Section`]

pub mod core;
pub mod editor;
pub mod history;
pub mod widget;

// Re-export commonly used types
pub use core::error::DomainError;
pub use editor::command::{EditorCommand, KeyChord};
pub use history::{HISTORY_LIMIT, History};
pub use widget::{
    document::{AutoTrigger, Position, Template, Theme, WidgetConfig},
    errors::ErrorMap,
    field::{Field, Section},
    model_ref::ModelReference,
    patch::{AutoTriggerPatch, WidgetConfigPatch},
    validation::{validate_document, validate_field},
};
