//! Widget configuration document and its schema.
//!
//! - [`document::WidgetConfig`]: the always fully populated settings object
//! - [`patch::WidgetConfigPatch`]: partial changes applied by UI mutations
//! - [`field::Field`] / [`field::Section`]: field paths and the section table
//! - [`validation`]: field-level and document-level rules
//! - [`errors::ErrorMap`]: field path → message map
//! - [`model_ref::ModelReference`]: AI model identifier recognition

pub mod document;
pub mod errors;
pub mod field;
pub mod model_ref;
pub mod patch;
pub mod validation;
