//! Utility functions for code generation, URL validation, and error classification.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_validator`] - Absolute URL validation
//! - [`db_error`] - SQLx error classification

pub mod code_generator;
pub mod db_error;
pub mod url_validator;
