//! Golog program and expression data model plus structural validation.

mod model;
pub mod validate;

pub use model::*;
pub use validate::{ValidationError, validate_program};
