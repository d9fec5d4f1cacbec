//! Rules shared by the identification-field extractors.

pub mod patterns;
pub mod validity;

pub use patterns::LabelPatterns;
pub use validity::{is_bad_value, is_valid_value};
