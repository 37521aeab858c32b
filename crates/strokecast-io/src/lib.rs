//! CSV loading and categorical encoding for the stroke dataset.

mod codes;
mod error;
mod loader;

pub use codes::{GENDER_CODES, SMOKING_CODES, gender_code, smoking_code};
pub use error::IoError;
pub use loader::{FEATURE_NAMES, LoadedData, StrokeReader};
