//! Error types for the crate.
//!
//! The resolvers themselves never fail on odd data; they return degenerate but
//! usable numbers. `AxisError` covers loading, measurement and the checks a
//! caller can run on a resolved domain.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AxisError {
    /// Chart configuration or row JSON could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A text measurement backend could not size a label.
    #[error("cannot measure {text:?} with font {font:?}")]
    Measurement { text: String, font: String },

    /// The resolved domain is NaN, infinite or inverted.
    #[error("degenerate domain [{min}, {max}]")]
    DegenerateDomain { min: f64, max: f64 },

    /// Broken internal invariant; never caused by input data.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AxisError>;
