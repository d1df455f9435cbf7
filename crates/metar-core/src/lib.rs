//! Core wind-group encoding for METAR reports
//!
//! This crate turns one ten-minute wind observation into the METAR
//! surface-wind group (`21015G28KT 180V270`). A [`Normalizer`] produces the
//! canonical per-field tokens and a [`WindEncoder`] assembles them.

pub mod encoder;
pub mod normalizer;
pub mod report;
pub mod tokens;
pub mod types;
pub mod units;

pub use encoder::*;
pub use normalizer::*;
pub use report::*;
pub use tokens::*;
pub use types::*;
pub use units::*;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindError {
    /// A token that must already be numeric could not be parsed.
    #[error("Failed to parse '{parameter}' as an integer. Value: {value}")]
    Parse { parameter: String, value: String },
}

pub type WindResult<T> = Result<T, WindError>;
