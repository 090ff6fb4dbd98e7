//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, malformed surfaces, missing run inputs and a missing
//! scalar-field layer.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid surface: {0}")]
    InvalidSurface(String),

    #[error("no surface selected for placement")]
    MissingSurface,

    #[error("no prototype selected for placement")]
    MissingPrototype,

    #[error("surface '{surface}' has no color layer to derive a scalar field from")]
    MissingField { surface: String },
}
