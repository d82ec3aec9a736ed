//! Build errors for feature builders.

use thiserror::Error;

/// Errors that can occur when building a feature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Reducer not specified. Call .reducer(fn) before .build()")]
    MissingReducer,

    #[error("Effects implementation not specified. Call .effects(fn) or .without_effects()")]
    MissingEffects,
}
