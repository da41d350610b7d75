use thiserror::Error;

/// Errors raised while marshalling DTOs to/from the backend's generic
/// property map.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("object type {actual:?} is not a {expected}")]
    WrongType { expected: &'static str, actual: String },

    #[error("missing required property {0:?}")]
    MissingField(&'static str),

    #[error("property {field:?} has the wrong shape: {reason}")]
    BadField { field: &'static str, reason: String },
}
