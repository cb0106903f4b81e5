//! Error types shared by the shape model and the fill engine.

use crate::shape::Shape;
use crate::value::Value;

/// Error type for fill operations.
#[derive(Debug, thiserror::Error)]
pub enum FillError {
    /// The fill target is not a non-null pointer
    #[error("Invalid fill target: {0}")]
    InvalidTarget(String),

    /// The shape has no synthesis rule and nothing absorbed the signal
    #[error("Unsupported shape: {kind}")]
    UnsupportedShape { kind: &'static str },

    /// A generated or overridden value does not fit its destination slot
    #[error("Cannot convert {found} value to {expected}")]
    Conversion { expected: String, found: String },
}

impl FillError {
    /// Conversion failure from `value` into `shape`.
    pub fn conversion(shape: &Shape, value: &Value) -> Self {
        Self::Conversion {
            expected: shape.kind_name().to_string(),
            found: value.kind_name().to_string(),
        }
    }

    /// Conversion failure from `value` into a named Rust type.
    pub fn conversion_to(type_name: &str, value: &Value) -> Self {
        Self::Conversion {
            expected: type_name.to_string(),
            found: value.kind_name().to_string(),
        }
    }
}
