//! Scalar value generators.

use crate::random::RandomSource;
use feign_core::{IntWidth, Value};

/// Generate a fair random boolean.
pub fn generate_bool(source: &RandomSource) -> Value {
    Value::Bool(source.next_bool())
}

/// Generate a signed integer of the given width.
pub fn generate_int(source: &RandomSource, width: IntWidth) -> Value {
    Value::signed(width, source.next_int(width))
}

/// Generate an unsigned integer of the given width.
pub fn generate_uint(source: &RandomSource, width: IntWidth) -> Value {
    Value::unsigned(width, source.next_uint(width))
}

pub fn generate_f32(source: &RandomSource) -> Value {
    Value::F32(source.next_f32())
}

pub fn generate_f64(source: &RandomSource) -> Value {
    Value::F64(source.next_f64())
}

/// Generate a string of letters and spaces.
pub fn generate_string(source: &RandomSource) -> Value {
    Value::String(source.next_string())
}
