//! Timestamp value generator.

use crate::random::RandomSource;
use chrono::{DateTime, Duration, Utc};
use feign_core::{FillError, Value};

/// Generate a timestamp offset from the zero timestamp by a random
/// full-width number of nanoseconds.
///
/// Negative draws land before the epoch. The whole `i64` nanosecond range
/// (roughly 292 years either side) is representable, so the checked
/// addition only fails if the zero timestamp itself changes.
pub fn generate_timestamp(source: &RandomSource) -> Result<Value, FillError> {
    let zero = DateTime::<Utc>::default();
    let offset = Duration::nanoseconds(source.next_i64());

    zero.checked_add_signed(offset)
        .map(Value::Timestamp)
        .ok_or_else(|| FillError::Conversion {
            expected: "timestamp".to_string(),
            found: format!("offset of {}ns", offset.num_nanoseconds().unwrap_or_default()),
        })
}
