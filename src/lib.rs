//! feign
//!
//! Fill values with random data. Useful in tests that only need to verify
//! persistence and retrieval and do not care about realistic values.
//!
//! # Features
//!
//! - Typed filling of any [`Fillable`] type, including structs declared with
//!   [`fillable!`]
//! - Dynamic filling of a [`Value`] described by a [`Shape`]
//! - Per-path overrides (`.Field.Sub`) consulted before random synthesis
//! - A process-wide, reseedable [`RandomSource`] with adjustable boundaries
//!
//! # Example
//!
//! ```rust
//! feign::fillable! {
//!     #[derive(Debug, Default)]
//!     pub struct Account {
//!         pub email: String,
//!         pub balance: i64,
//!         pub tags: Vec<String>,
//!         internal_id: u64,
//!     }
//! }
//!
//! let overrides = feign::Overrides::new().set(".email", "ops@example.com");
//!
//! let mut account = Account::default();
//! feign::fill(&mut account, &[&overrides]).unwrap();
//!
//! assert_eq!(account.email, "ops@example.com");
//! assert!(!account.tags.is_empty());
//! assert_eq!(account.internal_id, 0);
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Three orders from a YAML shape, reproducibly
//! feign --shape order.yaml --seed 42 --count 3
//!
//! # Pin a field and tighten boundaries
//! feign --shape order.yaml --config feign.yaml --set '.Status=shipped'
//! ```

pub mod cli;

pub use feign_core::fillable;
pub use feign_core::{
    Boundaries, Boundary, ConfigError, FeignConfig, Field, FillError, Fillable, IntWidth, Shape,
    Value,
};
pub use feign_generator::{Filler, Generated, Override, Overrides, RandomSource};

/// Reseed the global random source.
pub fn seed(seed: u64) {
    random().seed(seed);
}

/// The global random source used by [`fill`], [`must_fill`] and
/// [`fill_value`].
pub fn random() -> &'static RandomSource {
    RandomSource::global()
}

/// Boundaries of the global random source.
pub fn boundaries() -> Boundaries {
    random().boundaries()
}

/// Replace the boundaries of the global random source.
pub fn set_boundaries(boundaries: Boundaries) -> Result<(), ConfigError> {
    random().set_boundaries(boundaries)
}

/// Apply a loaded configuration to the global random source.
///
/// Boundaries are applied first; the seed, if any, only after they are
/// accepted.
pub fn configure(config: &FeignConfig) -> Result<(), ConfigError> {
    set_boundaries(config.boundaries)?;
    if let Some(seed) = config.seed {
        self::seed(seed);
    }
    Ok(())
}

/// Fill `target` with random data.
///
/// Overrides are consulted in order for every field path; the first to
/// answer wins. On error `target` is left untouched.
pub fn fill<T: Fillable>(target: &mut T, overrides: &[&dyn Override]) -> Result<(), FillError> {
    Filler::new(random()).with_hooks(overrides).fill(target)
}

/// Like [`fill`], but panics on error.
#[track_caller]
pub fn must_fill<T: Fillable>(target: &mut T, overrides: &[&dyn Override]) {
    if let Err(e) = fill(target, overrides) {
        panic!("feign: {e}");
    }
}

/// Fill a dynamic value through a pointer.
///
/// `target` must be a non-null [`Value::Pointer`] and `shape` the matching
/// [`Shape::Pointer`].
pub fn fill_value(
    target: &mut Value,
    shape: &Shape,
    overrides: &[&dyn Override],
) -> Result<(), FillError> {
    Filler::new(random())
        .with_hooks(overrides)
        .fill_value(target, shape)
}
