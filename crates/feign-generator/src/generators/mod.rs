//! Synthesis rules for each shape category.
//!
//! Scalar and timestamp rules draw straight from the [`RandomSource`].
//! Composite and collection rules recurse into [`Filler::generate`] for
//! their parts.
//!
//! [`RandomSource`]: crate::RandomSource
//! [`Filler::generate`]: crate::Filler::generate

pub mod collection;
pub mod composite;
pub mod scalar;
pub mod timestamp;
