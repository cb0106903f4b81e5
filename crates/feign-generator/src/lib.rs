//! Random source and recursive fill engine for feign.
//!
//! The engine walks a [`Shape`](feign_core::Shape), consulting caller
//! overrides at every non-root slot and otherwise drawing from a shared
//! [`RandomSource`].
//!
//! # Architecture
//!
//! ```text
//!   Fillable / Shape
//!          │
//!          ▼
//! ┌──────────────────┐      ┌────────────────────┐
//! │      Filler      │─────▶│  Override (hooks)  │
//! │                  │      └────────────────────┘
//! │  - source        │
//! │  - hooks         │      ┌────────────────────┐
//! │                  │─────▶│    RandomSource    │
//! └────────┬─────────┘      │  - Mutex<StdRng>   │
//!          │                │  - Boundaries      │
//!          ▼                └────────────────────┘
//!        Value
//! ```
//!
//! # Example
//!
//! ```rust
//! use feign_core::{Field, Shape, Value};
//! use feign_generator::{Filler, Overrides, RandomSource};
//!
//! let shape = Shape::structure(
//!     "User",
//!     vec![
//!         Field::new("Name", Shape::String),
//!         Field::new("Email", Shape::String),
//!     ],
//! );
//!
//! let source = RandomSource::with_seed(42);
//! let overrides = Overrides::new().set(".Email", "user@example.com");
//! let filler = Filler::new(&source).with_hook(&overrides);
//!
//! let mut target = Value::pointer(shape.zero_value());
//! filler.fill_value(&mut target, &Shape::pointer(shape)).unwrap();
//!
//! assert_eq!(
//!     target.at_path(".Email"),
//!     Some(&Value::from("user@example.com"))
//! );
//! ```

pub mod filler;
pub mod generators;
pub mod hooks;
pub mod random;

// Re-exports for convenience
pub use filler::{Filler, Generated};
pub use hooks::{Override, Overrides};
pub use random::{RandomSource, LETTERS};
