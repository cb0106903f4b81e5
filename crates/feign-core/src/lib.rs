//! Core types for the feign random data filler.
//!
//! This crate provides the foundational types used by the fill engine:
//!
//! - [`Shape`] - Runtime description of a fillable type
//! - [`Value`] - Dynamic value tree produced by generation
//! - [`Fillable`] - Bridge between Rust types and shapes/values
//! - [`FeignConfig`] - Boundaries and seed loaded from YAML
//!
//! # Architecture
//!
//! ```text
//! feign-core (this crate)
//!    │
//!    ├─── feign-generator  (random source + recursive fill engine)
//!    │
//!    └─── feign            (global facade and CLI)
//! ```
//!
//! # Example
//!
//! ```rust
//! use feign_core::{Fillable, IntWidth, Shape, Value};
//!
//! assert_eq!(<Option<i32>>::shape(), Shape::pointer(Shape::Int(IntWidth::W32)));
//!
//! let value = Value::I64(7).convert_to(&Shape::Int(IntWidth::W8)).unwrap();
//! assert_eq!(i8::from_value(value).unwrap(), 7);
//! ```

pub mod config;
pub mod error;
pub mod fillable;
pub mod shape;
pub mod value;

// Re-exports for convenience
pub use config::{Boundaries, Boundary, ConfigError, FeignConfig};
pub use error::FillError;
pub use fillable::Fillable;
pub use shape::{Field, IntWidth, Shape};
pub use value::Value;
