//! Recursive fill engine.
//!
//! [`Filler::generate`] decides the value of one slot:
//!
//! 1. A non-root slot first asks every override in order; the first answer
//!    wins and is converted to the slot's shape.
//! 2. Otherwise the slot's shape selects a synthesis rule from
//!    [`crate::generators`].
//! 3. An interface holding a value is generated as that value's own shape.
//!    Channels, functions and empty interfaces yield
//!    [`Generated::Unsupported`]. Struct fields, array and slice elements
//!    absorb it by staying zero; map entries are skipped; pointers pass it
//!    up to their own container. At the root it becomes
//!    [`FillError::UnsupportedShape`].

use crate::generators::{collection, composite, scalar, timestamp};
use crate::hooks::Override;
use crate::random::RandomSource;
use feign_core::{FillError, Fillable, Shape, Value};
use tracing::trace;

/// Outcome of generating a single slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    /// A value of exactly the requested shape
    Value(Value),

    /// The shape has no synthesis rule; carries its kind name
    Unsupported(&'static str),
}

impl Generated {
    /// The generated value, or the zero value of `shape` if unsupported.
    pub fn or_zero(self, shape: &Shape) -> Value {
        match self {
            Self::Value(value) => value,
            Self::Unsupported(_) => shape.zero_value(),
        }
    }
}

/// Fill engine bound to a random source and a list of overrides.
pub struct Filler<'a> {
    source: &'a RandomSource,
    hooks: Vec<&'a dyn Override>,
}

impl<'a> Filler<'a> {
    pub fn new(source: &'a RandomSource) -> Self {
        Self {
            source,
            hooks: Vec::new(),
        }
    }

    /// Append an override, consulted after those already registered.
    pub fn with_hook(mut self, hook: &'a dyn Override) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Append several overrides in order.
    pub fn with_hooks(mut self, hooks: &[&'a dyn Override]) -> Self {
        self.hooks.extend_from_slice(hooks);
        self
    }

    pub fn source(&self) -> &'a RandomSource {
        self.source
    }

    /// Fill a typed target.
    ///
    /// The target is the referent of the root pointer: its current contents
    /// are the sample, and it is only written once the whole value has been
    /// generated. The write goes through [`Fillable::assign`], so channel
    /// and function handles already in the target are kept.
    pub fn fill<T: Fillable>(&self, target: &mut T) -> Result<(), FillError> {
        let shape = T::shape();
        let value = self.fill_root(&shape, &target.to_value())?;
        target.assign(value)
    }

    /// Fill a dynamic target through a pointer.
    ///
    /// `target` must be a non-null [`Value::Pointer`] described by a
    /// [`Shape::Pointer`]. Only the pointee is replaced, and only on success.
    pub fn fill_value(&self, target: &mut Value, shape: &Shape) -> Result<(), FillError> {
        let Shape::Pointer { pointee } = shape else {
            return Err(FillError::InvalidTarget(format!(
                "not a pointer shape: {}",
                shape.kind_name()
            )));
        };

        match target {
            Value::Pointer(inner) => {
                let filled = self.fill_root(pointee, &**inner)?;
                **inner = filled;
                Ok(())
            }
            Value::Null => Err(FillError::InvalidTarget("nil pointer".to_string())),
            other => Err(FillError::InvalidTarget(format!(
                "not a pointer value: {}",
                other.kind_name()
            ))),
        }
    }

    fn fill_root(&self, shape: &Shape, sample: &Value) -> Result<Value, FillError> {
        match self.generate("", shape, sample)? {
            Generated::Value(value) => Ok(value),
            Generated::Unsupported(kind) => Err(FillError::UnsupportedShape { kind }),
        }
    }

    /// Generate the value of the slot at `path`.
    ///
    /// `sample` is the slot's current contents. Pointers descend into an
    /// existing referent rather than a fresh zero one, and interfaces take
    /// their concrete shape from it.
    pub fn generate(
        &self,
        path: &str,
        shape: &Shape,
        sample: &Value,
    ) -> Result<Generated, FillError> {
        if !path.is_empty() {
            for hook in &self.hooks {
                if let Some(value) = hook.lookup(path) {
                    trace!(path, kind = shape.kind_name(), "Override supplied value");
                    return value.convert_to(shape).map(Generated::Value);
                }
            }
        }

        self.synthesize(path, shape, sample)
    }

    fn synthesize(
        &self,
        path: &str,
        shape: &Shape,
        sample: &Value,
    ) -> Result<Generated, FillError> {
        let source = self.source;
        let value = match shape {
            Shape::Bool => scalar::generate_bool(source),
            Shape::Int(width) => scalar::generate_int(source, *width),
            Shape::UInt(width) => scalar::generate_uint(source, *width),
            Shape::Float32 => scalar::generate_f32(source),
            Shape::Float64 => scalar::generate_f64(source),
            Shape::String => scalar::generate_string(source),
            Shape::Timestamp => timestamp::generate_timestamp(source)?,
            Shape::Pointer { pointee } => {
                return composite::generate_pointer(self, path, pointee, sample)
            }
            Shape::Struct { fields, .. } => composite::generate_struct(self, path, fields)?,
            Shape::Array { len, element } => composite::generate_array(self, path, *len, element)?,
            Shape::Slice { element } => collection::generate_slice(self, path, element)?,
            Shape::Map { key, value } => collection::generate_map(self, path, key, value)?,
            Shape::Interface => {
                return match sample.inferred_shape() {
                    Some(concrete) => self.synthesize(path, &concrete, sample),
                    None => Ok(Generated::Unsupported(shape.kind_name())),
                }
            }
            Shape::Channel | Shape::Function => {
                return Ok(Generated::Unsupported(shape.kind_name()))
            }
        };

        Ok(Generated::Value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Overrides;
    use feign_core::{Boundaries, Boundary, Field, IntWidth};
    use std::sync::Mutex;

    fn person_shape() -> Shape {
        Shape::structure(
            "Person",
            vec![
                Field::new("Name", Shape::String),
                Field::new("Age", Shape::Int(IntWidth::W64)),
                Field::new(
                    "Address",
                    Shape::structure(
                        "Address",
                        vec![
                            Field::new("City", Shape::String),
                            Field::new("Zip", Shape::UInt(IntWidth::W32)),
                        ],
                    ),
                ),
                Field::new("Manager", Shape::pointer(Shape::String)),
                Field::unexported("secret", Shape::String),
            ],
        )
    }

    fn fill_dynamic(filler: &Filler<'_>, shape: Shape) -> Result<Value, FillError> {
        let pointer = Shape::pointer(shape.clone());
        let mut target = Value::pointer(shape.zero_value());
        filler.fill_value(&mut target, &pointer)?;
        Ok(target.as_pointee().cloned().unwrap_or(Value::Null))
    }

    #[test]
    fn test_paths_passed_to_hooks() {
        let source = RandomSource::with_seed(42);
        let seen = Mutex::new(Vec::new());
        {
            let hook = |path: &str| -> Option<Value> {
                seen.lock().unwrap().push(path.to_string());
                None
            };
            let filler = Filler::new(&source).with_hook(&hook);
            fill_dynamic(&filler, person_shape()).unwrap();
        }

        let seen = seen.into_inner().unwrap();
        assert_eq!(
            seen,
            vec![".Name", ".Age", ".Address", ".Address.City", ".Address.Zip", ".Manager", ".Manager"]
        );
        assert!(!seen.iter().any(|p| p.is_empty()));
    }

    #[test]
    fn test_first_hook_wins() {
        let source = RandomSource::with_seed(42);
        let first = Overrides::new().set(".Name", "first");
        let second = Overrides::new().set(".Name", "second").set(".Age", 7i64);
        let filler = Filler::new(&source).with_hooks(&[&first, &second]);

        let value = fill_dynamic(&filler, person_shape()).unwrap();

        assert_eq!(value.field("Name"), Some(&Value::from("first")));
        assert_eq!(value.field("Age"), Some(&Value::I64(7)));
    }

    #[test]
    fn test_override_converts_to_slot_shape() {
        let source = RandomSource::with_seed(42);
        let hooks = Overrides::new()
            .set(".Address.Zip", 94107i64)
            .set(".Manager", "Grace");
        let filler = Filler::new(&source).with_hook(&hooks);

        let value = fill_dynamic(&filler, person_shape()).unwrap();

        assert_eq!(value.at_path(".Address.Zip"), Some(&Value::U32(94107)));
        assert_eq!(
            value.at_path(".Manager"),
            Some(&Value::pointer(Value::from("Grace")))
        );
    }

    #[test]
    fn test_null_override_zeroes_slot() {
        let source = RandomSource::with_seed(42);
        let hooks = Overrides::new().null(".Manager").null(".Name");
        let filler = Filler::new(&source).with_hook(&hooks);

        let value = fill_dynamic(&filler, person_shape()).unwrap();

        assert_eq!(value.field("Manager"), Some(&Value::Null));
        assert_eq!(value.field("Name"), Some(&Value::from("")));
    }

    #[test]
    fn test_mismatched_override_fails() {
        let source = RandomSource::with_seed(42);
        let hooks = Overrides::new().set(".Age", "old");
        let filler = Filler::new(&source).with_hook(&hooks);

        let result = fill_dynamic(&filler, person_shape());

        assert!(matches!(result, Err(FillError::Conversion { .. })));
    }

    #[test]
    fn test_unexported_field_untouched() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);

        let value = fill_dynamic(&filler, person_shape()).unwrap();

        assert_eq!(value.field("secret"), Some(&Value::from("")));
        assert!(!value.field("Name").and_then(Value::as_str).unwrap().is_empty());
        assert!(value.at_path(".Manager").is_some());
    }

    #[test]
    fn test_unsupported_root_leaves_target() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);
        let mut target = Value::pointer(Value::Null);

        let result = filler.fill_value(&mut target, &Shape::pointer(Shape::Channel));

        assert!(matches!(
            result,
            Err(FillError::UnsupportedShape { kind: "channel" })
        ));
        assert_eq!(target, Value::pointer(Value::Null));
    }

    #[test]
    fn test_invalid_targets() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);

        let mut null = Value::Null;
        assert!(matches!(
            filler.fill_value(&mut null, &Shape::pointer(Shape::String)),
            Err(FillError::InvalidTarget(_))
        ));

        let mut plain = Value::from("x");
        assert!(matches!(
            filler.fill_value(&mut plain, &Shape::pointer(Shape::String)),
            Err(FillError::InvalidTarget(_))
        ));

        let mut pointer = Value::pointer(Value::from("x"));
        assert!(matches!(
            filler.fill_value(&mut pointer, &Shape::String),
            Err(FillError::InvalidTarget(_))
        ));
        assert_eq!(pointer, Value::pointer(Value::from("x")));
    }

    #[test]
    fn test_unsupported_fields_skipped() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);
        let shape = Shape::structure(
            "Handle",
            vec![
                Field::new("Events", Shape::Channel),
                Field::new("Callback", Shape::pointer(Shape::Function)),
                Field::new("Any", Shape::Interface),
                Field::new("Label", Shape::String),
            ],
        );

        let value = fill_dynamic(&filler, shape).unwrap();

        assert_eq!(value.field("Events"), Some(&Value::Null));
        assert_eq!(value.field("Callback"), Some(&Value::Null));
        assert_eq!(value.field("Any"), Some(&Value::Null));
        assert!(!value.field("Label").and_then(Value::as_str).unwrap().is_empty());
    }

    #[test]
    fn test_interface_field_takes_override() {
        let source = RandomSource::with_seed(42);
        let hooks = Overrides::new().set(".Any", vec![1i64, 2]);
        let filler = Filler::new(&source).with_hook(&hooks);
        let shape = Shape::structure("Box", vec![Field::new("Any", Shape::Interface)]);

        let value = fill_dynamic(&filler, shape).unwrap();

        assert_eq!(
            value.field("Any"),
            Some(&Value::Seq(vec![Value::I64(1), Value::I64(2)]))
        );
    }

    #[test]
    fn test_interface_generates_held_shape() {
        let source = RandomSource::with_seed(42);
        let seen = Mutex::new(Vec::new());
        let hook = |path: &str| -> Option<Value> {
            seen.lock().unwrap().push(path.to_string());
            None
        };
        let filler = Filler::new(&source).with_hook(&hook);
        let shape = Shape::pointer(Shape::Interface);

        let mut target = Value::pointer(Value::from("hello"));
        filler.fill_value(&mut target, &shape).unwrap();
        let filled = target.as_pointee().and_then(Value::as_str).unwrap();
        assert_ne!(filled, "hello");
        assert!(!filled.is_empty());

        let mut target = Value::pointer(Value::Struct(vec![
            ("Id".to_string(), Value::U8(0)),
            ("Note".to_string(), Value::Null),
        ]));
        filler.fill_value(&mut target, &shape).unwrap();
        assert!(matches!(target.at_path(".Id"), Some(Value::U8(_))));
        assert_eq!(target.at_path(".Note"), Some(&Value::Null));

        drop(filler);
        assert_eq!(seen.into_inner().unwrap(), vec![".Id", ".Note"]);
    }

    #[test]
    fn test_interface_behind_pointer() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);
        let shape = Shape::pointer(Shape::pointer(Shape::Interface));

        let mut target = Value::pointer(Value::pointer(Value::I32(5)));
        filler.fill_value(&mut target, &shape).unwrap();
        let inner = target.as_pointee().and_then(Value::as_pointee);
        assert!(matches!(inner, Some(Value::I32(_))));

        let mut empty = Value::pointer(Value::pointer(Value::Null));
        assert!(matches!(
            filler.fill_value(&mut empty, &shape),
            Err(FillError::UnsupportedShape { kind: "any" })
        ));
    }

    #[test]
    fn test_pointer_sample_is_followed() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);
        let shape = Shape::pointer(Shape::pointer(Shape::Int(IntWidth::W8)));
        let mut target = Value::pointer(Value::pointer(Value::I8(0)));

        filler.fill_value(&mut target, &shape).unwrap();

        let inner = target.as_pointee().and_then(Value::as_pointee);
        assert!(matches!(inner, Some(Value::I8(_))));
    }

    #[test]
    fn test_same_seed_same_output() {
        let first = RandomSource::with_seed(99);
        let second = RandomSource::with_seed(99);

        let a = fill_dynamic(&Filler::new(&first), person_shape()).unwrap();
        let b = fill_dynamic(&Filler::new(&second), person_shape()).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_sized_collections_are_null() {
        let source = RandomSource::with_seed(42);
        source
            .set_boundaries(Boundaries {
                collection: Boundary::new(0, 1),
                ..Boundaries::default()
            })
            .unwrap();
        let filler = Filler::new(&source);

        let slice = fill_dynamic(&filler, Shape::slice(Shape::Bool)).unwrap();
        let map = fill_dynamic(&filler, Shape::map(Shape::String, Shape::Bool)).unwrap();

        assert_eq!(slice, Value::Null);
        assert_eq!(map, Value::Null);
    }

    #[test]
    fn test_filled_value_serializes() {
        let source = RandomSource::with_seed(42);
        let hooks = Overrides::new().set(".Name", "Ada").null(".Manager");
        let filler = Filler::new(&source).with_hook(&hooks);

        let value = fill_dynamic(&filler, person_shape()).unwrap();
        let json = serde_json::to_value(&value).unwrap();

        assert_eq!(json["Name"], "Ada");
        assert!(json["Manager"].is_null());
        assert!(json["Address"]["Zip"].is_u64());
    }

    #[test]
    fn test_typed_fill() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);

        let mut values: Vec<u16> = Vec::new();
        filler.fill(&mut values).unwrap();
        assert!((1..64).contains(&values.len()));

        let mut name: Option<String> = None;
        filler.fill(&mut name).unwrap();
        assert!(name.is_some_and(|n| !n.is_empty()));
    }
}
