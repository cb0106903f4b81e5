//! Pointer, struct and array generators.

use crate::filler::{Filler, Generated};
use feign_core::{Field, FillError, Shape, Value};
use tracing::trace;

/// Generate a pointer to a fresh value.
///
/// A non-null `sample` is descended into, so an existing referent's own
/// pointers are followed; otherwise generation starts from the zero value of
/// `pointee`. The path is not extended, and an unsupported pointee is passed
/// up unchanged.
pub fn generate_pointer(
    filler: &Filler<'_>,
    path: &str,
    pointee: &Shape,
    sample: &Value,
) -> Result<Generated, FillError> {
    let zero;
    let inner = match sample.as_pointee() {
        Some(inner) => inner,
        None => {
            zero = pointee.zero_value();
            &zero
        }
    };

    match filler.generate(path, pointee, inner)? {
        Generated::Value(value) => Ok(Generated::Value(Value::pointer(value))),
        unsupported => Ok(unsupported),
    }
}

/// Generate a struct field by field.
///
/// Unexported fields keep their zero value. Exported fields are generated
/// under `<path>.<name>`; those with an unsupported shape stay zero.
pub fn generate_struct(
    filler: &Filler<'_>,
    path: &str,
    fields: &[Field],
) -> Result<Value, FillError> {
    let mut entries = Vec::with_capacity(fields.len());

    for field in fields {
        let zero = field.shape.zero_value();
        if !field.exported {
            entries.push((field.name.clone(), zero));
            continue;
        }

        let field_path = format!("{path}.{}", field.name);
        let value = match filler.generate(&field_path, &field.shape, &zero)? {
            Generated::Value(value) => value,
            Generated::Unsupported(kind) => {
                trace!(path = %field_path, kind, "Skipping unsupported field");
                zero
            }
        };
        entries.push((field.name.clone(), value));
    }

    Ok(Value::Struct(entries))
}

/// Generate every element of a fixed-length array at the array's own path.
pub fn generate_array(
    filler: &Filler<'_>,
    path: &str,
    len: usize,
    element: &Shape,
) -> Result<Value, FillError> {
    let zero = element.zero_value();
    let mut items = Vec::with_capacity(len);

    for _ in 0..len {
        items.push(filler.generate(path, element, &zero)?.or_zero(element));
    }

    Ok(Value::Seq(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Overrides;
    use crate::random::RandomSource;
    use feign_core::IntWidth;

    #[test]
    fn test_generate_struct_paths() {
        let source = RandomSource::with_seed(42);
        let hooks = Overrides::new().set(".Outer.Inner", "nested");
        let filler = Filler::new(&source).with_hook(&hooks);
        let fields = vec![Field::new(
            "Inner",
            Shape::structure("Leaf", vec![Field::new("Other", Shape::Bool)]),
        )];

        let value = generate_struct(&filler, ".Outer", &[Field::new("Inner", Shape::String)]).unwrap();
        assert_eq!(value.field("Inner"), Some(&Value::from("nested")));

        let value = generate_struct(&filler, "", &fields).unwrap();
        assert!(matches!(value.at_path(".Inner.Other"), Some(Value::Bool(_))));
    }

    #[test]
    fn test_generate_pointer_unsupported_passes_up() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);

        let result = generate_pointer(&filler, ".F", &Shape::Function, &Value::Null).unwrap();

        assert_eq!(result, Generated::Unsupported("function"));
    }

    #[test]
    fn test_generate_array_elements() {
        let source = RandomSource::with_seed(42);
        let hooks = Overrides::new().set(".Bytes", 9i64);
        let filler = Filler::new(&source).with_hook(&hooks);

        let value = generate_array(&filler, ".Bytes", 4, &Shape::UInt(IntWidth::W8)).unwrap();
        assert_eq!(value, Value::Seq(vec![Value::U8(9); 4]));

        let value = generate_array(&filler, ".Chans", 2, &Shape::Channel).unwrap();
        assert_eq!(value, Value::Seq(vec![Value::Null, Value::Null]));
    }
}
