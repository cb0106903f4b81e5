//! Slice and map generators.

use crate::filler::{Filler, Generated};
use feign_core::value::MapBuilder;
use feign_core::{FillError, Shape, Value};

/// Generate a slice whose length is drawn from the collection boundary.
///
/// A zero length yields `Null`, the absent slice. Elements share the slice's
/// path; unsupported ones stay zero.
pub fn generate_slice(filler: &Filler<'_>, path: &str, element: &Shape) -> Result<Value, FillError> {
    let len = filler.source().next_collection_size();
    if len == 0 {
        return Ok(Value::Null);
    }

    let zero = element.zero_value();
    let mut items = Vec::with_capacity(len);
    for _ in 0..len {
        items.push(filler.generate(path, element, &zero)?.or_zero(element));
    }

    Ok(Value::Seq(items))
}

/// Generate a map with up to the drawn number of entries.
///
/// Keys and values share the map's path. An entry whose key or value is
/// unsupported is skipped, and colliding keys overwrite each other, so the
/// map may end up smaller than drawn. A zero draw yields `Null`.
pub fn generate_map(
    filler: &Filler<'_>,
    path: &str,
    key: &Shape,
    value: &Shape,
) -> Result<Value, FillError> {
    let len = filler.source().next_collection_size();
    if len == 0 {
        return Ok(Value::Null);
    }

    let key_zero = key.zero_value();
    let value_zero = value.zero_value();
    let mut entries = MapBuilder::with_capacity(len);
    for _ in 0..len {
        let Generated::Value(k) = filler.generate(path, key, &key_zero)? else {
            continue;
        };
        let Generated::Value(v) = filler.generate(path, value, &value_zero)? else {
            continue;
        };
        entries.insert(k, v);
    }

    Ok(entries.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Overrides;
    use crate::random::RandomSource;
    use feign_core::{Boundaries, Boundary};

    #[test]
    fn test_generate_slice_length() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);

        for _ in 0..20 {
            let value = generate_slice(&filler, ".S", &Shape::String).unwrap();
            let items = value.as_seq().unwrap();
            assert!((1..64).contains(&items.len()));
        }
    }

    #[test]
    fn test_generate_slice_of_unsupported() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);

        let value = generate_slice(&filler, ".S", &Shape::Interface).unwrap();

        assert!(value.as_seq().unwrap().iter().all(Value::is_null));
    }

    #[test]
    fn test_generate_map_skips_unsupported() {
        let source = RandomSource::with_seed(42);
        let filler = Filler::new(&source);

        let value = generate_map(&filler, ".M", &Shape::String, &Shape::Channel).unwrap();
        assert_eq!(value, Value::Map(Vec::new()));

        let value = generate_map(&filler, ".M", &Shape::Interface, &Shape::Bool).unwrap();
        assert_eq!(value, Value::Map(Vec::new()));
    }

    #[test]
    fn test_generate_map_unsupported_key_skips_value() {
        let source = RandomSource::with_seed(7);
        let filler = Filler::new(&source);
        generate_map(&filler, ".M", &Shape::Function, &Shape::String).unwrap();
        let after_skipped = source.next_i64();

        let reference = RandomSource::with_seed(7);
        reference.next_collection_size();
        assert_eq!(after_skipped, reference.next_i64());
    }

    #[test]
    fn test_generate_map_collisions_shrink() {
        let source = RandomSource::with_seed(42);
        source
            .set_boundaries(Boundaries {
                collection: Boundary::new(10, 11),
                ..Boundaries::default()
            })
            .unwrap();
        let hooks = Overrides::new().set(".M", "same");
        let filler = Filler::new(&source).with_hook(&hooks);

        let value = generate_map(&filler, ".M", &Shape::String, &Shape::String).unwrap();

        assert_eq!(
            value,
            Value::Map(vec![(Value::from("same"), Value::from("same"))])
        );
    }

    #[test]
    fn test_zero_draw_is_null() {
        let source = RandomSource::with_seed(42);
        source
            .set_boundaries(Boundaries {
                collection: Boundary::new(0, 1),
                ..Boundaries::default()
            })
            .unwrap();
        let filler = Filler::new(&source);

        assert_eq!(generate_slice(&filler, ".S", &Shape::Bool).unwrap(), Value::Null);
        assert_eq!(
            generate_map(&filler, ".M", &Shape::Bool, &Shape::Bool).unwrap(),
            Value::Null
        );
    }
}
