//! Dynamic value tree produced by the fill engine.
//!
//! `Value` is the shape-agnostic result of generation. It carries enough
//! structure to be converted into any compatible [`Shape`] and, through
//! [`crate::Fillable`], into concrete Rust types.

use crate::error::FillError;
use crate::shape::{Field, IntWidth, Shape};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

/// Generated or caller-supplied value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value: the zero representation of pointers, slices, maps and
    /// opaque shapes. As an override result it means "set this slot to zero".
    Null,

    /// Boolean value
    Bool(bool),

    /// 8-bit signed integer
    I8(i8),

    /// 16-bit signed integer
    I16(i16),

    /// 32-bit signed integer
    I32(i32),

    /// 64-bit signed integer
    I64(i64),

    /// 8-bit unsigned integer
    U8(u8),

    /// 16-bit unsigned integer
    U16(u16),

    /// 32-bit unsigned integer
    U32(u32),

    /// 64-bit unsigned integer
    U64(u64),

    /// 32-bit floating point
    F32(f32),

    /// 64-bit floating point
    F64(f64),

    /// String value
    String(String),

    /// Point in time
    Timestamp(DateTime<Utc>),

    /// Non-null reference to another value
    Pointer(Box<Value>),

    /// Struct fields in declaration order
    Struct(Vec<(String, Value)>),

    /// Elements of an array or slice
    Seq(Vec<Value>),

    /// Map entries; keys are unique
    Map(Vec<(Value, Value)>),
}

/// Numeric payload used for cross-width conversion.
#[derive(Debug, Clone, Copy)]
enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Value {
    /// Build a signed integer value of the given width, truncating `n`.
    pub fn signed(width: IntWidth, n: i64) -> Self {
        match width {
            IntWidth::W8 => Self::I8(n as i8),
            IntWidth::W16 => Self::I16(n as i16),
            IntWidth::W32 => Self::I32(n as i32),
            IntWidth::W64 => Self::I64(n),
        }
    }

    /// Build an unsigned integer value of the given width, truncating `n`.
    pub fn unsigned(width: IntWidth, n: u64) -> Self {
        match width {
            IntWidth::W8 => Self::U8(n as u8),
            IntWidth::W16 => Self::U16(n as u16),
            IntWidth::W32 => Self::U32(n as u32),
            IntWidth::W64 => Self::U64(n),
        }
    }

    /// Wrap a value behind a pointer.
    pub fn pointer(value: Value) -> Self {
        Self::Pointer(Box::new(value))
    }

    /// Short name of the value variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I8(_) => "int8",
            Self::I16(_) => "int16",
            Self::I32(_) => "int32",
            Self::I64(_) => "int64",
            Self::U8(_) => "uint8",
            Self::U16(_) => "uint16",
            Self::U32(_) => "uint32",
            Self::U64(_) => "uint64",
            Self::F32(_) => "float32",
            Self::F64(_) => "float64",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Pointer(_) => "pointer",
            Self::Struct(_) => "struct",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64. Unsigned values must fit.
    pub fn as_i64(&self) -> Option<i64> {
        match self.number()? {
            Number::Signed(n) => Some(n),
            Number::Unsigned(n) => i64::try_from(n).ok(),
            Number::Float(_) => None,
        }
    }

    /// Try to get this value as a u64. Signed values must be non-negative.
    pub fn as_u64(&self) -> Option<u64> {
        match self.number()? {
            Number::Signed(n) => u64::try_from(n).ok(),
            Number::Unsigned(n) => Some(n),
            Number::Float(_) => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(f) => Some(*f as f64),
            Self::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Follow a pointer, if this is one.
    pub fn as_pointee(&self) -> Option<&Value> {
        match self {
            Self::Pointer(inner) => Some(&**inner),
            _ => None,
        }
    }

    /// Try to get this value as a sequence.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Get a struct field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Resolve a structural path such as `.Items.Name` against this value.
    ///
    /// Pointers are followed transparently. Sequences and maps do not
    /// extend the path, so resolution stops at them.
    pub fn at_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            while let Self::Pointer(inner) = current {
                current = &**inner;
            }
            current = current.field(segment)?;
        }
        Some(current)
    }

    /// Total order over values, used to index and sort map keys.
    ///
    /// Values of different variants order by variant. Floats order
    /// numerically with `0.0 == -0.0`; NaN sorts last and equals itself.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::I8(a), Self::I8(b)) => a.cmp(b),
            (Self::I16(a), Self::I16(b)) => a.cmp(b),
            (Self::I32(a), Self::I32(b)) => a.cmp(b),
            (Self::I64(a), Self::I64(b)) => a.cmp(b),
            (Self::U8(a), Self::U8(b)) => a.cmp(b),
            (Self::U16(a), Self::U16(b)) => a.cmp(b),
            (Self::U32(a), Self::U32(b)) => a.cmp(b),
            (Self::U64(a), Self::U64(b)) => a.cmp(b),
            (Self::F32(a), Self::F32(b)) => float_cmp(*a as f64, *b as f64),
            (Self::F64(a), Self::F64(b)) => float_cmp(*a, *b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::Pointer(a), Self::Pointer(b)) => a.total_cmp(b),
            (Self::Struct(a), Self::Struct(b)) => a.len().cmp(&b.len()).then_with(|| {
                a.iter()
                    .zip(b)
                    .map(|((na, va), (nb, vb))| na.cmp(nb).then_with(|| va.total_cmp(vb)))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            }),
            (Self::Seq(a), Self::Seq(b)) => a.len().cmp(&b.len()).then_with(|| {
                a.iter()
                    .zip(b)
                    .map(|(x, y)| x.total_cmp(y))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            }),
            (Self::Map(a), Self::Map(b)) => a.len().cmp(&b.len()).then_with(|| {
                a.iter()
                    .zip(b)
                    .map(|((ka, va), (kb, vb))| ka.total_cmp(kb).then_with(|| va.total_cmp(vb)))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            }),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::I8(_) => 2,
            Self::I16(_) => 3,
            Self::I32(_) => 4,
            Self::I64(_) => 5,
            Self::U8(_) => 6,
            Self::U16(_) => 7,
            Self::U32(_) => 8,
            Self::U64(_) => 9,
            Self::F32(_) => 10,
            Self::F64(_) => 11,
            Self::String(_) => 12,
            Self::Timestamp(_) => 13,
            Self::Pointer(_) => 14,
            Self::Struct(_) => 15,
            Self::Seq(_) => 16,
            Self::Map(_) => 17,
        }
    }

    /// The shape of the concrete value held here, if it has one.
    ///
    /// `Null` has none. Sequences are slices and take their element shape
    /// from the first item, maps likewise from their first entry; an empty
    /// or null part is `Interface`. Struct fields are all exported.
    pub fn inferred_shape(&self) -> Option<Shape> {
        let shape = match self {
            Self::Null => return None,
            Self::Bool(_) => Shape::Bool,
            Self::I8(_) => Shape::Int(IntWidth::W8),
            Self::I16(_) => Shape::Int(IntWidth::W16),
            Self::I32(_) => Shape::Int(IntWidth::W32),
            Self::I64(_) => Shape::Int(IntWidth::W64),
            Self::U8(_) => Shape::UInt(IntWidth::W8),
            Self::U16(_) => Shape::UInt(IntWidth::W16),
            Self::U32(_) => Shape::UInt(IntWidth::W32),
            Self::U64(_) => Shape::UInt(IntWidth::W64),
            Self::F32(_) => Shape::Float32,
            Self::F64(_) => Shape::Float64,
            Self::String(_) => Shape::String,
            Self::Timestamp(_) => Shape::Timestamp,
            Self::Pointer(inner) => Shape::pointer(inner.shape_or_interface()),
            Self::Struct(fields) => Shape::structure(
                "",
                fields
                    .iter()
                    .map(|(name, value)| Field::new(name.as_str(), value.shape_or_interface()))
                    .collect(),
            ),
            Self::Seq(items) => Shape::slice(
                items
                    .first()
                    .map_or(Shape::Interface, Value::shape_or_interface),
            ),
            Self::Map(entries) => match entries.first() {
                Some((k, v)) => Shape::map(k.shape_or_interface(), v.shape_or_interface()),
                None => Shape::map(Shape::Interface, Shape::Interface),
            },
        };
        Some(shape)
    }

    fn shape_or_interface(&self) -> Shape {
        self.inferred_shape().unwrap_or(Shape::Interface)
    }

    fn number(&self) -> Option<Number> {
        let n = match self {
            Self::I8(n) => Number::Signed(*n as i64),
            Self::I16(n) => Number::Signed(*n as i64),
            Self::I32(n) => Number::Signed(*n as i64),
            Self::I64(n) => Number::Signed(*n),
            Self::U8(n) => Number::Unsigned(*n as u64),
            Self::U16(n) => Number::Unsigned(*n as u64),
            Self::U32(n) => Number::Unsigned(*n as u64),
            Self::U64(n) => Number::Unsigned(*n),
            Self::F32(f) => Number::Float(*f as f64),
            Self::F64(f) => Number::Float(*f),
            _ => return None,
        };
        Some(n)
    }

    /// Convert this value into the exact representation of `shape`.
    ///
    /// `Null` becomes the shape's zero value. Numbers convert between all
    /// numeric shapes with `as` semantics (truncating, saturating for
    /// float to integer). A non-pointer value aimed at a pointer shape is
    /// boxed. Struct fields missing from the value are zeroed, and a map
    /// with string keys is accepted as a struct. Any value fits `Interface`.
    pub fn convert_to(self, shape: &Shape) -> Result<Value, FillError> {
        if self.is_null() {
            return Ok(shape.zero_value());
        }

        if shape.is_numeric() {
            let number = self
                .number()
                .ok_or_else(|| FillError::conversion(shape, &self))?;
            return Ok(number_to_shape(number, shape));
        }

        match (shape, self) {
            (Shape::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
            (Shape::String, Value::String(s)) => Ok(Value::String(s)),
            (Shape::Timestamp, Value::Timestamp(t)) => Ok(Value::Timestamp(t)),

            (Shape::Pointer { pointee }, Value::Pointer(inner)) => {
                Ok(Value::pointer((*inner).convert_to(pointee)?))
            }
            (Shape::Pointer { pointee }, other) => Ok(Value::pointer(other.convert_to(pointee)?)),

            (Shape::Interface, value) => Ok(value),

            (Shape::Struct { .. }, Value::Map(entries)) => {
                let mut named = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    match key {
                        Value::String(name) => named.push((name, value)),
                        other => return Err(FillError::conversion(shape, &other)),
                    }
                }
                Value::Struct(named).convert_to(shape)
            }

            (Shape::Struct { fields, .. }, Value::Struct(mut entries)) => {
                let mut converted = Vec::with_capacity(fields.len());
                for field in fields {
                    let value = match entries.iter().position(|(n, _)| *n == field.name) {
                        Some(idx) => entries.swap_remove(idx).1.convert_to(&field.shape)?,
                        None => field.shape.zero_value(),
                    };
                    converted.push((field.name.clone(), value));
                }
                if let Some((unknown, _)) = entries.first() {
                    return Err(FillError::Conversion {
                        expected: shape.kind_name().to_string(),
                        found: format!("struct with unknown field '{unknown}'"),
                    });
                }
                Ok(Value::Struct(converted))
            }

            (Shape::Array { len, element }, Value::Seq(items)) if items.len() == *len => items
                .into_iter()
                .map(|item| item.convert_to(element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Seq),

            (Shape::Slice { element }, Value::Seq(items)) => items
                .into_iter()
                .map(|item| item.convert_to(element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Seq),

            (Shape::Map { key, value }, Value::Map(entries)) => {
                let mut converted = MapBuilder::with_capacity(entries.len());
                for (k, v) in entries {
                    converted.insert(k.convert_to(key)?, v.convert_to(value)?);
                }
                Ok(converted.finish())
            }

            (shape, value) => Err(FillError::conversion(shape, &value)),
        }
    }

    /// Build a value from parsed YAML. Numbers become 64-bit values and
    /// rely on [`Value::convert_to`] to reach their final width.
    pub fn from_yaml(yaml: serde_yaml::Value) -> Self {
        match yaml {
            serde_yaml::Value::Null => Self::Null,
            serde_yaml::Value::Bool(b) => Self::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::I64(i)
                } else if let Some(u) = n.as_u64() {
                    Self::U64(u)
                } else {
                    Self::F64(n.as_f64().unwrap_or_default())
                }
            }
            serde_yaml::Value::String(s) => Self::String(s),
            serde_yaml::Value::Sequence(items) => {
                Self::Seq(items.into_iter().map(Self::from_yaml).collect())
            }
            serde_yaml::Value::Mapping(mapping) => {
                let mut entries = MapBuilder::with_capacity(mapping.len());
                for (k, v) in mapping {
                    entries.insert(Self::from_yaml(k), Self::from_yaml(v));
                }
                entries.finish()
            }
            serde_yaml::Value::Tagged(tagged) => Self::from_yaml(tagged.value),
        }
    }
}

/// Map entries under construction.
///
/// Entries keep insertion order; a sorted index over the keys makes each
/// insert a binary search, so building a map of `n` entries stays
/// `O(n log n)` comparisons.
#[derive(Debug, Default)]
pub struct MapBuilder {
    entries: Vec<(Value, Value)>,
    index: Vec<usize>,
}

impl MapBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: Vec::with_capacity(capacity),
        }
    }

    /// Insert an entry, replacing the value of an equal key in place.
    pub fn insert(&mut self, key: Value, value: Value) {
        let entries = &self.entries;
        match self
            .index
            .binary_search_by(|&i| entries[i].0.total_cmp(&key))
        {
            Ok(pos) => self.entries[self.index[pos]].1 = value,
            Err(pos) => {
                self.index.insert(pos, self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Value {
        Value::Map(self.entries)
    }
}

fn float_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

fn number_to_shape(number: Number, shape: &Shape) -> Value {
    match (shape, number) {
        (Shape::Int(width), Number::Signed(n)) => Value::signed(*width, n),
        (Shape::Int(width), Number::Unsigned(n)) => Value::signed(*width, n as i64),
        (Shape::Int(width), Number::Float(f)) => Value::signed(*width, f as i64),
        (Shape::UInt(width), Number::Signed(n)) => Value::unsigned(*width, n as u64),
        (Shape::UInt(width), Number::Unsigned(n)) => Value::unsigned(*width, n),
        (Shape::UInt(width), Number::Float(f)) => Value::unsigned(*width, f as u64),
        (Shape::Float32, Number::Signed(n)) => Value::F32(n as f32),
        (Shape::Float32, Number::Unsigned(n)) => Value::F32(n as f32),
        (Shape::Float32, Number::Float(f)) => Value::F32(f as f32),
        (_, Number::Signed(n)) => Value::F64(n as f64),
        (_, Number::Unsigned(n)) => Value::F64(n as f64),
        (_, Number::Float(f)) => Value::F64(f),
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::I8(n) => serializer.serialize_i8(*n),
            Self::I16(n) => serializer.serialize_i16(*n),
            Self::I32(n) => serializer.serialize_i32(*n),
            Self::I64(n) => serializer.serialize_i64(*n),
            Self::U8(n) => serializer.serialize_u8(*n),
            Self::U16(n) => serializer.serialize_u16(*n),
            Self::U32(n) => serializer.serialize_u32(*n),
            Self::U64(n) => serializer.serialize_u64(*n),
            Self::F32(f) => serializer.serialize_f32(*f),
            Self::F64(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Timestamp(t) => t.serialize(serializer),
            Self::Pointer(inner) => inner.serialize(serializer),
            Self::Struct(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Self::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    DateTime<Utc> => Timestamp,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }
}
