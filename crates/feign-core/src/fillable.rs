//! Bridge between concrete Rust types and the shape/value model.
//!
//! A type implements [`Fillable`] by describing its [`Shape`] and by
//! converting itself to and from a [`Value`]. Structs get an implementation
//! from the [`fillable!`](crate::fillable!) macro.

use crate::error::FillError;
use crate::shape::{IntWidth, Shape};
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::mpsc::{Receiver, Sender};
use uuid::Uuid;

/// A type the fill engine can populate.
///
/// `from_value` must accept the zero value of `shape()`, unless the shape
/// [embeds a handle](Shape::embeds_handle). Channels and functions have no
/// zero value in Rust, so those types are only ever updated in place
/// through [`Fillable::assign`], which keeps the handles they already hold.
pub trait Fillable: Sized {
    /// Runtime shape of the type.
    fn shape() -> Shape;

    /// Current contents as a value, used as the sample for pointer fields.
    fn to_value(&self) -> Value;

    /// Rebuild the type from a value of its shape.
    fn from_value(value: Value) -> Result<Self, FillError>;

    /// Overwrite `self` with a value of its shape.
    fn assign(&mut self, value: Value) -> Result<(), FillError> {
        *self = Self::from_value(value)?;
        Ok(())
    }
}

macro_rules! scalar_fillable {
    ($($ty:ty => $shape:expr, $variant:ident);* $(;)?) => {
        $(
            impl Fillable for $ty {
                fn shape() -> Shape {
                    $shape
                }

                fn to_value(&self) -> Value {
                    Value::$variant(*self as _)
                }

                fn from_value(value: Value) -> Result<Self, FillError> {
                    match value.convert_to(&Self::shape())? {
                        Value::$variant(v) => Ok(v as $ty),
                        other => Err(FillError::conversion_to(stringify!($ty), &other)),
                    }
                }
            }
        )*
    };
}

scalar_fillable! {
    bool => Shape::Bool, Bool;
    i8 => Shape::Int(IntWidth::W8), I8;
    i16 => Shape::Int(IntWidth::W16), I16;
    i32 => Shape::Int(IntWidth::W32), I32;
    i64 => Shape::Int(IntWidth::W64), I64;
    isize => Shape::Int(IntWidth::W64), I64;
    u8 => Shape::UInt(IntWidth::W8), U8;
    u16 => Shape::UInt(IntWidth::W16), U16;
    u32 => Shape::UInt(IntWidth::W32), U32;
    u64 => Shape::UInt(IntWidth::W64), U64;
    usize => Shape::UInt(IntWidth::W64), U64;
    f32 => Shape::Float32, F32;
    f64 => Shape::Float64, F64;
}

impl Fillable for String {
    fn shape() -> Shape {
        Shape::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        match value.convert_to(&Shape::String)? {
            Value::String(s) => Ok(s),
            other => Err(FillError::conversion_to("String", &other)),
        }
    }
}

impl Fillable for DateTime<Utc> {
    fn shape() -> Shape {
        Shape::Timestamp
    }

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        match value.convert_to(&Shape::Timestamp)? {
            Value::Timestamp(t) => Ok(t),
            other => Err(FillError::conversion_to("DateTime<Utc>", &other)),
        }
    }
}

/// A referent that embeds a handle cannot be created, so it is absent
/// unless one already exists to update in place.
impl<T: Fillable> Fillable for Option<T> {
    fn shape() -> Shape {
        Shape::pointer(T::shape())
    }

    fn to_value(&self) -> Value {
        match self {
            Some(v) => Value::pointer(v.to_value()),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        match value {
            Value::Null => Ok(None),
            _ if T::shape().embeds_handle() => Ok(None),
            Value::Pointer(inner) => T::from_value(*inner).map(Some),
            other => T::from_value(other).map(Some),
        }
    }

    fn assign(&mut self, value: Value) -> Result<(), FillError> {
        let inner = match value {
            Value::Null => {
                *self = None;
                return Ok(());
            }
            Value::Pointer(inner) => *inner,
            other => other,
        };
        match self {
            Some(current) => current.assign(inner),
            None => {
                *self = Self::from_value(inner)?;
                Ok(())
            }
        }
    }
}

/// `Box<T>` cannot be null, so an absent value becomes a boxed zero value.
impl<T: Fillable> Fillable for Box<T> {
    fn shape() -> Shape {
        Shape::pointer(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::pointer(self.as_ref().to_value())
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        let inner = match value {
            Value::Null => T::shape().zero_value(),
            Value::Pointer(inner) => *inner,
            other => other,
        };
        T::from_value(inner).map(Box::new)
    }

    fn assign(&mut self, value: Value) -> Result<(), FillError> {
        let inner = match value {
            Value::Null => T::shape().zero_value(),
            Value::Pointer(inner) => *inner,
            other => other,
        };
        self.as_mut().assign(inner)
    }
}

impl<T: Fillable> Fillable for Vec<T> {
    fn shape() -> Shape {
        Shape::slice(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(Fillable::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(FillError::conversion_to("Vec", &other)),
        }
    }

    /// Elements that embed a handle cannot be created, so such a vector
    /// keeps its current contents.
    fn assign(&mut self, value: Value) -> Result<(), FillError> {
        if T::shape().embeds_handle() {
            return match value {
                Value::Null | Value::Seq(_) => Ok(()),
                other => Err(FillError::conversion_to("Vec", &other)),
            };
        }
        *self = Self::from_value(value)?;
        Ok(())
    }
}

impl<T: Fillable, const N: usize> Fillable for [T; N] {
    fn shape() -> Shape {
        Shape::array(N, T::shape())
    }

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(Fillable::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        let items = match value {
            Value::Null => (0..N).map(|_| T::shape().zero_value()).collect(),
            Value::Seq(items) => items,
            other => return Err(FillError::conversion_to("array", &other)),
        };
        let found = items.len();
        let converted = items
            .into_iter()
            .map(T::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        converted.try_into().map_err(|_| FillError::Conversion {
            expected: format!("array of length {N}"),
            found: format!("sequence of length {found}"),
        })
    }

    /// Elements are assigned in place, so arrays of handles keep them.
    fn assign(&mut self, value: Value) -> Result<(), FillError> {
        let items = match value {
            Value::Null => (0..N).map(|_| T::shape().zero_value()).collect(),
            Value::Seq(items) if items.len() == N => items,
            Value::Seq(items) => {
                return Err(FillError::Conversion {
                    expected: format!("array of length {N}"),
                    found: format!("sequence of length {}", items.len()),
                })
            }
            other => return Err(FillError::conversion_to("array", &other)),
        };
        for (slot, item) in self.iter_mut().zip(items) {
            slot.assign(item)?;
        }
        Ok(())
    }
}

impl<K, V> Fillable for HashMap<K, V>
where
    K: Fillable + Eq + Hash,
    V: Fillable,
{
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }

    /// Entries are sorted by key, so equal maps always produce the same
    /// value regardless of hash order.
    fn to_value(&self) -> Value {
        let mut entries: Vec<(Value, Value)> = self
            .iter()
            .map(|(k, v)| (k.to_value(), v.to_value()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        Value::Map(entries)
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        match value {
            Value::Null => Ok(HashMap::new()),
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| -> Result<(K, V), FillError> {
                    Ok((K::from_value(k)?, V::from_value(v)?))
                })
                .collect(),
            other => Err(FillError::conversion_to("HashMap", &other)),
        }
    }

    fn assign(&mut self, value: Value) -> Result<(), FillError> {
        if V::shape().embeds_handle() || K::shape().embeds_handle() {
            return keep_handle_map("HashMap", value);
        }
        *self = Self::from_value(value)?;
        Ok(())
    }
}

impl<K, V> Fillable for BTreeMap<K, V>
where
    K: Fillable + Ord,
    V: Fillable,
{
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        match value {
            Value::Null => Ok(BTreeMap::new()),
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| -> Result<(K, V), FillError> {
                    Ok((K::from_value(k)?, V::from_value(v)?))
                })
                .collect(),
            other => Err(FillError::conversion_to("BTreeMap", &other)),
        }
    }

    fn assign(&mut self, value: Value) -> Result<(), FillError> {
        if V::shape().embeds_handle() || K::shape().embeds_handle() {
            return keep_handle_map("BTreeMap", value);
        }
        *self = Self::from_value(value)?;
        Ok(())
    }
}

/// Maps whose entries embed a handle keep their current entries.
fn keep_handle_map(type_name: &str, value: Value) -> Result<(), FillError> {
    match value {
        Value::Null | Value::Map(_) => Ok(()),
        other => Err(FillError::conversion_to(type_name, &other)),
    }
}

/// A dynamic value is regenerated in the shape it currently holds; a `Null`
/// one can only be populated by an override.
impl Fillable for Value {
    fn shape() -> Shape {
        Shape::Interface
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        Ok(value)
    }
}

/// A UUID is filled as its 16 raw bytes.
impl Fillable for Uuid {
    fn shape() -> Shape {
        <[u8; 16]>::shape()
    }

    fn to_value(&self) -> Value {
        self.as_bytes().to_value()
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        <[u8; 16]>::from_value(value).map(Uuid::from_bytes)
    }
}

// Handles. The engine reports their shapes as unsupported and leaves the
// slot at zero; no value converts back into them, so `assign` keeps the
// handle already in place.

impl<T> Fillable for Sender<T> {
    fn shape() -> Shape {
        Shape::Channel
    }

    fn to_value(&self) -> Value {
        Value::Null
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        Err(FillError::conversion_to("Sender", &value))
    }

    fn assign(&mut self, _value: Value) -> Result<(), FillError> {
        Ok(())
    }
}

impl<T> Fillable for Receiver<T> {
    fn shape() -> Shape {
        Shape::Channel
    }

    fn to_value(&self) -> Value {
        Value::Null
    }

    fn from_value(value: Value) -> Result<Self, FillError> {
        Err(FillError::conversion_to("Receiver", &value))
    }

    fn assign(&mut self, _value: Value) -> Result<(), FillError> {
        Ok(())
    }
}

macro_rules! function_fillable {
    ($(($($arg:ident),*)),* $(,)?) => {
        $(
            impl<R, $($arg),*> Fillable for fn($($arg),*) -> R {
                fn shape() -> Shape {
                    Shape::Function
                }

                fn to_value(&self) -> Value {
                    Value::Null
                }

                fn from_value(value: Value) -> Result<Self, FillError> {
                    Err(FillError::conversion_to("fn", &value))
                }

                fn assign(&mut self, _value: Value) -> Result<(), FillError> {
                    Ok(())
                }
            }
        )*
    };
}

function_fillable! {
    (),
    (A),
    (A, B),
    (A, B, C),
}

/// Field-by-field access to a struct value, used by [`fillable!`](crate::fillable!).
pub struct StructFields {
    entries: Vec<(String, Value)>,
}

impl StructFields {
    /// Open a struct value. `Null` is treated as a struct of zero values.
    pub fn new(type_name: &str, value: Value) -> Result<Self, FillError> {
        match value {
            Value::Struct(entries) => Ok(Self { entries }),
            Value::Null => Ok(Self {
                entries: Vec::new(),
            }),
            other => Err(FillError::conversion_to(type_name, &other)),
        }
    }

    /// Take a field out, falling back to the zero value of its shape.
    pub fn take<T: Fillable>(&mut self, name: &str) -> Result<T, FillError> {
        T::from_value(self.take_value::<T>(name))
    }

    /// Assign a field in place from its entry, or from its zero value.
    pub fn assign<T: Fillable>(&mut self, name: &str, slot: &mut T) -> Result<(), FillError> {
        slot.assign(self.take_value::<T>(name))
    }

    fn take_value<T: Fillable>(&mut self, name: &str) -> Value {
        match self.entries.iter().position(|(n, _)| n == name) {
            Some(idx) => self.entries.swap_remove(idx).1,
            None => T::shape().zero_value(),
        }
    }
}

/// Define a struct and implement [`Fillable`] for it.
///
/// `pub` fields (any visibility qualifier) are exported and filled under
/// the path `.<field>`. Fields without a qualifier are left at their zero
/// value. Generic and tuple structs are not supported.
///
/// ```rust
/// use feign_core::{fillable, Fillable, Shape};
///
/// fillable! {
///     #[derive(Debug, Default)]
///     pub struct Person {
///         pub name: String,
///         pub age: i64,
///         secret: u8,
///     }
/// }
///
/// assert!(matches!(Person::shape(), Shape::Struct { .. }));
/// ```
#[macro_export]
macro_rules! fillable {
    (
        $(#[$meta:meta])*
        $svis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $svis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Fillable for $name {
            fn shape() -> $crate::Shape {
                $crate::Shape::structure(
                    stringify!($name),
                    vec![$(
                        $crate::Field::with_visibility(
                            stringify!($field),
                            <$ty as $crate::Fillable>::shape(),
                            !stringify!($fvis).is_empty(),
                        )
                    ),*],
                )
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Struct(vec![$(
                    (
                        stringify!($field).to_string(),
                        $crate::Fillable::to_value(&self.$field),
                    )
                ),*])
            }

            fn from_value(
                value: $crate::Value,
            ) -> ::std::result::Result<Self, $crate::FillError> {
                #[allow(unused_mut, unused_variables)]
                let mut fields = $crate::fillable::StructFields::new(stringify!($name), value)?;
                Ok(Self {
                    $($field: fields.take(stringify!($field))?,)*
                })
            }

            fn assign(
                &mut self,
                value: $crate::Value,
            ) -> ::std::result::Result<(), $crate::FillError> {
                #[allow(unused_mut, unused_variables)]
                let mut fields = $crate::fillable::StructFields::new(stringify!($name), value)?;
                $(fields.assign(stringify!($field), &mut self.$field)?;)*
                Ok(())
            }
        }
    };
}
