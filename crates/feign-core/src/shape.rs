//! Shape descriptions for fillable values.
//!
//! This module defines `Shape`, the closed set of type categories the fill
//! engine dispatches on. A shape is the runtime stand-in for a concrete Rust
//! type: the typed layer derives one from `Fillable::shape()`, and dynamic
//! callers load one from YAML.
//!
//! # YAML Format
//!
//! Simple shapes are plain strings (`string`, `int64`, `timestamp`, ...).
//! Compound shapes use object format with a `type` key:
//!
//! ```yaml
//! type: struct
//! name: Order
//! fields:
//!   - name: Id
//!     type: { type: array, len: 16, element: uint8 }
//!   - name: Tags
//!     type: { type: map, key: string, value: bool }
//!   - name: note
//!     type: string
//!     exported: false
//! ```

use crate::config::ConfigError;
use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Bit width of an integer shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

/// Runtime shape of a fillable type.
///
/// Every shape has a zero value (see [`Shape::zero_value`]). The engine
/// synthesizes data for all shapes except `Channel`, `Function` and an
/// `Interface` holding nothing, which it reports as unsupported.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    // Scalars
    /// Boolean
    Bool,

    /// Signed integer of the given width
    Int(IntWidth),

    /// Unsigned integer of the given width
    UInt(IntWidth),

    /// 32-bit IEEE 754 floating point
    Float32,

    /// 64-bit IEEE 754 floating point
    Float64,

    /// UTF-8 string
    String,

    /// Point in time (UTC). Recognized ahead of the generic struct rule.
    Timestamp,

    // Indirection
    /// Nullable reference to a value of another shape
    Pointer {
        /// Shape of the referenced value
        pointee: Box<Shape>,
    },

    // Composites
    /// Record with named fields
    Struct {
        /// Type name, informational only
        name: String,
        /// Fields in declaration order
        fields: Vec<Field>,
    },

    /// Fixed-length sequence
    Array {
        /// Number of elements
        len: usize,
        /// Element shape
        element: Box<Shape>,
    },

    /// Variable-length sequence
    Slice {
        /// Element shape
        element: Box<Shape>,
    },

    /// Keyed collection
    Map {
        /// Key shape
        key: Box<Shape>,
        /// Value shape
        value: Box<Shape>,
    },

    // Opaque
    /// Communication channel
    Channel,

    /// Function or closure
    Function,

    /// Untyped dynamic value, generated as the shape of whatever it holds
    Interface,
}

/// A named field of a struct shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, used to extend the structural path
    pub name: String,

    /// Field shape
    #[serde(rename = "type")]
    pub shape: Shape,

    /// Unexported fields are never filled and keep their zero value
    #[serde(default = "default_exported")]
    pub exported: bool,
}

fn default_exported() -> bool {
    true
}

impl Field {
    /// Create a new exported field.
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            exported: true,
        }
    }

    /// Create a field that the engine must leave at its zero value.
    pub fn unexported(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            exported: false,
        }
    }

    /// Create a field with explicit visibility.
    pub fn with_visibility(name: impl Into<String>, shape: Shape, exported: bool) -> Self {
        Self {
            name: name.into(),
            shape,
            exported,
        }
    }
}

impl Shape {
    /// Parse a shape from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a shape from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Create a pointer shape.
    pub fn pointer(pointee: Shape) -> Self {
        Self::Pointer {
            pointee: Box::new(pointee),
        }
    }

    /// Create a struct shape.
    pub fn structure(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::Struct {
            name: name.into(),
            fields,
        }
    }

    /// Create a fixed-length array shape.
    pub fn array(len: usize, element: Shape) -> Self {
        Self::Array {
            len,
            element: Box::new(element),
        }
    }

    /// Create a slice shape.
    pub fn slice(element: Shape) -> Self {
        Self::Slice {
            element: Box::new(element),
        }
    }

    /// Create a map shape.
    pub fn map(key: Shape, value: Shape) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Short name of the shape category, used in error messages and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int(IntWidth::W8) => "int8",
            Self::Int(IntWidth::W16) => "int16",
            Self::Int(IntWidth::W32) => "int32",
            Self::Int(IntWidth::W64) => "int64",
            Self::UInt(IntWidth::W8) => "uint8",
            Self::UInt(IntWidth::W16) => "uint16",
            Self::UInt(IntWidth::W32) => "uint32",
            Self::UInt(IntWidth::W64) => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Timestamp => "timestamp",
            Self::Pointer { .. } => "pointer",
            Self::Struct { .. } => "struct",
            Self::Array { .. } => "array",
            Self::Slice { .. } => "slice",
            Self::Map { .. } => "map",
            Self::Channel => "channel",
            Self::Function => "function",
            Self::Interface => "any",
        }
    }

    /// Check if a value of this shape holds a channel or function inline,
    /// with no pointer, slice or map in between.
    ///
    /// Such values cannot be rebuilt from a [`Value`]: Rust has no nil
    /// channel or function, so the typed layer updates them in place.
    pub fn embeds_handle(&self) -> bool {
        match self {
            Self::Channel | Self::Function => true,
            Self::Struct { fields, .. } => fields.iter().any(|f| f.shape.embeds_handle()),
            Self::Array { len, element } => *len > 0 && element.embeds_handle(),
            _ => false,
        }
    }

    /// Check if this shape represents a numeric type.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int(_) | Self::UInt(_) | Self::Float32 | Self::Float64
        )
    }

    /// The zero value of this shape.
    ///
    /// Pointers, slices, maps and opaque shapes are absent (`Value::Null`);
    /// structs and arrays are built from the zero values of their parts.
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int(width) => Value::signed(*width, 0),
            Self::UInt(width) => Value::unsigned(*width, 0),
            Self::Float32 => Value::F32(0.0),
            Self::Float64 => Value::F64(0.0),
            Self::String => Value::String(String::new()),
            Self::Timestamp => Value::Timestamp(DateTime::<Utc>::default()),
            Self::Struct { fields, .. } => Value::Struct(
                fields
                    .iter()
                    .map(|f| (f.name.clone(), f.shape.zero_value()))
                    .collect(),
            ),
            Self::Array { len, element } => {
                Value::Seq((0..*len).map(|_| element.zero_value()).collect())
            }
            Self::Pointer { .. }
            | Self::Slice { .. }
            | Self::Map { .. }
            | Self::Channel
            | Self::Function
            | Self::Interface => Value::Null,
        }
    }

    fn from_simple_name(name: &str) -> Option<Self> {
        let shape = match name {
            "bool" => Self::Bool,
            "int8" => Self::Int(IntWidth::W8),
            "int16" => Self::Int(IntWidth::W16),
            "int32" => Self::Int(IntWidth::W32),
            "int64" | "int" => Self::Int(IntWidth::W64),
            "uint8" | "byte" => Self::UInt(IntWidth::W8),
            "uint16" => Self::UInt(IntWidth::W16),
            "uint32" => Self::UInt(IntWidth::W32),
            "uint64" | "uint" => Self::UInt(IntWidth::W64),
            "float32" => Self::Float32,
            "float64" | "float" => Self::Float64,
            "string" => Self::String,
            "timestamp" | "time" => Self::Timestamp,
            "channel" | "chan" => Self::Channel,
            "function" | "func" => Self::Function,
            "any" | "interface" => Self::Interface,
            _ => return None,
        };
        Some(shape)
    }
}

// Custom serialization/deserialization for Shape
// Supports both simple string format ("string", "int64") and object format ({"type": "map", ...})

impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::Pointer { pointee } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "pointer")?;
                map.serialize_entry("to", pointee)?;
                map.end()
            }
            Self::Struct { name, fields } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "struct")?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("fields", fields)?;
                map.end()
            }
            Self::Array { len, element } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("len", len)?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::Slice { element } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "slice")?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::Map { key, value } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("key", key)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            // Simple shapes - serialize as string
            simple => serializer.serialize_str(simple.kind_name()),
        }
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct ShapeVisitor;

        impl<'de> Visitor<'de> for ShapeVisitor {
            type Value = Shape;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or map representing a Shape")
            }

            // Handle string format: "string", "int64", etc.
            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Shape::from_simple_name(value)
                    .ok_or_else(|| E::custom(format!("unknown simple shape: {value}")))
            }

            // Handle map format: {"type": "slice", "element": "string"}
            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                if let Some(simple) = Shape::from_simple_name(&type_name) {
                    return Ok(simple);
                }

                match type_name.as_str() {
                    "pointer" | "ptr" => {
                        let pointee: Shape = get_field_required(&fields, "to")?;
                        Ok(Shape::pointer(pointee))
                    }
                    "struct" => {
                        let name: String = get_field(&fields, "name").unwrap_or_default();
                        let struct_fields: Vec<Field> = get_field_required(&fields, "fields")?;
                        Ok(Shape::structure(name, struct_fields))
                    }
                    "array" => {
                        let len = get_field_required(&fields, "len")?;
                        let element: Shape = get_field_required(&fields, "element")?;
                        Ok(Shape::array(len, element))
                    }
                    "slice" => {
                        let element: Shape = get_field_required(&fields, "element")?;
                        Ok(Shape::slice(element))
                    }
                    "map" => {
                        let key: Shape = get_field_required(&fields, "key")?;
                        let value: Shape = get_field_required(&fields, "value")?;
                        Ok(Shape::map(key, value))
                    }
                    _ => Err(M::Error::custom(format!("unknown shape: {type_name}"))),
                }
            }
        }

        deserializer.deserialize_any(ShapeVisitor)
    }
}

// Helper functions for deserialization
fn get_field<T: for<'de> Deserialize<'de>>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<T> {
    fields
        .get(key)
        .and_then(|v| serde_yaml::from_value(v.clone()).ok())
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}
