//! Dynamic property values.

use std::collections::BTreeMap;

use federation_types::Timestamp;

use crate::entity::Entity;

/// Keyed construction input for [`Entity::from_data`](crate::Entity::from_data).
pub type Data = BTreeMap<String, Value>;

/// A property value.
///
/// Scalars map directly to XML leaf text. `Entity` and `List` hold nested
/// entities; `Map` is raw keyed input for a nested entity that has not been
/// constructed yet and is only accepted as construction input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
    Timestamp(Timestamp),
    Entity(Box<Entity>),
    List(Vec<Value>),
    Map(Data),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in type violations.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::Timestamp(_) => "timestamp",
            Self::Entity(_) => "entity",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Text form of a scalar as it appears on the wire.
    ///
    /// Returns `None` for nested values, which have no text form.
    pub fn to_wire_string(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Boolean(b) => Some(b.to_string()),
            Self::Timestamp(t) => Some(t.to_wire()),
            Self::Entity(_) | Self::List(_) | Self::Map(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Self::Timestamp(t)
    }
}

impl From<Entity> for Value {
    fn from(e: Entity) -> Self {
        Self::Entity(Box::new(e))
    }
}

impl From<Vec<Entity>> for Value {
    fn from(items: Vec<Entity>) -> Self {
        Self::List(items.into_iter().map(Value::from).collect())
    }
}

impl From<Data> for Value {
    fn from(data: Data) -> Self {
        Self::Map(data)
    }
}

/// Builds a [`Data`] map: `data! { "guid" => guid, "public" => true }`.
#[macro_export]
macro_rules! data {
    () => { $crate::Data::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut data = $crate::Data::new();
        $( data.insert(::std::string::String::from($key), $crate::Value::from($value)); )+
        data
    }};
}
