//! Values stored at a map entry.

use crate::nested_map::NestedMap;
use crate::str_list::StrList;
use core::fmt;

/// Discriminant of a [`Value`], used when reporting type conflicts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValueType {
    Str,
    Map,
    List,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Str => "string",
            ValueType::Map => "map",
            ValueType::List => "list",
        })
    }
}

/// The value held by one entry. Nested maps and lists are exclusively owned
/// by the entry holding them, so the whole structure is a tree.
#[derive(Debug)]
pub enum Value {
    Str(String),
    Map(NestedMap),
    List(StrList),
}

impl Value {
    /// The value inserted when a caller names a type but supplies nothing:
    /// an empty string, an empty map of default capacity, or an empty list.
    pub fn empty(ty: ValueType) -> Self {
        match ty {
            ValueType::Str => Value::Str(String::new()),
            ValueType::Map => Value::Map(NestedMap::new()),
            ValueType::List => Value::List(StrList::new()),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Str(_) => ValueType::Str,
            Value::Map(_) => ValueType::Map,
            Value::List(_) => ValueType::List,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&NestedMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut NestedMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&StrList> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut StrList> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<NestedMap> for Value {
    fn from(m: NestedMap) -> Self {
        Value::Map(m)
    }
}

impl From<StrList> for Value {
    fn from(l: StrList) -> Self {
        Value::List(l)
    }
}
