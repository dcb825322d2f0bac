//! Compact object-notation export.
//!
//! A map renders as an object whose members appear in bucket-then-chain
//! order, strings as JSON strings and lists as arrays of strings. Keys and
//! strings are escaped by `serde_json`.

use crate::error::MapError;
use crate::nested_map::NestedMap;
use crate::str_list::StrList;
use crate::value::Value;
use core::fmt;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

impl Serialize for NestedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Map(m) => m.serialize(serializer),
            Value::List(l) => l.serialize(serializer),
        }
    }
}

impl Serialize for StrList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for s in self.iter() {
            seq.serialize_element(s)?;
        }
        seq.end()
    }
}

impl NestedMap {
    /// Render the whole tree below this map, e.g. `{"k":"v"}`.
    pub fn to_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for NestedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}
