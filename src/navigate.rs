//! Key-path navigation: insert and search across nested maps.
//!
//! A path is an ordered, non-empty slice of keys resolved one key per level.
//! Insert creates missing intermediate maps on the way down and grows each
//! level before touching it; search never creates anything.

use crate::error::MapError;
use crate::nested_map::{NestedMap, DEFAULT_CAPACITY};
use crate::str_list::StrList;
use crate::value::Value;

impl NestedMap {
    /// Store `value` at the end of `path`.
    ///
    /// Missing intermediate keys get a fresh empty map. An intermediate key
    /// holding a string or list fails with [`MapError::TypeConflict`] and
    /// leaves that entry untouched. At the terminal key an existing entry has
    /// its value replaced in place, so keys stay unique within a map; a string
    /// stored over a string overwrites it.
    ///
    /// Maps created for earlier keys stay in place if a later step fails.
    pub fn insert<K: AsRef<str>>(&mut self, path: &[K], value: Value) -> Result<(), MapError> {
        let (last, parents) = path.split_last().ok_or(MapError::InvalidPath)?;
        let mut current = self;

        for key in parents {
            let key = key.as_ref();
            current.grow_if_needed()?;
            let bucket = current.bucket_of(key)?;
            let id = match current.find_in_bucket(bucket, key) {
                Some(id) => id,
                None => {
                    let child = NestedMap::try_with_capacity(DEFAULT_CAPACITY)?;
                    current.link_front(bucket, key, Value::Map(child))
                }
            };
            current = match &mut current.nodes[id].value {
                Value::Map(m) => m,
                other => {
                    let found = other.value_type();
                    tracing::warn!(key, %found, "key is not a map");
                    return Err(MapError::TypeConflict {
                        key: key.to_owned(),
                        found,
                    });
                }
            };
        }

        let key = last.as_ref();
        current.grow_if_needed()?;
        let bucket = current.bucket_of(key)?;
        match current.find_in_bucket(bucket, key) {
            Some(id) => {
                let slot = &mut current.nodes[id].value;
                match (slot, value) {
                    (Value::Str(old), Value::Str(new)) => *old = new,
                    (slot, value) => {
                        tracing::debug!(
                            key,
                            from = %slot.value_type(),
                            to = %value.value_type(),
                            "replacing value"
                        );
                        *slot = value;
                    }
                }
            }
            None => {
                current.link_front(bucket, key, value);
            }
        }
        Ok(())
    }

    pub fn insert_str<K: AsRef<str>>(
        &mut self,
        path: &[K],
        s: impl Into<String>,
    ) -> Result<(), MapError> {
        self.insert(path, Value::Str(s.into()))
    }

    /// Store an empty map at `path`.
    pub fn insert_map<K: AsRef<str>>(&mut self, path: &[K]) -> Result<(), MapError> {
        let m = NestedMap::try_with_capacity(DEFAULT_CAPACITY)?;
        self.insert(path, Value::Map(m))
    }

    pub fn insert_list<K: AsRef<str>>(&mut self, path: &[K], list: StrList) -> Result<(), MapError> {
        self.insert(path, Value::List(list))
    }

    /// Resolve `path` to the value stored at its terminal key.
    ///
    /// Fails with [`MapError::NotFound`] when a key is missing or an
    /// intermediate key does not hold a map.
    pub fn search<K: AsRef<str>>(&self, path: &[K]) -> Result<&Value, MapError> {
        let (last, parents) = path.split_last().ok_or(MapError::InvalidPath)?;
        let mut current = self;
        for key in parents {
            current = match current.lookup(key.as_ref())? {
                Value::Map(m) => m,
                _ => return Err(not_found(key.as_ref())),
            };
        }
        current.lookup(last.as_ref())
    }

    /// Mutable counterpart of [`NestedMap::search`].
    pub fn search_mut<K: AsRef<str>>(&mut self, path: &[K]) -> Result<&mut Value, MapError> {
        let (last, parents) = path.split_last().ok_or(MapError::InvalidPath)?;
        let mut current = self;
        for key in parents {
            current = match current.lookup_mut(key.as_ref())? {
                Value::Map(m) => m,
                _ => return Err(not_found(key.as_ref())),
            };
        }
        current.lookup_mut(last.as_ref())
    }

    pub fn contains_path<K: AsRef<str>>(&self, path: &[K]) -> bool {
        self.search(path).is_ok()
    }

    fn lookup(&self, key: &str) -> Result<&Value, MapError> {
        if self.capacity() == 0 {
            return Err(not_found(key));
        }
        let bucket = self.bucket_of(key)?;
        let id = self.find_in_bucket(bucket, key).ok_or_else(|| not_found(key))?;
        Ok(&self.nodes[id].value)
    }

    fn lookup_mut(&mut self, key: &str) -> Result<&mut Value, MapError> {
        if self.capacity() == 0 {
            return Err(not_found(key));
        }
        let bucket = self.bucket_of(key)?;
        let id = self.find_in_bucket(bucket, key).ok_or_else(|| not_found(key))?;
        Ok(&mut self.nodes[id].value)
    }
}

fn not_found(key: &str) -> MapError {
    MapError::NotFound {
        key: key.to_owned(),
    }
}
