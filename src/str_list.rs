//! StrList: ordered, growable list of strings used as a leaf value.
//!
//! Storage is reserved explicitly so that growth follows a fixed doubling
//! schedule and an allocation failure surfaces as an error instead of an
//! abort. Duplicates are allowed.

use crate::error::MapError;

pub const LIST_DEFAULT_CAPACITY: usize = 5;
pub const LIST_GROWTH_FACTOR: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrList {
    items: Vec<String>,
}

impl StrList {
    pub fn new() -> Self {
        Self::with_capacity(LIST_DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Append `s` at the end, doubling the reserved capacity when full.
    pub fn append(&mut self, s: impl Into<String>) -> Result<(), MapError> {
        if self.items.len() == self.items.capacity() {
            let cap = self.items.capacity();
            let target = if cap == 0 {
                LIST_DEFAULT_CAPACITY
            } else {
                cap.saturating_mul(LIST_GROWTH_FACTOR)
            };
            self.items
                .try_reserve_exact(target - self.items.len())
                .map_err(|_| MapError::AllocationFailure {
                    what: "list storage",
                })?;
        }
        self.items.push(s.into());
        Ok(())
    }

    /// Exact string equality.
    pub fn contains(&self, s: &str) -> bool {
        self.items.iter().any(|item| item == s)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

impl FromIterator<String> for StrList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
