//! keypath-map: an in-memory, hierarchical, string-keyed map. Values are
//! strings, lists of strings, or nested maps, and entries are addressed by
//! an ordered path of keys such as `["a", "b", "c"]`.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a lightweight config/lookup tree with JSON-like export, built in
//!   small layers that can each be reasoned about on their own.
//! - Layers:
//!   - `hashing`: bucket index from the first 32 bits (big-endian) of the
//!     key's SHA-256 digest, modulo the bucket count.
//!   - `NestedMap` (`nested_map`): separate chaining. A bucket array holds
//!     chain heads; nodes live in a `SlotMap` arena and link to the next
//!     node of their bucket. Owns load factor, resize and teardown.
//!   - Path navigation (`navigate`): `insert`/`search` walk one key per
//!     level, creating intermediate maps on insert only.
//!   - Export (`serialize`): `serde::Serialize` for the tree, rendered
//!     compactly by `serde_json`.
//!
//! Constraints
//! - Single-threaded: no locking or atomics in the map. Callers that share a
//!   map across threads must synchronize externally.
//! - Tree-shaped ownership: a map owns its nodes, a node owns its key and
//!   value, and nested maps/lists are never shared. Teardown is a plain drop,
//!   made iterative so deep nesting cannot exhaust the stack.
//! - Keys are unique within a map. Inserting at an existing terminal key
//!   replaces its value in place.
//!
//! Growth
//! - Before insert touches a level, that level is resized by
//!   [`GROWTH_FACTOR`] if its load factor is at least
//!   [`LOAD_FACTOR_THRESHOLD`]. Resize recomputes the full digest of every
//!   key against the new capacity and relinks the existing nodes; nothing is
//!   copied. This costs one SHA-256 per entry per resize.
//!
//! Notes and non-goals
//! - Iteration and serialization order is bucket-then-chain order: neither
//!   insertion order nor sorted.
//! - No persistence and no removal of individual entries.
//! - Diagnostics go through `tracing`; see [`logging`] for the process-wide
//!   verbosity threshold. Logging never affects map behavior.

pub mod error;
pub mod hashing;
pub mod logging;
mod navigate;
pub mod nested_map;
mod nested_map_proptest;
mod serialize;
pub mod str_list;
pub mod value;

// Public surface
pub use error::MapError;
pub use logging::LogLevel;
pub use nested_map::{NestedMap, DEFAULT_CAPACITY, GROWTH_FACTOR, LOAD_FACTOR_THRESHOLD};
pub use str_list::StrList;
pub use value::{Value, ValueType};
