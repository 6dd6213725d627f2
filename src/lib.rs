//! symtable: a string-keyed symbol table built on separate chaining with
//! growth along a fixed schedule of prime bucket counts.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: amortized O(1) insert/lookup/remove over string keys, with the
//!   table owning a private copy of every key and never touching values
//!   beyond storing and returning them.
//! - Layers:
//!   - `hash`: the 65599 polynomial hash and its reduction to a bucket.
//!   - `tiers`: the capacity schedule and the `Tier` cursor into it.
//!   - `SymTable<V>`: bucket heads over a generational node arena, with
//!     chains linked through slot keys.
//!
//! Constraints
//! - Single-threaded: no internal synchronization. The table is `Send`/`Sync`
//!   when `V` is; shared use needs an external lock.
//! - Keys are unique; duplicate inserts fail without touching the table.
//! - Bucket counts only grow, one tier at a time, when the binding count
//!   reaches the bucket count. The last tier is terminal: past it, chains
//!   lengthen instead of the table failing.
//!
//! Growth
//! - The trigger is checked before the duplicate check on every insert.
//! - A resize allocates the new bucket array and a fresh copy of every key
//!   before rewriting any link. If an allocation fails the table is left
//!   exactly as it was and the insert reports `AllocationFailure`.
//! - Nodes keep their arena slot across a resize, so `Handle`s stay valid.
//!
//! Ordering
//! - Traversal and iteration run in ascending bucket index, then head to
//!   tail along each chain (newest first within a bucket). No other order
//!   is promised, and a resize reshuffles it.
//!
//! Not-found signalling
//! - Lookups, `replace` and `remove` return `Option`, so "absent" is never
//!   confused with a stored value that is itself empty.

mod error;
mod hash;
mod sym_table;
mod sym_table_proptest;
pub mod tiers;

// Public surface
pub use error::InsertError;
pub use sym_table::{ChainStats, Handle, Iter, SymTable};
pub use tiers::{Tier, CAPACITY_TIERS};
