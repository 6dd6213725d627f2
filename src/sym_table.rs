//! SymTable: separate-chaining table keyed by owned string copies.
//!
//! Nodes live in a generational `SlotMap`; each bucket holds the slot key of
//! its chain head and every node holds the slot key of its successor. A
//! resize relinks nodes in place, so slots (and therefore `Handle`s) survive
//! growth while the bucket array is replaced wholesale.

use crate::error::InsertError;
use crate::hash::bucket_index;
use crate::tiers::Tier;
use log::{debug, trace};
use slotmap::{DefaultKey, SlotMap};
use std::collections::TryReserveError;
use std::fmt;

/// Stable reference to a binding. Valid until the binding is removed; a
/// handle to a removed binding never resolves, even if its slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub fn key<'a, V>(&self, table: &'a SymTable<V>) -> Option<&'a str> {
        table.slots.get(self.0).map(|n| n.key.as_str())
    }

    pub fn value<'a, V>(&self, table: &'a SymTable<V>) -> Option<&'a V> {
        table.slots.get(self.0).map(|n| &n.value)
    }

    pub fn value_mut<'a, V>(&self, table: &'a mut SymTable<V>) -> Option<&'a mut V> {
        table.slots.get_mut(self.0).map(|n| &mut n.value)
    }
}

struct Node<V> {
    key: String,
    value: V,
    next: Option<DefaultKey>,
}

/// Occupancy summary of the bucket array.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChainStats {
    pub bucket_count: usize,
    pub occupied_buckets: usize,
    pub longest_chain: usize,
}

/// String-keyed symbol table with separate chaining.
///
/// The table copies every key it stores and never retains the caller's
/// buffer. Values are moved in and handed back by `remove`/`replace`; the
/// table never clones or inspects them. Not internally synchronized.
pub struct SymTable<V> {
    buckets: Vec<Option<DefaultKey>>,
    slots: SlotMap<DefaultKey, Node<V>>,
    tier: Tier,
}

fn empty_buckets(count: usize) -> Result<Vec<Option<DefaultKey>>, TryReserveError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(count)?;
    buckets.resize(count, None);
    Ok(buckets)
}

fn copy_key(key: &str) -> Result<String, TryReserveError> {
    let mut owned = String::new();
    owned.try_reserve_exact(key.len())?;
    owned.push_str(key);
    Ok(owned)
}

impl<V> SymTable<V> {
    /// Empty table at the first tier. Aborts on allocation failure like
    /// other std collections; see [`SymTable::try_new`].
    pub fn new() -> Self {
        Self {
            buckets: vec![None; Tier::FIRST.bucket_count()],
            slots: SlotMap::with_key(),
            tier: Tier::FIRST,
        }
    }

    /// Empty table at the first tier, reporting allocation failure.
    pub fn try_new() -> Result<Self, TryReserveError> {
        Ok(Self {
            buckets: empty_buckets(Tier::FIRST.bucket_count())?,
            slots: SlotMap::with_key(),
            tier: Tier::FIRST,
        })
    }

    /// Releases every key copy, node and the bucket array.
    pub fn destroy(self) {
        drop(self)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    fn locate(&self, key: &str) -> Option<DefaultKey> {
        let mut cur = self.buckets[bucket_index(key, self.buckets.len())];
        while let Some(k) = cur {
            let node = &self.slots[k];
            if node.key == key {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    pub fn find(&self, key: &str) -> Option<Handle> {
        self.locate(key).map(Handle)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.locate(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.locate(key).map(|k| &self.slots[k].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.locate(key)?;
        Some(&mut self.slots[k].value)
    }

    /// Binds `key` to `value`. Growth is checked before the duplicate check,
    /// so a full table grows even when the key turns out to be bound.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Handle, InsertError> {
        self.insert_with(key, move || value)
    }

    /// Like `insert`, but `default` only runs when a binding is created.
    pub fn insert_with<F>(&mut self, key: &str, default: F) -> Result<Handle, InsertError>
    where
        F: FnOnce() -> V,
    {
        self.insert_with_copier(key, default, copy_key)
    }

    /// Insert path with the key copier injected. The key copy and the slot
    /// reservation happen before any growth, so an `AllocationFailure`
    /// leaves bindings, bucket array and tier untouched.
    fn insert_with_copier<F, C>(
        &mut self,
        key: &str,
        default: F,
        copy: C,
    ) -> Result<Handle, InsertError>
    where
        F: FnOnce() -> V,
        C: FnOnce(&str) -> Result<String, TryReserveError>,
    {
        let grow_to = if self.len() == self.bucket_count() {
            let next = self.tier.next();
            if next.is_none() {
                debug!(
                    "symbol table saturated at {} buckets; chains will lengthen",
                    self.bucket_count()
                );
            }
            next
        } else {
            None
        };

        let owned = copy(key)?;
        self.slots.try_reserve(1)?;
        if let Some(next) = grow_to {
            self.grow(next)?;
        }

        if self.locate(key).is_some() {
            return Err(InsertError::DuplicateKey);
        }

        let idx = bucket_index(key, self.buckets.len());
        let k = self.slots.insert(Node {
            key: owned,
            value: default(),
            next: self.buckets[idx],
        });
        self.buckets[idx] = Some(k);
        Ok(Handle(k))
    }

    /// Rehashes every node into a bucket array sized for `next`.
    ///
    /// Every allocation (bucket array, fresh key copies) happens before the
    /// first link is rewritten; on failure the table is left as it was.
    fn grow(&mut self, next: Tier) -> Result<(), TryReserveError> {
        let new_count = next.bucket_count();
        let mut buckets = empty_buckets(new_count)?;

        let mut moved = Vec::new();
        moved.try_reserve_exact(self.len())?;
        for &head in &self.buckets {
            let mut cur = head;
            while let Some(k) = cur {
                let node = &self.slots[k];
                moved.push((k, copy_key(&node.key)?));
                cur = node.next;
            }
        }

        for (k, key) in moved {
            let idx = bucket_index(&key, new_count);
            let node = &mut self.slots[k];
            node.key = key;
            node.next = buckets[idx];
            buckets[idx] = Some(k);
        }

        debug!(
            "symbol table grew from {} to {} buckets ({} bindings)",
            self.buckets.len(),
            new_count,
            self.len()
        );
        self.buckets = buckets;
        self.tier = next;
        Ok(())
    }

    /// Swaps the bound value in place and returns the previous one. `None`
    /// when `key` is unbound, in which case `value` is dropped.
    pub fn replace(&mut self, key: &str, value: V) -> Option<V> {
        let k = self.locate(key)?;
        Some(std::mem::replace(&mut self.slots[k].value, value))
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = bucket_index(key, self.buckets.len());
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.buckets[idx];
        while let Some(k) = cur {
            let node = &self.slots[k];
            if node.key == key {
                let next = node.next;
                match prev {
                    None => self.buckets[idx] = next,
                    Some(p) => self.slots[p].next = next,
                }
                return self.slots.remove(k).map(|n| n.value);
            }
            prev = cur;
            cur = node.next;
        }
        None
    }

    /// Visits every binding once: ascending bucket index, then head to tail
    /// along each chain. The table stays borrowed for the whole walk, so the
    /// visitor can mutate values but not the table's structure.
    pub fn traverse<F>(&mut self, mut visit: F)
    where
        F: FnMut(&str, &mut V),
    {
        for &head in self.buckets.iter() {
            let mut cur = head;
            while let Some(k) = cur {
                let node = &mut self.slots[k];
                visit(node.key.as_str(), &mut node.value);
                cur = node.next;
            }
        }
    }

    /// Bindings in traversal order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            slots: &self.slots,
            cur: None,
            remaining: self.len(),
        }
    }

    pub fn chain_stats(&self) -> ChainStats {
        let mut occupied_buckets = 0;
        let mut longest_chain = 0;
        for &head in &self.buckets {
            let mut len = 0;
            let mut cur = head;
            while let Some(k) = cur {
                len += 1;
                cur = self.slots[k].next;
            }
            if len > 0 {
                occupied_buckets += 1;
            }
            longest_chain = longest_chain.max(len);
        }
        ChainStats {
            bucket_count: self.bucket_count(),
            occupied_buckets,
            longest_chain,
        }
    }
}

impl<V> Default for SymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for SymTable<V> {
    fn drop(&mut self) {
        trace!(
            "releasing symbol table: {} bindings, {} buckets",
            self.len(),
            self.bucket_count()
        );
    }
}

impl<V: fmt::Debug> fmt::Debug for SymTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(key, value)` pairs in traversal order.
pub struct Iter<'a, V> {
    buckets: std::slice::Iter<'a, Option<DefaultKey>>,
    slots: &'a SlotMap<DefaultKey, Node<V>>,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cur {
                let slots = self.slots;
                let node = &slots[k];
                self.cur = node.next;
                self.remaining -= 1;
                return Some((node.key.as_str(), &node.value));
            }
            self.cur = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a SymTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
