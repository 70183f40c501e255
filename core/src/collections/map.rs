use core::ops::ControlFlow;

use hashbrown::HashMap;

use crate::{
    Rc, Result, Vec,
    seq::{Entries, Entry, Iterable, Shape, Visitor, pull_entries, push_entries},
    value::Value,
};

/// Frozen keyed container.
///
/// Ordered maps iterate in insertion order. Unordered maps iterate in their
/// hash table's order, which is stable for a given instance but otherwise
/// unspecified.
#[derive(Debug, Clone)]
pub struct Map {
    storage: Storage,
}

#[derive(Debug, Clone)]
enum Storage {
    Ordered {
        entries: Rc<[Entry]>,
        index: Rc<HashMap<Value, usize>>,
    },
    Hashed(Rc<HashMap<Value, Value>>),
}

impl Map {
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Ordered { entries, .. } => entries.len(),
            Storage::Hashed(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &Value) -> Option<&Value> {
        match &self.storage {
            Storage::Ordered { entries, index } => index.get(key).map(|at| &entries[*at].1),
            Storage::Hashed(table) => table.get(key),
        }
    }

    /// Entries in this map's iteration order.
    fn snapshot(&self) -> Rc<[Entry]> {
        match &self.storage {
            Storage::Ordered { entries, .. } => entries.clone(),
            Storage::Hashed(table) => table
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }
}

impl Iterable for Map {
    fn shape(&self) -> Shape {
        Shape::Keyed
    }

    fn size(&self) -> Option<usize> {
        Some(self.len())
    }

    fn is_ordered(&self) -> bool {
        matches!(self.storage, Storage::Ordered { .. })
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        Ok(self.lookup(key).cloned())
    }

    fn has(&self, key: &Value) -> Result<bool> {
        Ok(self.lookup(key).is_some())
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        match &self.storage {
            Storage::Ordered { entries, .. } => Ok(push_entries(entries, visitor, reverse)),
            Storage::Hashed(table) if !reverse => {
                let mut visited = 0;
                for (key, value) in table.iter() {
                    visited += 1;
                    if let ControlFlow::Break(()) = visitor(value.clone(), key.clone()) {
                        break;
                    }
                }
                Ok(visited)
            }
            Storage::Hashed(_) => Ok(push_entries(&self.snapshot(), visitor, reverse)),
        }
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        Ok(pull_entries(self.snapshot(), reverse))
    }
}

/// Mutable scratch map, frozen into a [`Map`] once built.
///
/// Values can be any `V` while building (group-by keeps growable buckets,
/// count-by keeps counters); [`MapBuilder::map_values`] turns them into
/// [`Value`]s before freezing.
#[derive(Debug, Clone)]
pub struct MapBuilder<V = Value> {
    ordered: bool,
    entries: Vec<(Value, V)>,
    index: HashMap<Value, usize>,
}

impl<V> MapBuilder<V> {
    pub fn new(ordered: bool) -> Self {
        Self {
            ordered,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builder that freezes into an insertion-ordered map.
    pub fn ordered() -> Self {
        Self::new(true)
    }

    /// Builder that freezes into a hash-ordered map.
    pub fn unordered() -> Self {
        Self::new(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite; an overwritten key keeps its position.
    pub fn set(&mut self, key: Value, value: V) {
        match self.index.get(&key) {
            Some(&at) => self.entries[at].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Slot for `key`, inserting `init()` first if the key is new.
    pub fn entry_or_insert_with(&mut self, key: Value, init: impl FnOnce() -> V) -> &mut V {
        let at = match self.index.get(&key) {
            Some(at) => *at,
            None => {
                let at = self.entries.len();
                self.index.insert(key.clone(), at);
                self.entries.push((key, init()));
                at
            }
        };
        &mut self.entries[at].1
    }

    /// Replace the value under `key` with `update(previous)`, where the
    /// previous value is `not_set` for a new key.
    pub fn update(&mut self, key: Value, not_set: V, update: impl FnOnce(V) -> V)
    where
        V: Default,
    {
        let slot = self.entry_or_insert_with(key, || not_set);
        let previous = core::mem::take(slot);
        *slot = update(previous);
    }

    pub fn map_values<W>(self, mut f: impl FnMut(V) -> W) -> MapBuilder<W> {
        MapBuilder {
            ordered: self.ordered,
            entries: self
                .entries
                .into_iter()
                .map(|(key, value)| (key, f(value)))
                .collect(),
            index: self.index,
        }
    }
}

impl MapBuilder<Value> {
    pub fn freeze(self) -> Map {
        let storage = if self.ordered {
            Storage::Ordered {
                entries: Rc::from(self.entries),
                index: Rc::new(self.index),
            }
        } else {
            Storage::Hashed(Rc::new(self.entries.into_iter().collect()))
        };
        Map { storage }
    }
}
