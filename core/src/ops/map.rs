use crate::{
    Result,
    seq::{Entries, Iterable, Seq, Shape, Visitor, lookup},
    value::Value,
};

use super::Mapper;

/// Values replaced by `mapper(value, key, source)`, computed on demand.
///
/// Keys are kept, except over sets where the mapped value is its own key.
pub struct Mapped {
    source: Seq,
    mapper: Mapper,
}

impl Mapped {
    pub fn new(source: Seq, mapper: Mapper) -> Self {
        Self { source, mapper }
    }

    fn is_set(&self) -> bool {
        self.source.shape() == Shape::Set
    }
}

impl Iterable for Mapped {
    fn shape(&self) -> Shape {
        self.source.shape()
    }

    fn size(&self) -> Option<usize> {
        self.source.size()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        if self.is_set() {
            return lookup(self, key);
        }
        Ok(self
            .source
            .view()
            .get(key)?
            .map(|value| (self.mapper)(&value, key, &self.source)))
    }

    fn has(&self, key: &Value) -> Result<bool> {
        if self.is_set() {
            return Ok(self.get(key)?.is_some());
        }
        self.source.view().has(key)
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let is_set = self.is_set();
        self.source.iterate(reverse, |value, key| {
            let mapped = (self.mapper)(&value, &key, &self.source);
            if is_set {
                visitor(mapped.clone(), mapped)
            } else {
                visitor(mapped, key)
            }
        })
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        let source = self.source.clone();
        let mapper = self.mapper.clone();
        let is_set = self.is_set();
        let inner = source.entries(reverse)?;
        Ok(Entries::new(inner.map(move |step| {
            step.map(|(key, value)| {
                let mapped = mapper(&value, &key, &source);
                if is_set {
                    (mapped.clone(), mapped)
                } else {
                    (key, mapped)
                }
            })
        })))
    }

    fn cache(&self) -> Result<bool> {
        self.source.view().cache()
    }

    fn value_seq(&self) -> Option<Seq> {
        let values = self.source.view().value_seq()?;
        Some(Seq::new(Mapped::new(values, self.mapper.clone())))
    }
}

#[cfg(test)]
#[path = "map_test.rs"]
mod map_test;
