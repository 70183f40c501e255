use crate::{
    Result,
    seq::{Entries, Iterable, Seq, Shape, Visitor},
    value::Value,
};

/// Keyed view with keys and values swapped.
pub struct Flipped {
    source: Seq,
}

impl Flipped {
    pub fn new(source: Seq) -> Self {
        Self { source }
    }
}

impl Iterable for Flipped {
    fn shape(&self) -> Shape {
        Shape::Keyed
    }

    fn size(&self) -> Option<usize> {
        self.source.size()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn has(&self, key: &Value) -> Result<bool> {
        self.source.view().includes(key)
    }

    fn includes(&self, value: &Value) -> Result<bool> {
        self.source.view().has(value)
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        self.source.iterate(reverse, |value, key| visitor(key, value))
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        Ok(Entries::new(
            self.source
                .entries(reverse)?
                .map(|step| step.map(|(key, value)| (value, key))),
        ))
    }

    fn cache(&self) -> Result<bool> {
        self.source.view().cache()
    }

    fn flipped(&self) -> Option<Seq> {
        Some(self.source.clone())
    }
}

#[cfg(test)]
#[path = "flip_test.rs"]
mod flip_test;
