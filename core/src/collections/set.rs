use hashbrown::HashSet;

use crate::{
    Rc, Result, Vec,
    seq::{Entries, Iterable, Shape, Visitor},
    value::Value,
};

/// Insertion-ordered set of distinct values.
#[derive(Debug, Clone)]
pub struct Set {
    values: Rc<[Value]>,
    members: Rc<HashSet<Value>>,
}

impl Set {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        let mut members = HashSet::new();
        let mut ordered = Vec::new();
        for value in values {
            if members.insert(value.clone()) {
                ordered.push(value);
            }
        }
        Self {
            values: Rc::from(ordered),
            members: Rc::new(members),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Iterable for Set {
    fn shape(&self) -> Shape {
        Shape::Set
    }

    fn size(&self) -> Option<usize> {
        Some(self.values.len())
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        Ok(self.members.get(key).cloned())
    }

    fn has(&self, key: &Value) -> Result<bool> {
        Ok(self.members.contains(key))
    }

    fn includes(&self, value: &Value) -> Result<bool> {
        Ok(self.members.contains(value))
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let len = self.values.len();
        let mut i = 0;
        while i != len {
            let value = &self.values[if reverse { len - 1 - i } else { i }];
            i += 1;
            if visitor(value.clone(), value.clone()).is_break() {
                break;
            }
        }
        Ok(i)
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        let values = self.values.clone();
        let len = values.len();
        let mut i = 0;
        Ok(Entries::from_fn(move || {
            if i == len {
                return None;
            }
            let value = values[if reverse { len - 1 - i } else { i }].clone();
            i += 1;
            Some(Ok((value.clone(), value)))
        }))
    }
}
