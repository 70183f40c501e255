use core::ops::ControlFlow;

use crate::{
    Rc, Result, Vec,
    seq::{Entries, Iterable, Seq, Shape, Visitor, wrap_index},
    value::Value,
};

/// Indexed container backed by a shared slice.
#[derive(Debug, Clone)]
pub struct List {
    values: Rc<[Value]>,
}

impl List {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values: Rc::from(values),
        }
    }

    /// Two-element indexed seq, the shape entries take when handed out as
    /// values.
    pub fn pair(key: Value, value: Value) -> Seq {
        Seq::new(List::new(crate::vec![key, value]))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn position(&self, key: &Value) -> Option<usize> {
        let index = key.as_int()?;
        wrap_index(index, self.values.len()).filter(|position| *position < self.values.len())
    }
}

impl Iterable for List {
    fn shape(&self) -> Shape {
        Shape::Indexed
    }

    fn size(&self) -> Option<usize> {
        Some(self.values.len())
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        Ok(self.position(key).map(|position| self.values[position].clone()))
    }

    fn has(&self, key: &Value) -> Result<bool> {
        Ok(self.position(key).is_some())
    }

    fn includes(&self, value: &Value) -> Result<bool> {
        Ok(self.values.iter().any(|v| v == value))
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let len = self.values.len();
        let mut i = 0;
        while i != len {
            let position = if reverse { len - 1 - i } else { i };
            i += 1;
            if let ControlFlow::Break(()) =
                visitor(self.values[position].clone(), Value::from(position))
            {
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
            let position = if reverse { len - 1 - i } else { i };
            i += 1;
            Some(Ok((Value::from(position), values[position].clone())))
        }))
    }
}
