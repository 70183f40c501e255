//! End-to-end properties of combinator chains, driven through the public API.

use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;

use lazyseq_core::{Entries, Error, Iterable, Kind, Result, Seq, Shape, Value, Visitor};
use pretty_assertions::assert_eq;

/// Indexed source of unknown size that counts every element it hands out.
struct Probe {
    values: Vec<Value>,
    reads: Rc<Cell<usize>>,
}

impl Iterable for Probe {
    fn shape(&self) -> Shape {
        Shape::Indexed
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        if reverse {
            order.reverse();
        }
        let mut visited = 0;
        for (step, index) in order.into_iter().enumerate() {
            self.reads.set(self.reads.get() + 1);
            visited += 1;
            if visitor(self.values[index].clone(), Value::from(step)).is_break() {
                break;
            }
        }
        Ok(visited)
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        let mut values = self.values.clone();
        if reverse {
            values.reverse();
        }
        let reads = self.reads.clone();
        Ok(Entries::new(values.into_iter().enumerate().map(
            move |(index, value)| {
                reads.set(reads.get() + 1);
                Ok((Value::from(index), value))
            },
        )))
    }
}

fn probe(values: &[i64]) -> (Seq, Rc<Cell<usize>>) {
    let reads = Rc::new(Cell::new(0));
    let seq = Seq::new(Probe {
        values: values.iter().copied().map(Value::from).collect(),
        reads: reads.clone(),
    });
    (seq, reads)
}

fn ints(values: &[i64]) -> Seq {
    Seq::indexed(values.iter().copied())
}

fn values(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

fn render(seq: &Seq) -> String {
    format!("{seq:?}")
}

fn int(value: &Value) -> i64 {
    value.as_int().unwrap_or_default()
}

fn counted<T>(calls: &Rc<Cell<usize>>, result: T) -> T {
    calls.set(calls.get() + 1);
    result
}

#[test]
fn test_building_views_reads_nothing() {
    let (source, reads) = probe(&[3, 1, 2]);
    let calls = Rc::new(Cell::new(0));

    let mapper = {
        let calls = calls.clone();
        move |value: &Value, _: &Value, _: &Seq| counted(&calls, value.clone())
    };
    let predicate = {
        let calls = calls.clone();
        move |_: &Value, _: &Value, _: &Seq| counted(&calls, true)
    };
    let comparator = {
        let calls = calls.clone();
        move |a: &Value, b: &Value| counted(&calls, int(a).cmp(&int(b)))
    };
    let zipper = {
        let calls = calls.clone();
        move |values: &[Value]| counted(&calls, values[0].clone())
    };

    let views = vec![
        source.map(mapper.clone()),
        source.map_keys(mapper.clone()),
        source.filter(predicate.clone()),
        source.filter_not(predicate.clone()),
        source.reverse(),
        source.flip(),
        source.slice(1, Some(3)),
        source.slice(-2, None),
        source.take_last(2),
        source.skip_last(1),
        source.take_while(predicate.clone()),
        source.skip_while(predicate.clone()),
        source.concat([ints(&[9])]),
        source.flatten(None),
        source.flat_map(mapper.clone()),
        source.interpose(0),
        source.sort_with(comparator.clone()),
        source.sort_by(mapper.clone()),
        source.zip_with(zipper, [ints(&[1, 2])]),
        source.to_keyed_seq(),
        source.to_set_seq(),
        source.key_seq(),
        source.value_seq(),
    ];

    assert_eq!(reads.get(), 0);
    assert_eq!(calls.get(), 0);

    for view in &views {
        view.to_vec().unwrap();
    }
    assert!(reads.get() > 0);
    assert!(calls.get() > 0);
}

#[test]
fn test_views_restart() {
    let (source, _) = probe(&[5, 1, 4, 2, 3]);
    let chain = source
        .filter(|value, _, _| int(value) != 4)
        .map(|value, _, _| Value::Int(int(value) * 10))
        .reverse()
        .slice(0, Some(-1));

    let first = chain.to_entries().unwrap();
    let second = chain.to_entries().unwrap();
    assert_eq!(first, second);

    let pulled = |seq: &Seq| -> Vec<Value> {
        seq.iterate_pull(Kind::Values, false)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap()
    };
    assert_eq!(pulled(&chain), pulled(&chain));
    assert_eq!(pulled(&chain), values(&[30, 20, 10]));
}

#[test]
fn test_map_identity() {
    let indexed = ints(&[4, 5, 6]);
    let same = indexed.map(|value, _, _| value.clone());
    assert_eq!(same.to_entries().unwrap(), indexed.to_entries().unwrap());

    let keyed = Seq::keyed([("a", 1), ("b", 2)]);
    let same = keyed.map(|value, _, _| value.clone());
    assert_eq!(same.to_entries().unwrap(), keyed.to_entries().unwrap());
}

#[test]
fn test_reverse_involution() {
    let known = ints(&[1, 2, 3]);
    assert_eq!(known.reverse().reverse().to_vec().unwrap(), values(&[1, 2, 3]));

    let (unknown, _) = probe(&[1, 2, 3]);
    assert_eq!(unknown.reverse().reverse().to_vec().unwrap(), values(&[1, 2, 3]));

    // An intermediate view keeps the two reversals from unwrapping.
    let through_map = unknown
        .filter(|_, _, _| true)
        .reverse()
        .map(|value, _, _| value.clone())
        .reverse();
    assert_eq!(through_map.to_vec().unwrap(), values(&[1, 2, 3]));
}

#[test]
fn test_slice_examples() {
    let source = ints(&[0, 1, 2, 3, 4, 5]);
    assert_eq!(source.slice(1, Some(4)).to_vec().unwrap(), values(&[1, 2, 3]));
    assert_eq!(source.slice(-2, None).to_vec().unwrap(), values(&[4, 5]));

    let (unknown, _) = probe(&[0, 1, 2, 3, 4, 5]);
    assert_eq!(unknown.slice(1, Some(4)).to_vec().unwrap(), values(&[1, 2, 3]));
    assert_eq!(unknown.slice(-2, None).to_vec().unwrap(), values(&[4, 5]));
}

#[test]
fn test_slice_stops_reading_past_the_end() {
    let (source, reads) = probe(&[0, 1, 2, 3, 4, 5]);
    assert_eq!(source.take(2).to_vec().unwrap(), values(&[0, 1]));
    assert!(reads.get() <= 3);
}

#[test]
fn test_filter_renumbers_indexed() {
    let evens = ints(&[5, 6, 7, 8]).filter(|value, _, _| int(value) % 2 == 0);
    assert_eq!(
        evens.to_entries().unwrap(),
        vec![(Value::Int(0), Value::Int(6)), (Value::Int(1), Value::Int(8))]
    );
}

#[test]
fn test_take_and_skip_while_boundary() {
    let source = ints(&[1, 2, 3, 4]);
    let below_three = |value: &Value, _: &Value, _: &Seq| int(value) < 3;
    assert_eq!(source.take_while(below_three).to_vec().unwrap(), values(&[1, 2]));
    assert_eq!(source.skip_while(below_three).to_vec().unwrap(), values(&[3, 4]));

    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let skipped =
        ints(&[1, 5, 1]).skip_while(move |value, _, _| counted(&counter, int(value) < 3));
    assert_eq!(skipped.to_vec().unwrap(), values(&[5, 1]));
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_flatten_depth() {
    let nested = Seq::indexed([
        Value::Seq(Seq::indexed([Value::Int(1), Value::Seq(ints(&[2, 3]))])),
        Value::Int(4),
    ]);
    assert_eq!(render(&nested.flatten(Some(1))), "[1, [2, 3], 4]");
    assert_eq!(render(&nested.flatten(None)), "[1, 2, 3, 4]");
}

#[test]
fn test_sort_stability() {
    let records = Seq::indexed([
        Value::Seq(Seq::keyed([("k", Value::Int(1)), ("v", Value::str("a"))])),
        Value::Seq(Seq::keyed([("k", Value::Int(1)), ("v", Value::str("b"))])),
    ]);
    let field = |name: &'static str| {
        move |record: &Value, _: &Value, _: &Seq| {
            record
                .as_seq()
                .and_then(|record| record.get(name).ok().flatten())
                .unwrap_or_default()
        }
    };
    let sorted = records.sort_by(field("k")).map(field("v"));
    assert_eq!(
        sorted.to_vec().unwrap(),
        vec![Value::str("a"), Value::str("b")]
    );
}

#[test]
fn test_zip_truncation() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let zipped = ints(&[1, 2, 3]).zip_with(
        move |values| counted(&counter, Value::Int(values.iter().map(int).sum())),
        [ints(&[10, 20])],
    );
    assert_eq!(zipped.to_vec().unwrap(), values(&[11, 22]));
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_group_by_total_count() {
    let (unknown, _) = probe(&[7, 3, 9, 3, 1, 0]);
    let sources = [
        ints(&[5, 1, 8, 2, 9, 4, 4]),
        Seq::keyed([("a", 1), ("b", 2), ("c", 3)]),
        Seq::set([1, 2, 3, 4]),
        unknown.filter(|value, _, _| int(value) > 0),
    ];
    for source in sources {
        let groups = source
            .group_by(|value, _, _| Value::Int(int(value) % 3))
            .unwrap();
        let mut total = 0;
        groups
            .iterate(false, |bucket, _| {
                total += bucket.as_seq().map_or(0, |bucket| bucket.count().unwrap());
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(total, source.count().unwrap());
    }
}

#[test]
fn test_malformed_entries_fail_on_drive() {
    let broken = Seq::from_entries(&Seq::indexed([
        Value::Seq(Seq::indexed(["a", "b"])),
        Value::Int(3),
    ]));
    // Building is fine; driving surfaces the error.
    let mapped = broken.map(|value, _, _| value.clone());
    let err = mapped.to_vec().unwrap_err();
    assert_eq!(
        err,
        Error::MalformedEntry {
            entry: "3".to_string()
        }
    );
    assert_eq!(err.to_string(), "expected [K, V] tuple: 3");
}
