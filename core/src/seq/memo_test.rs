use core::cell::Cell;
use core::ops::ControlFlow;

use pretty_assertions::assert_eq;

use super::*;
use crate::test_utils::{init_test_logging, ints, values};

fn forward_over(values: &[i64]) -> impl Fn(&mut Visitor<'_>) -> Result<usize> + '_ {
    move |visitor: &mut Visitor<'_>| {
        let mut pushed = 0;
        for (i, value) in values.iter().enumerate() {
            pushed += 1;
            if visitor(Value::Int(*value), Value::from(i)).is_break() {
                break;
            }
        }
        Ok(pushed)
    }
}

#[test]
fn test_realize_runs_once() {
    init_test_logging();
    let memo = Memo::new();
    let runs = Cell::new(0);
    let forward = forward_over(&[1, 2, 3]);
    for _ in 0..3 {
        let entries = memo
            .realize(|visitor| {
                runs.set(runs.get() + 1);
                forward(visitor)
            })
            .unwrap();
        assert_eq!(entries.len(), 3);
    }
    assert_eq!(runs.get(), 1);
    assert_eq!(memo.len(), Some(3));
    assert!(memo.is_realized());
}

#[test]
fn test_push_or_stays_live_until_forced() {
    let memo = Memo::new();
    let forward = forward_over(&[1, 2]);
    let mut seen = Vec::new();
    memo.push_or(
        false,
        &mut |value, _| {
            seen.push(value);
            ControlFlow::Continue(())
        },
        false,
        |visitor, _| forward(visitor),
    )
    .unwrap();
    assert_eq!(seen, values(&[1, 2]));
    assert!(!memo.is_realized());
}

#[test]
fn test_push_or_forced_serves_reverse_from_buffer() {
    let memo = Memo::new();
    let forward = forward_over(&[1, 2, 3]);
    let mut seen = Vec::new();
    let pushed = memo
        .push_or(
            true,
            &mut |value, key| {
                seen.push((key, value));
                ControlFlow::Continue(())
            },
            true,
            |visitor, reverse| {
                assert!(!reverse, "realization always runs forward");
                forward(visitor)
            },
        )
        .unwrap();
    assert_eq!(pushed, 3);
    assert_eq!(
        seen,
        vec![
            (Value::Int(2), Value::Int(3)),
            (Value::Int(1), Value::Int(2)),
            (Value::Int(0), Value::Int(1)),
        ]
    );
}

#[test]
fn test_push_entries_counts_stop() {
    let entries: Vec<Entry> = (0..4).map(|i| (Value::Int(i), Value::Int(i * 10))).collect();
    let mut seen = 0;
    let pushed = push_entries(
        &entries,
        &mut |_, _| {
            seen += 1;
            if seen == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
        false,
    );
    assert_eq!(pushed, 2);
}

#[test]
fn test_pull_entries_reverse() {
    let entries: Rc<[Entry]> = Rc::from(vec![
        (Value::Int(0), Value::str("a")),
        (Value::Int(1), Value::str("b")),
    ]);
    let pulled: Vec<Entry> = pull_entries(entries, true).collect::<Result<_>>().unwrap();
    assert_eq!(
        pulled,
        vec![
            (Value::Int(1), Value::str("b")),
            (Value::Int(0), Value::str("a")),
        ]
    );
}

#[test]
fn test_realized_snapshot() {
    let source = ints(&[5, 6, 7]).filter(|_, _, _| true);
    assert_eq!(source.size(), None);
    let snapshot = Realized::capture(&source).unwrap();
    assert_eq!(snapshot.size(), Some(3));
    assert_eq!(snapshot.shape(), Shape::Indexed);
    assert_eq!(snapshot.get(&Value::Int(-1)).unwrap(), Some(Value::Int(7)));
}
