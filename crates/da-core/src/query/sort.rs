use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::dataset::Record;
use super::SortDirection;

/// Compare two cell values the way the table sorts them.
///
/// When both values parse as plain numbers they compare numerically,
/// otherwise they compare as lowercase text in Unicode code point order.
/// No locale collation is applied, so accented letters sort after `z`
/// (`"zebra" < "éclair"`).
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (parse_plain_number(a), parse_plain_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// Exact numeric parse, no character stripping
fn parse_plain_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Sort records by one column.
///
/// Missing columns read as empty strings. Equal values keep their input
/// order.
pub fn sort_records<R: Borrow<Record>>(records: Vec<R>, column: &str, direction: SortDirection) -> Vec<R> {
    let position = records.first().and_then(|r| {
        let record: &Record = r.borrow();
        record.schema().position(column)
    });
    let value = |r: &R| -> String {
        let record: &Record = r.borrow();
        position
            .and_then(|p| record.value_at(p))
            .unwrap_or_default()
            .to_string()
    };

    let keyed: Vec<(String, R)> = records.into_iter().map(|r| (value(&r), r)).collect();
    let sorted = merge_sort_by(keyed, &|(a, _): &(String, R), (b, _): &(String, R)| match direction {
        SortDirection::Ascending => compare_values(a, b),
        SortDirection::Descending => compare_values(b, a),
    });
    sorted.into_iter().map(|(_, r)| r).collect()
}

/// Stable merge sort.
///
/// Mixed numeric/text columns make `compare_values` intransitive, which the
/// std sorts are allowed to panic on.
fn merge_sort_by<T, F>(mut items: Vec<T>, compare: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let mut left = merge_sort_by(items, compare).into_iter().peekable();
    let mut right = merge_sort_by(right, compare).into_iter().peekable();

    let mut merged = Vec::with_capacity(left.len() + right.len());
    while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
        let next = if compare(b, a) == Ordering::Less {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
