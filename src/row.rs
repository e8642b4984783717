//! Row-mode execution: the fallback stage for unpushable statements.
//!
//! When any part of a chain cannot be pushed into the backing query, the
//! affected statements come back from the evaluation as pending row
//! operations. After the caller executes the query and materializes rows,
//! [`filter_rows`] applies those operations in memory:
//!
//! 1. predicates (`LessThan`, `GreaterThan`, `EqualTo`, `NotEqualTo`,
//!    `Truthy`, `Falsey`) retain matching rows;
//! 2. sort statements collapse into one stable multi-key sort, with
//!    chain-declared order as key precedence — the same precedence a fully
//!    pushed-down chain would have produced in the query;
//! 3. a `PaginateBy` statement slices the surviving rows last, recomputing
//!    the page options from the post-predicate count.
//!
//! Predicates and sorting commute, so evaluating all predicates before the
//! single sort preserves the chain's semantics; only the page window has to
//! wait until everything else has run.

use crate::pagination::{clamp_page, page_options, page_window};
use crate::query::RowValues;
use crate::statement::{FilterCondition, FilterStatement, SortOrder};
use crate::value::FilterValue;
use std::cmp::Ordering;
use tracing::debug;

/// The outcome of applying pending row operations to a materialized set.
#[derive(Debug)]
pub struct RowsOutcome<R> {
    /// Surviving rows, sorted and windowed.
    pub rows: Vec<R>,
    /// Page options recomputed from the post-predicate row count; `Some`
    /// only when the operations included a `PaginateBy`.
    pub page_options: Option<Vec<u64>>,
}

/// Apply deferred row operations to `rows`, reading field values through
/// `values`.
///
/// `ops` is the pending-operation list from a chain evaluation, in
/// application order. Rows whose value is incomparable with a predicate's
/// criterion (say, a string against an integer) fail that predicate.
pub fn filter_rows<R, V>(mut rows: Vec<R>, ops: &[FilterStatement], values: &V) -> RowsOutcome<R>
where
    V: RowValues<R>,
{
    for op in ops.iter().filter(|op| op.condition().is_predicate()) {
        rows.retain(|row| predicate_matches(&values.value(row, op.field()), op));
    }

    let sort_keys: Vec<(&FilterStatement, SortOrder)> = ops
        .iter()
        .filter_map(|op| op.condition().sort_order().map(|order| (op, order)))
        .collect();
    if !sort_keys.is_empty() {
        rows.sort_by(|a, b| {
            for (op, order) in &sort_keys {
                let ordering = values
                    .value(a, op.field())
                    .compare(&values.value(b, op.field()))
                    // Incomparable keys tie; the stable sort keeps their
                    // prior relative order.
                    .unwrap_or(Ordering::Equal);
                let ordering = match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    let mut options = None;
    if let Some(op) = ops
        .iter()
        .find(|op| op.condition() == FilterCondition::PaginateBy)
    {
        let page_size = op.criterion().as_u64().unwrap_or(1).max(1);
        let requested = op.control().and_then(FilterValue::as_u64).unwrap_or(1);
        let count = rows.len() as u64;
        let computed = page_options(count, page_size);
        let page = clamp_page(requested, computed.len() as u64);
        let (start, end) = page_window(page, page_size, count);
        debug!(page_size, page, rows = count, "paginating in row mode");
        rows.truncate(end);
        rows.drain(..start);
        options = Some(computed);
    }

    RowsOutcome {
        rows,
        page_options: options,
    }
}

fn predicate_matches(value: &FilterValue, op: &FilterStatement) -> bool {
    match op.condition() {
        FilterCondition::Truthy => value.is_truthy(),
        FilterCondition::Falsey => !value.is_truthy(),
        FilterCondition::EqualTo => value.compare(op.criterion()) == Some(Ordering::Equal),
        FilterCondition::NotEqualTo => value
            .compare(op.criterion())
            .is_some_and(|ordering| ordering != Ordering::Equal),
        FilterCondition::LessThan => value.compare(op.criterion()) == Some(Ordering::Less),
        FilterCondition::GreaterThan => value.compare(op.criterion()) == Some(Ordering::Greater),
        // Sorts and pagination are not predicates.
        _ => true,
    }
}
