//! Collaborator contracts consumed by the engine.
//!
//! The engine never executes queries or reads rows itself. It drives two
//! narrow traits:
//!
//! - [`QueryTarget`] — the backing query: answers capability probes and
//!   accepts pushed-down order-by / comparison / page-window mutations,
//!   plus a row count used for page-option computation.
//! - [`RowValues`] — the row-value source used by the row-mode stage to
//!   read a comparable value out of an already-materialized row.
//!
//! A query target that cannot serve a field/condition pair is not an error
//! condition; the engine reacts by switching the remainder of the chain to
//! row mode.

use crate::statement::{FieldName, FilterCondition, SortOrder};
use crate::value::FilterValue;

/// The backing query a filter chain pushes statements into.
///
/// Mutation methods must be chainable: repeated calls accumulate (each
/// `add_order_by` appends a subordinate sort key; each `add_comparison`
/// narrows the result set further). `set_page_window` replaces any previous
/// window.
pub trait QueryTarget {
    /// Whether this query can natively serve `condition` on `field`.
    ///
    /// Typically false for computed or virtual fields with no backing
    /// column. For `PaginateBy` the field is empty and the answer concerns
    /// windowing support.
    fn supports(&self, field: &FieldName, condition: FilterCondition) -> bool;

    /// Append a sort key. Earlier calls take precedence (primary key first).
    fn add_order_by(&mut self, field: &FieldName, order: SortOrder);

    /// Add a comparison or truthiness restriction.
    fn add_comparison(&mut self, field: &FieldName, condition: FilterCondition, criterion: &FilterValue);

    /// Restrict the result window to one page (1-indexed).
    fn set_page_window(&mut self, page_size: u64, page: u64);

    /// Total matching rows, ignoring any page window.
    fn count(&self) -> u64;
}

/// Reads a comparable value out of a materialized row, for row-mode
/// sorting and predicates.
pub trait RowValues<R> {
    /// The value of `field` on `row`.
    fn value(&self, row: &R, field: &FieldName) -> FilterValue;
}

impl<R, F> RowValues<R> for F
where
    F: Fn(&R, &FieldName) -> FilterValue,
{
    fn value(&self, row: &R, field: &FieldName) -> FilterValue {
        self(row, field)
    }
}
