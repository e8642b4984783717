//! Filters, filter chains, and the query-application pass.
//!
//! A [`Filter`] is an immutable definition: a kind, a caller-assigned
//! handle, one or more statements, and an optional shared pointer to the
//! *next* filter — the one applied before this one. Chained filters form a
//! singly-linked list evaluated innermost-first, so the earliest-declared
//! filter contributes the primary sort key.
//!
//! [`Filter::apply_to_query`] walks the chain and decides, per chain rather
//! than per statement, whether the work can be pushed into the backing
//! query or must fall back to row-mode evaluation. One unsupported
//! statement anywhere poisons every statement at and after it: query-level
//! ordering and row-level ordering cannot be interleaved into a single
//! consistent ordering, so the remainder of the chain must commit to one
//! strategy.
//!
//! The pass returns a [`ChainEvaluation`] alongside the mutated query; the
//! filter itself is never written to, so a chain can be re-evaluated
//! against a fresh query and produce a structurally equal result.
//!
//! Chains are caller-owned `Arc` links. A cyclic chain is a caller error
//! and is not guarded against.

use crate::pagination::{clamp_page, page_options};
use crate::query::QueryTarget;
use crate::statement::{FilterCondition, FilterStatement};
use crate::value::FilterValue;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

/// Statement storage; nearly every filter holds exactly one statement.
pub type StatementList = SmallVec<[FilterStatement; 1]>;

/// Feedback storage for a whole chain.
pub type FeedbackList = SmallVec<[FeedbackEntry; 4]>;

/// What a filter is for; decides which statement the builder synthesizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    /// A fixed field/condition/criterion chosen at build time.
    Static,
    /// A single `PaginateBy` statement.
    Pagination,
    /// Equality against a criterion supplied per request.
    DynamicEqual,
    /// Less-than against a criterion supplied per request.
    DynamicLessThan,
    /// Greater-than against a criterion supplied per request.
    DynamicGreaterThan,
}

/// How one statement was satisfied during a query-application pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    statement: FilterStatement,
    applied_by_query: bool,
}

impl FeedbackEntry {
    fn query_applied(statement: FilterStatement) -> Self {
        Self {
            statement,
            applied_by_query: true,
        }
    }

    fn row_applied(statement: FilterStatement) -> Self {
        Self {
            statement,
            applied_by_query: false,
        }
    }

    /// The statement this entry describes.
    pub fn statement(&self) -> &FilterStatement {
        &self.statement
    }

    /// True when the statement was pushed into the query; false when it was
    /// deferred to row-mode evaluation.
    pub fn applied_by_query(&self) -> bool {
        self.applied_by_query
    }
}

/// The result of one query-application pass over a chain.
///
/// Feedback entries and deferred row operations are in application order:
/// the innermost (earliest-declared) filter's statements come first.
#[derive(Debug)]
pub struct ChainEvaluation<Q> {
    query: Q,
    feedback: FeedbackList,
    row_ops: Vec<FilterStatement>,
    options: Vec<u64>,
}

impl<Q> ChainEvaluation<Q> {
    /// The query, with every pushed-down statement applied.
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Mutable access to the query, e.g. to execute it.
    pub fn query_mut(&mut self) -> &mut Q {
        &mut self.query
    }

    /// Consume the evaluation, keeping only the query.
    pub fn into_query(self) -> Q {
        self.query
    }

    /// Per-statement pushdown feedback for the whole chain.
    pub fn feedback(&self) -> &[FeedbackEntry] {
        &self.feedback
    }

    /// Statements deferred to row mode, in application order. Feed these to
    /// [`crate::row::filter_rows`] after materializing the query's rows.
    pub fn row_ops(&self) -> &[FilterStatement] {
        &self.row_ops
    }

    /// Selectable page numbers, when a pagination statement was pushed
    /// down. Empty when the chain has no pagination or when pagination fell
    /// back to row mode (the row stage then recomputes the options).
    pub fn options(&self) -> &[u64] {
        &self.options
    }
}

/// An immutable filter definition, optionally chained onto a predecessor.
#[derive(Debug, Clone)]
pub struct Filter {
    kind: FilterKind,
    handle: String,
    statements: StatementList,
    next: Option<Arc<Filter>>,
}

impl Filter {
    pub(crate) fn new(
        kind: FilterKind,
        handle: String,
        statements: StatementList,
        next: Option<Arc<Filter>>,
    ) -> Self {
        debug_assert!(!handle.is_empty());
        debug_assert!(!statements.is_empty());
        Self {
            kind,
            handle,
            statements,
            next,
        }
    }

    /// The filter's kind.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// The caller-assigned, unique-per-page handle.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// This filter's own statements (not the chain's).
    pub fn statements(&self) -> &[FilterStatement] {
        &self.statements
    }

    /// The predecessor filter, applied before this one.
    pub fn next(&self) -> Option<&Arc<Filter>> {
        self.next.as_ref()
    }

    /// Apply the whole chain to `query`, innermost filter first.
    ///
    /// Statements that the query supports are pushed down in chain-declared
    /// order; the rest are deferred to row mode. One unsupported statement
    /// forces every statement at and after it into row mode, including
    /// statements of later filters that would have been pushable on their
    /// own.
    pub fn apply_to_query<Q: QueryTarget>(&self, query: Q) -> ChainEvaluation<Q> {
        let mut evaluation = ChainEvaluation {
            query,
            feedback: FeedbackList::new(),
            row_ops: Vec::new(),
            options: Vec::new(),
        };
        self.apply_chain(&mut evaluation);
        evaluation
    }

    fn apply_chain<Q: QueryTarget>(&self, evaluation: &mut ChainEvaluation<Q>) {
        if let Some(next) = &self.next {
            next.apply_chain(evaluation);
        }

        // Pushdown is an all-or-nothing property of the chain so far: any
        // row-applied predecessor statement forces this filter into row
        // mode as well.
        let fallback = evaluation.feedback.iter().any(|e| !e.applied_by_query);

        // Within one filter the decision is likewise all-or-nothing, which
        // is the retroactive poison rule without ever having to undo a
        // query mutation: nothing is applied until every statement of this
        // filter is known to be supported.
        let can_push = !fallback
            && self
                .statements
                .iter()
                .all(|s| evaluation.query.supports(s.field(), s.condition()));

        if can_push {
            for statement in &self.statements {
                self.push_statement(evaluation, statement);
                evaluation
                    .feedback
                    .push(FeedbackEntry::query_applied(statement.clone()));
            }
        } else {
            if !fallback {
                debug!(
                    handle = %self.handle,
                    "query cannot serve filter; remainder of chain falls back to row mode"
                );
            }
            for statement in &self.statements {
                trace!(handle = %self.handle, field = %statement.field(), "deferring statement to row mode");
                evaluation.row_ops.push(statement.clone());
                evaluation
                    .feedback
                    .push(FeedbackEntry::row_applied(statement.clone()));
            }
        }
    }

    fn push_statement<Q: QueryTarget>(
        &self,
        evaluation: &mut ChainEvaluation<Q>,
        statement: &FilterStatement,
    ) {
        let condition = statement.condition();
        if let Some(order) = condition.sort_order() {
            trace!(handle = %self.handle, field = %statement.field(), %order, "pushing order-by");
            evaluation.query.add_order_by(statement.field(), order);
        } else if condition == FilterCondition::PaginateBy {
            // The builder guarantees a positive integer page size.
            let page_size = statement.criterion().as_u64().unwrap_or(1).max(1);
            let requested = statement
                .control()
                .and_then(FilterValue::as_u64)
                .unwrap_or(1);
            let options = page_options(evaluation.query.count(), page_size);
            let page = clamp_page(requested, options.len() as u64);
            trace!(handle = %self.handle, page_size, page, "pushing page window");
            evaluation.query.set_page_window(page_size, page);
            evaluation.options = options;
        } else {
            trace!(handle = %self.handle, field = %statement.field(), ?condition, "pushing comparison");
            evaluation
                .query
                .add_comparison(statement.field(), condition, statement.criterion());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{FilterBuilder, FilterSettings};
    use crate::statement::{FieldName, SortOrder};
    use pretty_assertions::assert_eq;

    /// Records every pushdown call, and only admits the fields it was told
    /// exist. Pagination and comparisons are always supported on known
    /// fields; `PaginateBy` carries no field and is always supported.
    #[derive(Debug, Default)]
    struct MockQuery {
        known_fields: Vec<&'static str>,
        count: u64,
        order_by_calls: Vec<(String, String)>,
        comparison_calls: Vec<(String, FilterCondition, FilterValue)>,
        page_window: Option<(u64, u64)>,
    }

    impl MockQuery {
        fn with_fields(known_fields: Vec<&'static str>) -> Self {
            Self {
                known_fields,
                ..Self::default()
            }
        }
    }

    impl QueryTarget for MockQuery {
        fn supports(&self, field: &FieldName, condition: FilterCondition) -> bool {
            condition == FilterCondition::PaginateBy
                || self.known_fields.contains(&field.as_str())
        }

        fn add_order_by(&mut self, field: &FieldName, order: SortOrder) {
            self.order_by_calls
                .push((field.as_str().to_string(), order.as_str().to_string()));
        }

        fn add_comparison(
            &mut self,
            field: &FieldName,
            condition: FilterCondition,
            criterion: &FilterValue,
        ) {
            self.comparison_calls
                .push((field.as_str().to_string(), condition, criterion.clone()));
        }

        fn set_page_window(&mut self, page_size: u64, page: u64) {
            self.page_window = Some((page_size, page));
        }

        fn count(&self) -> u64 {
            self.count
        }
    }

    fn sort_filter(
        handle: &str,
        field: &str,
        condition: FilterCondition,
        next: Option<Arc<Filter>>,
    ) -> Filter {
        let mut builder = FilterBuilder::static_filter()
            .handle(handle)
            .field(field)
            .condition(condition);
        if let Some(next) = next {
            builder = builder.next(next);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_single_statement_pushdown() {
        let filter = sort_filter("Filter1", "TestClass.Id", FilterCondition::SortAsc, None);

        let query = MockQuery::with_fields(vec!["TestClass.Id"]);
        let evaluation = filter.apply_to_query(query);

        assert_eq!(evaluation.feedback().len(), 1);
        assert!(evaluation.feedback()[0].applied_by_query());
        assert!(evaluation.row_ops().is_empty());
        assert_eq!(
            evaluation.query().order_by_calls,
            vec![("TestClass.Id".to_string(), "ASC".to_string())]
        );
    }

    #[test]
    fn test_comparison_pushdown() {
        let filter = FilterBuilder::static_filter()
            .handle("Filter1")
            .field("TestClass.FieldFloat")
            .condition(FilterCondition::LessThan)
            .criterion(2.5)
            .build()
            .unwrap();

        let query = MockQuery::with_fields(vec!["TestClass.FieldFloat"]);
        let evaluation = filter.apply_to_query(query);

        assert_eq!(
            evaluation.query().comparison_calls,
            vec![(
                "TestClass.FieldFloat".to_string(),
                FilterCondition::LessThan,
                FilterValue::Float(2.5),
            )]
        );
    }

    #[test]
    fn test_chain_declared_order_by() {
        let filter1 = Arc::new(sort_filter(
            "Filter1",
            "TestClass.Id",
            FilterCondition::SortAsc,
            None,
        ));
        let filter2 = sort_filter(
            "Filter2",
            "TestClass.FieldFloat",
            FilterCondition::SortDesc,
            Some(filter1),
        );

        let query = MockQuery::with_fields(vec!["TestClass.Id", "TestClass.FieldFloat"]);
        let evaluation = filter2.apply_to_query(query);

        // Earliest-declared filter contributes the primary sort key.
        assert_eq!(
            evaluation.query().order_by_calls,
            vec![
                ("TestClass.Id".to_string(), "ASC".to_string()),
                ("TestClass.FieldFloat".to_string(), "DESC".to_string()),
            ]
        );
    }

    #[test]
    fn test_unsupported_field_poisons_remaining_chain() {
        let filter1 = Arc::new(sort_filter(
            "Filter1",
            "TestClass.Id",
            FilterCondition::SortAsc,
            None,
        ));
        // This filter forces a row sort: the field is unknown to the query.
        let filter2 = Arc::new(sort_filter(
            "Filter2",
            "TestClass.MadeUpFieldToForceRowSort",
            FilterCondition::SortDesc,
            Some(filter1),
        ));
        // Pushable on its own, but the chain already fell back.
        let filter3 = sort_filter(
            "Filter3",
            "TestClass.FieldFloat",
            FilterCondition::SortDesc,
            Some(filter2),
        );

        let query = MockQuery::with_fields(vec!["TestClass.Id", "TestClass.FieldFloat"]);
        let evaluation = filter3.apply_to_query(query);

        // Filter1 ran before the poison and keeps its pushdown; nothing
        // after the unsupported field reaches the query.
        assert_eq!(
            evaluation.query().order_by_calls,
            vec![("TestClass.Id".to_string(), "ASC".to_string())]
        );
        let applied: Vec<bool> = evaluation
            .feedback()
            .iter()
            .map(FeedbackEntry::applied_by_query)
            .collect();
        assert_eq!(applied, vec![true, false, false]);
        assert_eq!(evaluation.row_ops().len(), 2);
    }

    #[test]
    fn test_pagination_options_from_count() {
        let filter = FilterBuilder::pagination()
            .handle("pagination")
            .max_per_page(15)
            .build(&FilterSettings::default())
            .unwrap();

        let mut query = MockQuery::default();
        query.count = 200;
        let evaluation = filter.apply_to_query(query);

        assert_eq!(evaluation.options(), (1..=14).collect::<Vec<u64>>());
        assert_eq!(evaluation.query().page_window, Some((15, 1)));
    }

    #[test]
    fn test_pagination_page_clamped_to_last() {
        let filter = FilterBuilder::pagination()
            .handle("pagination")
            .max_per_page(10)
            .page(99)
            .build(&FilterSettings::default())
            .unwrap();

        let mut query = MockQuery::default();
        query.count = 35;
        let evaluation = filter.apply_to_query(query);

        assert_eq!(evaluation.options(), &[1, 2, 3, 4]);
        assert_eq!(evaluation.query().page_window, Some((10, 4)));
    }

    #[test]
    fn test_chained_filter_feedback_covers_whole_chain() {
        let filter1 = Arc::new(
            FilterBuilder::static_filter()
                .handle("Filter1")
                .field("TestClass.FieldA")
                .condition(FilterCondition::Truthy)
                .build()
                .unwrap(),
        );
        let filter2 = FilterBuilder::pagination()
            .handle("Filter2")
            .next(filter1)
            .build(&FilterSettings::default())
            .unwrap();

        let evaluation = filter2.apply_to_query(MockQuery::default());
        assert_eq!(evaluation.feedback().len(), 2);
    }

    #[test]
    fn test_reapplication_is_idempotent() {
        let filter1 = Arc::new(sort_filter(
            "Filter1",
            "TestClass.MadeUpFieldToForceRowSort",
            FilterCondition::SortAsc,
            None,
        ));
        let filter2 = sort_filter(
            "Filter2",
            "TestClass.Id",
            FilterCondition::SortDesc,
            Some(filter1),
        );

        let first = filter2.apply_to_query(MockQuery::with_fields(vec!["TestClass.Id"]));
        let second = filter2.apply_to_query(MockQuery::with_fields(vec!["TestClass.Id"]));

        assert_eq!(first.feedback(), second.feedback());
        assert_eq!(first.row_ops(), second.row_ops());
        assert_eq!(first.options(), second.options());
    }

    #[test]
    fn test_next_is_the_supplied_instance() {
        let inner = Arc::new(sort_filter(
            "Filter1",
            "TestClass.Id",
            FilterCondition::SortAsc,
            None,
        ));
        let outer = sort_filter(
            "Filter2",
            "TestClass.Id",
            FilterCondition::SortAsc,
            Some(inner.clone()),
        );
        // An identically-built filter is an independent node.
        let unchained = sort_filter("Filter2", "TestClass.Id", FilterCondition::SortAsc, None);

        assert!(Arc::ptr_eq(outer.next().unwrap(), &inner));
        assert!(unchained.next().is_none());
    }
}
