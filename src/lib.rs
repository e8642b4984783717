//! # gridsieve
//!
//! Filter chain and query-pushdown engine for tabular record collections.
//!
//! A caller declares an ordered chain of filters — sorts, comparisons,
//! truthiness checks, pagination — over a record collection backed by some
//! query object. The engine decides, for the chain as a whole, whether the
//! work can be rewritten into the backing query (*pushdown*) or must be
//! evaluated against already-materialized rows (*row mode*). The rule is
//! all-or-nothing from the first failure onward: one statement the query
//! cannot serve forces every statement at and after it into row mode, so
//! that query-level and row-level ordering never interleave into an
//! inconsistent result.
//!
//! ## Building filters
//!
//! ```rust
//! use std::sync::Arc;
//! use gridsieve::{FilterBuilder, FilterCondition, FilterSettings};
//!
//! // Applied first: primary sort key.
//! let by_id = Arc::new(
//!     FilterBuilder::static_filter()
//!         .handle("by-id")
//!         .field("TestClass.Id")
//!         .condition(FilterCondition::SortAsc)
//!         .build()
//!         .unwrap(),
//! );
//!
//! // Applied on top, with pagination chained after the sort.
//! let chain = FilterBuilder::pagination()
//!     .handle("pager")
//!     .max_per_page(15)
//!     .next(by_id)
//!     .build(&FilterSettings::default())
//!     .unwrap();
//!
//! assert_eq!(chain.handle(), "pager");
//! ```
//!
//! ## Applying a chain
//!
//! [`Filter::apply_to_query`] consumes a [`QueryTarget`], pushes down what
//! it can, and returns a [`ChainEvaluation`]: the mutated query, a
//! per-statement feedback list saying which strategy served each statement,
//! the deferred row operations, and the selectable page numbers. After
//! executing the query, hand the deferred operations and the materialized
//! rows to [`row::filter_rows`].
//!
//! ## Pagination arithmetic
//!
//! ```rust
//! use gridsieve::pagination::page_options;
//!
//! assert_eq!(page_options(200, 15).len(), 14);
//! assert!(page_options(0, 15).is_empty());
//! ```

pub mod builder;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pagination;
pub mod query;
pub mod row;
pub mod statement;
pub mod value;

pub use builder::{ConditionFilterBuilder, FilterBuilder, FilterSettings, PaginationFilterBuilder};
pub use error::{ConfigError, ConfigResult};
pub use filter::{ChainEvaluation, FeedbackEntry, FeedbackList, Filter, FilterKind, StatementList};
pub use query::{QueryTarget, RowValues};
pub use row::{RowsOutcome, filter_rows};
pub use statement::{FieldName, FilterCondition, FilterStatement, SortOrder};
pub use value::FilterValue;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::{FilterBuilder, FilterSettings};
    pub use crate::error::{ConfigError, ConfigResult};
    pub use crate::filter::{ChainEvaluation, FeedbackEntry, Filter, FilterKind};
    pub use crate::query::{QueryTarget, RowValues};
    pub use crate::row::filter_rows;
    pub use crate::statement::{FieldName, FilterCondition, FilterStatement, SortOrder};
    pub use crate::value::FilterValue;
}
