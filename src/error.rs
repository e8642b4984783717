//! Build-time configuration errors.
//!
//! Only the builder can fail, and only synchronously at `build()`. Pushdown
//! capability gaps at evaluation time are deliberately not errors: a field
//! the query cannot serve (a computed field, say) is a normal occurrence
//! and silently switches the chain to row mode.
//!
//! # Examples
//!
//! ```rust
//! use gridsieve::{ConfigError, FilterBuilder, FilterSettings};
//!
//! let err = FilterBuilder::pagination()
//!     .build(&FilterSettings::default())
//!     .unwrap_err();
//! assert_eq!(err, ConfigError::MissingHandle);
//! assert!(err.to_string().contains("handle"));
//! ```

use crate::statement::FilterCondition;
use thiserror::Error;

/// Result type for filter construction.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A filter was misconfigured at build time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No handle was supplied before `build()`.
    #[error("you must set a handle before build(); every filter needs a unique per-page handle")]
    MissingHandle,

    /// A condition filter was built without a field name.
    #[error("filter `{handle}` requires a field name; call field(..) before build()")]
    MissingField {
        /// Handle of the offending filter.
        handle: String,
    },

    /// A static filter was built without a condition.
    #[error("filter `{handle}` requires a condition; call condition(..) before build()")]
    MissingCondition {
        /// Handle of the offending filter.
        handle: String,
    },

    /// A comparison condition was built without a criterion value.
    #[error("condition {condition:?} on filter `{handle}` requires a criterion value")]
    MissingCriterion {
        /// Handle of the offending filter.
        handle: String,
        /// The condition that needed a criterion.
        condition: FilterCondition,
    },

    /// `PaginateBy` was set on a condition filter.
    #[error("filter `{handle}`: PaginateBy is synthesized by FilterBuilder::pagination(), not set directly")]
    UnsupportedCondition {
        /// Handle of the offending filter.
        handle: String,
    },

    /// A pagination filter was given a zero page size.
    #[error("page size must be at least 1, got {page_size}")]
    InvalidPageSize {
        /// The rejected page size.
        page_size: u64,
    },
}
