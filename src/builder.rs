//! Fluent filter construction.
//!
//! [`FilterBuilder`] is the entry point; the kind is chosen first and fixes
//! which builder you get. Condition filters (static and the dynamic-*
//! kinds) take a field, condition, and criterion; pagination filters take a
//! page and page size and have no field or condition setters at all, so the
//! "no field on a pagination filter" rule holds at compile time rather than
//! by runtime checks.
//!
//! Validation happens once, at `build()`, and fails with a
//! [`ConfigError`](crate::ConfigError).
//!
//! # Examples
//!
//! ```rust
//! use gridsieve::{FilterBuilder, FilterCondition, FilterKind, FilterSettings};
//!
//! let filter = FilterBuilder::static_filter()
//!     .handle("by-score")
//!     .field("TestClass.FieldFloat")
//!     .condition(FilterCondition::GreaterThan)
//!     .criterion(1.5)
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.kind(), FilterKind::Static);
//! assert_eq!(filter.statements().len(), 1);
//!
//! // Pagination filters default their page size from the settings.
//! let settings = FilterSettings { default_page_size: 20 };
//! let pagination = FilterBuilder::pagination()
//!     .handle("pager")
//!     .build(&settings)
//!     .unwrap();
//! assert_eq!(pagination.statements()[0].criterion().as_u64(), Some(20));
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::filter::{Filter, FilterKind, StatementList};
use crate::statement::{FieldName, FilterCondition, FilterStatement};
use crate::value::FilterValue;
use smallvec::smallvec;
use std::sync::Arc;

/// Configuration the builder consults, passed explicitly rather than read
/// from a process-wide store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSettings {
    /// Page size used when a pagination filter does not set one.
    pub default_page_size: u64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            default_page_size: 25,
        }
    }
}

/// Entry point for building filters. Pick the kind first.
pub struct FilterBuilder;

impl FilterBuilder {
    /// A filter with a fixed field/condition/criterion.
    pub fn static_filter() -> ConditionFilterBuilder {
        ConditionFilterBuilder::new(FilterKind::Static, None)
    }

    /// An equality filter whose criterion arrives per request.
    pub fn dynamic_equal() -> ConditionFilterBuilder {
        ConditionFilterBuilder::new(FilterKind::DynamicEqual, Some(FilterCondition::EqualTo))
    }

    /// A less-than filter whose criterion arrives per request.
    pub fn dynamic_less_than() -> ConditionFilterBuilder {
        ConditionFilterBuilder::new(FilterKind::DynamicLessThan, Some(FilterCondition::LessThan))
    }

    /// A greater-than filter whose criterion arrives per request.
    pub fn dynamic_greater_than() -> ConditionFilterBuilder {
        ConditionFilterBuilder::new(
            FilterKind::DynamicGreaterThan,
            Some(FilterCondition::GreaterThan),
        )
    }

    /// A pagination filter; its single `PaginateBy` statement is
    /// synthesized at build time.
    pub fn pagination() -> PaginationFilterBuilder {
        PaginationFilterBuilder::default()
    }
}

/// Builder for static and dynamic condition filters.
#[derive(Debug)]
pub struct ConditionFilterBuilder {
    kind: FilterKind,
    handle: Option<String>,
    field: Option<FieldName>,
    condition: Option<FilterCondition>,
    criterion: Option<FilterValue>,
    next: Option<Arc<Filter>>,
}

impl ConditionFilterBuilder {
    fn new(kind: FilterKind, condition: Option<FilterCondition>) -> Self {
        Self {
            kind,
            handle: None,
            field: None,
            condition,
            criterion: None,
            next: None,
        }
    }

    /// Set the unique-per-page handle. Required.
    pub fn handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Set the dotted field name. Required.
    pub fn field(mut self, field: impl Into<FieldName>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the condition. Required for static filters; the dynamic kinds
    /// arrive with their condition pre-set.
    pub fn condition(mut self, condition: FilterCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Set the criterion value. Required for the comparison conditions.
    pub fn criterion(mut self, criterion: impl Into<FilterValue>) -> Self {
        self.criterion = Some(criterion.into());
        self
    }

    /// Chain this filter after `next` (applied before this one). Stored
    /// verbatim; cycles are a caller error.
    pub fn next(mut self, next: Arc<Filter>) -> Self {
        self.next = Some(next);
        self
    }

    /// Validate and assemble the filter.
    pub fn build(self) -> ConfigResult<Filter> {
        let handle = match self.handle {
            Some(handle) if !handle.is_empty() => handle,
            _ => return Err(ConfigError::MissingHandle),
        };
        let field = self.field.ok_or_else(|| ConfigError::MissingField {
            handle: handle.clone(),
        })?;
        let condition = self.condition.ok_or_else(|| ConfigError::MissingCondition {
            handle: handle.clone(),
        })?;
        if condition == FilterCondition::PaginateBy {
            return Err(ConfigError::UnsupportedCondition { handle });
        }
        let criterion = match self.criterion {
            Some(criterion) => criterion,
            None if condition.requires_criterion() => {
                return Err(ConfigError::MissingCriterion { handle, condition });
            }
            None => FilterValue::Null,
        };

        let statements: StatementList =
            smallvec![FilterStatement::new(field, condition, criterion, None)];
        Ok(Filter::new(self.kind, handle, statements, self.next))
    }
}

/// Builder for pagination filters.
#[derive(Debug, Default)]
pub struct PaginationFilterBuilder {
    handle: Option<String>,
    page: Option<u64>,
    max_per_page: Option<u64>,
    next: Option<Arc<Filter>>,
}

impl PaginationFilterBuilder {
    /// Set the unique-per-page handle. Required.
    pub fn handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Set the requested page (1-indexed). Defaults to 1.
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size. Defaults to the settings' default page size.
    pub fn max_per_page(mut self, max_per_page: u64) -> Self {
        self.max_per_page = Some(max_per_page);
        self
    }

    /// Chain this filter after `next` (applied before this one). Stored
    /// verbatim; cycles are a caller error.
    pub fn next(mut self, next: Arc<Filter>) -> Self {
        self.next = Some(next);
        self
    }

    /// Validate and assemble the filter, reading the default page size from
    /// `settings` when none was set.
    pub fn build(self, settings: &FilterSettings) -> ConfigResult<Filter> {
        let handle = match self.handle {
            Some(handle) if !handle.is_empty() => handle,
            _ => return Err(ConfigError::MissingHandle),
        };
        let page_size = self.max_per_page.unwrap_or(settings.default_page_size);
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize { page_size });
        }
        let page = self.page.unwrap_or(1);

        let statements: StatementList = smallvec![FilterStatement::new(
            FieldName::default(),
            FilterCondition::PaginateBy,
            FilterValue::from(page_size),
            Some(FilterValue::from(page)),
        )];
        Ok(Filter::new(
            FilterKind::Pagination,
            handle,
            statements,
            self.next,
        ))
    }
}
