//! Filter statements: one field, one condition, one criterion.
//!
//! A [`FilterStatement`] is the immutable unit of filtering. It names a
//! field (dotted `"Entity.Field"` form, opaque to this crate), a
//! [`FilterCondition`], a criterion value, and an optional control value
//! that only the `PaginateBy` condition uses (the requested page number).
//!
//! Statements carry no behavior beyond accessors and are never validated
//! here; the builder is responsible for rejecting nonsensical combinations.
//!
//! # Examples
//!
//! ```rust
//! use gridsieve::{FilterCondition, FilterStatement, FilterValue};
//!
//! let stmt = FilterStatement::new(
//!     "TestClass.FieldFloat",
//!     FilterCondition::LessThan,
//!     FilterValue::Float(2.5),
//!     None,
//! );
//! assert_eq!(stmt.field().as_str(), "TestClass.FieldFloat");
//! assert_eq!(stmt.condition(), FilterCondition::LessThan);
//! ```

use crate::value::FilterValue;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

// ==============================================================================
// Field names
// ==============================================================================

/// A dotted `"Entity.Field"` identifier, optimized for small strings.
///
/// Stored inline via `SmolStr` for typical field-name lengths. The dotted
/// form is opaque to the engine; it is interpreted by the query target and
/// by the row-value source.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(SmolStr);

impl FieldName {
    /// Create a new field name from any string-like type.
    #[inline]
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(SmolStr::new(s.as_ref()))
    }

    /// Create from a static string (zero allocation).
    #[inline]
    pub const fn from_static(s: &'static str) -> Self {
        Self(SmolStr::new_static(s))
    }

    /// Get the field name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The entity part of a dotted name, or the whole name when undotted.
    pub fn entity(&self) -> &str {
        match self.0.split_once('.') {
            Some((entity, _)) => entity,
            None => self.0.as_str(),
        }
    }

    /// The field part of a dotted name, or the whole name when undotted.
    pub fn field(&self) -> &str {
        match self.0.split_once('.') {
            Some((_, field)) => field,
            None => self.0.as_str(),
        }
    }

    /// Check if the field name is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldName({:?})", self.0.as_str())
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FieldName {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldName {
    #[inline]
    fn from(s: String) -> Self {
        Self(SmolStr::new(&s))
    }
}

impl AsRef<str> for FieldName {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// ==============================================================================
// Conditions
// ==============================================================================

/// Sort direction for ordering statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9, oldest first).
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

impl SortOrder {
    /// The conventional keyword for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Asc
    }
}

/// The condition a statement applies to its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterCondition {
    /// Sort ascending on the field.
    SortAsc,
    /// Sort descending on the field.
    SortDesc,
    /// Keep rows where the field is less than the criterion.
    LessThan,
    /// Keep rows where the field is greater than the criterion.
    GreaterThan,
    /// Keep rows where the field equals the criterion.
    EqualTo,
    /// Keep rows where the field does not equal the criterion.
    NotEqualTo,
    /// Paginate: criterion is the page size, control the requested page.
    PaginateBy,
    /// Keep rows where the field is truthy.
    Truthy,
    /// Keep rows where the field is falsey.
    Falsey,
}

impl FilterCondition {
    /// Whether this condition needs a criterion value at build time.
    ///
    /// Sorts and truthiness checks carry no criterion; the four comparisons
    /// do. `PaginateBy` synthesizes its own criterion (the page size).
    pub fn requires_criterion(&self) -> bool {
        matches!(
            self,
            Self::LessThan | Self::GreaterThan | Self::EqualTo | Self::NotEqualTo
        )
    }

    /// The sort direction, for the two ordering conditions.
    pub fn sort_order(&self) -> Option<SortOrder> {
        match self {
            Self::SortAsc => Some(SortOrder::Asc),
            Self::SortDesc => Some(SortOrder::Desc),
            _ => None,
        }
    }

    /// Whether this condition is a per-row predicate in row mode.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            Self::LessThan
                | Self::GreaterThan
                | Self::EqualTo
                | Self::NotEqualTo
                | Self::Truthy
                | Self::Falsey
        )
    }
}

// ==============================================================================
// Statements
// ==============================================================================

/// One immutable filter condition over one field.
///
/// The only way to change a statement is to construct a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterStatement {
    field: FieldName,
    condition: FilterCondition,
    criterion: FilterValue,
    control: Option<FilterValue>,
}

impl FilterStatement {
    /// Create a new statement. No validation is performed here.
    pub fn new(
        field: impl Into<FieldName>,
        condition: FilterCondition,
        criterion: FilterValue,
        control: Option<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            condition,
            criterion,
            control,
        }
    }

    /// The field this statement applies to.
    pub fn field(&self) -> &FieldName {
        &self.field
    }

    /// The condition kind.
    pub fn condition(&self) -> FilterCondition {
        self.condition
    }

    /// The comparison value, or the page size for `PaginateBy`.
    pub fn criterion(&self) -> &FilterValue {
        &self.criterion
    }

    /// The auxiliary control value (the requested page for `PaginateBy`).
    pub fn control(&self) -> Option<&FilterValue> {
        self.control.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_accessors() {
        let stmt = FilterStatement::new(
            "TestClass.Id",
            FilterCondition::EqualTo,
            FilterValue::Int(7),
            None,
        );
        assert_eq!(stmt.field().as_str(), "TestClass.Id");
        assert_eq!(stmt.condition(), FilterCondition::EqualTo);
        assert_eq!(stmt.criterion(), &FilterValue::Int(7));
        assert_eq!(stmt.control(), None);
    }

    #[test]
    fn test_statement_value_equality() {
        let a = FilterStatement::new(
            "TestClass.Id",
            FilterCondition::SortAsc,
            FilterValue::Null,
            None,
        );
        let b = FilterStatement::new(
            "TestClass.Id",
            FilterCondition::SortAsc,
            FilterValue::Null,
            None,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_field_name_split() {
        let field = FieldName::new("TestClass.FieldFloat");
        assert_eq!(field.entity(), "TestClass");
        assert_eq!(field.field(), "FieldFloat");

        let bare = FieldName::new("FieldFloat");
        assert_eq!(bare.entity(), "FieldFloat");
        assert_eq!(bare.field(), "FieldFloat");
    }

    #[test]
    fn test_criterion_requirements() {
        assert!(FilterCondition::LessThan.requires_criterion());
        assert!(FilterCondition::NotEqualTo.requires_criterion());
        assert!(!FilterCondition::SortAsc.requires_criterion());
        assert!(!FilterCondition::Truthy.requires_criterion());
        assert!(!FilterCondition::PaginateBy.requires_criterion());
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(FilterCondition::SortAsc.sort_order(), Some(SortOrder::Asc));
        assert_eq!(FilterCondition::SortDesc.sort_order(), Some(SortOrder::Desc));
        assert_eq!(FilterCondition::EqualTo.sort_order(), None);
        assert_eq!(SortOrder::Desc.as_str(), "DESC");
    }
}
