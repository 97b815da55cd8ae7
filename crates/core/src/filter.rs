//! Builder for the record store's `where` expression language.
//!
//! A condition renders as `(field,op,value)`. Conditions inside a group are
//! joined with `~or`; groups are joined with `~and`:
//!
//! ```text
//! (name,like,%hue%)~and(marker,eq,true)
//! (orderCode,like,%42%)~or(fullName,like,%42%)~and(status,eq,PAID)
//! ```
//!
//! The store applies no grouping beyond this flat form, so the builder emits
//! exactly that shape.

use std::fmt;

/// Characters with structural meaning in the expression language.
const RESERVED: &[char] = &['(', ')', ',', '~'];

/// Comparison operator of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Exact match.
    Eq,
    /// Substring match; the value is wrapped as `%value%`.
    Like,
}

impl FilterOp {
    fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Like => "like",
        }
    }
}

/// A single `(field,op,value)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    field: String,
    op: FilterOp,
    value: String,
}

impl Condition {
    pub fn eq(field: impl Into<String>, value: impl AsRef<str>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    pub fn like(field: impl Into<String>, value: impl AsRef<str>) -> Self {
        Self::new(field, FilterOp::Like, value)
    }

    fn new(field: impl Into<String>, op: FilterOp, value: impl AsRef<str>) -> Self {
        Self {
            field: field.into(),
            op,
            value: sanitize_value(value.as_ref()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            FilterOp::Eq => write!(f, "({},{},{})", self.field, self.op.as_str(), self.value),
            FilterOp::Like => write!(f, "({},{},%{}%)", self.field, self.op.as_str(), self.value),
        }
    }
}

/// Strip characters that would let user input alter the expression.
fn sanitize_value(value: &str) -> String {
    value.chars().filter(|c| !RESERVED.contains(c)).collect()
}

/// A conjunction of condition groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    groups: Vec<Vec<Condition>>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition that must hold.
    pub fn and(mut self, condition: Condition) -> Self {
        self.groups.push(vec![condition]);
        self
    }

    /// Add a group where any one condition must hold. Empty groups are ignored.
    pub fn and_any(mut self, conditions: Vec<Condition>) -> Self {
        if !conditions.is_empty() {
            self.groups.push(conditions);
        }
        self
    }

    /// Add a condition only when `value` is non-empty.
    pub fn and_if_present(
        self,
        value: &str,
        build: impl FnOnce(&str) -> Condition,
    ) -> Self {
        if value.is_empty() {
            self
        } else {
            self.and(build(value))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Render the expression, or `None` when it has no conditions.
    pub fn build(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let rendered = self
            .groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(Condition::to_string)
                    .collect::<Vec<_>>()
                    .join("~or")
            })
            .collect::<Vec<_>>()
            .join("~and");
        Some(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wraps_value_in_percent() {
        assert_eq!(Condition::like("name", "hue").to_string(), "(name,like,%hue%)");
    }

    #[test]
    fn eq_renders_exact_value() {
        assert_eq!(Condition::eq("marker", "true").to_string(), "(marker,eq,true)");
    }

    #[test]
    fn empty_filter_builds_nothing() {
        assert_eq!(Filter::new().build(), None);
        assert_eq!(Filter::new().and_any(vec![]).build(), None);
    }

    #[test]
    fn groups_join_with_and_and_members_with_or() {
        let filter = Filter::new()
            .and_any(vec![
                Condition::like("orderCode", "42"),
                Condition::like("fullName", "42"),
            ])
            .and(Condition::eq("status", "PAID"));
        assert_eq!(
            filter.build().as_deref(),
            Some("(orderCode,like,%42%)~or(fullName,like,%42%)~and(status,eq,PAID)")
        );
    }

    #[test]
    fn and_if_present_skips_empty_values() {
        let filter = Filter::new()
            .and_if_present("", |v| Condition::like("name", v))
            .and_if_present("temple", |v| Condition::like("types", v));
        assert_eq!(filter.build().as_deref(), Some("(types,like,%temple%)"));
    }

    #[test]
    fn reserved_characters_are_stripped_from_values() {
        let cond = Condition::like("name", "x)~or(password,like,a");
        assert_eq!(cond.to_string(), "(name,like,%xorpasswordlikea%)");
    }
}
