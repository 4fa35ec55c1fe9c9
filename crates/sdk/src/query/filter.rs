use std::fmt::Display;

use fastnum::D64;

use super::{SEPARATOR, is_valid_field};

/// Comparison applied by a column filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Case-insensitive substring match on text columns.
    Contains,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 6] = [
        FilterOperator::Eq,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Contains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Contains => "contains",
        }
    }

    /// Operator by its URL name, `None` for anything outside the vocabulary.
    pub fn from_name(name: &str) -> Option<Self> {
        FilterOperator::ALL.into_iter().find(|op| op.as_str() == name)
    }
}

impl Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value a column is compared against.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Bool(bool),
    Number(D64),
    Text(String),
}

impl FilterValue {
    /// Classifies raw URL text: exactly `true`/`false` is a boolean, a finite
    /// decimal written in canonical form is a number, anything else stays
    /// text. `007`, `+5` or `1e3` are text, so what the user typed is never
    /// rewritten; [`super::PredicateValue::for_column`] coerces them for
    /// numeric columns.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => FilterValue::Bool(true),
            "false" => FilterValue::Bool(false),
            _ => match raw.parse::<D64>() {
                Ok(number) if number.is_finite() && number.to_string() == raw => {
                    FilterValue::Number(number)
                },
                _ => FilterValue::Text(raw.to_string()),
            },
        }
    }

    /// Reclassifies the value by its URL rendering, so it survives a trip
    /// through the URL unchanged.
    fn normalized(self) -> Self {
        match self {
            FilterValue::Bool(_) => self,
            other => FilterValue::parse(&other.to_string()),
        }
    }

    fn is_empty(&self) -> bool { matches!(self, FilterValue::Text(text) if text.is_empty()) }
}

impl Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Bool(value) => write!(f, "{}", value),
            FilterValue::Number(value) => write!(f, "{}", value),
            FilterValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self { FilterValue::Bool(value) }
}

impl From<D64> for FilterValue {
    fn from(value: D64) -> Self { FilterValue::Number(value) }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self { FilterValue::parse(value) }
}

/// Single-column filter of the explorer grid.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterModel {
    field: String,
    operator: FilterOperator,
    value: FilterValue,
}

impl FilterModel {
    /// Returns `None` when the field is not a valid identifier or the value
    /// is empty text.
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Option<Self> {
        let field = field.into();
        let value = value.normalized();
        if !is_valid_field(&field) || value.is_empty() {
            return None;
        }
        Some(Self { field, operator, value })
    }

    pub fn field(&self) -> &str { &self.field }

    pub fn operator(&self) -> FilterOperator { self.operator }

    pub fn value(&self) -> &FilterValue { &self.value }
}

impl Display for FilterModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{SEPARATOR}{}{SEPARATOR}{}", self.field, self.operator, self.value)
    }
}

/// Decodes the `filter` parameter, `<field>:<operator>:<value>`.
///
/// The value is everything after the second separator and may itself contain
/// separators. Malformed input yields `None`.
pub fn to_filter_model(raw: Option<&str>) -> Option<FilterModel> {
    let raw = raw?;
    let mut parts = raw.splitn(3, SEPARATOR);
    let (Some(field), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!(filter = raw, "dropping malformed filter");
        return None;
    };
    let Some(operator) = FilterOperator::from_name(operator) else {
        tracing::debug!(filter = raw, operator, "dropping filter with unknown operator");
        return None;
    };
    let model = FilterModel::new(field, operator, FilterValue::parse(value));
    if model.is_none() {
        tracing::debug!(filter = raw, "dropping filter with invalid field or empty value");
    }
    model
}

/// Encodes the `filter` parameter, `None` when there is no filter.
pub fn from_filter_model(model: Option<&FilterModel>) -> Option<String> {
    model.map(FilterModel::to_string)
}
