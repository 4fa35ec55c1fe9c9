use std::fmt::Display;

use super::{SEPARATOR, is_valid_field};

/// Sort direction of a grid column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort of the explorer grid. Only one column is sorted at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortModel {
    field: String,
    direction: SortDirection,
}

impl SortModel {
    /// Returns `None` when the field is not a valid identifier.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Option<Self> {
        let field = field.into();
        is_valid_field(&field).then_some(Self { field, direction })
    }

    pub fn field(&self) -> &str { &self.field }

    pub fn direction(&self) -> SortDirection { self.direction }
}

impl Display for SortModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.field, self.direction)
    }
}

/// Decodes the `sort` parameter, `<field>:<asc|desc>`.
pub fn to_sort_model(raw: Option<&str>) -> Option<SortModel> {
    let raw = raw?;
    let model = raw
        .split_once(SEPARATOR)
        .and_then(|(field, direction)| SortModel::new(field, SortDirection::from_name(direction)?));
    if model.is_none() {
        tracing::debug!(sort = raw, "dropping malformed sort");
    }
    model
}

/// Encodes the `sort` parameter, `None` when unsorted.
pub fn from_sort_model(model: Option<&SortModel>) -> Option<String> {
    model.map(SortModel::to_string)
}
