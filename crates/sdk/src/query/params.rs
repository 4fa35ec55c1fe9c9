use std::{fmt::Display, num::NonZeroU32};

use url::form_urlencoded;

use super::{
    DEFAULT_LIMIT, DEFAULT_PAGE, FilterModel, SortModel, from_filter_model, from_sort_model,
    to_filter_model, to_sort_model,
};

pub const PAGE_KEY: &str = "page";
pub const LIMIT_KEY: &str = "limit";
pub const SORT_KEY: &str = "sort";
pub const FILTER_KEY: &str = "filter";

/// Flat, URL-encodable projection of the grid state.
///
/// Values are kept as raw strings exactly as they appear in (or will be
/// written to) the address bar; [`super::GridState::from_query_params`]
/// interprets them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub filter: Option<String>,
}

impl QueryParams {
    pub fn is_empty(&self) -> bool { self.iter().next().is_none() }

    /// Present parameters in their canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (PAGE_KEY, &self.page),
            (LIMIT_KEY, &self.limit),
            (SORT_KEY, &self.sort),
            (FILTER_KEY, &self.filter),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|value| (key, value)))
    }

    /// Renders `application/x-www-form-urlencoded` query string, without the
    /// leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Parses a query string, with or without the leading `?`.
    ///
    /// Unknown keys are ignored and only the first occurrence of a key is kept.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = QueryParams::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                PAGE_KEY => &mut params.page,
                LIMIT_KEY => &mut params.limit,
                SORT_KEY => &mut params.sort,
                FILTER_KEY => &mut params.filter,
                _ => {
                    tracing::trace!(%key, "ignoring unknown query parameter");
                    continue;
                },
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

impl Display for QueryParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}

/// Independent pieces of grid state to merge into [`QueryParams`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamComponents {
    pub filter: Option<FilterModel>,
    pub sort: Option<SortModel>,
    pub page: Option<NonZeroU32>,
    pub limit: Option<NonZeroU32>,
}

/// Merges the components into query parameters. Absent components are
/// omitted, never replaced by placeholders.
pub fn transform_params(components: &ParamComponents) -> QueryParams {
    QueryParams {
        page: components.page.map(|page| page.to_string()),
        limit: components.limit.map(|limit| limit.to_string()),
        sort: from_sort_model(components.sort.as_ref()),
        filter: from_filter_model(components.filter.as_ref()),
    }
}

/// Strips values the decoder would ignore and values equal to their
/// defaults, so the default view has an empty query string.
pub fn clean_params(params: QueryParams) -> QueryParams {
    let keep = |value: &String, default: NonZeroU32| {
        value.parse::<NonZeroU32>().is_ok_and(|value| value != default)
    };
    QueryParams {
        page: params.page.filter(|page| keep(page, DEFAULT_PAGE)),
        limit: params.limit.filter(|limit| keep(limit, DEFAULT_LIMIT)),
        sort: params.sort.filter(|sort| to_sort_model(Some(sort)).is_some()),
        filter: params.filter.filter(|filter| to_filter_model(Some(filter)).is_some()),
    }
}
