use std::num::NonZeroU32;

use super::{
    DEFAULT_LIMIT, DEFAULT_PAGE, FilterModel, Pagination, ParamComponents, QueryParams, SortModel,
    clean_params, to_filter_model, to_sort_model, transform_params,
};

/// Filter, sort and pagination state of the explorer grid.
///
/// Mutations report whether anything changed, so re-applying the current
/// sort or filter (e.g. closing an editor panel untouched) leaves the URL
/// alone. Changing the page size, the sort or the filter restarts from the
/// first page.
#[derive(Clone, Debug, PartialEq)]
pub struct GridState {
    page: NonZeroU32,
    limit: NonZeroU32,
    sort: Option<SortModel>,
    filter: Option<FilterModel>,
}

impl Default for GridState {
    fn default() -> Self { Self::new(DEFAULT_PAGE, DEFAULT_LIMIT) }
}

impl GridState {
    pub fn new(page: NonZeroU32, limit: NonZeroU32) -> Self {
        Self { page, limit, sort: None, filter: None }
    }

    pub fn with_sort(mut self, sort: SortModel) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_filter(mut self, filter: FilterModel) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Restores grid state from the URL. Missing, zero or non-numeric page
    /// and limit fall back to their defaults, malformed sort and filter to
    /// none.
    pub fn from_query_params(params: &QueryParams) -> Self {
        let parse = |value: &Option<String>| value.as_deref()?.parse::<NonZeroU32>().ok();
        Self {
            page: parse(&params.page).unwrap_or(DEFAULT_PAGE),
            limit: parse(&params.limit).unwrap_or(DEFAULT_LIMIT),
            sort: to_sort_model(params.sort.as_deref()),
            filter: to_filter_model(params.filter.as_deref()),
        }
    }

    /// Canonical query parameters of the state, with defaults omitted.
    pub fn to_query_params(&self) -> QueryParams { clean_params(transform_params(&self.components())) }

    pub fn components(&self) -> ParamComponents {
        ParamComponents {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            page: Some(self.page),
            limit: Some(self.limit),
        }
    }

    /// Current page, 1-indexed.
    pub fn page(&self) -> NonZeroU32 { self.page }

    pub fn limit(&self) -> NonZeroU32 { self.limit }

    pub fn sort(&self) -> Option<&SortModel> { self.sort.as_ref() }

    pub fn filter(&self) -> Option<&FilterModel> { self.filter.as_ref() }

    /// Server-side window of the current page.
    pub fn pagination(&self) -> Pagination { Pagination::from_page(self.page, self.limit) }

    pub fn set_page(&mut self, page: NonZeroU32) -> bool {
        if self.page == page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn set_limit(&mut self, limit: NonZeroU32) -> bool {
        if self.limit == limit {
            return false;
        }
        self.limit = limit;
        self.page = DEFAULT_PAGE;
        true
    }

    /// Replaces the sort column; `None` clears sorting.
    pub fn set_sort(&mut self, sort: Option<SortModel>) -> bool {
        if self.sort == sort {
            return false;
        }
        self.sort = sort;
        self.page = DEFAULT_PAGE;
        true
    }

    /// Replaces the filter; `None` clears filtering.
    pub fn set_filter(&mut self, filter: Option<FilterModel>) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        self.page = DEFAULT_PAGE;
        true
    }
}
