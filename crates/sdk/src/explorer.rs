use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::{
    Cluster,
    contract::ContractRow,
    error::ExplorerError,
    query::{FetchContractsParams, FilterModel, GridState, QueryParams, SortModel},
    source::ContractSource,
};

/// Address bar update to push after a grid mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub pathname: String,
    pub query: QueryParams,
}

impl Navigation {
    /// Relative URL, without `?` when the query is empty.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.pathname.clone()
        } else {
            format!("{}?{}", self.pathname, self.query)
        }
    }
}

/// Fetch issued by [`Explorer::begin_fetch`].
///
/// Cancelled as soon as a newer fetch is issued; its outcome is then ignored
/// by [`Explorer::complete_fetch`] even if it arrives.
#[derive(Debug)]
pub struct FetchTicket {
    generation: u64,
    params: FetchContractsParams,
    token: CancellationToken,
}

/// Result of a [`FetchTicket`].
#[derive(Debug)]
pub struct FetchOutcome {
    generation: u64,
    result: Result<Vec<ContractRow>, ExplorerError>,
}

impl FetchTicket {
    pub fn params(&self) -> &FetchContractsParams { &self.params }

    pub fn is_cancelled(&self) -> bool { self.token.is_cancelled() }

    /// Executes the fetch unless superseded first.
    pub async fn run<S: ContractSource>(self, source: &S) -> FetchOutcome {
        let result = self
            .token
            .run_until_cancelled(source.fetch_contracts(&self.params))
            .await
            .unwrap_or(Err(ExplorerError::Cancelled));
        FetchOutcome { generation: self.generation, result }
    }
}

impl FetchOutcome {
    pub fn result(&self) -> &Result<Vec<ContractRow>, ExplorerError> { &self.result }
}

/// State of the contract explorer page.
///
/// Owns the grid state and the currently displayed rows. Grid mutations
/// return the [`Navigation`] reflecting the new state, or `None` when the
/// state did not change and the URL must stay as is.
#[derive(Debug)]
pub struct Explorer {
    cluster: Cluster,
    pathname: String,
    state: GridState,
    rows: Vec<ContractRow>,
    loading: bool,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl Explorer {
    pub fn new(cluster: Cluster, pathname: impl Into<String>, state: GridState) -> Self {
        Self {
            cluster,
            pathname: pathname.into(),
            state,
            rows: Vec::new(),
            loading: false,
            generation: 0,
            in_flight: None,
        }
    }

    /// Restores the page from the address bar query string.
    pub fn from_query_string(cluster: Cluster, pathname: impl Into<String>, query: &str) -> Self {
        let state = GridState::from_query_params(&QueryParams::from_query_string(query));
        Self::new(cluster, pathname, state)
    }

    pub fn cluster(&self) -> Cluster { self.cluster }

    pub fn state(&self) -> &GridState { &self.state }

    pub fn rows(&self) -> &[ContractRow] { &self.rows }

    pub fn is_loading(&self) -> bool { self.loading }

    /// Current location of the page.
    pub fn navigation(&self) -> Navigation {
        Navigation { pathname: self.pathname.clone(), query: self.state.to_query_params() }
    }

    pub fn change_page(&mut self, page: NonZeroU32) -> Option<Navigation> {
        let changed = self.state.set_page(page);
        self.navigate_if(changed)
    }

    pub fn change_limit(&mut self, limit: NonZeroU32) -> Option<Navigation> {
        let changed = self.state.set_limit(limit);
        self.navigate_if(changed)
    }

    pub fn change_sort(&mut self, sort: Option<SortModel>) -> Option<Navigation> {
        let changed = self.state.set_sort(sort);
        self.navigate_if(changed)
    }

    pub fn change_filter(&mut self, filter: Option<FilterModel>) -> Option<Navigation> {
        let changed = self.state.set_filter(filter);
        self.navigate_if(changed)
    }

    fn navigate_if(&self, changed: bool) -> Option<Navigation> { changed.then(|| self.navigation()) }

    /// Starts a fetch of the current page, superseding any fetch in flight.
    pub fn begin_fetch(&mut self, now: DateTime<Utc>) -> FetchTicket {
        if let Some(previous) = self.in_flight.take() {
            tracing::debug!(generation = self.generation, "superseding in-flight fetch");
            previous.cancel();
        }
        self.generation += 1;
        self.loading = true;
        self.rows.clear();

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        FetchTicket {
            generation: self.generation,
            params: FetchContractsParams::not_expired(&self.cluster, Some(&self.state), now),
            token,
        }
    }

    /// Applies the outcome of the latest fetch. Returns `false` and leaves the
    /// page untouched if the outcome belongs to a superseded fetch.
    ///
    /// A failed fetch leaves the page with no rows.
    pub fn complete_fetch(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                generation = outcome.generation,
                current = self.generation,
                "discarding superseded fetch"
            );
            return false;
        }
        self.in_flight = None;
        self.loading = false;
        match outcome.result {
            Ok(rows) => self.rows = rows,
            Err(err) => {
                tracing::warn!(%err, "fetching contracts failed");
                self.rows.clear();
            },
        }
        true
    }

    /// Fetches the current page and applies the result.
    pub async fn refresh<S: ContractSource>(&mut self, source: &S, now: DateTime<Utc>) {
        let outcome = self.begin_fetch(now).run(source).await;
        self.complete_fetch(outcome);
    }
}
