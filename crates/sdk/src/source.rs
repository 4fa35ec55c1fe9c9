use std::future::Future;

use crate::{contract::ContractRow, error::ExplorerError, query::FetchContractsParams};

/// Backend executing contract queries, e.g. the hosted contracts database.
///
/// Implementations must apply every predicate of the request, including the
/// plugin allow-list, and return rows in the requested order and window.
pub trait ContractSource {
    fn fetch_contracts(
        &self,
        params: &FetchContractsParams,
    ) -> impl Future<Output = Result<Vec<ContractRow>, ExplorerError>> + Send;
}
