use std::num::NonZeroU32;

use anyhow::anyhow;
use otc_explorer_sdk::{
    Cluster,
    explorer::Explorer,
    query::{DEFAULT_LIMIT, DEFAULT_PAGE, GridState, to_filter_model, to_sort_model},
};

pub(crate) fn render(
    cluster: Cluster,
    pathname: &str,
    page: Option<NonZeroU32>,
    limit: Option<NonZeroU32>,
    sort: Option<&str>,
    filter: Option<&str>,
) -> anyhow::Result<()> {
    let mut state =
        GridState::new(page.unwrap_or(DEFAULT_PAGE), limit.unwrap_or(DEFAULT_LIMIT));
    if let Some(raw) = sort {
        let sort = to_sort_model(Some(raw))
            .ok_or_else(|| anyhow!("invalid sort `{}`, expected `<field>:<asc|desc>`", raw))?;
        state = state.with_sort(sort);
    }
    if let Some(raw) = filter {
        let filter = to_filter_model(Some(raw)).ok_or_else(|| {
            anyhow!("invalid filter `{}`, expected `<field>:<operator>:<value>`", raw)
        })?;
        state = state.with_filter(filter);
    }

    println!("{}", Explorer::new(cluster, pathname, state).navigation().url());
    Ok(())
}
