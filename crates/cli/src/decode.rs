use colored::Colorize;
use otc_explorer_sdk::{Cluster, explorer::Explorer};

pub(crate) fn render(cluster: Cluster, pathname: &str, query: &str) {
    let explorer = Explorer::from_query_string(cluster, pathname, query);
    let state = explorer.state();
    let or_none = |value: Option<String>| value.unwrap_or_else(|| "-".dimmed().to_string());

    println!("{}\n", super::banner("Grid State"));
    println!("{:>10}: {}", "Page".bold(), state.page());
    println!("{:>10}: {}", "Limit".bold(), state.limit());
    println!("{:>10}: {}", "Sort".bold(), or_none(state.sort().map(|s| s.to_string())));
    println!("{:>10}: {}", "Filter".bold(), or_none(state.filter().map(|f| f.to_string())));
    if let Some(filter) = state.filter() {
        println!("{:>10}: {:?}", "Value".bold(), filter.value());
    }
    println!("{:>10}: {}", "Canonical".bold(), explorer.navigation().url());
}
