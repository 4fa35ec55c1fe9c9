use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use otc_explorer_sdk::{Cluster, explorer::Explorer, query::FetchContractsParams};

pub(crate) fn render(cluster: Cluster, pathname: &str, query: &str, now: DateTime<Utc>) {
    let explorer = Explorer::from_query_string(cluster, pathname, query);
    let params = FetchContractsParams::not_expired(&cluster, Some(explorer.state()), now);

    println!("{}\n", super::banner("Contracts Request"));
    println!(
        "{} {} {} {}\n",
        "Cluster:".bold(),
        cluster,
        "As of:".bold(),
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    println!("{}", params);
}
