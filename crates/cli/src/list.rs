use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use colored::Colorize;
use otc_explorer_sdk::{
    Cluster, contract::ContractRow, display::GridView, explorer::Explorer, testing::MemorySource,
};

pub(crate) async fn render(
    cluster: Cluster,
    pathname: &str,
    rows: &Path,
    query: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(rows)
        .with_context(|| format!("reading contract rows from {}", rows.display()))?;
    let rows: Vec<ContractRow> =
        serde_json::from_str(&json).context("parsing contract rows")?;
    tracing::debug!(num_rows = rows.len(), "loaded contract rows");
    let source = MemorySource::new(rows);

    let mut explorer = Explorer::from_query_string(cluster, pathname, query);
    explorer.refresh(&source, now).await;

    let state = explorer.state();
    println!("{}\n", super::banner("Contract Explorer"));
    println!("{} {}", "URL:".bold(), explorer.navigation().url());
    println!(
        "{} {} {} {}\n",
        "Page:".bold(),
        state.page(),
        "Rows:".bold(),
        explorer.rows().len()
    );
    if explorer.rows().is_empty() {
        println!("{}", "No contracts".dimmed());
    } else {
        println!("{}", GridView::new(explorer.rows(), now));
    }
    Ok(())
}
