pub mod args;
mod decode;
mod encode;
mod list;
mod request;

use args::{Cli, Commands};
use chrono::Utc;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!(cluster = %cli.cluster, pathname = %cli.pathname, "starting");

    match cli.command {
        Commands::Encode { page, limit, sort, filter } => encode::render(
            cli.cluster,
            &cli.pathname,
            page,
            limit,
            sort.as_deref(),
            filter.as_deref(),
        )?,
        Commands::Decode { query } => decode::render(cli.cluster, &cli.pathname, &query),
        Commands::Request { query, now } => request::render(
            cli.cluster,
            &cli.pathname,
            query.as_deref().unwrap_or_default(),
            now.unwrap_or_else(Utc::now),
        ),
        Commands::List { rows, query, now } => {
            list::render(
                cli.cluster,
                &cli.pathname,
                &rows,
                query.as_deref().unwrap_or_default(),
                now.unwrap_or_else(Utc::now),
            )
            .await?
        },
    }

    Ok(())
}

fn banner(title: &str) -> String {
    use colored::Colorize;
    format!("{:#^96}", format!(" {} ", title)).bold().purple().to_string()
}
