//! Table rendering of explorer requests and rows.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Panel, Style, object::Rows},
};

use crate::{
    contract::{ContractRow, ContractStatus},
    query::FetchContractsParams,
};

#[derive(Tabled)]
struct PredicateRow {
    #[tabled(rename = "Column")]
    column: &'static str,
    #[tabled(rename = "Op")]
    op: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl Display for FetchContractsParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let predicates = self.predicates().map(|(op, predicate)| PredicateRow {
            column: predicate.column.db_name(),
            op: op.to_string(),
            value: predicate.value.to_string(),
        });
        let allow_list = self.allow_list().iter().map(|allowed| PredicateRow {
            column: allowed.column.db_name(),
            op: "in".to_string(),
            value: allowed.values.join(", "),
        });

        let order = self
            .order()
            .map(|order| format!("{} {}", order.column, order.direction))
            .unwrap_or_else(|| "-".to_string());
        let pagination = self.pagination();

        let mut table = Table::new(predicates.chain(allow_list));
        table.with(Style::sharp());
        table.with(Panel::footer(format!(
            "Order: {} :: Offset: {} :: Limit: {}",
            order,
            pagination.offset(),
            pagination.limit()
        )));
        table.modify(Rows::last(), Alignment::right());
        write!(f, "{}", table)
    }
}

/// Explorer grid of contract rows as of `now`.
pub struct GridView<'a> {
    rows: &'a [ContractRow],
    now: DateTime<Utc>,
}

impl<'a> GridView<'a> {
    pub fn new(rows: &'a [ContractRow], now: DateTime<Utc>) -> Self { Self { rows, now } }
}

#[derive(Tabled)]
struct GridRow {
    #[tabled(rename = "Instrument")]
    instrument: String,
    #[tabled(rename = "Underlying")]
    underlying: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Strike")]
    strike: String,
    #[tabled(rename = "Expiry")]
    expiry: String,
    #[tabled(rename = "Long funded")]
    buyer_funded: bool,
    #[tabled(rename = "Short funded")]
    seller_funded: bool,
    #[tabled(rename = "Buyer wallet")]
    buyer_wallet: String,
    #[tabled(rename = "Seller wallet")]
    seller_wallet: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl<'a> Display for GridView<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = self.rows.iter().map(|row| {
            let status = row.status(self.now);
            GridRow {
                instrument: format!("{:#}", row.redeem_logic.type_id()),
                underlying: row.rate_title.clone(),
                size: row.size().map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                strike: row.strike().to_string(),
                expiry: row
                    .settle_available_from_at
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                buyer_funded: row.buyer_funded,
                seller_funded: row.seller_funded,
                buyer_wallet: short_key(row.buyer_wallet.as_deref()),
                seller_wallet: short_key(row.seller_wallet.as_deref()),
                status: match status {
                    ContractStatus::WaitingForDeposits => status.label().yellow().to_string(),
                    ContractStatus::Active => status.label().green().to_string(),
                    ContractStatus::Expired => status.label().red().to_string(),
                    ContractStatus::Settled => status.label().blue().to_string(),
                },
            }
        });

        let mut table = Table::new(rows);
        table.with(Style::sharp());
        write!(f, "{}", table)
    }
}

fn short_key(key: Option<&str>) -> String {
    match key {
        Some(key) if key.len() > 10 && key.is_ascii() => {
            format!("{}…{}", &key[..4], &key[key.len() - 4..])
        },
        Some(key) => key.to_string(),
        None => String::new(),
    }
}
