use std::num::NonZeroU32;

use chrono::{DateTime, Duration, TimeZone, Utc};
use fastnum::{D64, dec64};
use otc_explorer_sdk::{
    Cluster,
    error::ExplorerError,
    explorer::Explorer,
    plugin::RatePlugin,
    query::{FilterModel, FilterOperator, FilterValue, SortDirection, SortModel},
    testing::{ContractBuilder, FailingSource, MemorySource},
};
use pretty_assertions::assert_eq;

fn nz(n: u32) -> NonZeroU32 { NonZeroU32::new(n).expect("test value must be non-zero") }

fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() }

/// Twelve live devnet contracts with strikes 1910..=2020, plus an expired
/// devnet contract and a live mainnet one.
fn source() -> MemorySource {
    let mut rows: Vec<_> = (1..=12)
        .map(|i| {
            let strike: D64 = format!("{}", 1900 + 10 * i).parse().unwrap();
            let builder = ContractBuilder::new(format!("contract-{:02}", i), now() + Duration::days(i))
                .forward(strike, dec64!(1));
            if i % 3 == 0 { builder.buyer(format!("buyer-{}", i)).build() } else { builder.build() }
        })
        .collect();
    rows.push(ContractBuilder::new("expired", now() - Duration::days(1)).build());
    rows.push(
        ContractBuilder::new("mainnet", now() + Duration::days(1))
            .cluster(Cluster::MainnetBeta)
            .build(),
    );
    MemorySource::new(rows)
}

fn keys(explorer: &Explorer) -> Vec<&str> {
    explorer.rows().iter().map(|r| r.publickey.as_str()).collect()
}

/// Tests restoring the page from a URL, fetching and paginating.
#[tokio::test]
async fn test_explorer_pagination() {
    let source = source();
    let mut explorer = Explorer::from_query_string(
        Cluster::Devnet,
        "/explorer",
        "?limit=5&sort=redeemLogicState.strike%3Adesc",
    );

    explorer.refresh(&source, now()).await;
    assert!(!explorer.is_loading());
    assert_eq!(
        keys(&explorer),
        vec!["contract-12", "contract-11", "contract-10", "contract-09", "contract-08"]
    );

    let nav = explorer.change_page(nz(3)).unwrap();
    assert_eq!(nav.url(), "/explorer?page=3&limit=5&sort=redeemLogicState.strike%3Adesc");

    explorer.refresh(&source, now()).await;
    assert_eq!(keys(&explorer), vec!["contract-02", "contract-01"]);

    // Page size change restarts from the first page
    let nav = explorer.change_limit(nz(10)).unwrap();
    assert_eq!(nav.url(), "/explorer?limit=10&sort=redeemLogicState.strike%3Adesc");
    explorer.refresh(&source, now()).await;
    assert_eq!(explorer.rows().len(), 10);
    assert_eq!(explorer.rows()[0].publickey, "contract-12");
}

/// Tests filtering and that expired and other-cluster contracts never show.
#[tokio::test]
async fn test_explorer_filter() {
    let source = source();
    let mut explorer = Explorer::from_query_string(Cluster::Devnet, "/explorer", "");
    assert_eq!(explorer.navigation().url(), "/explorer");

    explorer.refresh(&source, now()).await;
    assert_eq!(explorer.rows().len(), 12);
    assert!(!keys(&explorer).contains(&"expired"));
    assert!(!keys(&explorer).contains(&"mainnet"));

    let filter = FilterModel::new("buyerFunded", FilterOperator::Eq, FilterValue::Bool(true));
    let nav = explorer.change_filter(filter.clone()).unwrap();
    assert_eq!(nav.url(), "/explorer?filter=buyerFunded%3Aeq%3Atrue");
    explorer.refresh(&source, now()).await;
    assert_eq!(keys(&explorer), vec!["contract-03", "contract-06", "contract-09", "contract-12"]);

    // Closing the filter panel untouched does not navigate
    assert_eq!(explorer.change_filter(filter), None);

    let nav = explorer
        .change_filter(FilterModel::new(
            "redeemLogicState.strike",
            FilterOperator::Lte,
            FilterValue::from("1930"),
        ))
        .unwrap();
    assert_eq!(nav.query.filter.as_deref(), Some("redeemLogicState.strike:lte:1930"));
    explorer.refresh(&source, now()).await;
    assert_eq!(keys(&explorer), vec!["contract-01", "contract-02", "contract-03"]);

    let nav = explorer.change_filter(None).unwrap();
    assert!(nav.query.is_empty());
}

/// Tests that filters on unknown fields survive in the URL but do not
/// restrict the result set.
#[tokio::test]
async fn test_explorer_unknown_filter_field() {
    let source = source();
    let mut explorer =
        Explorer::from_query_string(Cluster::Devnet, "/explorer", "filter=price%3Agte%3A100");
    assert_eq!(explorer.state().filter().unwrap().field(), "price");
    assert_eq!(explorer.navigation().url(), "/explorer?filter=price%3Agte%3A100");

    explorer.refresh(&source, now()).await;
    assert_eq!(explorer.rows().len(), 12);
}

/// Tests that number-like filter text matches text columns as typed and is
/// coerced for numeric columns.
#[tokio::test]
async fn test_explorer_number_like_filter() {
    let mut rows = source().rows().to_vec();
    rows.push(
        ContractBuilder::new("titled-100", now() + Duration::days(2))
            .rate(RatePlugin::Switchboard { aggregators: vec!["agg".to_string()] }, "100")
            .build(),
    );
    let source = MemorySource::new(rows);

    let mut explorer =
        Explorer::from_query_string(Cluster::Devnet, "/explorer", "filter=rateState.title%3Aeq%3A100");
    explorer.refresh(&source, now()).await;
    assert_eq!(keys(&explorer), vec!["titled-100"]);

    let nav = explorer
        .change_filter(FilterModel::new(
            "redeemLogicState.strike",
            FilterOperator::Eq,
            FilterValue::from("01910"),
        ))
        .unwrap();
    assert_eq!(nav.url(), "/explorer?filter=redeemLogicState.strike%3Aeq%3A01910");
    explorer.refresh(&source, now()).await;
    assert_eq!(keys(&explorer), vec!["contract-01"]);
}

/// Tests that a superseded fetch neither overwrites rows nor ends loading.
#[tokio::test]
async fn test_superseded_fetch_is_discarded() {
    let source = source();
    let mut explorer = Explorer::from_query_string(Cluster::Devnet, "/explorer", "limit=2");

    let first = explorer.begin_fetch(now());
    explorer.change_sort(SortModel::new("redeemLogicState.strike", SortDirection::Desc));
    let second = explorer.begin_fetch(now());
    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());

    let first = first.run(&source).await;
    assert_eq!(first.result(), &Err(ExplorerError::Cancelled));
    assert!(!explorer.complete_fetch(first));
    assert!(explorer.is_loading());
    assert!(explorer.rows().is_empty());

    let second = second.run(&source).await;
    assert!(explorer.complete_fetch(second));
    assert!(!explorer.is_loading());
    assert_eq!(keys(&explorer), vec!["contract-12", "contract-11"]);
}

/// Tests that a failed fetch leaves no rows and ends loading.
#[tokio::test]
async fn test_failed_fetch() {
    let mut explorer = Explorer::from_query_string(Cluster::Devnet, "/explorer", "");
    explorer.refresh(&source(), now()).await;
    assert_eq!(explorer.rows().len(), 12);

    explorer
        .refresh(&FailingSource("connection refused".to_string()), now())
        .await;
    assert!(explorer.rows().is_empty());
    assert!(!explorer.is_loading());
}
