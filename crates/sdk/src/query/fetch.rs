use std::{fmt::Display, num::NonZeroU32};

use chrono::{DateTime, SecondsFormat, Utc};
use fastnum::D64;

use super::{DEFAULT_LIMIT, FilterModel, FilterOperator, FilterValue, GridState, SortDirection, SortModel};
use crate::{
    Cluster,
    plugin::{ALLOWED_RATE_PLUGINS, ALLOWED_REDEEM_LOGIC_PLUGINS},
};

/// Columns of the contracts table the explorer reads and filters on.
///
/// Each column is addressable both by its grid field name, as used in the
/// URL, and by its database name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractColumn {
    PublicKey,
    Cluster,
    SettleAvailableFromAt,
    BuyerWallet,
    SellerWallet,
    BuyerFunded,
    SellerFunded,
    SettleExecuted,
    RedeemLogicPluginType,
    RatePluginType,
    RateTitle,
    Strike,
    Notional,
}

impl ContractColumn {
    pub const ALL: [ContractColumn; 13] = [
        ContractColumn::PublicKey,
        ContractColumn::Cluster,
        ContractColumn::SettleAvailableFromAt,
        ContractColumn::BuyerWallet,
        ContractColumn::SellerWallet,
        ContractColumn::BuyerFunded,
        ContractColumn::SellerFunded,
        ContractColumn::SettleExecuted,
        ContractColumn::RedeemLogicPluginType,
        ContractColumn::RatePluginType,
        ContractColumn::RateTitle,
        ContractColumn::Strike,
        ContractColumn::Notional,
    ];

    /// Field name of the column in the explorer grid.
    pub fn grid_field(&self) -> &'static str {
        match self {
            ContractColumn::PublicKey => "publickey",
            ContractColumn::Cluster => "cluster",
            ContractColumn::SettleAvailableFromAt => "settleAvailableFromAt",
            ContractColumn::BuyerWallet => "buyerWallet",
            ContractColumn::SellerWallet => "sellerWallet",
            ContractColumn::BuyerFunded => "buyerFunded",
            ContractColumn::SellerFunded => "sellerFunded",
            ContractColumn::SettleExecuted => "settleExecuted",
            ContractColumn::RedeemLogicPluginType => "redeemLogicState.typeId",
            ContractColumn::RatePluginType => "rateState.typeId",
            ContractColumn::RateTitle => "rateState.title",
            ContractColumn::Strike => "redeemLogicState.strike",
            ContractColumn::Notional => "redeemLogicState.notional",
        }
    }

    /// Name of the column in the contracts table.
    pub fn db_name(&self) -> &'static str {
        match self {
            ContractColumn::PublicKey => "pubkey",
            ContractColumn::Cluster => "cluster",
            ContractColumn::SettleAvailableFromAt => "settle_available_from_at",
            ContractColumn::BuyerWallet => "buyer_wallet",
            ContractColumn::SellerWallet => "seller_wallet",
            ContractColumn::BuyerFunded => "buyer_funded",
            ContractColumn::SellerFunded => "seller_funded",
            ContractColumn::SettleExecuted => "settle_executed",
            ContractColumn::RedeemLogicPluginType => "redeem_logic_plugin_type",
            ContractColumn::RatePluginType => "rate_plugin_type",
            ContractColumn::RateTitle => "rate_title",
            ContractColumn::Strike => "redeem_logic_strike",
            ContractColumn::Notional => "redeem_logic_notional",
        }
    }

    /// Type of the values stored in the column.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ContractColumn::PublicKey
            | ContractColumn::Cluster
            | ContractColumn::BuyerWallet
            | ContractColumn::SellerWallet
            | ContractColumn::RedeemLogicPluginType
            | ContractColumn::RatePluginType
            | ContractColumn::RateTitle => ColumnKind::Text,
            ContractColumn::SettleAvailableFromAt => ColumnKind::Timestamp,
            ContractColumn::BuyerFunded
            | ContractColumn::SellerFunded
            | ContractColumn::SettleExecuted => ColumnKind::Bool,
            ContractColumn::Strike | ContractColumn::Notional => ColumnKind::Number,
        }
    }

    /// Resolves a grid field or database column name.
    pub fn from_field(field: &str) -> Option<Self> {
        ContractColumn::ALL
            .into_iter()
            .find(|c| c.grid_field() == field || c.db_name() == field)
    }
}

impl Display for ContractColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.db_name())
    }
}

/// SQL type of a [`ContractColumn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Text,
    Number,
    Bool,
    Timestamp,
}

/// Value of a database predicate or of a row column.
#[derive(Clone, Debug, PartialEq)]
pub enum PredicateValue {
    Bool(bool),
    Number(D64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<FilterValue> for PredicateValue {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Bool(value) => PredicateValue::Bool(value),
            FilterValue::Number(value) => PredicateValue::Number(value),
            FilterValue::Text(value) => PredicateValue::Text(value),
        }
    }
}

impl PredicateValue {
    /// Types a grid filter value by the column it is compared against. Text
    /// columns get the value exactly as typed; values that do not fit a typed
    /// column are passed on as text for the database to reject or coerce.
    pub fn for_column(column: ContractColumn, value: &FilterValue) -> Self {
        match (column.kind(), value) {
            (ColumnKind::Text, value) => PredicateValue::Text(value.to_string()),
            (ColumnKind::Number, FilterValue::Text(text)) => match text.parse::<D64>() {
                Ok(number) if number.is_finite() => PredicateValue::Number(number),
                _ => PredicateValue::Text(text.clone()),
            },
            (ColumnKind::Timestamp, FilterValue::Text(text)) => {
                match DateTime::parse_from_rfc3339(text) {
                    Ok(ts) => PredicateValue::Timestamp(ts.with_timezone(&Utc)),
                    Err(_) => PredicateValue::Text(text.clone()),
                }
            },
            (ColumnKind::Bool, FilterValue::Number(_)) => PredicateValue::Text(value.to_string()),
            (_, value) => value.clone().into(),
        }
    }
}

impl Display for PredicateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredicateValue::Bool(value) => write!(f, "{}", value),
            PredicateValue::Number(value) => write!(f, "{}", value),
            PredicateValue::Text(value) => write!(f, "{}", value),
            PredicateValue::Timestamp(value) => {
                write!(f, "{}", value.to_rfc3339_opts(SecondsFormat::Millis, true))
            },
        }
    }
}

/// `column <op> value` predicate, the operator given by the bucket it is in.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnPredicate {
    pub column: ContractColumn,
    pub value: PredicateValue,
}

/// `column IN (values)` restriction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InPredicate {
    pub column: ContractColumn,
    pub values: Vec<&'static str>,
}

/// Single-column ordering of the result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: ContractColumn,
    pub direction: SortDirection,
}

/// Server-side result window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    offset: u64,
    limit: NonZeroU32,
}

impl Pagination {
    /// Converts the 1-indexed grid page into a 0-indexed row offset.
    pub fn from_page(page: NonZeroU32, limit: NonZeroU32) -> Self {
        Self { offset: u64::from(page.get() - 1) * u64::from(limit.get()), limit }
    }

    pub fn offset(&self) -> u64 { self.offset }

    pub fn limit(&self) -> NonZeroU32 { self.limit }
}

impl Default for Pagination {
    fn default() -> Self { Self { offset: 0, limit: DEFAULT_LIMIT } }
}

/// Request sent to the contracts database.
///
/// All predicates are conjunctive. The plugin allow-list is attached on
/// construction and has no mutator: user input can only narrow the result
/// set, never widen it past the plugin types the explorer can render.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchContractsParams {
    eq: Vec<ColumnPredicate>,
    lt: Vec<ColumnPredicate>,
    lte: Vec<ColumnPredicate>,
    gt: Vec<ColumnPredicate>,
    gte: Vec<ColumnPredicate>,
    contains: Vec<ColumnPredicate>,
    allow_list: Vec<InPredicate>,
    order: Option<Order>,
    pagination: Pagination,
}

impl FetchContractsParams {
    /// Empty request restricted to the supported plugin types.
    pub fn new(pagination: Pagination) -> Self {
        Self {
            eq: Vec::new(),
            lt: Vec::new(),
            lte: Vec::new(),
            gt: Vec::new(),
            gte: Vec::new(),
            contains: Vec::new(),
            allow_list: vec![
                InPredicate {
                    column: ContractColumn::RedeemLogicPluginType,
                    values: ALLOWED_REDEEM_LOGIC_PLUGINS.iter().map(|t| t.as_str()).collect(),
                },
                InPredicate {
                    column: ContractColumn::RatePluginType,
                    values: ALLOWED_RATE_PLUGINS.iter().map(|t| t.as_str()).collect(),
                },
            ],
            order: None,
            pagination,
        }
    }

    /// Contracts of `cluster` not yet past settlement at `now`, narrowed by
    /// the user's grid state if any.
    pub fn not_expired(cluster: &Cluster, query: Option<&GridState>, now: DateTime<Utc>) -> Self {
        let mut params = Self::new(query.map(GridState::pagination).unwrap_or_default())
            .with_predicate(
                FilterOperator::Gte,
                ContractColumn::SettleAvailableFromAt,
                PredicateValue::Timestamp(now),
            )
            .with_predicate(
                FilterOperator::Eq,
                ContractColumn::Cluster,
                PredicateValue::Text(cluster.as_str().to_string()),
            );
        if let Some(query) = query {
            if let Some(filter) = query.filter() {
                params = params.with_filter(filter);
            }
            if let Some(sort) = query.sort() {
                params = params.with_sort(sort);
            }
        }
        params
    }

    pub fn with_predicate(
        mut self,
        operator: FilterOperator,
        column: ContractColumn,
        value: PredicateValue,
    ) -> Self {
        let bucket = match operator {
            FilterOperator::Eq => &mut self.eq,
            FilterOperator::Lt => &mut self.lt,
            FilterOperator::Lte => &mut self.lte,
            FilterOperator::Gt => &mut self.gt,
            FilterOperator::Gte => &mut self.gte,
            FilterOperator::Contains => &mut self.contains,
        };
        bucket.push(ColumnPredicate { column, value });
        self
    }

    /// Adds the grid filter. Fields outside [`ContractColumn`] are dropped.
    pub fn with_filter(self, filter: &FilterModel) -> Self {
        match ContractColumn::from_field(filter.field()) {
            Some(column) => {
                let value = PredicateValue::for_column(column, filter.value());
                self.with_predicate(filter.operator(), column, value)
            },
            None => {
                tracing::debug!(field = filter.field(), "dropping filter on unknown column");
                self
            },
        }
    }

    /// Orders by the grid sort. Fields outside [`ContractColumn`] are dropped.
    pub fn with_sort(mut self, sort: &SortModel) -> Self {
        match ContractColumn::from_field(sort.field()) {
            Some(column) => self.order = Some(Order { column, direction: sort.direction() }),
            None => tracing::debug!(field = sort.field(), "dropping sort on unknown column"),
        }
        self
    }

    pub fn eq(&self) -> &[ColumnPredicate] { &self.eq }

    pub fn lt(&self) -> &[ColumnPredicate] { &self.lt }

    pub fn lte(&self) -> &[ColumnPredicate] { &self.lte }

    pub fn gt(&self) -> &[ColumnPredicate] { &self.gt }

    pub fn gte(&self) -> &[ColumnPredicate] { &self.gte }

    pub fn contains(&self) -> &[ColumnPredicate] { &self.contains }

    /// Plugin-type restriction, always present.
    pub fn allow_list(&self) -> &[InPredicate] { &self.allow_list }

    pub fn order(&self) -> Option<Order> { self.order }

    pub fn pagination(&self) -> Pagination { self.pagination }

    /// All comparison predicates with their operators, bucket by bucket.
    pub fn predicates(&self) -> impl Iterator<Item = (FilterOperator, &ColumnPredicate)> {
        [
            (FilterOperator::Eq, &self.eq),
            (FilterOperator::Lt, &self.lt),
            (FilterOperator::Lte, &self.lte),
            (FilterOperator::Gt, &self.gt),
            (FilterOperator::Gte, &self.gte),
            (FilterOperator::Contains, &self.contains),
        ]
        .into_iter()
        .flat_map(|(op, bucket)| bucket.iter().map(move |p| (op, p)))
    }
}

/// Request for the explorer: contracts of `cluster` not yet past settlement,
/// restricted to supported plugins, narrowed by the grid state.
pub fn build_not_expired_contracts_query(
    cluster: &Cluster,
    query: Option<&GridState>,
) -> FetchContractsParams {
    FetchContractsParams::not_expired(cluster, query, Utc::now())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use fastnum::dec64;
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() }

    #[test]
    fn offset_is_computed_from_one_indexed_page() {
        let p = Pagination::from_page(NonZeroU32::new(2).unwrap(), NonZeroU32::new(10).unwrap());
        assert_eq!(p.offset(), 10);
        assert_eq!(p.limit().get(), 10);

        let p = Pagination::from_page(NonZeroU32::MIN, NonZeroU32::new(10).unwrap());
        assert_eq!(p.offset(), 0);

        let p = Pagination::from_page(NonZeroU32::MAX, NonZeroU32::MAX);
        assert_eq!(p.offset(), (u64::from(u32::MAX) - 1) * u64::from(u32::MAX));
    }

    #[test]
    fn allow_list_without_user_query() {
        let params = build_not_expired_contracts_query(&Cluster::Devnet, None);
        assert_eq!(params.allow_list().len(), 2);
        assert_eq!(params.allow_list()[0].column, ContractColumn::RedeemLogicPluginType);
        assert_eq!(
            params.allow_list()[0].values,
            vec!["forward", "settled_forward", "digital", "vanilla_option"]
        );
        assert_eq!(params.allow_list()[1].column, ContractColumn::RatePluginType);
        assert_eq!(params.allow_list()[1].values, vec!["pyth", "switchboard"]);
        assert_eq!(params.pagination(), Pagination::default());
        assert_eq!(params.order(), None);
    }

    #[test]
    fn not_expired_predicates_come_first() {
        let query = GridState::new(NonZeroU32::new(2).unwrap(), NonZeroU32::new(10).unwrap())
            .with_filter(
                FilterModel::new(
                    "settleAvailableFromAt",
                    FilterOperator::Gte,
                    FilterValue::from("2024-06-01T00:00:00Z"),
                )
                .unwrap(),
            )
            .with_sort(SortModel::new("redeemLogicState.strike", SortDirection::Desc).unwrap());
        let params = FetchContractsParams::not_expired(&Cluster::MainnetBeta, Some(&query), now());

        assert_eq!(
            params.gte(),
            &[
                ColumnPredicate {
                    column: ContractColumn::SettleAvailableFromAt,
                    value: PredicateValue::Timestamp(now()),
                },
                ColumnPredicate {
                    column: ContractColumn::SettleAvailableFromAt,
                    value: PredicateValue::Timestamp(
                        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
                    ),
                },
            ]
        );
        assert_eq!(
            params.eq(),
            &[ColumnPredicate {
                column: ContractColumn::Cluster,
                value: PredicateValue::Text("mainnet-beta".to_string()),
            }]
        );
        assert_eq!(
            params.order(),
            Some(Order { column: ContractColumn::Strike, direction: SortDirection::Desc })
        );
        assert_eq!(params.pagination().offset(), 10);
        assert_eq!(params.allow_list().len(), 2);
    }

    #[test]
    fn user_filter_cannot_widen_allow_list() {
        let query = GridState::default().with_filter(
            FilterModel::new("rate_plugin_type", FilterOperator::Eq, FilterValue::from("chainlink"))
                .unwrap(),
        );
        let params = FetchContractsParams::not_expired(&Cluster::Devnet, Some(&query), now());
        assert_eq!(params.eq().len(), 2);
        assert_eq!(params.allow_list()[1].values, vec!["pyth", "switchboard"]);
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let query = GridState::default()
            .with_filter(
                FilterModel::new("price", FilterOperator::Gte, FilterValue::Number(dec64!(100)))
                    .unwrap(),
            )
            .with_sort(SortModel::new("contractStatus", SortDirection::Asc).unwrap());
        let params = FetchContractsParams::not_expired(&Cluster::Devnet, Some(&query), now());
        assert_eq!(params.predicates().count(), 2);
        assert_eq!(params.order(), None);
    }

    #[test]
    fn contains_has_its_own_bucket() {
        let query = GridState::default().with_filter(
            FilterModel::new("rateState.title", FilterOperator::Contains, FilterValue::from("xau"))
                .unwrap(),
        );
        let params = FetchContractsParams::not_expired(&Cluster::Devnet, Some(&query), now());
        assert_eq!(params.contains().len(), 1);
        assert_eq!(
            params.predicates().map(|(op, _)| op).collect::<Vec<_>>(),
            vec![FilterOperator::Eq, FilterOperator::Gte, FilterOperator::Contains]
        );
    }

    #[test]
    fn filter_values_are_typed_by_column() {
        let typed = |field: &str, raw: &str| {
            let column = ContractColumn::from_field(field).unwrap();
            PredicateValue::for_column(column, &FilterValue::parse(raw))
        };
        assert_eq!(typed("rateState.title", "100"), PredicateValue::Text("100".to_string()));
        assert_eq!(typed("buyerWallet", "007"), PredicateValue::Text("007".to_string()));
        assert_eq!(typed("rateState.title", "true"), PredicateValue::Text("true".to_string()));
        assert_eq!(typed("redeemLogicState.strike", "007"), PredicateValue::Number(dec64!(7)));
        assert_eq!(typed("redeemLogicState.strike", "1e3"), PredicateValue::Number(dec64!(1000)));
        assert_eq!(typed("redeemLogicState.strike", "abc"), PredicateValue::Text("abc".to_string()));
        assert_eq!(typed("buyerFunded", "false"), PredicateValue::Bool(false));
        assert_eq!(typed("buyerFunded", "1"), PredicateValue::Text("1".to_string()));
        assert_eq!(
            typed("settleAvailableFromAt", "2024-03-01T12:00:00Z"),
            PredicateValue::Timestamp(now())
        );
    }

    #[test]
    fn timestamps_render_as_rfc3339() {
        assert_eq!(PredicateValue::Timestamp(now()).to_string(), "2024-03-01T12:00:00.000Z");
    }
}
