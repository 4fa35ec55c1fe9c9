use std::fmt::Display;

use chrono::{DateTime, Utc};
use fastnum::D64;
use serde::{Deserialize, Serialize};

use crate::{
    Cluster,
    plugin::{RatePlugin, RedeemLogicPlugin},
    query::{ContractColumn, PredicateValue},
};

/// OTC contract as listed by the explorer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractRow {
    /// Public key of the on-chain contract account.
    pub publickey: String,

    pub cluster: Cluster,

    /// Time from which the contract can be settled.
    pub settle_available_from_at: DateTime<Utc>,

    pub buyer_wallet: Option<String>,

    pub seller_wallet: Option<String>,

    pub buyer_funded: bool,

    pub seller_funded: bool,

    pub settle_executed: bool,

    pub redeem_logic: RedeemLogicPlugin,

    pub rate: RatePlugin,

    /// Name of the underlying, e.g. `XAU/USD`.
    pub rate_title: String,
}

/// Lifecycle stage of a contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractStatus {
    /// At least one side has not deposited its collateral yet.
    WaitingForDeposits,
    /// Both sides funded, waiting for settlement.
    Active,
    /// Settlement time passed before both sides funded.
    Expired,
    Settled,
}

impl ContractStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::WaitingForDeposits => "Waiting for deposits",
            ContractStatus::Active => "Active",
            ContractStatus::Expired => "Expired",
            ContractStatus::Settled => "Settled",
        }
    }
}

impl Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl ContractRow {
    /// Contract size, for instruments that have one.
    pub fn size(&self) -> Option<D64> { self.redeem_logic.notional() }

    pub fn strike(&self) -> D64 { self.redeem_logic.strike() }

    pub fn is_fully_funded(&self) -> bool { self.buyer_funded && self.seller_funded }

    pub fn status(&self, now: DateTime<Utc>) -> ContractStatus {
        if self.settle_executed {
            ContractStatus::Settled
        } else if self.is_fully_funded() {
            ContractStatus::Active
        } else if self.settle_available_from_at <= now {
            ContractStatus::Expired
        } else {
            ContractStatus::WaitingForDeposits
        }
    }

    /// Value of the row as stored in `column`, `None` for SQL `NULL`.
    pub fn column_value(&self, column: ContractColumn) -> Option<PredicateValue> {
        let text = |value: &str| Some(PredicateValue::Text(value.to_string()));
        let number = |value: D64| Some(PredicateValue::Number(value));
        match column {
            ContractColumn::PublicKey => text(&self.publickey),
            ContractColumn::Cluster => text(self.cluster.as_str()),
            ContractColumn::SettleAvailableFromAt => {
                Some(PredicateValue::Timestamp(self.settle_available_from_at))
            },
            ContractColumn::BuyerWallet => self.buyer_wallet.as_deref().and_then(text),
            ContractColumn::SellerWallet => self.seller_wallet.as_deref().and_then(text),
            ContractColumn::BuyerFunded => Some(PredicateValue::Bool(self.buyer_funded)),
            ContractColumn::SellerFunded => Some(PredicateValue::Bool(self.seller_funded)),
            ContractColumn::SettleExecuted => Some(PredicateValue::Bool(self.settle_executed)),
            ContractColumn::RedeemLogicPluginType => text(self.redeem_logic.type_id().as_str()),
            ContractColumn::RatePluginType => text(self.rate.type_id().as_str()),
            ContractColumn::RateTitle => text(&self.rate_title),
            ContractColumn::Strike => number(self.strike()),
            ContractColumn::Notional => self.size().and_then(number),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use fastnum::dec64;

    use super::*;

    fn row() -> ContractRow {
        ContractRow {
            publickey: "4GqTjGm686yihQ1m1YdTsSvfm4mNfadv6xskzgCYWNC5".to_string(),
            cluster: Cluster::Devnet,
            settle_available_from_at: Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
            buyer_wallet: Some("buyer".to_string()),
            seller_wallet: None,
            buyer_funded: true,
            seller_funded: false,
            settle_executed: false,
            redeem_logic: RedeemLogicPlugin::Digital { strike: dec64!(1950), is_call: true },
            rate: RatePlugin::Pyth { price_accounts: vec!["feed".to_string()] },
            rate_title: "XAU/USD".to_string(),
        }
    }

    #[test]
    fn status_follows_lifecycle() {
        let mut row = row();
        let before = row.settle_available_from_at - Duration::days(1);
        let after = row.settle_available_from_at + Duration::days(1);

        assert_eq!(row.status(before), ContractStatus::WaitingForDeposits);
        assert_eq!(row.status(after), ContractStatus::Expired);

        row.seller_funded = true;
        assert_eq!(row.status(after), ContractStatus::Active);

        row.settle_executed = true;
        assert_eq!(row.status(after), ContractStatus::Settled);
    }

    #[test]
    fn column_values() {
        let row = row();
        assert_eq!(row.column_value(ContractColumn::SellerWallet), None);
        assert_eq!(row.column_value(ContractColumn::Notional), None);
        assert_eq!(
            row.column_value(ContractColumn::Strike),
            Some(PredicateValue::Number(dec64!(1950)))
        );
        assert_eq!(
            row.column_value(ContractColumn::RedeemLogicPluginType),
            Some(PredicateValue::Text("digital".to_string()))
        );
        assert_eq!(
            row.column_value(ContractColumn::BuyerFunded),
            Some(PredicateValue::Bool(true))
        );
    }
}
