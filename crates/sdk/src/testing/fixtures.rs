use chrono::{DateTime, Utc};
use fastnum::{D64, dec64};

use crate::{
    Cluster,
    contract::ContractRow,
    plugin::{RatePlugin, RedeemLogicPlugin},
};

/// Builder of [`ContractRow`] fixtures.
///
/// Defaults to an unfunded devnet XAU/USD forward priced by Pyth.
#[derive(Clone, Debug)]
pub struct ContractBuilder {
    row: ContractRow,
}

impl ContractBuilder {
    pub fn new(publickey: impl Into<String>, settle_available_from_at: DateTime<Utc>) -> Self {
        Self {
            row: ContractRow {
                publickey: publickey.into(),
                cluster: Cluster::Devnet,
                settle_available_from_at,
                buyer_wallet: None,
                seller_wallet: None,
                buyer_funded: false,
                seller_funded: false,
                settle_executed: false,
                redeem_logic: RedeemLogicPlugin::Forward {
                    strike: dec64!(1950),
                    notional: dec64!(1),
                    is_linear: true,
                    is_standard: true,
                },
                rate: RatePlugin::Pyth {
                    price_accounts: vec!["J83w4HKfqxwcq3BEMMkPFSppX3gqekLyLJBexebFVkix".to_string()],
                },
                rate_title: "XAU/USD".to_string(),
            },
        }
    }

    pub fn cluster(mut self, cluster: Cluster) -> Self {
        self.row.cluster = cluster;
        self
    }

    pub fn buyer(mut self, wallet: impl Into<String>) -> Self {
        self.row.buyer_wallet = Some(wallet.into());
        self.row.buyer_funded = true;
        self
    }

    pub fn seller(mut self, wallet: impl Into<String>) -> Self {
        self.row.seller_wallet = Some(wallet.into());
        self.row.seller_funded = true;
        self
    }

    pub fn settled(mut self) -> Self {
        self.row.settle_executed = true;
        self
    }

    pub fn redeem_logic(mut self, redeem_logic: RedeemLogicPlugin) -> Self {
        self.row.redeem_logic = redeem_logic;
        self
    }

    pub fn forward(self, strike: D64, notional: D64) -> Self {
        self.redeem_logic(RedeemLogicPlugin::Forward {
            strike,
            notional,
            is_linear: true,
            is_standard: true,
        })
    }

    pub fn digital(self, strike: D64) -> Self {
        self.redeem_logic(RedeemLogicPlugin::Digital { strike, is_call: true })
    }

    pub fn rate(mut self, rate: RatePlugin, title: impl Into<String>) -> Self {
        self.row.rate = rate;
        self.row.rate_title = title.into();
        self
    }

    pub fn build(self) -> ContractRow { self.row }
}
