use std::{fmt::Display, str::FromStr};

use fastnum::D64;
use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

/// Type of the redeem-logic plugin, i.e. the payoff formula of the contract.
///
/// Stored in the `redeem_logic_plugin_type` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedeemLogicPluginType {
    Forward,
    SettledForward,
    Digital,
    VanillaOption,
}

/// Type of the rate plugin, i.e. the oracle supplying the underlying price.
///
/// Stored in the `rate_plugin_type` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePluginType {
    Pyth,
    Switchboard,
}

/// Redeem-logic plugin types the explorer can render.
pub const ALLOWED_REDEEM_LOGIC_PLUGINS: [RedeemLogicPluginType; 4] = RedeemLogicPluginType::ALL;

/// Rate plugin types the explorer can render.
pub const ALLOWED_RATE_PLUGINS: [RatePluginType; 2] = RatePluginType::ALL;

impl RedeemLogicPluginType {
    pub const ALL: [RedeemLogicPluginType; 4] = [
        RedeemLogicPluginType::Forward,
        RedeemLogicPluginType::SettledForward,
        RedeemLogicPluginType::Digital,
        RedeemLogicPluginType::VanillaOption,
    ];

    /// Type identifier as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            RedeemLogicPluginType::Forward => "forward",
            RedeemLogicPluginType::SettledForward => "settled_forward",
            RedeemLogicPluginType::Digital => "digital",
            RedeemLogicPluginType::VanillaOption => "vanilla_option",
        }
    }

    /// Human-readable instrument name.
    pub fn label(&self) -> &'static str {
        match self {
            RedeemLogicPluginType::Forward => "Forward",
            RedeemLogicPluginType::SettledForward => "Settled Forward",
            RedeemLogicPluginType::Digital => "Digital",
            RedeemLogicPluginType::VanillaOption => "Vanilla Option",
        }
    }
}

impl RatePluginType {
    pub const ALL: [RatePluginType; 2] = [RatePluginType::Pyth, RatePluginType::Switchboard];

    /// Type identifier as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            RatePluginType::Pyth => "pyth",
            RatePluginType::Switchboard => "switchboard",
        }
    }
}

impl Display for RedeemLogicPluginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() { write!(f, "{}", self.label()) } else { write!(f, "{}", self.as_str()) }
    }
}

impl Display for RatePluginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RedeemLogicPluginType {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RedeemLogicPluginType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                ExplorerError::InvalidArgument(format!("unknown redeem logic plugin: {}", s))
            })
    }
}

impl FromStr for RatePluginType {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RatePluginType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ExplorerError::InvalidArgument(format!("unknown rate plugin: {}", s)))
    }
}

/// State of the redeem-logic plugin attached to a contract.
#[derive(Clone, derive_more::Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RedeemLogicPlugin {
    Forward {
        #[debug("{strike}")]
        strike: D64,
        #[debug("{notional}")]
        notional: D64,
        is_linear: bool,
        is_standard: bool,
    },
    SettledForward {
        #[debug("{strike}")]
        strike: D64,
        #[debug("{notional}")]
        notional: D64,
        is_linear: bool,
        is_standard: bool,
    },
    Digital {
        #[debug("{strike}")]
        strike: D64,
        is_call: bool,
    },
    VanillaOption {
        #[debug("{strike}")]
        strike: D64,
        #[debug("{notional}")]
        notional: D64,
        is_call: bool,
        is_linear: bool,
    },
}

impl RedeemLogicPlugin {
    pub fn type_id(&self) -> RedeemLogicPluginType {
        match self {
            RedeemLogicPlugin::Forward { .. } => RedeemLogicPluginType::Forward,
            RedeemLogicPlugin::SettledForward { .. } => RedeemLogicPluginType::SettledForward,
            RedeemLogicPlugin::Digital { .. } => RedeemLogicPluginType::Digital,
            RedeemLogicPlugin::VanillaOption { .. } => RedeemLogicPluginType::VanillaOption,
        }
    }

    /// Strike price of the payoff.
    pub fn strike(&self) -> D64 {
        match self {
            RedeemLogicPlugin::Forward { strike, .. }
            | RedeemLogicPlugin::SettledForward { strike, .. }
            | RedeemLogicPlugin::Digital { strike, .. }
            | RedeemLogicPlugin::VanillaOption { strike, .. } => *strike,
        }
    }

    /// Contract size. Digital payoffs are fixed and carry no notional.
    pub fn notional(&self) -> Option<D64> {
        match self {
            RedeemLogicPlugin::Forward { notional, .. }
            | RedeemLogicPlugin::SettledForward { notional, .. }
            | RedeemLogicPlugin::VanillaOption { notional, .. } => Some(*notional),
            RedeemLogicPlugin::Digital { .. } => None,
        }
    }
}

/// State of the rate plugin attached to a contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RatePlugin {
    Pyth { price_accounts: Vec<String> },
    Switchboard { aggregators: Vec<String> },
}

impl RatePlugin {
    pub fn type_id(&self) -> RatePluginType {
        match self {
            RatePlugin::Pyth { .. } => RatePluginType::Pyth,
            RatePlugin::Switchboard { .. } => RatePluginType::Switchboard,
        }
    }

    /// Accounts the live price is read from.
    pub fn live_price_accounts(&self) -> &[String] {
        match self {
            RatePlugin::Pyth { price_accounts } => price_accounts,
            RatePlugin::Switchboard { aggregators } => aggregators,
        }
    }
}
