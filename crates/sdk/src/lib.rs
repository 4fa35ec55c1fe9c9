//! OTC contract explorer SDK.
//!
//! # Overview
//!
//! Translation layer between the contract explorer grid, the address bar and
//! the hosted contracts database.
//!
//! Use [`query::GridState::from_query_params`] to restore the grid from the
//! URL, [`query::GridState::to_query_params`] to write it back, and
//! [`query::build_not_expired_contracts_query`] to derive the request sent to
//! a [`source::ContractSource`].
//!
//! [`explorer::Explorer`] ties these together into the page state: every
//! grid mutation yields the [`explorer::Navigation`] to push, and every fetch
//! is issued through a [`explorer::FetchTicket`] so a newer fetch supersedes
//! an older one still in flight.
//!
//! # URL grammar
//!
//! | Key | Format | Omitted when |
//! | --- | --- | --- |
//! | `page` | positive integer, 1-indexed | `1` |
//! | `limit` | positive integer | [`query::DEFAULT_LIMIT`] |
//! | `sort` | `<field>:<asc\|desc>` | unsorted |
//! | `filter` | `<field>:<operator>:<value>` | unfiltered |
//!
//! # Features
//!
//! | Feature | Default | Description |
//! | --- | --- | --- |
//! | `display` | yes | Enables [`std::fmt::Display`] tables for rows and requests. |
//! | `testing` | yes | Enables [`testing`] module. |

pub mod contract;
#[cfg(feature = "display")]
pub mod display;
pub mod error;
pub mod explorer;
pub mod plugin;
pub mod query;
pub mod source;
#[cfg(feature = "testing")]
pub mod testing;

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Cluster the contracts are deployed on.
///
/// Passed explicitly to everything that scopes data by cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[default]
    Devnet,
    MainnetBeta,
}

impl Cluster {
    pub const ALL: [Cluster; 2] = [Cluster::Devnet, Cluster::MainnetBeta];

    /// Name of the cluster as stored in the contracts table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::Devnet => "devnet",
            Cluster::MainnetBeta => "mainnet-beta",
        }
    }
}

impl Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Cluster {
    type Err = error::ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cluster::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| error::ExplorerError::InvalidArgument(format!("unknown cluster: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_names() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("mainnet-beta".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert!("testnet".parse::<Cluster>().is_err());
        assert_eq!(Cluster::MainnetBeta.to_string(), "mainnet-beta");
    }
}
