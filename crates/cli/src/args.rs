use std::{num::NonZeroU32, path::PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use otc_explorer_sdk::Cluster;

pub(crate) const DEFAULT_PATHNAME: &str = "/explorer";

#[derive(Parser, Debug)]
#[command(name = "otc-explorer", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Cluster the contracts are deployed on (devnet, mainnet-beta)
    #[arg(long, global = true, default_value_t = Cluster::Devnet)]
    pub cluster: Cluster,

    /// Path of the explorer page the query string belongs to
    #[arg(long, global = true, default_value_t = DEFAULT_PATHNAME.to_string())]
    pub pathname: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode grid state into the explorer URL
    Encode {
        /// Page number, 1-indexed [default: 1]
        #[arg(long)]
        page: Option<NonZeroU32>,

        /// Page size [default: 25]
        #[arg(long)]
        limit: Option<NonZeroU32>,

        /// Sort as `<field>:<asc|desc>`
        #[arg(long)]
        sort: Option<String>,

        /// Filter as `<field>:<operator>:<value>`
        #[arg(long)]
        filter: Option<String>,
    },
    /// Decode an explorer query string into grid state
    Decode {
        /// Query string, with or without the leading `?`
        query: String,
    },
    /// Show the contracts request a query string translates to
    Request {
        /// Query string, with or without the leading `?` [default: none]
        query: Option<String>,

        /// Evaluate expiry as of this RFC 3339 time [default: now]
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// List contracts from a JSON file the way the explorer grid shows them
    List {
        /// JSON file with an array of contract rows
        #[arg(long)]
        rows: PathBuf,

        /// Query string, with or without the leading `?` [default: none]
        query: Option<String>,

        /// Evaluate expiry as of this RFC 3339 time [default: now]
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}
