//! Shared types used across assetq.

use crate::error::AssetqError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The asset-search services assetq can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// fofa.info
    Fofa,
    /// hunter.qianxin.com
    Hunter,
    /// quake.360.net
    Quake,
}

impl Provider {
    /// All providers, in display order.
    pub const ALL: [Provider; 3] = [Provider::Fofa, Provider::Hunter, Provider::Quake];

    /// Lowercase name, as used on the command line and in the config file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Fofa => "fofa",
            Provider::Hunter => "hunter",
            Provider::Quake => "quake",
        }
    }

    /// Output file used by batch runs when none is given.
    #[must_use]
    pub fn default_output(self) -> &'static str {
        match self {
            Provider::Fofa => "fofa.csv",
            Provider::Hunter => "hunter.csv",
            Provider::Quake => "quake.csv",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AssetqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fofa" => Ok(Provider::Fofa),
            "hunter" => Ok(Provider::Hunter),
            "quake" => Ok(Provider::Quake),
            other => Err(AssetqError::Validation(format!("unknown provider: {other}"))),
        }
    }
}
