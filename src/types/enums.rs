// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Provenance and connectivity enums.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Where a stored sample came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Recorded while connected, written straight to the ledger.
    Online,
    /// Recorded while disconnected, waiting in the pending queue.
    Offline,
    /// Recorded offline and later merged into the ledger.
    Synced,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Online => "online",
            Origin::Offline => "offline",
            Origin::Synced => "synced",
        }
    }
}

impl Default for Origin {
    fn default() -> Self {
        Origin::Online
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connectivity of the identity at the moment a sample is inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn from_online(online: bool) -> Self {
        if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Connectivity::Online)
    }
}
