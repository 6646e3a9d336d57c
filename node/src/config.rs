// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::PathBuf;

use crate::errors::NodeError;

/// How mutations reach the snapshot store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// Queue the snapshot for a background writer and return immediately.
    WriteBehind,
    /// Save before the mutating call returns.
    WriteThrough,
}

impl std::str::FromStr for PersistMode {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "write-behind" | "behind" => Ok(PersistMode::WriteBehind),
            "write-through" | "through" => Ok(PersistMode::WriteThrough),
            other => Err(NodeError::InvalidInput(format!("unknown persist mode {:?}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProducerConfig {
    pub enabled: bool,
    /// Minimum wait between rounds.
    pub interval_secs: u64,
    /// Extra random wait added on top of `interval_secs`, up to this many seconds.
    pub jitter_secs: u64,
    /// Pause between identities inside one round.
    pub per_identity_pause_ms: u64,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 10,
            jitter_secs: 20,
            per_identity_pause_ms: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Snapshot directory. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    pub persist_mode: PersistMode,
    pub producer: ProducerConfig,
    /// Identities registered at startup.
    pub identities: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: Some(PathBuf::from("./geotrail-data")),
            persist_mode: PersistMode::WriteBehind,
            producer: ProducerConfig::default(),
            identities: Vec::new(),
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `GEOTRAIL_*` environment variables.
    pub fn from_env() -> Result<Self, NodeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NodeError> {
        let mut cfg = Self::default();

        if let Some(dir) = lookup("GEOTRAIL_DATA_DIR") {
            let dir = dir.trim();
            cfg.data_dir = if dir.is_empty() || dir == ":memory:" {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }
        if let Some(mode) = lookup("GEOTRAIL_PERSIST_MODE") {
            cfg.persist_mode = mode.parse()?;
        }
        if let Some(flag) = lookup("GEOTRAIL_PRODUCER") {
            cfg.producer.enabled = parse_bool("GEOTRAIL_PRODUCER", &flag)?;
        }
        if let Some(v) = lookup("GEOTRAIL_PRODUCER_INTERVAL_SECS") {
            cfg.producer.interval_secs = parse_u64("GEOTRAIL_PRODUCER_INTERVAL_SECS", &v)?;
        }
        if let Some(v) = lookup("GEOTRAIL_PRODUCER_JITTER_SECS") {
            cfg.producer.jitter_secs = parse_u64("GEOTRAIL_PRODUCER_JITTER_SECS", &v)?;
        }
        if let Some(list) = lookup("GEOTRAIL_IDENTITIES") {
            cfg.identities = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        if self.producer.enabled && self.producer.interval_secs == 0 && self.producer.jitter_secs == 0 {
            return Err(NodeError::InvalidInput(
                "producer needs a non-zero interval or jitter".to_string(),
            ));
        }
        for id in &self.identities {
            crate::registry::validate_identity(id)?;
        }
        Ok(())
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, NodeError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(NodeError::InvalidInput(format!("{}: expected a boolean, got {:?}", key, other))),
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, NodeError> {
    raw.trim()
        .parse()
        .map_err(|_| NodeError::InvalidInput(format!("{}: expected an integer, got {:?}", key, raw)))
}
