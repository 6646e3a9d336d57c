// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Sample definition.

use serde::{Deserialize, Serialize};

use crate::config::{LAT_MAX, LAT_MIN, LON_MAX, LON_MIN};
use crate::error::{KernelError, Result};
use crate::types::enums::Origin;

/// One timestamped geospatial observation.
///
/// Values are immutable. Provenance changes produce a new copy through
/// [`Sample::with_origin`]. Deserialized samples are not validated until they
/// pass through [`Sample::validate`], which every store entry point calls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    timestamp: f64,
    #[serde(rename = "lat")]
    latitude: f64,
    #[serde(rename = "lon")]
    longitude: f64,
    #[serde(default)]
    origin: Origin,
}

impl Sample {
    /// Builds a validated sample tagged `online`.
    pub fn new(timestamp: f64, latitude: f64, longitude: f64) -> Result<Self> {
        let sample = Self {
            timestamp,
            latitude,
            longitude,
            origin: Origin::Online,
        };
        sample.validate()?;
        Ok(sample)
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn with_origin(self, origin: Origin) -> Self {
        Self { origin, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        check_timestamp(self.timestamp)?;
        if !self.latitude.is_finite() || self.latitude < LAT_MIN || self.latitude > LAT_MAX {
            return Err(KernelError::InvalidCoordinate);
        }
        if !self.longitude.is_finite() || self.longitude < LON_MIN || self.longitude > LON_MAX {
            return Err(KernelError::InvalidCoordinate);
        }
        Ok(())
    }
}

pub(crate) fn check_timestamp(ts: f64) -> Result<f64> {
    if ts.is_finite() {
        Ok(ts)
    } else {
        Err(KernelError::InvalidTimestamp)
    }
}

/// Parses a timestamp in seconds from text.
pub fn parse_timestamp(raw: &str) -> Result<f64> {
    let ts: f64 = raw
        .trim()
        .parse()
        .map_err(|_| KernelError::InvalidTimestamp)?;
    check_timestamp(ts)
}
