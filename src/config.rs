// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Valid latitude range in degrees (inclusive).
pub const LAT_MIN: f64 = -90.0;
pub const LAT_MAX: f64 = 90.0;

/// Valid longitude range in degrees (inclusive).
pub const LON_MIN: f64 = -180.0;
pub const LON_MAX: f64 = 180.0;

/// Coordinates of the placeholder sample a fresh timeline starts with.
pub const BOOTSTRAP_LAT: f64 = 0.0;
pub const BOOTSTRAP_LON: f64 = 0.0;
