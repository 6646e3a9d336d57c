// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use geotrail_kernel::Sample;

pub fn format_ts(ts: f64) -> String {
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1e9) as u32;
    chrono::DateTime::from_timestamp(secs as i64, nanos)
        .unwrap_or_default()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn samples_table(samples: &[Sample]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Timestamp", "Time (UTC)", "Lat", "Lon", "Origin"]);

    for s in samples {
        table.add_row(vec![
            format!("{:.3}", s.timestamp()),
            format_ts(s.timestamp()),
            format!("{:.6}", s.latitude()),
            format!("{:.6}", s.longitude()),
            s.origin().to_string(),
        ]);
    }
    table
}

pub fn kv_table(rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);
    for (k, v) in rows {
        table.add_row(vec![k.to_string(), v.clone()]);
    }
    table
}
