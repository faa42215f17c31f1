//! Plotly-compatible payload builders for the dashboard. Rendering happens
//! in the frontend; this module only shapes the data. Missing columns
//! degrade to a placeholder payload, never an error.

use crate::assets::AssetRecord;
use serde_json::{Value, json};
use std::collections::HashMap;

const HISTOGRAM_COLOR: &str = "#4db8ff";

/// Histogram of expiry dates across the table. Rows without a parsable
/// expiry date are left out of the distribution.
pub fn expiry_histogram(table: &[AssetRecord]) -> Value {
    let dates: Vec<String> = table
        .iter()
        .filter_map(|record| record.expiry_date)
        .map(|date| date.to_string())
        .collect();

    json!({
        "data": [{
            "type": "histogram",
            "x": dates,
            "nbinsx": 30,
            "marker": { "color": HISTOGRAM_COLOR },
        }],
        "layout": { "title": "Asset Expiry Distribution" },
    })
}

/// Pie chart of asset counts per category.
pub fn category_distribution(table: &[AssetRecord]) -> Value {
    let counts = value_counts(table.iter().filter_map(|r| r.category.as_deref()));
    if counts.is_empty() {
        return placeholder("No Category Data");
    }

    let (labels, values): (Vec<&str>, Vec<usize>) = counts.into_iter().unzip();
    json!({
        "data": [{
            "type": "pie",
            "labels": labels,
            "values": values,
            "textposition": "inside",
            "textinfo": "percent+label",
        }],
        "layout": { "title": "Asset Category Distribution" },
    })
}

/// Bar chart of asset counts per owner.
pub fn owner_distribution(table: &[AssetRecord]) -> Value {
    let counts = value_counts(table.iter().filter_map(|r| r.owner_email.as_deref()));
    if counts.is_empty() {
        return placeholder("No Owner Data");
    }

    let (owners, values): (Vec<&str>, Vec<usize>) = counts.into_iter().unzip();
    json!({
        "data": [{
            "type": "bar",
            "x": owners,
            "y": values,
            "marker": { "color": HISTOGRAM_COLOR },
        }],
        "layout": { "title": "Assets per Owner" },
    })
}

/// Occurrence counts sorted by count descending, ties broken by label so the
/// payload is deterministic.
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    counts
}

/// Empty figure with a centered annotation, shown when a sheet lacks the
/// column a chart needs.
fn placeholder(text: &str) -> Value {
    json!({
        "data": [],
        "layout": {
            "annotations": [{ "text": text, "x": 0.5, "y": 0.5, "showarrow": false }],
        },
    })
}
