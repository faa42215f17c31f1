pub mod analyzer;
pub mod loader;

pub use analyzer::{AnalysisResult, analyze};
pub use loader::parse_asset_table;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of an uploaded asset sheet.
///
/// The source format is uncontrolled, so every field except the name is
/// optional; a field that is missing or unparsable in the source stays `None`
/// without affecting the rest of the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub name: String,
    pub owner_email: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub acquisition_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub value: Option<f64>,
}

impl AssetRecord {
    /// Record with only a name set, used as the starting point when mapping
    /// a CSV row.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner_email: None,
            expiry_date: None,
            acquisition_date: None,
            status: None,
            category: None,
            value: None,
        }
    }
}

/// Ordered rows of one uploaded sheet, input order preserved.
pub type AssetTable = Vec<AssetRecord>;
