use crate::assets::{AssetRecord, AssetTable};
use crate::error::AppError;
use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

/// Column headers recognized in uploaded sheets. Lookup is exact; any of
/// these may be absent and unrecognized columns are ignored.
const COL_NAME: &str = "Asset";
const COL_OWNER_EMAIL: &str = "Owner Email";
const COL_EXPIRY: &str = "Expiry Date";
const COL_ACQUISITION: &str = "Acquisition Date";
const COL_STATUS: &str = "Status";
const COL_CATEGORY: &str = "Category";
const COL_VALUE: &str = "Value";

/// Date formats tried in order when parsing date cells.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y"];

/// Parse uploaded CSV bytes into an asset table.
///
/// Structural CSV errors fail the whole parse; a bad cell only degrades that
/// field to `None` for that row.
pub fn parse_asset_table(bytes: &[u8]) -> Result<AssetTable, AppError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let name_col = column(COL_NAME);
    let owner_col = column(COL_OWNER_EMAIL);
    let expiry_col = column(COL_EXPIRY);
    let acquisition_col = column(COL_ACQUISITION);
    let status_col = column(COL_STATUS);
    let category_col = column(COL_CATEGORY);
    let value_col = column(COL_VALUE);

    let mut table = Vec::new();
    for row in reader.records() {
        let row = row?;

        let mut record = AssetRecord::named(cell(&row, name_col).unwrap_or_default());
        record.owner_email = cell(&row, owner_col).map(str::to_string);
        record.expiry_date = cell(&row, expiry_col).and_then(parse_date);
        record.acquisition_date = cell(&row, acquisition_col).and_then(parse_date);
        record.status = cell(&row, status_col).map(str::to_string);
        record.category = cell(&row, category_col).map(str::to_string);
        record.value = cell(&row, value_col).and_then(parse_value);
        table.push(record);
    }

    debug!("Parsed {} asset records from CSV", table.len());
    Ok(table)
}

/// Non-empty, trimmed cell content for a column, if the column exists.
fn cell<'r>(row: &'r StringRecord, index: Option<usize>) -> Option<&'r str> {
    index
        .and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Best-effort date parsing.
///
/// Takes the first whitespace-separated token, which drops a trailing
/// time-of-day, then tries each supported format. Anything unparsable is
/// `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let token = raw.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
}

/// Best-effort numeric parsing, tolerating currency formatting like
/// `$1,200.50`.
fn parse_value(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned.trim().parse::<f64>().ok()
}
