pub mod alerts;
pub mod assets;
pub mod dashboard;
pub mod health;

pub use alerts::create_alert_routes;
pub use assets::create_asset_routes;
pub use dashboard::create_dashboard_routes;
pub use health::create_health_routes;

use crate::assets::AssetTable;
use crate::error::AppError;
use crate::server::Server;

/// Re-read and re-parse a stored sheet. Every view works from storage so the
/// analysis always reflects the current file and the current wall clock.
pub(crate) async fn load_table(server: &Server, filename: &str) -> Result<AssetTable, AppError> {
    let bytes = server.store.load(filename).await?;
    crate::assets::parse_asset_table(&bytes)
}
