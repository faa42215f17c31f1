use crate::assets::AssetRecord;
use crate::mail::Mailer;
use serde::Serialize;
use tracing::warn;

/// Aggregate outcome of one alert run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Send one expiry alert per record, sequentially, at most once each.
///
/// A failed send is counted and the loop moves on; re-running the dispatch is
/// safe because alerts are informational. Records with no owner email or no
/// expiry date have nothing to address, so they count as failures too.
pub async fn dispatch_alerts(expiring: &[AssetRecord], mailer: &dyn Mailer) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    for record in expiring {
        let (Some(owner), Some(expiry)) = (record.owner_email.as_deref(), record.expiry_date)
        else {
            warn!(
                "Skipping alert for {}: no owner email or expiry date",
                record.name
            );
            summary.failed += 1;
            continue;
        };

        match mailer.send_expiry_alert(owner, &record.name, expiry).await {
            Ok(()) => summary.sent += 1,
            Err(err) => {
                warn!("Failed to send alert for {} to {}: {}", record.name, owner, err);
                summary.failed += 1;
            }
        }
    }

    summary
}
