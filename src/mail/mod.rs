pub mod dispatcher;
pub mod mock;

pub use dispatcher::{DispatchSummary, dispatch_alerts};
pub use mock::{MockMailer, MockSendMode};

use crate::config::{AwsConfig, MailConfig};
use crate::error::AppError;
use crate::health::{HealthCheckResult, HealthChecker};
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_sesv2 as ses;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use chrono::NaiveDate;

/// Mail transport seam. The dispatcher only depends on this trait; transport
/// details live behind it.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_expiry_alert(
        &self,
        to: &str,
        asset_name: &str,
        expiry_date: NaiveDate,
    ) -> Result<(), AppError>;
}

/// Production mailer sending expiry alerts through AWS SESv2.
pub struct SesMailer {
    client: ses::Client,
    sender: String,
}

impl SesMailer {
    /// Build the SES client from configuration. Explicit credentials win over
    /// the profile/environment chain when both are configured.
    pub async fn new(aws: &AwsConfig, mail: &MailConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(aws.region.clone()));

        if let (Some(key), Some(secret)) = (&aws.access_key_id, &aws.secret_access_key) {
            loader = loader.credentials_provider(Credentials::from_keys(key, secret, None));
        } else if let Some(profile) = &aws.profile {
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;
        Self {
            client: ses::Client::new(&sdk_config),
            sender: mail.sender.clone(),
        }
    }

    fn alert_subject(asset_name: &str) -> String {
        format!("Alert: {} is Expiring Soon", asset_name)
    }

    fn alert_body(asset_name: &str, expiry_date: NaiveDate) -> String {
        format!(
            "Dear User,\n\nYour asset '{}' is expiring on {}. Please take necessary action.\n\nBest Regards,\nIT Asset Management Team",
            asset_name, expiry_date
        )
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send_expiry_alert(
        &self,
        to: &str,
        asset_name: &str,
        expiry_date: NaiveDate,
    ) -> Result<(), AppError> {
        let destination = Destination::builder().to_addresses(to).build();

        let subject = Content::builder()
            .data(Self::alert_subject(asset_name))
            .charset("UTF-8")
            .build()
            .map_err(|e| AppError::Mail(format!("building subject: {}", e)))?;

        let body_text = Content::builder()
            .data(Self::alert_body(asset_name, expiry_date))
            .charset("UTF-8")
            .build()
            .map_err(|e| AppError::Mail(format!("building body: {}", e)))?;

        let message = Message::builder()
            .subject(subject)
            .body(Body::builder().text(body_text).build())
            .build();

        self.client
            .send_email()
            .from_email_address(&self.sender)
            .destination(destination)
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl HealthChecker for SesMailer {
    fn name(&self) -> &str {
        "mail"
    }

    async fn check(&self) -> HealthCheckResult {
        if self.sender.is_empty() {
            HealthCheckResult::degraded("No sender address configured".to_string())
        } else {
            HealthCheckResult::healthy()
        }
    }
}
