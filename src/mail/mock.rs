use crate::error::AppError;
use crate::health::{HealthCheckResult, HealthChecker};
use crate::mail::Mailer;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Controls how the mock responds to sends.
#[derive(Clone, Copy, Debug)]
pub enum MockSendMode {
    AlwaysSucceed,
    AlwaysFail,
    /// Fail every odd-indexed call (0-based), succeed the rest.
    FailOddCalls,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentAlert {
    pub to: String,
    pub asset_name: String,
    pub expiry_date: NaiveDate,
}

/// Mailer test double recording every attempted send.
pub struct MockMailer {
    mode: MockSendMode,
    calls: Mutex<Vec<SentAlert>>,
    counter: AtomicUsize,
}

impl MockMailer {
    pub fn new(mode: MockSendMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
            counter: AtomicUsize::new(0),
        }
    }

    /// Every attempted send, in call order, regardless of outcome.
    pub fn calls(&self) -> Vec<SentAlert> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new(MockSendMode::AlwaysSucceed)
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_expiry_alert(
        &self,
        to: &str,
        asset_name: &str,
        expiry_date: NaiveDate,
    ) -> Result<(), AppError> {
        let index = self.counter.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(SentAlert {
            to: to.to_string(),
            asset_name: asset_name.to_string(),
            expiry_date,
        });

        let fail = match self.mode {
            MockSendMode::AlwaysSucceed => false,
            MockSendMode::AlwaysFail => true,
            MockSendMode::FailOddCalls => index % 2 == 1,
        };

        if fail {
            Err(AppError::Mail(format!("mock send failure for {}", to)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HealthChecker for MockMailer {
    fn name(&self) -> &str {
        "mail"
    }

    async fn check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy()
    }
}
