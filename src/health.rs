use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub duration_ms: Option<u64>,
}

impl HealthCheckResult {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: None,
            duration_ms: None,
        }
    }

    pub fn degraded(message: String) -> Self {
        Self {
            status: HealthStatus::Degraded,
            message: Some(message),
            duration_ms: None,
        }
    }

    pub fn unhealthy(message: String) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: Some(message),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// A component that can report its own health (storage, mail transport).
#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// The name of this health check component
    fn name(&self) -> &str;

    /// Perform the health check
    async fn check(&self) -> HealthCheckResult;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallHealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub checks: HashMap<String, HealthCheckResult>,
}

/// Registry of component health checkers, aggregated into one response.
/// Worst component status wins.
pub struct HealthService {
    checkers: Arc<RwLock<HashMap<String, Arc<dyn HealthChecker>>>>,
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            checkers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn register(&self, checker: Arc<dyn HealthChecker>) {
        let name = checker.name().to_string();
        self.checkers.write().await.insert(name, checker);
    }

    /// Run component checks and aggregate. With `run_checks` false only the
    /// basic liveness response is produced, which keeps the endpoint cheap
    /// for load balancer probes.
    pub async fn check_health(&self, run_checks: bool) -> OverallHealthResponse {
        let mut results = HashMap::new();

        if run_checks {
            let checkers = self.checkers.read().await;
            for (name, checker) in checkers.iter() {
                let start = Instant::now();
                let result = checker.check().await;
                let duration = start.elapsed().as_millis() as u64;
                results.insert(name.clone(), result.with_duration(duration));
            }
        }

        let unhealthy = results
            .values()
            .any(|r| matches!(r.status, HealthStatus::Unhealthy));
        let degraded = results
            .values()
            .any(|r| matches!(r.status, HealthStatus::Degraded));
        let overall_status = if unhealthy {
            HealthStatus::Unhealthy
        } else if degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        OverallHealthResponse {
            status: overall_status,
            service: "asset-expiry-dashboard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            checks: results,
        }
    }

    pub async fn registered_checkers(&self) -> Vec<String> {
        self.checkers.read().await.keys().cloned().collect()
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HealthyChecker;

    #[async_trait]
    impl HealthChecker for HealthyChecker {
        fn name(&self) -> &str {
            "healthy_component"
        }

        async fn check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy()
        }
    }

    struct UnhealthyChecker;

    #[async_trait]
    impl HealthChecker for UnhealthyChecker {
        fn name(&self) -> &str {
            "unhealthy_component"
        }

        async fn check(&self) -> HealthCheckResult {
            HealthCheckResult::unhealthy("component down".to_string())
        }
    }

    #[tokio::test]
    async fn test_empty_service_is_healthy() {
        let service = HealthService::new();
        let response = service.check_health(true).await;
        assert!(matches!(response.status, HealthStatus::Healthy));
        assert!(response.checks.is_empty());
    }

    #[tokio::test]
    async fn test_worst_status_wins() {
        let service = HealthService::new();
        service.register(Arc::new(HealthyChecker)).await;
        service.register(Arc::new(UnhealthyChecker)).await;

        let response = service.check_health(true).await;
        assert!(matches!(response.status, HealthStatus::Unhealthy));
        assert_eq!(response.checks.len(), 2);
    }

    #[tokio::test]
    async fn test_basic_probe_skips_component_checks() {
        let service = HealthService::new();
        service.register(Arc::new(UnhealthyChecker)).await;

        let response = service.check_health(false).await;
        assert!(matches!(response.status, HealthStatus::Healthy));
        assert!(response.checks.is_empty());
    }

    #[tokio::test]
    async fn test_register_lists_checkers() {
        let service = HealthService::new();
        service.register(Arc::new(HealthyChecker)).await;

        let names = service.registered_checkers().await;
        assert_eq!(names, vec!["healthy_component".to_string()]);
    }
}
