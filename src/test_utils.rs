use crate::{
    config::Config,
    health::HealthService,
    mail::{Mailer, MockMailer, MockSendMode},
    server::Server,
    shutdown::ShutdownCoordinator,
    storage::{MemoryStore, UploadStore},
};
use std::sync::Arc;

/// Test server builder wiring in-memory backends: uploads live in a
/// `MemoryStore` and mail goes to a `MockMailer`.
pub struct TestServerBuilder {
    config: Config,
    mail_mode: MockSendMode,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.metrics.enabled = false;
        Self {
            config,
            mail_mode: MockSendMode::AlwaysSucceed,
        }
    }

    /// Set a custom configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Control how the mock mailer responds to sends
    pub fn with_mail_mode(mut self, mode: MockSendMode) -> Self {
        self.mail_mode = mode;
        self
    }

    /// Build the test server; also returns the mock mailer so tests can
    /// inspect attempted sends.
    pub async fn build_with_mailer(self) -> (Server, Arc<MockMailer>) {
        let store_impl = Arc::new(MemoryStore::new());
        let store: Arc<dyn UploadStore> = store_impl.clone();

        let mailer_impl = Arc::new(MockMailer::new(self.mail_mode));
        let mailer: Arc<dyn Mailer> = mailer_impl.clone();

        let health_service = Arc::new(HealthService::new());
        health_service.register(store_impl).await;
        health_service.register(mailer_impl.clone()).await;

        let server = Server {
            config: Arc::new(self.config),
            store,
            mailer,
            health_service,
            shutdown_coordinator: Arc::new(ShutdownCoordinator::new()),
        };

        (server, mailer_impl)
    }

    pub async fn build(self) -> Server {
        self.build_with_mailer().await.0
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
