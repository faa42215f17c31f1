use crate::{
    config::Config,
    error::AppError,
    health::HealthService,
    mail::{Mailer, SesMailer},
    metrics,
    routes::{
        create_alert_routes, create_asset_routes, create_dashboard_routes, create_health_routes,
    },
    shutdown::ShutdownCoordinator,
    storage::{FilesystemStore, UploadStore},
};
use axum::{Router, extract::DefaultBodyLimit, middleware};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Maximum upload size (10MB)
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub store: Arc<dyn UploadStore>,
    pub mailer: Arc<dyn Mailer>,
    pub health_service: Arc<HealthService>,
    pub shutdown_coordinator: Arc<ShutdownCoordinator>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        // Initialize metrics if enabled
        if config.metrics.enabled {
            match metrics::init_metrics_with_port(config.metrics.port) {
                Ok(_handle) => {
                    info!("Metrics exporter started on port {}", config.metrics.port);
                }
                Err(e) => {
                    error!(
                        "Failed to start metrics exporter on port {}: {}",
                        config.metrics.port, e
                    );
                    return Err(AppError::Internal(format!(
                        "Failed to start metrics exporter: {}",
                        e
                    )));
                }
            }
        }

        let store_impl = Arc::new(FilesystemStore::new(&config.storage.upload_dir)?);
        let store: Arc<dyn UploadStore> = store_impl.clone();

        let mailer_impl = Arc::new(SesMailer::new(&config.aws, &config.mail).await);
        let mailer: Arc<dyn Mailer> = mailer_impl.clone();

        let health_service = Arc::new(HealthService::new());
        health_service.register(store_impl).await;
        health_service.register(mailer_impl).await;

        Ok(Self {
            config: Arc::new(config),
            store,
            mailer,
            health_service,
            shutdown_coordinator: Arc::new(ShutdownCoordinator::new()),
        })
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let app = self.create_app();

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.server.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to address: {}", e)))?;

        info!("Server listening on http://{}", addr);

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        tokio::spawn(async move {
            shutdown_coordinator.wait_for_shutdown_signal().await;
        });

        let mut shutdown_rx = self.shutdown_coordinator.subscribe();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
                info!("Graceful shutdown initiated");
            })
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Creates the application router
    pub fn create_app(&self) -> Router {
        let mut app = Router::new()
            .merge(create_asset_routes().layer(DefaultBodyLimit::max(MAX_BODY_SIZE)))
            .merge(create_dashboard_routes())
            .merge(create_alert_routes())
            .merge(create_health_routes())
            .with_state(self.clone());

        if self.config.metrics.enabled {
            app = app.layer(middleware::from_fn(metrics::metrics_middleware));
        }
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestServerBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/nonexistent")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_view_missing_file_is_404() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/assets/missing.csv")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
