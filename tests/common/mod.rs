use asset_expiry_dashboard::{
    Server,
    mail::{MockMailer, MockSendMode},
    test_utils::TestServerBuilder,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::Request,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const MULTIPART_BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Unified test harness wiring the app with in-memory storage and a mock
/// mailer.
pub struct TestHarness {
    pub server: Server,
    pub app: Router,
    pub mailer: Arc<MockMailer>,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_mail_mode(MockSendMode::AlwaysSucceed).await
    }

    pub async fn with_mail_mode(mode: MockSendMode) -> Self {
        let (server, mailer) = TestServerBuilder::new()
            .with_mail_mode(mode)
            .build_with_mailer()
            .await;
        let app = server.create_app();

        Self {
            server,
            app,
            mailer,
        }
    }

    /// Store a sheet directly, bypassing the upload endpoint.
    #[allow(dead_code)]
    pub async fn seed_upload(&self, filename: &str, csv: &str) {
        self.server.store.save(filename, csv.as_bytes()).await.unwrap();
    }

    /// Make request using the test app
    pub async fn make_request(&self, request: Request<Body>) -> axum::response::Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.make_request(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    #[allow(dead_code)]
    pub async fn post(&self, uri: &str) -> axum::response::Response {
        self.make_request(
            Request::builder()
                .uri(uri)
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Upload a CSV through the multipart endpoint.
    #[allow(dead_code)]
    pub async fn upload(&self, filename: &str, csv: &str) -> axum::response::Response {
        self.make_request(RequestBuilder::upload(filename, csv)).await
    }
}

/// Request builders shared across the suites.
pub struct RequestBuilder;

impl RequestBuilder {
    /// Multipart upload request with a single `file` field.
    pub fn upload(filename: &str, csv: &str) -> Request<Body> {
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {csv}\r\n\
             --{boundary}--\r\n",
            boundary = MULTIPART_BOUNDARY,
            filename = filename,
            csv = csv,
        );

        Request::builder()
            .uri("/assets")
            .method("POST")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Multipart request whose single field is not named `file`.
    #[allow(dead_code)]
    pub fn upload_wrong_field(csv: &str) -> Request<Body> {
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"attachment\"; filename=\"assets.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {csv}\r\n\
             --{boundary}--\r\n",
            boundary = MULTIPART_BOUNDARY,
            csv = csv,
        );

        Request::builder()
            .uri("/assets")
            .method("POST")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }
}

/// Parse a response body as JSON.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// CSV fixture with expiry dates relative to today.
#[allow(dead_code)]
pub fn sheet(rows: &[(&str, &str, i64)]) -> String {
    let mut csv = String::from("Asset,Owner Email,Expiry Date,Status,Value\n");
    for (name, owner, days_out) in rows {
        let expiry = (chrono::Utc::now() + chrono::Duration::days(*days_out)).date_naive();
        csv.push_str(&format!("{},{},{},Active,100\n", name, owner, expiry));
    }
    csv
}
