use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use admin_fetch::{
    ApiConfig, AuthenticatedHttpClient, BrandingId, BrandingInput, BrandingService, ClientConfig,
    CredentialPair, CredentialStore, Error, HttpTokenRefresher, ListQuery, MemoryCredentialStore,
    RequestDescriptor, ReqwestTransport, Transport, TransportError,
};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

type Client = AuthenticatedHttpClient<ReqwestTransport, MemoryCredentialStore, HttpTokenRefresher>;

struct TestContext {
    server: MockServer,
    api: ApiConfig,
    store: Arc<MemoryCredentialStore>,
}

impl TestContext {
    async fn new() -> Self {
        init_logging();
        let server = MockServer::start().await;
        let api = ApiConfig::new(format!("{}/api", server.uri()).parse().unwrap())
            .with_timeout(Duration::from_millis(500));
        let store = Arc::new(MemoryCredentialStore::new(CredentialPair::new(
            "old-access",
            "old-refresh",
        )));
        Self { server, api, store }
    }

    fn client(&self, config: ClientConfig) -> Client {
        AuthenticatedHttpClient::with_config(
            ReqwestTransport::from_config(&self.api).unwrap(),
            self.store.clone(),
            HttpTokenRefresher::from_config(&self.api).unwrap(),
            config,
        )
    }

    async fn mock_refresh_success(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .and(body_json(json!({
                "accessToken": "old-access",
                "refreshToken": "old-refresh"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "accessToken": "new-access",
                        "refreshToken": "new-refresh"
                    }))
                    // Let every concurrent 403 land before the refresh settles.
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    async fn mock_expired_for_old_token(&self) {
        Mock::given(header("authorization", "Bearer old-access"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "access token expired"
            })))
            .mount(&self.server)
            .await;
    }
}

fn branding_json(id: &str, name: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "createdAt": "2025-03-01T12:00:00Z" })
}

#[tokio::test]
async fn test_transport_sends_query_body_and_headers() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/brandings/search"))
        .and(query_param("page", "2"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "name": "Acme" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let transport = ReqwestTransport::from_config(&ctx.api).unwrap();
    let request = RequestDescriptor::post("/brandings/search")
        .with_query("page", 2)
        .with_json(&json!({ "name": "Acme" }))
        .unwrap();
    let response = transport.send(request).await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data, json!({ "ok": true }));
}

#[tokio::test]
async fn test_transport_times_out() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&ctx.server)
        .await;

    let transport = ReqwestTransport::from_config(&ctx.api).unwrap();
    let err = transport
        .send(RequestDescriptor::get("slow"))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_request_retried() {
    let ctx = TestContext::new().await;
    ctx.mock_expired_for_old_token().await;
    ctx.mock_refresh_success().await;
    Mock::given(method("GET"))
        .and(path("/api/brandings"))
        .and(header("authorization", "Bearer new-access"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [branding_json("b-1", "Acme"), branding_json("b-2", "Globex")],
            "pagination": { "totalRecords": 2, "totalPages": 1 },
            "page": 1
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let refreshed = Arc::new(AtomicUsize::new(0));
    let counter = refreshed.clone();
    let service = BrandingService::new(ctx.client(
        ClientConfig::for_api(&ctx.api).with_on_refresh_success(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    ));

    let listing = service.list(&ListQuery::default()).await.unwrap();

    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.items[1].name, "Globex");
    assert_eq!(listing.soft_error(), None);
    assert_eq!(refreshed.load(Ordering::SeqCst), 1);
    assert_eq!(
        ctx.store.credentials(),
        Some(CredentialPair::new("new-access", "new-refresh"))
    );
}

#[tokio::test]
async fn test_concurrent_requests_share_one_refresh() {
    let ctx = TestContext::new().await;
    ctx.mock_expired_for_old_token().await;
    ctx.mock_refresh_success().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer new-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(branding_json("b-1", "Acme")))
        .expect(5)
        .mount(&ctx.server)
        .await;

    let service = BrandingService::new(ctx.client(ClientConfig::for_api(&ctx.api)));
    let id = BrandingId::from("b-1".to_string());

    let results = futures::future::join_all((0..5).map(|_| service.get(&id))).await;

    for result in results {
        assert_eq!(result.unwrap().name, "Acme");
    }
    // `expect(1)` on the refresh mock is verified when the server drops.
}

#[tokio::test]
async fn test_refresh_rejection_signs_out() {
    let ctx = TestContext::new().await;
    ctx.mock_expired_for_old_token().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "refresh token revoked"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let store = ctx.store.clone();
    let client = ctx.client(ClientConfig::for_api(&ctx.api).with_on_refresh_failure(move |_| {
        store.clear();
    }));

    let err = client.get("brandings").await.unwrap_err();

    match err {
        Error::AuthenticationExpired(e) => {
            assert_eq!(e.status(), Some(401));
            assert!(e.message().contains("refresh token revoked"), "{}", e.message());
        }
        other => panic!("expected AuthenticationExpired, got {other:?}"),
    }
    assert_eq!(ctx.store.credentials(), None);
}

#[tokio::test]
async fn test_listing_backend_error_becomes_soft_error() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/brandings"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Export failed"
        })))
        .mount(&ctx.server)
        .await;

    let service = BrandingService::new(ctx.client(ClientConfig::for_api(&ctx.api)));
    let listing = service.list(&ListQuery::page(3)).await.unwrap();

    assert!(listing.is_empty());
    assert_eq!(listing.page, 3);
    assert_eq!(listing.soft_error(), Some("Export failed"));
}

#[tokio::test]
async fn test_branding_mutations() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/brandings"))
        .and(header("authorization", "Bearer old-access"))
        .and(body_json(json!({ "name": "Acme", "logoUrl": "https://cdn.example.com/acme.png" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(branding_json("b-9", "Acme")))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/brandings/b-9"))
        .and(body_json(json!({ "name": "Acme Corp" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(branding_json("b-9", "Acme Corp")))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/brandings/b-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/brandings/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Not Found" })))
        .mount(&ctx.server)
        .await;

    let service = BrandingService::new(ctx.client(ClientConfig::for_api(&ctx.api)));

    let created = service
        .create(&BrandingInput::new("Acme").with_logo_url("https://cdn.example.com/acme.png"))
        .await
        .unwrap();
    assert_eq!(created.id, BrandingId::from("b-9".to_string()));

    let updated = service
        .update(&created.id, &BrandingInput::new("Acme Corp"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Acme Corp");

    service.delete(&created.id).await.unwrap();

    let err = service
        .get(&BrandingId::from("missing".to_string()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Api { status: 404, ref message } if message == "Not Found"),
        "got {err:?}"
    );
}
