//! Authentication, liveness and CORS tests.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};

use antivirus_api::server::{CredentialVerifier, RouterConfig};

use super::test_utils::{
    authed_get, basic_header, body_bytes, body_json, get, organization, send, test_config,
    test_router, test_router_with, MockDirectoryStore, TEST_PASSWORD, TEST_USER,
};

fn directory() -> MockDirectoryStore {
    MockDirectoryStore::new().with_organization(organization(1, "Red Cross"))
}

fn get_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

// =============================================================================
// Basic Authentication
// =============================================================================

#[tokio::test]
async fn test_missing_credentials_rejected() {
    let store = directory();
    let response = send(test_router(store.clone()), get("/getOrg")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"Please enter valid username and password\""
    );
    assert_eq!(
        body_bytes(response).await,
        b"You are Unauthorized to access the application.\n"
    );
    assert_eq!(store.query_count(), 0);
}

#[tokio::test]
async fn test_wrong_credentials_rejected() {
    for authorization in [
        basic_header(TEST_USER, "wrong"),
        basic_header("root", TEST_PASSWORD),
        basic_header("", ""),
        "Bearer token".to_string(),
        "Basic not-base64!".to_string(),
    ] {
        let store = directory();
        let response = send(
            test_router(store.clone()),
            get_with_auth("/getOrg", &authorization),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", authorization);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
        assert_eq!(store.query_count(), 0);
    }
}

#[tokio::test]
async fn test_valid_credentials_accepted() {
    let store = directory();
    let response = send(test_router(store.clone()), authed_get("/getOrg")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn test_custom_realm() {
    let config = test_config().with_auth_realm("Directory");
    let response = send(test_router_with(directory(), config), get("/getOrg")).await;

    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"Directory\""
    );
}

struct AllowReaders;

impl CredentialVerifier for AllowReaders {
    fn verify(&self, user: &str, _password: &str) -> bool {
        user.starts_with("reader-")
    }
}

#[tokio::test]
async fn test_custom_verifier() {
    let config = RouterConfig::new(AllowReaders).with_tracing(false);
    let router = test_router_with(directory(), config);

    let response = send(
        router.clone(),
        get_with_auth("/getOrg", &basic_header("reader-1", "anything")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(router, authed_get("/getOrg")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_routes_need_no_credentials() {
    let router = test_router(directory());

    for uri in ["/", "/health", "/getQuaratineBuildingCount", "/getQuaratineBuildingList"] {
        let response = send(router.clone(), get(uri)).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
    }
}

// =============================================================================
// Liveness
// =============================================================================

#[tokio::test]
async fn test_index_pings_database() {
    let store = directory();
    let response = send(test_router(store.clone()), get("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"Databases:\nAPI Running");
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn test_index_database_down() {
    let response = send(test_router(directory().failing()), get("/")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Internal Error");
}

#[tokio::test]
async fn test_health_skips_database() {
    let store = directory().failing();
    let response = send(test_router(store.clone()), get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(store.query_count(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = send(test_router(directory()), get("/getOrganisations")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// CORS
// =============================================================================

fn cross_origin(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_any_origin() {
    let response = send(
        test_router(directory()),
        cross_origin("/getQuaratineBuildingCount", "https://site.example"),
    )
    .await;

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
    assert!(!response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
}

#[tokio::test]
async fn test_cors_credentialed_origin() {
    let config = test_config()
        .with_credentialed_origins(vec!["https://admin.example".to_string()]);
    let router = test_router_with(directory(), config);

    let response = send(
        router.clone(),
        cross_origin("/getQuaratineBuildingCount", "https://admin.example"),
    )
    .await;
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://admin.example"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );

    // Other origins are still served, without credentials
    let response = send(
        router,
        cross_origin("/getQuaratineBuildingCount", "https://site.example"),
    )
    .await;
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://site.example"
    );
    assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
}

#[tokio::test]
async fn test_cors_preflight_allows_authorization() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/getOrg")
        .header(header::ORIGIN, "https://site.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();

    let response = send(test_router(directory()), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_lowercase();
    assert!(allowed.contains("authorization"));
}
