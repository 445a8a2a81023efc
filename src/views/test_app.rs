//! Exposes [TestApp] and [TestAppBuilder] to ease the setup of the test axum
//! server, the test database, and a stand-in for the authentication gateway.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum_test::TestRequest;
use axum_test::TestServer;
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;

use super::AppState;
use super::ServerConfig;
use super::USER_IDENTITY_HEADER;
use super::authentication_middleware;
use super::service_router;
use crate::db;
use crate::db::DbPool;
use crate::models::User;

/// A builder interface for [TestApp]
///
/// Use [TestAppBuilder::default_app] to get an app over a fresh in-memory
/// database.
pub(crate) struct TestAppBuilder {
    db_pool: Option<DbPool>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self { db_pool: None }
    }

    #[allow(unused)]
    pub fn db_pool(mut self, db_pool: DbPool) -> Self {
        self.db_pool = Some(db_pool);
        self
    }

    pub fn default_app() -> TestApp {
        TestAppBuilder::new().build()
    }

    pub fn build(self) -> TestApp {
        let config = ServerConfig {
            port: 0,
            address: String::default(),
            database_url: String::from("sqlite::memory:"),
            pool_size: 1,
            app_version: None,
        };
        let db_pool = self.db_pool.unwrap_or_else(db::for_tests);

        let app_state = AppState {
            db_pool,
            config: Arc::new(config),
        };

        // Configure the axum router
        let router: Router<()> = axum::Router::<AppState>::new()
            .merge(service_router())
            .route_layer(axum::middleware::from_fn_with_state(
                app_state.clone(),
                authentication_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state.clone());

        // Run server
        let server = TestServer::new(router).expect("test server should build properly");

        TestApp {
            server,
            app_state,
            credentials: Mutex::default(),
            identity: Mutex::default(),
        }
    }
}

/// Wraps an underlying, fully configured, axum service
///
/// It also plays the authentication gateway: [TestApp::login] and
/// [TestApp::logout] decide which identity header, if any, subsequent
/// requests carry.
pub(crate) struct TestApp {
    server: TestServer,
    app_state: AppState,
    /// Credentials known to the stand-in gateway, keyed by email.
    credentials: Mutex<HashMap<String, String>>,
    /// Identity forwarded on requests while logged in.
    identity: Mutex<Option<String>>,
}

impl TestApp {
    pub fn db_pool(&self) -> DbPool {
        self.app_state.db_pool.clone()
    }

    /// Registers a user both in the service database and with the stand-in
    /// gateway.
    pub async fn register_user(&self, email: &str, password: &str) -> User {
        let user = User::create(&self.db_pool(), email, "Test User")
            .await
            .expect("user should be created");
        self.credentials
            .lock()
            .unwrap()
            .insert(email.to_owned(), password.to_owned());
        user
    }

    /// Authenticates against the stand-in gateway.
    ///
    /// On valid credentials, subsequent requests carry the user's identity
    /// header, exactly as the real gateway would forward it.
    pub fn login(&self, email: &str, password: &str) -> StatusCode {
        let valid = self.credentials.lock().unwrap().get(email).map(String::as_str) == Some(password);
        if valid {
            *self.identity.lock().unwrap() = Some(email.to_owned());
            StatusCode::OK
        } else {
            StatusCode::UNAUTHORIZED
        }
    }

    pub fn logout(&self) {
        *self.identity.lock().unwrap() = None;
    }

    pub async fn fetch(&self, req: TestRequest) -> TestResponse {
        tracing::trace!(request = ?req);
        let response = req.await;
        TestResponse::new(response)
    }

    pub fn get(&self, path: &str) -> TestRequest {
        self.with_identity(self.server.get(path))
    }

    pub fn post(&self, path: &str) -> TestRequest {
        self.with_identity(self.server.post(path))
    }

    fn with_identity(&self, req: TestRequest) -> TestRequest {
        match self.identity.lock().unwrap().as_deref() {
            Some(identity) => req.add_header(
                HeaderName::from_static(USER_IDENTITY_HEADER),
                HeaderValue::from_str(identity).expect("identity should be a valid header value"),
            ),
            None => req,
        }
    }
}

pub struct TestResponse {
    inner: axum_test::TestResponse,
}

impl TestResponse {
    fn new(inner: axum_test::TestResponse) -> Self {
        tracing::trace!(response = ?inner);
        Self { inner }
    }

    #[track_caller]
    pub fn assert_status(self, expected_status: StatusCode) -> Self {
        let actual_status = self.inner.status_code();
        if actual_status != expected_status {
            let body = self.inner.text();
            pretty_assertions::assert_eq!(
                actual_status,
                expected_status,
                "unexpected status code body={body}"
            );
            unreachable!("should have already panicked")
        } else {
            self
        }
    }

    pub fn text(&self) -> String {
        self.inner.text()
    }

    #[track_caller]
    pub fn assert_contains(self, needle: &str) -> Self {
        let body = self.inner.text();
        assert!(
            body.contains(needle),
            "response body does not contain {needle:?}: {body}"
        );
        self
    }

    #[track_caller]
    pub fn header(&self, name: &str) -> String {
        self.inner
            .header(name)
            .to_str()
            .expect("header should be valid UTF-8")
            .to_string()
    }

    #[track_caller]
    pub fn json_into<T: DeserializeOwned>(self) -> T {
        let body = self.inner.into_bytes();
        serde_json::from_slice(body.as_ref())
            .expect("could not deserialize test response into the desired type")
    }
}
