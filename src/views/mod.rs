pub mod notepad;
#[cfg(test)]
mod test_app;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::ServiceExt;
use axum::extract::FromRef;
use axum::extract::Json;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;
use tower::Layer as _;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePath;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db;
use crate::db::DbPool;
use crate::error::Result;
use crate::error::ViewError;
use crate::models::User;

/// Header through which the authentication gateway forwards the issuer's
/// identity, here the user's email.
const USER_IDENTITY_HEADER: &str = "x-remote-user-identity";

fn service_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/notepad", get(notepad::list))
        .route("/notepad", post(notepad::create))
        .route("/notepad/create", get(notepad::create_form))
        .route("/notepad/{notepad_id}", get(notepad::get))
}

/// Represents the issuer of a request, as reported by the authentication
/// gateway in front of the service.
#[derive(Debug, Clone)]
pub enum Authentication {
    /// The issuer of the request did not provide any recognized identity.
    Unauthenticated,
    /// The gateway forwarded an identity that maps to a known user.
    Authenticated(User),
}

impl Authentication {
    /// Returns the current user, or `Unauthorized` for anonymous requests.
    fn user(&self) -> Result<&User, AuthorizationError> {
        match self {
            Authentication::Authenticated(user) => Ok(user),
            Authentication::Unauthenticated => Err(AuthorizationError::Unauthorized),
        }
    }
}

pub type AuthenticationExt = axum::extract::Extension<Authentication>;

async fn authenticate(
    headers: &axum::http::HeaderMap,
    db_pool: &DbPool,
) -> Result<Authentication, AuthorizationError> {
    let Some(identity) = headers.get(USER_IDENTITY_HEADER) else {
        return Ok(Authentication::Unauthenticated);
    };
    let email = identity
        .to_str()
        .map_err(|_| AuthorizationError::Unauthorized)?;
    match User::find_by_email(db_pool, email).await? {
        Some(user) => Ok(Authentication::Authenticated(user)),
        // The gateway is the authority on identities; one this service cannot
        // resolve owns no notepads and stays anonymous.
        None => Ok(Authentication::Unauthenticated),
    }
}

async fn authentication_middleware(
    State(AppState { db_pool, .. }): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let authentication = authenticate(req.headers(), &db_pool).await?;
    req.extensions_mut().insert(authentication);
    Ok(next.run(req).await)
}

#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("the request is not authenticated")]
    Unauthorized,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ViewError for AuthorizationError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::Unauthorized => "notepad:authn:Unauthorized",
            Self::Database(_) => "notepad:authn:Database",
        }
    }
}

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
enum AppHealthError {
    #[error("timed out while checking database health")]
    Timeout,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ViewError for AppHealthError {
    fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::Timeout => "notepad:app_health:Timeout",
            Self::Database(_) => "notepad:app_health:Database",
        }
    }
}

async fn health(State(AppState { db_pool, .. }): State<AppState>) -> Result<&'static str> {
    timeout(HEALTH_CHECK_TIMEOUT, db::ping(&db_pool))
        .await
        .map_err(|_| AppHealthError::Timeout)?
        .map_err(AppHealthError::Database)?;
    Ok("ok")
}

#[derive(Debug, Serialize)]
struct Version {
    git_describe: Option<String>,
}

async fn version(State(AppState { config, .. }): State<AppState>) -> Json<Version> {
    Json(Version {
        git_describe: config.app_version.clone(),
    })
}

pub struct ServerConfig {
    pub port: u16,
    pub address: String,
    pub database_url: String,
    pub pool_size: u32,
    pub app_version: Option<String>,
}

/// The state of the whole service, available to all handlers
///
/// If only the database is needed, use `State<DbPool>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub db_pool: DbPool,
}

impl FromRef<AppState> for DbPool {
    fn from_ref(input: &AppState) -> Self {
        input.db_pool.clone()
    }
}

impl AppState {
    async fn init(config: ServerConfig) -> anyhow::Result<Self> {
        let db_pool = db::connect(&config.database_url, config.pool_size).await?;
        Ok(Self {
            db_pool,
            config: Arc::new(config),
        })
    }
}

pub struct Server {
    app_state: AppState,
    router: NormalizePath<Router>,
}

impl Server {
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        info!("Building server...");
        let app_state = AppState::init(config).await?;

        let cors = CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any);

        // Configure the axum router
        let router: Router<()> = axum::Router::<AppState>::new()
            .merge(service_router())
            .route_layer(axum::middleware::from_fn_with_state(
                app_state.clone(),
                authentication_middleware,
            ))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(app_state.clone());
        let normalizing_router = NormalizePathLayer::trim_trailing_slash().layer(router);

        Ok(Self {
            app_state,
            router: normalizing_router,
        })
    }

    pub async fn start(self) -> std::io::Result<()> {
        let Self { app_state, router } = self;
        let ServerConfig { address, port, .. } = app_state.config.as_ref();

        info!("Running server...");
        let service = ServiceExt::<Request>::into_make_service(router);
        let listener = tokio::net::TcpListener::bind((address.as_str(), *port)).await?;
        axum::serve(listener, service).await
    }
}
