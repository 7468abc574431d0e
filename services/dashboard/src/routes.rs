//! Dashboard routes

use access::{
    Identity, LoginResult, NavigationLog, RoleGate,
    navigation::{self, Page},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    client::{current_client, ensure_client, issue_client},
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Response for a successful login
#[derive(Serialize)]
pub struct LoginResponse {
    pub identity: Identity,
    pub redirect_to: String,
}

/// Menu visible to the caller
#[derive(Serialize)]
pub struct MenuResponse {
    pub entries: Vec<&'static Page>,
}

/// Create the router for the dashboard service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/login", get(login_page))
        .route("/unauthorized", get(unauthorized_page))
        .route("/menu", get(menu))
        .route("/pages/:slug", get(page))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Response> {
    let healthy = state.backend.health_check().await?;

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    Ok((
        status,
        Json(json!({
            "status": if healthy { "ok" } else { "degraded" },
            "service": "dashboard",
            "session_backend": state.backend.kind(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
        .into_response())
}

/// Store the identity returned by the authentication backend
///
/// Every successful login moves the caller to a freshly issued client id;
/// the session under the previous id is cleared.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginResult>,
) -> ApiResult<Response> {
    info!("Login request for {}", payload.email);

    let previous = current_client(&jar);
    let (jar, client) = issue_client(jar);
    let ctx = state.context(&client).await;
    let identity = ctx.login_with(payload).await?;

    if let Some(previous) = previous {
        state.session_store(&previous).clear().await?;
    }

    let response = LoginResponse {
        identity,
        redirect_to: ctx.home_path(),
    };

    Ok((jar, Json(response)).into_response())
}

/// Sign the caller out and send them to the login page
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Response> {
    let (jar, client) = ensure_client(jar);
    let ctx = state.context(&client).await;
    let nav = NavigationLog::new();

    ctx.logout(&nav).await?;

    let target = nav.last().unwrap_or_else(|| state.access.login_path.clone());
    Ok((jar, Redirect::to(&target)).into_response())
}

/// Current identity, or `null` when signed out
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = ensure_client(jar);
    let ctx = state.context(&client).await;

    (jar, Json(json!({ "identity": ctx.current() }))).into_response()
}

pub async fn login_page() -> impl IntoResponse {
    Json(json!({
        "page": "login",
        "title": "Sign in",
    }))
}

/// Access Denied notice
pub async fn unauthorized_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = ensure_client(jar);
    let ctx = state.context(&client).await;

    let body = json!({
        "page": "unauthorized",
        "title": "Access Denied",
        "message": "You do not have permission to view this page.",
        "role": ctx.current().map(|identity| identity.role),
        "actions": [
            { "action": "go_back" },
            { "action": "logout", "method": "POST", "path": "/auth/logout" },
        ],
    });

    (StatusCode::FORBIDDEN, jar, Json(body)).into_response()
}

/// Menu entries the caller may open
pub async fn menu(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = ensure_client(jar);
    let ctx = state.context(&client).await;
    let identity = ctx.current();

    let entries = navigation::visible_pages(identity.as_ref()).collect();

    (jar, Json(MenuResponse { entries })).into_response()
}

/// A gated dashboard page
pub async fn page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(slug): Path<String>,
) -> ApiResult<Response> {
    let page = navigation::find_page(&slug).ok_or(ApiError::NotFound)?;

    let (jar, client) = ensure_client(jar);
    let ctx = state.context(&client).await;
    let nav = NavigationLog::new();
    let mut gate = RoleGate::new(&ctx, page.allowed);

    let rendered = gate.render(&nav, || {
        Json(json!({
            "page": page.slug,
            "title": page.title,
            "path": page.path,
        }))
    });

    let response = match rendered {
        Some(body) => (jar, body).into_response(),
        None => {
            let target = nav.last().unwrap_or_else(|| state.access.login_path.clone());
            (jar, Redirect::to(&target)).into_response()
        }
    };

    Ok(response)
}
