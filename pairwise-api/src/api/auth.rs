//! Authentication endpoints and bearer middleware
//!
//! Login and access-code verification are the only unauthenticated
//! endpoints besides /health; everything else passes through
//! `auth_middleware`, which validates the bearer token before the
//! handler runs.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Json,
};
use pairwise_common::types::{
    AccessCodeRequest, AccessCodeResponse, AuthCheckResponse, LoginRequest, LoginResponse,
    MessageResponse, UserInfo,
};
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Role reported for the authenticated demo identity
const USER_ROLE: &str = "election-official";

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Bearer-token middleware for protected routes
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).map(str::to_owned);
    {
        let session = state.session.lock().await;
        if let Err(e) = session.authenticate(token.as_deref()) {
            warn!(path = %request.uri().path(), "rejected unauthenticated request");
            return Err(ApiError(e));
        }
    }

    Ok(next.run(request).await)
}

/// POST /pairwise/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let mut session = state.session.lock().await;
    session.verify_credentials(&req.username, &req.one_time_password)?;

    Ok(Json(LoginResponse {
        status: "success".to_string(),
        message: "TOTP Verified. Check your email for the access code.".to_string(),
        next_step: "access_code".to_string(),
        access_code_expiry: "10 minutes".to_string(),
    }))
}

/// POST /pairwise/verify-access-code
pub async fn verify_access_code(
    State(state): State<AppState>,
    Json(req): Json<AccessCodeRequest>,
) -> ApiResult<Json<AccessCodeResponse>> {
    let mut session = state.session.lock().await;
    let token = session.verify_access_code(&req.access_code)?;

    Ok(Json(AccessCodeResponse {
        status: "success".to_string(),
        message: "Access code verified successfully.".to_string(),
        next_step: "authenticated".to_string(),
        session_expiry: "60 minutes".to_string(),
        token,
    }))
}

/// GET /pairwise/auth-check (protected)
pub async fn auth_check(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<Json<AuthCheckResponse>> {
    let token = bearer_token(&request).map(str::to_owned);
    let session = state.session.lock().await;
    let subject = session.authenticate(token.as_deref())?;

    Ok(Json(AuthCheckResponse {
        authenticated: true,
        user: UserInfo {
            username: subject,
            role: USER_ROLE.to_string(),
        },
    }))
}

/// POST /pairwise/logout (public, idempotent)
///
/// Ends the session and wipes the file registry regardless of whether a
/// valid token accompanies the request, so repeated logouts always
/// succeed.
pub async fn logout(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    {
        let mut registry = state.registry.lock().await;
        registry.clear_all()?;
    }
    let mut session = state.session.lock().await;
    session.logout();

    Ok(Json(MessageResponse::new("Logged out.")))
}
