use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    get,
    middleware::from_fn,
    post, web, HttpResponse,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::{
    auth_token::{AuthTokenError, AuthTokenService, ClaimsPayload, SessionClaims},
    error::{BookingServerError, Result},
    middleware::{auth_middleware, TOKEN_COOKIE},
};

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Cross-site cookie so a separately hosted frontend can send it back.
fn session_cookie(value: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, value)
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(max_age)
        .finish()
}

#[post("/jwt-auth")]
pub async fn issue_token(
    req: web::Json<ClaimsPayload>,
    auth_tokens: web::Data<AuthTokenService>,
) -> Result<HttpResponse> {
    let claims = req.into_inner();
    let claim_count = claims.len();

    let token = auth_tokens
        .issue(claims)
        .map_err(BookingServerError::TokenIssue)?;

    log::debug!("Issued session token with {} claims", claim_count);

    let max_age = i64::try_from(auth_tokens.ttl().as_secs())
        .map(Duration::seconds)
        .map_err(|_| BookingServerError::TokenIssue(AuthTokenError::InvalidTtl))?;
    let response = SuccessResponse { success: true };

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, max_age))
        .json(response))
}

#[post("/logout")]
pub async fn logout() -> Result<HttpResponse> {
    log::info!("Session cookie cleared");

    let response = SuccessResponse { success: true };

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(String::new(), Duration::seconds(0)))
        .json(response))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub success: bool,
    pub claims: ClaimsPayload,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[get("/api/v1/session", wrap = "from_fn(auth_middleware)")]
pub async fn current_session(session: web::ReqData<SessionClaims>) -> Result<HttpResponse> {
    let session = session.into_inner();

    let response = SessionResponse {
        success: true,
        issued_at: Utc.timestamp_millis_opt(session.issued_at_ms as i64).single(),
        expires_at: Utc.timestamp_millis_opt(session.expires_at_ms as i64).single(),
        claims: session.claims,
    };

    Ok(HttpResponse::Ok().json(response))
}
