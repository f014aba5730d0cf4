use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, HttpMessage,
};

use crate::auth_token::{AuthTokenService, SessionClaims};
use crate::error::BookingServerError;

/// Cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

/// Answers 401 when the token cookie is missing and 403 when it does not
/// verify; the wrapped handler never runs in either case. Otherwise stores
/// the decoded `SessionClaims` in the request extensions for `web::ReqData`.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let session = match authenticate(&req) {
        Ok(session) => session,
        Err(err) => return Ok(req.error_response(err).map_into_right_body()),
    };

    req.extensions_mut().insert(session);

    next.call(req)
        .await
        .map(ServiceResponse::map_into_left_body)
}

fn authenticate(req: &ServiceRequest) -> Result<SessionClaims, BookingServerError> {
    // Extract token from cookie
    let token = req
        .cookie(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(BookingServerError::AuthMissing)?;

    // Get AuthTokenService from app data
    let auth_tokens = req
        .app_data::<web::Data<AuthTokenService>>()
        .ok_or_else(|| {
            BookingServerError::Internal("auth token service not configured".to_string())
        })?;

    auth_tokens.verify(&token).map_err(|err| {
        log::warn!("Rejected session token on {}: {}", req.path(), err);
        BookingServerError::AuthInvalid(err)
    })
}
