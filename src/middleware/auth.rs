use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use crate::app::AppState;
use crate::errors::{AppError, AppResult};

/// Rejects requests without a valid bearer token and stores the token's
/// claims in the request extensions for handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| {
        tracing::debug!("Missing bearer token for {}", req.uri().path());
        AppError::Unauthorized("Missing authorization token".into())
    })?;

    let claims = state.auth.validate(bearer.token())?;
    tracing::trace!("Authenticated {} for {}", claims.sub, req.uri().path());

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
