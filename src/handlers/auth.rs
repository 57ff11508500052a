use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{CredentialsForm, MessageResponse, TokenResponse};

pub async fn handle_register(
    State(state): State<AppState>,
    WithRejection(Json(form), _): WithRejection<Json<CredentialsForm>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state.auth.register(&form.username, &form.password).await?;

    Ok(Json(MessageResponse {
        message: "Registered successfully".into(),
    }))
}

pub async fn handle_login(
    State(state): State<AppState>,
    WithRejection(Json(form), _): WithRejection<Json<CredentialsForm>, AppError>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.auth.login(&form.username, &form.password).await?;
    Ok(Json(TokenResponse { token }))
}
