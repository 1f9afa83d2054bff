// src/handlers/auth.rs

use axum::{extract::State, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{LoginPayload, LoginResposta},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado; token JWT válido por 24h", body = LoginResposta),
        (status = 400, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResposta>, AppError> {
    payload.validate()?;
    let resposta = state.auth_service.login(&payload).await?;
    Ok(Json(resposta))
}

// GET /api/auth/me
// Eco das claims do token, para o frontend restaurar a sessão.
pub async fn me(user: AuthenticatedUser) -> Json<Value> {
    Json(json!({
        "success": true,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
        }
    }))
}
