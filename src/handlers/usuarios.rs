// src/handlers/usuarios.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    common::error::AppError, config::AppState, models::auth::UsuarioResumo,
    models::referencia::UsuarioFiltros,
};

// GET /api/usuarios?role=
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuários",
    responses((status = 200, description = "Usuários ativos, filtráveis por papel", body = Vec<UsuarioResumo>)),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(state): State<AppState>,
    Query(filtros): Query<UsuarioFiltros>,
) -> Result<Json<Value>, AppError> {
    let usuarios = state.user_repo.listar(filtros.role).await?;
    Ok(Json(json!({ "success": true, "data": usuarios })))
}
