// src/handlers/referencias.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    common::error::AppError,
    config::AppState,
    models::referencia::{Cidade, Estado, ReferenciaQuery},
};

// GET /api/estados-cidades
// Sem parâmetro devolve os estados; com `?estado_id=` as cidades dele.
#[utoipa::path(
    get,
    path = "/api/estados-cidades",
    tag = "Referências",
    responses(
        (status = 200, description = "Estados ordenados por nome, ou cidades do estado informado", body = Vec<Estado>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(state): State<AppState>,
    Query(query): Query<ReferenciaQuery>,
) -> Result<Json<Value>, AppError> {
    if query.estado_id.is_some() {
        let cidades: Vec<Cidade> = state.referencia_repo.listar_cidades(query.estado_id).await?;
        return Ok(Json(json!({ "success": true, "data": cidades })));
    }

    let estados: Vec<Estado> = state.referencia_repo.listar_estados().await?;
    Ok(Json(json!({ "success": true, "data": estados })))
}
