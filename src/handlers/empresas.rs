// src/handlers/empresas.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::empresa::{
        AtualizarEmpresaPayload, AtualizarStatusEmpresaPayload, CriarEmpresaPayload,
        EmpresaFiltros, EmpresaListagemResposta,
    },
};

// POST /api/empresas
#[utoipa::path(
    post,
    path = "/api/empresas",
    tag = "Empresas",
    request_body = CriarEmpresaPayload,
    responses(
        (status = 200, description = "Empresa criada"),
        (status = 400, description = "Campo obrigatório ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CriarEmpresaPayload>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;
    let id = state.empresa_service.criar(&user, payload).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Empresa criada com sucesso",
        "id": id,
    })))
}

// GET /api/empresas
// Com `?id=` devolve uma empresa só, mantendo o contrato antigo.
#[utoipa::path(
    get,
    path = "/api/empresas",
    tag = "Empresas",
    responses(
        (status = 200, description = "Listagem paginada de empresas", body = EmpresaListagemResposta)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(state): State<AppState>,
    Query(filtros): Query<EmpresaFiltros>,
) -> Result<Json<Value>, AppError> {
    if let Some(id) = filtros.id {
        let empresa = state.empresa_service.obter(id).await?;
        return Ok(Json(json!({ "success": true, "data": empresa })));
    }

    let resposta = state.empresa_service.listar(filtros).await?;
    Ok(Json(serde_json::to_value(resposta).map_err(anyhow::Error::from)?))
}

// GET /api/empresas/{id}
pub async fn obter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let empresa = state.empresa_service.obter(id).await?;
    Ok(Json(json!({ "success": true, "data": empresa })))
}

// PUT /api/empresas/{id}
pub async fn atualizar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AtualizarEmpresaPayload>,
) -> Result<Json<Value>, AppError> {
    state.empresa_service.atualizar(id, payload).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Empresa atualizada com sucesso",
    })))
}

// PATCH /api/empresas/{id} (troca de status ATIVA/INATIVA)
pub async fn atualizar_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AtualizarStatusEmpresaPayload>,
) -> Result<Json<Value>, AppError> {
    state.empresa_service.atualizar_status(id, payload.status).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Status da empresa atualizado com sucesso",
    })))
}
