// src/handlers/diagnosticos.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::diagnostico::{
        DiagnosticoData, DiagnosticoListagemFiltros, DiagnosticoListagemResposta, DiagnosticoQuery,
        SalvarDiagnosticoPayload, SalvarDiagnosticoResposta,
    },
};

// GET /api/diagnosticos/lista
#[utoipa::path(
    get,
    path = "/api/diagnosticos/lista",
    tag = "Diagnósticos",
    responses(
        (status = 200, description = "Listagem paginada com contadores do parque e resumo das sub-fichas", body = DiagnosticoListagemResposta)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filtros): Query<DiagnosticoListagemFiltros>,
) -> Result<Json<DiagnosticoListagemResposta>, AppError> {
    let resposta = state.diagnostico_service.listar(&user, filtros).await?;
    Ok(Json(resposta))
}

// GET /api/diagnosticos/{empresa_id}
#[utoipa::path(
    get,
    path = "/api/diagnosticos/{empresa_id}",
    tag = "Diagnósticos",
    params(("empresa_id" = i64, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Diagnóstico completo; casca vazia quando ainda não gravado", body = DiagnosticoData)
    ),
    security(("api_jwt" = []))
)]
pub async fn obter(
    State(state): State<AppState>,
    Path(empresa_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let diagnostico = state.diagnostico_service.obter(empresa_id).await?;
    Ok(Json(json!({ "success": true, "data": diagnostico })))
}

// GET /api/diagnosticos?empresa_id=
pub async fn obter_por_query(
    State(state): State<AppState>,
    Query(query): Query<DiagnosticoQuery>,
) -> Result<Json<Value>, AppError> {
    let empresa_id = query
        .empresa_id
        .ok_or_else(|| AppError::CampoObrigatorio("CAMPO empresa_id É OBRIGATÓRIO".into()))?;
    let diagnostico = state.diagnostico_service.obter(empresa_id).await?;
    Ok(Json(json!({ "success": true, "data": diagnostico })))
}

// POST /api/diagnosticos
#[utoipa::path(
    post,
    path = "/api/diagnosticos",
    tag = "Diagnósticos",
    request_body = SalvarDiagnosticoPayload,
    responses(
        (status = 200, description = "Diagnóstico regravado por inteiro", body = SalvarDiagnosticoResposta),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn salvar(
    State(state): State<AppState>,
    Json(payload): Json<SalvarDiagnosticoPayload>,
) -> Result<Json<SalvarDiagnosticoResposta>, AppError> {
    let resposta = state.diagnostico_service.salvar(payload).await?;
    Ok(Json(resposta))
}

// DELETE /api/diagnosticos?empresa_id=
pub async fn excluir_por_query(
    State(state): State<AppState>,
    Query(query): Query<DiagnosticoQuery>,
) -> Result<Json<Value>, AppError> {
    let empresa_id = query
        .empresa_id
        .ok_or_else(|| AppError::CampoObrigatorio("CAMPO empresa_id É OBRIGATÓRIO".into()))?;
    state.diagnostico_service.excluir(empresa_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "DIAGNÓSTICO EXCLUÍDO COM SUCESSO",
    })))
}

// DELETE /api/diagnosticos/{empresa_id}
#[utoipa::path(
    delete,
    path = "/api/diagnosticos/{empresa_id}",
    tag = "Diagnósticos",
    params(("empresa_id" = i64, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Diagnóstico removido com parque e sub-fichas"),
        (status = 404, description = "Diagnóstico não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(state): State<AppState>,
    Path(empresa_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.diagnostico_service.excluir(empresa_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "DIAGNÓSTICO EXCLUÍDO COM SUCESSO",
    })))
}
