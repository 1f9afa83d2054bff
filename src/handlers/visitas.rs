// src/handlers/visitas.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::visita::{
        AcaoVisitaResposta, CriarVisitaPayload, CriarVisitaResposta, RemarcarVisitaPayload,
        VisitaFiltros, VisitaListagemItem,
    },
};

// GET /api/visitas
#[utoipa::path(
    get,
    path = "/api/visitas",
    tag = "Visitas",
    responses(
        (status = 200, description = "Listagem de visitas com status_calculado", body = Vec<VisitaListagemItem>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filtros): Query<VisitaFiltros>,
) -> Result<Json<Value>, AppError> {
    let visitas = state.visita_service.listar(&user, filtros).await?;
    Ok(Json(json!({ "success": true, "data": visitas })))
}

// GET /api/visitas/{id}
#[utoipa::path(
    get,
    path = "/api/visitas/{id}",
    tag = "Visitas",
    params(("id" = i64, Path, description = "ID da visita")),
    responses(
        (status = 200, description = "Visita com dados de contato da empresa"),
        (status = 404, description = "Visita não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn obter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let visita = state.visita_service.obter(id).await?;
    Ok(Json(json!({ "success": true, "data": visita })))
}

// POST /api/visitas
#[utoipa::path(
    post,
    path = "/api/visitas",
    tag = "Visitas",
    request_body = CriarVisitaPayload,
    responses(
        (status = 200, description = "Visita criada com a sequência atribuída", body = CriarVisitaResposta),
        (status = 400, description = "Payload inválido"),
        (status = 403, description = "Consultor sem vínculo com a empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CriarVisitaPayload>,
) -> Result<Json<CriarVisitaResposta>, AppError> {
    let resposta = state.visita_service.criar(&user, payload).await?;
    Ok(Json(resposta))
}

// PATCH /api/visitas/{id}/remarcar
#[utoipa::path(
    patch,
    path = "/api/visitas/{id}/remarcar",
    tag = "Visitas",
    params(("id" = i64, Path, description = "ID da visita")),
    request_body = RemarcarVisitaPayload,
    responses(
        (status = 200, description = "Visita remarcada", body = AcaoVisitaResposta),
        (status = 400, description = "Transição de status não permitida"),
        (status = 403, description = "Sem permissão para alterar a visita")
    ),
    security(("api_jwt" = []))
)]
pub async fn remarcar(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<RemarcarVisitaPayload>,
) -> Result<Json<AcaoVisitaResposta>, AppError> {
    let resposta = state.visita_service.remarcar(&user, id, payload).await?;
    Ok(Json(resposta))
}

// PATCH /api/visitas/{id}/cancelar
#[utoipa::path(
    patch,
    path = "/api/visitas/{id}/cancelar",
    tag = "Visitas",
    params(("id" = i64, Path, description = "ID da visita")),
    responses(
        (status = 200, description = "Visita cancelada", body = AcaoVisitaResposta),
        (status = 400, description = "Visitas realizadas não podem ser canceladas"),
        (status = 403, description = "Sem permissão para alterar a visita")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancelar(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<AcaoVisitaResposta>, AppError> {
    let resposta = state.visita_service.cancelar(&user, id).await?;
    Ok(Json(resposta))
}
