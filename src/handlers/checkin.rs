// src/handlers/checkin.rs

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
    models::checkin::{Checkin, CheckinFiltros, SalvarCheckinPayload, SalvarCheckinResposta},
};

// GET /api/checkin/{visita_id}
#[utoipa::path(
    get,
    path = "/api/checkin/{visita_id}",
    tag = "Check-in",
    params(("visita_id" = i64, Path, description = "ID da visita")),
    responses(
        (status = 200, description = "Check-in da visita, criado com os padrões se não existir", body = Checkin),
        (status = 404, description = "Visita não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn obter(
    State(state): State<AppState>,
    Path(visita_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let checkin = state.checkin_service.obter(visita_id).await?;
    Ok(Json(json!({ "success": true, "data": checkin })))
}

// POST/PUT /api/checkin/{visita_id}
#[utoipa::path(
    post,
    path = "/api/checkin/{visita_id}",
    tag = "Check-in",
    params(("visita_id" = i64, Path, description = "ID da visita")),
    request_body = SalvarCheckinPayload,
    responses(
        (status = 200, description = "Check-in salvo; finalizar marca a visita como REALIZADA", body = SalvarCheckinResposta),
        (status = 400, description = "Termômetro fora da faixa 1-10"),
        (status = 404, description = "Visita não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn salvar(
    State(state): State<AppState>,
    Path(visita_id): Path<i64>,
    Json(payload): Json<SalvarCheckinPayload>,
) -> Result<Json<SalvarCheckinResposta>, AppError> {
    payload.validate()?;
    let resposta = state.checkin_service.salvar(visita_id, payload).await?;
    Ok(Json(resposta))
}

// GET /api/checkins
pub async fn listar(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filtros): Query<CheckinFiltros>,
) -> Result<Json<Value>, AppError> {
    let checkins = state.checkin_service.listar(&user, filtros).await?;
    Ok(Json(json!({
        "success": true,
        "total": checkins.len(),
        "data": checkins,
        "user_role": user.role,
    })))
}
