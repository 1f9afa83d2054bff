// src/handlers/relatorios.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{RelatorioFiltros, TimelineFiltros, TimelineResposta},
};

// GET /api/relatorios?tipo=visitas|checkins
#[utoipa::path(
    get,
    path = "/api/relatorios",
    tag = "Relatórios",
    responses(
        (status = 200, description = "Dataset plano para exportação"),
        (status = 400, description = "Tipo de relatório inválido"),
        (status = 403, description = "Acesso restrito a gestores")
    ),
    security(("api_jwt" = []))
)]
pub async fn dados(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filtros): Query<RelatorioFiltros>,
) -> Result<Json<Value>, AppError> {
    match filtros.tipo.as_deref() {
        None | Some("visitas") => {
            let dados = state.relatorio_service.visitas(&user, filtros).await?;
            Ok(Json(json!({ "success": true, "data": dados })))
        }
        Some("checkins") => {
            let dados = state.relatorio_service.checkins(&user, filtros).await?;
            Ok(Json(json!({ "success": true, "data": dados })))
        }
        Some(_) => Err(AppError::RegraDeNegocio(
            "TIPO DE RELATÓRIO INVÁLIDO".into(),
        )),
    }
}

// GET /api/timeline?empresa_id=
#[utoipa::path(
    get,
    path = "/api/timeline",
    tag = "Relatórios",
    responses(
        (status = 200, description = "Linha do tempo paginada da empresa", body = TimelineResposta),
        (status = 400, description = "empresa_id ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn timeline(
    State(state): State<AppState>,
    Query(filtros): Query<TimelineFiltros>,
) -> Result<Json<TimelineResposta>, AppError> {
    let resposta = state.relatorio_service.timeline(filtros).await?;
    Ok(Json(resposta))
}
