// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{DashboardCards, DashboardFiltros, DashboardVisitaItem},
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses((status = 200, description = "Contadores agregados do período", body = DashboardCards)),
    security(("api_jwt" = []))
)]
pub async fn cards(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filtros): Query<DashboardFiltros>,
) -> Result<Json<Value>, AppError> {
    let cards = state.dashboard_service.cards(&user, filtros).await?;
    Ok(Json(json!({ "success": true, "cards": cards })))
}

// GET /api/dashboard/visitas
#[utoipa::path(
    get,
    path = "/api/dashboard/visitas",
    tag = "Dashboard",
    responses((status = 200, description = "Visitas do período com dados de check-in", body = Vec<DashboardVisitaItem>)),
    security(("api_jwt" = []))
)]
pub async fn visitas(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filtros): Query<DashboardFiltros>,
) -> Result<Json<Value>, AppError> {
    let visitas = state.dashboard_service.visitas(&user, filtros).await?;
    Ok(Json(json!({ "success": true, "data": visitas })))
}
