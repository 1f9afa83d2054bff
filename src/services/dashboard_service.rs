// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{DashboardCards, DashboardFiltros, DashboardVisitaItem},
    services::policy,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn cards(
        &self,
        user: &AuthenticatedUser,
        filtros: DashboardFiltros,
    ) -> Result<DashboardCards, AppError> {
        let scope = policy::escopo_consultor(user.role, user.id);
        self.repo.cards(scope, &filtros).await
    }

    pub async fn visitas(
        &self,
        user: &AuthenticatedUser,
        filtros: DashboardFiltros,
    ) -> Result<Vec<DashboardVisitaItem>, AppError> {
        let scope = policy::escopo_consultor(user.role, user.id);
        self.repo.listar_visitas(scope, &filtros).await
    }
}
