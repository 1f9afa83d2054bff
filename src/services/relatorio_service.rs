// src/services/relatorio_service.rs

use crate::{
    common::error::AppError,
    db::RelatorioRepository,
    middleware::auth::AuthenticatedUser,
    models::{
        dashboard::{
            RelatorioCheckinItem, RelatorioFiltros, RelatorioVisitaItem, TimelineFiltros,
            TimelineResposta,
        },
        empresa::Paginacao,
    },
    services::policy,
};

const TIMELINE_LIMITE_PADRAO: i64 = 20;
const TIMELINE_LIMITE_MAXIMO: i64 = 100;

#[derive(Clone)]
pub struct RelatorioService {
    repo: RelatorioRepository,
}

impl RelatorioService {
    pub fn new(repo: RelatorioRepository) -> Self {
        Self { repo }
    }

    /// Dataset de visitas para exportação. Somente GESTOR.
    pub async fn visitas(
        &self,
        user: &AuthenticatedUser,
        filtros: RelatorioFiltros,
    ) -> Result<Vec<RelatorioVisitaItem>, AppError> {
        policy::exigir_gestor(user.role)?;
        self.repo.visitas(&filtros).await
    }

    /// Dataset de check-ins finalizados para exportação. Somente GESTOR.
    pub async fn checkins(
        &self,
        user: &AuthenticatedUser,
        filtros: RelatorioFiltros,
    ) -> Result<Vec<RelatorioCheckinItem>, AppError> {
        policy::exigir_gestor(user.role)?;
        self.repo.checkins(&filtros).await
    }

    /// Linha do tempo paginada de uma empresa.
    pub async fn timeline(&self, filtros: TimelineFiltros) -> Result<TimelineResposta, AppError> {
        let empresa_id = filtros
            .empresa_id
            .ok_or_else(|| AppError::CampoObrigatorio("CAMPO empresa_id É OBRIGATÓRIO".into()))?;

        let page = filtros.page.unwrap_or(1).max(1);
        let limit = filtros
            .limit
            .unwrap_or(TIMELINE_LIMITE_PADRAO)
            .clamp(1, TIMELINE_LIMITE_MAXIMO);
        let offset = (page - 1) * limit;

        let eventos = self.repo.timeline(empresa_id, &filtros, limit, offset).await?;
        let total = self
            .repo
            .timeline_total(empresa_id, filtros.data_inicio, filtros.data_fim)
            .await?;

        Ok(TimelineResposta {
            success: true,
            data: eventos,
            pagination: Paginacao::nova(page, limit, total),
        })
    }
}
