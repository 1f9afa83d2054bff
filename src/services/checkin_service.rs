// src/services/checkin_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{CheckinRepository, VisitaRepository},
    middleware::auth::AuthenticatedUser,
    models::checkin::{
        Checkin, CheckinFiltros, CheckinListagemItem, SalvarCheckinPayload, SalvarCheckinResposta,
    },
    services::policy,
};

#[derive(Clone)]
pub struct CheckinService {
    repo: CheckinRepository,
    visita_repo: VisitaRepository,
    pool: PgPool,
}

impl CheckinService {
    pub fn new(repo: CheckinRepository, visita_repo: VisitaRepository, pool: PgPool) -> Self {
        Self { repo, visita_repo, pool }
    }

    /// Busca o check-in da visita, criando a linha com os valores
    /// padrão quando ainda não existe.
    pub async fn obter(&self, visita_id: i64) -> Result<Checkin, AppError> {
        let mut tx = self.pool.begin().await?;

        self.visita_repo
            .obter_permissao(&mut *tx, visita_id)
            .await?
            .ok_or(AppError::NaoEncontrado("VISITA NÃO ENCONTRADA"))?;

        self.repo.garantir(&mut *tx, visita_id).await?;
        let checkin = self
            .repo
            .buscar(&mut *tx, visita_id)
            .await?
            .ok_or(AppError::NaoEncontrado("CHECK-IN NÃO ENCONTRADO"))?;

        tx.commit().await?;
        Ok(checkin)
    }

    /// Upsert parcial do check-in. Finalizar (`is_draft = false`) marca
    /// a visita como REALIZADA na mesma transação: ou os dois efeitos
    /// acontecem, ou nenhum.
    pub async fn salvar(
        &self,
        visita_id: i64,
        payload: SalvarCheckinPayload,
    ) -> Result<SalvarCheckinResposta, AppError> {
        let mut tx = self.pool.begin().await?;

        self.visita_repo
            .obter_permissao(&mut *tx, visita_id)
            .await?
            .ok_or(AppError::NaoEncontrado("VISITA NÃO ENCONTRADA"))?;

        let checkin = self.repo.upsert(&mut *tx, visita_id, &payload).await?;

        let finaliza = payload.finaliza();
        if finaliza {
            self.visita_repo.marcar_realizada(&mut *tx, visita_id).await?;
        }

        tx.commit().await?;

        Ok(SalvarCheckinResposta {
            success: true,
            id: checkin.id,
            message: if finaliza {
                "CHECK-IN FINALIZADO E VISITA MARCADA COMO REALIZADA"
            } else {
                "CHECK-IN SALVO"
            },
        })
    }

    pub async fn listar(
        &self,
        user: &AuthenticatedUser,
        filtros: CheckinFiltros,
    ) -> Result<Vec<CheckinListagemItem>, AppError> {
        let scope = policy::escopo_consultor(user.role, user.id);
        self.repo.listar(scope, &filtros).await
    }
}
