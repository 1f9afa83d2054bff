// src/services/empresa_service.rs

use crate::{
    common::error::AppError,
    db::EmpresaRepository,
    middleware::auth::AuthenticatedUser,
    models::empresa::{
        AtualizarEmpresaPayload, CriarEmpresaPayload, EmpresaDetalhe, EmpresaFiltros,
        EmpresaListagemResposta, Paginacao, StatusEmpresa,
    },
};

const LIMITE_MAXIMO: i64 = 100;
const LIMITE_PADRAO: i64 = 50;

#[derive(Clone)]
pub struct EmpresaService {
    repo: EmpresaRepository,
}

impl EmpresaService {
    pub fn new(repo: EmpresaRepository) -> Self {
        Self { repo }
    }

    pub async fn criar(
        &self,
        user: &AuthenticatedUser,
        payload: CriarEmpresaPayload,
    ) -> Result<i64, AppError> {
        let state_id = payload
            .state_id
            .ok_or_else(|| AppError::CampoObrigatorio("Campo state_id é obrigatório".into()))?;
        let city_id = payload
            .city_id
            .ok_or_else(|| AppError::CampoObrigatorio("Campo city_id é obrigatório".into()))?;
        let consultant = payload
            .consultant
            .ok_or_else(|| AppError::CampoObrigatorio("Campo consultant é obrigatório".into()))?;

        self.repo.criar(&payload, state_id, city_id, consultant, user.id).await
    }

    pub async fn listar(
        &self,
        filtros: EmpresaFiltros,
    ) -> Result<EmpresaListagemResposta, AppError> {
        let page = filtros.page.unwrap_or(1).max(1);
        let limit = filtros
            .limit
            .unwrap_or(LIMITE_PADRAO)
            .clamp(1, LIMITE_MAXIMO);
        let offset = (page - 1) * limit;

        let (empresas, total) = self.repo.listar(&filtros, limit, offset).await?;

        Ok(EmpresaListagemResposta {
            success: true,
            data: empresas,
            pagination: Paginacao::nova(page, limit, total),
        })
    }

    pub async fn obter(&self, id: i64) -> Result<EmpresaDetalhe, AppError> {
        self.repo
            .obter(id)
            .await?
            .ok_or(AppError::NaoEncontrado("EMPRESA NÃO ENCONTRADA"))
    }

    pub async fn atualizar(
        &self,
        id: i64,
        payload: AtualizarEmpresaPayload,
    ) -> Result<(), AppError> {
        let atualizadas = self.repo.atualizar(id, &payload).await?;
        if atualizadas == 0 {
            return Err(AppError::NaoEncontrado("EMPRESA NÃO ENCONTRADA"));
        }
        Ok(())
    }

    pub async fn atualizar_status(&self, id: i64, status: StatusEmpresa) -> Result<(), AppError> {
        let atualizadas = self.repo.atualizar_status(id, status).await?;
        if atualizadas == 0 {
            return Err(AppError::NaoEncontrado("EMPRESA NÃO ENCONTRADA"));
        }
        Ok(())
    }
}
