// src/services/visita_service.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{visita_repo::NovaVisita, EmpresaRepository, VisitaRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        auth::Role,
        visita::{
            eh_retroativa, AcaoVisitaResposta, CriarVisitaPayload, CriarVisitaResposta,
            RemarcarVisitaPayload, TipoVisita, VisitaDetalhe, VisitaFiltros, VisitaListagemItem,
        },
    },
    services::policy,
};

#[derive(Clone)]
pub struct VisitaService {
    repo: VisitaRepository,
    empresa_repo: EmpresaRepository,
    pool: PgPool,
}

impl VisitaService {
    pub fn new(repo: VisitaRepository, empresa_repo: EmpresaRepository, pool: PgPool) -> Self {
        Self { repo, empresa_repo, pool }
    }

    pub async fn listar(
        &self,
        user: &AuthenticatedUser,
        mut filtros: VisitaFiltros,
    ) -> Result<Vec<VisitaListagemItem>, AppError> {
        // O filtro por consultor é exclusivo do GESTOR.
        if user.role != Role::Gestor {
            filtros.consultor = None;
        }

        let scope = policy::escopo_consultor(user.role, user.id);
        self.repo.listar(scope, &filtros).await
    }

    pub async fn obter(&self, id: i64) -> Result<VisitaDetalhe, AppError> {
        self.repo
            .obter_detalhe(id)
            .await?
            .ok_or(AppError::NaoEncontrado("VISITA NÃO ENCONTRADA"))
    }

    /// Criação de visita: valida o payload por tipo, checa o vínculo
    /// do consultor com a empresa e atribui a sequência dentro de uma
    /// transação serializada por advisory lock.
    pub async fn criar(
        &self,
        user: &AuthenticatedUser,
        payload: CriarVisitaPayload,
    ) -> Result<CriarVisitaResposta, AppError> {
        let tipo = payload
            .tipo
            .ok_or_else(|| AppError::CampoObrigatorio("CAMPO type É OBRIGATÓRIO".into()))?;
        let date = payload
            .date
            .ok_or_else(|| AppError::CampoObrigatorio("CAMPO date É OBRIGATÓRIO".into()))?;
        let city_id = payload
            .city_id
            .ok_or_else(|| AppError::CampoObrigatorio("CAMPO city_id É OBRIGATÓRIO".into()))?;

        let is_prospeccao = payload.is_prospeccao;
        let empresa_livre = payload
            .empresa_livre
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        // Prospecção dispensa empresa cadastrada, mas exige o nome livre.
        let company_id = if is_prospeccao {
            if empresa_livre.is_none() {
                return Err(AppError::RegraDeNegocio(
                    "NOME DA EMPRESA É OBRIGATÓRIO PARA PROSPECÇÃO".into(),
                ));
            }
            payload.company_id
        } else {
            Some(payload.company_id.ok_or_else(|| {
                AppError::CampoObrigatorio("CAMPO company_id É OBRIGATÓRIO".into())
            })?)
        };

        if tipo == TipoVisita::TrabalhoInterno {
            let objetivo_ok = payload
                .objetivo
                .as_deref()
                .map(str::trim)
                .is_some_and(|o| o.chars().count() >= 10);
            if !objetivo_ok {
                return Err(AppError::RegraDeNegocio(
                    "PARA TRABALHO INTERNO É OBRIGATÓRIO DESCREVER DETALHADAMENTE O OBJETIVO (MÍNIMO 10 CARACTERES)".into(),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        let mut empresa = None;
        if let Some(cid) = company_id {
            let encontrada = self
                .empresa_repo
                .obter_consultores(&mut *tx, cid)
                .await?
                .ok_or_else(|| AppError::RegraDeNegocio("EMPRESA NÃO ENCONTRADA".into()))?;

            policy::autorizar_visita_para_empresa(user.role, user.id, tipo, &encontrada)?;
            empresa = Some(encontrada);
        }

        let retroativa = eh_retroativa(date, Utc::now());

        // O lock segura o par (tipo, empresa) até o commit; MAX e
        // INSERT enxergam o mesmo estado.
        self.repo.travar_sequencia(&mut *tx, tipo, company_id).await?;
        let sequence = self.repo.proxima_sequencia(&mut *tx, tipo, company_id).await?;

        let nova = NovaVisita {
            company_id,
            empresa_livre: if is_prospeccao { empresa_livre } else { None },
            company_name: empresa.as_ref().map(|e| e.name.as_str()),
            is_prospeccao,
            city_id,
            date,
            tipo,
            visit_sequence: sequence,
            objetivo: payload.objetivo.as_deref(),
            meta_estabelecida: payload.meta_estabelecida.as_deref(),
            is_retroativa: retroativa,
            created_by: user.id,
        };
        let id = self.repo.inserir(&mut *tx, &nova).await?;

        tx.commit().await?;

        let mut resposta = CriarVisitaResposta {
            success: true,
            id,
            sequence,
            message: None,
            warning: None,
            retroativa: None,
            prospeccao: None,
            trabalho_interno: None,
            consultor_secundario: None,
        };

        if is_prospeccao {
            resposta.prospeccao = Some(true);
            resposta.message = Some("PROSPECÇÃO DE CLIENTE AGENDADA COM SUCESSO".into());
        }
        if retroativa {
            resposta.warning = Some("VISITA RETROATIVA CRIADA - Data no passado".into());
            resposta.retroativa = Some(true);
        }
        if tipo == TipoVisita::TrabalhoInterno {
            resposta.message = Some("TRABALHO INTERNO CHB AGENDADO COM SUCESSO".into());
            resposta.trabalho_interno = Some(true);
        }
        if user.role == Role::Consultor {
            if let Some(e) = &empresa {
                if policy::eh_consultor_secundario(user.id, e) {
                    resposta.consultor_secundario = Some(true);
                    resposta.message = Some("VISITA CRIADA COMO CONSULTOR SECUNDÁRIO".into());
                }
            }
        }

        Ok(resposta)
    }

    pub async fn remarcar(
        &self,
        user: &AuthenticatedUser,
        id: i64,
        payload: RemarcarVisitaPayload,
    ) -> Result<AcaoVisitaResposta, AppError> {
        let mut tx = self.pool.begin().await?;

        let visita = self
            .repo
            .obter_permissao(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("VISITA NÃO ENCONTRADA"))?;

        policy::autorizar_alteracao_visita(user.role, user.id, &visita)?;
        visita.status.validar_remarcacao()?;

        let date = payload
            .date
            .ok_or_else(|| AppError::CampoObrigatorio("NOVA DATA É OBRIGATÓRIA".into()))?;

        self.repo.remarcar(&mut *tx, id, date).await?;
        tx.commit().await?;

        Ok(AcaoVisitaResposta {
            success: true,
            message: (visita.tipo == TipoVisita::TrabalhoInterno)
                .then_some("TRABALHO INTERNO CHB REMARCADO COM SUCESSO"),
        })
    }

    pub async fn cancelar(
        &self,
        user: &AuthenticatedUser,
        id: i64,
    ) -> Result<AcaoVisitaResposta, AppError> {
        let mut tx = self.pool.begin().await?;

        let visita = self
            .repo
            .obter_permissao(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("VISITA NÃO ENCONTRADA"))?;

        policy::autorizar_alteracao_visita(user.role, user.id, &visita)?;
        visita.status.validar_cancelamento()?;

        self.repo.cancelar(&mut *tx, id).await?;
        tx.commit().await?;

        Ok(AcaoVisitaResposta {
            success: true,
            message: (visita.tipo == TipoVisita::TrabalhoInterno)
                .then_some("TRABALHO INTERNO CHB CANCELADO"),
        })
    }
}
