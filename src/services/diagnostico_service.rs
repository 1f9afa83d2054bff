// src/services/diagnostico_service.rs

use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{DiagnosticoRepository, EmpresaRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        diagnostico::{
            particionar_parque, remapear_parque, DiagnosticoData, DiagnosticoListagemFiltros,
            DiagnosticoListagemResposta, SalvarDiagnosticoPayload, SalvarDiagnosticoResposta,
        },
        empresa::Paginacao,
    },
    services::policy,
};

const LIMITE_MAXIMO: i64 = 100;
const LIMITE_PADRAO: i64 = 10;

#[derive(Clone)]
pub struct DiagnosticoService {
    repo: DiagnosticoRepository,
    empresa_repo: EmpresaRepository,
    pool: PgPool,
}

impl DiagnosticoService {
    pub fn new(repo: DiagnosticoRepository, empresa_repo: EmpresaRepository, pool: PgPool) -> Self {
        Self { repo, empresa_repo, pool }
    }

    /// Diagnóstico completo da empresa. Sem diagnóstico gravado, a
    /// resposta é a casca vazia, não 404.
    pub async fn obter(&self, empresa_id: i64) -> Result<DiagnosticoData, AppError> {
        let Some(diagnostico_id) = self.repo.obter_id(&self.pool, empresa_id).await? else {
            return Ok(DiagnosticoData::vazio());
        };

        let rows = self.repo.listar_parque(&self.pool, diagnostico_id).await?;
        let parque = remapear_parque(&rows);

        let operacao = self.repo.operacao(&self.pool, diagnostico_id).await?;
        let previsao = self.repo.previsao(&self.pool, diagnostico_id).await?;
        let relacionamento = self.repo.relacionamento(&self.pool, diagnostico_id).await?;

        Ok(DiagnosticoData { parque, operacao, previsao, relacionamento })
    }

    /// Regrava o diagnóstico em uma transação só: o parque é apagado e
    /// reinserido em duas passadas (equipamentos e depois implementos,
    /// com os parent_tmp resolvidos contra os ids reais recém-gerados);
    /// as sub-fichas só sobrescrevem quando trazem algum dado.
    pub async fn salvar(
        &self,
        payload: SalvarDiagnosticoPayload,
    ) -> Result<SalvarDiagnosticoResposta, AppError> {
        let empresa_id = payload
            .empresa_id
            .ok_or_else(|| AppError::CampoObrigatorio("CAMPO empresa_id É OBRIGATÓRIO".into()))?;

        let mut tx = self.pool.begin().await?;

        self.empresa_repo
            .obter_consultores(&mut *tx, empresa_id)
            .await?
            .ok_or(AppError::NaoEncontrado("EMPRESA NÃO ENCONTRADA"))?;

        let diagnostico_id = self.repo.upsert_cabecalho(&mut *tx, empresa_id).await?;

        if let Some(parque) = &payload.parque {
            self.repo.limpar_parque(&mut *tx, diagnostico_id).await?;

            let (equipamentos, implementos, descartados) = particionar_parque(parque);
            if !descartados.is_empty() {
                tracing::warn!(
                    empresa_id,
                    quantidade = descartados.len(),
                    "implementos órfãos descartados na gravação do parque"
                );
            }

            let mut mapa: HashMap<i64, i64> = HashMap::new();
            for item in equipamentos {
                let id_real = self.repo.inserir_item(&mut *tx, diagnostico_id, None, item).await?;
                mapa.insert(item.id_tmp, id_real);
            }
            for item in implementos {
                let parent_id = item.parent_tmp.and_then(|p| mapa.get(&p).copied());
                self.repo.inserir_item(&mut *tx, diagnostico_id, parent_id, item).await?;
            }
        }

        if let Some(operacao) = &payload.operacao {
            if !operacao.esta_vazia() {
                self.repo.salvar_operacao(&mut *tx, diagnostico_id, operacao).await?;
            }
        }
        if let Some(previsao) = &payload.previsao {
            if !previsao.esta_vazia() {
                self.repo.salvar_previsao(&mut *tx, diagnostico_id, previsao).await?;
            }
        }
        if let Some(relacionamento) = &payload.relacionamento {
            if !relacionamento.esta_vazia() {
                self.repo
                    .salvar_relacionamento(&mut *tx, diagnostico_id, relacionamento)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(SalvarDiagnosticoResposta {
            success: true,
            message: "DIAGNÓSTICO SALVO COM SUCESSO",
            diagnostico_id,
        })
    }

    /// Listagem paginada com contadores do parque e resumo das
    /// sub-fichas. CONSULTOR só enxerga os diagnósticos das empresas
    /// em que atua.
    pub async fn listar(
        &self,
        user: &AuthenticatedUser,
        filtros: DiagnosticoListagemFiltros,
    ) -> Result<DiagnosticoListagemResposta, AppError> {
        let page = filtros.page.unwrap_or(1).max(1);
        let limit = filtros
            .limit
            .unwrap_or(LIMITE_PADRAO)
            .clamp(1, LIMITE_MAXIMO);
        let offset = (page - 1) * limit;

        let scope = policy::escopo_consultor(user.role, user.id);
        let (diagnosticos, total) = self.repo.listar(scope, &filtros, limit, offset).await?;

        Ok(DiagnosticoListagemResposta {
            success: true,
            data: diagnosticos,
            pagination: Paginacao::nova(page, limit, total),
        })
    }

    pub async fn excluir(&self, empresa_id: i64) -> Result<(), AppError> {
        let removidos = self.repo.excluir(empresa_id).await?;
        if removidos == 0 {
            return Err(AppError::NaoEncontrado("DIAGNÓSTICO NÃO ENCONTRADO"));
        }
        Ok(())
    }
}
