// src/db/diagnostico_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::diagnostico::{
        DiagnosticoListagemFiltros, DiagnosticoListagemItem, OperacaoDados, ParqueItemPayload,
        ParqueItemRow, PrevisaoDados, RelacionamentoDados,
    },
};

// Joins e subselects da listagem: contadores do parque e o resumo das
// sub-fichas por diagnóstico.
const COLUNAS_LISTAGEM: &str = r#"
    d.id, d.empresa_id, d.created_at, d.updated_at,
    e.name AS empresa_nome,
    e.cnpj,
    e.consultant AS consultor_id,
    COALESCE(u.name, 'Não atribuído') AS consultor_nome,
    c.nome AS cidade_nome,
    est.nome AS estado_nome,
    (SELECT COUNT(*) FROM parque_itens pi
        WHERE pi.diagnostico_id = d.id AND pi.tipo_item = 'EQUIPAMENTO') AS total_equipamentos,
    (SELECT COUNT(*) FROM parque_itens pi
        WHERE pi.diagnostico_id = d.id AND pi.tipo_item = 'IMPLEMENTO') AS total_implementos,
    COALESCE((SELECT op.tipo_operacao FROM diagnostico_operacao op
        WHERE op.diagnostico_id = d.id), '') AS tipo_operacao,
    COALESCE((SELECT op.tipo_sucata FROM diagnostico_operacao op
        WHERE op.diagnostico_id = d.id), '') AS tipo_sucata,
    COALESCE((SELECT pr.tipo_cliente FROM diagnostico_previsao pr
        WHERE pr.diagnostico_id = d.id), '') AS tipo_cliente,
    COALESCE((SELECT pr.prazo_expansao FROM diagnostico_previsao pr
        WHERE pr.diagnostico_id = d.id), '') AS prazo_expansao,
    COALESCE((SELECT rel.contato_comprador OR rel.contato_operador
            OR rel.contato_encarregado OR rel.contato_diretor
        FROM diagnostico_relacionamento rel
        WHERE rel.diagnostico_id = d.id), FALSE) AS tem_relacionamento
"#;

const JOINS_LISTAGEM: &str = r#"
    FROM diagnosticos d
    INNER JOIN empresas e ON e.id = d.empresa_id
    LEFT JOIN usuarios u ON u.id = e.consultant
    LEFT JOIN cidades c ON c.id = e.city_id
    LEFT JOIN estados est ON est.id = e.state_id
"#;

#[derive(Clone)]
pub struct DiagnosticoRepository {
    pool: PgPool,
}

impl DiagnosticoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn obter_id<'e, E>(
        &self,
        executor: E,
        empresa_id: i64,
    ) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM diagnosticos WHERE empresa_id = $1",
        )
        .bind(empresa_id)
        .fetch_optional(executor)
        .await?;

        Ok(id)
    }

    /// Cabeçalho do diagnóstico: um por empresa, criado sob demanda.
    /// O ON CONFLICT transforma o busca-ou-cria em um comando só.
    pub async fn upsert_cabecalho<'e, E>(
        &self,
        executor: E,
        empresa_id: i64,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO diagnosticos (empresa_id)
            VALUES ($1)
            ON CONFLICT (empresa_id) DO UPDATE SET updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(empresa_id)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn listar_parque<'e, E>(
        &self,
        executor: E,
        diagnostico_id: i64,
    ) -> Result<Vec<ParqueItemRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itens = sqlx::query_as::<_, ParqueItemRow>(
            r#"
            SELECT id, parent_id, tipo_item, equipamento_impl, marca, modelo, situacao
            FROM parque_itens
            WHERE diagnostico_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(diagnostico_id)
        .fetch_all(executor)
        .await?;

        Ok(itens)
    }

    /// Apaga o parque inteiro antes da regravação. Os implementos caem
    /// em cascata junto com os equipamentos.
    pub async fn limpar_parque<'e, E>(
        &self,
        executor: E,
        diagnostico_id: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM parque_itens WHERE diagnostico_id = $1")
            .bind(diagnostico_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn inserir_item<'e, E>(
        &self,
        executor: E,
        diagnostico_id: i64,
        parent_id: Option<i64>,
        item: &ParqueItemPayload,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO parque_itens (
                diagnostico_id, parent_id, tipo_item, equipamento_impl, marca, modelo, situacao
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(diagnostico_id)
        .bind(parent_id)
        .bind(item.tipo_item)
        .bind(&item.equipamento_impl)
        .bind(&item.marca)
        .bind(&item.modelo)
        .bind(&item.situacao)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn operacao<'e, E>(
        &self,
        executor: E,
        diagnostico_id: i64,
    ) -> Result<Option<OperacaoDados>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let dados = sqlx::query_as::<_, OperacaoDados>(
            r#"
            SELECT tipo_operacao, tipo_sucata, qtd_producao_mes_ton, ton_vendida,
                   fundo_baia, qtd_cliente_quer_crescer, cliente_fornece_para,
                   preco_venda_ton
            FROM diagnostico_operacao
            WHERE diagnostico_id = $1
            "#,
        )
        .bind(diagnostico_id)
        .fetch_optional(executor)
        .await?;

        Ok(dados)
    }

    pub async fn salvar_operacao<'e, E>(
        &self,
        executor: E,
        diagnostico_id: i64,
        dados: &OperacaoDados,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO diagnostico_operacao (
                diagnostico_id, tipo_operacao, tipo_sucata, qtd_producao_mes_ton,
                ton_vendida, fundo_baia, qtd_cliente_quer_crescer,
                cliente_fornece_para, preco_venda_ton
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (diagnostico_id) DO UPDATE SET
                tipo_operacao = $2,
                tipo_sucata = $3,
                qtd_producao_mes_ton = $4,
                ton_vendida = $5,
                fundo_baia = $6,
                qtd_cliente_quer_crescer = $7,
                cliente_fornece_para = $8,
                preco_venda_ton = $9,
                updated_at = NOW()
            "#,
        )
        .bind(diagnostico_id)
        .bind(&dados.tipo_operacao)
        .bind(&dados.tipo_sucata)
        .bind(dados.qtd_producao_mes_ton)
        .bind(dados.ton_vendida)
        .bind(dados.fundo_baia)
        .bind(dados.qtd_cliente_quer_crescer)
        .bind(&dados.cliente_fornece_para)
        .bind(dados.preco_venda_ton)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn previsao<'e, E>(
        &self,
        executor: E,
        diagnostico_id: i64,
    ) -> Result<Option<PrevisaoDados>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let dados = sqlx::query_as::<_, PrevisaoDados>(
            r#"
            SELECT tipo_cliente, expansao_equip_implement, prazo_expansao, tipo_equip_interesse
            FROM diagnostico_previsao
            WHERE diagnostico_id = $1
            "#,
        )
        .bind(diagnostico_id)
        .fetch_optional(executor)
        .await?;

        Ok(dados)
    }

    pub async fn salvar_previsao<'e, E>(
        &self,
        executor: E,
        diagnostico_id: i64,
        dados: &PrevisaoDados,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO diagnostico_previsao (
                diagnostico_id, tipo_cliente, expansao_equip_implement,
                prazo_expansao, tipo_equip_interesse
            )
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (diagnostico_id) DO UPDATE SET
                tipo_cliente = $2,
                expansao_equip_implement = $3,
                prazo_expansao = $4,
                tipo_equip_interesse = $5,
                updated_at = NOW()
            "#,
        )
        .bind(diagnostico_id)
        .bind(&dados.tipo_cliente)
        .bind(dados.expansao_equip_implement)
        .bind(&dados.prazo_expansao)
        .bind(&dados.tipo_equip_interesse)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn relacionamento<'e, E>(
        &self,
        executor: E,
        diagnostico_id: i64,
    ) -> Result<Option<RelacionamentoDados>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let dados = sqlx::query_as::<_, RelacionamentoDados>(
            r#"
            SELECT contato_comprador, contato_operador, contato_encarregado, contato_diretor
            FROM diagnostico_relacionamento
            WHERE diagnostico_id = $1
            "#,
        )
        .bind(diagnostico_id)
        .fetch_optional(executor)
        .await?;

        Ok(dados)
    }

    pub async fn salvar_relacionamento<'e, E>(
        &self,
        executor: E,
        diagnostico_id: i64,
        dados: &RelacionamentoDados,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO diagnostico_relacionamento (
                diagnostico_id, contato_comprador, contato_operador,
                contato_encarregado, contato_diretor
            )
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (diagnostico_id) DO UPDATE SET
                contato_comprador = $2,
                contato_operador = $3,
                contato_encarregado = $4,
                contato_diretor = $5,
                updated_at = NOW()
            "#,
        )
        .bind(diagnostico_id)
        .bind(dados.contato_comprador)
        .bind(dados.contato_operador)
        .bind(dados.contato_encarregado)
        .bind(dados.contato_diretor)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Listagem paginada dos diagnósticos, mais recente primeiro.
    /// Retorna a página e o total para a paginação.
    pub async fn listar(
        &self,
        scope: Option<i64>,
        filtros: &DiagnosticoListagemFiltros,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<DiagnosticoListagemItem>, i64), AppError> {
        let mut total_qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT COUNT(*) {JOINS_LISTAGEM} WHERE 1 = 1"
        ));
        Self::aplicar_filtros(&mut total_qb, scope, filtros);
        let total = total_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUNAS_LISTAGEM} {JOINS_LISTAGEM} WHERE 1 = 1"
        ));
        Self::aplicar_filtros(&mut qb, scope, filtros);
        qb.push(" ORDER BY d.updated_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let diagnosticos = qb
            .build_query_as::<DiagnosticoListagemItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok((diagnosticos, total))
    }

    fn aplicar_filtros(
        qb: &mut QueryBuilder<'_, Postgres>,
        scope: Option<i64>,
        filtros: &DiagnosticoListagemFiltros,
    ) {
        if let Some(uid) = scope {
            qb.push(" AND (e.consultant = ")
                .push_bind(uid)
                .push(" OR e.consultant_secondary = ")
                .push_bind(uid)
                .push(")");
        }
        if let Some(inicio) = filtros.data_inicio {
            qb.push(" AND d.updated_at::DATE >= ").push_bind(inicio);
        }
        if let Some(fim) = filtros.data_fim {
            qb.push(" AND d.updated_at::DATE <= ").push_bind(fim);
        }
    }

    /// Remove o diagnóstico da empresa; parque e sub-fichas caem em
    /// cascata. Retorna 0 quando não havia diagnóstico.
    pub async fn excluir(&self, empresa_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM diagnosticos WHERE empresa_id = $1")
            .bind(empresa_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
