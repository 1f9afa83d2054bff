// src/db/visita_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::visita::{
        TipoVisita, VisitaDetalhe, VisitaFiltros, VisitaListagemItem, VisitaPermissao,
    },
};

// Valores já normalizados pelo service para o INSERT.
pub struct NovaVisita<'a> {
    pub company_id: Option<i64>,
    pub empresa_livre: Option<&'a str>,
    pub company_name: Option<&'a str>,
    pub is_prospeccao: bool,
    pub city_id: i64,
    pub date: DateTime<Utc>,
    pub tipo: TipoVisita,
    pub visit_sequence: i32,
    pub objetivo: Option<&'a str>,
    pub meta_estabelecida: Option<&'a str>,
    pub is_retroativa: bool,
    pub created_by: i64,
}

// Status derivado na leitura: AGENDADA com data vencida vira ATRASADA,
// sem nunca ser persistida assim.
const STATUS_CALCULADO: &str = r#"
    CASE
        WHEN v.status = 'AGENDADA' AND v.date < NOW() THEN 'ATRASADA'
        ELSE v.status::TEXT
    END AS status_calculado
"#;

#[derive(Clone)]
pub struct VisitaRepository {
    pool: PgPool,
}

impl VisitaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Listagem de visitas com joins de empresa, cidade e consultor.
    /// `scope` restringe ao universo do CONSULTOR (criadas por ele ou de
    /// empresas onde ele é consultor principal/secundário).
    pub async fn listar(
        &self,
        scope: Option<i64>,
        filtros: &VisitaFiltros,
    ) -> Result<Vec<VisitaListagemItem>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            r#"
            SELECT
                v.id, v.company_id, v.empresa_livre, v.is_prospeccao, v.city_id,
                v.date, v."type" AS "type", v.visit_sequence, v.objetivo,
                v.meta_estabelecida, v.status, v.is_retroativa, v.created_by,
                v.created_at, v.updated_at,
                e.name AS empresa_nome,
                c.nome AS cidade_nome,
                u.name AS consultor_nome,
                {STATUS_CALCULADO}
            FROM visitas v
            LEFT JOIN empresas e ON e.id = v.company_id
            LEFT JOIN cidades c ON c.id = v.city_id
            LEFT JOIN usuarios u ON u.id = v.created_by
            WHERE 1 = 1
            "#
        ));

        if let Some(uid) = scope {
            qb.push(" AND (v.created_by = ")
                .push_bind(uid)
                .push(" OR e.consultant = ")
                .push_bind(uid)
                .push(" OR e.consultant_secondary = ")
                .push_bind(uid)
                .push(")");
        }
        if let Some(status) = filtros.status {
            qb.push(" AND v.status = ").push_bind(status);
        }
        if let Some(tipo) = filtros.tipo {
            qb.push(" AND v.\"type\" = ").push_bind(tipo);
        }
        if let Some(company_id) = filtros.company_id {
            qb.push(" AND v.company_id = ").push_bind(company_id);
        }
        if let Some(city_id) = filtros.city_id {
            qb.push(" AND v.city_id = ").push_bind(city_id);
        }
        if let Some(consultor) = filtros.consultor {
            qb.push(" AND v.created_by = ").push_bind(consultor);
        }
        if let Some(inicio) = filtros.data_inicio {
            qb.push(" AND v.date::DATE >= ").push_bind(inicio);
        }
        if let Some(fim) = filtros.data_fim {
            qb.push(" AND v.date::DATE <= ").push_bind(fim);
        }

        qb.push(" ORDER BY v.date DESC");

        let visitas = qb
            .build_query_as::<VisitaListagemItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(visitas)
    }

    /// Visita específica com os dados de contato da empresa.
    pub async fn obter_detalhe(&self, id: i64) -> Result<Option<VisitaDetalhe>, AppError> {
        let visita = sqlx::query_as::<_, VisitaDetalhe>(
            r#"
            SELECT
                v.id, v.company_id, v.empresa_livre, v.company_name, v.is_prospeccao,
                v.city_id, v.date, v."type" AS "type", v.visit_sequence, v.objetivo,
                v.meta_estabelecida, v.status, v.is_retroativa, v.created_by,
                v.created_at, v.updated_at,
                e.name AS empresa_nome,
                e.address AS empresa_endereco,
                e.phone AS empresa_telefone,
                e.whatsapp AS empresa_whatsapp,
                e.responsible AS empresa_responsavel,
                c.nome AS cidade_nome,
                u.name AS consultor_nome
            FROM visitas v
            LEFT JOIN empresas e ON e.id = v.company_id
            LEFT JOIN cidades c ON c.id = v.city_id
            LEFT JOIN usuarios u ON u.id = v.created_by
            WHERE v.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(visita)
    }

    /// Projeção mínima para checagem de permissão e do state machine.
    pub async fn obter_permissao<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<VisitaPermissao>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let visita = sqlx::query_as::<_, VisitaPermissao>(
            r#"
            SELECT
                v.id, v.created_by, v.status, v."type" AS "type", v.company_id,
                e.consultant, e.consultant_secondary
            FROM visitas v
            LEFT JOIN empresas e ON e.id = v.company_id
            WHERE v.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(visita)
    }

    /// Serializa a atribuição de sequência dentro da transação corrente.
    /// O lock cobre o par (tipo, empresa) até o COMMIT, eliminando a
    /// corrida entre o MAX e o INSERT.
    pub async fn travar_sequencia<'e, E>(
        &self,
        executor: E,
        tipo: TipoVisita,
        company_id: Option<i64>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "SELECT pg_advisory_xact_lock(hashtext($1::TEXT || ':' || COALESCE($2::TEXT, '')))",
        )
        .bind(tipo)
        .bind(company_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Próximo número da sequência por tipo. Sem empresa, a numeração é
    /// global para o tipo, como no fluxo original.
    pub async fn proxima_sequencia<'e, E>(
        &self,
        executor: E,
        tipo: TipoVisita,
        company_id: Option<i64>,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let proxima = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT COALESCE(MAX(visit_sequence), 0) + 1
            FROM visitas
            WHERE "type" = $1 AND ($2::BIGINT IS NULL OR company_id = $2)
            "#,
        )
        .bind(tipo)
        .bind(company_id)
        .fetch_one(executor)
        .await?;

        Ok(proxima)
    }

    pub async fn inserir<'e, E>(
        &self,
        executor: E,
        nova: &NovaVisita<'_>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO visitas (
                company_id, empresa_livre, company_name, is_prospeccao, city_id,
                date, "type", visit_sequence, objetivo, meta_estabelecida,
                is_retroativa, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(nova.company_id)
        .bind(nova.empresa_livre)
        .bind(nova.company_name)
        .bind(nova.is_prospeccao)
        .bind(nova.city_id)
        .bind(nova.date)
        .bind(nova.tipo)
        .bind(nova.visit_sequence)
        .bind(nova.objetivo)
        .bind(nova.meta_estabelecida)
        .bind(nova.is_retroativa)
        .bind(nova.created_by)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn remarcar<'e, E>(
        &self,
        executor: E,
        id: i64,
        date: DateTime<Utc>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE visitas SET date = $2, status = 'REMARCADA', updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(date)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn cancelar<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE visitas SET status = 'CANCELADA', updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Único caminho que grava REALIZADA: a finalização do check-in.
    pub async fn marcar_realizada<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE visitas SET status = 'REALIZADA', updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
