// src/db/relatorio_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::dashboard::{
        RelatorioCheckinItem, RelatorioFiltros, RelatorioVisitaItem, TimelineEvento,
        TimelineFiltros,
    },
};

#[derive(Clone)]
pub struct RelatorioRepository {
    pool: PgPool,
}

impl RelatorioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Dataset plano de visitas para exportação.
    pub async fn visitas(
        &self,
        filtros: &RelatorioFiltros,
    ) -> Result<Vec<RelatorioVisitaItem>, AppError> {
        let itens = sqlx::query_as::<_, RelatorioVisitaItem>(
            r#"
            SELECT
                v.id, v.date, v."type" AS "type", v.status, v.objetivo,
                v.meta_estabelecida, v.created_at,
                COALESCE(e.name, v.company_name, v.empresa_livre) AS empresa_nome,
                e.cnpj AS empresa_cnpj,
                e.segment AS empresa_segmento,
                e.address AS empresa_endereco,
                e.phone AS empresa_telefone,
                e.email AS empresa_email,
                e.responsible AS empresa_responsavel,
                u.name AS consultor_nome,
                c.nome AS cidade_nome,
                es.nome AS estado_nome,
                CASE
                    WHEN v.status = 'AGENDADA' AND v.date < NOW() THEN 'ATRASADA'
                    ELSE v.status::TEXT
                END AS status_calculado
            FROM visitas v
            LEFT JOIN empresas e ON e.id = v.company_id
            LEFT JOIN usuarios u ON u.id = v.created_by
            LEFT JOIN cidades c ON c.id = v.city_id
            LEFT JOIN estados es ON es.id = c.estado_id
            WHERE ($1::DATE IS NULL OR v.date::DATE >= $1)
              AND ($2::DATE IS NULL OR v.date::DATE <= $2)
            ORDER BY v.date DESC
            "#,
        )
        .bind(filtros.data_inicio)
        .bind(filtros.data_fim)
        .fetch_all(&self.pool)
        .await?;

        Ok(itens)
    }

    /// Dataset plano de check-ins finalizados para exportação.
    pub async fn checkins(
        &self,
        filtros: &RelatorioFiltros,
    ) -> Result<Vec<RelatorioCheckinItem>, AppError> {
        let itens = sqlx::query_as::<_, RelatorioCheckinItem>(
            r#"
            SELECT
                ck.visita_id, v.date, v."type" AS tipo_visita, v.status,
                v.objetivo, v.meta_estabelecida,
                COALESCE(e.name, v.company_name, v.empresa_livre) AS empresa_nome,
                e.cnpj AS empresa_cnpj,
                e.segment AS empresa_segmento,
                u.name AS consultor_nome,
                c.nome AS cidade_nome,
                es.nome AS estado_nome,
                ck.id AS checkin_id,
                ck.summary AS resumo,
                ck.opportunity AS oportunidade,
                ck.negociacao,
                ck.termometro,
                ck.numero_os,
                (ck.attachment IS NOT NULL AND ck.attachment <> '') AS tem_anexo,
                ck.attachment_original_name AS nome_anexo,
                ck.updated_at AS data_checkin
            FROM checkin ck
            INNER JOIN visitas v ON v.id = ck.visita_id
            LEFT JOIN empresas e ON e.id = v.company_id
            LEFT JOIN usuarios u ON u.id = v.created_by
            LEFT JOIN cidades c ON c.id = v.city_id
            LEFT JOIN estados es ON es.id = c.estado_id
            WHERE ck.is_draft = FALSE
              AND ($1::DATE IS NULL OR v.date::DATE >= $1)
              AND ($2::DATE IS NULL OR v.date::DATE <= $2)
            ORDER BY ck.updated_at DESC
            "#,
        )
        .bind(filtros.data_inicio)
        .bind(filtros.data_fim)
        .fetch_all(&self.pool)
        .await?;

        Ok(itens)
    }

    /// Linha do tempo de uma empresa: visitas e check-ins finalizados
    /// entrelaçados em ordem cronológica inversa.
    pub async fn timeline(
        &self,
        empresa_id: i64,
        filtros: &TimelineFiltros,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TimelineEvento>, AppError> {
        let eventos = sqlx::query_as::<_, TimelineEvento>(
            r#"
            SELECT * FROM (
                SELECT
                    v.id,
                    v.date AS data,
                    v.objetivo AS resumo,
                    CASE
                        WHEN v.status = 'AGENDADA' AND v.date < NOW() THEN 'ATRASADA'
                        ELSE v.status::TEXT
                    END AS status,
                    v."type"::TEXT AS tipo_visita,
                    u.name AS consultor_nome,
                    'visita' AS tipo,
                    v.id AS visita_id,
                    NULL::BOOLEAN AS oportunidade
                FROM visitas v
                LEFT JOIN usuarios u ON u.id = v.created_by
                WHERE v.company_id = $1

                UNION ALL

                SELECT
                    ck.id,
                    ck.updated_at AS data,
                    ck.summary AS resumo,
                    'REALIZADO' AS status,
                    v."type"::TEXT AS tipo_visita,
                    u.name AS consultor_nome,
                    'checkin' AS tipo,
                    v.id AS visita_id,
                    ck.opportunity AS oportunidade
                FROM checkin ck
                INNER JOIN visitas v ON v.id = ck.visita_id
                LEFT JOIN usuarios u ON u.id = v.created_by
                WHERE v.company_id = $1 AND ck.is_draft = FALSE
            ) eventos
            WHERE ($2::DATE IS NULL OR eventos.data::DATE >= $2)
              AND ($3::DATE IS NULL OR eventos.data::DATE <= $3)
            ORDER BY eventos.data DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(empresa_id)
        .bind(filtros.data_inicio)
        .bind(filtros.data_fim)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(eventos)
    }

    /// Total de eventos da linha do tempo, para a paginação.
    pub async fn timeline_total(
        &self,
        empresa_id: i64,
        data_inicio: Option<NaiveDate>,
        data_fim: Option<NaiveDate>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM visitas v
                 WHERE v.company_id = $1
                   AND ($2::DATE IS NULL OR v.date::DATE >= $2)
                   AND ($3::DATE IS NULL OR v.date::DATE <= $3))
                +
                (SELECT COUNT(*) FROM checkin ck
                 INNER JOIN visitas v ON v.id = ck.visita_id
                 WHERE v.company_id = $1 AND ck.is_draft = FALSE
                   AND ($2::DATE IS NULL OR ck.updated_at::DATE >= $2)
                   AND ($3::DATE IS NULL OR ck.updated_at::DATE <= $3))
            "#,
        )
        .bind(empresa_id)
        .bind(data_inicio)
        .bind(data_fim)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
