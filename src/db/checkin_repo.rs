// src/db/checkin_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::checkin::{
        AnexoDownload, AnexoInfo, Checkin, CheckinFiltros, CheckinListagemItem,
        SalvarCheckinPayload,
    },
};

// Colunas do SELECT de check-in, com o has_attachment derivado.
const COLUNAS_CHECKIN: &str = r#"
    id, visita_id, is_draft, summary, opportunity, negociacao, termometro,
    numero_os, attachment, attachment_original_name, attachment_size,
    attachment_type,
    (attachment IS NOT NULL AND attachment <> '') AS has_attachment,
    created_at, updated_at
"#;

#[derive(Clone)]
pub struct CheckinRepository {
    pool: PgPool,
}

impl CheckinRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Garante a linha do check-in com os valores padrão. Idempotente:
    /// o ON CONFLICT engole a corrida entre dois GETs simultâneos.
    pub async fn garantir<'e, E>(&self, executor: E, visita_id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO checkin (visita_id) VALUES ($1) ON CONFLICT (visita_id) DO NOTHING")
            .bind(visita_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn buscar<'e, E>(
        &self,
        executor: E,
        visita_id: i64,
    ) -> Result<Option<Checkin>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let checkin = sqlx::query_as::<_, Checkin>(&format!(
            "SELECT {COLUNAS_CHECKIN} FROM checkin WHERE visita_id = $1"
        ))
        .bind(visita_id)
        .fetch_optional(executor)
        .await?;

        Ok(checkin)
    }

    /// Upsert parcial em um único comando: campos ausentes no payload
    /// preservam o valor já gravado via COALESCE.
    pub async fn upsert<'e, E>(
        &self,
        executor: E,
        visita_id: i64,
        payload: &SalvarCheckinPayload,
    ) -> Result<Checkin, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let checkin = sqlx::query_as::<_, Checkin>(&format!(
            r#"
            INSERT INTO checkin (visita_id, summary, opportunity, negociacao, termometro, numero_os, is_draft)
            VALUES (
                $1,
                COALESCE($2, ''),
                COALESCE($3, FALSE),
                COALESCE($4, FALSE),
                COALESCE($5, 5),
                COALESCE($6, ''),
                COALESCE($7, TRUE)
            )
            ON CONFLICT (visita_id) DO UPDATE SET
                summary = COALESCE($2, checkin.summary),
                opportunity = COALESCE($3, checkin.opportunity),
                negociacao = COALESCE($4, checkin.negociacao),
                termometro = COALESCE($5, checkin.termometro),
                numero_os = COALESCE($6, checkin.numero_os),
                is_draft = COALESCE($7, checkin.is_draft),
                updated_at = NOW()
            RETURNING {COLUNAS_CHECKIN}
            "#
        ))
        .bind(visita_id)
        .bind(payload.summary.as_deref())
        .bind(payload.opportunity)
        .bind(payload.negociacao)
        .bind(payload.termometro)
        .bind(payload.numero_os.as_deref())
        .bind(payload.is_draft)
        .fetch_one(executor)
        .await?;

        Ok(checkin)
    }

    /// Nome do arquivo atualmente anexado, se houver.
    pub async fn anexo_atual<'e, E>(
        &self,
        executor: E,
        visita_id: i64,
    ) -> Result<Option<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let anexo = sqlx::query_scalar::<_, Option<String>>(
            "SELECT attachment FROM checkin WHERE visita_id = $1",
        )
        .bind(visita_id)
        .fetch_optional(executor)
        .await?;

        Ok(anexo.flatten())
    }

    pub async fn gravar_anexo<'e, E>(
        &self,
        executor: E,
        visita_id: i64,
        anexo: &AnexoInfo,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO checkin (visita_id, attachment, attachment_original_name, attachment_size, attachment_type)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (visita_id) DO UPDATE SET
                attachment = $2,
                attachment_original_name = $3,
                attachment_size = $4,
                attachment_type = $5,
                updated_at = NOW()
            "#,
        )
        .bind(visita_id)
        .bind(&anexo.filename)
        .bind(&anexo.original_name)
        .bind(anexo.size)
        .bind(&anexo.tipo)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Anexo mais o dono da visita, para a checagem de download.
    pub async fn anexo_para_download(
        &self,
        visita_id: i64,
    ) -> Result<Option<AnexoDownload>, AppError> {
        let anexo = sqlx::query_as::<_, AnexoDownload>(
            r#"
            SELECT c.attachment, c.attachment_original_name, c.attachment_type, v.created_by
            FROM checkin c
            INNER JOIN visitas v ON v.id = c.visita_id
            WHERE c.visita_id = $1
            "#,
        )
        .bind(visita_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(anexo)
    }

    /// Listagem de check-ins finalizados, com joins de visita, empresa,
    /// consultor e cidade/estado.
    pub async fn listar(
        &self,
        scope: Option<i64>,
        filtros: &CheckinFiltros,
    ) -> Result<Vec<CheckinListagemItem>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                c.visita_id, v.date, v."type" AS tipo_visita, v.status, v.objetivo,
                e.name AS empresa_nome, e.cnpj AS empresa_cnpj,
                u.name AS consultor_nome,
                ci.nome AS cidade_nome, es.nome AS estado_nome,
                c.id AS checkin_id, c.summary AS resumo,
                c.opportunity AS oportunidade, c.negociacao, c.termometro,
                c.numero_os, c.updated_at AS data_checkin
            FROM checkin c
            INNER JOIN visitas v ON v.id = c.visita_id
            LEFT JOIN empresas e ON e.id = v.company_id
            LEFT JOIN usuarios u ON u.id = v.created_by
            LEFT JOIN cidades ci ON ci.id = v.city_id
            LEFT JOIN estados es ON es.id = ci.estado_id
            WHERE c.is_draft = FALSE
            "#,
        );

        if let Some(uid) = scope {
            qb.push(" AND (v.created_by = ")
                .push_bind(uid)
                .push(" OR e.consultant = ")
                .push_bind(uid)
                .push(" OR e.consultant_secondary = ")
                .push_bind(uid)
                .push(")");
        }
        if let Some(inicio) = filtros.data_inicio {
            qb.push(" AND v.date::DATE >= ").push_bind(inicio);
        }
        if let Some(fim) = filtros.data_fim {
            qb.push(" AND v.date::DATE <= ").push_bind(fim);
        }
        if let Some(empresa) = filtros.empresa.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND e.name ILIKE ")
                .push_bind(format!("%{empresa}%"));
        }
        if let Some(consultor) = filtros.consultor.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND u.name ILIKE ")
                .push_bind(format!("%{consultor}%"));
        }

        qb.push(" ORDER BY c.updated_at DESC");

        let checkins = qb
            .build_query_as::<CheckinListagemItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(checkins)
    }
}
