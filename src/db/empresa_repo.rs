// src/db/empresa_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::empresa::{
        AtualizarEmpresaPayload, CriarEmpresaPayload, EmpresaConsultores, EmpresaDetalhe,
        EmpresaFiltros, StatusEmpresa,
    },
};

const COLUNAS_DETALHE: &str = r#"
    e.id, e.name, e.cnpj, e.segment, e.sector, e.address, e.state_id, e.city_id,
    e.region, e.phone, e.whatsapp, e.email, e.responsible, e.consultant,
    e.consultant_secondary, e.rating, e.status, e.created_by, e.created_at,
    e.updated_at,
    COALESCE(c.nome, '') AS cidade_nome,
    COALESCE(u1.name, '') AS consultor_nome,
    COALESCE(u2.name, '') AS consultor_secundario_nome,
    COALESCE(u3.name, '') AS created_by_name
"#;

const JOINS_DETALHE: &str = r#"
    FROM empresas e
    LEFT JOIN cidades c ON c.id = e.city_id
    LEFT JOIN usuarios u1 ON u1.id = e.consultant
    LEFT JOIN usuarios u2 ON u2.id = e.consultant_secondary
    LEFT JOIN usuarios u3 ON u3.id = e.created_by
"#;

#[derive(Clone)]
pub struct EmpresaRepository {
    pool: PgPool,
}

impl EmpresaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar(
        &self,
        payload: &CriarEmpresaPayload,
        state_id: i64,
        city_id: i64,
        consultant: i64,
        created_by: i64,
    ) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO empresas (
                name, cnpj, segment, sector, address, state_id, city_id, region,
                phone, whatsapp, email, responsible, consultant,
                consultant_secondary, rating, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.cnpj)
        .bind(&payload.segment)
        .bind(&payload.sector)
        .bind(&payload.address)
        .bind(state_id)
        .bind(city_id)
        .bind(&payload.region)
        .bind(&payload.phone)
        .bind(&payload.whatsapp)
        .bind(&payload.email)
        .bind(&payload.responsible)
        .bind(consultant)
        .bind(payload.consultant_secondary)
        .bind(payload.rating)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn obter(&self, id: i64) -> Result<Option<EmpresaDetalhe>, AppError> {
        let empresa = sqlx::query_as::<_, EmpresaDetalhe>(&format!(
            "SELECT {COLUNAS_DETALHE} {JOINS_DETALHE} WHERE e.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(empresa)
    }

    /// Listagem paginada. Retorna a página e o total para a paginação.
    pub async fn listar(
        &self,
        filtros: &EmpresaFiltros,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<EmpresaDetalhe>, i64), AppError> {
        let mut total_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM empresas e WHERE 1 = 1");
        Self::aplicar_filtros(&mut total_qb, filtros);
        let total = total_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUNAS_DETALHE} {JOINS_DETALHE} WHERE 1 = 1"
        ));
        Self::aplicar_filtros(&mut qb, filtros);
        qb.push(" ORDER BY e.name ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let empresas = qb
            .build_query_as::<EmpresaDetalhe>()
            .fetch_all(&self.pool)
            .await?;

        Ok((empresas, total))
    }

    fn aplicar_filtros(qb: &mut QueryBuilder<'_, Postgres>, filtros: &EmpresaFiltros) {
        if let Some(status) = filtros.status {
            qb.push(" AND e.status = ").push_bind(status);
        }
        if let Some(search) = filtros.search.as_deref().filter(|s| !s.is_empty()) {
            let termo = format!("%{search}%");
            qb.push(" AND (e.name ILIKE ")
                .push_bind(termo.clone())
                .push(" OR e.cnpj ILIKE ")
                .push_bind(termo.clone())
                .push(" OR e.segment ILIKE ")
                .push_bind(termo)
                .push(")");
        }
    }

    /// Projeção mínima para as checagens de permissão.
    pub async fn obter_consultores<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<EmpresaConsultores>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let empresa = sqlx::query_as::<_, EmpresaConsultores>(
            "SELECT id, name, consultant, consultant_secondary FROM empresas WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(empresa)
    }

    /// Atualização parcial: colunas ausentes preservam o valor atual.
    pub async fn atualizar(
        &self,
        id: i64,
        payload: &AtualizarEmpresaPayload,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE empresas SET
                name = COALESCE($2, name),
                cnpj = COALESCE($3, cnpj),
                segment = COALESCE($4, segment),
                sector = COALESCE($5, sector),
                address = COALESCE($6, address),
                state_id = COALESCE($7, state_id),
                city_id = COALESCE($8, city_id),
                region = COALESCE($9, region),
                phone = COALESCE($10, phone),
                whatsapp = COALESCE($11, whatsapp),
                email = COALESCE($12, email),
                responsible = COALESCE($13, responsible),
                consultant = COALESCE($14, consultant),
                consultant_secondary = COALESCE($15, consultant_secondary),
                rating = COALESCE($16, rating),
                status = COALESCE($17, status),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref())
        .bind(payload.cnpj.as_deref())
        .bind(payload.segment.as_deref())
        .bind(payload.sector.as_deref())
        .bind(payload.address.as_deref())
        .bind(payload.state_id)
        .bind(payload.city_id)
        .bind(payload.region.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.whatsapp.as_deref())
        .bind(payload.email.as_deref())
        .bind(payload.responsible.as_deref())
        .bind(payload.consultant)
        .bind(payload.consultant_secondary)
        .bind(payload.rating)
        .bind(payload.status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn atualizar_status(
        &self,
        id: i64,
        status: StatusEmpresa,
    ) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE empresas SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
