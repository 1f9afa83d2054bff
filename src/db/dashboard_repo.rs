// src/db/dashboard_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardCards, DashboardFiltros, DashboardVisitaItem},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Contadores dos cards. AGENDADA só conta visitas futuras; as
    /// vencidas entram em ATRASADAS, mantendo a soma dos dois igual ao
    /// total de AGENDADA persistidas.
    pub async fn cards(
        &self,
        scope: Option<i64>,
        filtros: &DashboardFiltros,
    ) -> Result<DashboardCards, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE v.status = 'AGENDADA' AND v.date >= NOW()) AS agendada,
                COUNT(*) FILTER (WHERE v.status = 'REALIZADA') AS realizada,
                COUNT(*) FILTER (WHERE v.status = 'REMARCADA') AS remarcada,
                COUNT(*) FILTER (WHERE v.status = 'CANCELADA') AS cancelada,
                COUNT(*) FILTER (WHERE v.status = 'AGENDADA' AND v.date < NOW()) AS atrasadas
            FROM visitas v
            LEFT JOIN empresas e ON e.id = v.company_id
            WHERE 1 = 1
            "#,
        );

        Self::aplicar_escopo(&mut qb, scope);
        Self::aplicar_periodo(&mut qb, filtros);

        let cards = qb
            .build_query_as::<DashboardCards>()
            .fetch_one(&self.pool)
            .await?;

        Ok(cards)
    }

    /// Listagem de visitas do dashboard, com o resumo do check-in. O
    /// filtro de status aceita o pseudo-status ATRASADA.
    pub async fn listar_visitas(
        &self,
        scope: Option<i64>,
        filtros: &DashboardFiltros,
    ) -> Result<Vec<DashboardVisitaItem>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                v.id, v.date, v."type" AS "type", v.visit_sequence, v.status,
                v.objetivo, v.meta_estabelecida, v.is_retroativa, v.is_prospeccao,
                v.empresa_livre,
                COALESCE(e.name, v.company_name, v.empresa_livre, '') AS empresa_nome,
                e.cnpj AS empresa_cnpj,
                e.segment AS empresa_segmento,
                e.region AS empresa_regiao,
                e.rating AS empresa_rating,
                u.name AS consultor_nome,
                c.created_at AS checkin_data,
                c.updated_at AS checkin_updated,
                c.summary AS checkin_summary,
                c.opportunity AS checkin_opportunity,
                CASE
                    WHEN v.status = 'AGENDADA' AND v.date < NOW() THEN 'ATRASADA'
                    ELSE v.status::TEXT
                END AS status_calculado
            FROM visitas v
            LEFT JOIN empresas e ON e.id = v.company_id
            LEFT JOIN usuarios u ON u.id = v.created_by
            LEFT JOIN checkin c ON c.visita_id = v.id
            WHERE 1 = 1
            "#,
        );

        Self::aplicar_escopo(&mut qb, scope);
        Self::aplicar_periodo(&mut qb, filtros);

        // AGENDADA e ATRASADA são o mesmo status persistido, separados
        // pela data; os demais filtram direto pelo enum.
        match filtros.status.as_deref() {
            Some("ATRASADA") => {
                qb.push(" AND v.status = 'AGENDADA' AND v.date < NOW()");
            }
            Some("AGENDADA") => {
                qb.push(" AND v.status = 'AGENDADA' AND v.date >= NOW()");
            }
            Some(status) if !status.is_empty() => {
                qb.push(" AND v.status::TEXT = ").push_bind(status.to_owned());
            }
            _ => {}
        }

        qb.push(" ORDER BY v.date DESC");

        let visitas = qb
            .build_query_as::<DashboardVisitaItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(visitas)
    }

    fn aplicar_escopo(qb: &mut QueryBuilder<'_, Postgres>, scope: Option<i64>) {
        if let Some(uid) = scope {
            qb.push(" AND (v.created_by = ")
                .push_bind(uid)
                .push(" OR e.consultant = ")
                .push_bind(uid)
                .push(" OR e.consultant_secondary = ")
                .push_bind(uid)
                .push(")");
        }
    }

    fn aplicar_periodo(qb: &mut QueryBuilder<'_, Postgres>, filtros: &DashboardFiltros) {
        if let Some(inicio) = filtros.data_inicio {
            qb.push(" AND v.date::DATE >= ").push_bind(inicio);
        }
        if let Some(fim) = filtros.data_fim {
            qb.push(" AND v.date::DATE <= ").push_bind(fim);
        }
    }
}
