// src/db/referencia_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::referencia::{Cidade, Estado},
};

#[derive(Clone)]
pub struct ReferenciaRepository {
    pool: PgPool,
}

impl ReferenciaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar_estados(&self) -> Result<Vec<Estado>, AppError> {
        let estados =
            sqlx::query_as::<_, Estado>("SELECT id, nome, sigla FROM estados ORDER BY nome ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(estados)
    }

    pub async fn listar_cidades(&self, estado_id: Option<i64>) -> Result<Vec<Cidade>, AppError> {
        let cidades = sqlx::query_as::<_, Cidade>(
            r#"
            SELECT c.id, c.nome, c.estado_id, e.nome AS estado_nome, e.sigla AS estado_sigla
            FROM cidades c
            INNER JOIN estados e ON e.id = c.estado_id
            WHERE $1::BIGINT IS NULL OR c.estado_id = $1
            ORDER BY c.nome ASC
            "#,
        )
        .bind(estado_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cidades)
    }
}
