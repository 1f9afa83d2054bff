// src/db/user_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::auth::{Role, Usuario, UsuarioResumo},
};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca um usuário ativo pelo e-mail (login).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT id, name, email, pass_hash, role, active, created_at, updated_at
            FROM usuarios
            WHERE email = $1 AND active = TRUE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(usuario)
    }

    /// Lista usuários ativos, com filtro opcional por papel.
    pub async fn listar(&self, role: Option<Role>) -> Result<Vec<UsuarioResumo>, AppError> {
        let usuarios = sqlx::query_as::<_, UsuarioResumo>(
            r#"
            SELECT id, name, email, role
            FROM usuarios
            WHERE active = TRUE AND ($1::user_role IS NULL OR role = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(usuarios)
    }
}
