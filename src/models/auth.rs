// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Papel do usuário. GESTOR enxerga tudo; CONSULTOR só o que é dele.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Gestor,
    Consultor,
}

// Usuário vindo do banco de dados.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Usuario {
    pub id: i64,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)] // nunca expor o hash
    pub pass_hash: String,

    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Projeção pública usada em /usuarios e na resposta de login.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct UsuarioResumo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "EMAIL E SENHA SÃO OBRIGATÓRIOS"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResposta {
    pub success: bool,
    pub token: String,
    pub user: UsuarioResumo,
}

// Claims do JWT: o payload carrega o perfil inteiro, como o sistema
// original, para que o frontend não precise de uma segunda chamada.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}
