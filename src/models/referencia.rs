// src/models/referencia.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Estado {
    pub id: i64,
    pub nome: String,
    pub sigla: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Cidade {
    pub id: i64,
    pub nome: String,
    pub estado_id: i64,
    pub estado_nome: String,
    pub estado_sigla: String,
}

#[derive(Debug, Deserialize)]
pub struct ReferenciaQuery {
    pub estado_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UsuarioFiltros {
    pub role: Option<crate::models::auth::Role>,
}
