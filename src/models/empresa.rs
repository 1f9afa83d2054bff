// src/models/empresa.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_empresa", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusEmpresa {
    Ativa,
    Inativa,
}

// Empresa com os nomes resolvidos (cidade, consultores, criador).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct EmpresaDetalhe {
    pub id: i64,
    pub name: String,
    pub cnpj: String,
    pub segment: String,
    pub sector: String,
    pub address: String,
    pub state_id: i64,
    pub city_id: i64,
    pub region: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub responsible: String,
    pub consultant: i64,
    pub consultant_secondary: Option<i64>,
    pub rating: Option<i32>,
    pub status: StatusEmpresa,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cidade_nome: String,
    pub consultor_nome: String,
    pub consultor_secundario_nome: String,
    pub created_by_name: String,
}

// Projeção mínima para checagens de permissão de visita.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmpresaConsultores {
    pub id: i64,
    pub name: String,
    pub consultant: i64,
    pub consultant_secondary: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CriarEmpresaPayload {
    #[validate(length(min = 1, message = "Campo name é obrigatório"))]
    pub name: String,
    #[validate(length(min = 1, message = "Campo cnpj é obrigatório"))]
    pub cnpj: String,
    #[validate(length(min = 1, message = "Campo segment é obrigatório"))]
    pub segment: String,
    #[serde(default)]
    pub sector: String,
    #[validate(length(min = 1, message = "Campo address é obrigatório"))]
    pub address: String,
    pub state_id: Option<i64>,
    pub city_id: Option<i64>,
    #[validate(length(min = 1, message = "Campo region é obrigatório"))]
    pub region: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub responsible: String,
    pub consultant: Option<i64>,
    pub consultant_secondary: Option<i64>,
    pub rating: Option<i32>,
}

// Atualização parcial: só as colunas presentes são reescritas.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AtualizarEmpresaPayload {
    pub name: Option<String>,
    pub cnpj: Option<String>,
    pub segment: Option<String>,
    pub sector: Option<String>,
    pub address: Option<String>,
    pub state_id: Option<i64>,
    pub city_id: Option<i64>,
    pub region: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub responsible: Option<String>,
    pub consultant: Option<i64>,
    pub consultant_secondary: Option<i64>,
    pub rating: Option<i32>,
    pub status: Option<StatusEmpresa>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AtualizarStatusEmpresaPayload {
    pub status: StatusEmpresa,
}

#[derive(Debug, Deserialize)]
pub struct EmpresaFiltros {
    pub id: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<StatusEmpresa>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Paginacao {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Paginacao {
    pub fn nova(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self { page, limit, total, pages }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmpresaListagemResposta {
    pub success: bool,
    pub data: Vec<EmpresaDetalhe>,
    pub pagination: Paginacao,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginacao_arredonda_para_cima() {
        let p = Paginacao::nova(1, 50, 101);
        assert_eq!(p.pages, 3);
        let vazia = Paginacao::nova(1, 50, 0);
        assert_eq!(vazia.pages, 0);
    }
}
