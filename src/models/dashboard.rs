// src/models/dashboard.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::visita::{StatusVisita, TipoVisita};

// Cards do dashboard semanal. As chaves do JSON seguem o contrato
// original (status em caixa alta).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct DashboardCards {
    #[serde(rename = "AGENDADA")]
    pub agendada: i64,
    #[serde(rename = "REALIZADA")]
    pub realizada: i64,
    #[serde(rename = "REMARCADA")]
    pub remarcada: i64,
    #[serde(rename = "CANCELADA")]
    pub cancelada: i64,
    #[serde(rename = "ATRASADAS")]
    pub atrasadas: i64,
}

#[derive(Debug, Deserialize)]
pub struct DashboardFiltros {
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub status: Option<String>,
}

// Linha da listagem de visitas do dashboard, com o resumo do check-in.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct DashboardVisitaItem {
    pub id: i64,
    pub date: DateTime<Utc>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub tipo: TipoVisita,
    pub visit_sequence: i32,
    pub status: StatusVisita,
    pub objetivo: Option<String>,
    pub meta_estabelecida: Option<String>,
    pub is_retroativa: bool,
    pub is_prospeccao: bool,
    pub empresa_livre: Option<String>,
    pub empresa_nome: String,
    pub empresa_cnpj: Option<String>,
    pub empresa_segmento: Option<String>,
    pub empresa_regiao: Option<String>,
    pub empresa_rating: Option<i32>,
    pub consultor_nome: Option<String>,
    pub checkin_data: Option<DateTime<Utc>>,
    pub checkin_updated: Option<DateTime<Utc>>,
    pub checkin_summary: Option<String>,
    pub checkin_opportunity: Option<bool>,
    pub status_calculado: String,
}

// Evento da linha do tempo de uma empresa: visitas e check-ins
// entrelaçados em ordem cronológica inversa.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct TimelineEvento {
    pub id: i64,
    pub data: DateTime<Utc>,
    pub resumo: Option<String>,
    pub status: String,
    pub tipo_visita: Option<String>,
    pub consultor_nome: Option<String>,
    pub tipo: String,
    pub visita_id: i64,
    pub oportunidade: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimelineResposta {
    pub success: bool,
    pub data: Vec<TimelineEvento>,
    pub pagination: crate::models::empresa::Paginacao,
}

#[derive(Debug, Deserialize)]
pub struct TimelineFiltros {
    pub empresa_id: Option<i64>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// Dataset plano de visitas para exportação (apenas GESTOR).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RelatorioVisitaItem {
    pub id: i64,
    pub date: DateTime<Utc>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub tipo: TipoVisita,
    pub status: StatusVisita,
    pub objetivo: Option<String>,
    pub meta_estabelecida: Option<String>,
    pub created_at: DateTime<Utc>,
    pub empresa_nome: Option<String>,
    pub empresa_cnpj: Option<String>,
    pub empresa_segmento: Option<String>,
    pub empresa_endereco: Option<String>,
    pub empresa_telefone: Option<String>,
    pub empresa_email: Option<String>,
    pub empresa_responsavel: Option<String>,
    pub consultor_nome: Option<String>,
    pub cidade_nome: Option<String>,
    pub estado_nome: Option<String>,
    pub status_calculado: String,
}

// Dataset plano de check-ins para exportação (apenas GESTOR).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RelatorioCheckinItem {
    pub visita_id: i64,
    pub date: DateTime<Utc>,
    pub tipo_visita: TipoVisita,
    pub status: StatusVisita,
    pub objetivo: Option<String>,
    pub meta_estabelecida: Option<String>,
    pub empresa_nome: Option<String>,
    pub empresa_cnpj: Option<String>,
    pub empresa_segmento: Option<String>,
    pub consultor_nome: Option<String>,
    pub cidade_nome: Option<String>,
    pub estado_nome: Option<String>,
    pub checkin_id: i64,
    pub resumo: String,
    pub oportunidade: bool,
    pub negociacao: bool,
    pub termometro: i16,
    pub numero_os: String,
    pub tem_anexo: bool,
    pub nome_anexo: Option<String>,
    pub data_checkin: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RelatorioFiltros {
    pub tipo: Option<String>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
}
