// src/models/checkin.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::visita::{StatusVisita, TipoVisita};

// Registro de check-in. `has_attachment` é derivado no SELECT a partir
// da coluna `attachment`, como no sistema original.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Checkin {
    pub id: i64,
    pub visita_id: i64,
    pub is_draft: bool,
    pub summary: String,
    pub opportunity: bool,
    pub negociacao: bool,
    pub termometro: i16,
    pub numero_os: String,
    pub attachment: Option<String>,
    pub attachment_original_name: Option<String>,
    pub attachment_size: Option<i64>,
    pub attachment_type: Option<String>,
    pub has_attachment: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Upsert parcial: só os campos presentes no corpo são gravados.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SalvarCheckinPayload {
    pub summary: Option<String>,
    pub opportunity: Option<bool>,
    pub negociacao: Option<bool>,
    #[validate(range(min = 1, max = 10, message = "TERMÔMETRO DEVE ESTAR ENTRE 1 E 10"))]
    pub termometro: Option<i16>,
    pub numero_os: Option<String>,
    pub is_draft: Option<bool>,
}

impl SalvarCheckinPayload {
    /// Finalizar é mandar `is_draft = false`; é o gatilho que marca a
    /// visita como REALIZADA.
    pub fn finaliza(&self) -> bool {
        self.is_draft == Some(false)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalvarCheckinResposta {
    pub success: bool,
    pub id: i64,
    pub message: &'static str,
}

// Linha da listagem de check-ins (INNER JOIN com visitas).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CheckinListagemItem {
    pub visita_id: i64,
    pub date: DateTime<Utc>,
    pub tipo_visita: TipoVisita,
    pub status: StatusVisita,
    pub objetivo: Option<String>,
    pub empresa_nome: Option<String>,
    pub empresa_cnpj: Option<String>,
    pub consultor_nome: Option<String>,
    pub cidade_nome: Option<String>,
    pub estado_nome: Option<String>,
    pub checkin_id: i64,
    pub resumo: String,
    pub oportunidade: bool,
    pub negociacao: bool,
    pub termometro: i16,
    pub numero_os: String,
    pub data_checkin: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CheckinFiltros {
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub empresa: Option<String>,
    pub consultor: Option<String>,
}

// Projeção usada pelo download: o arquivo e o dono da visita.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnexoDownload {
    pub attachment: Option<String>,
    pub attachment_original_name: Option<String>,
    pub attachment_type: Option<String>,
    pub created_by: i64,
}

// Metadados do anexo gravados junto ao check-in após o upload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnexoInfo {
    pub filename: String,
    pub original_name: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub tipo: String,
}
