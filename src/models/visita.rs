// src/models/visita.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::error::AppError;

// --- ENUMS ---

// Mapeia o CREATE TYPE status_visita do banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_visita", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusVisita {
    Agendada,
    Remarcada,
    Realizada,
    Cancelada,
}

impl StatusVisita {
    /// Valida a transição para REMARCADA. Só AGENDADA pode ser remarcada;
    /// uma visita remarcada não volta a ser remarcada.
    pub fn validar_remarcacao(self) -> Result<(), AppError> {
        match self {
            StatusVisita::Remarcada => Err(AppError::RegraDeNegocio(
                "VISITAS REMARCADAS NÃO PODEM SER REMARCADAS NOVAMENTE".into(),
            )),
            StatusVisita::Realizada => Err(AppError::RegraDeNegocio(
                "VISITAS REALIZADAS NÃO PODEM SER REMARCADAS".into(),
            )),
            StatusVisita::Cancelada => Err(AppError::RegraDeNegocio(
                "VISITAS CANCELADAS NÃO PODEM SER REMARCADAS".into(),
            )),
            StatusVisita::Agendada => Ok(()),
        }
    }

    /// Valida a transição para CANCELADA. Apenas REALIZADA é terminal aqui.
    pub fn validar_cancelamento(self) -> Result<(), AppError> {
        match self {
            StatusVisita::Realizada => Err(AppError::RegraDeNegocio(
                "VISITAS REALIZADAS NÃO PODEM SER CANCELADAS".into(),
            )),
            _ => Ok(()),
        }
    }
}

// Tipos de visita aceitos. Os rótulos do banco não levam acento; os da
// API preservam a grafia original do sistema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_visita", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoVisita {
    #[serde(rename = "COMERCIAL")]
    Comercial,
    #[serde(rename = "TÉCNICA")]
    Tecnica,
    #[serde(rename = "RELACIONAMENTO")]
    Relacionamento,
    #[serde(rename = "TRABALHO INTERNO")]
    TrabalhoInterno,
    #[serde(rename = "OUTROS")]
    Outros,
    #[serde(rename = "PROSPECÇÃO DE CLIENTE")]
    Prospeccao,
}

/// Uma visita é retroativa quando já nasce com a data no passado.
pub fn eh_retroativa(date: DateTime<Utc>, agora: DateTime<Utc>) -> bool {
    date < agora
}

// --- LINHAS DO BANCO ---

// Linha da listagem: joins de empresa/cidade/consultor mais o status
// derivado (ATRASADA quando AGENDADA com data vencida, calculado no SQL).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct VisitaListagemItem {
    pub id: i64,
    pub company_id: Option<i64>,
    pub empresa_livre: Option<String>,
    pub is_prospeccao: bool,
    pub city_id: i64,
    pub date: DateTime<Utc>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub tipo: TipoVisita,
    pub visit_sequence: i32,
    pub objetivo: Option<String>,
    pub meta_estabelecida: Option<String>,
    pub status: StatusVisita,
    pub is_retroativa: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub empresa_nome: Option<String>,
    pub cidade_nome: Option<String>,
    pub consultor_nome: Option<String>,
    pub status_calculado: String,
}

// Visita específica com os dados de contato da empresa.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct VisitaDetalhe {
    pub id: i64,
    pub company_id: Option<i64>,
    pub empresa_livre: Option<String>,
    pub company_name: Option<String>,
    pub is_prospeccao: bool,
    pub city_id: i64,
    pub date: DateTime<Utc>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub tipo: TipoVisita,
    pub visit_sequence: i32,
    pub objetivo: Option<String>,
    pub meta_estabelecida: Option<String>,
    pub status: StatusVisita,
    pub is_retroativa: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub empresa_nome: Option<String>,
    pub empresa_endereco: Option<String>,
    pub empresa_telefone: Option<String>,
    pub empresa_whatsapp: Option<String>,
    pub empresa_responsavel: Option<String>,
    pub cidade_nome: Option<String>,
    pub consultor_nome: Option<String>,
}

// Projeção mínima usada pelas checagens de permissão e pelo state machine.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VisitaPermissao {
    pub id: i64,
    pub created_by: i64,
    pub status: StatusVisita,
    #[sqlx(rename = "type")]
    pub tipo: TipoVisita,
    pub company_id: Option<i64>,
    pub consultant: Option<i64>,
    pub consultant_secondary: Option<i64>,
}

// --- PAYLOADS ---

// Os obrigatórios condicionais (por tipo e prospecção) são checados no
// serviço, que devolve as mensagens de CAMPO OBRIGATÓRIO; por isso os
// campos chegam como Option.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CriarVisitaPayload {
    pub company_id: Option<i64>,
    pub empresa_livre: Option<String>,
    #[serde(default)]
    pub is_prospeccao: bool,
    pub city_id: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub tipo: Option<TipoVisita>,
    pub objetivo: Option<String>,
    pub meta_estabelecida: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemarcarVisitaPayload {
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct VisitaFiltros {
    pub status: Option<StatusVisita>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub company_id: Option<i64>,
    pub city_id: Option<i64>,
    #[serde(rename = "type")]
    pub tipo: Option<TipoVisita>,
    pub consultor: Option<i64>,
}

// --- RESPOSTAS ---

#[derive(Debug, Serialize, ToSchema)]
pub struct CriarVisitaResposta {
    pub success: bool,
    pub id: i64,
    pub sequence: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retroativa: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prospeccao: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trabalho_interno: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultor_secundario: Option<bool>,
}

// Resposta de remarcar/cancelar. A mensagem só aparece para o fluxo
// de trabalho interno.
#[derive(Debug, Serialize, ToSchema)]
pub struct AcaoVisitaResposta {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn agendada_pode_ser_remarcada_e_cancelada() {
        assert!(StatusVisita::Agendada.validar_remarcacao().is_ok());
        assert!(StatusVisita::Agendada.validar_cancelamento().is_ok());
    }

    #[test]
    fn remarcada_nao_pode_ser_remarcada_novamente() {
        let err = StatusVisita::Remarcada.validar_remarcacao().unwrap_err();
        assert!(err
            .to_string()
            .contains("REMARCADAS NÃO PODEM SER REMARCADAS NOVAMENTE"));
        // mas cancelar ainda é permitido
        assert!(StatusVisita::Remarcada.validar_cancelamento().is_ok());
    }

    #[test]
    fn realizada_e_terminal() {
        assert!(StatusVisita::Realizada.validar_remarcacao().is_err());
        assert!(StatusVisita::Realizada.validar_cancelamento().is_err());
    }

    #[test]
    fn cancelada_nao_remarca_mas_cancelar_e_idempotente() {
        assert!(StatusVisita::Cancelada.validar_remarcacao().is_err());
        assert!(StatusVisita::Cancelada.validar_cancelamento().is_ok());
    }

    #[test]
    fn retroativa_apenas_com_data_no_passado() {
        let agora = Utc::now();
        assert!(eh_retroativa(agora - Duration::hours(1), agora));
        assert!(!eh_retroativa(agora + Duration::hours(1), agora));
    }

    #[test]
    fn payload_de_criacao_aceita_json_parcial() {
        // a obrigatoriedade é condicional (tipo, prospecção) e fica no
        // serviço; a desserialização nunca deve rejeitar campo ausente
        let payload: CriarVisitaPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.company_id.is_none());
        assert!(payload.city_id.is_none());
        assert!(payload.date.is_none());
        assert!(payload.tipo.is_none());
        assert!(!payload.is_prospeccao);

        let remarcar: RemarcarVisitaPayload = serde_json::from_str("{}").unwrap();
        assert!(remarcar.date.is_none());
    }

    #[test]
    fn tipo_visita_usa_grafia_original_na_api() {
        let t: TipoVisita = serde_json::from_str("\"PROSPECÇÃO DE CLIENTE\"").unwrap();
        assert_eq!(t, TipoVisita::Prospeccao);
        assert_eq!(
            serde_json::to_string(&TipoVisita::TrabalhoInterno).unwrap(),
            "\"TRABALHO INTERNO\""
        );
        assert!(serde_json::from_str::<TipoVisita>("\"FERIADO\"").is_err());
    }
}
