use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Tipo de erro único da aplicação. Cada endpoint converte suas falhas
// para uma variante daqui; o `IntoResponse` abaixo cuida do JSON final.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    CampoObrigatorio(String),

    #[error("{0}")]
    RegraDeNegocio(String),

    #[error("{0}")]
    CredenciaisInvalidas(&'static str),

    #[error("TOKEN INVÁLIDO")]
    TokenInvalido,

    #[error("{0}")]
    NaoEncontrado(&'static str),

    #[error("{mensagem}")]
    SemPermissao {
        mensagem: &'static str,
        debug: serde_json::Value,
    },

    #[error("{0}")]
    Proibido(&'static str),

    #[error("ACESSO NEGADO - APENAS GESTORES")]
    ApenasGestores,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "UM OU MAIS CAMPOS SÃO INVÁLIDOS",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            // Violação de permissão devolve os ids em conflito no campo
            // `debug`, como o frontend do sistema original espera.
            AppError::SemPermissao { mensagem, debug } => {
                let body = Json(json!({ "error": mensagem, "debug": debug }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }
            AppError::CampoObrigatorio(msg) | AppError::RegraDeNegocio(msg) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response();
            }
            AppError::CredenciaisInvalidas(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::TokenInvalido => (StatusCode::UNAUTHORIZED, "TOKEN INVÁLIDO"),
            AppError::NaoEncontrado(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Proibido(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ApenasGestores => {
                (StatusCode::FORBIDDEN, "ACESSO NEGADO - APENAS GESTORES")
            }

            // Todo o resto (banco, bcrypt, jwt interno, anyhow) vira 500.
            // O `tracing` registra a mensagem detalhada do `thiserror`.
            ref e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "OCORREU UM ERRO INESPERADO")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
