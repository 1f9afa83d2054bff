// src/handlers/anexos.rs

use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser};

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub visita_id: Option<i64>,
}

// POST /api/upload (multipart: attachment + visita_id)
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut visita_id: Option<i64> = None;
    let mut arquivo: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao ler multipart: {}", e))?
    {
        match field.name() {
            Some("visita_id") => {
                let texto = field
                    .text()
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha ao ler visita_id: {}", e))?;
                visita_id = texto.trim().parse().ok();
            }
            Some("attachment") => {
                let nome = field.file_name().unwrap_or("anexo.bin").to_owned();
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let dados = field
                    .bytes()
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha ao ler arquivo enviado: {}", e))?;
                arquivo = Some((nome, mime, dados.to_vec()));
            }
            _ => {}
        }
    }

    let visita_id = visita_id
        .ok_or_else(|| AppError::RegraDeNegocio("ID DA VISITA É OBRIGATÓRIO".into()))?;
    let (nome, mime, dados) = arquivo.ok_or_else(|| {
        AppError::RegraDeNegocio("NENHUM ARQUIVO ENVIADO OU ERRO NO UPLOAD".into())
    })?;

    let info = state.anexo_service.salvar(visita_id, &nome, &mime, &dados).await?;

    Ok(Json(json!({
        "success": true,
        "filename": info.filename,
        "original_name": info.original_name,
        "size": info.size,
        "type": info.tipo,
    })))
}

// GET /api/download?visita_id=
pub async fn download(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let visita_id = query
        .visita_id
        .ok_or_else(|| AppError::RegraDeNegocio("ID DA VISITA É OBRIGATÓRIO".into()))?;

    let arquivo = state.anexo_service.baixar(&user, visita_id).await?;

    let headers = [
        (header::CONTENT_TYPE, arquivo.mime),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", arquivo.nome_download),
        ),
        (header::CACHE_CONTROL, "no-cache, must-revalidate".to_owned()),
    ];

    Ok((headers, arquivo.dados).into_response())
}
