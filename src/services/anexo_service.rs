// src/services/anexo_service.rs

use std::path::{Path, PathBuf};

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CheckinRepository, VisitaRepository},
    middleware::auth::AuthenticatedUser,
    models::checkin::AnexoInfo,
    services::policy,
};

// Tipos aceitos no upload de anexo de check-in.
const TIPOS_PERMITIDOS: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
];

const TAMANHO_MAXIMO: usize = 5 * 1024 * 1024; // 5MB

// Conteúdo servido no download.
pub struct AnexoArquivo {
    pub nome_download: String,
    pub mime: String,
    pub dados: Vec<u8>,
}

#[derive(Clone)]
pub struct AnexoService {
    checkin_repo: CheckinRepository,
    visita_repo: VisitaRepository,
    upload_dir: PathBuf,
    pool: PgPool,
}

impl AnexoService {
    pub fn new(
        checkin_repo: CheckinRepository,
        visita_repo: VisitaRepository,
        upload_dir: PathBuf,
        pool: PgPool,
    ) -> Self {
        Self { checkin_repo, visita_repo, upload_dir, pool }
    }

    /// Grava o arquivo em disco e os metadados no check-in. Um anexo
    /// anterior é removido do disco após o commit.
    pub async fn salvar(
        &self,
        visita_id: i64,
        original_name: &str,
        mime: &str,
        dados: &[u8],
    ) -> Result<AnexoInfo, AppError> {
        if !TIPOS_PERMITIDOS.contains(&mime) {
            return Err(AppError::RegraDeNegocio("TIPO DE ARQUIVO NÃO PERMITIDO".into()));
        }
        if dados.len() > TAMANHO_MAXIMO {
            return Err(AppError::RegraDeNegocio("ARQUIVO MUITO GRANDE (MÁXIMO 5MB)".into()));
        }

        let extensao = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let filename = format!(
            "checkin_{}_{}_{}.{}",
            visita_id,
            Utc::now().timestamp(),
            Uuid::new_v4().simple(),
            extensao
        );

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao criar diretório de uploads: {}", e))?;

        let destino = self.upload_dir.join(&filename);
        tokio::fs::write(&destino, dados)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao gravar anexo em disco: {}", e))?;

        let info = AnexoInfo {
            filename: filename.clone(),
            original_name: original_name.to_owned(),
            size: dados.len() as i64,
            tipo: mime.to_owned(),
        };

        let resultado = self.gravar_metadados(visita_id, &info).await;

        match resultado {
            Ok(anexo_antigo) => {
                if let Some(antigo) = anexo_antigo.filter(|a| !a.is_empty()) {
                    let caminho = self.upload_dir.join(&antigo);
                    if let Err(e) = tokio::fs::remove_file(&caminho).await {
                        tracing::warn!(arquivo = %antigo, erro = %e, "falha ao remover anexo antigo");
                    }
                }
                Ok(info)
            }
            Err(e) => {
                // O arquivo recém-gravado não pode ficar órfão no disco.
                if let Err(rm) = tokio::fs::remove_file(&destino).await {
                    tracing::warn!(arquivo = %filename, erro = %rm, "falha ao limpar anexo após erro");
                }
                Err(e)
            }
        }
    }

    async fn gravar_metadados(
        &self,
        visita_id: i64,
        info: &AnexoInfo,
    ) -> Result<Option<String>, AppError> {
        let mut tx = self.pool.begin().await?;

        self.visita_repo
            .obter_permissao(&mut *tx, visita_id)
            .await?
            .ok_or(AppError::NaoEncontrado("VISITA NÃO ENCONTRADA"))?;

        let anterior = self.checkin_repo.anexo_atual(&mut *tx, visita_id).await?;
        self.checkin_repo.gravar_anexo(&mut *tx, visita_id, info).await?;

        tx.commit().await?;
        Ok(anterior)
    }

    /// Lê o anexo do disco para o download, checando dono e existência
    /// na mesma ordem do fluxo original.
    pub async fn baixar(
        &self,
        user: &AuthenticatedUser,
        visita_id: i64,
    ) -> Result<AnexoArquivo, AppError> {
        let anexo = self
            .checkin_repo
            .anexo_para_download(visita_id)
            .await?
            .ok_or(AppError::NaoEncontrado("ANEXO NÃO ENCONTRADO"))?;

        let filename = anexo
            .attachment
            .filter(|a| !a.is_empty())
            .ok_or(AppError::NaoEncontrado("ANEXO NÃO ENCONTRADO"))?;

        let caminho = self.upload_dir.join(&filename);
        if tokio::fs::metadata(&caminho).await.is_err() {
            return Err(AppError::NaoEncontrado("ARQUIVO NÃO ENCONTRADO NO SERVIDOR"));
        }

        policy::autorizar_download_anexo(user.role, user.id, anexo.created_by)?;

        let dados = tokio::fs::read(&caminho)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao ler anexo do disco: {}", e))?;

        Ok(AnexoArquivo {
            nome_download: anexo.attachment_original_name.unwrap_or(filename),
            mime: anexo
                .attachment_type
                .unwrap_or_else(|| "application/octet-stream".to_owned()),
            dados,
        })
    }
}
