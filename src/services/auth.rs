// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, LoginPayload, LoginResposta, Usuario, UsuarioResumo},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn login(&self, payload: &LoginPayload) -> Result<LoginResposta, AppError> {
        let usuario = self
            .user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::CredenciaisInvalidas("USUÁRIO NÃO ENCONTRADO"))?;

        let senha = payload.password.clone();
        let hash = usuario.pass_hash.clone();

        // bcrypt é custoso; roda fora do runtime.
        let senha_valida = tokio::task::spawn_blocking(move || verify(&senha, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_valida {
            return Err(AppError::CredenciaisInvalidas("SENHA INCORRETA"));
        }

        let token = self.create_token(&usuario)?;

        // O contrato original devolve nome e e-mail em caixa alta só
        // na resposta de login.
        Ok(LoginResposta {
            success: true,
            token,
            user: UsuarioResumo {
                id: usuario.id,
                name: usuario.name.to_uppercase(),
                email: usuario.email.to_uppercase(),
                role: usuario.role,
            },
        })
    }

    /// Decodifica e valida o token. As claims carregam o perfil
    /// inteiro; não há ida ao banco por requisição.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::TokenInvalido)?;

        Ok(token_data.claims)
    }

    fn create_token(&self, usuario: &Usuario) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(24);

        let claims = Claims {
            sub: usuario.id,
            name: usuario.name.clone(),
            email: usuario.email.clone(),
            role: usuario.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
