// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeader,
};

use crate::{common::error::AppError, config::AppState, models::auth::Role};

// Perfil extraído das claims do token, disponível em qualquer handler
// atrás do middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Middleware de autenticação: valida o Bearer token e injeta o
/// usuário nas extensions da requisição.
pub async fn exigir_autenticacao(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::TokenInvalido)?;
    let claims = state.auth_service.validate_token(bearer.token())?;

    request.extensions_mut().insert(AuthenticatedUser {
        id: claims.sub,
        name: claims.name,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::TokenInvalido)
    }
}
