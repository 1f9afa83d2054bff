//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use visitas_backend::config::AppState;
use visitas_backend::docs::ApiDoc;
use visitas_backend::handlers;
use visitas_backend::middleware::auth::exigir_autenticacao;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() aqui é proposital: sem configuração válida a aplicação não sobe.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas (sem token)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Tudo abaixo exige o Bearer token válido
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/visitas",
            get(handlers::visitas::listar).post(handlers::visitas::criar),
        )
        .route("/visitas/{id}", get(handlers::visitas::obter))
        .route("/visitas/{id}/remarcar", patch(handlers::visitas::remarcar))
        .route("/visitas/{id}/cancelar", patch(handlers::visitas::cancelar))
        .route(
            "/checkin/{visita_id}",
            get(handlers::checkin::obter)
                .post(handlers::checkin::salvar)
                .put(handlers::checkin::salvar),
        )
        .route("/checkins", get(handlers::checkin::listar))
        .route("/upload", post(handlers::anexos::upload))
        .route("/download", get(handlers::anexos::download))
        .route(
            "/empresas",
            get(handlers::empresas::listar).post(handlers::empresas::criar),
        )
        .route(
            "/empresas/{id}",
            get(handlers::empresas::obter)
                .put(handlers::empresas::atualizar)
                .patch(handlers::empresas::atualizar_status),
        )
        .route(
            "/diagnosticos",
            get(handlers::diagnosticos::obter_por_query)
                .post(handlers::diagnosticos::salvar)
                .delete(handlers::diagnosticos::excluir_por_query),
        )
        .route("/diagnosticos/lista", get(handlers::diagnosticos::listar))
        .route(
            "/diagnosticos/{empresa_id}",
            get(handlers::diagnosticos::obter).delete(handlers::diagnosticos::excluir),
        )
        .route("/dashboard", get(handlers::dashboard::cards))
        .route("/dashboard/visitas", get(handlers::dashboard::visitas))
        .route("/relatorios", get(handlers::relatorios::dados))
        .route("/timeline", get(handlers::relatorios::timeline))
        .route("/estados-cidades", get(handlers::referencias::listar))
        .route("/usuarios", get(handlers::usuarios::listar))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            exigir_autenticacao,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_owned());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
