// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CheckinRepository, DashboardRepository, DiagnosticoRepository, EmpresaRepository,
        ReferenciaRepository, RelatorioRepository, UserRepository, VisitaRepository,
    },
    services::{
        AnexoService, AuthService, CheckinService, DashboardService, DiagnosticoService,
        EmpresaService, RelatorioService, VisitaService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub visita_service: VisitaService,
    pub checkin_service: CheckinService,
    pub anexo_service: AnexoService,
    pub diagnostico_service: DiagnosticoService,
    pub empresa_service: EmpresaService,
    pub dashboard_service: DashboardService,
    pub relatorio_service: RelatorioService,
    pub user_repo: UserRepository,
    pub referencia_repo: ReferenciaRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let upload_dir = PathBuf::from(
            env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads/checkins".to_owned()),
        );

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let visita_repo = VisitaRepository::new(db_pool.clone());
        let checkin_repo = CheckinRepository::new(db_pool.clone());
        let empresa_repo = EmpresaRepository::new(db_pool.clone());
        let diagnostico_repo = DiagnosticoRepository::new(db_pool.clone());
        let referencia_repo = ReferenciaRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let relatorio_repo = RelatorioRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let visita_service =
            VisitaService::new(visita_repo.clone(), empresa_repo.clone(), db_pool.clone());
        let checkin_service =
            CheckinService::new(checkin_repo.clone(), visita_repo.clone(), db_pool.clone());
        let anexo_service = AnexoService::new(
            checkin_repo,
            visita_repo,
            upload_dir,
            db_pool.clone(),
        );
        let diagnostico_service =
            DiagnosticoService::new(diagnostico_repo, empresa_repo.clone(), db_pool.clone());
        let empresa_service = EmpresaService::new(empresa_repo);
        let dashboard_service = DashboardService::new(dashboard_repo);
        let relatorio_service = RelatorioService::new(relatorio_repo);

        Ok(Self {
            db_pool,
            auth_service,
            visita_service,
            checkin_service,
            anexo_service,
            diagnostico_service,
            empresa_service,
            dashboard_service,
            relatorio_service,
            user_repo,
            referencia_repo,
        })
    }
}
