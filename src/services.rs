pub mod auth;
pub use auth::AuthService;
pub mod policy;
pub mod visita_service;
pub use visita_service::VisitaService;
pub mod checkin_service;
pub use checkin_service::CheckinService;
pub mod anexo_service;
pub use anexo_service::AnexoService;
pub mod diagnostico_service;
pub use diagnostico_service::DiagnosticoService;
pub mod empresa_service;
pub use empresa_service::EmpresaService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod relatorio_service;
pub use relatorio_service::RelatorioService;
