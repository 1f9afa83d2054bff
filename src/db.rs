pub mod user_repo;
pub use user_repo::UserRepository;
pub mod visita_repo;
pub use visita_repo::VisitaRepository;
pub mod checkin_repo;
pub use checkin_repo::CheckinRepository;
pub mod empresa_repo;
pub use empresa_repo::EmpresaRepository;
pub mod diagnostico_repo;
pub use diagnostico_repo::DiagnosticoRepository;
pub mod referencia_repo;
pub use referencia_repo::ReferenciaRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod relatorio_repo;
pub use relatorio_repo::RelatorioRepository;
