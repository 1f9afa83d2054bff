// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Visitas ---
        handlers::visitas::listar,
        handlers::visitas::obter,
        handlers::visitas::criar,
        handlers::visitas::remarcar,
        handlers::visitas::cancelar,

        // --- Check-in ---
        handlers::checkin::obter,
        handlers::checkin::salvar,

        // --- Empresas ---
        handlers::empresas::criar,
        handlers::empresas::listar,

        // --- Diagnósticos ---
        handlers::diagnosticos::listar,
        handlers::diagnosticos::obter,
        handlers::diagnosticos::salvar,
        handlers::diagnosticos::excluir,

        // --- Dashboard ---
        handlers::dashboard::cards,
        handlers::dashboard::visitas,

        // --- Relatórios ---
        handlers::relatorios::dados,
        handlers::relatorios::timeline,

        // --- Referências ---
        handlers::referencias::listar,
        handlers::usuarios::listar,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::UsuarioResumo,
            models::auth::LoginPayload,
            models::auth::LoginResposta,

            // --- Visitas ---
            models::visita::StatusVisita,
            models::visita::TipoVisita,
            models::visita::VisitaListagemItem,
            models::visita::VisitaDetalhe,
            models::visita::CriarVisitaPayload,
            models::visita::RemarcarVisitaPayload,
            models::visita::CriarVisitaResposta,
            models::visita::AcaoVisitaResposta,

            // --- Check-in ---
            models::checkin::Checkin,
            models::checkin::SalvarCheckinPayload,
            models::checkin::SalvarCheckinResposta,
            models::checkin::AnexoInfo,

            // --- Empresas ---
            models::empresa::StatusEmpresa,
            models::empresa::EmpresaDetalhe,
            models::empresa::CriarEmpresaPayload,
            models::empresa::AtualizarEmpresaPayload,
            models::empresa::AtualizarStatusEmpresaPayload,
            models::empresa::Paginacao,
            models::empresa::EmpresaListagemResposta,

            // --- Diagnósticos ---
            models::diagnostico::TipoItemParque,
            models::diagnostico::ParqueItemView,
            models::diagnostico::ParqueItemPayload,
            models::diagnostico::OperacaoDados,
            models::diagnostico::PrevisaoDados,
            models::diagnostico::RelacionamentoDados,
            models::diagnostico::DiagnosticoData,
            models::diagnostico::SalvarDiagnosticoPayload,
            models::diagnostico::SalvarDiagnosticoResposta,
            models::diagnostico::DiagnosticoListagemItem,
            models::diagnostico::DiagnosticoListagemResposta,

            // --- Dashboard / Relatórios ---
            models::dashboard::DashboardCards,
            models::dashboard::DashboardVisitaItem,
            models::dashboard::TimelineEvento,
            models::dashboard::TimelineResposta,

            // --- Referências ---
            models::referencia::Estado,
            models::referencia::Cidade,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação de consultores e gestores"),
        (name = "Visitas", description = "Agendamento e ciclo de vida das visitas comerciais"),
        (name = "Check-in", description = "Registro do resultado das visitas"),
        (name = "Empresas", description = "Cadastro e carteira de empresas"),
        (name = "Diagnósticos", description = "Ficha de diagnóstico e parque de máquinas"),
        (name = "Dashboard", description = "Indicadores e visão semanal"),
        (name = "Relatórios", description = "Datasets para exportação e linha do tempo"),
        (name = "Referências", description = "Estados, cidades e usuários"),
        (name = "Usuários", description = "Listagem de usuários ativos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
