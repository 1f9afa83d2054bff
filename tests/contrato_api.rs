// Testes do contrato da API que não dependem de banco: mapeamento de
// erros para status HTTP e formas de serialização das respostas.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value};

use visitas_backend::common::error::AppError;
use visitas_backend::models::auth::Role;
use visitas_backend::models::checkin::SalvarCheckinPayload;
use visitas_backend::models::dashboard::DashboardCards;
use visitas_backend::models::diagnostico::{DiagnosticoListagemItem, DiagnosticoListagemResposta};
use visitas_backend::models::empresa::Paginacao;
use visitas_backend::models::visita::{AcaoVisitaResposta, CriarVisitaResposta};

mod status_de_erro {
    use super::*;

    #[test]
    fn campos_obrigatorios_e_regras_de_negocio_viram_400() {
        let resp = AppError::CampoObrigatorio("CAMPO date É OBRIGATÓRIO".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::RegraDeNegocio("TIPO DE RELATÓRIO INVÁLIDO".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn credenciais_invalidas_e_400_como_no_sistema_original() {
        let resp = AppError::CredenciaisInvalidas("SENHA INCORRETA").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn token_invalido_e_401() {
        let resp = AppError::TokenInvalido.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn nao_encontrado_e_404() {
        let resp = AppError::NaoEncontrado("VISITA NÃO ENCONTRADA").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn negacoes_de_permissao_viram_403() {
        let resp = AppError::SemPermissao {
            mensagem: "VOCÊ NÃO TEM PERMISSÃO PARA ALTERAR ESTA VISITA",
            debug: json!({ "visita_created_by": 7, "usuario_atual": 9 }),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = AppError::Proibido("ACESSO NEGADO").into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = AppError::ApenasGestores.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn erro_de_banco_vira_500() {
        let resp = AppError::DatabaseError(sqlx::Error::PoolClosed).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

mod formas_de_resposta {
    use super::*;

    #[test]
    fn criar_visita_omite_flags_ausentes() {
        let resposta = CriarVisitaResposta {
            success: true,
            id: 12,
            sequence: 3,
            message: None,
            warning: None,
            retroativa: None,
            prospeccao: None,
            trabalho_interno: None,
            consultor_secundario: None,
        };
        let v: Value = serde_json::to_value(&resposta).unwrap();
        assert_eq!(v, json!({ "success": true, "id": 12, "sequence": 3 }));
    }

    #[test]
    fn criar_visita_prospeccao_carrega_flag_e_mensagem() {
        let resposta = CriarVisitaResposta {
            success: true,
            id: 1,
            sequence: 1,
            message: Some("PROSPECÇÃO DE CLIENTE AGENDADA COM SUCESSO".to_owned()),
            warning: None,
            retroativa: None,
            prospeccao: Some(true),
            trabalho_interno: None,
            consultor_secundario: None,
        };
        let v: Value = serde_json::to_value(&resposta).unwrap();
        assert_eq!(v["prospeccao"], json!(true));
        assert_eq!(v["message"], json!("PROSPECÇÃO DE CLIENTE AGENDADA COM SUCESSO"));
        assert!(v.get("warning").is_none());
    }

    #[test]
    fn acao_sem_mensagem_e_so_success() {
        let v = serde_json::to_value(AcaoVisitaResposta { success: true, message: None }).unwrap();
        assert_eq!(v, json!({ "success": true }));
    }

    #[test]
    fn cards_do_dashboard_usam_chaves_em_caixa_alta() {
        let cards = DashboardCards {
            agendada: 4,
            realizada: 2,
            remarcada: 1,
            cancelada: 0,
            atrasadas: 3,
        };
        let v: Value = serde_json::to_value(&cards).unwrap();
        assert_eq!(v["AGENDADA"], json!(4));
        assert_eq!(v["ATRASADAS"], json!(3));
        assert!(v.get("agendada").is_none());
    }

    #[test]
    fn listagem_de_diagnosticos_embute_paginacao_e_resumo() {
        use chrono::Utc;

        let item = DiagnosticoListagemItem {
            id: 7,
            empresa_id: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            empresa_nome: "SUCATAS UNIDAS".to_owned(),
            cnpj: "00.000.000/0001-00".to_owned(),
            consultor_id: 2,
            consultor_nome: "Não atribuído".to_owned(),
            cidade_nome: None,
            estado_nome: None,
            total_equipamentos: 4,
            total_implementos: 1,
            tipo_operacao: "TESOURA".to_owned(),
            tipo_sucata: String::new(),
            tipo_cliente: String::new(),
            prazo_expansao: String::new(),
            tem_relacionamento: true,
        };
        let resposta = DiagnosticoListagemResposta {
            success: true,
            data: vec![item],
            pagination: Paginacao::nova(1, 10, 25),
        };

        let v: Value = serde_json::to_value(&resposta).unwrap();
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["data"][0]["total_equipamentos"], json!(4));
        assert_eq!(v["data"][0]["tem_relacionamento"], json!(true));
        assert_eq!(v["pagination"]["pages"], json!(3));
        assert_eq!(v["pagination"]["total"], json!(25));
    }

    #[test]
    fn role_serializa_em_caixa_alta() {
        assert_eq!(serde_json::to_string(&Role::Gestor).unwrap(), "\"GESTOR\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"CONSULTOR\"").unwrap(),
            Role::Consultor
        );
    }

}

mod payload_de_checkin {
    use super::*;

    #[test]
    fn finalizar_exige_is_draft_false_explicito() {
        let payload: SalvarCheckinPayload = serde_json::from_value(json!({
            "summary": "Visita produtiva",
            "is_draft": false
        }))
        .unwrap();
        assert!(payload.finaliza());

        let rascunho: SalvarCheckinPayload =
            serde_json::from_value(json!({ "summary": "parcial" })).unwrap();
        assert!(!rascunho.finaliza());

        let explicito: SalvarCheckinPayload =
            serde_json::from_value(json!({ "is_draft": true })).unwrap();
        assert!(!explicito.finaliza());
    }

    #[test]
    fn termometro_fora_da_faixa_reprova_na_validacao() {
        use validator::Validate;

        let payload: SalvarCheckinPayload =
            serde_json::from_value(json!({ "termometro": 11 })).unwrap();
        assert!(payload.validate().is_err());

        let payload: SalvarCheckinPayload =
            serde_json::from_value(json!({ "termometro": 10 })).unwrap();
        assert!(payload.validate().is_ok());
    }
}
