// src/services/policy.rs
//
// Regras de autorização em um lugar só. Os services chamam estas
// funções em vez de reimplementar a checagem de papel em cada fluxo.

use serde_json::json;

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        empresa::EmpresaConsultores,
        visita::{TipoVisita, VisitaPermissao},
    },
};

/// Escopo de leitura: GESTOR enxerga tudo (None); CONSULTOR só o
/// próprio universo (Some(id) entra no WHERE das listagens).
pub fn escopo_consultor(role: Role, user_id: i64) -> Option<i64> {
    match role {
        Role::Gestor => None,
        Role::Consultor => Some(user_id),
    }
}

pub fn exigir_gestor(role: Role) -> Result<(), AppError> {
    match role {
        Role::Gestor => Ok(()),
        Role::Consultor => Err(AppError::ApenasGestores),
    }
}

/// CONSULTOR só altera visitas que criou ou de empresas onde é
/// consultor principal/secundário. O debug devolve os ids em conflito.
pub fn autorizar_alteracao_visita(
    role: Role,
    user_id: i64,
    visita: &VisitaPermissao,
) -> Result<(), AppError> {
    if role == Role::Gestor {
        return Ok(());
    }

    let permitido = visita.created_by == user_id
        || visita.consultant == Some(user_id)
        || visita.consultant_secondary == Some(user_id);

    if permitido {
        Ok(())
    } else {
        Err(AppError::SemPermissao {
            mensagem: "SEM PERMISSÃO PARA ALTERAR ESTA VISITA",
            debug: json!({
                "user_id": user_id,
                "created_by": visita.created_by,
                "consultant": visita.consultant,
                "consultant_secondary": visita.consultant_secondary,
            }),
        })
    }
}

/// Criação de visita para uma empresa: CONSULTOR precisa do vínculo,
/// exceto para trabalho interno e prospecção, que dispensam.
pub fn autorizar_visita_para_empresa(
    role: Role,
    user_id: i64,
    tipo: TipoVisita,
    empresa: &EmpresaConsultores,
) -> Result<(), AppError> {
    if role == Role::Gestor
        || matches!(tipo, TipoVisita::TrabalhoInterno | TipoVisita::Prospeccao)
    {
        return Ok(());
    }

    let permitido =
        empresa.consultant == user_id || empresa.consultant_secondary == Some(user_id);

    if permitido {
        Ok(())
    } else {
        Err(AppError::SemPermissao {
            mensagem: "SEM PERMISSÃO PARA CRIAR VISITA PARA ESTA EMPRESA",
            debug: json!({
                "user_id": user_id,
                "consultant": empresa.consultant,
                "consultant_secondary": empresa.consultant_secondary,
            }),
        })
    }
}

/// Anexos só saem para o GESTOR ou para o criador da visita.
pub fn autorizar_download_anexo(
    role: Role,
    user_id: i64,
    created_by: i64,
) -> Result<(), AppError> {
    if role == Role::Gestor || created_by == user_id {
        Ok(())
    } else {
        Err(AppError::Proibido("SEM PERMISSÃO PARA BAIXAR ESTE ANEXO"))
    }
}

/// O usuário entra como consultor secundário quando só o vínculo
/// secundário bate. Alimenta a flag da resposta de criação.
pub fn eh_consultor_secundario(user_id: i64, empresa: &EmpresaConsultores) -> bool {
    empresa.consultant_secondary == Some(user_id) && empresa.consultant != user_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visita(created_by: i64, consultant: Option<i64>, secondary: Option<i64>) -> VisitaPermissao {
        VisitaPermissao {
            id: 1,
            created_by,
            status: crate::models::visita::StatusVisita::Agendada,
            tipo: TipoVisita::Comercial,
            company_id: Some(10),
            consultant,
            consultant_secondary: secondary,
        }
    }

    fn empresa(consultant: i64, secondary: Option<i64>) -> EmpresaConsultores {
        EmpresaConsultores {
            id: 10,
            name: "ACME".into(),
            consultant,
            consultant_secondary: secondary,
        }
    }

    #[test]
    fn gestor_enxerga_tudo() {
        assert_eq!(escopo_consultor(Role::Gestor, 7), None);
        assert_eq!(escopo_consultor(Role::Consultor, 7), Some(7));
        assert!(exigir_gestor(Role::Gestor).is_ok());
        assert!(exigir_gestor(Role::Consultor).is_err());
    }

    #[test]
    fn consultor_altera_apenas_o_proprio_universo() {
        let v = visita(3, Some(4), Some(5));
        assert!(autorizar_alteracao_visita(Role::Consultor, 3, &v).is_ok());
        assert!(autorizar_alteracao_visita(Role::Consultor, 4, &v).is_ok());
        assert!(autorizar_alteracao_visita(Role::Consultor, 5, &v).is_ok());
        assert!(autorizar_alteracao_visita(Role::Consultor, 9, &v).is_err());
        assert!(autorizar_alteracao_visita(Role::Gestor, 9, &v).is_ok());
    }

    #[test]
    fn negacao_carrega_os_ids_no_debug() {
        let err = autorizar_alteracao_visita(Role::Consultor, 9, &visita(3, Some(4), None))
            .unwrap_err();
        match err {
            AppError::SemPermissao { debug, .. } => {
                assert_eq!(debug["user_id"], 9);
                assert_eq!(debug["created_by"], 3);
            }
            outro => panic!("esperava SemPermissao, veio {outro:?}"),
        }
    }

    #[test]
    fn trabalho_interno_dispensa_vinculo_com_a_empresa() {
        let e = empresa(4, None);
        assert!(autorizar_visita_para_empresa(Role::Consultor, 9, TipoVisita::Comercial, &e)
            .is_err());
        assert!(autorizar_visita_para_empresa(
            Role::Consultor,
            9,
            TipoVisita::TrabalhoInterno,
            &e
        )
        .is_ok());
        assert!(
            autorizar_visita_para_empresa(Role::Consultor, 9, TipoVisita::Prospeccao, &e).is_ok()
        );
    }

    #[test]
    fn download_restrito_ao_criador() {
        assert!(autorizar_download_anexo(Role::Consultor, 3, 3).is_ok());
        assert!(autorizar_download_anexo(Role::Consultor, 3, 4).is_err());
        assert!(autorizar_download_anexo(Role::Gestor, 3, 4).is_ok());
    }

    #[test]
    fn consultor_secundario_so_quando_apenas_o_vinculo_secundario_bate() {
        assert!(eh_consultor_secundario(5, &empresa(4, Some(5))));
        assert!(!eh_consultor_secundario(4, &empresa(4, Some(4))));
        assert!(!eh_consultor_secundario(9, &empresa(4, Some(5))));
    }
}
