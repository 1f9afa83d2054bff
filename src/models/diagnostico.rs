// src/models/diagnostico.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::empresa::Paginacao;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_item_parque", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TipoItemParque {
    Equipamento,
    Implemento,
}

// --- PARQUE INSTALADO ---

// Linha crua de parque_itens, com os ids reais do banco.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParqueItemRow {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub tipo_item: TipoItemParque,
    pub equipamento_impl: String,
    pub marca: String,
    pub modelo: String,
    pub situacao: String,
}

// Item como o frontend enxerga: ids efêmeros (`id_tmp`/`parent_tmp`)
// recalculados a cada leitura, com o id real de lado.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParqueItemView {
    pub id_tmp: i64,
    pub id_real: i64,
    pub tipo_item: TipoItemParque,
    pub equipamento_impl: String,
    pub marca: String,
    pub modelo: String,
    pub situacao: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_tmp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ParqueItemPayload {
    pub id_tmp: i64,
    pub parent_tmp: Option<i64>,
    pub tipo_item: TipoItemParque,
    pub equipamento_impl: String,
    #[serde(default)]
    pub marca: String,
    #[serde(default)]
    pub modelo: String,
    #[serde(default)]
    pub situacao: String,
}

/// Reconstrói a visão do parque a partir das linhas do banco:
/// equipamentos primeiro, depois implementos, com `id_tmp` sequencial
/// e `parent_tmp` resolvido contra o mapa recém-criado. Implementos
/// órfãos saem com `parent_tmp = None` e um aviso no log.
pub fn remapear_parque(rows: &[ParqueItemRow]) -> Vec<ParqueItemView> {
    let mut mapa = std::collections::HashMap::new();
    let mut resultado = Vec::with_capacity(rows.len());
    let mut proximo_tmp: i64 = 1;

    for row in rows.iter().filter(|r| r.tipo_item == TipoItemParque::Equipamento) {
        mapa.insert(row.id, proximo_tmp);
        resultado.push(ParqueItemView {
            id_tmp: proximo_tmp,
            id_real: row.id,
            tipo_item: row.tipo_item,
            equipamento_impl: row.equipamento_impl.clone(),
            marca: row.marca.clone(),
            modelo: row.modelo.clone(),
            situacao: row.situacao.clone(),
            parent_tmp: None,
        });
        proximo_tmp += 1;
    }

    for row in rows.iter().filter(|r| r.tipo_item == TipoItemParque::Implemento) {
        let parent_tmp = row.parent_id.and_then(|pid| mapa.get(&pid).copied());
        if parent_tmp.is_none() {
            tracing::warn!(
                item_id = row.id,
                parent_id = ?row.parent_id,
                "implemento órfão encontrado no parque"
            );
        }
        resultado.push(ParqueItemView {
            id_tmp: proximo_tmp,
            id_real: row.id,
            tipo_item: row.tipo_item,
            equipamento_impl: row.equipamento_impl.clone(),
            marca: row.marca.clone(),
            modelo: row.modelo.clone(),
            situacao: row.situacao.clone(),
            parent_tmp,
        });
        proximo_tmp += 1;
    }

    resultado
}

/// Particiona o payload do parque para a gravação em duas passadas:
/// equipamentos, implementos cujo `parent_tmp` resolve para um
/// equipamento do mesmo lote, e os descartados (órfãos).
pub fn particionar_parque(
    itens: &[ParqueItemPayload],
) -> (Vec<&ParqueItemPayload>, Vec<&ParqueItemPayload>, Vec<&ParqueItemPayload>) {
    let equipamentos: Vec<&ParqueItemPayload> = itens
        .iter()
        .filter(|i| i.tipo_item == TipoItemParque::Equipamento)
        .collect();

    let ids_equipamentos: std::collections::HashSet<i64> =
        equipamentos.iter().map(|e| e.id_tmp).collect();

    let mut implementos = Vec::new();
    let mut descartados = Vec::new();
    for item in itens.iter().filter(|i| i.tipo_item == TipoItemParque::Implemento) {
        match item.parent_tmp {
            Some(parent) if ids_equipamentos.contains(&parent) => implementos.push(item),
            _ => descartados.push(item),
        }
    }

    (equipamentos, implementos, descartados)
}

// --- SUB-FICHAS (uma linha por diagnóstico) ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OperacaoDados {
    #[serde(default)]
    pub tipo_operacao: String,
    #[serde(default)]
    pub tipo_sucata: String,
    pub qtd_producao_mes_ton: Option<Decimal>,
    pub ton_vendida: Option<Decimal>,
    #[serde(default)]
    pub fundo_baia: bool,
    pub qtd_cliente_quer_crescer: Option<i32>,
    #[serde(default)]
    pub cliente_fornece_para: String,
    pub preco_venda_ton: Option<Decimal>,
}

impl OperacaoDados {
    /// Uma ficha sem nenhum dado preenchido não sobrescreve o que já
    /// existe no banco.
    pub fn esta_vazia(&self) -> bool {
        self.tipo_operacao.trim().is_empty()
            && self.tipo_sucata.trim().is_empty()
            && self.qtd_producao_mes_ton.is_none()
            && self.ton_vendida.is_none()
            && !self.fundo_baia
            && self.qtd_cliente_quer_crescer.is_none()
            && self.cliente_fornece_para.trim().is_empty()
            && self.preco_venda_ton.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PrevisaoDados {
    #[serde(default)]
    pub tipo_cliente: String,
    #[serde(default)]
    pub expansao_equip_implement: bool,
    #[serde(default)]
    pub prazo_expansao: String,
    #[serde(default)]
    pub tipo_equip_interesse: String,
}

impl PrevisaoDados {
    pub fn esta_vazia(&self) -> bool {
        self.tipo_cliente.trim().is_empty()
            && !self.expansao_equip_implement
            && self.prazo_expansao.trim().is_empty()
            && self.tipo_equip_interesse.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct RelacionamentoDados {
    #[serde(default)]
    pub contato_comprador: bool,
    #[serde(default)]
    pub contato_operador: bool,
    #[serde(default)]
    pub contato_encarregado: bool,
    #[serde(default)]
    pub contato_diretor: bool,
}

impl RelacionamentoDados {
    pub fn esta_vazia(&self) -> bool {
        !self.contato_comprador
            && !self.contato_operador
            && !self.contato_encarregado
            && !self.contato_diretor
    }
}

// --- AGREGADO ---

#[derive(Debug, Serialize, ToSchema)]
pub struct DiagnosticoData {
    pub parque: Vec<ParqueItemView>,
    pub operacao: Option<OperacaoDados>,
    pub previsao: Option<PrevisaoDados>,
    pub relacionamento: Option<RelacionamentoDados>,
}

impl DiagnosticoData {
    pub fn vazio() -> Self {
        Self {
            parque: Vec::new(),
            operacao: None,
            previsao: None,
            relacionamento: None,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SalvarDiagnosticoPayload {
    pub empresa_id: Option<i64>,
    pub parque: Option<Vec<ParqueItemPayload>>,
    pub operacao: Option<OperacaoDados>,
    pub previsao: Option<PrevisaoDados>,
    pub relacionamento: Option<RelacionamentoDados>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalvarDiagnosticoResposta {
    pub success: bool,
    pub message: &'static str,
    pub diagnostico_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DiagnosticoQuery {
    pub empresa_id: Option<i64>,
}

// --- LISTAGEM ---

#[derive(Debug, Deserialize)]
pub struct DiagnosticoListagemFiltros {
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// Linha da listagem: empresa e consultor resolvidos, contadores do
// parque e um resumo das sub-fichas vindos de subselects.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct DiagnosticoListagemItem {
    pub id: i64,
    pub empresa_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub empresa_nome: String,
    pub cnpj: String,
    pub consultor_id: i64,
    pub consultor_nome: String,
    pub cidade_nome: Option<String>,
    pub estado_nome: Option<String>,
    pub total_equipamentos: i64,
    pub total_implementos: i64,
    pub tipo_operacao: String,
    pub tipo_sucata: String,
    pub tipo_cliente: String,
    pub prazo_expansao: String,
    pub tem_relacionamento: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiagnosticoListagemResposta {
    pub success: bool,
    pub data: Vec<DiagnosticoListagemItem>,
    pub pagination: Paginacao,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, parent_id: Option<i64>, tipo: TipoItemParque) -> ParqueItemRow {
        ParqueItemRow {
            id,
            parent_id,
            tipo_item: tipo,
            equipamento_impl: format!("item {}", id),
            marca: String::new(),
            modelo: String::new(),
            situacao: "PRÓPRIO".to_owned(),
        }
    }

    fn item(id_tmp: i64, parent_tmp: Option<i64>, tipo: TipoItemParque) -> ParqueItemPayload {
        ParqueItemPayload {
            id_tmp,
            parent_tmp,
            tipo_item: tipo,
            equipamento_impl: format!("item {}", id_tmp),
            marca: String::new(),
            modelo: String::new(),
            situacao: String::new(),
        }
    }

    #[test]
    fn remapear_gera_tmps_sequenciais_e_resolve_pais() {
        let rows = vec![
            row(101, None, TipoItemParque::Equipamento),
            row(102, None, TipoItemParque::Equipamento),
            row(201, Some(102), TipoItemParque::Implemento),
        ];

        let visao = remapear_parque(&rows);

        assert_eq!(visao.len(), 3);
        assert_eq!(visao[0].id_tmp, 1);
        assert_eq!(visao[0].id_real, 101);
        assert_eq!(visao[1].id_tmp, 2);
        // o implemento aponta para o tmp do equipamento 102
        assert_eq!(visao[2].id_tmp, 3);
        assert_eq!(visao[2].parent_tmp, Some(2));
    }

    #[test]
    fn remapear_deixa_implemento_orfao_sem_pai() {
        let rows = vec![
            row(101, None, TipoItemParque::Equipamento),
            row(201, Some(999), TipoItemParque::Implemento),
            row(202, None, TipoItemParque::Implemento),
        ];

        let visao = remapear_parque(&rows);

        assert_eq!(visao[1].parent_tmp, None);
        assert_eq!(visao[2].parent_tmp, None);
    }

    #[test]
    fn particionar_separa_equipamentos_implementos_e_orfaos() {
        let itens = vec![
            item(1, None, TipoItemParque::Equipamento),
            item(2, Some(1), TipoItemParque::Implemento),
            item(3, Some(42), TipoItemParque::Implemento),
            item(4, None, TipoItemParque::Implemento),
        ];

        let (equipamentos, implementos, descartados) = particionar_parque(&itens);

        assert_eq!(equipamentos.len(), 1);
        assert_eq!(implementos.len(), 1);
        assert_eq!(implementos[0].id_tmp, 2);
        assert_eq!(descartados.len(), 2);
    }

    #[test]
    fn sub_fichas_vazias_nao_sobrescrevem() {
        assert!(OperacaoDados::default().esta_vazia());
        assert!(PrevisaoDados::default().esta_vazia());
        assert!(RelacionamentoDados::default().esta_vazia());

        let operacao = OperacaoDados { tipo_operacao: "TESOURA".to_owned(), ..Default::default() };
        assert!(!operacao.esta_vazia());

        let relacionamento =
            RelacionamentoDados { contato_diretor: true, ..Default::default() };
        assert!(!relacionamento.esta_vazia());
    }
}
