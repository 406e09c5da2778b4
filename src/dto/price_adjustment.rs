use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::price_adjustment::{
    AdjustmentStatus, AdjustmentTerms, PriceAdjustment, UpdatePriceAdjustment,
};
use crate::domain::types::{ContractId, IndexName, TypeConstraintError};
use crate::dto::{optional_text, reject_if_present};
use crate::validation::{FieldRule, FieldSpec, Schema};

pub const CREATE_PRICE_ADJUSTMENT_SCHEMA: Schema = Schema::new(
    "CreatePriceAdjustment",
    &[
        FieldSpec::required("contractId", FieldRule::int_at_least(1)),
        FieldSpec::required("parcelaReferencia", FieldRule::int_at_least(1)),
        FieldSpec::required("valorOriginal", FieldRule::Number { min: Some(0.0) }),
        FieldSpec::optional("valorReajustado", FieldRule::Number { min: Some(0.0) }),
        FieldSpec::required("indiceAplicado", FieldRule::Number { min: None }),
        FieldSpec::required("indiceNome", FieldRule::Text),
        FieldSpec::optional("percentualAdicional", FieldRule::Number { min: None }),
        FieldSpec::optional("reajusteTotal", FieldRule::Number { min: None }),
        FieldSpec::required("dataReferencia", FieldRule::Date),
        FieldSpec::optional("dataAplicacao", FieldRule::Date),
        FieldSpec::optional("status", FieldRule::Text),
        FieldSpec::optional("aplicado", FieldRule::Boolean),
    ],
);

pub const UPDATE_PRICE_ADJUSTMENT_SCHEMA: Schema =
    CREATE_PRICE_ADJUSTMENT_SCHEMA.partial("UpdatePriceAdjustment");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePriceAdjustmentPayload {
    pub contract_id: i32,
    pub parcela_referencia: i32,
    pub valor_original: f64,
    pub valor_reajustado: Option<f64>,
    pub indice_aplicado: f64,
    pub indice_nome: String,
    pub percentual_adicional: Option<f64>,
    pub reajuste_total: Option<f64>,
    pub data_referencia: NaiveDate,
    pub data_aplicacao: Option<NaiveDate>,
    pub status: Option<String>,
    pub aplicado: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriceAdjustmentPayload {
    pub contract_id: Option<i32>,
    pub parcela_referencia: Option<i32>,
    pub valor_original: Option<f64>,
    pub valor_reajustado: Option<f64>,
    pub indice_aplicado: Option<f64>,
    pub indice_nome: Option<String>,
    pub percentual_adicional: Option<f64>,
    pub reajuste_total: Option<f64>,
    pub data_referencia: Option<NaiveDate>,
    pub data_aplicacao: Option<NaiveDate>,
    pub status: Option<String>,
    pub aplicado: Option<bool>,
}

fn status(raw: Option<String>) -> Option<AdjustmentStatus> {
    optional_text(raw).map(AdjustmentStatus::from)
}

impl TryFrom<CreatePriceAdjustmentPayload> for AdjustmentTerms {
    type Error = TypeConstraintError;

    fn try_from(payload: CreatePriceAdjustmentPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            contract_id: ContractId::new(payload.contract_id)?,
            parcela_referencia: payload.parcela_referencia,
            valor_original: payload.valor_original,
            valor_reajustado: payload.valor_reajustado,
            indice_aplicado: payload.indice_aplicado,
            indice_nome: IndexName::new(payload.indice_nome)?,
            percentual_adicional: payload.percentual_adicional.unwrap_or(0.0),
            reajuste_total: payload.reajuste_total,
            data_referencia: payload.data_referencia,
            data_aplicacao: payload.data_aplicacao,
            status: status(payload.status),
            aplicado: payload.aplicado.unwrap_or(false),
        })
    }
}

impl TryFrom<UpdatePriceAdjustmentPayload> for UpdatePriceAdjustment {
    type Error = TypeConstraintError;

    fn try_from(payload: UpdatePriceAdjustmentPayload) -> Result<Self, Self::Error> {
        reject_if_present(&payload.contract_id, "contractId")?;
        reject_if_present(&payload.parcela_referencia, "parcelaReferencia")?;
        Ok(Self {
            valor_original: payload.valor_original,
            valor_reajustado: payload.valor_reajustado,
            indice_aplicado: payload.indice_aplicado,
            indice_nome: payload.indice_nome.map(IndexName::new).transpose()?,
            percentual_adicional: payload.percentual_adicional,
            reajuste_total: payload.reajuste_total,
            data_referencia: payload.data_referencia,
            data_aplicacao: payload.data_aplicacao,
            status: status(payload.status),
            aplicado: payload.aplicado,
        })
    }
}

/// Stored adjustment plus the badge computed for the current date.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAdjustmentView {
    #[serde(flatten)]
    pub adjustment: PriceAdjustment,
    pub status_atual: AdjustmentStatus,
    pub status_label: String,
}

impl PriceAdjustmentView {
    pub fn new(adjustment: PriceAdjustment, today: NaiveDate, horizon_days: u64) -> Self {
        let status_atual = adjustment.current_status(today, horizon_days);
        let status_label = status_atual.label();
        Self {
            adjustment,
            status_atual,
            status_label,
        }
    }
}

/// Result of applying an adjustment to a contract's open installments.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedAdjustment {
    pub reajuste: PriceAdjustmentView,
    pub parcelas_atualizadas: usize,
}
