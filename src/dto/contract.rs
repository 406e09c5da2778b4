use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::contract::{Contract, MAX_INSTALLMENTS, NewContract, UpdateContract};
use crate::domain::installment::Installment;
use crate::domain::types::{ClientId, IndexName, Label, LotId, TypeConstraintError};
use crate::dto::reject_if_present;
use crate::validation::{FieldRule, FieldSpec, Schema};

pub const DEFAULT_CONTRACT_STATUS: &str = "ativo";

pub const CREATE_CONTRACT_SCHEMA: Schema = Schema::new(
    "CreateContract",
    &[
        FieldSpec::required("clientId", FieldRule::int_at_least(1)),
        FieldSpec::required("lotId", FieldRule::int_at_least(1)),
        FieldSpec::required("valorTotal", FieldRule::Number { min: Some(0.0) }),
        FieldSpec::optional("valorEntrada", FieldRule::Number { min: Some(0.0) }),
        FieldSpec::required(
            "quantidadeParcelas",
            FieldRule::int_between(1, MAX_INSTALLMENTS as i64),
        ),
        FieldSpec::required("dataInicio", FieldRule::Date),
        FieldSpec::required("indiceReajuste", FieldRule::Text),
        FieldSpec::optional("status", FieldRule::Text),
    ],
);

pub const UPDATE_CONTRACT_SCHEMA: Schema = CREATE_CONTRACT_SCHEMA.partial("UpdateContract");

pub const PAY_INSTALLMENT_SCHEMA: Schema = Schema::new(
    "PayInstallment",
    &[FieldSpec::optional("dataPagamento", FieldRule::Date)],
);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractPayload {
    pub client_id: i32,
    pub lot_id: i32,
    pub valor_total: f64,
    pub valor_entrada: Option<f64>,
    pub quantidade_parcelas: i32,
    pub data_inicio: NaiveDate,
    pub indice_reajuste: String,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContractPayload {
    pub client_id: Option<i32>,
    pub lot_id: Option<i32>,
    pub valor_total: Option<f64>,
    pub valor_entrada: Option<f64>,
    pub quantidade_parcelas: Option<i32>,
    pub data_inicio: Option<NaiveDate>,
    pub indice_reajuste: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayInstallmentPayload {
    pub data_pagamento: Option<NaiveDate>,
}

impl TryFrom<CreateContractPayload> for NewContract {
    type Error = TypeConstraintError;

    fn try_from(payload: CreateContractPayload) -> Result<Self, Self::Error> {
        let status = crate::dto::optional_text(payload.status)
            .unwrap_or_else(|| DEFAULT_CONTRACT_STATUS.to_string());
        NewContract::try_new(
            ClientId::new(payload.client_id)?,
            LotId::new(payload.lot_id)?,
            payload.valor_total,
            payload.valor_entrada.unwrap_or(0.0),
            payload.quantidade_parcelas,
            payload.data_inicio,
            IndexName::new(payload.indice_reajuste)?,
            Label::new(status)?,
        )
    }
}

/// Only the index and the status may change after the schedule was generated.
impl TryFrom<UpdateContractPayload> for UpdateContract {
    type Error = TypeConstraintError;

    fn try_from(payload: UpdateContractPayload) -> Result<Self, Self::Error> {
        reject_if_present(&payload.client_id, "clientId")?;
        reject_if_present(&payload.lot_id, "lotId")?;
        reject_if_present(&payload.valor_total, "valorTotal")?;
        reject_if_present(&payload.valor_entrada, "valorEntrada")?;
        reject_if_present(&payload.quantidade_parcelas, "quantidadeParcelas")?;
        reject_if_present(&payload.data_inicio, "dataInicio")?;
        Ok(Self {
            indice_reajuste: payload.indice_reajuste.map(IndexName::new).transpose()?,
            status: payload.status.map(Label::new).transpose()?,
        })
    }
}

/// Contract together with its installment schedule.
#[derive(Debug, Serialize)]
pub struct ContractDetail {
    #[serde(flatten)]
    pub contract: Contract,
    pub parcelas: Vec<Installment>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::parse_payload;

    #[test]
    fn create_defaults_down_payment_and_status() {
        let payload: CreateContractPayload = parse_payload(
            &CREATE_CONTRACT_SCHEMA,
            json!({
                "clientId": 3,
                "lotId": 7,
                "valorTotal": 120000,
                "quantidadeParcelas": 120,
                "dataInicio": "2024-03-10",
                "indiceReajuste": "IPCA",
            }),
        )
        .unwrap();
        let contract = NewContract::try_from(payload).unwrap();
        assert_eq!(contract.valor_entrada, 0.0);
        assert_eq!(contract.status.as_str(), DEFAULT_CONTRACT_STATUS);
        assert_eq!(contract.client_id.get(), 3);
    }

    #[test]
    fn update_rejects_fixed_terms() {
        let payload: UpdateContractPayload =
            parse_payload(&UPDATE_CONTRACT_SCHEMA, json!({"valorTotal": 10})).unwrap();
        assert!(matches!(
            UpdateContract::try_from(payload),
            Err(TypeConstraintError::InvalidValue(_))
        ));
    }

    #[test]
    fn update_accepts_status_change() {
        let payload: UpdateContractPayload =
            parse_payload(&UPDATE_CONTRACT_SCHEMA, json!({"status": "quitado"})).unwrap();
        let update = UpdateContract::try_from(payload).unwrap();
        assert_eq!(update.status.unwrap().as_str(), "quitado");
        assert_eq!(update.indice_reajuste, None);
    }
}
